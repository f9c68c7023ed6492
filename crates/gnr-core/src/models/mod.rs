pub mod antibiotic;
pub mod snapshot;
