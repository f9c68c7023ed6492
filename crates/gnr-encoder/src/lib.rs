//! gnr-encoder
//!
//! Maps a clinician's input snapshot onto the fixed feature vector each
//! fitted susceptibility model expects. Pure data and pure functions, with
//! no model or filesystem dependency.

pub mod encode;
pub mod error;
pub mod schema;
pub mod tables;

pub use encode::Encoder;
pub use error::EncodingError;
pub use schema::{
    AcquisitionEncoding, AgeEncoding, Column, CombinationResistanceRule, EncoderOptions,
    FeatureSchema, FeatureVector,
};
pub use tables::EncoderTables;
