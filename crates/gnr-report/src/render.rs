use tera::{Context, Tera};

use crate::PredictionReport;
use crate::error::ReportError;

pub const REPORT_TEMPLATE_NAME: &str = "report.html";
const REPORT_TEMPLATE: &str = include_str!("../templates/report.html");

/// Render the HTML report page for one prediction.
pub fn render_report(report: &PredictionReport) -> Result<String, ReportError> {
    render_with(REPORT_TEMPLATE_NAME, REPORT_TEMPLATE, report)
}

/// Render `report` through a caller-supplied Tera template.
///
/// The report's fields (`assessment`, `rows`, `chart`, `inputs`) become the
/// template context variables.
pub fn render_with(
    template_name: &str,
    template_content: &str,
    report: &PredictionReport,
) -> Result<String, ReportError> {
    let mut tera = Tera::default();
    tera.add_raw_template(template_name, template_content)?;

    let value = serde_json::to_value(report)?;
    let context = Context::from_value(value)?;

    Ok(tera.render(template_name, &context)?)
}
