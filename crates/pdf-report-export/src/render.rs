use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use tera::{Context, Tera};

use pdf_report_core::models::report::ReportContext;
use pdf_report_core::status::StatusFormatter;
use pdf_report_core::time;

use crate::error::{ExportError, describe};

/// Template name used for the bundled report. The `.html` suffix turns on
/// Tera's autoescaping.
pub const REPORT_TEMPLATE_NAME: &str = "report_template.html";

/// Read a template from disk. Called on every render; nothing is cached.
pub fn load_template(path: &Path) -> Result<String, ExportError> {
    std::fs::read_to_string(path)
        .map_err(|e| ExportError::TemplateNotFound(format!("{}: {e}", path.display())))
}

/// Render a Tera template with a ReportContext.
///
/// `format_status` is exposed to the template as the `format_status`
/// filter. A non-string status fails the render. When the context has no
/// `generated_time`, the current local time is used.
pub fn render_report(
    template_name: &str,
    template_content: &str,
    report: &ReportContext,
    format_status: StatusFormatter,
) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.add_raw_template(template_name, template_content)
        .map_err(|e| ExportError::TemplateParse(describe(&e)))?;

    tera.register_filter(
        "format_status",
        move |value: &Value, _args: &HashMap<String, Value>| match value.as_str() {
            Some(status) => Ok(Value::String(format_status(status))),
            None => Err(tera::Error::msg(format!(
                "format_status expects a string, got {value}"
            ))),
        },
    );

    let mut value = serde_json::to_value(report)?;
    if report.generated_time.is_none() {
        value["generated_time"] = Value::String(time::generated_time(&time::now_local()));
    }
    let context =
        Context::from_value(value).map_err(|e| ExportError::TemplateRender(describe(&e)))?;

    let rendered = tera.render(template_name, &context)?;
    Ok(rendered)
}
