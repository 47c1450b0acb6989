use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CoreError;

/// The normalized field set merged into the report template for one render.
///
/// Values are carried through exactly as the client sent them. Shapes are not
/// checked here; a malformed item shows up when the template renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportContext {
    pub customer_name: Value,
    pub site_address: Value,
    pub report_date: Value,
    pub technician_name: Value,
    pub robot_nickname: Value,
    pub robot_model: Value,
    pub robot_serial: Value,
    pub maintenance_items: Value,
    pub images: Value,
    pub notes: Value,

    /// Filled in by the renderer with the local render time when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_time: Option<String>,
}

impl ReportContext {
    /// Pick the recognized fields out of an arbitrary payload.
    ///
    /// Missing and `null` fields get their default; anything unrecognized
    /// (including `inspection_id`) is dropped.
    pub fn from_payload(payload: &Map<String, Value>) -> Self {
        Self {
            customer_name: text_field(payload, "customer_name"),
            site_address: text_field(payload, "site_address"),
            report_date: text_field(payload, "report_date"),
            technician_name: text_field(payload, "technician_name"),
            robot_nickname: text_field(payload, "robot_nickname"),
            robot_model: text_field(payload, "robot_model"),
            robot_serial: text_field(payload, "robot_serial"),
            maintenance_items: list_field(payload, "maintenance_items"),
            images: list_field(payload, "images"),
            notes: text_field(payload, "notes"),
            generated_time: None,
        }
    }

    pub fn with_generated_time(mut self, generated_time: impl Into<String>) -> Self {
        self.generated_time = Some(generated_time.into());
        self
    }
}

fn text_field(payload: &Map<String, Value>, key: &str) -> Value {
    field_or(payload, key, || Value::String(String::new()))
}

fn list_field(payload: &Map<String, Value>, key: &str) -> Value {
    field_or(payload, key, || Value::Array(Vec::new()))
}

fn field_or(payload: &Map<String, Value>, key: &str, default: impl FnOnce() -> Value) -> Value {
    match payload.get(key) {
        None | Some(Value::Null) => default(),
        Some(value) => value.clone(),
    }
}

/// Parse a request body into the payload object the normalizer accepts.
///
/// An empty body, or one holding a falsy JSON value (`null`, `false`, `0`,
/// `""`, `[]`, `{}`), carries no data.
pub fn payload_object(body: &[u8]) -> Result<Map<String, Value>, CoreError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(CoreError::NoData);
    }

    let value: Value =
        serde_json::from_slice(body).map_err(|e| CoreError::InvalidJson(e.to_string()))?;
    if is_falsy(&value) {
        return Err(CoreError::NoData);
    }

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CoreError::NotAnObject),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// The inspection identifier used to name the generated PDF.
pub fn inspection_id(payload: &Map<String, Value>) -> String {
    match payload.get("inspection_id") {
        None | Some(Value::Null) => "unknown".to_string(),
        Some(Value::String(id)) => id.clone(),
        Some(other) => other.to_string(),
    }
}
