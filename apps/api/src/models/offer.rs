use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body of the generator endpoint.
///
/// Fields stay loosely typed: a wrong-typed `product`, `price` or `unit` is a
/// validation failure (400), not a parse failure. `null` counts as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferRequest {
    #[serde(default)]
    pub product: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub unit: Option<Value>,
    #[serde(default, alias = "pickupNote")]
    pub pickup_note: Option<Value>,
    #[serde(default, alias = "extraNote")]
    pub extra_note: Option<Value>,
    #[serde(default)]
    pub tones: Option<Value>,
    #[serde(default)]
    pub emojis: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferResponse {
    /// Final text with the mandatory hashtags guaranteed.
    pub text: String,
    /// Body exactly as the model produced it.
    pub body_text: String,
    pub extra_hashtags: Vec<String>,
}

/// Whether a client value counts as filled in: `null`, `false`, `0` and `""`
/// do not. Arrays and objects always do.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Renders a client value as prompt text, the way a browser form would
/// stringify it: strings verbatim, `12.0` as `12`, arrays comma-joined.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(v) if n.is_f64() && v.fract() == 0.0 && v.abs() < 1e15 => {
                format!("{}", v as i64)
            }
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_list_item)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// List items render like `render_value`, except `null` becomes empty.
pub fn render_list_item(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => render_value(other),
    }
}
