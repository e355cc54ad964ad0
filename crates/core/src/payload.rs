//! The JSON body served by `/api/answer-data/{answer_id}`

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Series data for one answer: `x` labels and `y` values.
///
/// Both fields are optional on the wire; missing or `null` means empty.
/// Extra fields (such as the `error` member of a 404 body) are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SeriesPayload {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub x: Vec<Value>,
    /// `null` entries are kept and drawn as gaps
    #[serde(default, deserialize_with = "null_as_empty")]
    pub y: Vec<Option<f64>>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl SeriesPayload {
    pub fn new(x: Vec<Value>, y: Vec<Option<f64>>) -> Self {
        Self { x, y }
    }

    /// Parse a response body.
    pub fn from_json(body: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// `x` coerced to text, one label per entry.
    pub fn labels(&self) -> Vec<String> {
        self.x.iter().map(label_text).collect()
    }

    pub fn len(&self) -> usize {
        self.x.len().max(self.y.len())
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() && self.y.is_empty()
    }

    /// Smallest and largest non-null value, if any.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.y.iter().flatten().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Stringify a JSON value the way a browser's `String(value)` would.
pub fn label_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => number_text(f),
            _ => n.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => label_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// JS `Number.prototype.toString()`: plain decimals in `[1e-6, 1e21)`,
/// exponent form with an explicit sign outside it.
pub fn number_text(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    let exp = format!("{:e}", value);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}
