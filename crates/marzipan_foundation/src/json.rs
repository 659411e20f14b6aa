//! Conversions between the external [`Value`] universe and `serde_json`.
//!
//! The kernel itself never performs I/O; these conversions are the boundary
//! adapter for callers that parse or emit JSON with serde_json.

use indexmap::IndexMap;

use crate::value::Value;

impl From<serde_json::Value> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(u) = n.as_u64() {
                    // Out of i64 range; degrade to float like JSON readers do.
                    Self::Float(u as f64)
                } else {
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Seq(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<IndexMap<_, _>>(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Int(n) => Self::Number(n.into()),
            // Non-finite floats have no JSON representation; follow
            // serde_json and map them to null.
            Value::Float(n) => serde_json::Number::from_f64(n)
                .map_or(Self::Null, Self::Number),
            Value::String(s) => Self::String(s),
            Value::Seq(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Map(map) => Self::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}
