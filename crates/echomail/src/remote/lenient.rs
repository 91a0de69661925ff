//! Tolerant decoders for provider message fields
//!
//! A field whose JSON type is not the expected one decodes as absent, so one
//! odd field never fails the message (or the page) it belongs to.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::api::{InternalDate, ProviderAttachment};

pub(crate) fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(as_string(Value::deserialize(deserializer)?).unwrap_or_default())
}

pub(crate) fn string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(as_string(Value::deserialize(deserializer)?))
}

/// An array of strings, or a lone string as a one-element list
pub(crate) fn string_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(items.into_iter().filter_map(as_string).collect()),
        Value::String(s) => Some(vec![s]),
        _ => None,
    })
}

/// Byte count given as an integer, a float, or a numeric string
pub(crate) fn size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(non_negative)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(non_negative))
        }
        _ => None,
    })
}

/// Attachment list; entries that are not objects are dropped
pub(crate) fn attachments<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<ProviderAttachment>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

/// Epoch milliseconds (integer or float) or a date string
pub(crate) fn internal_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<InternalDate>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .map(InternalDate::Millis),
        Value::String(s) => Some(InternalDate::Text(s)),
        _ => None,
    })
}

fn as_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_negative(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0).then(|| f.round() as u64)
}
