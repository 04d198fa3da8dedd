//! Normalization of provider predictions into [`ExtractedRecord`]s.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ParseError;
use crate::models::record::{ExtractedRecord, FieldCategory};

/// Parse a provider response.
///
/// Never fails: a malformed payload yields an empty record whose `error`
/// describes what went wrong.
pub fn parse_response(response: &Value) -> ExtractedRecord {
    match try_parse(response) {
        Ok(record) => record,
        Err(e) => {
            warn!("Error parsing provider response: {}", e);
            ExtractedRecord::from_parse_error(e.to_string())
        }
    }
}

/// Walk `document.inference.prediction` and take the first candidate of each category.
pub fn try_parse(response: &Value) -> Result<ExtractedRecord, ParseError> {
    let document = object_at(response, "document", "document")?;
    let inference = object_at_map(document, "inference", "document.inference")?;
    let prediction = object_at_map(inference, "prediction", "document.inference.prediction")?;

    let mut record = ExtractedRecord {
        raw_response: Some(response.clone()),
        ..ExtractedRecord::default()
    };

    for category in FieldCategory::ALL {
        // Only the first candidate counts; later ones are ignored.
        let Some(first) = prediction
            .get(category.key())
            .and_then(Value::as_array)
            .and_then(|candidates| candidates.first())
        else {
            continue;
        };

        // A null candidate is unreadable; other non-objects just carry no value.
        if first.is_null() {
            return Err(ParseError::MalformedEntry {
                category: category.key(),
            });
        }

        let value = first.get("value").and_then(Value::as_str).unwrap_or("");
        let confidence = first
            .get("confidence")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);

        *record.field_mut(category) = value.to_string();
        record.confidence = record.confidence.max(confidence);
    }

    Ok(record)
}

fn object_at<'a>(
    value: &'a Value,
    key: &'static str,
    path: &'static str,
) -> Result<&'a Map<String, Value>, ParseError> {
    let map = value.as_object().ok_or(ParseError::NotAnObject("response"))?;
    object_at_map(map, key, path)
}

fn object_at_map<'a>(
    map: &'a Map<String, Value>,
    key: &'static str,
    path: &'static str,
) -> Result<&'a Map<String, Value>, ParseError> {
    match map.get(key) {
        None | Some(Value::Null) => Err(ParseError::MissingKey(path)),
        Some(v) => v.as_object().ok_or(ParseError::NotAnObject(path)),
    }
}
