//! JSON ⇄ DynamoDB attribute conversion
//!
//! Item data crosses the crate boundary as `serde_json::Value`; this module
//! converts it to and from the SDK's `AttributeValue` representation.
//! Serialization is total. Deserialization can fail on a malformed numeric
//! attribute, and maps binary attributes to base64 strings since JSON has
//! no binary type.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{Map, Number, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttrError {
    #[error("attribute holds a non-numeric number value: {0:?}")]
    InvalidNumber(String),

    #[error("attribute value variant is not supported")]
    Unsupported,
}

/// Convert a JSON value to a DynamoDB attribute value.
pub fn to_attribute_value(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => {
            AttributeValue::L(items.iter().map(to_attribute_value).collect())
        }
        Value::Object(object) => AttributeValue::M(to_item(object)),
    }
}

/// Convert a JSON object to a DynamoDB item.
pub fn to_item(object: &Map<String, Value>) -> HashMap<String, AttributeValue> {
    object
        .iter()
        .map(|(k, v)| (k.clone(), to_attribute_value(v)))
        .collect()
}

/// Convert a DynamoDB attribute value back to JSON.
pub fn from_attribute_value(attr: &AttributeValue) -> Result<Value, AttrError> {
    match attr {
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::Bool(b) => Ok(Value::Bool(*b)),
        AttributeValue::N(n) => parse_number(n),
        AttributeValue::S(s) => Ok(Value::String(s.clone())),
        AttributeValue::B(blob) => Ok(Value::String(BASE64.encode(blob.as_ref()))),
        AttributeValue::L(items) => Ok(Value::Array(
            items
                .iter()
                .map(from_attribute_value)
                .collect::<Result<Vec<_>, _>>()?,
        )),
        AttributeValue::M(map) => Ok(Value::Object(from_item(map)?)),
        AttributeValue::Ss(strings) => Ok(Value::Array(
            strings.iter().cloned().map(Value::String).collect(),
        )),
        AttributeValue::Ns(numbers) => Ok(Value::Array(
            numbers
                .iter()
                .map(|n| parse_number(n))
                .collect::<Result<Vec<_>, _>>()?,
        )),
        AttributeValue::Bs(blobs) => Ok(Value::Array(
            blobs
                .iter()
                .map(|b| Value::String(BASE64.encode(b.as_ref())))
                .collect(),
        )),
        _ => Err(AttrError::Unsupported),
    }
}

/// Convert a DynamoDB item back to a JSON object.
pub fn from_item(item: &HashMap<String, AttributeValue>) -> Result<Map<String, Value>, AttrError> {
    item.iter()
        .map(|(k, v)| Ok((k.clone(), from_attribute_value(v)?)))
        .collect()
}

// Relies on serde_json's arbitrary_precision feature: DynamoDB N values
// carry up to 38 significant digits, which must survive the JSON boundary.
fn parse_number(raw: &str) -> Result<Value, AttrError> {
    serde_json::from_str::<Number>(raw)
        .map(Value::Number)
        .map_err(|_| AttrError::InvalidNumber(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_smithy_types::Blob;
    use serde_json::json;

    #[test]
    fn test_scalar_serialization() {
        assert_eq!(
            to_attribute_value(&json!("invoice-42")),
            AttributeValue::S("invoice-42".to_string())
        );
        assert_eq!(
            to_attribute_value(&json!(21.5)),
            AttributeValue::N("21.5".to_string())
        );
        assert_eq!(to_attribute_value(&json!(true)), AttributeValue::Bool(true));
        assert_eq!(to_attribute_value(&json!(null)), AttributeValue::Null(true));
    }

    #[test]
    fn test_nested_item_round_trip() {
        let value = json!({
            "identifier": "evt-1",
            "amounts": [10, 21.5],
            "detail": {"status": "processed", "retried": false}
        });

        let attr = to_attribute_value(&value);
        assert_eq!(from_attribute_value(&attr).unwrap(), value);
    }

    #[test]
    fn test_numeric_string_precision_is_preserved() {
        // A number attribute keeps its exact decimal representation.
        let attr = AttributeValue::N("10.58175".to_string());
        assert_eq!(from_attribute_value(&attr).unwrap(), json!(10.58175));
    }

    #[test]
    fn test_high_precision_number_round_trip() {
        // 34 significant digits, far beyond what an f64 can hold.
        let raw = "0.1000000000000000055511151231257827";
        let attr = AttributeValue::N(raw.to_string());

        let value = from_attribute_value(&attr).unwrap();
        assert_eq!(to_attribute_value(&value), AttributeValue::N(raw.to_string()));
    }

    #[test]
    fn test_large_integer_round_trip() {
        let raw = "99999999999999999999999999999999999999";
        let attr = AttributeValue::N(raw.to_string());

        let value = from_attribute_value(&attr).unwrap();
        assert_eq!(to_attribute_value(&value), AttributeValue::N(raw.to_string()));
    }

    #[test]
    fn test_malformed_number_is_an_error() {
        let attr = AttributeValue::N("not-a-number".to_string());
        assert!(matches!(
            from_attribute_value(&attr),
            Err(AttrError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_binary_deserializes_to_base64() {
        let attr = AttributeValue::B(Blob::new(b"pdf-bytes".to_vec()));
        assert_eq!(
            from_attribute_value(&attr).unwrap(),
            json!(BASE64.encode(b"pdf-bytes"))
        );
    }

    #[test]
    fn test_string_set_deserializes_to_array() {
        let attr = AttributeValue::Ss(vec!["venta".to_string(), "compra".to_string()]);
        assert_eq!(
            from_attribute_value(&attr).unwrap(),
            json!(["venta", "compra"])
        );
    }
}
