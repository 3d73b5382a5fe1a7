//! Conversion between DynamoDB attribute values and JSON.
//!
//! DynamoDB carries numbers as arbitrary-precision decimal strings. On the way
//! out they become plain JSON numbers: integers stay integers, anything else
//! becomes an `f64`. A number that fits neither is kept as its decimal string
//! rather than being rounded to infinity.

use std::collections::HashMap;

use anyhow::{Result, anyhow};
use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue;
use base64::{Engine as _, engine::general_purpose};
use serde_json::{Number, Value as JsonValue};

use super::Record;

pub type Item = HashMap<String, AttributeValue>;

pub fn json_to_attribute(value: &JsonValue) -> AttributeValue {
    match value {
        JsonValue::Null => AttributeValue::Null(true),
        JsonValue::Bool(b) => AttributeValue::Bool(*b),
        JsonValue::Number(n) => AttributeValue::N(n.to_string()),
        JsonValue::String(s) => AttributeValue::S(s.clone()),
        JsonValue::Array(values) => AttributeValue::L(values.iter().map(json_to_attribute).collect()),
        JsonValue::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_attribute(v)))
                .collect(),
        ),
    }
}

pub fn attribute_to_json(value: &AttributeValue) -> Result<JsonValue> {
    let json = match value {
        AttributeValue::Null(_) => JsonValue::Null,
        AttributeValue::Bool(b) => JsonValue::Bool(*b),
        AttributeValue::N(n) => number_to_json(n),
        AttributeValue::S(s) => JsonValue::String(s.clone()),
        AttributeValue::B(blob) => JsonValue::String(encode_blob(blob)),
        AttributeValue::L(values) => JsonValue::Array(
            values
                .iter()
                .map(attribute_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        AttributeValue::M(map) => JsonValue::Object(item_to_record(map)?),
        AttributeValue::Ss(values) => {
            JsonValue::Array(values.iter().cloned().map(JsonValue::String).collect())
        }
        AttributeValue::Ns(values) => {
            JsonValue::Array(values.iter().map(|n| number_to_json(n)).collect())
        }
        AttributeValue::Bs(blobs) => JsonValue::Array(
            blobs
                .iter()
                .map(|blob| JsonValue::String(encode_blob(blob)))
                .collect(),
        ),
        other => return Err(anyhow!("Unsupported DynamoDB attribute value: {:?}", other)),
    };
    Ok(json)
}

/// Normalise a DynamoDB decimal string into a JSON number
pub fn number_to_json(raw: &str) -> JsonValue {
    if let Ok(i) = raw.parse::<i64>() {
        return JsonValue::Number(i.into());
    }
    if let Ok(u) = raw.parse::<u64>() {
        return JsonValue::Number(u.into());
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(JsonValue::Number)
        .unwrap_or_else(|| {
            tracing::warn!("Number {} is not representable as f64, keeping it as a string", raw);
            JsonValue::String(raw.to_string())
        })
}

pub fn record_to_item(record: &Record) -> Item {
    record
        .iter()
        .map(|(k, v)| (k.clone(), json_to_attribute(v)))
        .collect()
}

pub fn item_to_record(item: &Item) -> Result<Record> {
    item.iter()
        .map(|(k, v)| Ok::<_, anyhow::Error>((k.clone(), attribute_to_json(v)?)))
        .collect()
}

fn encode_blob(blob: &Blob) -> String {
    general_purpose::STANDARD.encode(blob.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integer_numbers_stay_integers() {
        assert_eq!(number_to_json("42"), json!(42));
        assert_eq!(number_to_json("-7"), json!(-7));
        assert_eq!(number_to_json("18446744073709551615"), json!(u64::MAX));
        assert!(number_to_json("42").is_i64());
    }

    #[test]
    fn test_decimal_numbers_become_floats() {
        assert_eq!(number_to_json("3.25"), json!(3.25));
        assert_eq!(number_to_json("1E+2"), json!(100.0));
    }

    #[test]
    fn test_unrepresentable_number_kept_as_string() {
        assert_eq!(number_to_json("1e400"), json!("1e400"));
    }

    #[test]
    fn test_nested_item_to_record() {
        let mut inner = HashMap::new();
        inner.insert("city".to_string(), AttributeValue::S("Oslo".to_string()));
        inner.insert("zip".to_string(), AttributeValue::N("150".to_string()));

        let mut item = HashMap::new();
        item.insert("studentId".to_string(), AttributeValue::S("1".to_string()));
        item.insert("gpa".to_string(), AttributeValue::N("3.5".to_string()));
        item.insert("active".to_string(), AttributeValue::Bool(true));
        item.insert("nickname".to_string(), AttributeValue::Null(true));
        item.insert("address".to_string(), AttributeValue::M(inner));
        item.insert(
            "scores".to_string(),
            AttributeValue::L(vec![
                AttributeValue::N("90".to_string()),
                AttributeValue::N("85.5".to_string()),
            ]),
        );
        item.insert(
            "tags".to_string(),
            AttributeValue::Ss(vec!["a".to_string(), "b".to_string()]),
        );
        item.insert(
            "avatar".to_string(),
            AttributeValue::B(Blob::new(b"hi".to_vec())),
        );

        let record = item_to_record(&item).unwrap();

        assert_eq!(
            JsonValue::Object(record),
            json!({
                "studentId": "1",
                "gpa": 3.5,
                "active": true,
                "nickname": null,
                "address": {"city": "Oslo", "zip": 150},
                "scores": [90, 85.5],
                "tags": ["a", "b"],
                "avatar": "aGk="
            })
        );
    }

    #[test]
    fn test_json_to_attribute_shapes() {
        let value = json!({"name": "Alice", "age": 20, "tags": ["x"], "gone": null});

        let AttributeValue::M(map) = json_to_attribute(&value) else {
            panic!("expected a map attribute");
        };
        assert_eq!(map["name"], AttributeValue::S("Alice".to_string()));
        assert_eq!(map["age"], AttributeValue::N("20".to_string()));
        assert_eq!(
            map["tags"],
            AttributeValue::L(vec![AttributeValue::S("x".to_string())])
        );
        assert_eq!(map["gone"], AttributeValue::Null(true));
    }
}
