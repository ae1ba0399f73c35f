//! Firestore REST JSON encoding
//!
//! Values travel as single-key objects naming their type:
//!
//! | Value | Wire |
//! |-------|------|
//! | Null | `{"nullValue": null}` |
//! | Bool | `{"booleanValue": true}` |
//! | Int | `{"integerValue": "42"}` (decimal string) |
//! | Float | `{"doubleValue": 0.5}`, non-finite as `"NaN"` / `"Infinity"` / `"-Infinity"` |
//! | String | `{"stringValue": "..."}` |
//! | Bytes | `{"bytesValue": "<base64>"}` |
//! | Timestamp | `{"timestampValue": "2025-01-01T00:00:00Z"}` |
//! | Array | `{"arrayValue": {"values": [...]}}` |
//! | Map | `{"mapValue": {"fields": {...}}}` |
//!
//! On read, `referenceValue` decodes to a String and `geoPointValue` to a Map
//! of `latitude` / `longitude` floats.

use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use eventdesk_core::{Error, Fields, Result, Value};
use serde_json::{json, Map as JsonMap, Value as Json};

/// Encode one value.
pub fn encode_value(value: &Value) -> Json {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Int(i) => json!({ "integerValue": i.to_string() }),
        Value::Float(f) => {
            let wire = match serde_json::Number::from_f64(*f) {
                Some(n) => Json::Number(n),
                None if f.is_nan() => Json::String("NaN".to_string()),
                None if *f > 0.0 => Json::String("Infinity".to_string()),
                None => Json::String("-Infinity".to_string()),
            };
            json!({ "doubleValue": wire })
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Bytes(b) => {
            json!({ "bytesValue": base64::engine::general_purpose::STANDARD.encode(b) })
        }
        Value::Timestamp(t) => {
            json!({ "timestampValue": t.to_rfc3339_opts(SecondsFormat::AutoSi, true) })
        }
        Value::Array(items) => {
            let values: Vec<Json> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Map(fields) => json!({ "mapValue": { "fields": encode_fields(fields) } }),
    }
}

/// Encode a field map as the `fields` object of a document.
pub fn encode_fields(fields: &Fields) -> Json {
    Json::Object(
        fields
            .iter()
            .map(|(k, v)| (k.clone(), encode_value(v)))
            .collect::<JsonMap<String, Json>>(),
    )
}

/// Request body for create and replace calls.
pub fn document_body(fields: &Fields) -> Json {
    json!({ "fields": encode_fields(fields) })
}

/// Decode one value.
pub fn decode_value(wire: &Json) -> Result<Value> {
    let obj = wire
        .as_object()
        .ok_or_else(|| protocol("value is not an object", wire))?;
    let (kind, inner) = obj
        .iter()
        .next()
        .ok_or_else(|| protocol("value has no type key", wire))?;

    Ok(match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => Value::Bool(
            inner
                .as_bool()
                .ok_or_else(|| protocol("booleanValue", inner))?,
        ),
        "integerValue" => Value::Int(match inner {
            Json::String(s) => s.parse().map_err(|_| protocol("integerValue", inner))?,
            Json::Number(n) => n.as_i64().ok_or_else(|| protocol("integerValue", inner))?,
            _ => return Err(protocol("integerValue", inner)),
        }),
        "doubleValue" => Value::Float(match inner {
            Json::Number(n) => n.as_f64().ok_or_else(|| protocol("doubleValue", inner))?,
            Json::String(s) => match s.as_str() {
                "NaN" => f64::NAN,
                "Infinity" => f64::INFINITY,
                "-Infinity" => f64::NEG_INFINITY,
                _ => return Err(protocol("doubleValue", inner)),
            },
            _ => return Err(protocol("doubleValue", inner)),
        }),
        "stringValue" | "referenceValue" => Value::String(
            inner
                .as_str()
                .ok_or_else(|| protocol(kind, inner))?
                .to_string(),
        ),
        "bytesValue" => {
            let encoded = inner.as_str().ok_or_else(|| protocol("bytesValue", inner))?;
            Value::Bytes(
                base64::engine::general_purpose::STANDARD
                    .decode(encoded)
                    .map_err(|_| protocol("bytesValue", inner))?,
            )
        }
        "timestampValue" => {
            let text = inner
                .as_str()
                .ok_or_else(|| protocol("timestampValue", inner))?;
            Value::Timestamp(
                DateTime::parse_from_rfc3339(text)
                    .map_err(|_| protocol("timestampValue", inner))?
                    .with_timezone(&Utc),
            )
        }
        "arrayValue" => Value::Array(match inner.get("values") {
            Some(Json::Array(items)) => items.iter().map(decode_value).collect::<Result<_>>()?,
            Some(other) => return Err(protocol("arrayValue", other)),
            None => Vec::new(),
        }),
        "mapValue" => Value::Map(match inner.get("fields") {
            Some(fields) => decode_fields(fields)?,
            None => Fields::new(),
        }),
        "geoPointValue" => {
            let mut point = Fields::new();
            for axis in ["latitude", "longitude"] {
                let coord = inner.get(axis).and_then(Json::as_f64).unwrap_or(0.0);
                point.insert(axis.to_string(), Value::Float(coord));
            }
            Value::Map(point)
        }
        other => return Err(Error::Protocol(format!("unknown value type '{other}'"))),
    })
}

/// Decode the `fields` object of a document.
pub fn decode_fields(wire: &Json) -> Result<Fields> {
    let obj = wire
        .as_object()
        .ok_or_else(|| protocol("fields is not an object", wire))?;
    obj.iter()
        .map(|(k, v)| Ok((k.clone(), decode_value(v)?)))
        .collect()
}

/// Decode a document resource into its id and fields.
///
/// Documents without a `fields` key are empty.
pub fn decode_document(doc: &Json) -> Result<(String, Fields)> {
    let name = doc
        .get("name")
        .and_then(Json::as_str)
        .ok_or_else(|| protocol("document has no name", doc))?;
    let fields = match doc.get("fields") {
        Some(fields) => decode_fields(fields)?,
        None => Fields::new(),
    };
    Ok((id_from_name(name).to_string(), fields))
}

/// Last segment of a resource name.
pub fn id_from_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

fn protocol(what: &str, wire: &Json) -> Error {
    let mut shown = wire.to_string();
    if shown.len() > 120 {
        shown = shown.chars().take(120).collect();
    }
    Error::Protocol(format!("malformed {what}: {shown}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    #[test]
    fn test_encode_scalars() {
        assert_eq!(encode_value(&Value::Int(42)), json!({"integerValue": "42"}));
        assert_eq!(encode_value(&Value::Null), json!({"nullValue": null}));
        assert_eq!(encode_value(&Value::from("hi")), json!({"stringValue": "hi"}));
        assert_eq!(
            encode_value(&Value::Bytes(b"hello".to_vec())),
            json!({"bytesValue": "aGVsbG8="})
        );
        assert_eq!(
            encode_value(&Value::Float(f64::NEG_INFINITY)),
            json!({"doubleValue": "-Infinity"})
        );
    }

    #[test]
    fn test_encode_timestamp_uses_zulu() {
        let t = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        assert_eq!(
            encode_value(&Value::Timestamp(t)),
            json!({"timestampValue": "2025-06-01T08:00:00Z"})
        );
    }

    #[test]
    fn test_decode_document_fixture() {
        let doc = json!({
            "name": "projects/demo/databases/(default)/documents/clients/acme/attendees/abc123",
            "fields": {
                "fullName": {"stringValue": "John Doe"},
                "registeredAt": {"timestampValue": "2025-06-01T08:00:00.123456Z"},
                "count": {"integerValue": "7"},
                "score": {"doubleValue": 1.5},
                "tags": {"arrayValue": {"values": [{"stringValue": "a"}]}},
                "empty": {"arrayValue": {}},
                "meta": {"mapValue": {"fields": {"vip": {"booleanValue": true}}}},
                "venue": {"referenceValue": "projects/demo/databases/(default)/documents/venues/v1"},
                "where": {"geoPointValue": {"latitude": 1.0, "longitude": 2.0}}
            },
            "createTime": "2025-06-01T08:00:00Z",
            "updateTime": "2025-06-01T08:00:00Z"
        });

        let (id, fields) = decode_document(&doc).unwrap();
        assert_eq!(id, "abc123");
        assert_eq!(fields.get("fullName"), Some(&Value::from("John Doe")));
        assert_eq!(fields.get("count"), Some(&Value::Int(7)));
        assert_eq!(fields.get("score"), Some(&Value::Float(1.5)));
        assert_eq!(fields.get("empty"), Some(&Value::Array(vec![])));
        assert!(matches!(fields.get("registeredAt"), Some(Value::Timestamp(_))));
        assert_eq!(
            fields.get("tags"),
            Some(&Value::from(vec!["a".to_string()]))
        );

        let mut meta = HashMap::new();
        meta.insert("vip".to_string(), Value::Bool(true));
        assert_eq!(fields.get("meta"), Some(&Value::Map(meta)));
        assert!(fields.get("venue").and_then(Value::as_str).is_some());
        assert!(fields.get("where").and_then(Value::as_map).is_some());
    }

    #[test]
    fn test_decode_document_without_fields() {
        let doc = json!({"name": "projects/p/databases/(default)/documents/clients/acme/sessions/s1"});
        let (id, fields) = decode_document(&doc).unwrap();
        assert_eq!(id, "s1");
        assert!(fields.is_empty());
    }

    #[test]
    fn test_decode_rejects_unknown_type() {
        assert!(matches!(
            decode_value(&json!({"vectorValue": {}})),
            Err(Error::Protocol(_))
        ));
        assert!(decode_value(&json!({"integerValue": "forty"})).is_err());
        assert!(decode_value(&json!("bare")).is_err());
    }

    #[test]
    fn test_nested_values_round_trip() {
        let mut inner = Fields::new();
        inner.insert("n".to_string(), Value::Int(-3));
        inner.insert("bytes".to_string(), Value::Bytes(vec![0, 255]));
        let value = Value::Array(vec![Value::Map(inner), Value::Null, Value::Bool(false)]);
        assert_eq!(decode_value(&encode_value(&value)).unwrap(), value);
    }
}
