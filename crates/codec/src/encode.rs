//! Value-directed encoding of native values into JSON data.
//!
//! The value's own kind selects the representation; no descriptor is
//! consulted. Everything the decoder can produce encodes back, with two
//! deliberate exceptions: non-finite floats have no JSON literal, and
//! wall-clock datetimes without an offset would lose the timezone guarantee.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{Map, Number};

use shapewire_core::{CodecError, EnumLiteral, JsonValue, Value};

use crate::timetext;
use crate::NamingPolicy;

pub(crate) fn encode_value(value: &Value, naming: NamingPolicy) -> Result<JsonValue, CodecError> {
    match value {
        Value::None => Ok(JsonValue::Null),
        Value::Bool(b) => Ok(JsonValue::Bool(*b)),
        Value::Int(i) => Ok(JsonValue::Number(Number::from(*i))),
        Value::Float(f) => match Number::from_f64(f.0) {
            Some(n) => Ok(JsonValue::Number(n)),
            None => Err(CodecError::InvalidValue {
                type_name: "float".to_string(),
                message: format!("{} has no JSON representation", f.0),
            }),
        },
        Value::Str(s) => Ok(JsonValue::String(s.clone())),
        Value::Bytes(bytes) => Ok(JsonValue::String(BASE64.encode(bytes))),
        Value::Date(d) => timetext::format_date(*d).map(JsonValue::String),
        Value::Time(t) => timetext::format_time(*t).map(JsonValue::String),
        Value::DateTime(ts) => timetext::format_datetime(*ts).map(JsonValue::String),
        Value::LocalDateTime(ts) => Err(CodecError::MissingTimeZone {
            value: timetext::format_naive(*ts),
        }),
        Value::Uuid(u) => Ok(JsonValue::String(u.hyphenated().to_string())),
        Value::Enum(e) => match &e.value {
            EnumLiteral::Int(i) => Ok(JsonValue::Number(Number::from(*i))),
            EnumLiteral::Str(s) => Ok(JsonValue::String(s.clone())),
        },
        Value::List(items) | Value::Tuple(items) => items
            .iter()
            .map(|item| encode_value(item, naming))
            .collect::<Result<Vec<_>, _>>()
            .map(JsonValue::Array),
        Value::Set(items) => items
            .iter()
            .map(|item| encode_value(item, naming))
            .collect::<Result<Vec<_>, _>>()
            .map(JsonValue::Array),
        Value::Map(entries) => {
            let mut object = Map::with_capacity(entries.len());
            for (key, value) in entries {
                object.insert(encode_key(key)?, encode_value(value, naming)?);
            }
            Ok(JsonValue::Object(object))
        }
        // fields emit in declaration order; absent optionals are omitted
        // rather than written as null
        Value::Record(record) => {
            let mut object = Map::with_capacity(record.fields.len());
            for (name, value) in &record.fields {
                if value.is_none() {
                    continue;
                }
                object.insert(naming(name), encode_value(value, naming)?);
            }
            Ok(JsonValue::Object(object))
        }
        Value::Custom(custom) => (custom.codec.to_json)(&custom.value),
    }
}

/// Renders a map key as object key text. Containers and composites have no
/// unambiguous string form and are rejected.
fn encode_key(key: &Value) -> Result<String, CodecError> {
    match key {
        Value::Str(s) => Ok(s.clone()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) if f.0.is_finite() => Ok(f.0.to_string()),
        Value::Float(f) => Err(CodecError::InvalidValue {
            type_name: "float".to_string(),
            message: format!("{} has no JSON representation", f.0),
        }),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Uuid(u) => Ok(u.hyphenated().to_string()),
        Value::Date(d) => timetext::format_date(*d),
        Value::Time(t) => timetext::format_time(*t),
        Value::DateTime(ts) => timetext::format_datetime(*ts),
        Value::Enum(e) => match &e.value {
            EnumLiteral::Int(i) => Ok(i.to_string()),
            EnumLiteral::Str(s) => Ok(s.clone()),
        },
        other => Err(CodecError::NotEncodable {
            kind: other.type_name(),
        }),
    }
}
