//! Type-directed decoding of JSON data into native values.
//!
//! The descriptor drives the walk: each shape variant admits exactly the
//! JSON kinds it declares and rejects everything else with a Type-class
//! error. Union members are tried first-match in declaration order, and
//! only shape errors (Type- and Key-class) advance the loop; a Value-class
//! failure inside a member is final because the member already claimed the
//! input's shape.

use std::collections::{BTreeMap, BTreeSet};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use uuid::Uuid;

use shapewire_core::{
    inspect, CodecError, Descriptor, EnumDescriptor, EnumLiteral, EnumValue, FieldDescriptor,
    JsonValue, Primitive, RecordDescriptor, RecordValue, Value,
};

use crate::timetext;
use crate::NamingPolicy;

pub(crate) fn decode_value(
    desc: &Descriptor,
    data: &JsonValue,
    naming: NamingPolicy,
) -> Result<Value, CodecError> {
    match desc {
        Descriptor::Primitive(p) => decode_primitive(*p, data),
        Descriptor::Optional(inner) => {
            if data.is_null() {
                Ok(Value::None)
            } else {
                decode_value(inner, data, naming)
            }
        }
        Descriptor::Union(members) => {
            for member in members {
                match decode_value(member, data, naming) {
                    Ok(value) => return Ok(value),
                    Err(err) if err.is_shape_error() => continue,
                    Err(err) => return Err(err),
                }
            }
            Err(CodecError::NoUnionMatch {
                type_name: desc.to_string(),
                data: data.to_string(),
            })
        }
        Descriptor::List(item) => match data {
            JsonValue::Array(elements) => elements
                .iter()
                .map(|element| decode_value(item, element, naming))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            _ => Err(type_mismatch(desc, "array", data)),
        },
        Descriptor::Set(item) => match data {
            JsonValue::Array(elements) => {
                let mut set = BTreeSet::new();
                for element in elements {
                    set.insert(decode_value(item, element, naming)?);
                }
                Ok(Value::Set(set))
            }
            _ => Err(type_mismatch(desc, "array", data)),
        },
        Descriptor::Map(key, value) => match data {
            JsonValue::Object(entries) => {
                let mut map = BTreeMap::new();
                for (k, v) in entries {
                    map.insert(key_from_str(key, k)?, decode_value(value, v, naming)?);
                }
                Ok(Value::Map(map))
            }
            _ => Err(type_mismatch(desc, "object", data)),
        },
        Descriptor::Tuple(members) => match data {
            JsonValue::Array(elements) => {
                if elements.len() != members.len() {
                    return Err(CodecError::LengthMismatch {
                        type_name: desc.to_string(),
                        expected: members.len(),
                        actual: elements.len(),
                        data: data.to_string(),
                    });
                }
                members
                    .iter()
                    .zip(elements)
                    .map(|(member, element)| decode_value(member, element, naming))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Tuple)
            }
            _ => Err(type_mismatch(desc, "array", data)),
        },
        Descriptor::Enum(e) => decode_enum(e, data),
        Descriptor::Record(r) => decode_record(r, data, naming),
        Descriptor::Annotated(inner, _) => decode_value(inner, data, naming),
        Descriptor::Custom(codec) => (codec.from_json)(data),
    }
}

fn decode_primitive(p: Primitive, data: &JsonValue) -> Result<Value, CodecError> {
    match p {
        Primitive::Null => match data {
            JsonValue::Null => Ok(Value::None),
            _ => Err(primitive_mismatch(p, "null", data)),
        },
        Primitive::Bool => match data {
            JsonValue::Bool(b) => Ok(Value::Bool(*b)),
            _ => Err(primitive_mismatch(p, "boolean", data)),
        },
        // a JSON number is admissible as int only when it is integral
        Primitive::Int => match data {
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Ok(Value::Int(i)),
                None if n.is_u64() => Err(CodecError::InvalidValue {
                    type_name: "int".to_string(),
                    message: format!("integer {} is out of range", n),
                }),
                None => Err(primitive_mismatch(p, "integer number", data)),
            },
            _ => Err(primitive_mismatch(p, "integer number", data)),
        },
        Primitive::Float => match data.as_f64() {
            Some(f) => Ok(Value::float(f)),
            None => Err(primitive_mismatch(p, "number", data)),
        },
        Primitive::Str => match data {
            JsonValue::String(s) => Ok(Value::str(s.clone())),
            _ => Err(primitive_mismatch(p, "string", data)),
        },
        Primitive::Bytes => {
            let text = require_str(p, data)?;
            BASE64
                .decode(text)
                .map(Value::Bytes)
                .map_err(|e| CodecError::InvalidValue {
                    type_name: "bytes".to_string(),
                    message: format!("invalid Base64 payload: {}", e),
                })
        }
        Primitive::Date => timetext::parse_date(require_str(p, data)?).map(Value::Date),
        Primitive::Time => timetext::parse_time(require_str(p, data)?).map(Value::Time),
        Primitive::DateTime => {
            timetext::parse_datetime(require_str(p, data)?).map(Value::DateTime)
        }
        Primitive::Uuid => {
            let text = require_str(p, data)?;
            Uuid::parse_str(text)
                .map(Value::Uuid)
                .map_err(|e| CodecError::InvalidValue {
                    type_name: "uuid".to_string(),
                    message: format!("`{}` is not a UUID: {}", text, e),
                })
        }
    }
}

// any non-member input is a Value-class failure, wrong JSON kind included;
// an enum that claims a union slot never falls through to later members
fn decode_enum(desc: &EnumDescriptor, data: &JsonValue) -> Result<Value, CodecError> {
    let not_a_member = || CodecError::InvalidValue {
        type_name: desc.name.clone(),
        message: format!("{} is not among the enumeration values", data),
    };
    let literal = match data {
        JsonValue::Number(n) => n.as_i64().map(EnumLiteral::Int),
        JsonValue::String(s) => Some(EnumLiteral::Str(s.clone())),
        _ => None,
    }
    .ok_or_else(not_a_member)?;
    match desc.variant_for(&literal) {
        Some(variant) => Ok(Value::Enum(EnumValue {
            type_name: desc.name.clone(),
            variant: variant.name.clone(),
            value: literal,
        })),
        None => Err(not_a_member()),
    }
}

fn decode_record(
    desc: &RecordDescriptor,
    data: &JsonValue,
    naming: NamingPolicy,
) -> Result<Value, CodecError> {
    let object = match data {
        JsonValue::Object(entries) => entries,
        _ => {
            return Err(CodecError::TypeMismatch {
                type_name: desc.name.clone(),
                expected: "object",
                data: data.to_string(),
            })
        }
    };

    let mut fields = Vec::with_capacity(desc.fields.len());
    for field in &desc.fields {
        let property = naming(&field.name);
        let value = match object.get(&property) {
            // a present field must satisfy the non-null shape; only absence
            // exercises defaults and optionality
            Some(item) => match inspect::unwrap_optional(&field.shape) {
                Some(inner) => decode_value(&inner, item, naming)?,
                None => decode_value(&field.shape, item, naming)?,
            },
            None => absent_field_value(field, &property, data)?,
        };
        fields.push((field.name.clone(), value));
    }

    let declared: BTreeSet<String> = desc.fields.iter().map(|f| naming(&f.name)).collect();
    let unknown: Vec<String> = object
        .keys()
        .filter(|key| !declared.contains(key.as_str()))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(CodecError::UnrecognizedFields {
            type_name: desc.name.clone(),
            fields: unknown,
        });
    }

    Ok(Value::Record(RecordValue::new(desc.name.clone(), fields)))
}

fn absent_field_value(
    field: &FieldDescriptor,
    property: &str,
    data: &JsonValue,
) -> Result<Value, CodecError> {
    if let Some(default) = &field.default {
        return Ok(default.clone());
    }
    if let Some(factory) = field.default_factory {
        return Ok(factory());
    }
    if inspect::is_optional(&field.shape) {
        return Ok(Value::None);
    }
    Err(CodecError::MissingProperty {
        property: property.to_string(),
        data: data.to_string(),
    })
}

/// Reconstructs a map key from its JSON object key text. Only types with an
/// unambiguous string form qualify as keys.
fn key_from_str(desc: &Descriptor, text: &str) -> Result<Value, CodecError> {
    match inspect::unwrap_annotated(desc) {
        Descriptor::Primitive(Primitive::Str) => Ok(Value::str(text)),
        Descriptor::Primitive(Primitive::Int) => text
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| key_error("int", text)),
        Descriptor::Primitive(Primitive::Float) => text
            .parse::<f64>()
            .map(Value::float)
            .map_err(|_| key_error("float", text)),
        Descriptor::Primitive(Primitive::Bool) => match text {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(key_error("bool", text)),
        },
        Descriptor::Primitive(Primitive::Uuid) => Uuid::parse_str(text)
            .map(Value::Uuid)
            .map_err(|_| key_error("uuid", text)),
        Descriptor::Primitive(Primitive::Date) => timetext::parse_date(text).map(Value::Date),
        Descriptor::Primitive(Primitive::Time) => timetext::parse_time(text).map(Value::Time),
        Descriptor::Primitive(Primitive::DateTime) => {
            timetext::parse_datetime(text).map(Value::DateTime)
        }
        Descriptor::Enum(e) => {
            let int_literal = text.parse::<i64>().ok().map(EnumLiteral::Int);
            let literal = int_literal
                .filter(|l| e.variant_for(l).is_some())
                .unwrap_or_else(|| EnumLiteral::Str(text.to_string()));
            match e.variant_for(&literal) {
                Some(variant) => Ok(Value::Enum(EnumValue {
                    type_name: e.name.clone(),
                    variant: variant.name.clone(),
                    value: literal,
                })),
                None => Err(key_error(&e.name, text)),
            }
        }
        other => Err(CodecError::UnsupportedType {
            message: format!("JSON object keys cannot be of type `{}`", other),
        }),
    }
}

fn key_error(type_name: &str, text: &str) -> CodecError {
    CodecError::InvalidValue {
        type_name: type_name.to_string(),
        message: format!("`{}` is not a valid object key", text),
    }
}

fn require_str<'a>(p: Primitive, data: &'a JsonValue) -> Result<&'a str, CodecError> {
    match data {
        JsonValue::String(s) => Ok(s),
        _ => Err(primitive_mismatch(p, "string", data)),
    }
}

fn type_mismatch(desc: &Descriptor, expected: &'static str, data: &JsonValue) -> CodecError {
    CodecError::TypeMismatch {
        type_name: desc.to_string(),
        expected,
        data: data.to_string(),
    }
}

fn primitive_mismatch(p: Primitive, expected: &'static str, data: &JsonValue) -> CodecError {
    CodecError::TypeMismatch {
        type_name: p.name().to_string(),
        expected,
        data: data.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shapewire_core::{EnumVariant, RecordDescriptor};
    use time::macros::{date, datetime, time};

    fn decode(desc: &Descriptor, data: &JsonValue) -> Result<Value, CodecError> {
        decode_value(desc, data, crate::identity)
    }

    #[test]
    fn primitives_require_exact_kinds() {
        assert_eq!(decode(&Descriptor::bool(), &json!(true)), Ok(Value::Bool(true)));
        assert_eq!(decode(&Descriptor::int(), &json!(42)), Ok(Value::Int(42)));
        assert_eq!(decode(&Descriptor::float(), &json!(2.5)), Ok(Value::float(2.5)));
        assert_eq!(decode(&Descriptor::str(), &json!("hi")), Ok(Value::str("hi")));

        // int accepts no fractional numbers, float accepts integral ones
        assert!(matches!(
            decode(&Descriptor::int(), &json!(2.5)),
            Err(CodecError::TypeMismatch { .. })
        ));
        assert_eq!(decode(&Descriptor::float(), &json!(2)), Ok(Value::float(2.0)));

        assert!(matches!(
            decode(&Descriptor::int(), &json!("42")),
            Err(CodecError::TypeMismatch { .. })
        ));
        assert!(matches!(
            decode(&Descriptor::bool(), &json!(1)),
            Err(CodecError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn bytes_are_base64() {
        assert_eq!(
            decode(&Descriptor::bytes(), &json!("aGVsbG8=")),
            Ok(Value::Bytes(b"hello".to_vec()))
        );
        assert!(matches!(
            decode(&Descriptor::bytes(), &json!("not base64!")),
            Err(CodecError::InvalidValue { .. })
        ));
    }

    #[test]
    fn temporal_primitives() {
        assert_eq!(
            decode(&Descriptor::date(), &json!("2021-04-05")),
            Ok(Value::Date(date!(2021-04-05)))
        );
        assert_eq!(
            decode(&Descriptor::time(), &json!("06:07:08")),
            Ok(Value::Time(time!(06:07:08)))
        );
        assert_eq!(
            decode(&Descriptor::datetime(), &json!("2021-04-05T06:07:08Z")),
            Ok(Value::DateTime(datetime!(2021-04-05 06:07:08 UTC)))
        );
        assert!(matches!(
            decode(&Descriptor::datetime(), &json!("2021-04-05T06:07:08")),
            Err(CodecError::MissingTimeZone { .. })
        ));
    }

    #[test]
    fn optional_accepts_null() {
        let desc = Descriptor::optional(Descriptor::int());
        assert_eq!(decode(&desc, &json!(null)), Ok(Value::None));
        assert_eq!(decode(&desc, &json!(7)), Ok(Value::Int(7)));
        assert!(matches!(
            decode(&desc, &json!("7")),
            Err(CodecError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn union_takes_first_matching_member() {
        let desc = Descriptor::union(vec![Descriptor::int(), Descriptor::str()]).unwrap();
        assert_eq!(decode(&desc, &json!(5)), Ok(Value::Int(5)));
        assert_eq!(decode(&desc, &json!("five")), Ok(Value::str("five")));
        match decode(&desc, &json!(true)) {
            Err(CodecError::NoUnionMatch { type_name, .. }) => {
                assert_eq!(type_name, "union<int, str>");
            }
            other => panic!("expected no union match, got {:?}", other),
        }
    }

    #[test]
    fn union_does_not_retry_past_value_errors() {
        // datetime claims the string shape; its bad content must not fall
        // through to the str member
        let desc = Descriptor::union(vec![Descriptor::datetime(), Descriptor::str()]).unwrap();
        assert!(matches!(
            decode(&desc, &json!("2021-04-05T06:07:08")),
            Err(CodecError::MissingTimeZone { .. })
        ));
        assert_eq!(
            decode(&desc, &json!("2021-04-05T06:07:08Z")),
            Ok(Value::DateTime(datetime!(2021-04-05 06:07:08 UTC)))
        );
    }

    #[test]
    fn containers() {
        assert_eq!(
            decode(&Descriptor::list(Descriptor::int()), &json!([1, 2, 3])),
            Ok(Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]))
        );

        match decode(&Descriptor::set(Descriptor::int()), &json!([3, 1, 3])) {
            Ok(Value::Set(set)) => {
                assert_eq!(set.len(), 2);
                assert!(set.contains(&Value::Int(1)));
            }
            other => panic!("expected set, got {:?}", other),
        }

        match decode(
            &Descriptor::map(Descriptor::int(), Descriptor::str()),
            &json!({"2": "b", "1": "a"}),
        ) {
            Ok(Value::Map(map)) => {
                assert_eq!(map.get(&Value::Int(1)), Some(&Value::str("a")));
                assert_eq!(map.get(&Value::Int(2)), Some(&Value::str("b")));
            }
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[test]
    fn tuple_arity_is_enforced() {
        let desc = Descriptor::tuple(vec![Descriptor::int(), Descriptor::str()]);
        assert_eq!(
            decode(&desc, &json!([1, "a"])),
            Ok(Value::Tuple(vec![Value::Int(1), Value::str("a")]))
        );
        match decode(&desc, &json!([1, "a", true])) {
            Err(CodecError::LengthMismatch {
                expected, actual, ..
            }) => {
                assert_eq!((expected, actual), (2, 3));
            }
            other => panic!("expected length mismatch, got {:?}", other),
        }
        assert!(matches!(
            decode(&desc, &json!([1])),
            Err(CodecError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn enums_decode_by_underlying_value() {
        let desc = Descriptor::enumeration(EnumDescriptor::new(
            "Suit",
            vec![
                EnumVariant::int("Diamonds", 1),
                EnumVariant::int("Hearts", 2),
            ],
        ));
        match decode(&desc, &json!(2)) {
            Ok(Value::Enum(e)) => {
                assert_eq!(e.variant, "Hearts");
                assert_eq!(e.value, EnumLiteral::Int(2));
            }
            other => panic!("expected enum, got {:?}", other),
        }
        assert!(matches!(
            decode(&desc, &json!(99)),
            Err(CodecError::InvalidValue { .. })
        ));
        // wrong JSON kind is still "not a member", not a shape mismatch
        assert!(matches!(
            decode(&desc, &json!("Hearts")),
            Err(CodecError::InvalidValue { .. })
        ));
        assert!(matches!(
            decode(&desc, &json!(true)),
            Err(CodecError::InvalidValue { .. })
        ));
    }

    #[test]
    fn union_does_not_absorb_enum_rejections() {
        let suit = Descriptor::enumeration(EnumDescriptor::new(
            "Suit",
            vec![
                EnumVariant::int("Diamonds", 1),
                EnumVariant::int("Hearts", 2),
            ],
        ));
        let desc = Descriptor::union(vec![suit, Descriptor::str()]).unwrap();

        // the member name is not a member value; the str member must not
        // rescue it
        match decode(&desc, &json!("Hearts")) {
            Err(CodecError::InvalidValue { type_name, .. }) => assert_eq!(type_name, "Suit"),
            other => panic!("expected invalid value, got {:?}", other),
        }
        assert_eq!(decode(&desc, &json!(2)).map(|v| v.type_name()), Ok("enum"));
    }

    #[test]
    fn records_are_closed() {
        let desc = Descriptor::record(RecordDescriptor::new(
            "Point",
            vec![
                FieldDescriptor::new("x", Descriptor::int()),
                FieldDescriptor::new("y", Descriptor::int()),
            ],
        ));

        match decode(&desc, &json!({"x": 1, "y": 2})) {
            Ok(Value::Record(r)) => {
                assert_eq!(r.get("x"), Some(&Value::Int(1)));
                assert_eq!(r.get("y"), Some(&Value::Int(2)));
            }
            other => panic!("expected record, got {:?}", other),
        }

        match decode(&desc, &json!({"x": 1})) {
            Err(CodecError::MissingProperty { property, .. }) => assert_eq!(property, "y"),
            other => panic!("expected missing property, got {:?}", other),
        }

        match decode(&desc, &json!({"x": 1, "y": 2, "z": 3})) {
            Err(CodecError::UnrecognizedFields { fields, .. }) => {
                assert_eq!(fields, vec!["z".to_string()]);
            }
            other => panic!("expected unrecognized fields, got {:?}", other),
        }
    }

    #[test]
    fn absent_fields_use_defaults_then_optionality() {
        let desc = Descriptor::record(RecordDescriptor::new(
            "Config",
            vec![
                FieldDescriptor::new("host", Descriptor::str()),
                FieldDescriptor::new("port", Descriptor::int()).with_default(Value::Int(80)),
                FieldDescriptor::new("tags", Descriptor::list(Descriptor::str()))
                    .with_factory(|| Value::List(Vec::new())),
                FieldDescriptor::new("note", Descriptor::optional(Descriptor::str())),
            ],
        ));

        match decode(&desc, &json!({"host": "example.org"})) {
            Ok(Value::Record(r)) => {
                assert_eq!(r.get("port"), Some(&Value::Int(80)));
                assert_eq!(r.get("tags"), Some(&Value::List(Vec::new())));
                assert_eq!(r.get("note"), Some(&Value::None));
            }
            other => panic!("expected record, got {:?}", other),
        }
    }

    #[test]
    fn present_optional_field_must_not_be_null() {
        let desc = Descriptor::record(RecordDescriptor::new(
            "Note",
            vec![FieldDescriptor::new(
                "text",
                Descriptor::optional(Descriptor::str()),
            )],
        ));
        assert!(matches!(
            decode(&desc, &json!({"text": null})),
            Err(CodecError::TypeMismatch { .. })
        ));
        match decode(&desc, &json!({"text": "hi"})) {
            Ok(Value::Record(r)) => assert_eq!(r.get("text"), Some(&Value::str("hi"))),
            other => panic!("expected record, got {:?}", other),
        }
    }

    #[test]
    fn map_keys_reject_container_key_types() {
        let desc = Descriptor::map(Descriptor::list(Descriptor::int()), Descriptor::int());
        assert!(matches!(
            decode(&desc, &json!({"[1]": 2})),
            Err(CodecError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn map_keys_parse_by_key_type() {
        assert_eq!(key_from_str(&Descriptor::str(), "a"), Ok(Value::str("a")));
        assert_eq!(key_from_str(&Descriptor::int(), "-3"), Ok(Value::Int(-3)));
        assert_eq!(
            key_from_str(&Descriptor::bool(), "true"),
            Ok(Value::Bool(true))
        );
        assert!(matches!(
            key_from_str(&Descriptor::int(), "x"),
            Err(CodecError::InvalidValue { .. })
        ));

        let suit = EnumDescriptor::new("Suit", vec![EnumVariant::int("Hearts", 2)]);
        match key_from_str(&Descriptor::enumeration(suit), "2") {
            Ok(Value::Enum(e)) => assert_eq!(e.variant, "Hearts"),
            other => panic!("expected enum key, got {:?}", other),
        }
    }
}
