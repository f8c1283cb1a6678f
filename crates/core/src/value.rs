//! The native value model.
//!
//! [`Value`] is the in-memory counterpart of a [`crate::Descriptor`]: the
//! decoder constructs and returns one, the encoder reads one. The enum is
//! totally ordered (floats via [`ordered_float::OrderedFloat`]) so sets and
//! map keys aggregate into `BTreeSet`/`BTreeMap` with no special casing.
//!
//! A timezone-naive datetime exists only here, as [`Value::LocalDateTime`].
//! The decoder never produces one and the encoder rejects it, so the "every
//! wire timestamp carries an offset" rule holds in both directions.

use std::collections::{BTreeMap, BTreeSet};

use ordered_float::OrderedFloat;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

use crate::descriptor::{CustomCodec, EnumLiteral};

/// A decoded enumeration member: the member name plus the underlying
/// constant it was matched by.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct EnumValue {
    pub type_name: String,
    pub variant: String,
    pub value: EnumLiteral,
}

/// A record instance. Fields keep declaration order; the encoder emits them
/// in this order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RecordValue {
    pub type_name: String,
    pub fields: Vec<(String, Value)>,
}

impl RecordValue {
    pub fn new(type_name: impl Into<String>, fields: Vec<(String, Value)>) -> Self {
        RecordValue {
            type_name: type_name.into(),
            fields,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

/// A value converted by a [`CustomCodec`]. Carrying the codec on the value
/// lets the value-directed encoder defer to the `to_json` hook.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CustomValue {
    pub codec: CustomCodec,
    pub value: Box<Value>,
}

/// A native value. `None` is the absent value an optional shape decodes
/// null (or a missing field) into; the encoder omits record fields holding
/// it rather than emitting an explicit null.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Str(String),
    Bytes(Vec<u8>),
    Date(Date),
    Time(Time),
    DateTime(OffsetDateTime),
    LocalDateTime(PrimitiveDateTime),
    Uuid(Uuid),
    Enum(EnumValue),
    List(Vec<Value>),
    Set(BTreeSet<Value>),
    Map(BTreeMap<Value, Value>),
    Tuple(Vec<Value>),
    Record(RecordValue),
    Custom(CustomValue),
}

impl Value {
    pub fn float(f: f64) -> Value {
        Value::Float(OrderedFloat(f))
    }

    pub fn str(s: impl Into<String>) -> Value {
        Value::Str(s.into())
    }

    /// Returns a human-readable kind name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::DateTime(_) => "datetime",
            Value::LocalDateTime(_) => "naive datetime",
            Value::Uuid(_) => "uuid",
            Value::Enum(_) => "enum",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Tuple(_) => "tuple",
            Value::Record(_) => "record",
            Value::Custom(_) => "custom",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(OrderedFloat(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}
