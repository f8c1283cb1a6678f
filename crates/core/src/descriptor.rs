//! The type descriptor model.
//!
//! A [`Descriptor`] is an immutable, declarative description of a convertible
//! type, constructed once per type and reused across many conversions. Enum
//! and record payloads sit behind `Arc` so descriptors are cheap to clone and
//! safe to share across threads.
//!
//! The smart constructors ([`Descriptor::optional`], [`Descriptor::union`],
//! [`Descriptor::annotated`]) enforce the structural invariants: an optional
//! never directly wraps another optional, union members are never optional
//! themselves (a nullable union normalizes to `Optional(Union(..))`), and
//! nested annotation metadata flattens into a single bag.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::CodecError;
use crate::value::Value;
use crate::JsonValue;

/// Signature of a custom `to_json` hook: fully replaces the structural
/// encode algorithm for values carrying the codec.
pub type ToJsonFn = fn(&Value) -> Result<JsonValue, CodecError>;

/// Signature of a custom `from_json` hook: fully replaces the structural
/// decode algorithm for descriptors carrying the codec.
pub type FromJsonFn = fn(&JsonValue) -> Result<Value, CodecError>;

/// An opt-in pair of conversion hooks for one type. Identity is the name
/// plus the function pointers, so two codecs compare equal only when they
/// are literally the same hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CustomCodec {
    pub name: &'static str,
    pub to_json: ToJsonFn,
    pub from_json: FromJsonFn,
}

/// The leaf kinds the engine bottoms out at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Null,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    Date,
    Time,
    DateTime,
    Uuid,
}

impl Primitive {
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Null => "null",
            Primitive::Bool => "bool",
            Primitive::Int => "int",
            Primitive::Float => "float",
            Primitive::Str => "str",
            Primitive::Bytes => "bytes",
            Primitive::Date => "date",
            Primitive::Time => "time",
            Primitive::DateTime => "datetime",
            Primitive::Uuid => "uuid",
        }
    }
}

/// One metadata item on an annotated type, looked up first-match by tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub tag: String,
    pub value: JsonValue,
}

impl Annotation {
    /// Builds an annotation from any serializable metadata value.
    pub fn new(tag: impl Into<String>, value: impl Serialize) -> Result<Self, CodecError> {
        let tag = tag.into();
        let value = serde_json::to_value(value).map_err(|e| CodecError::UnsupportedType {
            message: format!("annotation `{}` is not JSON-representable: {}", tag, e),
        })?;
        Ok(Annotation { tag, value })
    }
}

/// Underlying constant value of an enumeration member. JSON narrows the
/// admissible constants to numbers and strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum EnumLiteral {
    Int(i64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    pub name: String,
    pub value: EnumLiteral,
}

impl EnumVariant {
    pub fn int(name: impl Into<String>, value: i64) -> Self {
        EnumVariant {
            name: name.into(),
            value: EnumLiteral::Int(value),
        }
    }

    pub fn str(name: impl Into<String>, value: impl Into<String>) -> Self {
        EnumVariant {
            name: name.into(),
            value: EnumLiteral::Str(value.into()),
        }
    }
}

/// An enumeration: a closed set of named constant values.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDescriptor {
    pub name: String,
    pub variants: Vec<EnumVariant>,
}

impl EnumDescriptor {
    pub fn new(name: impl Into<String>, variants: Vec<EnumVariant>) -> Self {
        EnumDescriptor {
            name: name.into(),
            variants,
        }
    }

    /// Looks up a member by its underlying constant value.
    pub fn variant_for(&self, value: &EnumLiteral) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| &v.value == value)
    }
}

/// Whether a record is an ordinary struct-like shape or a named-tuple-like
/// shape (ordered, named, positional fields). Both take the object path in
/// the codec; the marker exists so callers can distinguish them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Struct,
    NamedTuple,
}

/// One declared field of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub shape: Descriptor,
    pub default: Option<Value>,
    pub default_factory: Option<fn() -> Value>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, shape: Descriptor) -> Self {
        FieldDescriptor {
            name: name.into(),
            shape,
            default: None,
            default_factory: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_factory(mut self, factory: fn() -> Value) -> Self {
        self.default_factory = Some(factory);
        self
    }

    /// A field is required iff it has no default, no factory, and its shape
    /// is not optional.
    pub fn required(&self) -> bool {
        self.default.is_none()
            && self.default_factory.is_none()
            && !crate::inspect::is_optional(&self.shape)
    }
}

/// A fixed-field record shape. Field declaration order is significant: the
/// decoder consumes and the encoder emits fields in this order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDescriptor {
    pub name: String,
    pub kind: RecordKind,
    pub fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        RecordDescriptor {
            name: name.into(),
            kind: RecordKind::Struct,
            fields,
        }
    }

    pub fn named_tuple(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        RecordDescriptor {
            name: name.into(),
            kind: RecordKind::NamedTuple,
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// The closed set of shape variants describing any convertible type.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    Primitive(Primitive),
    Optional(Box<Descriptor>),
    Union(Vec<Descriptor>),
    List(Box<Descriptor>),
    Set(Box<Descriptor>),
    Map(Box<Descriptor>, Box<Descriptor>),
    Tuple(Vec<Descriptor>),
    Enum(Arc<EnumDescriptor>),
    Record(Arc<RecordDescriptor>),
    Annotated(Box<Descriptor>, Vec<Annotation>),
    Custom(CustomCodec),
}

impl Descriptor {
    pub fn null() -> Self {
        Descriptor::Primitive(Primitive::Null)
    }

    pub fn bool() -> Self {
        Descriptor::Primitive(Primitive::Bool)
    }

    pub fn int() -> Self {
        Descriptor::Primitive(Primitive::Int)
    }

    pub fn float() -> Self {
        Descriptor::Primitive(Primitive::Float)
    }

    pub fn str() -> Self {
        Descriptor::Primitive(Primitive::Str)
    }

    pub fn bytes() -> Self {
        Descriptor::Primitive(Primitive::Bytes)
    }

    pub fn date() -> Self {
        Descriptor::Primitive(Primitive::Date)
    }

    pub fn time() -> Self {
        Descriptor::Primitive(Primitive::Time)
    }

    pub fn datetime() -> Self {
        Descriptor::Primitive(Primitive::DateTime)
    }

    pub fn uuid() -> Self {
        Descriptor::Primitive(Primitive::Uuid)
    }

    /// Wraps a shape as optional, flattening `Optional(Optional(T))` to
    /// `Optional(T)`.
    pub fn optional(inner: Descriptor) -> Descriptor {
        match inner {
            already @ Descriptor::Optional(_) => already,
            other => Descriptor::Optional(Box::new(other)),
        }
    }

    /// Builds a union, normalizing null and optional members outward.
    ///
    /// Nested unions flatten; a null member (or an optional member) makes
    /// the whole union nullable, represented as `Optional(Union(rest))`.
    /// A union reduced to a single non-null member collapses to that member.
    /// Member order is preserved exactly as declared: decoding tries members
    /// first-match in this order.
    pub fn union(members: Vec<Descriptor>) -> Result<Descriptor, CodecError> {
        let mut flat: Vec<Descriptor> = Vec::new();
        let mut nullable = false;

        fn absorb(member: Descriptor, flat: &mut Vec<Descriptor>, nullable: &mut bool) {
            match member {
                Descriptor::Primitive(Primitive::Null) => *nullable = true,
                Descriptor::Optional(inner) => {
                    *nullable = true;
                    absorb(*inner, flat, nullable);
                }
                Descriptor::Union(inner) => {
                    for m in inner {
                        absorb(m, flat, nullable);
                    }
                }
                other => flat.push(other),
            }
        }

        for member in members {
            absorb(member, &mut flat, &mut nullable);
        }

        let core = match flat.len() {
            0 => {
                return Err(CodecError::UnsupportedType {
                    message: "union type must have at least one non-null member".to_string(),
                })
            }
            1 => flat.remove(0),
            _ => Descriptor::Union(flat),
        };

        if nullable {
            Ok(Descriptor::optional(core))
        } else {
            Ok(core)
        }
    }

    pub fn list(item: Descriptor) -> Descriptor {
        Descriptor::List(Box::new(item))
    }

    pub fn set(item: Descriptor) -> Descriptor {
        Descriptor::Set(Box::new(item))
    }

    pub fn map(key: Descriptor, value: Descriptor) -> Descriptor {
        Descriptor::Map(Box::new(key), Box::new(value))
    }

    pub fn tuple(members: Vec<Descriptor>) -> Descriptor {
        Descriptor::Tuple(members)
    }

    pub fn enumeration(desc: EnumDescriptor) -> Descriptor {
        Descriptor::Enum(Arc::new(desc))
    }

    pub fn record(desc: RecordDescriptor) -> Descriptor {
        Descriptor::Record(Arc::new(desc))
    }

    pub fn custom(codec: CustomCodec) -> Descriptor {
        Descriptor::Custom(codec)
    }

    /// Attaches annotation metadata, flattening nested annotation bags. The
    /// inner bag stays first so first-match lookup sees innermost metadata
    /// first, matching how nested annotations accumulate.
    pub fn annotated(inner: Descriptor, metadata: Vec<Annotation>) -> Descriptor {
        match inner {
            Descriptor::Annotated(core, mut bag) => {
                bag.extend(metadata);
                Descriptor::Annotated(core, bag)
            }
            other => Descriptor::Annotated(Box::new(other), metadata),
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Primitive(p) => f.write_str(p.name()),
            Descriptor::Optional(inner) => write!(f, "optional<{}>", inner),
            Descriptor::Union(members) => {
                f.write_str("union<")?;
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", m)?;
                }
                f.write_str(">")
            }
            Descriptor::List(item) => write!(f, "list<{}>", item),
            Descriptor::Set(item) => write!(f, "set<{}>", item),
            Descriptor::Map(key, value) => write!(f, "map<{}, {}>", key, value),
            Descriptor::Tuple(members) => {
                f.write_str("tuple<")?;
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", m)?;
                }
                f.write_str(">")
            }
            Descriptor::Enum(e) => f.write_str(&e.name),
            Descriptor::Record(r) => f.write_str(&r.name),
            Descriptor::Annotated(inner, _) => write!(f, "{}", inner),
            Descriptor::Custom(c) => f.write_str(c.name),
        }
    }
}
