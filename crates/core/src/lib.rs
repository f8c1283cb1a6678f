//! Type descriptors, native values and inspection utilities.
//!
//! This crate holds the data model of the codec: [`Descriptor`] describes
//! the shape of a convertible type, [`Value`] is the in-memory value the
//! decoder produces and the encoder consumes, and [`inspect`] classifies
//! descriptors without the caller matching on variants directly.
//!
//! Descriptors are finite trees. Recursive type graphs are out of scope;
//! constructing a cyclic descriptor is not expressible with the owned-tree
//! representation, and deeply nested descriptors recurse without an explicit
//! depth guard.

pub mod descriptor;
pub mod error;
pub mod inspect;
pub mod value;

/// The JSON document type the codec reads and writes.
pub type JsonValue = serde_json::Value;

pub use descriptor::{
    Annotation, CustomCodec, Descriptor, EnumDescriptor, EnumLiteral, EnumVariant,
    FieldDescriptor, FromJsonFn, Primitive, RecordDescriptor, RecordKind, ToJsonFn,
};
pub use error::{CodecError, ErrorKind};
pub use value::{CustomValue, EnumValue, RecordValue, Value};
