//! Type-directed JSON decoding and value-directed JSON encoding.
//!
//! Decoding walks a [`Descriptor`] and admits exactly the JSON shapes it
//! declares, producing a [`Value`]. Encoding inspects the value's own kind
//! and needs no descriptor. The two directions agree: any value the decoder
//! produces encodes back to JSON that decodes to an equal value.
//!
//! The free functions [`decode`] and [`encode`] keep field names as
//! declared; [`JsonCodec`] additionally applies a [`NamingPolicy`] to record
//! field names in both directions.
//!
//! ```
//! use shapewire_codec::{decode, dump_compact, encode, Descriptor};
//!
//! let desc = Descriptor::list(Descriptor::int());
//! let value = decode(&desc, &serde_json::json!([1, 2, 3]))?;
//! assert_eq!(dump_compact(&encode(&value)?), "[1,2,3]");
//! # Ok::<(), shapewire_codec::CodecError>(())
//! ```

mod decode;
mod dump;
mod encode;
mod timetext;

use std::io;

pub use shapewire_core::{
    inspect, Annotation, CodecError, CustomCodec, CustomValue, Descriptor, EnumDescriptor,
    EnumLiteral, EnumValue, EnumVariant, ErrorKind, FieldDescriptor, FromJsonFn, JsonValue,
    Primitive, RecordDescriptor, RecordKind, RecordValue, ToJsonFn, Value,
};

pub use dump::{dump, dump_compact};

use decode::decode_value;
use encode::encode_value;

/// Maps a declared record field name to its JSON object key. Applied
/// symmetrically by the decoder and the encoder.
pub type NamingPolicy = fn(&str) -> String;

pub(crate) fn identity(name: &str) -> String {
    name.to_string()
}

/// Converts a snake_case field name to camelCase.
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Decodes JSON data against a descriptor, keeping field names as declared.
pub fn decode(desc: &Descriptor, data: &JsonValue) -> Result<Value, CodecError> {
    decode_value(desc, data, identity)
}

/// Encodes a native value to JSON data, keeping field names as declared.
pub fn encode(value: &Value) -> Result<JsonValue, CodecError> {
    encode_value(value, identity)
}

/// A conversion context carrying the field naming policy.
#[derive(Debug, Clone, Copy)]
pub struct JsonCodec {
    naming: NamingPolicy,
}

impl JsonCodec {
    pub fn new() -> Self {
        JsonCodec { naming: identity }
    }

    pub fn with_naming(naming: NamingPolicy) -> Self {
        JsonCodec { naming }
    }

    pub fn decode(&self, desc: &Descriptor, data: &JsonValue) -> Result<Value, CodecError> {
        decode_value(desc, data, self.naming)
    }

    pub fn encode(&self, value: &Value) -> Result<JsonValue, CodecError> {
        encode_value(value, self.naming)
    }

    /// Encodes a value and renders it as compact JSON text.
    pub fn dump_compact(&self, value: &Value) -> Result<String, CodecError> {
        Ok(dump_compact(&self.encode(value)?))
    }

    /// Encodes a value and writes it as one compact JSON line.
    pub fn dump<W: io::Write>(&self, value: &Value, writer: &mut W) -> io::Result<()> {
        let json = self
            .encode(value)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        dump(&json, writer)
    }
}

impl Default for JsonCodec {
    fn default() -> Self {
        JsonCodec::new()
    }
}
