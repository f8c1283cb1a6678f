//! Error taxonomy for descriptor construction, decoding and encoding.
//!
//! The four kinds are deliberately distinct so callers (and the union
//! resolution loop) can discriminate recoverable shape mismatches from data
//! invalidity. Type- and Key-class failures are the "try the next union
//! member" signals; Value-class failures mean "right shape, bad data" and
//! are final; Unsupported failures are construction-time and never retried.

/// Coarse classification of a [`CodecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The JSON value's kind does not match what the descriptor requires.
    Type,
    /// A required field is missing, an object carries undeclared fields, or
    /// no union member accepted the input.
    Key,
    /// The JSON value has the right kind but invalid content.
    Value,
    /// No descriptor can be built for the requested shape.
    Unsupported,
}

/// All errors raised by the codec.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// JSON kind mismatch, e.g. object expected but array received.
    #[error("type `{type_name}` expects JSON `{expected}` data but instead received: {data}")]
    TypeMismatch {
        type_name: String,
        expected: &'static str,
        data: String,
    },

    /// A fixed-arity tuple received an array of the wrong length.
    #[error("type `{type_name}` expects {expected} elements but instead received {actual}: {data}")]
    LengthMismatch {
        type_name: String,
        expected: usize,
        actual: usize,
        data: String,
    },

    /// The native value kind has no JSON representation in this position.
    #[error("value of kind `{kind}` cannot be represented in JSON")]
    NotEncodable { kind: &'static str },

    /// A required record field is absent from the JSON object.
    #[error("missing required property `{property}` from JSON object: {data}")]
    MissingProperty { property: String, data: String },

    /// The JSON object carries keys the record does not declare.
    #[error("unrecognized fields in JSON object for type `{type_name}`: {fields:?}")]
    UnrecognizedFields {
        type_name: String,
        fields: Vec<String>,
    },

    /// Every member of a union failed to decode the input.
    #[error("type `{type_name}` could not be instantiated from: {data}")]
    NoUnionMatch { type_name: String, data: String },

    /// Right JSON kind, invalid content (bad enum value, malformed Base64,
    /// malformed UUID or timestamp text, non-finite float).
    #[error("invalid value for type `{type_name}`: {message}")]
    InvalidValue { type_name: String, message: String },

    /// A datetime without an explicit offset, in either direction.
    #[error("timestamp lacks explicit time zone designator: {value}")]
    MissingTimeZone { value: String },

    /// A descriptor cannot be built or used for the requested shape.
    #[error("unsupported type: {message}")]
    UnsupportedType { message: String },
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::TypeMismatch { .. }
            | CodecError::LengthMismatch { .. }
            | CodecError::NotEncodable { .. } => ErrorKind::Type,
            CodecError::MissingProperty { .. }
            | CodecError::UnrecognizedFields { .. }
            | CodecError::NoUnionMatch { .. } => ErrorKind::Key,
            CodecError::InvalidValue { .. } | CodecError::MissingTimeZone { .. } => {
                ErrorKind::Value
            }
            CodecError::UnsupportedType { .. } => ErrorKind::Unsupported,
        }
    }

    /// True for the failure kinds that let union resolution advance to the
    /// next member. Value-class failures are final even mid-union.
    pub fn is_shape_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Type | ErrorKind::Key)
    }
}
