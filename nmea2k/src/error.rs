use thiserror::Error;

/// Errors raised while decoding, encoding or formatting NMEA2000 records
#[derive(Debug, Error, PartialEq)]
pub enum N2kError {
    #[error("malformed hex byte '{0}'")]
    MalformedHex(String),

    #[error("serial line has {0} fields, expected at least 6 header fields")]
    TruncatedLine(usize),

    #[error("invalid {field} '{value}' in serial header")]
    InvalidHeader { field: &'static str, value: String },

    #[error("record length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("PGN mismatch: expected {expected}, got {actual}")]
    PgnMismatch { expected: u32, actual: u32 },

    #[error("record is missing field '{0}'")]
    MissingField(&'static str),

    #[error("field '{0}' does not match its layout kind")]
    FieldKindMismatch(&'static str),

    #[error("value {value} for field '{field}' is out of range")]
    ValueOutOfRange { field: &'static str, value: f64 },

    #[error("value for field '{0}' is not a finite number")]
    NonFinite(&'static str),

    #[error("template unavailable: sample record did not decode")]
    TemplateUnavailable,
}
