//! Actisense ASCII serial format
//!
//! One message per line: `timestamp,priority,pgn,source,destination,length,b0,b1,...`
//! with every data byte written as two lowercase hex digits.

use chrono::Utc;

use crate::error::N2kError;

/// Timestamp written by the placeholder header
pub const PLACEHOLDER_TIMESTAMP: &str = "2014-08-15T19:00:00.363";
pub const DEFAULT_PRIORITY: u8 = 4;
pub const DEFAULT_SOURCE: u8 = 43;
pub const DEFAULT_DESTINATION: u8 = 255;

/// `2014-08-15T19:00:00.363`: no zone suffix
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Number of comma-separated header fields before the data bytes
const HEADER_FIELDS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    /// Written verbatim
    Fixed(String),
    /// Current UTC time, millisecond precision, same shape as the placeholder
    SystemClock,
}

impl Timestamp {
    fn render(&self) -> String {
        match self {
            Timestamp::Fixed(s) => s.clone(),
            Timestamp::SystemClock => Utc::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Header fields written in front of the data bytes.
///
/// The default reproduces the fixed placeholder values (timestamp, priority 4,
/// source 43, destination 255); they do not reflect a real clock or bus address.
///
/// The length field is the payload length. Every PGN 129039 payload is 26 bytes,
/// so for that PGN it is always the constant `26`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialHeader {
    pub timestamp: Timestamp,
    pub priority: u8,
    pub source: u8,
    pub destination: u8,
}

impl Default for SerialHeader {
    fn default() -> Self {
        Self {
            timestamp: Timestamp::Fixed(PLACEHOLDER_TIMESTAMP.to_string()),
            priority: DEFAULT_PRIORITY,
            source: DEFAULT_SOURCE,
            destination: DEFAULT_DESTINATION,
        }
    }
}

impl SerialHeader {
    /// Render `payload` as one Actisense line for `pgn`
    pub fn format(&self, pgn: u32, payload: &[u8]) -> String {
        let mut line = format!(
            "{},{},{},{},{},{}",
            self.timestamp.render(),
            self.priority,
            pgn,
            self.source,
            self.destination,
            payload.len()
        );
        for byte in payload {
            line.push_str(&format!(",{:02x}", byte));
        }
        line
    }
}

/// Format with the placeholder header
pub fn format_actisense(pgn: u32, payload: &[u8]) -> String {
    SerialHeader::default().format(pgn, payload)
}

/// One parsed Actisense line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialFrame {
    pub timestamp: String,
    pub priority: u8,
    pub pgn: u32,
    pub source: u8,
    pub destination: u8,
    pub data: Vec<u8>,
}

fn parse_header_field<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
) -> Result<T, N2kError> {
    value.trim().parse().map_err(|_| N2kError::InvalidHeader {
        field,
        value: value.to_string(),
    })
}

/// Parse an Actisense line. The declared length must match the number of data bytes.
pub fn parse_actisense(line: &str) -> Result<SerialFrame, N2kError> {
    let parts: Vec<&str> = line.trim().split(',').collect();
    if parts.len() < HEADER_FIELDS {
        return Err(N2kError::TruncatedLine(parts.len()));
    }

    let declared_len: usize = parse_header_field("length", parts[5])?;
    let data = parts[HEADER_FIELDS..]
        .iter()
        .map(|s| {
            let s = s.trim();
            if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(N2kError::MalformedHex(s.to_string()));
            }
            u8::from_str_radix(s, 16).map_err(|_| N2kError::MalformedHex(s.to_string()))
        })
        .collect::<Result<Vec<u8>, N2kError>>()?;

    if data.len() != declared_len {
        return Err(N2kError::LengthMismatch {
            expected: declared_len,
            actual: data.len(),
        });
    }

    Ok(SerialFrame {
        timestamp: parts[0].to_string(),
        priority: parse_header_field("priority", parts[1])?,
        pgn: parse_header_field("pgn", parts[2])?,
        source: parse_header_field("source", parts[3])?,
        destination: parse_header_field("destination", parts[4])?,
        data,
    })
}
