//! NMEA2000 Protocol Library
//!
//! Building blocks for producing NMEA2000 AIS Class B position reports (PGN 129039):
//! - Declarative fixed-width record layouts shared by decode and encode
//! - A streaming record reader that applies a layout to a byte stream
//! - Templates captured from a known-good sample record
//! - The PGN 129039 encoder and decoder
//! - Actisense ASCII serial line formatting and parsing
//!
//! # Example
//!
//! ```
//! use nmea2k::{AisClassBPosition, Template, format_actisense};
//!
//! let template = Template::from_sample().expect("built-in sample decodes");
//! let report = AisClassBPosition::new(244060807, 4.0, 52.0, 1.57, 5.0);
//! let payload = report.encode(&template).unwrap();
//! let line = format_actisense(129039, &payload);
//! assert!(line.starts_with("2014-08-15T19:00:00.363,4,129039,43,255,26,12,87,12,8c,0e"));
//! ```

pub mod actisense;
pub mod error;
pub mod layout;
pub mod pgns;
pub mod stream_reader;
pub mod template;

// Re-export commonly used types
pub use actisense::{SerialFrame, SerialHeader, Timestamp, format_actisense, parse_actisense};
pub use error::N2kError;
pub use layout::{FieldKind, FieldSpec, FieldValue, Layout, PGN_129039_LAYOUT, Record};
pub use pgns::AisClassBPosition;
pub use stream_reader::{RecordStreamReader, decode_records};
pub use template::{SAMPLE_129039, Template};
