use tracing::debug;

use crate::actisense::parse_actisense;
use crate::error::N2kError;
use crate::layout::{Layout, PGN_129039_LAYOUT, Record};
use crate::stream_reader::RecordStreamReader;

/// Known-good PGN 129039 report. Supplies the values of every field the encoder
/// does not compute (comms state, message type flags, heading, reserved bits).
pub const SAMPLE_129039: &str = "2014-08-15T19:00:00.363,4,129039,43,255,26,12,44,11,b6,0d,32,83,be,0e,5b,4f,99,23,03,ac,87,3e,01,06,00,26,ff,ff,00,74,ff";

/// Field whose presence marks a usable template record
const MARKER_FIELD: &str = "messageIdAndRepeatIndicator";

/// A fully decoded sample record used as the baseline for encoding.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    layout: Layout,
    record: Record,
}

impl Template {
    /// Decode the built-in PGN 129039 sample
    pub fn from_sample() -> Result<Self, N2kError> {
        Self::from_actisense(PGN_129039_LAYOUT, SAMPLE_129039)
    }

    /// Decode the first record of an Actisense line with `layout`
    pub fn from_actisense(layout: Layout, line: &str) -> Result<Self, N2kError> {
        let frame = parse_actisense(line).map_err(|e| {
            debug!("Template sample rejected: {}", e);
            N2kError::TemplateUnavailable
        })?;

        let mut reader = RecordStreamReader::new(layout);
        reader.write(&frame.data);
        let record = reader
            .find(|r| r.get(MARKER_FIELD).is_some())
            .ok_or(N2kError::TemplateUnavailable)?;

        debug!("Captured PGN {} template with {} fields", layout.pgn, record.len());
        Ok(Self { layout, record })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn record(&self) -> &Record {
        &self.record
    }
}
