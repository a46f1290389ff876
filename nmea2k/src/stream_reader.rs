use tracing::trace;

use crate::layout::{Layout, Record};

/// Streaming record reader
///
/// Bytes are pushed in with [`RecordStreamReader::write`] and records are pulled out
/// by iterating the reader. Every time at least one full layout width is buffered
/// the layout is applied again, so one call to `write` can yield zero, one or many
/// records. An incomplete tail stays buffered until the next `write`.
///
/// # Usage
///
/// ```
/// use nmea2k::{RecordStreamReader, PGN_129039_LAYOUT};
///
/// let mut reader = RecordStreamReader::new(PGN_129039_LAYOUT);
/// reader.write(&[0u8; 26]);
/// let record = reader.next().unwrap();
/// assert_eq!(record.u16("heading"), Some(0));
/// assert!(reader.next().is_none());
/// ```
pub struct RecordStreamReader {
    layout: Layout,
    pending: Vec<u8>,
}

impl RecordStreamReader {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            pending: Vec::new(),
        }
    }

    /// Append raw bytes to the reader
    pub fn write(&mut self, data: &[u8]) {
        self.pending.extend_from_slice(data);
    }

    /// Number of buffered bytes not yet consumed by a record
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }
}

impl Iterator for RecordStreamReader {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        let width = self.layout.width();
        if width == 0 || self.pending.len() < width {
            return None;
        }

        let chunk: Vec<u8> = self.pending.drain(..width).collect();
        trace!("Decoding PGN {} record ({} bytes left)", self.layout.pgn, self.pending.len());
        // chunk length always equals the layout width here
        self.layout.decode_record(&chunk).ok()
    }
}

/// Decode every complete record in `data`, ignoring a trailing partial record
pub fn decode_records(layout: Layout, data: &[u8]) -> RecordStreamReader {
    let mut reader = RecordStreamReader::new(layout);
    reader.write(data);
    reader
}
