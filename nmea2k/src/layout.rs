use std::fmt;

use crate::error::N2kError;

/// Width and encoding of a single field in a fixed-layout record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Opaque bytes copied as-is
    Raw(usize),
    /// Little-endian unsigned 32-bit integer
    Uint32,
    /// Little-endian unsigned 16-bit integer
    Uint16,
}

impl FieldKind {
    pub const fn width(&self) -> usize {
        match self {
            FieldKind::Raw(len) => *len,
            FieldKind::Uint32 => 4,
            FieldKind::Uint16 => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Ordered list of fields making up one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub pgn: u32,
    pub fields: &'static [FieldSpec],
}

/// PGN 129039 - AIS Class B Position Report (26 bytes)
pub const PGN_129039_LAYOUT: Layout = Layout {
    pgn: 129039,
    fields: &[
        FieldSpec::new("messageIdAndRepeatIndicator", FieldKind::Raw(1)),
        FieldSpec::new("mmsi", FieldKind::Uint32),
        FieldSpec::new("longitude", FieldKind::Uint32),
        FieldSpec::new("latitude", FieldKind::Uint32),
        FieldSpec::new("accuracyRaimTimestamp", FieldKind::Raw(1)),
        FieldSpec::new("cog", FieldKind::Uint16),
        FieldSpec::new("sog", FieldKind::Uint16),
        FieldSpec::new("comms", FieldKind::Raw(3)),
        FieldSpec::new("heading", FieldKind::Uint16),
        FieldSpec::new("regApp", FieldKind::Raw(1)),
        FieldSpec::new("misc", FieldKind::Raw(2)),
    ],
};

impl Layout {
    /// Total number of bytes in one record
    pub fn width(&self) -> usize {
        self.fields.iter().map(|f| f.kind.width()).sum()
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Decode exactly one record from `data`, which must be `width()` bytes long
    pub fn decode_record(&self, data: &[u8]) -> Result<Record, N2kError> {
        if data.len() != self.width() {
            return Err(N2kError::LengthMismatch {
                expected: self.width(),
                actual: data.len(),
            });
        }

        let mut record = Record::with_capacity(self.fields.len());
        let mut offset = 0;
        for spec in self.fields {
            let end = offset + spec.kind.width();
            let chunk = &data[offset..end];
            let value = match spec.kind {
                FieldKind::Raw(_) => FieldValue::Bytes(chunk.to_vec()),
                FieldKind::Uint32 => {
                    FieldValue::U32(u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                }
                FieldKind::Uint16 => FieldValue::U16(u16::from_le_bytes([chunk[0], chunk[1]])),
            };
            record.set(spec.name, value);
            offset = end;
        }
        Ok(record)
    }

    /// Serialize `record` in layout order. Every field must be present with a matching kind.
    pub fn encode_record(&self, record: &Record) -> Result<Vec<u8>, N2kError> {
        let mut out = Vec::with_capacity(self.width());
        for spec in self.fields {
            let value = record.get(spec.name).ok_or(N2kError::MissingField(spec.name))?;
            match (spec.kind, value) {
                (FieldKind::Raw(len), FieldValue::Bytes(bytes)) if bytes.len() == len => {
                    out.extend_from_slice(bytes)
                }
                (FieldKind::Uint32, FieldValue::U32(v)) => out.extend_from_slice(&v.to_le_bytes()),
                (FieldKind::Uint16, FieldValue::U16(v)) => out.extend_from_slice(&v.to_le_bytes()),
                _ => return Err(N2kError::FieldKindMismatch(spec.name)),
            }
        }
        Ok(out)
    }
}

/// Decoded value of one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Bytes(Vec<u8>),
    U32(u32),
    U16(u16),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldValue::Bytes(bytes) => {
                let hex: Vec<String> = bytes.iter().map(|b| format!("{:02x}", b)).collect();
                write!(f, "[{}]", hex.join(" "))
            }
            FieldValue::U32(v) => write!(f, "{}", v),
            FieldValue::U16(v) => write!(f, "{}", v),
        }
    }
}

/// Field name to value mapping, kept in the order fields were set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(&'static str, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Insert or replace the value stored under `name`
    pub fn set(&mut self, name: &'static str, value: FieldValue) {
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn bytes(&self, name: &str) -> Option<&[u8]> {
        match self.get(name)? {
            FieldValue::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn u32(&self, name: &str) -> Option<u32> {
        match self.get(name)? {
            FieldValue::U32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn u16(&self, name: &str) -> Option<u16> {
        match self.get(name)? {
            FieldValue::U16(v) => Some(*v),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (*n, v))
    }
}
