use std::fmt;

use crate::error::N2kError;
use crate::layout::{FieldValue, PGN_129039_LAYOUT};
use crate::template::Template;

pub const PGN: u32 = 129039;

const POSITION_SCALE: f64 = 1e7; // 1e-7 deg
const COG_SCALE: f64 = 1e4; // 1e-4 rad
const SOG_SCALE: f64 = 1e2; // 1e-2 m/s
const HEADING_NOT_AVAILABLE: u16 = 0xFFFF;

/// AIS Class B Position Report
///
/// Only mmsi, position, COG and SOG are written by [`AisClassBPosition::encode`];
/// all other bytes, heading included, are copied from the template.
#[derive(Debug, Clone, PartialEq)]
pub struct AisClassBPosition {
    pub mmsi: u32,
    pub longitude: f64, // degrees
    pub latitude: f64,  // degrees
    pub cog: f64,       // radians, expected in [0, 2π)
    pub sog: f64,       // m/s
    pub heading: Option<f64>, // radians, decode only
}

fn check_finite(field: &'static str, value: f64) -> Result<f64, N2kError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(N2kError::NonFinite(field))
    }
}

/// Scale and round half away from zero into a signed 32-bit field
fn scale_i32(field: &'static str, value: f64, scale: f64) -> Result<i32, N2kError> {
    let scaled = (check_finite(field, value)? * scale).round();
    if scaled < i32::MIN as f64 || scaled > i32::MAX as f64 {
        return Err(N2kError::ValueOutOfRange { field, value });
    }
    Ok(scaled as i32)
}

/// Scale and round into an unsigned 16-bit field, wrapping modulo 2^16
fn scale_u16_wrapping(field: &'static str, value: f64, scale: f64) -> Result<u16, N2kError> {
    let scaled = (check_finite(field, value)? * scale).round();
    Ok(scaled as i64 as u16)
}

impl AisClassBPosition {
    pub fn new(mmsi: u32, longitude: f64, latitude: f64, cog: f64, sog: f64) -> Self {
        Self {
            mmsi,
            longitude,
            latitude,
            cog,
            sog,
            heading: None,
        }
    }

    /// Decode through [`PGN_129039_LAYOUT`]; `None` if `data` is shorter than one record
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        let width = PGN_129039_LAYOUT.width();
        if data.len() < width {
            return None;
        }
        let record = PGN_129039_LAYOUT.decode_record(&data[..width]).ok()?;
        let heading = record.u16("heading")?;
        Some(Self {
            mmsi: record.u32("mmsi")?,
            longitude: record.u32("longitude")? as i32 as f64 / POSITION_SCALE,
            latitude: record.u32("latitude")? as i32 as f64 / POSITION_SCALE,
            cog: record.u16("cog")? as f64 / COG_SCALE,
            sog: record.u16("sog")? as f64 / SOG_SCALE,
            heading: if heading == HEADING_NOT_AVAILABLE {
                None
            } else {
                Some(heading as f64 / COG_SCALE)
            },
        })
    }

    /// Build the 26 byte payload on top of `template`
    pub fn encode(&self, template: &Template) -> Result<Vec<u8>, N2kError> {
        if template.layout().pgn != PGN {
            return Err(N2kError::PgnMismatch {
                expected: PGN,
                actual: template.layout().pgn,
            });
        }

        let longitude = scale_i32("longitude", self.longitude, POSITION_SCALE)?;
        let latitude = scale_i32("latitude", self.latitude, POSITION_SCALE)?;
        let cog = scale_u16_wrapping("cog", self.cog, COG_SCALE)?;
        let sog = scale_u16_wrapping("sog", self.sog, SOG_SCALE)?;

        let mut record = template.record().clone();
        record.set("mmsi", FieldValue::U32(self.mmsi));
        // signed values travel in the unsigned 32-bit slots bit-for-bit
        record.set("longitude", FieldValue::U32(longitude as u32));
        record.set("latitude", FieldValue::U32(latitude as u32));
        record.set("cog", FieldValue::U16(cog));
        record.set("sog", FieldValue::U16(sog));

        template.layout().encode_record(&record)
    }

    pub fn sog_knots(&self) -> f64 {
        self.sog * 1.94384
    }

    pub fn cog_degrees(&self) -> f64 {
        self.cog.to_degrees()
    }
}

impl fmt::Display for AisClassBPosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "      AIS B MMSI: {} | Position: {:.6}°, {:.6}° | COG: {:.2}° | SOG: {:.2} m/s ({:.2} knots)",
            self.mmsi,
            self.latitude,
            self.longitude,
            self.cog_degrees(),
            self.sog,
            self.sog_knots()
        )?;
        if let Some(heading) = self.heading {
            write!(f, " | Heading: {:.2}°", heading.to_degrees())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actisense::format_actisense;
    use crate::layout::Layout;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn template() -> Template {
        Template::from_sample().unwrap()
    }

    #[test]
    fn test_encode_known_values() {
        let report = AisClassBPosition::new(244060807, 4.0, 52.0, 1.57, 5.0);
        let bytes = report.encode(&template()).unwrap();

        assert_eq!(bytes.len(), 26);
        assert_eq!(bytes[0], 0x12);
        assert_eq!(&bytes[1..5], &[0x87, 0x12, 0x8c, 0x0e]);
        assert_eq!(&bytes[5..9], &[0x00, 0x5a, 0x62, 0x02]);
        assert_eq!(&bytes[9..13], &[0x00, 0x92, 0xfe, 0x1e]);
        assert_eq!(bytes[13], 0x03);
        assert_eq!(&bytes[14..16], &[0x54, 0x3d]); // 15700
        assert_eq!(&bytes[16..18], &[0xf4, 0x01]); // 500
        assert_eq!(&bytes[18..26], &[0x06, 0x00, 0x26, 0xff, 0xff, 0x00, 0x74, 0xff]);
    }

    #[test]
    fn test_encode_negative_position() {
        let report = AisClassBPosition::new(1, -4.0, -52.0, 0.0, 0.0);
        let bytes = report.encode(&template()).unwrap();
        assert_eq!(&bytes[5..9], &[0x00, 0xa6, 0x9d, 0xfd]);
        assert_eq!(i32::from_le_bytes([bytes[9], bytes[10], bytes[11], bytes[12]]), -520000000);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        // 0.00005 rad * 1e4 = 0.5 -> 1
        let report = AisClassBPosition::new(1, 0.0, 0.0, 0.00005, 0.005);
        let bytes = report.encode(&template()).unwrap();
        assert_eq!(u16::from_le_bytes([bytes[14], bytes[15]]), 1);
        assert_eq!(u16::from_le_bytes([bytes[16], bytes[17]]), 1);

        let report = AisClassBPosition::new(1, -0.00000025, 0.00000005, 0.0, 0.0);
        let bytes = report.encode(&template()).unwrap();
        assert_eq!(i32::from_le_bytes([bytes[5], bytes[6], bytes[7], bytes[8]]), -3);
        assert_eq!(i32::from_le_bytes([bytes[9], bytes[10], bytes[11], bytes[12]]), 1);
    }

    #[test]
    fn test_cog_wraps_as_unsigned() {
        let report = AisClassBPosition::new(1, 0.0, 0.0, -0.0001, 0.0);
        let bytes = report.encode(&template()).unwrap();
        assert_eq!(u16::from_le_bytes([bytes[14], bytes[15]]), 65535);
    }

    #[test]
    fn test_encode_rejects_non_finite() {
        let report = AisClassBPosition::new(1, f64::NAN, 0.0, 0.0, 0.0);
        assert_eq!(report.encode(&template()), Err(N2kError::NonFinite("longitude")));

        let report = AisClassBPosition::new(1, 0.0, 0.0, 0.0, f64::INFINITY);
        assert_eq!(report.encode(&template()), Err(N2kError::NonFinite("sog")));
    }

    #[test]
    fn test_encode_rejects_out_of_range_position() {
        let report = AisClassBPosition::new(1, 0.0, 500.0, 0.0, 0.0);
        assert_eq!(
            report.encode(&template()),
            Err(N2kError::ValueOutOfRange {
                field: "latitude",
                value: 500.0
            })
        );
    }

    #[test]
    fn test_encode_is_deterministic() {
        let report = AisClassBPosition::new(244060807, 4.123456, 52.654321, 3.0, 7.2);
        let template = template();
        assert_eq!(report.encode(&template).unwrap(), report.encode(&template).unwrap());
    }

    #[test]
    fn test_from_bytes_sample() {
        let bytes = template().layout().encode_record(template().record()).unwrap();
        let report = AisClassBPosition::from_bytes(&bytes).unwrap();
        assert_eq!(report.mmsi, 230035780);
        assert_abs_diff_eq!(report.longitude, 24.7366450, epsilon = 1e-9);
        assert_abs_diff_eq!(report.latitude, 59.7249883, epsilon = 1e-9);
        assert_abs_diff_eq!(report.cog, 3.4732, epsilon = 1e-9);
        assert_abs_diff_eq!(report.sog, 3.18, epsilon = 1e-9);
        assert!(report.heading.is_none());
    }

    #[test]
    fn test_from_bytes_insufficient_data() {
        assert!(AisClassBPosition::from_bytes(&[0x12; 10]).is_none());
        assert!(AisClassBPosition::from_bytes(&[0x12; 25]).is_none());
    }

    #[test]
    fn test_from_bytes_follows_layout_offsets() {
        let mut record = template().record().clone();
        record.set("longitude", FieldValue::U32(-40_000_000i32 as u32));
        record.set("heading", FieldValue::U16(15700));
        let mut bytes = PGN_129039_LAYOUT.encode_record(&record).unwrap();
        // trailing bytes beyond one record are ignored
        bytes.extend_from_slice(&[0xaa, 0xbb]);

        let report = AisClassBPosition::from_bytes(&bytes).unwrap();
        assert_eq!(report.mmsi, 230035780);
        assert_abs_diff_eq!(report.longitude, -4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(report.heading.unwrap(), 1.57, epsilon = 1e-9);
    }

    #[test]
    fn test_encode_rejects_foreign_template() {
        const OTHER_LAYOUT: Layout = Layout {
            pgn: 129038,
            fields: PGN_129039_LAYOUT.fields,
        };
        let bytes = template().layout().encode_record(template().record()).unwrap();
        let line = format_actisense(129038, &bytes);
        let foreign = Template::from_actisense(OTHER_LAYOUT, &line).unwrap();
        let report = AisClassBPosition::new(1, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(
            report.encode(&foreign),
            Err(N2kError::PgnMismatch {
                expected: 129039,
                actual: 129038
            })
        );
    }

    #[test]
    fn test_encode_then_from_bytes() {
        let report = AisClassBPosition::new(244060807, 4.0, 52.0, 1.57, 5.0);
        let decoded = AisClassBPosition::from_bytes(&report.encode(&template()).unwrap()).unwrap();
        assert_eq!(decoded.mmsi, 244060807);
        assert_abs_diff_eq!(decoded.longitude, 4.0, epsilon = 1e-7);
        assert_abs_diff_eq!(decoded.latitude, 52.0, epsilon = 1e-7);
        assert_abs_diff_eq!(decoded.cog, 1.57, epsilon = 1e-4);
        assert_abs_diff_eq!(decoded.sog, 5.0, epsilon = 1e-2);
    }

    proptest! {
        #[test]
        fn prop_position_survives_layout_decode(lon in -180.0f64..=180.0, lat in -90.0f64..=90.0) {
            let template = template();
            let bytes = AisClassBPosition::new(244060807, lon, lat, 1.0, 1.0)
                .encode(&template)
                .unwrap();
            let record = PGN_129039_LAYOUT.decode_record(&bytes).unwrap();
            prop_assert_eq!(record.u32("longitude").unwrap() as i32, (lon * 1e7).round() as i32);
            prop_assert_eq!(record.u32("latitude").unwrap() as i32, (lat * 1e7).round() as i32);
            prop_assert_eq!(record.u16("heading"), Some(65535));
        }
    }
}
