use nom::{bytes::complete::take, number::complete::{le_f32, le_i32}, IResult};
use serde::Serialize;

use crate::constants::{SUBBEAM_NAME_BYTES, SUBBEAM_RESERVED_BYTES};

/// One planned delivery segment of the beam, as declared in the header's
/// subbeam table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Subbeam {
    /// Control-point index the subbeam starts at.
    pub cp: i32,
    pub mu: f32,
    pub rad_time: f32,
    /// 0-based sequence index within the delivery.
    pub seq: i32,
    /// ASCII name, NUL padding stripped.
    pub name: String,
}

impl Subbeam {
    /// Parse one 560-byte subbeam record. The 32 reserved trailing bytes are
    /// consumed and discarded.
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, cp) = le_i32(input)?;
        let (input, mu) = le_f32(input)?;
        let (input, rad_time) = le_f32(input)?;
        let (input, seq) = le_i32(input)?;
        let (input, name) = take(SUBBEAM_NAME_BYTES)(input)?;
        let (input, _) = take(SUBBEAM_RESERVED_BYTES)(input)?;
        Ok((
            input,
            Subbeam {
                cp,
                mu,
                rad_time,
                seq,
                name: String::from_utf8_lossy(name).replace('\0', ""),
            },
        ))
    }
}

#[cfg(test)]
mod subbeam_test {
    use super::*;
    use crate::constants::SUBBEAM_RECORD_BYTES;

    #[test]
    fn test_parse_subbeam_record() {
        let mut raw = Vec::new();
        raw.extend_from_slice(&7i32.to_le_bytes());
        raw.extend_from_slice(&120.5f32.to_le_bytes());
        raw.extend_from_slice(&33.25f32.to_le_bytes());
        raw.extend_from_slice(&2i32.to_le_bytes());
        let mut name = b"Arc 3".to_vec();
        name.resize(SUBBEAM_NAME_BYTES, 0);
        raw.extend_from_slice(&name);
        raw.extend_from_slice(&[0xAB; SUBBEAM_RESERVED_BYTES]);
        assert_eq!(raw.len(), SUBBEAM_RECORD_BYTES);

        let (rest, sb) = Subbeam::parse(&raw).unwrap();
        assert!(rest.is_empty());
        assert_eq!(
            sb,
            Subbeam {
                cp: 7,
                mu: 120.5,
                rad_time: 33.25,
                seq: 2,
                name: "Arc 3".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_short_record_fails() {
        let raw = vec![0u8; 100];
        assert!(Subbeam::parse(&raw).is_err());
    }
}
