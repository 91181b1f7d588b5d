//! PGN Matcher (`C8`): selects the catalog entry whose match-fields agree
//! with a raw payload, or synthesises a placeholder for unknown PGNs.
use crate::bits::BitReader;
use crate::core::{Completeness, FieldSpec, PacketType, PgnSpec, Signedness};
use crate::error::MatchError;

use super::Catalog;

/// Resolve a PGN id + payload against the catalog.
///
/// If no entries declare match-fields, the first catalog entry for the PGN
/// wins. Otherwise every match-field's extracted value must agree with the
/// unit's declared constant for that entry to be selected.
pub fn resolve<'c>(
    catalog: &'c Catalog,
    pgn: u32,
    payload: &[u8],
) -> Result<&'c PgnSpec, MatchError> {
    let mut candidates: Vec<&PgnSpec> = catalog.entries_for(pgn).collect();
    if candidates.is_empty() {
        return Err(MatchError::UnknownPgn { pgn });
    }
    if candidates.len() == 1 {
        return Ok(candidates[0]);
    }

    candidates.retain(|spec| match_fields_agree(spec, payload));
    candidates
        .into_iter()
        .next()
        .ok_or(MatchError::NoMatchFieldAgreement { pgn })
}

fn match_fields_agree(spec: &PgnSpec, payload: &[u8]) -> bool {
    let mut start_bit: u32 = 0;
    for field in spec.fields {
        let bits = field.bits.unwrap_or(8);
        if let Some(expected) = field.match_value() {
            let mut reader = BitReader::new(payload);
            reader.seek(start_bit as usize);
            let Ok(raw) = reader.read_u64(bits.min(64) as u8) else {
                return false;
            };
            let value = if matches!(field.signed, Signedness::Signed) {
                crate::bits::sign_extend(raw, bits.min(64) as u8)
            } else {
                raw as i64
            };
            if value != expected {
                return false;
            }
        }
        start_bit += bits;
    }
    true
}

/// Synthesise a placeholder PGN entry for an id absent from the catalog, so
/// that downstream code can still emit the payload as raw bytes (spec S4.8).
pub fn placeholder(pgn: u32, payload_len: usize) -> PgnSpec {
    static PLACEHOLDER_FIELD: FieldSpec = FieldSpec {
        order: 1,
        id: "data",
        name: "Data",
        field_type: "BINARY",
        bits: None,
        resolution: None,
        offset: 0,
        unit: None,
        signed: Signedness::Unsigned,
        lookup: None,
        indirect_order: None,
        proprietary: false,
    };

    PgnSpec {
        pgn,
        name: "Unknown",
        description: "Unknown PGN",
        packet_type: if payload_len > 8 {
            PacketType::Fast
        } else {
            PacketType::Single
        },
        interval_ms: 0,
        completeness: Completeness {
            fields_unknown: true,
            resolution_unknown: true,
            lookup_unknown: true,
            interval_unknown: true,
        },
        repeating_1: None,
        repeating_2: None,
        fields: std::slice::from_ref(&PLACEHOLDER_FIELD),
    }
}
