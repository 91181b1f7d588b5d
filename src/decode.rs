//! Field-loop decode engine (`C7`): walks a `PgnSpec`'s field list against a
//! reassembled payload and produces a `BTreeMap` of decoded values.
//!
//! Field-level failures never abort the surrounding message: a field that
//! runs out of data, lands on a reserved sentinel, or names an unsupported
//! kind is recorded as `DecodedValue::Exceptional` (or simply omitted for
//! `Reserved`/`Spare`) rather than propagated, per the degrade-gracefully
//! contract in the specification.
use std::collections::BTreeMap;

use crate::bits::{sign_extend, BitReader};
use crate::catalog::Catalog;
use crate::core::{
    DecodedMessage, DecodedValue, ExceptionalCode, FieldKind, FieldSpec, PgnSpec, RawFrame,
    Signedness,
};
use crate::error::FieldDecodeError;

/// Proprietary field ranges (spec S4.7): fields marked `proprietary` only
/// decode when the owning PGN id falls in one of these three bands.
const PROPRIETARY_RANGES: [std::ops::RangeInclusive<u32>; 3] =
    [65280..=65535, 126720..=126975, 130816..=131071];

/// Per-message decode state: the payload cursor plus the running field map,
/// so `Variable`/`IndirectLookup` fields can look back at earlier results.
struct DecodeContext<'a> {
    reader: BitReader<'a>,
    values: BTreeMap<&'static str, DecodedValue>,
    /// Raw payload, kept alongside the bit cursor so `Variable` fields can
    /// read the raw index byte preceding them (spec S4.7).
    data: &'a [u8],
    /// PGN named by the most recently decoded `FieldKind::Pgn` field in this
    /// message, if any; `Variable` fields resolve against this PGN's own
    /// field list.
    ref_pgn: Option<u32>,
}

/// Decode one reassembled payload against its resolved `PgnSpec`.
pub fn decode_pgn(catalog: &Catalog, spec: &PgnSpec, data: &[u8]) -> BTreeMap<&'static str, DecodedValue> {
    let mut ctx = DecodeContext {
        reader: BitReader::new(data),
        values: BTreeMap::new(),
        data,
        ref_pgn: None,
    };

    let proprietary_pgn = PROPRIETARY_RANGES.iter().any(|r| r.contains(&spec.pgn));

    let mut i = 0usize;
    while i < spec.fields.len() {
        let field = &spec.fields[i];

        if field.proprietary && !proprietary_pgn {
            i += 1;
            continue;
        }

        let starts_repeat_1 = spec
            .repeating_1
            .is_some_and(|r| r.start_field_order == field.order);
        let starts_repeat_2 = spec
            .repeating_2
            .is_some_and(|r| r.start_field_order == field.order);

        if starts_repeat_1 || starts_repeat_2 {
            let set = if starts_repeat_1 {
                spec.repeating_1.unwrap()
            } else {
                spec.repeating_2.unwrap()
            };
            let group_fields = &spec.fields[i..(i + set.size as usize).min(spec.fields.len())];
            let count = repetition_count(&ctx, spec, set, group_fields, data.len());
            let mut instances = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let mut instance = BTreeMap::new();
                for gf in group_fields {
                    if let Some((name, value)) = decode_one_field(catalog, gf, &mut ctx) {
                        instance.insert(name, value);
                    }
                }
                instances.push(instance);
            }
            let key = group_fields.first().map(|f| f.id).unwrap_or("repeating");
            ctx.values.insert(key, DecodedValue::Repeating(instances));
            i += group_fields.len();
            continue;
        }

        if let Some((name, value)) = decode_one_field(catalog, field, &mut ctx) {
            ctx.values.insert(name, value);
        }
        i += 1;
    }

    ctx.values
}

fn decode_one_field(
    catalog: &Catalog,
    field: &FieldSpec,
    ctx: &mut DecodeContext,
) -> Option<(&'static str, DecodedValue)> {
    match decode_field_value(catalog, field, ctx) {
        Ok(Some(value)) => Some((field.id, value)),
        // Reserved/Spare all-expected-pattern, or a value with nothing to show: omitted per spec S4.1.
        Ok(None) => None,
        Err(FieldDecodeError::Exceptional { code, .. }) => {
            Some((field.id, DecodedValue::Exceptional(code)))
        }
        // Insufficient data / unsupported kind / bit reader failure: leave the field absent.
        Err(_) => None,
    }
}

fn repetition_count(
    ctx: &DecodeContext,
    spec: &PgnSpec,
    set: crate::core::RepeatingFieldSet,
    group_fields: &[FieldSpec],
    total_len: usize,
) -> u32 {
    if let Some(count_order) = set.count_field_order {
        if let Some(count_field) = spec.fields.iter().find(|f| f.order == count_order) {
            if let Some(DecodedValue::Integer(n)) = ctx.values.get(count_field.id) {
                return (*n).max(0) as u32;
            }
        }
    }
    let group_bits: u32 = group_fields.iter().map(|f| f.bits.unwrap_or(8)).sum();
    if group_bits == 0 {
        return 0;
    }
    let remaining_bits = (total_len * 8).saturating_sub(ctx.reader.bit_cursor()) as u32;
    remaining_bits / group_bits
}

fn decode_field_value(
    catalog: &Catalog,
    field: &FieldSpec,
    ctx: &mut DecodeContext,
) -> Result<Option<DecodedValue>, FieldDecodeError> {
    let field_type = catalog.field_types.get(field.field_type);
    let bits = field
        .bits
        .or_else(|| field_type.and_then(|t| t.bits))
        .unwrap_or(0);
    let signed = match field.signed {
        Signedness::Signed => true,
        Signedness::Unsigned => false,
        Signedness::Inherit => field_type.is_some_and(|t| t.signed),
    };
    let resolution = field
        .resolution
        .or_else(|| field_type.map(|t| t.resolution))
        .unwrap_or(1.0);
    let offset = if field.offset != 0 {
        field.offset
    } else {
        field_type.map(|t| t.offset).unwrap_or(0)
    };

    let kind = field_type.map(|t| t.kind).unwrap_or(FieldKind::Unimplemented);

    match kind {
        FieldKind::Reserved => {
            read_raw(ctx, bits)?;
            Ok(None)
        }
        FieldKind::Spare => {
            read_raw(ctx, bits)?;
            Ok(None)
        }
        FieldKind::Number => {
            let raw = read_raw(ctx, bits)?;
            if let Some(code) = exceptional(raw, bits, signed) {
                return Err(FieldDecodeError::Exceptional {
                    field: field.id,
                    code,
                });
            }
            let value = if signed {
                sign_extend(raw, bits.min(64) as u8)
            } else {
                raw as i64
            };
            let physical = (value + offset) as f64 * resolution;
            if (resolution - 1.0).abs() < f64::EPSILON && offset == 0 {
                Ok(Some(DecodedValue::Integer(value)))
            } else {
                Ok(Some(DecodedValue::Float(physical)))
            }
        }
        FieldKind::Float => {
            let raw = read_raw(ctx, 32)?;
            Ok(Some(DecodedValue::Float(f32::from_bits(raw as u32) as f64)))
        }
        FieldKind::Decimal => {
            let bytes = ctx
                .reader
                .read_slice((bits / 8) as usize)
                .map_err(|err| FieldDecodeError::BitReaderError { err })?;
            let mut digits = String::new();
            for byte in bytes {
                digits.push_str(&format!("{:02x}", byte));
            }
            Ok(Some(DecodedValue::Str(digits)))
        }
        FieldKind::Lookup => {
            let raw = read_raw(ctx, bits)?;
            let name = field
                .lookup
                .and_then(|name| catalog.lookup(name))
                .and_then(|table| table.resolve(raw as u32));
            match name {
                Some(n) => Ok(Some(DecodedValue::Str(n.to_string()))),
                None => Ok(Some(DecodedValue::Integer(raw as i64))),
            }
        }
        FieldKind::IndirectLookup | FieldKind::FieldTypeLookup | FieldKind::KeyValue => {
            // Simplified relative to the full triplet/type-lookup machinery:
            // resolved as a plain single-value lookup against the same table.
            let raw = read_raw(ctx, bits)?;
            let name = field
                .lookup
                .and_then(|name| catalog.lookup(name))
                .and_then(|table| table.resolve(raw as u32));
            match name {
                Some(n) => Ok(Some(DecodedValue::Str(n.to_string()))),
                None => Ok(Some(DecodedValue::Integer(raw as i64))),
            }
        }
        FieldKind::BitLookup => {
            let raw = read_raw(ctx, bits)?;
            let table = field.lookup.and_then(|name| catalog.lookup(name));
            let mut flags = Vec::new();
            for bit in 0..bits.min(32) {
                if raw & (1 << bit) != 0 {
                    let name = table.and_then(|t| t.resolve(bit));
                    flags.push((bit, name));
                }
            }
            Ok(Some(DecodedValue::Bits(flags)))
        }
        FieldKind::Pgn => {
            let raw = read_raw(ctx, bits)?;
            ctx.ref_pgn = Some(raw as u32);
            Ok(Some(DecodedValue::Integer(raw as i64)))
        }
        FieldKind::Date => {
            let raw = read_raw(ctx, bits)?;
            if let Some(code) = exceptional(raw, bits, false) {
                return Err(FieldDecodeError::Exceptional {
                    field: field.id,
                    code,
                });
            }
            let epoch = chrono::NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
            let date = epoch + chrono::Duration::days(raw as i64);
            Ok(Some(DecodedValue::Instant(date)))
        }
        FieldKind::Time | FieldKind::Duration => {
            let raw = read_raw(ctx, bits)?;
            if let Some(code) = exceptional(raw, bits, false) {
                return Err(FieldDecodeError::Exceptional {
                    field: field.id,
                    code,
                });
            }
            let seconds = raw as f64 * resolution;
            Ok(Some(DecodedValue::Duration(std::time::Duration::from_secs_f64(
                seconds.max(0.0),
            ))))
        }
        FieldKind::Mmsi => {
            let raw = read_raw(ctx, bits)?;
            Ok(Some(DecodedValue::Str(format!("{:09}", raw))))
        }
        FieldKind::StringFix => {
            let bytes = ctx
                .reader
                .read_slice((bits / 8) as usize)
                .map_err(|err| FieldDecodeError::BitReaderError { err })?;
            Ok(Some(DecodedValue::Str(trim_string(bytes))))
        }
        FieldKind::StringLz => {
            let len = ctx
                .reader
                .read_u8(8)
                .map_err(|err| FieldDecodeError::BitReaderError { err })? as usize;
            if len == 0 {
                return Ok(Some(DecodedValue::Str(String::new())));
            }
            let bytes = ctx
                .reader
                .read_slice(len.saturating_sub(1))
                .map_err(|err| FieldDecodeError::BitReaderError { err })?;
            Ok(Some(DecodedValue::Str(trim_string(bytes))))
        }
        FieldKind::StringLau => {
            let len = ctx
                .reader
                .read_u8(8)
                .map_err(|err| FieldDecodeError::BitReaderError { err })? as usize;
            let _encoding = ctx
                .reader
                .read_u8(8)
                .map_err(|err| FieldDecodeError::BitReaderError { err })?;
            if len < 2 {
                return Ok(Some(DecodedValue::Str(String::new())));
            }
            let bytes = ctx
                .reader
                .read_slice(len - 2)
                .map_err(|err| FieldDecodeError::BitReaderError { err })?;
            Ok(Some(DecodedValue::Str(trim_string(bytes))))
        }
        FieldKind::Binary => {
            let byte_len = if bits == 0 {
                (ctx.reader.total_bits() - ctx.reader.bit_cursor()) / 8
            } else {
                (bits as usize) / 8
            };
            let bytes = ctx
                .reader
                .read_slice(byte_len)
                .map_err(|err| FieldDecodeError::BitReaderError { err })?;
            Ok(Some(DecodedValue::Bytes(bytes.to_vec())))
        }
        FieldKind::Variable => {
            // Group-function style field (spec S4.7): the raw byte just
            // before this field is a 1-based index into the field list of
            // the PGN named by an earlier `FieldKind::Pgn` field in this
            // same message (`ctx.ref_pgn`). Resolve that referenced field
            // and recurse into its own decoder, then round the cursor up
            // to a byte boundary.
            let start_bit = ctx.reader.bit_cursor();
            let field_index = start_bit
                .checked_sub(8)
                .map(|bit| bit / 8)
                .and_then(|byte_pos| ctx.data.get(byte_pos))
                .and_then(|&marker| (marker as usize).checked_sub(1));
            let referenced = ctx.ref_pgn.zip(field_index).and_then(|(ref_pgn, idx)| {
                catalog
                    .entries_for(ref_pgn)
                    .next()
                    .and_then(|spec| spec.fields.get(idx))
            });
            match referenced {
                Some(ref_field) => {
                    let value = decode_field_value(catalog, ref_field, ctx)?;
                    let bit_cursor = ctx.reader.bit_cursor();
                    let pad = (8 - bit_cursor % 8) % 8;
                    if pad > 0 {
                        ctx.reader
                            .advance(pad as u32)
                            .map_err(|err| FieldDecodeError::BitReaderError { err })?;
                    }
                    Ok(value)
                }
                // No referenced PGN/field resolved: fall back to raw bytes
                // to end of payload rather than losing the remaining data.
                None => {
                    let byte_len = (ctx.reader.total_bits() - ctx.reader.bit_cursor()) / 8;
                    let bytes = ctx
                        .reader
                        .read_slice(byte_len)
                        .map_err(|err| FieldDecodeError::BitReaderError { err })?;
                    Ok(Some(DecodedValue::Bytes(bytes.to_vec())))
                }
            }
        }
        FieldKind::Unimplemented => Err(FieldDecodeError::UnsupportedFieldKind {
            field: field.id,
            kind,
        }),
    }
}

fn read_raw(ctx: &mut DecodeContext, bits: u32) -> Result<u64, FieldDecodeError> {
    ctx.reader
        .read_u64(bits.min(64) as u8)
        .map_err(|err| FieldDecodeError::BitReaderError { err })
}

fn all_ones(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Reserved-sentinel detection (spec S4.1, S7). The reserved count depends on
/// the field's bit width: `max_value >= 7` reserves the top two values
/// (Unknown, Error), `max_value > 1` reserves just the top value (Unknown),
/// otherwise nothing is reserved. A value only counts as exceptional once it
/// exceeds `max_value - reserved`.
fn exceptional(raw: u64, bits: u32, signed: bool) -> Option<ExceptionalCode> {
    if bits == 0 || bits > 62 {
        return None;
    }
    let max_value = if signed {
        (1i64 << (bits - 1)) - 1
    } else {
        (1i64 << bits) - 1
    };
    let reserved = if max_value >= 7 {
        2
    } else if max_value > 1 {
        1
    } else {
        0
    };
    if reserved == 0 {
        return None;
    }
    let value = if signed {
        sign_extend(raw, bits as u8)
    } else {
        raw as i64
    };
    if value > max_value - reserved {
        Some(ExceptionalCode::from_delta(value - max_value))
    } else {
        None
    }
}

fn trim_string(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0x00 && b != 0xFF && b != b' ')
        .map(|p| p + 1)
        .unwrap_or(0);
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Decode a reassembled `RawFrame` into a full `DecodedMessage`, resolving
/// the ambiguous-PGN match step first (`C8`).
pub fn decode_message(catalog: &Catalog, frame: &RawFrame) -> Result<DecodedMessage, crate::error::MatchError> {
    let spec = match crate::catalog::matcher::resolve(catalog, frame.pgn, &frame.data) {
        Ok(spec) => spec,
        Err(crate::error::MatchError::UnknownPgn { .. }) => {
            let placeholder = crate::catalog::matcher::placeholder(frame.pgn, frame.data.len());
            let fields = decode_pgn(catalog, &placeholder, &frame.data);
            return Ok(DecodedMessage {
                timestamp: frame.timestamp.clone(),
                priority: frame.priority,
                src: frame.src,
                dst: frame.dst,
                pgn: frame.pgn,
                description: "Unknown",
                fields,
            });
        }
        Err(e) => return Err(e),
    };

    let fields = decode_pgn(catalog, spec, &frame.data);
    Ok(DecodedMessage {
        timestamp: frame.timestamp.clone(),
        priority: frame.priority,
        src: frame.src,
        dst: frame.dst,
        pgn: frame.pgn,
        description: spec.description,
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, UnitSystem};
    use crate::core::{FieldTypeSpec, PacketType, PhysicalQuantity};

    fn build_test_catalog() -> catalog::Catalog {
        static FIELD_TYPES: &[FieldTypeSpec] = &[FieldTypeSpec {
            name: "NUMBER",
            description: "",
            kind: FieldKind::Number,
            bits: None,
            resolution: None,
            offset: 0,
            unit: None,
            signed: Signedness::Unsigned,
            physical_quantity: None,
            base: None,
        }];
        static PHYSICAL: &[PhysicalQuantity] = &[];
        static LOOKUPS: &[crate::core::LookupTable] = &[];
        static FIELDS: &[FieldSpec] = &[FieldSpec {
            order: 1,
            id: "instance",
            name: "Instance",
            field_type: "NUMBER",
            bits: Some(8),
            resolution: None,
            offset: 0,
            unit: None,
            signed: Signedness::Unsigned,
            lookup: None,
            indirect_order: None,
            proprietary: false,
        }];
        static PGNS: &[PgnSpec] = &[PgnSpec {
            pgn: 65001,
            name: "Test",
            description: "Test PGN",
            packet_type: PacketType::Single,
            interval_ms: 0,
            completeness: crate::core::Completeness {
                fields_unknown: false,
                resolution_unknown: false,
                lookup_unknown: false,
                interval_unknown: false,
            },
            repeating_1: None,
            repeating_2: None,
            fields: FIELDS,
        }];

        catalog::build(FIELD_TYPES, PHYSICAL, LOOKUPS, PGNS, UnitSystem::AsCataloged).unwrap()
    }

    #[test]
    fn decodes_simple_number_field() {
        let catalog = build_test_catalog();
        let spec = &catalog.pgns[0];
        let values = decode_pgn(&catalog, spec, &[42]);
        assert_eq!(values.get("instance"), Some(&DecodedValue::Integer(42)));
    }

    #[test]
    fn unknown_pgn_falls_back_to_placeholder() {
        let catalog = build_test_catalog();
        let frame = RawFrame {
            timestamp: crate::core::Timestamp::Relative(0.0),
            priority: 6,
            pgn: 999999,
            src: 1,
            dst: 255,
            data: vec![1, 2, 3],
        };
        let msg = decode_message(&catalog, &frame).unwrap();
        assert_eq!(msg.description, "Unknown");
    }
}
