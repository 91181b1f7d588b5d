//! Marshal engine (`C10`): the inverse of `decode.rs`, rebuilding raw bytes
//! from a `BTreeMap<&str, DecodedValue>` plus its resolved `PgnSpec`.
//!
//! Grounded on the teacher's `write_field`/`pgn_value_to_*`/`i64_to_u64_bitwise`
//! helpers in `infra/codec/engine`, adapted to write against the dynamic
//! `DecodedValue` enum instead of the teacher's per-PGN generated `PgnValue`.
use std::collections::BTreeMap;

use crate::bits::BitWriter;
use crate::core::{DecodedValue, FieldKind, FieldSpec, PgnSpec, Signedness};
use crate::error::FieldEncodeError;

/// Reinterprets the bits of an `i64` as `u64` for writing; negative values
/// are already two's complement, so the bit pattern is reused verbatim.
#[inline]
fn i64_to_u64_bitwise(value: i64) -> u64 {
    value as u64
}

fn field_to_i64(field: &FieldSpec, value: &DecodedValue) -> Result<i64, FieldEncodeError> {
    match value {
        DecodedValue::Integer(v) => Ok(*v),
        DecodedValue::Float(v) => Ok(*v as i64),
        _ => Err(FieldEncodeError::TypeMismatch { field: field.id }),
    }
}

fn field_to_f64(field: &FieldSpec, value: &DecodedValue) -> Result<f64, FieldEncodeError> {
    match value {
        DecodedValue::Float(v) => Ok(*v),
        DecodedValue::Integer(v) => Ok(*v as f64),
        _ => Err(FieldEncodeError::TypeMismatch { field: field.id }),
    }
}

/// Encode one field's `DecodedValue` into the writer's current position.
fn write_field(
    writer: &mut BitWriter,
    field: &FieldSpec,
    field_type: Option<&crate::catalog::ResolvedFieldType>,
    value: Option<&DecodedValue>,
) -> Result<(), FieldEncodeError> {
    let bits = field
        .bits
        .or_else(|| field_type.and_then(|t| t.bits))
        .unwrap_or(8);
    let signed = match field.signed {
        Signedness::Signed => true,
        Signedness::Unsigned => false,
        Signedness::Inherit => field_type.is_some_and(|t| t.signed),
    };
    let resolution = field
        .resolution
        .or_else(|| field_type.map(|t| t.resolution))
        .unwrap_or(1.0);

    let kind = field_type.map(|t| t.kind).unwrap_or(FieldKind::Unimplemented);

    match kind {
        FieldKind::Reserved => {
            writer
                .advance(bits)
                .map_err(|err| FieldEncodeError::BitWriterError { err })?;
            Ok(())
        }
        FieldKind::Spare => {
            writer
                .write_u64(0, bits.min(64) as u8)
                .map_err(|err| FieldEncodeError::BitWriterError { err })
        }
        FieldKind::Number | FieldKind::Pgn | FieldKind::Date | FieldKind::Time
        | FieldKind::Duration | FieldKind::Mmsi | FieldKind::Lookup | FieldKind::BitLookup
        | FieldKind::IndirectLookup | FieldKind::FieldTypeLookup | FieldKind::KeyValue => {
            let value = value.ok_or(FieldEncodeError::TypeMismatch { field: field.id })?;
            let raw = if matches!(
                kind,
                FieldKind::Lookup | FieldKind::BitLookup | FieldKind::Mmsi
            ) {
                field_to_i64(field, value)? as u64
            } else if (resolution - 1.0).abs() > f64::EPSILON {
                let float_val = field_to_f64(field, value)?;
                i64_to_u64_bitwise((float_val / resolution) as i64)
            } else if signed {
                i64_to_u64_bitwise(field_to_i64(field, value)?)
            } else {
                field_to_i64(field, value)? as u64
            };
            writer
                .write_u64(raw, bits.min(64) as u8)
                .map_err(|err| FieldEncodeError::BitWriterError { err })
        }
        FieldKind::Float => {
            let value = value.ok_or(FieldEncodeError::TypeMismatch { field: field.id })?;
            let f = field_to_f64(field, value)? as f32;
            writer
                .write_u64(f.to_bits() as u64, 32)
                .map_err(|err| FieldEncodeError::BitWriterError { err })
        }
        FieldKind::StringFix => {
            let DecodedValue::Str(s) = value.ok_or(FieldEncodeError::TypeMismatch { field: field.id })? else {
                return Err(FieldEncodeError::TypeMismatch { field: field.id });
            };
            let byte_len = (bits / 8) as usize;
            let mut buf = vec![b' '; byte_len];
            let src = s.as_bytes();
            let copy_len = src.len().min(byte_len);
            buf[..copy_len].copy_from_slice(&src[..copy_len]);
            writer
                .write_slice(&buf)
                .map_err(|err| FieldEncodeError::BitWriterError { err })
        }
        FieldKind::StringLz => {
            let DecodedValue::Str(s) = value.ok_or(FieldEncodeError::TypeMismatch { field: field.id })? else {
                return Err(FieldEncodeError::TypeMismatch { field: field.id });
            };
            let bytes = s.as_bytes();
            if bytes.len() + 1 > u8::MAX as usize {
                return Err(FieldEncodeError::BufferTooSmall { field: field.id });
            }
            writer
                .write_u64((bytes.len() + 1) as u64, 8)
                .map_err(|err| FieldEncodeError::BitWriterError { err })?;
            writer
                .write_slice(bytes)
                .map_err(|err| FieldEncodeError::BitWriterError { err })
        }
        FieldKind::StringLau => {
            let DecodedValue::Str(s) = value.ok_or(FieldEncodeError::TypeMismatch { field: field.id })? else {
                return Err(FieldEncodeError::TypeMismatch { field: field.id });
            };
            let bytes = s.as_bytes();
            if bytes.len() + 2 > u8::MAX as usize {
                return Err(FieldEncodeError::BufferTooSmall { field: field.id });
            }
            writer
                .write_u64((bytes.len() + 2) as u64, 8)
                .map_err(|err| FieldEncodeError::BitWriterError { err })?;
            writer
                .write_u64(0, 8) // encoding byte: 0 == ASCII/UTF-8
                .map_err(|err| FieldEncodeError::BitWriterError { err })?;
            writer
                .write_slice(bytes)
                .map_err(|err| FieldEncodeError::BitWriterError { err })
        }
        FieldKind::Binary | FieldKind::Variable => {
            let DecodedValue::Bytes(b) = value.ok_or(FieldEncodeError::TypeMismatch { field: field.id })? else {
                return Err(FieldEncodeError::TypeMismatch { field: field.id });
            };
            writer
                .write_slice(b)
                .map_err(|err| FieldEncodeError::BitWriterError { err })
        }
        FieldKind::Decimal | FieldKind::Unimplemented => {
            Err(FieldEncodeError::UnsupportedFieldKind { field: field.id, kind })
        }
    }
}

/// Rebuild the raw payload bytes for a single-frame or already-framed-fast PGN
/// message from its decoded field map (`MarshalMessageToRaw`).
pub fn marshal_message(
    catalog: &crate::catalog::Catalog,
    spec: &PgnSpec,
    fields: &BTreeMap<&'static str, DecodedValue>,
) -> Result<Vec<u8>, FieldEncodeError> {
    let mut buffer = vec![0u8; crate::core::MAX_PAYLOAD_BYTES];
    let mut total_bits: u32 = 0;
    {
        let mut writer = BitWriter::new(&mut buffer);
        let mut i = 0usize;
        while i < spec.fields.len() {
            let field = &spec.fields[i];

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
                let group_fields =
                    &spec.fields[i..(i + set.size as usize).min(spec.fields.len())];
                if let Some(DecodedValue::Repeating(instances)) = fields.get(field.id) {
                    for instance in instances {
                        for gf in group_fields {
                            let field_type = catalog.field_types.get(gf.field_type);
                            write_field(&mut writer, gf, field_type, instance.get(gf.id))?;
                        }
                    }
                }
                i += group_fields.len();
                continue;
            }

            let field_type = catalog.field_types.get(field.field_type);
            let value = fields.get(field.id);
            write_field(&mut writer, field, field_type, value)?;
            i += 1;
        }
        total_bits = writer.bit_cursor() as u32;
    }
    let byte_len = (total_bits as usize).div_ceil(8);
    buffer.truncate(byte_len.max(1));
    Ok(buffer)
}

/// Splits a marshaled payload into fast-packet frames (`MarshalMessageToSingleOrFastRaw`):
/// frame 0 carries the sequence/index byte plus declared size and 6 data
/// bytes, subsequent frames carry the sequence/index byte plus up to 7.
pub fn split_fast_packet(payload: &[u8], sequence_id: u8) -> Vec<[u8; 8]> {
    if payload.len() <= 8 {
        let mut frame = [0xFFu8; 8];
        frame[..payload.len()].copy_from_slice(payload);
        return vec![frame];
    }

    let mut frames = Vec::new();
    let mut offset = 0usize;
    let mut index = 0u8;

    let mut first = [0xFFu8; 8];
    first[0] = (sequence_id << 5) | index;
    first[1] = payload.len() as u8;
    let first_chunk = payload.len().min(6);
    first[2..2 + first_chunk].copy_from_slice(&payload[..first_chunk]);
    frames.push(first);
    offset += first_chunk;
    index += 1;

    while offset < payload.len() {
        let mut frame = [0xFFu8; 8];
        frame[0] = (sequence_id << 5) | index;
        let chunk_len = (payload.len() - offset).min(7);
        frame[1..1 + chunk_len].copy_from_slice(&payload[offset..offset + chunk_len]);
        frames.push(frame);
        offset += chunk_len;
        index += 1;
    }

    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, UnitSystem};
    use crate::core::{Completeness, FieldTypeSpec, PacketType, PhysicalQuantity};

    fn single_field_catalog() -> catalog::Catalog {
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
            completeness: Completeness {
                fields_unknown: false,
                resolution_unknown: false,
                lookup_unknown: false,
                interval_unknown: false,
            },
            repeating_1: None,
            repeating_2: None,
            fields: FIELDS,
        }];
        catalog::build(FIELD_TYPES, &[], &[], PGNS, UnitSystem::AsCataloged).unwrap()
    }

    #[test]
    fn marshals_simple_number_field() {
        let catalog = single_field_catalog();
        let spec = &catalog.pgns[0];
        let mut fields = BTreeMap::new();
        fields.insert("instance", DecodedValue::Integer(42));
        let bytes = marshal_message(&catalog, spec, &fields).unwrap();
        assert_eq!(bytes, vec![42]);
    }

    fn repeating_group_catalog() -> catalog::Catalog {
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
        static FIELDS: &[FieldSpec] = &[
            FieldSpec {
                order: 1,
                id: "count",
                name: "Count",
                field_type: "NUMBER",
                bits: Some(8),
                resolution: None,
                offset: 0,
                unit: None,
                signed: Signedness::Unsigned,
                lookup: None,
                indirect_order: None,
                proprietary: false,
            },
            FieldSpec {
                order: 2,
                id: "a",
                name: "A",
                field_type: "NUMBER",
                bits: Some(8),
                resolution: None,
                offset: 0,
                unit: None,
                signed: Signedness::Unsigned,
                lookup: None,
                indirect_order: None,
                proprietary: false,
            },
            FieldSpec {
                order: 3,
                id: "b",
                name: "B",
                field_type: "NUMBER",
                bits: Some(8),
                resolution: None,
                offset: 0,
                unit: None,
                signed: Signedness::Unsigned,
                lookup: None,
                indirect_order: None,
                proprietary: false,
            },
        ];
        static PGNS: &[PgnSpec] = &[PgnSpec {
            pgn: 65002,
            name: "TestRepeating",
            description: "Test repeating PGN",
            packet_type: PacketType::Fast,
            interval_ms: 0,
            completeness: Completeness {
                fields_unknown: false,
                resolution_unknown: false,
                lookup_unknown: false,
                interval_unknown: false,
            },
            repeating_1: Some(crate::core::RepeatingFieldSet {
                count_field_order: Some(1),
                start_field_order: 2,
                size: 2,
            }),
            repeating_2: None,
            fields: FIELDS,
        }];
        catalog::build(FIELD_TYPES, &[], &[], PGNS, UnitSystem::AsCataloged).unwrap()
    }

    #[test]
    fn marshals_repeating_group_preserving_each_instance() {
        let catalog = repeating_group_catalog();
        let spec = &catalog.pgns[0];

        let mut first = BTreeMap::new();
        first.insert("a", DecodedValue::Integer(10));
        first.insert("b", DecodedValue::Integer(20));
        let mut second = BTreeMap::new();
        second.insert("a", DecodedValue::Integer(30));
        second.insert("b", DecodedValue::Integer(40));

        let mut fields = BTreeMap::new();
        fields.insert("count", DecodedValue::Integer(2));
        fields.insert("a", DecodedValue::Repeating(vec![first, second]));

        let bytes = marshal_message(&catalog, spec, &fields).unwrap();
        assert_eq!(bytes, vec![2, 10, 20, 30, 40]);
    }

    #[test]
    fn splits_long_payload_into_fast_packet_frames() {
        // 14 bytes => frame 0 carries 6, frame 1 carries the next 7 (bytes
        // 6..=12), frame 2 carries the final byte (13): three frames total.
        let payload: Vec<u8> = (1..=14u8).collect();
        let frames = split_fast_packet(&payload, 3);
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0][0] & 0x1F, 0);
        assert_eq!(frames[0][1], 14);
        assert_eq!(frames[1][0] & 0x1F, 1);
        assert_eq!(frames[2][0] & 0x1F, 2);
        assert_eq!(frames[2][1], 14);
    }
}
