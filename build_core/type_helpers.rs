//! Typing helpers used while generating PGN structures.

/// Normalize a raw CANboat `FieldType` string into the `FieldKind` variant
/// identifier text used when emitting `FieldKind::{}` into generated code.
/// Used by the descriptor-table generators (`gen_field_types`, `gen_pgns`),
/// which emit data rather than per-PGN Rust types.
pub(crate) fn field_kind_variant_name(kind: &str) -> &'static str {
    match kind {
        "NUMBER" => "Number",
        "FLOAT" => "Float",
        "DECIMAL" => "Decimal",
        "LOOKUP" => "Lookup",
        "INDIRECT_LOOKUP" => "IndirectLookup",
        "FIELD_TYPE_LOOKUP" => "FieldTypeLookup",
        "BITLOOKUP" => "BitLookup",
        "PGN" => "Pgn",
        "DATE" => "Date",
        "TIME" => "Time",
        "DURATION" => "Duration",
        "MMSI" => "Mmsi",
        "STRING_FIX" => "StringFix",
        "STRING_LZ" => "StringLz",
        "STRING_LAU" => "StringLau",
        "BINARY" => "Binary",
        "RESERVED" => "Reserved",
        "SPARE" => "Spare",
        "VARIABLE" => "Variable",
        "KEY_VALUE" => "KeyValue",
        _ => "Unimplemented",
    }
}
