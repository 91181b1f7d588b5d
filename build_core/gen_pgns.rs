//! Generate the `PGN_TABLE` static descriptor table for the PGNs selected in
//! the manifest.
//!
//! The teacher emitted one Rust `struct`/`impl PgnData`/`impl FieldAccess`
//! trio per PGN, driven by a `PgnDescriptor` constant the runtime codec
//! engine consulted for the binary layout. This generator keeps that same
//! "binary layout lives in one descriptor constant" idea but drops the
//! generated structs entirely: every PGN becomes one `PgnSpec` literal whose
//! `fields: &'static [FieldSpec]` slice *is* the binary layout, walked
//! directly by `decode::decode_pgn`/`encode::marshal_message` instead of by
//! generated per-PGN accessor code.
use std::collections::HashSet;
use std::fmt::Write;

use serde_json::Value;

use super::domain::*;
use super::errors::*;
use super::repetitive_fields::RepeatingFieldSetInfo;

/// Walk the CANboat database and emit a `PgnSpec` for each requested PGN.
pub(crate) fn run_pgns_gen(
    canboat_value: &Value,
    pgns_to_generate: Vec<u32>,
) -> Result<String, BuildError> {
    let mut fields_buffer = String::new();
    let mut table_buffer = String::new();
    writeln!(table_buffer, "pub static PGN_TABLE: &[PgnSpec] = &[")?;

    let mut seen_entry_names: HashSet<String> = HashSet::new();

    if let Some(pgn_array) = canboat_value["PGNs"].as_array() {
        for pgn_value in pgn_array {
            match serde_json::from_value::<PgnInstructions>(pgn_value.clone()) {
                Ok(pgn_def) => {
                    if !pgns_to_generate.contains(&pgn_def.pgn_id) {
                        continue;
                    }
                    let entry_name = unique_fields_const_name(&pgn_def, &mut seen_entry_names);
                    fields_buffer.push_str(&generate_fields_const(&pgn_def, &entry_name)?);
                    table_buffer.push_str(&generate_pgn_spec(&pgn_def, &entry_name)?);
                }
                Err(e) => {
                    let pgn_id = pgn_value.get("PGN").unwrap_or(&serde_json::Value::Null);
                    println!(
                        "cargo:warning=[PGN {}] Skipped.. Malformed definition: {}",
                        pgn_id, e
                    );
                }
            }
        }
    } else {
        println!("cargo:warning=JSON category '[PGNs]' not found or not an array.");
    }

    writeln!(table_buffer, "];")?;

    let mut buffer = fields_buffer;
    buffer.push_str(&table_buffer);
    Ok(buffer)
}

/// PGNs with the same id but different match-field disambiguation (spec
/// S4.8, e.g. several `PGN 126720` proprietary variants) need distinctly
/// named `FIELDS` consts; suffix on collision.
fn unique_fields_const_name(pgn: &PgnInstructions, seen: &mut HashSet<String>) -> String {
    let base = format!("PGN_{}_FIELDS", pgn.pgn_id);
    if seen.insert(base.clone()) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}", base, n);
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

fn generate_fields_const(pgn: &PgnInstructions, const_name: &str) -> Result<String, BuildError> {
    let mut buffer = String::new();
    writeln!(
        buffer,
        "static {}: [FieldSpec; {}] = [",
        const_name,
        pgn.fields.len()
    )?;
    for field in &pgn.fields {
        buffer.push_str(&generate_field_spec(field)?);
    }
    writeln!(buffer, "];")?;
    Ok(buffer)
}

fn generate_field_spec(field: &Fields) -> Result<String, BuildError> {
    let mut buffer = String::new();
    let signed = match field.signed {
        Some(true) => "Signedness::Signed",
        Some(false) => "Signedness::Unsigned",
        None => "Signedness::Inherit",
    };
    // decode/encode resolve `lookup` against the catalog's LOOKUP_TABLES by
    // name; direct, indirect and bit lookups all name one table this way.
    let lookup = field
        .enum_direct_name
        .as_ref()
        .or(field.enum_indirect_name.as_ref())
        .or(field.enum_bit_name.as_ref());

    writeln!(buffer, "\tFieldSpec {{")?;
    writeln!(buffer, "\t\torder: {},", field.order)?;
    writeln!(buffer, "\t\tid: {:?},", field.id)?;
    writeln!(buffer, "\t\tname: {:?},", field.name)?;
    writeln!(buffer, "\t\tfield_type: {:?},", field.kind)?;
    writeln!(buffer, "\t\tbits: {:?},", field.bits_length.map(|b| b as u32))?;
    writeln!(
        buffer,
        "\t\tresolution: {:?},",
        field.resolution.map(|r| r as f64)
    )?;
    writeln!(buffer, "\t\toffset: 0,")?;
    writeln!(buffer, "\t\tunit: {:?},", field.physical_unit)?;
    writeln!(buffer, "\t\tsigned: {},", signed)?;
    writeln!(buffer, "\t\tlookup: {:?},", lookup)?;
    writeln!(
        buffer,
        "\t\tindirect_order: {:?},",
        field.enum_indirect_field_order
    )?;
    // No CANboat field carries an explicit proprietary flag; fields only gate
    // on it when their owning PGN falls outside the proprietary ranges (spec
    // S4.7), which none of the catalog's standard PGNs do.
    writeln!(buffer, "\t\tproprietary: false,")?;
    writeln!(buffer, "\t}},")?;
    Ok(buffer)
}

fn generate_pgn_spec(pgn: &PgnInstructions, fields_const: &str) -> Result<String, BuildError> {
    let mut buffer = String::new();
    let packet_type = if pgn.fastpacket.eq_ignore_ascii_case("fast") {
        "PacketType::Fast"
    } else {
        "PacketType::Single"
    };

    writeln!(buffer, "\tPgnSpec {{")?;
    writeln!(buffer, "\t\tpgn: {},", pgn.pgn_id)?;
    writeln!(buffer, "\t\tname: {:?},", pgn.pgn_name)?;
    writeln!(buffer, "\t\tdescription: {:?},", pgn.pgn_description)?;
    writeln!(buffer, "\t\tpacket_type: {},", packet_type)?;
    writeln!(
        buffer,
        "\t\tinterval_ms: {},",
        pgn.trans_interval.unwrap_or(0)
    )?;
    writeln!(buffer, "\t\tcompleteness: Completeness {{")?;
    writeln!(buffer, "\t\t\tfields_unknown: {},", pgn.field_count.is_none())?;
    writeln!(
        buffer,
        "\t\t\tresolution_unknown: {},",
        pgn.fields.iter().any(|f| f.resolution.is_none() && f.kind == "NUMBER")
    )?;
    writeln!(
        buffer,
        "\t\t\tlookup_unknown: {},",
        pgn.fields
            .iter()
            .any(|f| f.kind == "LOOKUP" && f.enum_direct_name.is_none())
    )?;
    writeln!(
        buffer,
        "\t\t\tinterval_unknown: {},",
        pgn.trans_interval.is_none()
    )?;
    writeln!(buffer, "\t\t}},")?;
    buffer.push_str(&generate_repeating_set(pgn, 1)?);
    buffer.push_str(&generate_repeating_set(pgn, 2)?);
    writeln!(buffer, "\t\tfields: &{},", fields_const)?;
    writeln!(buffer, "\t}},")?;
    Ok(buffer)
}

fn generate_repeating_set(pgn: &PgnInstructions, set_number: u8) -> Result<String, BuildError> {
    let mut buffer = String::new();
    let field_name = if set_number == 1 {
        "repeating_1"
    } else {
        "repeating_2"
    };
    match RepeatingFieldSetInfo::extract_from_pgn(pgn, set_number) {
        Some(info) => {
            let start_field_order = pgn
                .fields
                .get(info.start_field_index)
                .map(|f| f.order)
                .unwrap_or(0);
            let count_field_order = info
                .count_field_index
                .and_then(|idx| pgn.fields.get(idx))
                .map(|f| f.order);

            writeln!(buffer, "\t\t{}: Some(RepeatingFieldSet {{", field_name)?;
            writeln!(buffer, "\t\t\tcount_field_order: {:?},", count_field_order)?;
            writeln!(buffer, "\t\t\tstart_field_order: {},", start_field_order)?;
            writeln!(buffer, "\t\t\tsize: {},", info.size)?;
            writeln!(buffer, "\t\t}}),")?;
        }
        None => {
            writeln!(buffer, "\t\t{}: None,", field_name)?;
        }
    }
    Ok(buffer)
}
