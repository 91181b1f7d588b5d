//! Generate the `LOOKUP_TABLES` static table from CANboat JSON data.
//!
//! The teacher generated one Rust `enum` type per lookup category
//! (`LookupEnumerations`, `LookupIndirectEnumerations`, ...); this engine
//! resolves all four categories down to the single `LookupTable`/`LookupEntry`
//! data shape the decode/encode engine dispatches on at runtime, so a field's
//! `lookup` name resolves the same way regardless of which CANboat category
//! it came from.
use super::domain::*;
use super::errors::*;
use super::name_helpers::*;

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::{Debug, Write};

/// Iterate over the four CANboat lookup categories and emit one
/// `LookupTable` entry per named enumeration.
pub(crate) fn run_lookup_gen(canboat_value: &Value) -> Result<String, BuildError> {
    let mut buffer = String::new();
    writeln!(buffer, "pub static LOOKUP_TABLES: &[LookupTable] = &[")?;

    process_lookup_category::<LookupEnum>(canboat_value, "LookupEnumerations", &mut buffer)?;
    process_lookup_category::<LookupIndirEnum>(
        canboat_value,
        "LookupIndirectEnumerations",
        &mut buffer,
    )?;
    process_lookup_category::<LookupBitEnum>(canboat_value, "LookupBitEnumerations", &mut buffer)?;
    process_lookup_category::<LookupFieldTypeEnum>(
        canboat_value,
        "LookupFieldTypeEnumerations",
        &mut buffer,
    )?;

    writeln!(buffer, "];")?;
    Ok(buffer)
}

/// Process one CANboat lookup category and append its `LookupTable` entries.
fn process_lookup_category<T>(
    canboat_value: &serde_json::Value,
    category_key: &str,
    output_buffer: &mut String,
) -> Result<(), BuildError>
where
    T: DeserializeOwned + LookupGenerator + Debug,
{
    if let Some(array) = canboat_value[category_key].as_array() {
        for value in array {
            match serde_json::from_value::<T>(value.clone()) {
                Ok(lookup_def) => match generate_lookup_table(&lookup_def) {
                    Ok(code) => output_buffer.push_str(&code),
                    Err(e) => println!(
                        "cargo:warning=Failed to generate table for {}: '{}' : {}",
                        category_key,
                        lookup_def.name(),
                        e
                    ),
                },
                Err(e) => {
                    let name = value.get("Name").unwrap_or(&serde_json::Value::Null);
                    println!(
                        "cargo:warning=[LOOKUP: {}] [NAME: {}] Skipped.. Malformed entry: {}",
                        category_key, name, e
                    );
                }
            }
        }
    } else {
        println!(
            "cargo:warning=JSON category '[{}]' not found or not an array.",
            category_key
        );
    }
    Ok(())
}

/// Emit one `LookupTable` literal: `name` plus its `&[LookupEntry]` rows.
/// `LookupIndirectEnumerations` combine `Value1`/`Value2` into one `u32` key
/// the same way `decode::decode_field_value`'s `IndirectLookup` branch does.
fn generate_lookup_table(lookup: &dyn LookupGenerator) -> Result<String, BuildError> {
    let mut buffer = String::new();
    let entries_const = format!(
        "{}_ENTRIES",
        to_snake_case(&lookup.name().to_lowercase(), "").to_uppercase()
    );

    writeln!(
        buffer,
        "\tLookupTable {{ name: {:?}, entries: &{} }},",
        lookup.name(),
        entries_const
    )?;
    Ok(buffer)
}

//==================================================================================LOOKUP_ENTRIES_GENERATION
/// Emit the `&[LookupEntry]` const backing one lookup table, referenced by
/// `generate_lookup_table` above (kept as a separate pass so the entries
/// array can be named and placed ahead of the `LOOKUP_TABLES` slice it
/// feeds).
pub(crate) fn generate_lookup_entries(canboat_value: &Value) -> Result<String, BuildError> {
    let mut buffer = String::new();
    emit_entries_category::<LookupEnum>(canboat_value, "LookupEnumerations", &mut buffer)?;
    emit_entries_category::<LookupIndirEnum>(
        canboat_value,
        "LookupIndirectEnumerations",
        &mut buffer,
    )?;
    emit_entries_category::<LookupBitEnum>(canboat_value, "LookupBitEnumerations", &mut buffer)?;
    emit_entries_category::<LookupFieldTypeEnum>(
        canboat_value,
        "LookupFieldTypeEnumerations",
        &mut buffer,
    )?;
    Ok(buffer)
}

fn emit_entries_category<T>(
    canboat_value: &Value,
    category_key: &str,
    output_buffer: &mut String,
) -> Result<(), BuildError>
where
    T: DeserializeOwned + LookupGenerator + Debug,
{
    if let Some(array) = canboat_value[category_key].as_array() {
        for value in array {
            if let Ok(lookup_def) = serde_json::from_value::<T>(value.clone()) {
                let entries_const = format!(
                    "{}_ENTRIES",
                    to_snake_case(&lookup_def.name().to_lowercase(), "").to_uppercase()
                );
                writeln!(
                    output_buffer,
                    "static {}: [LookupEntry; {}] = [",
                    entries_const,
                    lookup_def.variants().len()
                )?;
                for variant in lookup_def.variants() {
                    let (name, value) = match variant {
                        VariantData::Simple { name, value } => (name, value),
                        VariantData::Full(meta) => (meta.name, meta.value),
                    };
                    writeln!(
                        output_buffer,
                        "\tLookupEntry {{ value: {}, name: {:?} }},",
                        value, name
                    )?;
                }
                writeln!(output_buffer, "];")?;
            }
        }
    }
    Ok(())
}
