//! Generate the `FIELD_TYPES` and `PHYSICAL_QUANTITIES` static tables
//! consumed by `catalog::field_types::FieldTypeRegistry::build` (spec S4.2).
//!
//! Unlike `gen_lookups`/`gen_pgns`, which adapt CANboat's own JSON shape,
//! `FieldTypes`/`PhysicalQuantities` are tables this crate's own
//! `canboat.json` bundle carries so the inheritance DAG has somewhere to
//! live; CANboat's upstream database inlines the same information directly
//! on each field instead of naming a shared base type.
use std::fmt::Write;

use serde_json::Value;

use super::domain::{FieldTypeEntry, PhysicalQuantityEntry};
use super::errors::BuildError;
use super::type_helpers::field_kind_variant_name;

pub(crate) fn run_field_type_gen(canboat_value: &Value) -> Result<String, BuildError> {
    let mut buffer = String::new();
    buffer.push_str(&generate_physical_quantities(canboat_value)?);
    buffer.push_str(&generate_field_types(canboat_value)?);
    Ok(buffer)
}

fn generate_physical_quantities(canboat_value: &Value) -> Result<String, BuildError> {
    let mut buffer = String::new();
    writeln!(
        buffer,
        "pub static PHYSICAL_QUANTITIES: &[PhysicalQuantity] = &["
    )?;
    if let Some(array) = canboat_value["PhysicalQuantities"].as_array() {
        for value in array {
            match serde_json::from_value::<PhysicalQuantityEntry>(value.clone()) {
                Ok(pq) => {
                    writeln!(buffer, "\tPhysicalQuantity {{")?;
                    writeln!(buffer, "\t\tname: {:?},", pq.name)?;
                    writeln!(buffer, "\t\tabbreviation: {:?},", pq.abbreviation)?;
                    writeln!(buffer, "\t\tunit: {:?},", pq.unit)?;
                    writeln!(buffer, "\t\turl: {:?},", pq.url.unwrap_or_default())?;
                    writeln!(buffer, "\t}},")?;
                }
                Err(e) => println!(
                    "cargo:warning=[PhysicalQuantities] Skipped malformed entry: {}",
                    e
                ),
            }
        }
    } else {
        println!("cargo:warning=JSON category '[PhysicalQuantities]' not found or not an array.");
    }
    writeln!(buffer, "];")?;
    writeln!(buffer)?;
    Ok(buffer)
}

fn generate_field_types(canboat_value: &Value) -> Result<String, BuildError> {
    let mut buffer = String::new();
    writeln!(buffer, "pub static FIELD_TYPES: &[FieldTypeSpec] = &[")?;
    if let Some(array) = canboat_value["FieldTypes"].as_array() {
        for value in array {
            match serde_json::from_value::<FieldTypeEntry>(value.clone()) {
                Ok(ft) => {
                    let kind = field_kind_variant_name(&ft.kind);
                    let signed = match ft.signed {
                        Some(true) => "Signedness::Signed",
                        Some(false) => "Signedness::Unsigned",
                        None => "Signedness::Inherit",
                    };
                    writeln!(buffer, "\tFieldTypeSpec {{")?;
                    writeln!(buffer, "\t\tname: {:?},", ft.name)?;
                    writeln!(buffer, "\t\tdescription: {:?},", ft.description)?;
                    writeln!(buffer, "\t\tkind: FieldKind::{},", kind)?;
                    writeln!(buffer, "\t\tbits: {:?},", ft.bits)?;
                    writeln!(buffer, "\t\tresolution: {:?},", ft.resolution)?;
                    writeln!(buffer, "\t\toffset: {},", ft.offset.unwrap_or(0))?;
                    writeln!(buffer, "\t\tunit: {:?},", ft.unit)?;
                    writeln!(buffer, "\t\tsigned: {},", signed)?;
                    writeln!(
                        buffer,
                        "\t\tphysical_quantity: {:?},",
                        ft.physical_quantity
                    )?;
                    writeln!(buffer, "\t\tbase: {:?},", ft.base)?;
                    writeln!(buffer, "\t}},")?;
                }
                Err(e) => println!("cargo:warning=[FieldTypes] Skipped malformed entry: {}", e),
            }
        }
    } else {
        println!("cargo:warning=JSON category '[FieldTypes]' not found or not an array.");
    }
    writeln!(buffer, "];")?;
    Ok(buffer)
}
