//! Code generation helpers for NMEA 2000 repeating fields.
//!
//! This module builds the Rust structures used for groups of fields that repeat
//! a variable number of times in certain PGNs.
//!
//! **Example**: PGN 129540 (GNSS Sats in View)
//! - Field 4 (`prn`) is the counter → number of satellites
//! - Fields 5–11 form the repeating group (elevation, azimuth, SNR…)
//! - If `prn = 5`, fields 5–11 are read/written five times
//!
//! **Excerpt from canboat.json**:
//! ```json
//! {
//!   "PGN": 129540,
//!   "RepeatingFieldSet1Size": 7,
//!   "RepeatingFieldSet1StartField": 5,
//!   "RepeatingFieldSet1CountField": 4
//! }
//! ```

use crate::build_core::domain::*;
use crate::build_core::errors::*;
use crate::build_core::name_helpers::*;
use std::fmt::Write;

/// Metadata extracted for a repeating-field group.
#[derive(Debug, Clone)]
pub(crate) struct RepeatingFieldSetInfo {
    /// Index of the field that stores the repetition counter (None = dynamic length)
    pub count_field_index: Option<usize>,

    /// Index of the first field in the group (0-based)
    pub start_field_index: usize,

    /// Number of consecutive fields that form the group
    pub size: usize,

    /// Name of the generated struct for the group (e.g. "SatelliteInfo")
    pub struct_name: String,

    /// Name of the array field in the parent struct (e.g. "satellites")
    pub array_field_name: String,

    /// Name of the counter field in the parent struct (e.g. "satellites_count")
    pub count_field_name: String,

    /// Computed maximum number of repetitions
    pub max_repetitions: usize,
}

impl RepeatingFieldSetInfo {
    /// Extract repeating-field metadata from the PGN definition.
    ///
    /// # Arguments
    /// * `pgn` - Full PGN definition from canboat.json
    /// * `set_number` - Group number (1, 2, or 3)
    ///
    /// # Returns
    /// Returns `Some(RepeatingFieldSetInfo)` if the group exists, `None` otherwise.
    pub fn extract_from_pgn(pgn: &PgnInstructions, set_number: u8) -> Option<Self> {
        // Extract metadata depending on the group number.
        // IMPORTANT: start/count fields reference Orders, not indices.
        let (size, start_field_order, count_field_order) = match set_number {
            1 => (
                pgn.repeating_field_set_1_size?,
                pgn.repeating_field_set_1_start_field?,
                pgn.repeating_field_set_1_count_field,
            ),
            2 => (
                pgn.repeating_field_set_2_size?,
                pgn.repeating_field_set_2_start_field?,
                pgn.repeating_field_set_2_count_field,
            ),
            _ => return None,
        };

        // Convert Orders into array indices.
        // canboat.json uses 1-based Orders; convert them to 0-based indices.
        let start_field_index = pgn
            .fields
            .iter()
            .position(|f| f.order == start_field_order)?;
        let count_field_index =
            count_field_order.and_then(|order| pgn.fields.iter().position(|f| f.order == order));

        // Derive the nested struct name from the group's first field.
        // Example: "satellitePrn" → "SatellitePrnInfo".
        // More reliable than using the counter, which may have ambiguous names.
        let struct_name = {
            let first_field = pgn.fields.get(start_field_index)?;
            let base_name = to_pascal_case(&first_field.id, PascalCaseMode::Soft);
            format!("{}Info", base_name)
        };

        // Array name: plural snake_case form of the struct name ("SatelliteInfo" → "satellites").
        let array_field_name = pluralize_field_name(&struct_name);

        // Counter name: array name + "_count" ("satellites" → "satellites_count").
        let count_field_name = format!("{}_count", array_field_name);

        // Compute the maximum repetition count based on the Fast Packet payload (223 bytes).
        let max_repetitions = calculate_max_repetitions(pgn, start_field_index, size as usize);

        Some(Self {
            count_field_index,
            start_field_index,
            size: size as usize,
            struct_name,
            array_field_name,
            count_field_name,
            max_repetitions,
        })
    }
}

#[cfg(test)]
/// Derive the struct name from the counter field name.
///
/// **Examples**:
/// - "numberOfSatellites" → "SatelliteInfo"
/// - "referenceStations" → "ReferenceStationInfo"
/// - "itemCount" → "ItemInfo"
fn derive_struct_name_from_counter(counter_field_name: &str) -> String {
    // Strip common prefixes
    let name = counter_field_name
        .trim_start_matches("numberOf")
        .trim_start_matches("number_of")
        .trim_start_matches("count");

    // Convert to PascalCase and append "Info"
    let base_name = to_pascal_case(name, PascalCaseMode::Soft);

    // Remove trailing "s" (plural) when present
    let singular = if base_name.ends_with('s') && base_name.len() > 1 {
        &base_name[..base_name.len() - 1]
    } else {
        &base_name
    };

    format!("{}Info", singular)
}

/// Convert the struct name into a plural snake_case array field name.
///
/// **Examples**:
/// - "SatelliteInfo" → "satellites"
/// - "ReferenceStationInfo" → "reference_stations"
fn pluralize_field_name(struct_name: &str) -> String {
    // Remove "Info" suffix
    let base = struct_name.trim_end_matches("Info");

    // Convert to snake_case (empty suffix)
    let snake = to_snake_case(base, "");

    // Append "s" to form the plural
    format!("{}s", snake)
}

/// Compute the maximum allowed number of repetitions.
///
/// **Logic**
/// 1. Compute the bit-size of a single group instance
/// 2. Determine remaining payload space (223 bytes max)
/// 3. Divide to obtain the maximum instance count
/// 4. Clamp to a reasonable value (32 by default)
///
/// # Arguments
/// * `pgn` – PGN definition
/// * `start_index` – index of the first field in the group
/// * `size` – number of fields in the group
fn calculate_max_repetitions(pgn: &PgnInstructions, start_index: usize, size: usize) -> usize {
    const MAX_FAST_PACKET_BYTES: usize = 223;
    const DEFAULT_MAX: usize = 32;
    const BITS_PER_BYTE: usize = 8;

    // Compute size (in bits) of a single group instance
    let mut group_size_bits = 0;
    for i in start_index..(start_index + size).min(pgn.fields.len()) {
        if let Some(field) = pgn.fields.get(i) {
            group_size_bits += field.bits_length.unwrap_or(8) as usize;
        }
    }

    if group_size_bits == 0 {
        return DEFAULT_MAX;
    }

    // Compute bit-size of the fixed portion (before the repeating group)
    let mut fixed_size_bits = 0;
    for i in 0..start_index.min(pgn.fields.len()) {
        if let Some(field) = pgn.fields.get(i) {
            fixed_size_bits += field.bits_length.unwrap_or(8) as usize;
        }
    }

    // Remaining space available for repetitions
    let available_bits = (MAX_FAST_PACKET_BYTES * BITS_PER_BYTE).saturating_sub(fixed_size_bits);

    // Nombre max d'instances
    let calculated_max = available_bits / group_size_bits;

    // Clamp to a reasonable value
    calculated_max.min(DEFAULT_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_struct_name() {
        assert_eq!(
            derive_struct_name_from_counter("numberOfSatellites"),
            "SatelliteInfo"
        );
        assert_eq!(
            derive_struct_name_from_counter("referenceStations"),
            "ReferenceStationInfo"
        );
        assert_eq!(derive_struct_name_from_counter("itemCount"), "ItemInfo");
    }

    #[test]
    fn test_pluralize_field_name() {
        assert_eq!(pluralize_field_name("SatelliteInfo"), "satellites");
        assert_eq!(
            pluralize_field_name("ReferenceStationInfo"),
            "reference_stations"
        );
        assert_eq!(pluralize_field_name("ItemInfo"), "items");
    }
}
