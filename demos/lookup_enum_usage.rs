//! Demonstrates resolving `Lookup` fields directly against named catalog
//! tables, and how the same names come back out of a decoded message.
//!
//! ```bash
//! cargo run --example lookup_enum_usage
//! ```
use std::collections::BTreeMap;

use n2k_analyzer::decode::decode_pgn;
use n2k_analyzer::encode::marshal_message;
use n2k_analyzer::{catalog, DecodedValue};

fn main() {
    println!("=== Lookup table resolution ===\n");

    let catalog = catalog();

    // ======================================================================
    // 1. Resolve raw codes against a named lookup table directly.
    // ======================================================================
    let manufacturers = catalog
        .lookup("MANUFACTURER_CODE")
        .expect("MANUFACTURER_CODE is in the bundled catalog");
    for code in [1852, 1857, 229, 9999] {
        match manufacturers.resolve(code) {
            Some(name) => println!("manufacturer {code} -> {name}"),
            None => println!("manufacturer {code} -> <unknown>"),
        }
    }

    // ======================================================================
    // 2. The decode engine resolves the same tables automatically.
    // ======================================================================
    println!("\n=== Heartbeat with lookups ===\n");
    let spec = catalog
        .entries_for(126993)
        .next()
        .expect("126993 is in the bundled catalog");

    let mut fields = BTreeMap::new();
    fields.insert("dataTransmitOffset", DecodedValue::Float(0.0));
    fields.insert("sequenceCounter", DecodedValue::Integer(7));
    fields.insert("controllerState", DecodedValue::Integer(0)); // Enable
    fields.insert("equipmentStatus", DecodedValue::Integer(1)); // Fault

    let bytes = marshal_message(catalog, spec, &fields).expect("marshal");
    let decoded = decode_pgn(catalog, spec, &bytes);

    println!("controllerState: {:?}", decoded.get("controllerState"));
    println!("equipmentStatus: {:?}", decoded.get("equipmentStatus"));
}
