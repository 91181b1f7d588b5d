//! # Quickstart Example
//!
//! Minimal tour of n2k-analyzer:
//! - Look up catalog entries for a PGN
//! - Build a CAN identifier
//! - Marshal a decoded field map into raw bytes, then decode it back
//! - Feed a textual log line through the stateful `Decoder`
//!
//! ```bash
//! cargo run --example quickstart
//! ```
use std::collections::BTreeMap;

use n2k_analyzer::can_id::CanId;
use n2k_analyzer::decode::decode_pgn;
use n2k_analyzer::encode::marshal_message;
use n2k_analyzer::{catalog, DecodedValue, Decoder, LineOutcome};

fn main() {
    println!("=== n2k-analyzer Quickstart ===\n");

    // ======================================================================
    // 1. Resolve a PGN in the catalog
    // ======================================================================
    println!("1. Catalog lookup for PGN 60928 (ISO Address Claim)");
    let catalog = catalog();
    let spec = catalog
        .entries_for(60928)
        .next()
        .expect("60928 is in the bundled catalog");
    println!("   {} fields, packet type {:?}\n", spec.fields.len(), spec.packet_type);

    // ======================================================================
    // 2. Build a CAN identifier
    // ======================================================================
    println!("2. Building a CAN identifier");
    let can_id = CanId::builder(60928, 42)
        .with_priority(6)
        .build()
        .expect("valid CAN ID");
    println!("   CAN ID: 0x{:08X}", can_id.0);
    println!("   PGN: {}  Source: {}\n", can_id.pgn(), can_id.source_address());

    // ======================================================================
    // 3. Marshal a field map into raw bytes
    // ======================================================================
    println!("3. Marshaling an address claim");
    let mut fields = BTreeMap::new();
    fields.insert("uniqueNumber", DecodedValue::Integer(12_345));
    fields.insert("manufacturerCode", DecodedValue::Integer(229)); // Garmin
    fields.insert("deviceInstanceLower", DecodedValue::Integer(0));
    fields.insert("deviceInstanceUpper", DecodedValue::Integer(0));
    fields.insert("deviceFunction", DecodedValue::Integer(150)); // Rudder
    fields.insert("deviceClass", DecodedValue::Integer(60)); // Navigation
    fields.insert("systemInstance", DecodedValue::Integer(0));
    fields.insert("industryGroup", DecodedValue::Integer(4)); // Marine
    fields.insert("arbitraryAddressCapable", DecodedValue::Integer(1)); // Yes

    let bytes = marshal_message(catalog, spec, &fields).expect("marshal");
    print!("   Payload:");
    for byte in &bytes {
        print!(" {:02X}", byte);
    }
    println!();

    // ======================================================================
    // 4. Decode the bytes back
    // ======================================================================
    println!("\n4. Decoding the payload back");
    let decoded = decode_pgn(catalog, spec, &bytes);
    for (name, value) in &decoded {
        println!("   {name}: {value:?}");
    }

    // ======================================================================
    // 5. Feed a logged line through the stateful Decoder
    // ======================================================================
    println!("\n5. Feeding a textual log line through Decoder");
    let mut decoder = Decoder::new(catalog);
    let line = "10:20:30.123,6,126993,12,255,8,10,27,00,00,00,00,00,00";
    match decoder.feed_line(line) {
        LineOutcome::Message(msg) => {
            println!("   decoded pgn {} from {}: {} fields", msg.pgn, msg.src, msg.fields.len());
        }
        LineOutcome::Pending => println!("   fragment consumed, awaiting more frames"),
        LineOutcome::Rejected(err) => println!("   rejected: {err}"),
    }

    println!("\nQuickstart complete.");
}
