//! End-to-end coverage of the `Decoder`: text-line parsing, fast-packet
//! reassembly and PGN decode wired together, driven with payloads produced
//! by `encode::marshal_message`/`encode::split_fast_packet` against the
//! bundled `canboat.json` fixture.
use std::collections::BTreeMap;

use n2k_analyzer::encode::{marshal_message, split_fast_packet};
use n2k_analyzer::{catalog, DecodedValue, Decoder, LineOutcome};

fn hex_line(pgn: u32, src: u8, frame: &[u8; 8]) -> String {
    let hex: Vec<String> = frame.iter().map(|b| format!("{:02X}", b)).collect();
    format!("10:20:30.100,6,{pgn},{src},255,8,{}", hex.join(","))
}

#[test]
fn single_frame_pgn_decodes_in_one_line() {
    let cat = catalog();
    let spec = cat.entries_for(60928).next().unwrap();

    let mut fields = BTreeMap::new();
    fields.insert("uniqueNumber", DecodedValue::Integer(42));
    fields.insert("manufacturerCode", DecodedValue::Integer(1857)); // Simrad
    fields.insert("deviceInstanceLower", DecodedValue::Integer(1));
    fields.insert("deviceInstanceUpper", DecodedValue::Integer(1));
    fields.insert("deviceFunction", DecodedValue::Integer(132)); // Gateway
    fields.insert("deviceClass", DecodedValue::Integer(25)); // Internetwork Device
    fields.insert("systemInstance", DecodedValue::Integer(0));
    fields.insert("industryGroup", DecodedValue::Integer(4)); // Marine
    fields.insert("arbitraryAddressCapable", DecodedValue::Integer(0)); // No

    let bytes = marshal_message(cat, spec, &fields).unwrap();
    let mut frame = [0xFFu8; 8];
    frame.copy_from_slice(&bytes);

    let mut decoder = Decoder::new(cat);
    match decoder.feed_line(&hex_line(60928, 7, &frame)) {
        LineOutcome::Message(msg) => {
            assert_eq!(msg.pgn, 60928);
            assert_eq!(msg.src, 7);
            assert_eq!(
                msg.fields.get("manufacturerCode"),
                Some(&DecodedValue::Str("Simrad".to_string()))
            );
        }
        other => panic!("expected a decoded message, got {other:?}"),
    }
}

#[test]
fn fast_packet_burst_completes_even_when_frames_arrive_out_of_order() {
    let cat = catalog();
    let spec = cat.entries_for(130567).next().unwrap();

    let mut fields = BTreeMap::new();
    fields.insert("instance", DecodedValue::Integer(3));
    fields.insert("watermakerOperatingState", DecodedValue::Integer(1)); // Initiating
    fields.insert("salinity", DecodedValue::Integer(900));
    fields.insert("productWaterTemperature", DecodedValue::Float(22.5));
    fields.insert("runTime", DecodedValue::Integer(120));
    fields.insert("systemStatus", DecodedValue::Integer(0)); // OK
    fields.insert("emergencyStop", DecodedValue::Integer(0)); // No
    fields.insert("productionRate", DecodedValue::Float(40.0));
    fields.insert("tankLevel", DecodedValue::Float(60.0));

    let payload = marshal_message(cat, spec, &fields).unwrap();
    assert_eq!(payload.len(), 15);

    let frames = split_fast_packet(&payload, 5);
    assert_eq!(frames.len(), 3);

    let lines: Vec<String> = frames.iter().map(|f| hex_line(130567, 11, f)).collect();

    let mut decoder = Decoder::new(cat);

    // Frame 0 must arrive first to open the reassembly slot; frames 1 and 2
    // are then fed out of order.
    assert!(matches!(decoder.feed_line(&lines[0]), LineOutcome::Pending));
    assert!(matches!(decoder.feed_line(&lines[2]), LineOutcome::Pending));

    match decoder.feed_line(&lines[1]) {
        LineOutcome::Message(msg) => {
            assert_eq!(msg.pgn, 130567);
            assert_eq!(msg.src, 11);
            assert_eq!(msg.fields.get("instance"), Some(&DecodedValue::Integer(3)));
            assert_eq!(
                msg.fields.get("watermakerOperatingState"),
                Some(&DecodedValue::Str("Initiating".to_string()))
            );
            match msg.fields.get("productWaterTemperature") {
                Some(DecodedValue::Float(v)) => assert!((v - 22.5).abs() < 0.02),
                other => panic!("expected a float, got {other:?}"),
            }
        }
        other => panic!("expected burst completion, got {other:?}"),
    }
}

#[test]
fn garbage_line_is_rejected_not_panicked() {
    let cat = catalog();
    let mut decoder = Decoder::new(cat);
    match decoder.feed_line("this is not a wire frame") {
        LineOutcome::Rejected(_) => {}
        other => panic!("expected rejection, got {other:?}"),
    }
}
