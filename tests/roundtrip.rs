//! Encode/decode round-trip coverage against the bundled `canboat.json`
//! fixture (see `build_core/var/canboat.json` and `DESIGN.md`).
//!
//! These tests build a `fields` map in the shape `marshal_message` expects
//! (raw codes for `Lookup`, physical-unit `Integer`/`Float` for everything
//! else), marshal it, then decode the resulting bytes and check the
//! resolved shape `decode_pgn` produces (`Lookup` names, `Integer`/`Float`
//! physical values). The two directions aren't symmetric -- `Lookup`
//! fields decode to a resolved name, not the raw code -- so a full
//! decode(encode(decode(x))) cycle isn't attempted here.
use std::collections::BTreeMap;

use n2k_analyzer::decode::decode_pgn;
use n2k_analyzer::encode::marshal_message;
use n2k_analyzer::{catalog, DecodedValue};

const ISO_ADDRESS_CLAIM: u32 = 60928;
const GNSS_POSITION_DATA: u32 = 129029;
const WATERMAKER: u32 = 130567;

#[test]
fn catalog_exposes_every_fixture_pgn() {
    let cat = catalog();
    for pgn in [59904, 60928, 126993, 126996, 126998, 129029, 130567] {
        assert!(
            cat.entries_for(pgn).next().is_some(),
            "catalog is missing pgn {pgn}"
        );
    }
}

#[test]
fn iso_address_claim_round_trips_without_floating_point() {
    let cat = catalog();
    let spec = cat.entries_for(ISO_ADDRESS_CLAIM).next().unwrap();

    let mut fields = BTreeMap::new();
    fields.insert("uniqueNumber", DecodedValue::Integer(123_456));
    fields.insert("manufacturerCode", DecodedValue::Integer(1852)); // Navico
    fields.insert("deviceInstanceLower", DecodedValue::Integer(0));
    fields.insert("deviceInstanceUpper", DecodedValue::Integer(2));
    fields.insert("deviceFunction", DecodedValue::Integer(150)); // Rudder
    fields.insert("deviceClass", DecodedValue::Integer(60)); // Navigation
    fields.insert("systemInstance", DecodedValue::Integer(1));
    fields.insert("industryGroup", DecodedValue::Integer(4)); // Marine
    fields.insert("arbitraryAddressCapable", DecodedValue::Integer(1)); // Yes

    let bytes = marshal_message(cat, spec, &fields).expect("marshal");
    assert_eq!(bytes.len(), 8);

    let decoded = decode_pgn(cat, spec, &bytes);

    assert_eq!(decoded.get("uniqueNumber"), Some(&DecodedValue::Integer(123_456)));
    assert_eq!(
        decoded.get("manufacturerCode"),
        Some(&DecodedValue::Str("Navico".to_string()))
    );
    assert_eq!(decoded.get("deviceInstanceLower"), Some(&DecodedValue::Integer(0)));
    assert_eq!(decoded.get("deviceInstanceUpper"), Some(&DecodedValue::Integer(2)));
    assert_eq!(
        decoded.get("deviceFunction"),
        Some(&DecodedValue::Str("Rudder".to_string()))
    );
    assert_eq!(
        decoded.get("deviceClass"),
        Some(&DecodedValue::Str("Navigation".to_string()))
    );
    assert_eq!(decoded.get("systemInstance"), Some(&DecodedValue::Integer(1)));
    assert_eq!(
        decoded.get("industryGroup"),
        Some(&DecodedValue::Str("Marine".to_string()))
    );
    assert_eq!(
        decoded.get("arbitraryAddressCapable"),
        Some(&DecodedValue::Str("Yes".to_string()))
    );

    // Reserved bits never surface in the decoded map.
    assert!(decoded.get("reserved").is_none());
}

#[test]
fn watermaker_status_round_trips_resolution_scaled_fields() {
    let cat = catalog();
    let spec = cat.entries_for(WATERMAKER).next().unwrap();

    let mut fields = BTreeMap::new();
    fields.insert("instance", DecodedValue::Integer(5));
    fields.insert("watermakerOperatingState", DecodedValue::Integer(2)); // Producing
    fields.insert("salinity", DecodedValue::Integer(1500));
    fields.insert("productWaterTemperature", DecodedValue::Float(28.0));
    fields.insert("runTime", DecodedValue::Integer(3600));
    fields.insert("systemStatus", DecodedValue::Integer(1)); // Warning
    fields.insert("emergencyStop", DecodedValue::Integer(0)); // No
    fields.insert("productionRate", DecodedValue::Float(50.0));
    fields.insert("tankLevel", DecodedValue::Float(80.0));

    let bytes = marshal_message(cat, spec, &fields).expect("marshal");
    assert_eq!(bytes.len(), 15);

    let decoded = decode_pgn(cat, spec, &bytes);

    assert_eq!(decoded.get("instance"), Some(&DecodedValue::Integer(5)));
    assert_eq!(
        decoded.get("watermakerOperatingState"),
        Some(&DecodedValue::Str("Producing".to_string()))
    );
    assert_eq!(decoded.get("salinity"), Some(&DecodedValue::Integer(1500)));
    assert_approx(decoded.get("productWaterTemperature"), 28.0, 0.02);
    assert_eq!(decoded.get("runTime"), Some(&DecodedValue::Integer(3600)));
    assert_eq!(
        decoded.get("systemStatus"),
        Some(&DecodedValue::Str("Warning".to_string()))
    );
    assert_eq!(
        decoded.get("emergencyStop"),
        Some(&DecodedValue::Str("No".to_string()))
    );
    assert_approx(decoded.get("productionRate"), 50.0, 0.2);
    assert_approx(decoded.get("tankLevel"), 80.0, 0.5);

    for reserved in ["reserved1", "reserved2", "reserved3"] {
        assert!(decoded.get(reserved).is_none());
    }
}

#[test]
fn gnss_position_data_round_trips_its_repeating_group() {
    let cat = catalog();
    let spec = cat.entries_for(GNSS_POSITION_DATA).next().unwrap();

    let mut first_station = BTreeMap::new();
    first_station.insert("referenceStationType", DecodedValue::Integer(0)); // GPS
    first_station.insert("referenceStationId", DecodedValue::Integer(100));
    first_station.insert("ageOfDgnssCorrections", DecodedValue::Float(0.0));

    let mut second_station = BTreeMap::new();
    second_station.insert("referenceStationType", DecodedValue::Integer(1)); // GLONASS
    second_station.insert("referenceStationId", DecodedValue::Integer(200));
    second_station.insert("ageOfDgnssCorrections", DecodedValue::Float(0.0));

    let mut fields = BTreeMap::new();
    fields.insert("sid", DecodedValue::Integer(9));
    fields.insert("date", DecodedValue::Integer(20_000));
    fields.insert("time", DecodedValue::Float(3600.0));
    fields.insert("latitude", DecodedValue::Float(45.5));
    fields.insert("longitude", DecodedValue::Float(-122.25));
    fields.insert("altitude", DecodedValue::Float(12.0));
    fields.insert("gnssType", DecodedValue::Integer(0)); // GPS
    fields.insert("method", DecodedValue::Integer(1)); // GNSS fix
    fields.insert("integrity", DecodedValue::Integer(0)); // No integrity checking
    fields.insert("numberOfSvs", DecodedValue::Integer(5));
    fields.insert("hdop", DecodedValue::Float(1.5));
    fields.insert("pdop", DecodedValue::Float(2.0));
    fields.insert("geoidalSeparation", DecodedValue::Float(10.5));
    fields.insert("numberOfReferenceStations", DecodedValue::Integer(2));
    fields.insert(
        "referenceStationType",
        DecodedValue::Repeating(vec![first_station, second_station]),
    );

    let bytes = marshal_message(cat, spec, &fields).expect("marshal");
    let decoded = decode_pgn(cat, spec, &bytes);

    assert_eq!(decoded.get("sid"), Some(&DecodedValue::Integer(9)));
    assert_eq!(decoded.get("numberOfSvs"), Some(&DecodedValue::Integer(5)));
    assert_eq!(
        decoded.get("gnssType"),
        Some(&DecodedValue::Str("GPS".to_string()))
    );
    assert_approx(decoded.get("latitude"), 45.5, 0.000_001);
    assert_approx(decoded.get("longitude"), -122.25, 0.000_001);

    match decoded.get("referenceStationType") {
        Some(DecodedValue::Repeating(instances)) => {
            assert_eq!(instances.len(), 2);
            assert_eq!(
                instances[0].get("referenceStationType"),
                Some(&DecodedValue::Str("GPS".to_string()))
            );
            assert_eq!(
                instances[0].get("referenceStationId"),
                Some(&DecodedValue::Integer(100))
            );
            assert_eq!(
                instances[1].get("referenceStationType"),
                Some(&DecodedValue::Str("GLONASS".to_string()))
            );
            assert_eq!(
                instances[1].get("referenceStationId"),
                Some(&DecodedValue::Integer(200))
            );
        }
        other => panic!("expected a repeating group, got {other:?}"),
    }
}

fn assert_approx(value: Option<&DecodedValue>, expected: f64, tolerance: f64) {
    match value {
        Some(DecodedValue::Float(actual)) => {
            assert!(
                (actual - expected).abs() <= tolerance,
                "expected ~{expected}, got {actual}"
            );
        }
        other => panic!("expected a float close to {expected}, got {other:?}"),
    }
}
