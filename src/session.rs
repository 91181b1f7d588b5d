//! Session orchestration (`C9`): ties wire detection, fast-packet
//! reassembly and PGN decoding into one per-connection pipeline.
//!
//! Owns the reassembly slot pool exclusively; nothing else in the crate
//! mutates state across calls, so a `Decoder` is the only `!Sync` type in
//! the public surface (the catalog it reads from is `Sync` and shared).
use log::{debug, warn};

use crate::catalog::Catalog;
use crate::core::{DecodedMessage, RawFrame};
use crate::decode::decode_message;
use crate::error::{MatchError, WireError};
use crate::reassembly::{ProcessResult, Reassembler};
use crate::wire::{self, Parsed};

/// Outcome of feeding one line of text into a `Decoder`.
#[derive(Debug)]
pub enum LineOutcome {
    /// The line contributed a fragment to an in-progress fast-packet burst.
    Pending,
    /// A full message (single-frame, coalesced, or a completed burst) decoded.
    Message(DecodedMessage),
    /// The line was rejected outright (unknown format, malformed fields).
    Rejected(WireError),
}

/// Stateful per-connection decoder: wire parsing + reassembly + PGN decode.
pub struct Decoder<'c> {
    catalog: &'c Catalog,
    reassembler: Reassembler,
}

impl<'c> Decoder<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            reassembler: Reassembler::default(),
        }
    }

    pub fn with_slot_count(catalog: &'c Catalog, slot_count: usize) -> Self {
        Self {
            catalog,
            reassembler: Reassembler::new(slot_count),
        }
    }

    /// Feed one line of text (any supported wire dialect) through the pipeline.
    pub fn feed_line(&mut self, line: &str) -> LineOutcome {
        let parsed = match wire::parse_auto(line) {
            Ok(parsed) => parsed,
            Err(err) => return LineOutcome::Rejected(err),
        };

        match parsed {
            Parsed::Coalesced(frame) => self.decode_frame(frame),
            Parsed::Frame(frame) => self.feed_frame(frame),
        }
    }

    /// Feed one already-split CAN frame (the `Plain`/`Fast`/GarminCSV/YDWG
    /// path, where reassembly has not yet run).
    pub fn feed_frame(&mut self, frame: RawFrame) -> LineOutcome {
        let needs_reassembly = self
            .catalog
            .entries_for(frame.pgn)
            .next()
            .is_some_and(|spec| spec.packet_type == crate::core::PacketType::Fast)
            && frame.data.len() <= 8;

        if !needs_reassembly {
            return self.decode_frame(frame);
        }

        match self
            .reassembler
            .process_frame(frame.src, frame.pgn, &frame.data)
        {
            Ok(ProcessResult::FragmentConsumed) => LineOutcome::Pending,
            Ok(ProcessResult::MessageComplete { data }) => {
                debug!("completed fast-packet burst for pgn={} src={}", frame.pgn, frame.src);
                self.decode_frame(RawFrame { data, ..frame })
            }
            Err(err) => {
                warn!("reassembly error for pgn={} src={}: {}", frame.pgn, frame.src, err);
                LineOutcome::Rejected(WireError::Malformed {
                    format: "fast-packet",
                    reason: err.to_string(),
                })
            }
        }
    }

    fn decode_frame(&self, frame: RawFrame) -> LineOutcome {
        match decode_message(self.catalog, &frame) {
            Ok(message) => LineOutcome::Message(message),
            Err(MatchError::NoMatchFieldAgreement { pgn }) => {
                warn!("no catalog entry for pgn={pgn} matched its match-fields");
                LineOutcome::Rejected(WireError::Malformed {
                    format: "match",
                    reason: format!("no match-field agreement for pgn {pgn}"),
                })
            }
            Err(err) => LineOutcome::Rejected(WireError::Malformed {
                format: "match",
                reason: err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, UnitSystem};
    use crate::core::{Completeness, FieldKind, FieldSpec, FieldTypeSpec, PacketType, PgnSpec, Signedness};

    fn test_catalog() -> catalog::Catalog {
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
            pgn: 130567,
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
    fn decodes_single_frame_plain_line() {
        let catalog = test_catalog();
        let mut decoder = Decoder::new(&catalog);
        let line = "10:20:30.123,6,130567,200,255,8,01,02,03,04,05,06,07,08";
        match decoder.feed_line(line) {
            LineOutcome::Message(msg) => assert_eq!(msg.pgn, 130567),
            other => panic!("expected a decoded message, got {other:?}"),
        }
    }

    #[test]
    fn rejects_garbage_line() {
        let catalog = test_catalog();
        let mut decoder = Decoder::new(&catalog);
        match decoder.feed_line("not a valid line") {
            LineOutcome::Rejected(_) => {}
            other => panic!("expected rejection, got {other:?}"),
        }
    }
}
