//! Airmar format: a timestamp, a bare `-` marker token, then priority, pgn,
//! source, destination and a coalesced hex payload.
//!
//! `<timestamp> - <prio> <pgn> <src> <dst> <b0> <b1> ...`
use crate::core::{RawFrame, Timestamp};
use crate::error::WireError;

use super::parse_hex_byte;

/// Detector rule 3 (spec S4.4): a standalone `-` token, or a first token
/// whose second character is `-`.
pub fn looks_like_airmar(line: &str) -> bool {
    let mut tokens = line.split_whitespace();
    let Some(first) = tokens.next() else {
        return false;
    };
    if first.len() >= 2 && first.as_bytes()[1] == b'-' {
        return true;
    }
    tokens.any(|t| t == "-")
}

pub fn parse(line: &str) -> Result<RawFrame, WireError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let marker = tokens
        .iter()
        .position(|&t| t == "-")
        .ok_or_else(|| malformed("missing '-' marker"))?;
    if marker == 0 {
        return Err(malformed("missing leading timestamp"));
    }

    let timestamp_token = tokens[0];
    let timestamp = Timestamp::Relative(
        timestamp_token
            .parse()
            .map_err(|_| malformed("invalid timestamp"))?,
    );

    let rest = &tokens[marker + 1..];
    if rest.len() < 4 {
        return Err(malformed("missing priority/pgn/src/dst"));
    }
    let priority: u8 = rest[0].parse().map_err(|_| malformed("invalid priority"))?;
    let pgn: u32 = rest[1].parse().map_err(|_| malformed("invalid pgn"))?;
    let src: u8 = rest[2].parse().map_err(|_| malformed("invalid src"))?;
    let dst: u8 = rest[3].parse().map_err(|_| malformed("invalid dst"))?;

    let data: Vec<u8> = rest[4..]
        .iter()
        .map(|t| parse_hex_byte(t))
        .collect::<Result<_, _>>()?;

    if data.is_empty() {
        return Err(malformed("no payload bytes"));
    }

    Ok(RawFrame {
        timestamp,
        priority,
        pgn,
        src,
        dst,
        data,
    })
}

fn malformed(reason: &str) -> WireError {
    WireError::Malformed {
        format: "Airmar",
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_bare_dash_marker() {
        assert!(looks_like_airmar("1700000000.0 - 6 130567 200 255 01 02"));
    }

    #[test]
    fn parses_coalesced_payload() {
        let line = "1700000000.0 - 6 130567 200 255 01 02 03 04 05 06 07 08 09 0A";
        let frame = parse(line).unwrap();
        assert_eq!(frame.pgn, 130567);
        assert_eq!(frame.data.len(), 10);
    }
}
