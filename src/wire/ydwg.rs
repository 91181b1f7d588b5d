//! YDWG-02 (Yacht Devices) format: one CAN frame per line.
//! `HH:MM:SS.mmm [RT] XX YY YY YY YY YY YY YY YY`
//! where `XX` is the hex 29-bit CAN identifier and `YY`×8 the data bytes.
//!
//! Grounded on the Yacht Devices Raw reader found in the example pack
//! (`nmea/nmea2000/yd.rs`), adapted to the `src`/`dst`/`pgn`/`priority`
//! split used throughout this crate instead of a trait-object `Raw` type.
use crate::can_id::CanId;
use crate::core::{RawFrame, Timestamp};
use crate::error::WireError;

pub fn looks_like_ydwg(line: &str) -> bool {
    let mut tokens = line.split_whitespace();
    let Some(ts) = tokens.next() else { return false };
    if !looks_like_hms(ts) {
        return false;
    }
    let Some(dir) = tokens.next() else { return false };
    if dir != "R" && dir != "T" {
        return false;
    }
    tokens.next().is_some()
}

fn looks_like_hms(token: &str) -> bool {
    let parts: Vec<&str> = token.split(':').collect();
    parts.len() == 3 && parts[2].contains('.')
}

pub fn parse(line: &str) -> Result<RawFrame, WireError> {
    let mut tokens = line.split_whitespace();

    let ts = tokens.next().ok_or_else(|| malformed("missing timestamp"))?;
    let timestamp = parse_timestamp(ts)?;

    let _direction = tokens.next().ok_or_else(|| malformed("missing direction"))?;

    let msgid_token = tokens.next().ok_or_else(|| malformed("missing msgid"))?;
    let msgid = u32::from_str_radix(msgid_token, 16).map_err(|_| malformed("invalid msgid hex"))?;
    let can_id = CanId(msgid);

    let data: Vec<u8> = tokens
        .map(|t| u8::from_str_radix(t, 16).map_err(|_| WireError::InvalidHex))
        .collect::<Result<_, _>>()?;
    if data.is_empty() {
        return Err(malformed("no data bytes"));
    }

    Ok(RawFrame {
        timestamp,
        priority: can_id.priority(),
        pgn: can_id.pgn(),
        src: can_id.source_address(),
        dst: can_id.destination().unwrap_or(255),
        data,
    })
}

fn parse_timestamp(token: &str) -> Result<Timestamp, WireError> {
    let parts: Vec<&str> = token.splitn(3, ':').collect();
    if parts.len() != 3 {
        return Err(malformed("invalid timestamp"));
    }
    let h: u32 = parts[0].parse().map_err(|_| malformed("invalid hour"))?;
    let m: u32 = parts[1].parse().map_err(|_| malformed("invalid minute"))?;
    let s: f64 = parts[2].parse().map_err(|_| malformed("invalid seconds"))?;
    let time = chrono::NaiveTime::from_hms_nano_opt(
        h,
        m,
        s.trunc() as u32,
        (s.fract() * 1_000_000_000.0).round() as u32,
    )
    .ok_or_else(|| malformed("timestamp out of range"))?;
    Ok(Timestamp::Wall(time))
}

fn malformed(reason: &str) -> WireError {
    WireError::Malformed {
        format: "YDWG-02",
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_and_parses_frame() {
        let line = "10:20:30.123 R 19F51464 01 02 03 04 05 06 07 08";
        assert!(looks_like_ydwg(line));
        let frame = parse(line).unwrap();
        assert_eq!(frame.data.len(), 8);
    }
}
