//! Plain/Fast format: `HH:MM:SS.mmm,<prio>,<pgn>,<src>,<dst>,<len>,<b0>,<b1>,...`
//! One CAN frame per line; `Fast` is the same shape with a coalesced
//! (9+ byte) tail, left to the reassembler since the frame shape is
//! otherwise identical.
use crate::core::{RawFrame, Timestamp};
use crate::error::WireError;

use super::parse_hex_byte;

pub fn parse(line: &str) -> Result<RawFrame, WireError> {
    let mut fields = line.split(',');

    let ts = fields
        .next()
        .ok_or_else(|| malformed("missing timestamp"))?;
    let timestamp = parse_timestamp(ts)?;

    let priority: u8 = fields
        .next()
        .ok_or_else(|| malformed("missing priority"))?
        .trim()
        .parse()
        .map_err(|_| malformed("invalid priority"))?;
    let pgn: u32 = fields
        .next()
        .ok_or_else(|| malformed("missing pgn"))?
        .trim()
        .parse()
        .map_err(|_| malformed("invalid pgn"))?;
    let src: u8 = fields
        .next()
        .ok_or_else(|| malformed("missing src"))?
        .trim()
        .parse()
        .map_err(|_| malformed("invalid src"))?;
    let dst: u8 = fields
        .next()
        .ok_or_else(|| malformed("missing dst"))?
        .trim()
        .parse()
        .map_err(|_| malformed("invalid dst"))?;
    let declared_len: usize = fields
        .next()
        .ok_or_else(|| malformed("missing len"))?
        .trim()
        .parse()
        .map_err(|_| malformed("invalid len"))?;

    let data: Vec<u8> = fields
        .map(parse_hex_byte)
        .collect::<Result<_, _>>()?;

    if data.len() < declared_len {
        return Err(malformed("fewer data bytes than declared length"));
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

fn parse_timestamp(token: &str) -> Result<Timestamp, WireError> {
    let parts: Vec<&str> = token.splitn(3, ':').collect();
    if parts.len() != 3 {
        return Err(malformed("invalid timestamp"));
    }
    let h: u32 = parts[0].parse().map_err(|_| malformed("invalid hour"))?;
    let m: u32 = parts[1].parse().map_err(|_| malformed("invalid minute"))?;
    let s: f64 = parts[2].parse().map_err(|_| malformed("invalid seconds"))?;
    let whole_s = s.trunc() as u32;
    let nanos = ((s.fract()) * 1_000_000_000.0).round() as u32;
    let time = chrono::NaiveTime::from_hms_nano_opt(h, m, whole_s, nanos)
        .ok_or_else(|| malformed("timestamp out of range"))?;
    Ok(Timestamp::Wall(time))
}

fn malformed(reason: &str) -> WireError {
    WireError::Malformed {
        format: "Plain",
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_frame_line() {
        let line = "10:20:30.123,6,130567,200,255,8,01,02,03,04,05,06,07,08";
        let frame = parse(line).unwrap();
        assert_eq!(frame.pgn, 130567);
        assert_eq!(frame.src, 200);
        assert_eq!(frame.data, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn rejects_short_data() {
        let line = "10:20:30.123,6,130567,200,255,8,01,02";
        assert!(parse(line).is_err());
    }
}
