//! Actisense N2K ASCII format: `A<seconds>[.<frac>] <src-hex> <pgn-hex> <data-hex>`
//! Payload is already coalesced.
use crate::core::{RawFrame, Timestamp};
use crate::error::WireError;

pub fn looks_like_actisense(line: &str) -> bool {
    let Some(rest) = line.strip_prefix('A') else {
        return false;
    };
    let mut tokens = rest.split_whitespace();
    let Some(seconds) = tokens.next() else {
        return false;
    };
    if seconds.parse::<f64>().is_err() {
        return false;
    }
    tokens.clone().count() >= 2
        && tokens.all(|t| t.chars().all(|c| c.is_ascii_hexdigit()))
}

pub fn parse(line: &str) -> Result<RawFrame, WireError> {
    let rest = line.strip_prefix('A').ok_or_else(|| malformed("missing 'A' prefix"))?;
    let mut tokens = rest.split_whitespace();

    let seconds_token = tokens.next().ok_or_else(|| malformed("missing timestamp"))?;
    let seconds: f64 = seconds_token.parse().map_err(|_| malformed("invalid timestamp"))?;

    let src_token = tokens.next().ok_or_else(|| malformed("missing src"))?;
    let src = u8::from_str_radix(src_token, 16).map_err(|_| malformed("invalid src hex"))?;

    let pgn_token = tokens.next().ok_or_else(|| malformed("missing pgn"))?;
    let pgn = u32::from_str_radix(pgn_token, 16).map_err(|_| malformed("invalid pgn hex"))?;

    let data_token = tokens.next().ok_or_else(|| malformed("missing data"))?;
    if data_token.len() % 2 != 0 {
        return Err(WireError::InvalidHex);
    }
    let mut data = Vec::with_capacity(data_token.len() / 2);
    let bytes = data_token.as_bytes();
    for chunk in bytes.chunks(2) {
        let byte_str = std::str::from_utf8(chunk).map_err(|_| WireError::InvalidHex)?;
        data.push(u8::from_str_radix(byte_str, 16).map_err(|_| WireError::InvalidHex)?);
    }

    Ok(RawFrame {
        timestamp: Timestamp::Relative(seconds),
        priority: 6,
        pgn,
        src,
        dst: 255,
        data,
    })
}

fn malformed(reason: &str) -> WireError {
    WireError::Malformed {
        format: "Actisense",
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_and_parses_line() {
        let line = "A123456.789 C8 1FE09 0102030405060708";
        assert!(looks_like_actisense(line));
        let frame = parse(line).unwrap();
        assert_eq!(frame.src, 0xC8);
        assert_eq!(frame.pgn, 0x1FE09);
        assert_eq!(frame.data.len(), 8);
    }
}
