//! Chetco format: `$PCDIN,<pgn-hex>,<timestamp-hex>,<src-hex>,<data-hex>[*checksum]`
//! Payload is already coalesced (a full fast-packet burst on one line).
use crate::core::{RawFrame, Timestamp};
use crate::error::WireError;

pub fn parse(line: &str) -> Result<RawFrame, WireError> {
    let body = line.strip_prefix("$PCDIN,").ok_or_else(|| malformed("missing $PCDIN prefix"))?;
    let mut fields = body.split(',');

    let pgn = u32::from_str_radix(fields.next().ok_or_else(|| malformed("missing pgn"))?, 16)
        .map_err(|_| malformed("invalid pgn hex"))?;
    let timestamp_hex = fields.next().ok_or_else(|| malformed("missing timestamp"))?;
    let timestamp_raw = u32::from_str_radix(timestamp_hex, 16).map_err(|_| malformed("invalid timestamp hex"))?;
    let timestamp = Timestamp::Relative(timestamp_raw as f64 / 10_000.0);

    let src_token = fields.next().ok_or_else(|| malformed("missing src"))?;
    let src = u8::from_str_radix(src_token, 16).map_err(|_| malformed("invalid src hex"))?;

    let data_token = fields.next().ok_or_else(|| malformed("missing data"))?;
    let data_hex = data_token.split('*').next().unwrap_or(data_token);
    if data_hex.len() % 2 != 0 {
        return Err(WireError::InvalidHex);
    }
    let mut data = Vec::with_capacity(data_hex.len() / 2);
    let mut chars = data_hex.chars();
    while let (Some(hi), Some(lo)) = (chars.next(), chars.next()) {
        let byte_str: String = [hi, lo].iter().collect();
        data.push(u8::from_str_radix(&byte_str, 16).map_err(|_| WireError::InvalidHex)?);
    }

    Ok(RawFrame {
        timestamp,
        priority: 6,
        pgn,
        src,
        dst: 255,
        data,
    })
}

fn malformed(reason: &str) -> WireError {
    WireError::Malformed {
        format: "Chetco",
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_line() {
        let line = "$PCDIN,01F119,0052C5EB,02,A000000C68246809*16";
        let frame = parse(line).unwrap();
        assert_eq!(frame.pgn, 0x01F119);
        assert_eq!(frame.src, 0x02);
        assert_eq!(frame.data.len(), 8);
    }
}
