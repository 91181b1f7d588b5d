//! NavLink2 format: `!PDGY,<pgn>,<prio>,<src>,<dst>,<ts-float>,<base64-payload>`
//! Payload is already coalesced.
use base64::Engine;

use crate::core::{RawFrame, Timestamp};
use crate::error::WireError;

pub fn looks_like_navlink2(line: &str) -> bool {
    let Some(body) = line.strip_prefix("!PDGY,") else {
        return false;
    };
    let fields: Vec<&str> = body.split(',').collect();
    fields.len() == 6
        && fields[0].parse::<u32>().is_ok()
        && fields[1].parse::<u8>().is_ok()
        && fields[2].parse::<u8>().is_ok()
        && fields[3].parse::<u8>().is_ok()
        && fields[4].parse::<f64>().is_ok()
}

pub fn parse(line: &str) -> Result<RawFrame, WireError> {
    let body = line
        .strip_prefix("!PDGY,")
        .ok_or_else(|| malformed("missing !PDGY prefix"))?;
    let fields: Vec<&str> = body.split(',').collect();
    if fields.len() != 6 {
        return Err(malformed("expected 6 comma-separated fields"));
    }

    let pgn: u32 = fields[0].parse().map_err(|_| malformed("invalid pgn"))?;
    let priority: u8 = fields[1].parse().map_err(|_| malformed("invalid priority"))?;
    let src: u8 = fields[2].parse().map_err(|_| malformed("invalid src"))?;
    let dst: u8 = fields[3].parse().map_err(|_| malformed("invalid dst"))?;
    let ts: f64 = fields[4].parse().map_err(|_| malformed("invalid timestamp"))?;

    let data = base64::engine::general_purpose::STANDARD
        .decode(fields[5].trim())
        .map_err(|_| WireError::InvalidBase64)?;

    Ok(RawFrame {
        timestamp: Timestamp::Relative(ts),
        priority,
        pgn,
        src,
        dst,
        data,
    })
}

fn malformed(reason: &str) -> WireError {
    WireError::Malformed {
        format: "NavLink2",
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_and_parses_watermaker_line() {
        let line = "!PDGY,130567,6,200,255,25631.18,RgPczwYAQnYeAB4AAAADAAAAAABQbiMA";
        assert!(looks_like_navlink2(line));
        let frame = parse(line).unwrap();
        assert_eq!(frame.pgn, 130567);
        assert_eq!(frame.src, 200);
        assert!(!frame.data.is_empty());
    }
}
