//! Garmin CSV export format ("GarminCSV1"/"GarminCSV2"): a known literal
//! header line, followed by CSV data rows carrying a `packet` column of
//! space-separated hex bytes.
//!
//! The two header variants share a layout up through `Priority`; CSV2 adds
//! descriptive Name/Manufacturer/address columns before `Size`/`packet`.
use crate::core::{RawFrame, Timestamp};
use crate::error::WireError;

const HEADER_V1: &str = "Sequence Number,Timestamp,PGN,Source,Destination,Priority,packet";
const HEADER_V2: &str =
    "Sequence Number,Timestamp,PGN,Name,Manufacturer,Remote Address,Local Address,Priority,Single Frame,Size,packet";

pub fn is_header_line(line: &str) -> bool {
    line == HEADER_V1 || line == HEADER_V2
}

pub fn is_csv2_header(line: &str) -> bool {
    line == HEADER_V2
}

/// Parse one CSV data row. Column layout is inferred from which header
/// variant preceded it; since this parser is stateless per-line, it uses
/// the `packet`/`PGN`/`Priority` columns common to both and tolerates the
/// extra CSV2 columns by always reading `pgn`, `priority`, `src`/`dst` from
/// the front and the hex payload from the trailing field.
pub fn parse(line: &str) -> Result<RawFrame, WireError> {
    let cols: Vec<&str> = line.split(',').collect();
    if cols.len() < 6 {
        return Err(malformed("too few columns"));
    }

    let timestamp = Timestamp::Relative(
        cols[1]
            .trim()
            .parse()
            .map_err(|_| malformed("invalid timestamp"))?,
    );
    let pgn: u32 = cols[2]
        .trim()
        .parse()
        .map_err(|_| malformed("invalid pgn"))?;

    let (priority, src, dst) = if cols.len() == 7 {
        // CSV1: Sequence,Timestamp,PGN,Source,Destination,Priority,packet
        let src: u8 = cols[3].trim().parse().map_err(|_| malformed("invalid src"))?;
        let dst: u8 = cols[4].trim().parse().map_err(|_| malformed("invalid dst"))?;
        let priority: u8 = cols[5].trim().parse().map_err(|_| malformed("invalid priority"))?;
        (priority, src, dst)
    } else {
        // CSV2: ...,Remote Address,Local Address,Priority,Single Frame,Size,packet
        let dst: u8 = cols[5].trim().parse().unwrap_or(255);
        let src: u8 = cols[6].trim().parse().unwrap_or(0);
        let priority: u8 = cols[7].trim().parse().map_err(|_| malformed("invalid priority"))?;
        (priority, src, dst)
    };

    let packet_col = cols.last().ok_or_else(|| malformed("missing packet column"))?;
    let data: Vec<u8> = packet_col
        .split_whitespace()
        .map(|tok| u8::from_str_radix(tok, 16).map_err(|_| WireError::InvalidHex))
        .collect::<Result<_, _>>()?;
    if data.is_empty() {
        return Err(malformed("empty packet column"));
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
        format: "GarminCSV",
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_csv1_header() {
        assert!(is_header_line(HEADER_V1));
        assert!(!is_csv2_header(HEADER_V1));
    }

    #[test]
    fn parses_csv1_row() {
        let line = "1,1700000000.0,130567,200,255,6,01 02 03 04 05 06 07 08";
        let frame = parse(line).unwrap();
        assert_eq!(frame.pgn, 130567);
        assert_eq!(frame.src, 200);
        assert_eq!(frame.data.len(), 8);
    }
}
