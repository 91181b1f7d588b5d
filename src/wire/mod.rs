//! Wire-format detection and line parsing (`C4`/`C5`).
//!
//! Every textual NMEA 2000 logging tool writes its own single-line framing;
//! `detect` picks the dialect in the deterministic rule order the
//! specification fixes, and each submodule turns one matched line into
//! either a raw CAN frame (still needing fast-packet reassembly) or an
//! already-coalesced message.
pub mod actisense;
pub mod airmar;
pub mod chetco;
pub mod garmin;
pub mod navlink2;
pub mod plain;
pub mod ydwg;

use crate::core::RawFrame;
use crate::error::WireError;

/// Detected wire dialect for one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// Comma-separated hex fields, 8 data bytes per line (one CAN frame).
    Plain,
    /// Same shape as `Plain` but with 9+ data bytes (already coalesced).
    Fast,
    Airmar,
    Chetco,
    GarminCsv1,
    GarminCsv2,
    Ydwg02,
    NavLink2,
    Actisense,
    /// No detector rule matched; fatal for this line per spec S7.
    Unknown,
}

/// Result of parsing one line: either a single CAN frame that still needs
/// fast-packet reassembly, or a payload a coalescing format already
/// delivered whole.
#[derive(Debug, Clone)]
pub enum Parsed {
    Frame(RawFrame),
    Coalesced(RawFrame),
}

/// Deterministic format detector (spec S4.4): first matching rule wins.
pub fn detect(line: &str) -> WireFormat {
    let trimmed = line.trim();

    if trimmed.starts_with("$PCDIN") {
        return WireFormat::Chetco;
    }
    if garmin::is_header_line(trimmed) {
        return if garmin::is_csv2_header(trimmed) {
            WireFormat::GarminCsv2
        } else {
            WireFormat::GarminCsv1
        };
    }
    if airmar::looks_like_airmar(trimmed) {
        return WireFormat::Airmar;
    }
    if ydwg::looks_like_ydwg(trimmed) {
        return WireFormat::Ydwg02;
    }
    if navlink2::looks_like_navlink2(trimmed) {
        return WireFormat::NavLink2;
    }
    if actisense::looks_like_actisense(trimmed) {
        return WireFormat::Actisense;
    }

    let columns: Vec<&str> = trimmed.split(',').collect();
    if columns.len() < 6 {
        return WireFormat::Unknown;
    }
    let tail_hex_bytes = columns[6..].iter().filter(|s| !s.trim().is_empty()).count();
    if tail_hex_bytes > 8 {
        WireFormat::Fast
    } else {
        WireFormat::Plain
    }
}

/// Parse one line once its format has been detected. `PlainOrFast` callers
/// should try `Plain` first and fall back to `Fast` on failure per spec S4.4.
pub fn parse_line(format: WireFormat, line: &str) -> Result<Parsed, WireError> {
    let trimmed = line.trim();
    match format {
        WireFormat::Plain | WireFormat::Fast => plain::parse(trimmed).map(Parsed::Frame),
        WireFormat::Airmar => airmar::parse(trimmed).map(Parsed::Coalesced),
        WireFormat::Chetco => chetco::parse(trimmed).map(Parsed::Coalesced),
        WireFormat::GarminCsv1 | WireFormat::GarminCsv2 => {
            garmin::parse(trimmed).map(Parsed::Frame)
        }
        WireFormat::Ydwg02 => ydwg::parse(trimmed).map(Parsed::Frame),
        WireFormat::NavLink2 => navlink2::parse(trimmed).map(Parsed::Coalesced),
        WireFormat::Actisense => actisense::parse(trimmed).map(Parsed::Coalesced),
        WireFormat::Unknown => Err(WireError::UnknownFormat),
    }
}

/// Parse a line whose format is not yet known, following the full detector
/// chain. `Plain` and `Fast` share one parser (it accepts either 8 or 9+
/// trailing hex bytes), so no further fallback is required once detected.
pub fn parse_auto(line: &str) -> Result<Parsed, WireError> {
    parse_line(detect(line), line)
}

pub(crate) fn parse_hex_byte(token: &str) -> Result<u8, WireError> {
    u8::from_str_radix(token.trim(), 16).map_err(|_| WireError::InvalidHex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_chetco_before_anything_else() {
        assert_eq!(
            detect("$PCDIN,01F119,0052C5EB,02,A000000C68246809*16"),
            WireFormat::Chetco
        );
    }

    #[test]
    fn detects_navlink2() {
        let line = "!PDGY,130567,6,200,255,25631.18,RgPczwYAQnYeAB4AAAADAAAAAABQbiMA";
        assert_eq!(detect(line), WireFormat::NavLink2);
    }

    #[test]
    fn detects_plain_single_frame() {
        let line = "10:20:30.123,6,130567,200,255,8,01,02,03,04,05,06,07,08";
        assert_eq!(detect(line), WireFormat::Plain);
    }

    #[test]
    fn detects_fast_coalesced_tail() {
        let line = "10:20:30.123,6,126998,200,255,14,01,02,03,04,05,06,07,08,09,10,11,12,13,14";
        assert_eq!(detect(line), WireFormat::Fast);
    }

    #[test]
    fn unrecognized_garbage_is_unknown() {
        assert_eq!(detect("not a wire frame at all"), WireFormat::Unknown);
    }
}
