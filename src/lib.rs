//! `n2k-analyzer` library: wire-format recognition, fast-packet reassembly
//! and PGN field extraction for NMEA 2000 CAN-bus traffic.
//!
//! The crate exposes the catalog (field-type inheritance, PGN matching), the
//! bit-level codec primitives (`bits`, `can_id`), the decode/encode engine
//! (`decode`, `encode`), the wire-format parsers (`wire`) and the
//! per-connection orchestration layer (`session`).
//==================================================================================
/// Bit-level read/write cursors shared by the decode and encode engines.
pub mod bits;
/// 29-bit CAN identifier construction and extraction (J1939/NMEA 2000).
pub mod can_id;
/// Field-type inheritance and the immutable, process-wide PGN catalog.
pub mod catalog;
/// Data contract shared by the build-time catalog generator and the runtime engine.
pub mod core;
/// Field-loop decode engine: turns a reassembled payload into a field map.
pub mod decode;
/// Marshal engine: the inverse of `decode`, rebuilding raw payload bytes.
pub mod encode;
/// Domain and low-level errors (CAN identifier construction, catalog,
/// reassembly, wire parsing, decode/encode).
pub mod error;
/// Fast-packet reassembly: stitches multi-frame PGNs into one payload.
pub mod reassembly;
/// Per-connection orchestration: wire parsing + reassembly + decode.
pub mod session;
/// Wire-format detection and line parsing for the supported textual dialects.
pub mod wire;

pub use catalog::{catalog, Catalog, UnitSystem};
pub use core::{DecodedMessage, DecodedValue, RawFrame, Timestamp};
pub use decode::decode_message;
pub use session::{Decoder, LineOutcome};
//==================================================================================
