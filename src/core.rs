//! Data contract shared by the build-time catalog generator (`build.rs`) and
//! the runtime decode/encode engine.
//!
//! `build.rs` emits static `PgnSpec`/`FieldTypeSpec` tables that implement
//! this contract; `catalog`, `decode` and `encode` consume them. Back-edges
//! (field -> owning PGN, field -> field type) are indices/names into
//! `&'static` slices rather than live pointers, so the whole catalog is
//! `Sync` for free.

use std::collections::BTreeMap;

/// Maximum payload size after fast-packet reassembly (223 data bytes + margin).
pub const MAX_PAYLOAD_BYTES: usize = 230;

/// Semantic shape of a field, mirroring the `FieldType` entries of `canboat.json`.
///
/// This is the tagged-variant dispatch key: one case per wire-level shape,
/// matched once by the decode/encode engine (no function-pointer table).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Signed or unsigned integer; `signed` on the owning spec carries the distinction.
    Number,
    /// IEEE-754 single precision float; requires `bits == 32` and byte alignment.
    Float,
    /// Binary-coded decimal: each byte holds two base-10 digits.
    Decimal,
    /// Value is an index into a named enumeration (`Lookup` table).
    Lookup,
    /// Lookup resolved through a second field's value (triplet lookup).
    IndirectLookup,
    /// Lookup whose concrete field type is only known via an earlier field's value.
    FieldTypeLookup,
    /// Bitfield where each set bit is an independent named flag.
    BitLookup,
    /// Encodes a Parameter Group Number controlling interactions.
    Pgn,
    /// Day count since the Unix epoch. 16 bits.
    Date,
    /// Time since midnight UTC, resolution 0.0001s, 32 bits.
    Time,
    /// Duration in seconds; resolution depends on declared bit width.
    Duration,
    /// Maritime Mobile Service Identity: emitted as a zero-padded 9-digit string.
    Mmsi,
    /// Fixed-length ASCII string, right-trimmed of padding.
    StringFix,
    /// Variable-length string: one length byte, then data.
    StringLz,
    /// Variable-length string: length byte, encoding byte, then data.
    StringLau,
    /// Raw binary block; `bits == 0` means "rest of payload" or "use previous field value".
    Binary,
    /// Reserved bits; all-ones means "omit from output".
    Reserved,
    /// Padding bits; all-zeros means "omit from output".
    Spare,
    /// Field length/type is resolved dynamically by following a reference PGN.
    Variable,
    /// Follower field whose field type was stashed by a preceding `FieldTypeLookup`.
    KeyValue,
    /// Field type not supported by the decode engine.
    Unimplemented,
}

/// Tri-state sign declaration: a field type can fix the sign, or defer to its base type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signedness {
    Signed,
    Unsigned,
    Inherit,
}

/// A named enumeration value, as used by `Lookup`, `IndirectLookup` and `BitLookup`.
#[derive(Debug, Clone, Copy)]
pub struct LookupEntry {
    pub value: u32,
    pub name: &'static str,
}

/// A named table of `LookupEntry` rows, referenced by name from a `FieldSpec`.
#[derive(Debug, Clone, Copy)]
pub struct LookupTable {
    pub name: &'static str,
    pub entries: &'static [LookupEntry],
}

impl LookupTable {
    /// Resolve a raw integer to its name via a simple pair lookup.
    pub fn resolve(&self, value: u32) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|e| e.value == value)
            .map(|e| e.name)
    }
}

/// Declarative description of one field type (`C2`).
///
/// Resolved once at catalog initialization in declared order: a field type's
/// `base` must name a type appearing earlier in the registry (enforced at
/// init, never re-checked at decode time).
#[derive(Debug)]
pub struct FieldTypeSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: FieldKind,
    /// `None` when variable-length (e.g. strings, binary-to-end).
    pub bits: Option<u32>,
    pub resolution: Option<f64>,
    pub offset: i64,
    pub unit: Option<&'static str>,
    pub signed: Signedness,
    pub physical_quantity: Option<&'static str>,
    /// Name of the base field type this one inherits unset attributes from.
    pub base: Option<&'static str>,
}

/// Physical quantity metadata (`C2`), used only to populate `unit` strings of
/// field types that reference it and have no `unit` of their own.
#[derive(Debug, Clone, Copy)]
pub struct PhysicalQuantity {
    pub name: &'static str,
    pub abbreviation: &'static str,
    pub unit: &'static str,
    pub url: &'static str,
}

/// Descriptor for a single PGN field (`PgnFieldSpec`).
#[derive(Debug)]
pub struct FieldSpec {
    /// 1-based position within the PGN's field list; stable across repeats.
    pub order: u16,
    /// camelCase identifier, as used in `canboat.json` (`"productWaterTemperature"`).
    pub id: &'static str,
    /// Human-readable canonical name (`"Product Water Temperature"`).
    pub name: &'static str,
    /// Name of the `FieldTypeSpec` this field resolves against.
    pub field_type: &'static str,
    /// Bit width; `None` means "inherit from field type" (and further,
    /// variable, for strings/binary-to-end).
    pub bits: Option<u32>,
    pub resolution: Option<f64>,
    pub offset: i64,
    pub unit: Option<&'static str>,
    pub signed: Signedness,
    /// Name of the `LookupTable` to resolve against, for `Lookup`/`BitLookup`.
    pub lookup: Option<&'static str>,
    /// For `IndirectLookup`: order of the field carrying the discriminant.
    pub indirect_order: Option<u16>,
    /// Manufacturer/proprietary field: decoded only within the proprietary PGN ranges.
    pub proprietary: bool,
}

impl FieldSpec {
    /// `Some(N)` if `unit` encodes a match constraint (`"=<N>"`).
    pub fn match_value(&self) -> Option<i64> {
        self.unit
            .and_then(|u| u.strip_prefix('='))
            .and_then(|n| n.parse().ok())
    }
}

/// Declares one repeating field group within a PGN (`RepeatingFieldSet1/2`).
#[derive(Debug, Clone, Copy)]
pub struct RepeatingFieldSet {
    /// Order of the field carrying the repetition count; `None` means the
    /// repetition count is implied by remaining payload length.
    pub count_field_order: Option<u16>,
    /// Order of the first field in the group.
    pub start_field_order: u16,
    /// Number of consecutive fields forming one group instance.
    pub size: u16,
}

/// Packet framing for a PGN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    Single,
    Fast,
}

/// Catalog-completeness flags computed at init time (`C3`), consumed only by
/// diagnostics -- never by the decode/encode hot path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Completeness {
    pub fields_unknown: bool,
    pub resolution_unknown: bool,
    pub lookup_unknown: bool,
    pub interval_unknown: bool,
}

/// Full layout for one PGN (`PgnSpec`).
#[derive(Debug)]
pub struct PgnSpec {
    pub pgn: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub packet_type: PacketType,
    /// Nominal transmission interval in milliseconds; `0` means unknown/irregular.
    pub interval_ms: u32,
    pub completeness: Completeness,
    pub repeating_1: Option<RepeatingFieldSet>,
    pub repeating_2: Option<RepeatingFieldSet>,
    pub fields: &'static [FieldSpec],
}

impl PgnSpec {
    /// `true` if any field encodes a match constraint.
    pub fn has_match_fields(&self) -> bool {
        self.fields.iter().any(|f| f.match_value().is_some())
    }
}

/// Canonical timestamp representation. The core never owns a clock; it
/// preserves whichever shape the wire format supplied.
#[derive(Debug, Clone, PartialEq)]
pub enum Timestamp {
    Wall(chrono::NaiveTime),
    /// Seconds since an arbitrary epoch, as carried by NavLink2/Airmar-style logs.
    Relative(f64),
}

/// Raw frame metadata exactly as captured off the wire (`RawFrame`) or after
/// fast-packet reassembly (`RawMessage` -- same shape, coalesced payload).
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub timestamp: Timestamp,
    pub priority: u8,
    pub pgn: u32,
    pub src: u8,
    pub dst: u8,
    pub data: Vec<u8>,
}

/// Reserved-band sentinel returned by the bit extractor (spec S4.1, S7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionalCode {
    Unknown,
    Error,
    Reserved1,
    Reserved2,
    Reserved3,
}

impl ExceptionalCode {
    /// Maps the raw `value - max_value` delta computed by the extractor.
    pub fn from_delta(delta: i64) -> Self {
        match delta {
            0 => Self::Unknown,
            -1 => Self::Error,
            -2 => Self::Reserved1,
            -3 => Self::Reserved2,
            _ => Self::Reserved3,
        }
    }
}

/// One decoded field value (`Decoded Message.fields[name]`).
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Integer(i64),
    Float(f64),
    Str(String),
    /// Bit-lookup result: every currently-set bit, resolved to its name when known.
    Bits(Vec<(u32, Option<&'static str>)>),
    Instant(chrono::NaiveDate),
    Duration(std::time::Duration),
    Bytes(Vec<u8>),
    /// One element per repetition of a repeating field group.
    Repeating(Vec<BTreeMap<&'static str, DecodedValue>>),
    /// Field hit the reserved sentinel band.
    Exceptional(ExceptionalCode),
}

/// A fully decoded NMEA 2000 message (`Decoded Message`, spec S6.2).
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMessage {
    pub timestamp: Timestamp,
    pub priority: u8,
    pub src: u8,
    pub dst: u8,
    pub pgn: u32,
    pub description: &'static str,
    pub fields: BTreeMap<&'static str, DecodedValue>,
}
