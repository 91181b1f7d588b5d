//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (CAN ID construction,
//! catalog initialization, reassembly, decoding, encoding...).
use crate::core::{ExceptionalCode, FieldKind};
use thiserror::Error;

#[derive(Error, Debug)]
/// Errors that can occur while building a 29-bit CAN identifier.
pub enum CanIdBuildError {
    /// Provided parameters do not produce a valid identifier.
    #[error("Invalid data")]
    InvalidData,
    /// The destination address violates protocol constraints.
    #[error("Invalid destination")]
    InvalidDestination,
    /// Attempt to build a broadcast message (PDU2) with PF < 240.
    #[error("Invalid for broadcast message: PF is too low")]
    InvalidForBroadcast,
    /// Attempt to send an addressed message (PDU1) with PF >= 240.
    #[error("Invalid for addressed message: PF is too high: {pgn}")]
    InvalidForFocusedMessage { pgn: u8 },
    /// In PDU1 the lower 8 bits of the PGN must remain zero.
    #[error("PDU1 PGNs require PS = 0")]
    PsFocusMessageMustBeNull,
    /// No payload available to build the frame.
    #[error("Payload is empty: unable to build")]
    EmptyPayload,
}

//================================================================================CATALOG_ERROR

#[derive(Error, Debug)]
/// Fatal errors raised while building the immutable field-type registry and
/// PGN catalog at process start (spec S4.2/S4.3, S7).
pub enum CatalogError {
    /// A field type's `base` has not appeared earlier in the registry (or is unknown).
    #[error("field type {name} references unresolved or out-of-order base {base}")]
    UnresolvedBase {
        name: &'static str,
        base: &'static str,
    },
    /// A field type (or PGN field) declared a resolution that conflicts with its base/type.
    #[error("field type {name} declares resolution {declared} conflicting with inherited {inherited}")]
    ConflictingResolution {
        name: &'static str,
        declared: f64,
        inherited: f64,
    },
    /// A `physical` pointer does not name a registered `PhysicalQuantity`.
    #[error("field type {name} references unknown physical quantity {physical}")]
    UnknownPhysicalQuantity {
        name: &'static str,
        physical: &'static str,
    },
    /// The same field-type name was declared more than once.
    #[error("duplicate field type entry {name}")]
    DuplicateFieldType { name: &'static str },
    /// A PGN field names a field type that does not exist in the registry.
    #[error("PGN {pgn} field {field} references unknown field type {field_type}")]
    UnknownFieldType {
        pgn: u32,
        field: &'static str,
        field_type: &'static str,
    },
    /// A PGN declares `RepeatingCountN > 0` without a matching start marker.
    #[error("PGN {pgn} declares a repeating group with no start field")]
    RepeatingGroupWithoutStart { pgn: u32 },
    /// A PGN's repeating-group start/count order does not index a real field.
    #[error("PGN {pgn} repeating group references out-of-range field order {order}")]
    RepeatingGroupOutOfRange { pgn: u32, order: u16 },
}

//================================================================================REASSEMBLY_ERROR

#[derive(Error, Debug)]
/// Non-fatal conditions raised while reassembling fast-packet frames (`C6`).
pub enum ReassemblyError {
    /// All reassembly slots are occupied; the burst is dropped.
    #[error("out of reassembly buffers (src={src}, pgn={pgn})")]
    Overflow { src: u8, pgn: u32 },
    /// The same frame index arrived twice for a burst in progress; the slot was reset.
    #[error("duplicate frame {frame_index} for src={src} pgn={pgn}, burst restarted")]
    DuplicateFrame { src: u8, pgn: u32, frame_index: u8 },
    /// The declared payload size in frame 0 is outside the legal fast-packet range.
    #[error("invalid declared fast-packet size {size}")]
    InvalidDeclaredSize { size: usize },
}

//================================================================================WIRE_ERROR

#[derive(Error, Debug)]
/// Errors raised while detecting or parsing a wire-format text line (`C4`/`C5`).
pub enum WireError {
    /// No format-detector rule matched the line.
    #[error("unrecognized wire format for line")]
    UnknownFormat,
    /// The line matched a format but did not parse (malformed field, bad hex...).
    #[error("malformed {format} line: {reason}")]
    Malformed {
        format: &'static str,
        reason: String,
    },
    #[error("invalid hex byte sequence")]
    InvalidHex,
    #[error("invalid base64 payload")]
    InvalidBase64,
}

//================================================================================DECODE_ERROR

#[derive(Error, Debug)]
/// Errors raised while matching a payload against the PGN catalog (`C8`).
pub enum MatchError {
    /// No catalog entry exists for this PGN id.
    #[error("unknown PGN {pgn}")]
    UnknownPgn { pgn: u32 },
    /// The PGN declares match fields but none of its catalog entries agreed.
    #[error("no catalog entry for PGN {pgn} matched its match-fields")]
    NoMatchFieldAgreement { pgn: u32 },
}

#[derive(Error, Debug)]
/// Errors raised while decoding a single field (`C7`). Field-level errors
/// never abort the surrounding message decode; they degrade to an
/// `Exceptional`/omitted entry in the field map per spec S7.
pub enum FieldDecodeError {
    /// Remaining payload is shorter than the field's declared bit width.
    #[error("insufficient data for field {field} ({needed} bits needed, {available} available)")]
    InsufficientData {
        field: &'static str,
        needed: u32,
        available: u32,
    },
    /// Extracted value landed in the reserved sentinel band.
    #[error("field {field} hit reserved sentinel {code:?}")]
    Exceptional {
        field: &'static str,
        code: ExceptionalCode,
    },
    /// This field kind is not (yet) handled by the decode engine.
    #[error("unsupported field kind {kind:?} for field {field}")]
    UnsupportedFieldKind {
        field: &'static str,
        kind: FieldKind,
    },
    /// A `Variable`/`KeyValue` field could not resolve its referenced PGN or field type.
    #[error("dependency field not found for {field}")]
    DependencyFieldNotFound { field: &'static str },
    /// Bit-level access failed (out of bounds, misalignment).
    #[error("bit reader error: {err}")]
    BitReaderError { err: BitReaderError },
}

#[derive(Error, Debug)]
/// Errors raised while encoding a `DecodedMessage` back into raw bytes
/// (`MarshalMessageToRaw` / `MarshalMessageToSingleOrFastRaw`).
pub enum FieldEncodeError {
    #[error("buffer too small to encode field {field}")]
    BufferTooSmall { field: &'static str },
    #[error("value type mismatch for field {field}")]
    TypeMismatch { field: &'static str },
    #[error("unsupported field kind {kind:?} for field {field}")]
    UnsupportedFieldKind {
        field: &'static str,
        kind: FieldKind,
    },
    #[error("bit writer error: {err}")]
    BitWriterError { err: BitWriterError },
}

//==================================================================================BITREADER_ERRORS
#[derive(Error, Debug)]
/// Errors raised during bitwise buffer reads.
pub enum BitReaderError {
    /// Attempted to read past the end of the buffer.
    #[error("attempted to read out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Requested more bits than the target type can hold.
    #[error("cannot read more than {max} bits. Requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
    /// Cursor is not aligned on a byte boundary when required.
    #[error("non aligned bit. Cursor: {cursor}")]
    NonAlignedBit { cursor: usize },
}

//==================================================================================BITWRITER_ERRORS
#[derive(Error, Debug)]
/// Errors raised during bitwise writes into a buffer.
pub enum BitWriterError {
    /// Attempted to write beyond the provided capacity.
    #[error("attempted to write out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Field is too large for the provided type.
    #[error("cannot write more than {max} bits. Requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
    /// Cursor is not aligned on a byte boundary when the operation requires it.
    #[error("non aligned bit. Cursor: {cursor}")]
    NonAlignedBit { cursor: usize },
}
