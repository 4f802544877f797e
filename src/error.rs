//! Error types for IFC Writer.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::{EntityId, RecordNumber};

/// Errors that make a single value, record or GlobalId not encodable.
///
/// These fail one render or compress call. The caller decides whether to
/// skip the record, substitute a placeholder, or abort the whole file.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EncodeError {
    /// The entity has no record number yet.
    #[error("entity of type {type_name} has no record number assigned")]
    UnassignedRecordNumber { type_name: String },

    /// Two entities carry the same record number.
    #[error("record number {number} is assigned to more than one entity")]
    DuplicateRecordNumber { number: RecordNumber },

    /// The record counter has handed out every number up to `u64::MAX`.
    #[error("record numbers exhausted")]
    RecordNumbersExhausted,

    /// A referenced entity has no record number yet.
    #[error("referenced entity {entity} has no record number assigned")]
    UnassignedReference { entity: EntityId },

    /// A reference points at an entity the resolver does not know.
    #[error("reference to unknown entity {entity}")]
    DanglingReference { entity: EntityId },

    /// NaN and infinities have no STEP representation.
    #[error("real value {value} cannot be written in STEP")]
    NonFiniteReal { value: f64 },

    /// A GUID chunk did not fit its base-64 digit width.
    #[error("GUID chunk {chunk} value {value} does not fit in {digits} base-64 digits")]
    GuidOverflow {
        chunk: usize,
        value: u32,
        digits: usize,
    },
}

/// Errors that can occur when expanding a compressed GlobalId.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuidError {
    /// A compressed GlobalId is always 22 characters.
    #[error("compressed GUID must be 22 characters, got {len}")]
    InvalidLength { len: usize },

    /// Character outside `[0-9A-Za-z_$]`.
    #[error("invalid character '{ch}' at position {position} in compressed GUID")]
    InvalidCharacter { ch: char, position: usize },

    /// The leading digit pair encodes more than 8 bits.
    #[error("compressed GUID '{value}' is outside the 128-bit range")]
    OutOfRange { value: String },

    /// Not a UUID in any textual form `uuid` accepts.
    #[error("invalid UUID: {source}")]
    InvalidUuid {
        #[from]
        source: uuid::Error,
    },
}

/// Errors that can occur when loading an entity graph document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read the document from disk.
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document is not valid JSON or uses an unknown value kind.
    #[error("invalid graph document: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// An attribute references an entity index outside the document.
    #[error("entity {entity} references #{target}, but the document has {count} entities")]
    DanglingReference {
        entity: usize,
        target: usize,
        count: usize,
    },

    /// An attribute is not a valid value description.
    #[error("entity {entity} has an invalid attribute: {source}")]
    Attribute {
        entity: usize,
        source: serde_json::Error,
    },

    /// The `guid` field of an entity could not be read.
    #[error("entity {entity} has an invalid guid: {source}")]
    Guid { entity: usize, source: GuidError },

    /// The entity's GUID could not be compressed for its GlobalId attribute.
    #[error("entity {entity}: {source}")]
    Encode { entity: usize, source: EncodeError },
}

/// Errors that can occur when exporting data.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create the output file.
    #[error("failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write data to the file.
    #[error("failed to write data: {message}")]
    WriteError { message: String },

    /// A record or GlobalId could not be encoded.
    #[error("encoding failed: {source}")]
    Encode {
        #[from]
        source: EncodeError,
    },

    /// Failed to write CSV data.
    #[error("CSV write failed: {source}")]
    CsvWrite {
        #[from]
        source: csv::Error,
    },
}
