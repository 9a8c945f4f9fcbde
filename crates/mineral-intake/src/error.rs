//! Error types for catalog loading, form handling, encoding and validation.

use thiserror::Error;

use crate::form::FormPhase;
use crate::model::DataType;

/// Error while loading or validating the schema catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read schema file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed schema document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record type {record_type:?} not found in schema")]
    RecordTypeNotFound { record_type: String },

    #[error("property {property:?} not found on record type {record_type:?}")]
    PropertyNotFound {
        record_type: String,
        property: &'static str,
    },

    #[error("property {property:?} must be declared ENUM, found {data_type:?}")]
    NotEnum {
        property: &'static str,
        data_type: String,
    },

    #[error("property {property:?} has no enum options")]
    EmptyOptions { property: &'static str },

    #[error("property {property:?} lists option {option:?} more than once")]
    DuplicateOption {
        property: &'static str,
        option: String,
    },

    #[error("processing rule references unknown mineral type {mineral_type:?}")]
    UnknownMineralType { mineral_type: String },
}

/// Error in user-entered form data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{field} is not a number: {input:?}")]
    InvalidNumber { field: &'static str, input: String },

    #[error("{field} does not fit the ledger's integer range: {input:?}")]
    NumberOutOfRange { field: &'static str, input: String },

    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} must be within [{min}, {max}], got {input:?}")]
    OutOfBounds {
        field: &'static str,
        min: i64,
        max: i64,
        input: String,
    },

    #[error("{field} must not be negative, got {input:?}")]
    Negative { field: &'static str, input: String },

    #[error("latitude and longitude must be given together")]
    PartialLocation,

    #[error("mineral type {mineral_type:?} is not selectable here (allowed: {allowed:?})")]
    TypeNotSelectable {
        mineral_type: String,
        allowed: Vec<String>,
    },
}

/// Error returned by a record fetch collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("record not found: {path}")]
    NotFound { path: String },

    #[error("malformed record at {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("fetch failed: {0}")]
    Transport(String),
}

/// Error returned by a transaction submission collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("batch rejected by ledger: {0}")]
    Rejected(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("submission failed: {0}")]
    Transport(String),
}

/// Error during binary encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("{field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("zstd compression failed: {0}")]
    CompressionFailed(String),
}

/// Error during binary decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("invalid magic bytes: expected SCB1 or SCBZ, found {found:?}")]
    InvalidMagic { found: [u8; 4] },

    #[error("unsupported version: {version}")]
    UnsupportedVersion { version: u8 },

    #[error("invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    #[error("unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("varint exceeds maximum length (10 bytes)")]
    VarintTooLong,

    #[error("varint overflow (value exceeds u64)")]
    VarintOverflow,

    #[error("{field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("invalid action: {action}")]
    InvalidAction { action: u8 },

    #[error("invalid data type: {data_type}")]
    InvalidDataType { data_type: u8 },

    #[error("{remaining} trailing bytes after batch")]
    TrailingBytes { remaining: usize },

    #[error("zstd decompression failed: {0}")]
    DecompressionFailed(String),

    #[error("decompressed size {actual} doesn't match declared {declared}")]
    UncompressedSizeMismatch { declared: usize, actual: usize },
}

/// Error during semantic validation of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("batch contains no create payload")]
    MissingCreate,

    #[error("batch contains more than one create payload")]
    MultipleCreates,

    #[error("finalize payload at position {index} must precede the create payload")]
    FinalizeOutOfOrder { index: usize },

    #[error("batch finalizes {finalized:?} but the new record names parent {declared:?}")]
    ParentMismatch {
        finalized: String,
        declared: Option<String>,
    },

    #[error("value kind mismatch for property {property:?}: expected {expected:?}, found {found:?}")]
    TypeMismatch {
        property: String,
        expected: DataType,
        found: DataType,
    },

    #[error("property {property:?} has value {value:?} which is not an allowed option")]
    UnknownOption { property: String, value: String },

    #[error("property {property:?} is set more than once")]
    DuplicateProperty { property: String },

    #[error("property {property:?} is invalid: {reason}")]
    InvalidValue {
        property: String,
        reason: &'static str,
    },
}

/// Error surfaced by the form controller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntakeError {
    #[error("parent record could not be loaded: {0}")]
    ParentFetch(#[from] FetchError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("batch failed validation: {0}")]
    Invalid(#[from] ValidationError),

    #[error("submission failed: {0}")]
    Submit(#[from] SubmitError),

    #[error("submission was abandoned before the submitter answered")]
    SubmitCancelled,

    #[error("no submission in progress (form is {phase:?})")]
    NotSubmitting { phase: FormPhase },

    #[error("form cannot be edited while {phase:?}")]
    FormLocked { phase: FormPhase },
}
