//! Mineral intake: asset registration for a supply-chain ledger.
//!
//! This crate turns the input of an asset intake form into the ordered
//! payload batch a ledger client signs and submits: optionally finalize the
//! parent container, then create the new record with typed properties.
//!
//! # Overview
//!
//! - **Catalog**: the enumerated options of a record type, loaded from a
//!   schema document by property name, plus the mineral processing rules
//! - **Resolver**: which mineral types a new container may take, given its
//!   parent
//! - **Encoder**: typed, fixed-point property lists and payload batches
//! - **Controller**: the form lifecycle with an async parent fetch and a
//!   guarded submit
//!
//! # Quick Start
//!
//! ```rust
//! use mineral_intake::catalog::{Catalog, ProcessingRules};
//! use mineral_intake::codec::{decode_batch, encode_batch};
//! use mineral_intake::form::{build_payload_batch, Field, FormState, TypeResolver};
//!
//! let schema = r#"[{"name": "mineral", "properties": [
//!     {"name": "tag", "dataType": "STRING"},
//!     {"name": "weight", "dataType": "NUMBER"},
//!     {"name": "type", "dataType": "ENUM", "enumOptions": ["Coltan Ore", "Coltan Concentrate"]},
//!     {"name": "status", "dataType": "ENUM", "enumOptions": ["Mined"]},
//!     {"name": "container", "dataType": "ENUM", "enumOptions": ["Bag"]},
//!     {"name": "origin", "dataType": "ENUM", "enumOptions": ["DRC"]},
//!     {"name": "zone", "dataType": "ENUM", "enumOptions": ["Z1"]}
//! ]}]"#;
//! let rules = ProcessingRules::new(
//!     ["Coltan Concentrate"],
//!     [("Coltan Ore", &["Coltan Concentrate"][..])],
//! );
//! let catalog = Catalog::from_schema_json_with_rules(schema, "mineral", rules).unwrap();
//!
//! let mut form = FormState::new();
//! form.set(Field::Id, "A1");
//! form.set(Field::Tag, "T1");
//! form.set(Field::Type, "Coltan Ore");
//! form.set(Field::Weight, "10");
//!
//! let selectable = TypeResolver::new(&catalog).resolve(&mut form);
//! assert_eq!(selectable, vec!["Coltan Ore"]);
//! form.validate(&selectable).unwrap();
//!
//! let batch = build_payload_batch(&form, "mineral", 1_700_000_000).unwrap();
//! let bytes = encode_batch(&batch).unwrap();
//! assert_eq!(decode_batch(&bytes).unwrap(), batch);
//! ```
//!
//! # Modules
//!
//! - [`catalog`]: Schema catalog and processing rules
//! - [`form`]: Form state, resolver, encoder and controller
//! - [`model`]: Values, payloads, batches and fetched records
//! - [`codec`]: Binary encoding/decoding with compression support
//! - [`validate`]: Semantic batch validation
//! - [`transaction`]: Payload digests and nonces for signing
//! - [`service`]: Fetch and submit collaborator traits
//! - [`config`]: Controller settings
//! - [`error`]: Error types
//! - [`limits`]: Wire format constants and decoding limits
//!
//! # Numbers
//!
//! Numeric inputs are decimal text. They are scaled by 1,000,000 and
//! truncated toward zero (assay is a percentage and is divided by 100
//! first). Blank and zero inputs are treated as absent.
//!
//! # Wire Format
//!
//! Batches use a binary format with optional zstd compression:
//! - Uncompressed: `SCB1` magic + version + data
//! - Compressed: `SCBZ` magic + uncompressed size + zstd data
//!
//! The decoder automatically detects and handles both formats.

pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod form;
pub mod limits;
pub mod model;
pub mod numeric;
pub mod service;
pub mod transaction;
pub mod validate;

// Re-export commonly used types at crate root
pub use catalog::{Catalog, ProcessingRules};
pub use codec::{decode_batch, encode_batch, encode_batch_compressed};
pub use config::IntakeConfig;
pub use error::{
    CatalogError, DecodeError, EncodeError, FetchError, FormError, IntakeError, SubmitError,
    ValidationError,
};
pub use form::{
    build_payload_batch, build_properties, AssetForm, Field, FormPhase, FormState, SubmitOutcome,
    TypeResolver,
};
pub use model::{
    AssetRecord, BatchBuilder, CreateRecord, DataType, FinalizeRecord, Location, ParentRecord,
    Payload, PayloadBatch, Property, RecordBuilder, Value,
};
pub use service::{record_path, RecordFetcher, StaticRecordFetcher, TransactionSubmitter};
pub use transaction::{prepare_transactions, payload_sha512, PreparedTransaction};
pub use validate::{validate_batch, validate_properties, SchemaContext};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
