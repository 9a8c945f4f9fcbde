//! Data model types.
//!
//! - Values (typed property instances)
//! - Payloads (ledger actions)
//! - Batches (ordered payloads)
//! - Records (read-side view of the ledger)
//! - Builders (ergonomic construction)

pub mod batch;
pub mod builder;
pub mod payload;
pub mod record;
pub mod value;

pub use batch::PayloadBatch;
pub use builder::{BatchBuilder, RecordBuilder};
pub use payload::{CreateRecord, FinalizeRecord, Payload};
pub use record::{AssetRecord, ParentRecord, RecordProperty};
pub use value::{DataType, Location, Property, Value};
