//! Limits and wire constants for payload batches.
//!
//! The decoder bounds every allocation by these values so untrusted input
//! cannot force unbounded memory use.

/// Magic bytes for an uncompressed batch.
pub const MAGIC_UNCOMPRESSED: &[u8; 4] = b"SCB1";

/// Magic bytes for a zstd-compressed batch.
pub const MAGIC_COMPRESSED: &[u8; 4] = b"SCBZ";

/// Current wire format version.
pub const FORMAT_VERSION: u8 = 1;

/// Oldest wire format version the decoder accepts.
pub const MIN_FORMAT_VERSION: u8 = 1;

/// Maximum bytes in a varint (64-bit value).
pub const MAX_VARINT_BYTES: usize = 10;

/// Maximum length of any string field in bytes.
pub const MAX_STRING_LEN: usize = 4096;

/// Maximum number of properties on one record.
pub const MAX_PROPERTIES_PER_RECORD: usize = 256;

/// Maximum number of payloads in one batch.
pub const MAX_PAYLOADS_PER_BATCH: usize = 64;

/// Maximum size of an encoded (decompressed) batch in bytes.
pub const MAX_BATCH_SIZE: usize = 1024 * 1024;

/// Fixed-point scale applied to every NUMBER and LOCATION value.
pub const FLOAT_PRECISION: i64 = 1_000_000;

/// Latitude bound in degrees.
pub const MAX_LATITUDE: i64 = 90;

/// Longitude bound in degrees.
pub const MAX_LONGITUDE: i64 = 180;
