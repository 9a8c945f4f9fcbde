//! Binary encoding/decoding of payloads and batches.

pub mod payload;
pub mod primitives;
pub mod value;

pub use payload::{
    decode_batch, decode_payload, decode_transaction_payload, decompress, encode_batch,
    encode_batch_compressed, encode_payload, encode_transaction_payload,
};
pub use primitives::{Reader, Writer, zigzag_decode, zigzag_encode};
pub use value::{decode_property, decode_value, encode_property, encode_value};
