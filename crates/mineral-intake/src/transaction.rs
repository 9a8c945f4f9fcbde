//! Client-side transaction preparation.
//!
//! Signing and submission belong to the caller's pipeline. This module
//! produces what that pipeline consumes: for each payload in order, the
//! encoded bytes, their SHA-512 digest (hex) and a fresh nonce.

use sha2::{Digest, Sha512};
use uuid::Uuid;

use crate::codec::encode_transaction_payload;
use crate::error::EncodeError;
use crate::model::PayloadBatch;

/// An encoded payload ready to be wrapped in a signed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTransaction {
    /// Encoded transaction payload.
    pub payload: Vec<u8>,
    /// Lowercase hex SHA-512 of `payload`.
    pub payload_sha512: String,
    /// Random nonce distinguishing otherwise identical transactions.
    pub nonce: String,
}

/// Encodes every payload of a batch, preserving order.
pub fn prepare_transactions(batch: &PayloadBatch) -> Result<Vec<PreparedTransaction>, EncodeError> {
    batch
        .payloads
        .iter()
        .map(|payload| {
            let bytes = encode_transaction_payload(payload, batch.timestamp)?;
            Ok(PreparedTransaction {
                payload_sha512: payload_sha512(&bytes),
                payload: bytes,
                nonce: Uuid::new_v4().simple().to_string(),
            })
        })
        .collect()
}

/// Returns the lowercase hex SHA-512 digest of a payload.
pub fn payload_sha512(payload: &[u8]) -> String {
    let hash = Sha512::digest(payload);
    let mut s = String::with_capacity(hash.len() * 2);
    for byte in hash {
        s.push_str(&format!("{:02x}", byte));
    }
    s
}
