//! Payload and batch encoding/decoding.
//!
//! Batch layout:
//! - uncompressed: `SCB1` + version + timestamp + payload count + payloads
//! - compressed: `SCBZ` + uncompressed length + zstd frame of the above
//!
//! A single transaction payload (what gets signed) is the timestamp followed
//! by one payload.

use tracing::debug;

use crate::codec::primitives::{Reader, Writer};
use crate::codec::value::{decode_property, encode_property, write_bounded};
use crate::error::{DecodeError, EncodeError};
use crate::limits::{
    FORMAT_VERSION, MAGIC_COMPRESSED, MAGIC_UNCOMPRESSED, MAX_BATCH_SIZE, MAX_PAYLOADS_PER_BATCH,
    MAX_PROPERTIES_PER_RECORD, MAX_STRING_LEN, MIN_FORMAT_VERSION,
};
use crate::model::{CreateRecord, FinalizeRecord, Payload, PayloadBatch};

// =============================================================================
// DECODING
// =============================================================================

/// Decodes one payload (action byte + body).
pub fn decode_payload(reader: &mut Reader<'_>) -> Result<Payload, DecodeError> {
    let action = reader.read_byte("action")?;
    match action {
        1 => {
            let record_id = reader.read_string(MAX_STRING_LEN, "record_id")?;
            let record_type = reader.read_string(MAX_STRING_LEN, "record_type")?;
            let count = reader.read_len(MAX_PROPERTIES_PER_RECORD, "properties")?;
            let mut properties = Vec::with_capacity(count);
            for _ in 0..count {
                properties.push(decode_property(reader)?);
            }
            Ok(Payload::CreateRecord(CreateRecord {
                record_id,
                record_type,
                properties,
            }))
        }
        2 => {
            let record_id = reader.read_string(MAX_STRING_LEN, "record_id")?;
            Ok(Payload::FinalizeRecord(FinalizeRecord { record_id }))
        }
        _ => Err(DecodeError::InvalidAction { action }),
    }
}

/// Decodes a single transaction payload, returning its timestamp and payload.
pub fn decode_transaction_payload(input: &[u8]) -> Result<(i64, Payload), DecodeError> {
    let mut reader = Reader::new(input);
    let timestamp = reader.read_signed_varint("timestamp")?;
    let payload = decode_payload(&mut reader)?;
    ensure_consumed(&reader)?;
    Ok((timestamp, payload))
}

/// Decodes a batch, detecting the compressed form automatically.
pub fn decode_batch(input: &[u8]) -> Result<PayloadBatch, DecodeError> {
    if input.len() < 4 {
        return Err(DecodeError::UnexpectedEof { context: "magic" });
    }
    let mut found = [0u8; 4];
    found.copy_from_slice(&input[0..4]);

    if &found == MAGIC_COMPRESSED {
        let decompressed = decompress(input)?;
        decode_uncompressed(&decompressed)
    } else if &found == MAGIC_UNCOMPRESSED {
        if input.len() > MAX_BATCH_SIZE {
            return Err(DecodeError::LengthExceedsLimit {
                field: "batch",
                len: input.len(),
                max: MAX_BATCH_SIZE,
            });
        }
        decode_uncompressed(input)
    } else {
        Err(DecodeError::InvalidMagic { found })
    }
}

/// Decompresses an `SCBZ` batch, returning the uncompressed bytes.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut reader = Reader::new(input);
    let magic = reader.read_bytes(4, "magic")?;
    if magic != MAGIC_COMPRESSED {
        let mut found = [0u8; 4];
        found.copy_from_slice(magic);
        return Err(DecodeError::InvalidMagic { found });
    }
    let declared = reader.read_len(MAX_BATCH_SIZE, "uncompressed_size")?;
    let frame = reader.read_bytes(reader.remaining_len(), "zstd frame")?;

    let decompressed = zstd::bulk::decompress(frame, declared)
        .map_err(|e| DecodeError::DecompressionFailed(e.to_string()))?;
    if decompressed.len() != declared {
        return Err(DecodeError::UncompressedSizeMismatch {
            declared,
            actual: decompressed.len(),
        });
    }
    Ok(decompressed)
}

fn decode_uncompressed(input: &[u8]) -> Result<PayloadBatch, DecodeError> {
    let mut reader = Reader::new(input);
    let magic = reader.read_bytes(4, "magic")?;
    if magic != MAGIC_UNCOMPRESSED {
        let mut found = [0u8; 4];
        found.copy_from_slice(magic);
        return Err(DecodeError::InvalidMagic { found });
    }

    let version = reader.read_byte("version")?;
    if !(MIN_FORMAT_VERSION..=FORMAT_VERSION).contains(&version) {
        return Err(DecodeError::UnsupportedVersion { version });
    }

    let timestamp = reader.read_signed_varint("timestamp")?;
    let count = reader.read_len(MAX_PAYLOADS_PER_BATCH, "payloads")?;
    let mut payloads = Vec::with_capacity(count);
    for _ in 0..count {
        payloads.push(decode_payload(&mut reader)?);
    }
    ensure_consumed(&reader)?;

    Ok(PayloadBatch {
        timestamp,
        payloads,
    })
}

fn ensure_consumed(reader: &Reader<'_>) -> Result<(), DecodeError> {
    if reader.is_empty() {
        Ok(())
    } else {
        Err(DecodeError::TrailingBytes {
            remaining: reader.remaining_len(),
        })
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes one payload (action byte + body).
pub fn encode_payload(writer: &mut Writer, payload: &Payload) -> Result<(), EncodeError> {
    writer.write_byte(payload.action());
    match payload {
        Payload::CreateRecord(cr) => {
            write_bounded(writer, &cr.record_id, "record_id")?;
            write_bounded(writer, &cr.record_type, "record_type")?;
            if cr.properties.len() > MAX_PROPERTIES_PER_RECORD {
                return Err(EncodeError::LengthExceedsLimit {
                    field: "properties",
                    len: cr.properties.len(),
                    max: MAX_PROPERTIES_PER_RECORD,
                });
            }
            writer.write_varint(cr.properties.len() as u64);
            for property in &cr.properties {
                encode_property(writer, property)?;
            }
        }
        Payload::FinalizeRecord(fr) => {
            write_bounded(writer, &fr.record_id, "record_id")?;
        }
    }
    Ok(())
}

/// Encodes a single transaction payload: timestamp then payload.
pub fn encode_transaction_payload(payload: &Payload, timestamp: i64) -> Result<Vec<u8>, EncodeError> {
    let mut writer = Writer::with_capacity(64);
    writer.write_signed_varint(timestamp);
    encode_payload(&mut writer, payload)?;
    Ok(writer.into_bytes())
}

/// Encodes a batch in the uncompressed format.
pub fn encode_batch(batch: &PayloadBatch) -> Result<Vec<u8>, EncodeError> {
    if batch.payloads.len() > MAX_PAYLOADS_PER_BATCH {
        return Err(EncodeError::LengthExceedsLimit {
            field: "payloads",
            len: batch.payloads.len(),
            max: MAX_PAYLOADS_PER_BATCH,
        });
    }

    let mut writer = Writer::with_capacity(256);
    writer.write_bytes(MAGIC_UNCOMPRESSED);
    writer.write_byte(FORMAT_VERSION);
    writer.write_signed_varint(batch.timestamp);
    writer.write_varint(batch.payloads.len() as u64);
    for payload in &batch.payloads {
        encode_payload(&mut writer, payload)?;
    }

    if writer.len() > MAX_BATCH_SIZE {
        return Err(EncodeError::LengthExceedsLimit {
            field: "batch",
            len: writer.len(),
            max: MAX_BATCH_SIZE,
        });
    }
    Ok(writer.into_bytes())
}

/// Encodes a batch and compresses it with zstd at the given level.
pub fn encode_batch_compressed(batch: &PayloadBatch, level: i32) -> Result<Vec<u8>, EncodeError> {
    let uncompressed = encode_batch(batch)?;
    let compressed = zstd::bulk::compress(&uncompressed, level)
        .map_err(|e| EncodeError::CompressionFailed(e.to_string()))?;

    let mut writer = Writer::with_capacity(compressed.len() + 8);
    writer.write_bytes(MAGIC_COMPRESSED);
    writer.write_varint(uncompressed.len() as u64);
    writer.write_bytes(&compressed);
    debug!(
        uncompressed = uncompressed.len(),
        compressed = writer.len(),
        "compressed batch"
    );
    Ok(writer.into_bytes())
}
