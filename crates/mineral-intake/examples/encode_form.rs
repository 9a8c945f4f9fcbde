//! Encodes an intake form into a payload batch and prints what a signer
//! would receive.
//!
//! Usage: `encode_form [schema.json] [form.json]`

use std::fs;

use mineral_intake::codec::{decode_batch, encode_batch, encode_batch_compressed};
use mineral_intake::{
    prepare_transactions, validate_batch, Catalog, FormState, Payload, TypeResolver, Value,
    build_payload_batch,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn format_value(v: &Value) -> String {
    match v {
        Value::String(s) => format!("\"{}\"", s),
        Value::Enum(s) => format!("ENUM({})", s),
        Value::Number(n) => format!("{} ({:.6})", n, *n as f64 / 1_000_000.0),
        Value::Location(loc) => format!(
            "LOCATION({:.6}, {:.6})",
            loc.latitude as f64 / 1_000_000.0,
            loc.longitude as f64 / 1_000_000.0
        ),
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mineral_intake=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let schema_path = args
        .next()
        .unwrap_or_else(|| "data/core_types.json".to_string());
    let form_path = args
        .next()
        .unwrap_or_else(|| "data/sample_form.json".to_string());

    let catalog = Catalog::from_path(&schema_path, "mineral").expect("Failed to load catalog");
    let form_json = fs::read_to_string(&form_path).expect("Failed to read form");
    let mut form: FormState = serde_json::from_str(&form_json).expect("Failed to parse form");

    let selectable = TypeResolver::new(&catalog).resolve(&mut form);
    println!("Selectable types: {}", selectable.join(", "));
    form.validate(&selectable).expect("Form is invalid");

    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    let batch = build_payload_batch(&form, catalog.record_type(), timestamp)
        .expect("Failed to build batch");
    validate_batch(&batch, catalog.schema_context()).expect("Batch is invalid");

    println!("\n=== Batch ({} payloads, timestamp {}) ===", batch.len(), batch.timestamp);
    for payload in &batch.payloads {
        match payload {
            Payload::FinalizeRecord(fr) => println!("FinalizeRecord: {}", fr.record_id),
            Payload::CreateRecord(cr) => {
                println!("CreateRecord: {} ({})", cr.record_id, cr.record_type);
                for prop in &cr.properties {
                    println!("  {}: {}", prop.name, format_value(&prop.value));
                }
            }
        }
    }

    let bytes = encode_batch(&batch).expect("Failed to encode");
    let compressed = encode_batch_compressed(&batch, 3).expect("Failed to compress");
    assert_eq!(decode_batch(&compressed).expect("Failed to decode"), batch);
    println!("\nEncoded: {} bytes ({} compressed)", bytes.len(), compressed.len());

    println!("\n=== Transactions ===");
    for (i, tx) in prepare_transactions(&batch)
        .expect("Failed to prepare transactions")
        .iter()
        .enumerate()
    {
        println!("[{}] nonce {} sha512 {}", i, tx.nonce, tx.payload_sha512);
    }
}
