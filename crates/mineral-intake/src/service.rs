//! Collaborator traits: reading records and submitting batches.
//!
//! The HTTP client, signer and ledger connection live outside this crate and
//! plug in through these traits.

use async_trait::async_trait;
use rustc_hash::FxHashMap;

use crate::error::{FetchError, SubmitError};
use crate::model::{AssetRecord, PayloadBatch};

/// Asynchronous read access to ledger records.
#[async_trait]
pub trait RecordFetcher: Send + Sync {
    /// Fetches the record at `path` (e.g. `records/{recordId}`).
    async fn get(&self, path: &str) -> Result<AssetRecord, FetchError>;
}

/// Asynchronous submission of payload batches.
///
/// Implementations treat the batch as one ordered unit: a later payload is
/// not applied unless every earlier one was accepted. Retries and rollback
/// are the implementation's concern.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// Signs (when `sign` is set) and submits the batch.
    async fn submit(&self, batch: &PayloadBatch, sign: bool) -> Result<(), SubmitError>;
}

/// Returns the read API path of a record.
pub fn record_path(record_id: &str) -> String {
    format!("records/{record_id}")
}

/// A fetcher serving a fixed set of records keyed by record id.
#[derive(Debug, Clone, Default)]
pub struct StaticRecordFetcher {
    records: FxHashMap<String, AssetRecord>,
}

impl StaticRecordFetcher {
    pub fn new(records: impl IntoIterator<Item = AssetRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|r| (record_path(&r.record_id), r))
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordFetcher for StaticRecordFetcher {
    async fn get(&self, path: &str) -> Result<AssetRecord, FetchError> {
        self.records
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                path: path.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_fetcher() {
        let fetcher = StaticRecordFetcher::new([AssetRecord {
            record_id: "P-1".into(),
            record_type: "mineral".into(),
            properties: vec![],
        }]);

        let record = fetcher.get(&record_path("P-1")).await.unwrap();
        assert_eq!(record.record_id, "P-1");

        assert_eq!(
            fetcher.get("records/P-2").await,
            Err(FetchError::NotFound {
                path: "records/P-2".into()
            })
        );
        assert!(StaticRecordFetcher::empty().get("records/P-1").await.is_err());
    }
}
