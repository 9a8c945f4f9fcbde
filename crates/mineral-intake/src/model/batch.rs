//! Ordered payload batches.

use crate::model::{CreateRecord, FinalizeRecord, Payload};

/// An ordered set of payloads submitted as one unit.
///
/// Order is significant: the ledger applies payloads in sequence, so a
/// finalize of the parent must come before the create of its child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadBatch {
    /// Seconds since the Unix epoch, stamped on every payload.
    pub timestamp: i64,
    /// Payloads in application order.
    pub payloads: Vec<Payload>,
}

impl PayloadBatch {
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Returns the create payloads in order.
    pub fn creates(&self) -> impl Iterator<Item = &CreateRecord> + '_ {
        self.payloads.iter().filter_map(|p| match p {
            Payload::CreateRecord(cr) => Some(cr),
            Payload::FinalizeRecord(_) => None,
        })
    }

    /// Returns the finalize payloads in order.
    pub fn finalizes(&self) -> impl Iterator<Item = &FinalizeRecord> + '_ {
        self.payloads.iter().filter_map(|p| match p {
            Payload::FinalizeRecord(fr) => Some(fr),
            Payload::CreateRecord(_) => None,
        })
    }
}
