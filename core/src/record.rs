use serde::{Deserialize, Serialize};

/// One document's deduplication-relevant projection of an index entry.
/// Immutable once read from the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Stable identifier, unique across the whole index.
    pub id: String,
    /// Content digest; duplicates share it, so it is the grouping key.
    pub fingerprint: String,
    /// Relevance score, the primary survivor rank.
    pub weight: f32,
    /// Modification time in epoch milliseconds, the tie-break rank.
    pub modified_at: i64,
}

/// A contiguous slice of the index's document ordering, assigned to one
/// scanning unit. Snapshot of the count at planning time; the index may
/// drift before the range is actually fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionRange {
    pub start: u64,
    pub count: u64,
}
