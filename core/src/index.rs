use crate::{IndexRecord, PartitionRange};
use anyhow::Result;

/// Boundary operations provided by the external index service.
pub trait DocumentIndex {
    /// Total number of matching documents (count-only query, no rows).
    fn count(&self) -> Result<u64>;

    /// Bounded range read projecting the dedup fields. May return fewer
    /// documents than the range asks for if the index shrank after
    /// planning; a short read is not an error.
    fn fetch(&self, range: &PartitionRange) -> Result<Vec<IndexRecord>>;

    /// Bulk delete by document id. May be called repeatedly before a commit.
    fn delete(&self, ids: &[String]) -> Result<()>;

    /// Make prior deletes visible to queries. Idempotent; committing with
    /// nothing outstanding is a no-op.
    fn commit(&self) -> Result<()>;
}
