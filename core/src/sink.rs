use crate::index::DocumentIndex;
use anyhow::Result;

/// Outstanding delete requests are flushed once this many ids accumulate.
pub const MAX_PENDING_DELETES: usize = 1000;

/// Accumulates delete-by-id instructions and submits them to the index in
/// bounded batches. One sink per resolver executor, never shared; the flush
/// threshold is therefore per executor.
pub struct DeletionSink<'a, I: DocumentIndex> {
    index: &'a I,
    pending: Vec<String>,
    deleted: u64,
}

impl<'a, I: DocumentIndex> DeletionSink<'a, I> {
    pub fn new(index: &'a I) -> Self {
        Self {
            index,
            pending: Vec::new(),
            deleted: 0,
        }
    }

    /// Queue one id for deletion, flushing once the batch is full. A failed
    /// flush leaves the batch intact and surfaces the error.
    pub fn push(&mut self, id: String) -> Result<()> {
        self.pending.push(id);
        self.deleted += 1;
        if self.pending.len() >= MAX_PENDING_DELETES {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        tracing::info!(batch = self.pending.len(), "deleting duplicates");
        self.index.delete(&self.pending)?;
        self.pending.clear();
        Ok(())
    }

    /// Number of ids queued but not yet submitted.
    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }

    /// Flush whatever remains and report the total number of ids submitted
    /// over the sink's lifetime.
    pub fn close(mut self) -> Result<u64> {
        self.flush()?;
        Ok(self.deleted)
    }
}
