use crate::index::DocumentIndex;
use crate::plan::plan_partitions;
use crate::resolve::select_survivor;
use crate::shuffle::shuffle_by_key;
use crate::sink::DeletionSink;
use crate::IndexRecord;
use anyhow::{anyhow, Result};
use std::thread;

pub struct DedupOptions {
    /// Number of parallel scanners and resolver executors.
    pub parallelism: usize,
    /// Flush deletions but leave the final commit to an external caller.
    pub no_commit: bool,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DedupStats {
    pub scanned: u64,
    pub groups: u64,
    pub deleted: u64,
}

/// Run one full deduplication pass: plan partitions, scan them in parallel,
/// shuffle records by fingerprint, resolve each group, and flush deletions.
/// Commits exactly once at the end, unless `no_commit` is set or nothing
/// was deleted. Any index failure along the way is fatal to the job.
pub fn run<I>(index: &I, opts: &DedupOptions) -> Result<DedupStats>
where
    I: DocumentIndex + Sync,
{
    let parallelism = opts.parallelism.max(1);
    let total = index.count()?;
    let ranges = plan_partitions(total, parallelism);
    tracing::info!(total, partitions = ranges.len(), "planned index partitions");

    // Scan phase. The join below is the barrier: no fingerprint group is
    // complete until every partition has been read.
    let mut pairs: Vec<(String, IndexRecord)> = Vec::new();
    thread::scope(|scope| -> Result<()> {
        let scanners: Vec<_> = ranges
            .iter()
            .map(|range| scope.spawn(move || index.fetch(range)))
            .collect();
        for scanner in scanners {
            let records = scanner
                .join()
                .map_err(|_| anyhow!("scanner thread panicked"))??;
            for record in records {
                pairs.push((record.fingerprint.clone(), record));
            }
        }
        Ok(())
    })?;
    let scanned = pairs.len() as u64;

    // Shuffle and resolve. Each executor owns its bucket and its own
    // deletion sink, so the flush threshold applies per executor.
    let buckets = shuffle_by_key(pairs, parallelism);
    let mut groups = 0u64;
    let mut deleted = 0u64;
    thread::scope(|scope| -> Result<()> {
        let resolvers: Vec<_> = buckets
            .into_iter()
            .map(|bucket| {
                scope.spawn(move || -> Result<(u64, u64)> {
                    let mut sink = DeletionSink::new(index);
                    let mut groups = 0u64;
                    for (_fingerprint, members) in bucket {
                        groups += 1;
                        if let Some((_survivor, losers)) = select_survivor(members) {
                            for loser in losers {
                                sink.push(loser.id)?;
                            }
                        }
                    }
                    Ok((groups, sink.close()?))
                })
            })
            .collect();
        for resolver in resolvers {
            let (resolved, submitted) = resolver
                .join()
                .map_err(|_| anyhow!("resolver thread panicked"))??;
            groups += resolved;
            deleted += submitted;
        }
        Ok(())
    })?;

    if deleted > 0 && !opts.no_commit {
        index.commit()?;
    }
    tracing::info!(scanned, groups, deleted, "dedup pass complete");
    Ok(DedupStats {
        scanned,
        groups,
        deleted,
    })
}
