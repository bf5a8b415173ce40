use anyhow::Result;
use dedup_core::job::{run, DedupOptions};
use dedup_core::{DocumentIndex, IndexRecord, PartitionRange};
use parking_lot::Mutex;
use std::collections::HashSet;

struct FakeIndex {
    docs: Vec<IndexRecord>,
    reported_count: Option<u64>,
    fail_delete: bool,
    deletes: Mutex<Vec<Vec<String>>>,
    commits: Mutex<u32>,
}

impl FakeIndex {
    fn new(docs: Vec<IndexRecord>) -> Self {
        Self {
            docs,
            reported_count: None,
            fail_delete: false,
            deletes: Mutex::new(Vec::new()),
            commits: Mutex::new(0),
        }
    }

    fn deleted_ids(&self) -> HashSet<String> {
        self.deletes.lock().iter().flatten().cloned().collect()
    }
}

impl DocumentIndex for FakeIndex {
    fn count(&self) -> Result<u64> {
        Ok(self.reported_count.unwrap_or(self.docs.len() as u64))
    }

    fn fetch(&self, range: &PartitionRange) -> Result<Vec<IndexRecord>> {
        let start = (range.start as usize).min(self.docs.len());
        let end = ((range.start + range.count) as usize).min(self.docs.len());
        Ok(self.docs[start..end].to_vec())
    }

    fn delete(&self, ids: &[String]) -> Result<()> {
        if self.fail_delete {
            anyhow::bail!("delete rejected");
        }
        self.deletes.lock().push(ids.to_vec());
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        *self.commits.lock() += 1;
        Ok(())
    }
}

fn rec(id: &str, fingerprint: &str, weight: f32, modified_at: i64) -> IndexRecord {
    IndexRecord {
        id: id.into(),
        fingerprint: fingerprint.into(),
        weight,
        modified_at,
    }
}

#[test]
fn keeps_one_survivor_per_fingerprint() {
    // duplicates of fp-a deliberately interleaved so they scan from
    // different partitions and must be regrouped
    let index = FakeIndex::new(vec![
        rec("a1", "fp-a", 5.0, 100),
        rec("b1", "fp-b", 1.0, 10),
        rec("a2", "fp-a", 9.0, 50),
        rec("c1", "fp-c", 2.0, 20),
        rec("a3", "fp-a", 3.0, 200),
        rec("b2", "fp-b", 1.0, 30),
    ]);
    let stats = run(
        &index,
        &DedupOptions {
            parallelism: 3,
            no_commit: false,
        },
    )
    .unwrap();

    assert_eq!(stats.scanned, 6);
    assert_eq!(stats.groups, 3);
    assert_eq!(stats.deleted, 3);
    let expected: HashSet<String> = ["a1", "a3", "b1"].iter().map(|s| s.to_string()).collect();
    assert_eq!(index.deleted_ids(), expected);
    assert_eq!(*index.commits.lock(), 1);
}

#[test]
fn no_commit_mode_flushes_but_never_commits() {
    let index = FakeIndex::new(vec![
        rec("a1", "fp-a", 5.0, 100),
        rec("a2", "fp-a", 9.0, 50),
    ]);
    let stats = run(
        &index,
        &DedupOptions {
            parallelism: 2,
            no_commit: true,
        },
    )
    .unwrap();

    assert_eq!(stats.deleted, 1);
    assert_eq!(index.deleted_ids(), HashSet::from(["a1".to_string()]));
    assert_eq!(*index.commits.lock(), 0);
}

#[test]
fn clean_index_skips_the_commit() {
    let index = FakeIndex::new(vec![
        rec("a", "fp-a", 1.0, 1),
        rec("b", "fp-b", 1.0, 1),
        rec("c", "fp-c", 1.0, 1),
    ]);
    let stats = run(
        &index,
        &DedupOptions {
            parallelism: 2,
            no_commit: false,
        },
    )
    .unwrap();

    assert_eq!(stats.scanned, 3);
    assert_eq!(stats.groups, 3);
    assert_eq!(stats.deleted, 0);
    assert!(index.deletes.lock().is_empty());
    assert_eq!(*index.commits.lock(), 0);
}

#[test]
fn empty_index_is_a_no_op() {
    let index = FakeIndex::new(Vec::new());
    let stats = run(
        &index,
        &DedupOptions {
            parallelism: 4,
            no_commit: false,
        },
    )
    .unwrap();

    assert_eq!(stats.scanned, 0);
    assert_eq!(stats.groups, 0);
    assert_eq!(stats.deleted, 0);
    assert!(index.deletes.lock().is_empty());
    assert_eq!(*index.commits.lock(), 0);
}

#[test]
fn short_reads_after_count_drift_are_tolerated() {
    let mut index = FakeIndex::new(vec![
        rec("a1", "fp-a", 2.0, 1),
        rec("a2", "fp-a", 4.0, 1),
        rec("b", "fp-b", 1.0, 1),
    ]);
    // planning saw more documents than the range fetches will return
    index.reported_count = Some(10);

    let stats = run(
        &index,
        &DedupOptions {
            parallelism: 3,
            no_commit: false,
        },
    )
    .unwrap();

    assert_eq!(stats.scanned, 3);
    assert_eq!(stats.deleted, 1);
    assert_eq!(index.deleted_ids(), HashSet::from(["a1".to_string()]));
}

#[test]
fn submission_failure_is_fatal_and_skips_the_commit() {
    let mut index = FakeIndex::new(vec![
        rec("a1", "fp-a", 2.0, 1),
        rec("a2", "fp-a", 4.0, 1),
    ]);
    index.fail_delete = true;

    let result = run(
        &index,
        &DedupOptions {
            parallelism: 2,
            no_commit: false,
        },
    );

    assert!(result.is_err());
    assert_eq!(*index.commits.lock(), 0);
}
