use crate::PartitionRange;

/// Split `total` documents into exactly `splits` contiguous ranges. The
/// first `splits - 1` ranges each cover `total / splits` documents; the
/// last absorbs the remainder, which can be anything from zero up to more
/// than an even share.
pub fn plan_partitions(total: u64, splits: usize) -> Vec<PartitionRange> {
    let splits = splits.max(1);
    let per_split = total / splits as u64;
    let mut ranges = Vec::with_capacity(splits);
    let mut start = 0u64;
    for _ in 0..splits - 1 {
        ranges.push(PartitionRange { start, count: per_split });
        start += per_split;
    }
    ranges.push(PartitionRange { start, count: total - start });
    ranges
}
