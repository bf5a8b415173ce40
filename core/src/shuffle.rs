use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Route key/value pairs into `buckets` hash partitions and group by key
/// within each, so all pairs sharing a key land in the same bucket as one
/// complete group. Pure data movement; no ordering guarantee within or
/// across groups.
pub fn shuffle_by_key<K, V>(
    pairs: impl IntoIterator<Item = (K, V)>,
    buckets: usize,
) -> Vec<HashMap<K, Vec<V>>>
where
    K: Hash + Eq,
{
    let buckets = buckets.max(1);
    let mut out: Vec<HashMap<K, Vec<V>>> = (0..buckets).map(|_| HashMap::new()).collect();
    for (key, value) in pairs {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let slot = (hasher.finish() % buckets as u64) as usize;
        out[slot].entry(key).or_default().push(value);
    }
    out
}
