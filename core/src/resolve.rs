use crate::IndexRecord;

/// Reduce one fingerprint group to the single record worth keeping.
///
/// The scan starts from an arbitrary member and replaces the keeper whenever
/// a candidate has strictly greater weight, or equal weight with a strictly
/// later modification time; a displaced keeper joins the losers. Returns
/// `None` for an empty group; a singleton group yields no losers. When both
/// weight and timestamp tie, the outcome follows scan order, which is
/// deliberately left unspecified.
pub fn select_survivor(group: Vec<IndexRecord>) -> Option<(IndexRecord, Vec<IndexRecord>)> {
    let mut members = group.into_iter();
    let mut keeper = members.next()?;
    let mut losers = Vec::new();
    for candidate in members {
        if candidate.weight > keeper.weight
            || (candidate.weight == keeper.weight && candidate.modified_at > keeper.modified_at)
        {
            losers.push(std::mem::replace(&mut keeper, candidate));
        } else {
            losers.push(candidate);
        }
    }
    Some((keeper, losers))
}
