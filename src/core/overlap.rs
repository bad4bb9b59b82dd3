use std::collections::HashSet;

/// Items of `ours` that also appear in `theirs`, in `ours` order
///
/// Both slices are expected to be duplicate-free (see `MusicProfile`).
pub fn shared_items(ours: &[String], theirs: &[String]) -> Vec<String> {
    let lookup: HashSet<&str> = theirs.iter().map(String::as_str).collect();

    ours.iter()
        .filter(|item| lookup.contains(item.as_str()))
        .cloned()
        .collect()
}

/// Fraction of our own set that is shared, in [0, 1]
///
/// The denominator is our set size only, floored at 1 so an empty set
/// yields 0 rather than dividing by zero. This makes pairwise scores
/// direction-dependent.
#[inline]
pub fn normalized_overlap(shared_count: usize, own_count: usize) -> f64 {
    shared_count as f64 / own_count.max(1) as f64
}
