//! Ranking - Sort by a derived key, then cut off at k
//!
//! Every ranked query the miner answers is the same three steps:
//! derive a key per item, stable-sort by a comparator over the keys,
//! then keep the first `k` items. What differs is the key, the
//! comparator and what happens to items tied with the k-th one.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;

/// What to do with items tied with the last one inside the cutoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiePolicy {
    /// Cut at exactly `k`; ties keep their snapshot order
    Truncate,
    /// Never split a tied group: the result may be longer than `k`
    KeepTiedGroup,
}

/// Pair every item with its key and stable-sort by `compare_fn`
pub fn rank<T, K, F, C>(items: impl IntoIterator<Item = T>, key_fn: F, compare_fn: C) -> Vec<(K, T)>
where
    F: Fn(&T) -> K,
    C: Fn(&K, &K) -> Ordering,
{
    let mut ranked: Vec<(K, T)> = items
        .into_iter()
        .map(|item| (key_fn(&item), item))
        .collect();
    // sort_by is stable, so equal keys keep their relative order
    ranked.sort_by(|a, b| compare_fn(&a.0, &b.0));
    ranked
}

/// Keep only the first item seen for each value of `distinct_fn`
pub fn distinct_by<K, T, D, F>(ranked: Vec<(K, T)>, distinct_fn: F) -> Vec<(K, T)>
where
    D: Eq + Hash,
    F: Fn(&T) -> D,
{
    let mut seen = HashSet::new();
    ranked
        .into_iter()
        .filter(|(_, item)| seen.insert(distinct_fn(item)))
        .collect()
}

/// Cut a ranked list down to `k` items under `policy`
///
/// `k == 0` always yields an empty list, and `k` larger than the list
/// returns everything.
pub fn truncate<K, T, C>(ranked: Vec<(K, T)>, k: usize, policy: TiePolicy, compare_fn: C) -> Vec<T>
where
    C: Fn(&K, &K) -> Ordering,
{
    if k == 0 {
        return Vec::new();
    }

    let mut cut = k.min(ranked.len());
    if policy == TiePolicy::KeepTiedGroup {
        while cut > 0
            && cut < ranked.len()
            && compare_fn(&ranked[cut - 1].0, &ranked[cut].0) == Ordering::Equal
        {
            cut += 1;
        }
    }

    ranked.into_iter().take(cut).map(|(_, item)| item).collect()
}

/// Rank `items` by `key_fn`/`compare_fn` and keep the top `k`
pub fn rank_and_truncate<T, K, F, C>(
    items: impl IntoIterator<Item = T>,
    key_fn: F,
    compare_fn: C,
    k: usize,
    policy: TiePolicy,
) -> Vec<T>
where
    F: Fn(&T) -> K,
    C: Fn(&K, &K) -> Ordering,
{
    if k == 0 {
        return Vec::new();
    }
    let ranked = rank(items, key_fn, &compare_fn);
    truncate(ranked, k, policy, &compare_fn)
}

/// Largest key first
pub fn descending<K: Ord>(a: &K, b: &K) -> Ordering {
    b.cmp(a)
}

/// Highest count first, then alphabetical by name
pub fn by_count_then_name(a: &(usize, String), b: &(usize, String)) -> Ordering {
    b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1))
}
