//! Generic group-by/reduce combinators shared by the grouped operations.
//!
//! `BTreeMap` keying makes every grouped result deterministic: currency
//! totals come out sorted by currency, daily summaries ascending by date,
//! and ranking ties resolve in key order.

use std::collections::BTreeMap;

/// Partitions `items` by the key extractor, preserving encounter order
/// within each group.
pub fn group_by<T, K, F>(items: &[T], key: F) -> BTreeMap<K, Vec<&T>>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut groups: BTreeMap<K, Vec<&T>> = BTreeMap::new();
    for item in items {
        groups.entry(key(item)).or_default().push(item);
    }
    groups
}

/// Returns the item with the greatest key. A later item replaces the
/// current best only when strictly greater, so ties keep the first
/// encountered.
pub fn max_by_first<T, K, F>(items: &[T], key: F) -> Option<&T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut best: Option<(&T, K)> = None;
    for item in items {
        let k = key(item);
        let better = match &best {
            None => true,
            Some((_, best_key)) => k > *best_key,
        };
        if better {
            best = Some((item, k));
        }
    }
    best.map(|(item, _)| item)
}
