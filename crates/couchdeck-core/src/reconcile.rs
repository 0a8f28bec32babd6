//! Diffing a live id list against a freshly fetched item list.
//!
//! The reconciler never recreates an item whose id survives: survivors are
//! only repositioned. Removals come back in their old relative order and
//! additions carry their index in the new order, ascending, so inserting them
//! one by one into the post-removal list reproduces the target sequence.

use couchdeck_types::AppEntry;
use std::collections::{HashMap, HashSet};
use tracing::error;

/// Anything with a stable string identity
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for AppEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for String {
    fn id(&self) -> &str {
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation<T> {
    /// New items with their index in the target order, ascending
    pub additions: Vec<(T, usize)>,
    /// Ids to destroy, in old relative order
    pub removals: Vec<String>,
    /// Final id order once additions and removals are applied
    pub target_order: Vec<String>,
}

impl<T> Reconciliation<T> {
    /// True when nothing is added or removed.
    ///
    /// Survivors may still need repositioning; compare against
    /// `target_order` for that.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    /// Apply this reconciliation to a plain id list.
    #[must_use]
    pub fn apply_to_ids(&self, old_ids: &[String]) -> Vec<String>
    where
        T: Identified,
    {
        let removed: HashSet<&str> = self.removals.iter().map(String::as_str).collect();
        let mut ids: Vec<String> = old_ids
            .iter()
            .filter(|id| !removed.contains(id.as_str()))
            .cloned()
            .collect();

        reorder_survivors(&mut ids, &self.target_order);

        for (item, index) in &self.additions {
            let index = (*index).min(ids.len());
            ids.insert(index, item.id().to_string());
        }
        ids
    }
}

/// Sort `ids` into the relative order they have in `target`.
///
/// Ids absent from `target` keep their position at the end.
pub fn reorder_survivors(ids: &mut [String], target: &[String]) {
    let positions: HashMap<&str, usize> = target
        .iter()
        .enumerate()
        .map(|(index, id)| (id.as_str(), index))
        .collect();
    ids.sort_by_key(|id| positions.get(id.as_str()).copied().unwrap_or(usize::MAX));
}

/// Drop repeated ids, keeping the first occurrence.
///
/// Duplicates are a data-integrity fault in the source list and are logged,
/// never silently merged. Returns the duplicated ids alongside the clean list.
pub fn dedup_by_id<T: Identified>(items: Vec<T>) -> (Vec<T>, Vec<String>) {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    let mut unique = Vec::with_capacity(items.len());

    for item in items {
        if seen.insert(item.id().to_string()) {
            unique.push(item);
        } else {
            error!("Duplicate id in app source list: {}", item.id());
            duplicates.push(item.id().to_string());
        }
    }

    (unique, duplicates)
}

/// Compute the additions and removals turning `old_ids` into `new_items`.
///
/// `new_items` is deduplicated first (see [`dedup_by_id`]).
pub fn reconcile<T: Identified>(old_ids: &[String], new_items: Vec<T>) -> Reconciliation<T> {
    let (new_items, _) = dedup_by_id(new_items);

    let new_ids: HashSet<&str> = new_items.iter().map(Identified::id).collect();
    let old_set: HashSet<&str> = old_ids.iter().map(String::as_str).collect();

    let removals: Vec<String> = old_ids
        .iter()
        .filter(|id| !new_ids.contains(id.as_str()))
        .cloned()
        .collect();

    let target_order: Vec<String> = new_items.iter().map(|item| item.id().to_string()).collect();

    let additions: Vec<(T, usize)> = new_items
        .into_iter()
        .enumerate()
        .filter(|(_, item)| !old_set.contains(item.id()))
        .map(|(index, item)| (item, index))
        .collect();

    Reconciliation {
        additions,
        removals,
        target_order,
    }
}
