//! Sequenced entries and diff helpers

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Category, DisplayOrderItem};

/// An entry that carries a 1-based display position
pub trait Sequenced {
    fn key(&self) -> &str;
    fn position(&self) -> u32;
    fn set_position(&mut self, position: u32);
}

impl Sequenced for DisplayOrderItem {
    fn key(&self) -> &str {
        &self.id
    }

    fn position(&self) -> u32 {
        self.display_order
    }

    fn set_position(&mut self, position: u32) {
        self.display_order = position;
    }
}

impl Sequenced for Category {
    fn key(&self) -> &str {
        &self.id
    }

    fn position(&self) -> u32 {
        self.display_order
    }

    fn set_position(&mut self, position: u32) {
        self.display_order = position;
    }
}

/// One entry of a plan: `id` moves from `from` to `to`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderChange {
    pub id: String,
    pub from: u32,
    pub to: u32,
}

impl OrderChange {
    pub fn new(id: impl Into<String>, from: u32, to: u32) -> Self {
        Self {
            id: id.into(),
            from,
            to,
        }
    }

    /// The change that undoes this one
    pub fn reversed(&self) -> Self {
        Self {
            id: self.id.clone(),
            from: self.to,
            to: self.from,
        }
    }
}

/// Commit diff between a synced snapshot and a working copy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionDiff {
    pub changes: Vec<OrderChange>,
    /// Working ids with no counterpart in the snapshot
    pub unknown: Vec<String>,
}

pub(crate) fn sort_changes(changes: &mut [OrderChange]) {
    changes.sort_by(|a, b| a.to.cmp(&b.to).then_with(|| a.id.cmp(&b.id)));
}

pub(crate) fn sort_entries<T: Sequenced>(items: &mut [T]) {
    items.sort_by(|a, b| {
        a.position()
            .cmp(&b.position())
            .then_with(|| a.key().cmp(b.key()))
    });
}

/// Apply `changes` to `items` and re-sort by position.
///
/// Returns how many entries were updated. Ids not in `items` are ignored.
pub fn apply_plan<T: Sequenced>(items: &mut [T], changes: &[OrderChange]) -> usize {
    let targets: HashMap<&str, u32> = changes.iter().map(|c| (c.id.as_str(), c.to)).collect();
    let mut applied = 0;
    for item in items.iter_mut() {
        if let Some(&to) = targets.get(item.key()) {
            item.set_position(to);
            applied += 1;
        }
    }
    sort_entries(items);
    applied
}

/// Entries of `working` whose position differs from `synced`.
pub fn diff_positions<S: Sequenced, W: Sequenced>(synced: &[S], working: &[W]) -> PositionDiff {
    let base: HashMap<&str, u32> = synced.iter().map(|s| (s.key(), s.position())).collect();
    let mut diff = PositionDiff::default();
    for entry in working {
        match base.get(entry.key()) {
            None => diff.unknown.push(entry.key().to_string()),
            Some(&from) if from != entry.position() => {
                diff.changes
                    .push(OrderChange::new(entry.key(), from, entry.position()));
            }
            Some(_) => {}
        }
    }
    sort_changes(&mut diff.changes);
    diff
}

/// True when positions are exactly `{1..=N}`
pub fn is_dense<T: Sequenced>(items: &[T]) -> bool {
    let mut positions: Vec<u32> = items.iter().map(Sequenced::position).collect();
    positions.sort_unstable();
    positions
        .iter()
        .enumerate()
        .all(|(i, &p)| p as usize == i + 1)
}

/// Append position (`N + 1`)
pub fn next_position<T: Sequenced>(items: &[T]) -> u32 {
    items.len() as u32 + 1
}

/// Remove the element at `from` and reinsert it at `to`.
///
/// Returns `false` and leaves `items` untouched when either index is out of bounds.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    true
}
