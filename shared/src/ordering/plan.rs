//! Insert / move / delete planners

use std::collections::{HashMap, HashSet};

use super::error::{OrderingError, OrderingResult};
use super::sequence::{OrderChange, Sequenced, sort_changes};

/// Shifts needed to open a slot at `position`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertPlan {
    /// Slot the new entry is created at (after clamping)
    pub position: u32,
    pub shifts: Vec<OrderChange>,
}

/// Shifts needed to move one entry, plus the moved entry itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    pub moved: OrderChange,
    pub shifts: Vec<OrderChange>,
}

impl MovePlan {
    pub fn is_noop(&self) -> bool {
        self.moved.from == self.moved.to
    }

    /// Moved entry and shifted siblings together, sorted by new position.
    /// Empty for a no-op move.
    pub fn changes(&self) -> Vec<OrderChange> {
        if self.is_noop() {
            return Vec::new();
        }
        let mut all = Vec::with_capacity(self.shifts.len() + 1);
        all.push(self.moved.clone());
        all.extend(self.shifts.iter().cloned());
        sort_changes(&mut all);
        all
    }
}

/// Compaction after removing one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePlan {
    pub id: String,
    /// Position the removed entry occupied
    pub position: u32,
    pub shifts: Vec<OrderChange>,
}

/// Plan the creation of a new entry at `target`.
///
/// `target` beyond `N + 1` is clamped to `N + 1` (append). Every entry at or after the
/// slot shifts up by one; the new entry itself is not part of the shifts.
pub fn plan_insert<T: Sequenced>(existing: &[T], target: u32) -> OrderingResult<InsertPlan> {
    let append = existing.len() as u32 + 1;
    if target < 1 {
        return Err(OrderingError::InvalidPosition {
            position: target,
            max: append,
        });
    }
    let position = target.min(append);

    let mut shifts: Vec<OrderChange> = existing
        .iter()
        .filter(|e| e.position() >= position)
        .map(|e| OrderChange::new(e.key(), e.position(), e.position() + 1))
        .collect();
    sort_changes(&mut shifts);

    Ok(InsertPlan { position, shifts })
}

/// Plan moving `id` from `old` to `new` with array-move semantics.
///
/// Moving up shifts `[new, old - 1]` by +1, moving down shifts `[old + 1, new]` by -1.
pub fn plan_move<T: Sequenced>(
    existing: &[T],
    id: &str,
    old: u32,
    new: u32,
) -> OrderingResult<MovePlan> {
    let max = existing.len() as u32;
    for position in [old, new] {
        if position < 1 || position > max {
            return Err(OrderingError::InvalidPosition { position, max });
        }
    }

    let entry = existing
        .iter()
        .find(|e| e.key() == id)
        .ok_or_else(|| OrderingError::NotFound(id.to_string()))?;
    if entry.position() != old {
        return Err(OrderingError::StalePosition {
            id: id.to_string(),
            expected: old,
            actual: entry.position(),
        });
    }

    let moved = OrderChange::new(id, old, new);
    if old == new {
        return Ok(MovePlan {
            moved,
            shifts: Vec::new(),
        });
    }

    let mut shifts: Vec<OrderChange> = existing
        .iter()
        .filter(|e| e.key() != id)
        .filter_map(|e| {
            let p = e.position();
            let to = if new < old && (new..old).contains(&p) {
                p + 1
            } else if new > old && (old + 1..=new).contains(&p) {
                p - 1
            } else {
                return None;
            };
            Some(OrderChange::new(e.key(), p, to))
        })
        .collect();
    sort_changes(&mut shifts);

    Ok(MovePlan { moved, shifts })
}

/// Plan removing `id`; every later entry shifts down by one.
pub fn plan_delete<T: Sequenced>(existing: &[T], id: &str) -> OrderingResult<DeletePlan> {
    let max = existing.len() as u32;
    let entry = existing
        .iter()
        .find(|e| e.key() == id)
        .ok_or_else(|| OrderingError::NotFound(id.to_string()))?;
    let position = entry.position();
    if position < 1 || position > max {
        return Err(OrderingError::InvalidPosition { position, max });
    }

    let mut shifts: Vec<OrderChange> = existing
        .iter()
        .filter(|e| e.key() != id && e.position() > position)
        .map(|e| OrderChange::new(e.key(), e.position(), e.position() - 1))
        .collect();
    sort_changes(&mut shifts);

    Ok(DeletePlan {
        id: id.to_string(),
        position,
        shifts,
    })
}

fn renumber<'a, T: Sequenced + 'a>(ordered: impl IntoIterator<Item = &'a T>) -> Vec<OrderChange> {
    let mut changes: Vec<OrderChange> = ordered
        .into_iter()
        .enumerate()
        .filter_map(|(i, e)| {
            let to = i as u32 + 1;
            (e.position() != to).then(|| OrderChange::new(e.key(), e.position(), to))
        })
        .collect();
    sort_changes(&mut changes);
    changes
}

/// Renumber a list in its given order to `index + 1`, keeping only changed entries.
pub fn plan_renumber<T: Sequenced>(ordered: &[T]) -> Vec<OrderChange> {
    renumber(ordered)
}

/// Repair gaps and duplicates: sort by `(position, id)` and renumber.
pub fn plan_normalize<T: Sequenced>(existing: &[T]) -> Vec<OrderChange> {
    let mut sorted: Vec<&T> = existing.iter().collect();
    sorted.sort_by(|a, b| {
        a.position()
            .cmp(&b.position())
            .then_with(|| a.key().cmp(b.key()))
    });
    renumber(sorted)
}

/// Plan a whole permutation coming from drag-and-drop.
///
/// `ordered_ids` must name every entry of `existing` exactly once.
pub fn plan_reorder<T: Sequenced>(
    existing: &[T],
    ordered_ids: &[String],
) -> OrderingResult<Vec<OrderChange>> {
    if ordered_ids.len() != existing.len() {
        return Err(OrderingError::NotAPermutation(format!(
            "expected {} ids, got {}",
            existing.len(),
            ordered_ids.len()
        )));
    }

    let by_key: HashMap<&str, &T> = existing.iter().map(|e| (e.key(), e)).collect();
    let mut seen = HashSet::with_capacity(ordered_ids.len());
    let mut ordered = Vec::with_capacity(ordered_ids.len());
    for id in ordered_ids {
        if !seen.insert(id.as_str()) {
            return Err(OrderingError::NotAPermutation(format!("duplicate id {}", id)));
        }
        let entry = by_key
            .get(id.as_str())
            .ok_or_else(|| OrderingError::NotAPermutation(format!("unknown id {}", id)))?;
        ordered.push(*entry);
    }

    Ok(renumber(ordered))
}
