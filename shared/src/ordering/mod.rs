//! Display order reconciliation
//!
//! Pure planning functions over lists of [`Sequenced`] entries whose positions form a
//! dense `1..=N` sequence. Every planner returns only the entries whose position
//! actually changes, sorted by ascending new position, so a caller can hand the
//! result to a single batch write.
//!
//! Nothing here touches a store or holds state; the stateful wrappers live in
//! `console-server::catalog`.

mod error;
mod plan;
mod sequence;

pub use error::{OrderingError, OrderingResult};
pub use plan::{
    DeletePlan, InsertPlan, MovePlan, plan_delete, plan_insert, plan_move, plan_normalize,
    plan_renumber, plan_reorder,
};
pub use sequence::{
    OrderChange, PositionDiff, Sequenced, apply_plan, array_move, diff_positions, is_dense,
    next_position,
};
