//! Optimistic edit state machine
//!
//! ```text
//!   Clean ──edit──▶ Dirty ──begin_commit──▶ Committing
//!     ▲              │  ▲                      │
//!     └───cancel─────┘  └──────failure─────────┤
//!     ▲                                        │
//!     └───────────────success──────────────────┘
//! ```
//!
//! An edit that brings the working copy back to the synced snapshot lands in
//! `Clean` again. Remote snapshots replace the working copy only while `Clean`.
//!
//! Buffers shared behind a mutex enter `Committing` through [`CommitGuard`], so a
//! commit future dropped mid-write still resolves the state.

use parking_lot::Mutex;
use serde::Serialize;
use shared::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BufferState {
    Clean,
    Dirty,
    Committing,
}

/// Synced snapshot plus a locally edited working copy
#[derive(Debug, Clone)]
pub struct Staged<T> {
    synced: T,
    working: T,
    state: BufferState,
}

impl<T: Clone + PartialEq> Staged<T> {
    pub fn new(snapshot: T) -> Self {
        Self {
            working: snapshot.clone(),
            synced: snapshot,
            state: BufferState::Clean,
        }
    }

    pub fn synced(&self) -> &T {
        &self.synced
    }

    pub fn working(&self) -> &T {
        &self.working
    }

    pub fn state(&self) -> BufferState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state != BufferState::Clean
    }

    /// Always replaces the synced snapshot; the working copy follows only while clean.
    ///
    /// Returns whether the working copy was replaced.
    pub fn on_remote_update(&mut self, snapshot: T) -> bool {
        self.synced = snapshot;
        if self.state == BufferState::Clean {
            self.working = self.synced.clone();
            true
        } else {
            false
        }
    }

    /// Run `f` on a copy of the working state and keep the copy only if `f` succeeds
    pub fn edit<R, E>(&mut self, f: impl FnOnce(&mut T) -> Result<R, E>) -> AppResult<R>
    where
        E: Into<AppError>,
    {
        if self.state == BufferState::Committing {
            return Err(AppError::commit_in_progress());
        }
        let mut next = self.working.clone();
        let out = f(&mut next).map_err(Into::into)?;
        self.working = next;
        self.state = if self.working == self.synced {
            BufferState::Clean
        } else {
            BufferState::Dirty
        };
        Ok(out)
    }

    /// Enter `Committing` and hand out `(synced, working)` to diff.
    ///
    /// `None` when there is nothing to commit.
    pub fn begin_commit(&mut self) -> AppResult<Option<(T, T)>> {
        match self.state {
            BufferState::Committing => Err(AppError::commit_in_progress()),
            BufferState::Clean => Ok(None),
            BufferState::Dirty => {
                self.state = BufferState::Committing;
                Ok(Some((self.synced.clone(), self.working.clone())))
            }
        }
    }

    /// Leave `Committing`: success promotes the working copy to synced, failure keeps it dirty
    pub fn finish_commit(&mut self, succeeded: bool) {
        if self.state != BufferState::Committing {
            return;
        }
        if succeeded {
            self.synced = self.working.clone();
            self.state = BufferState::Clean;
        } else {
            self.state = BufferState::Dirty;
        }
    }

    pub fn cancel(&mut self) -> AppResult<()> {
        if self.state == BufferState::Committing {
            return Err(AppError::commit_in_progress());
        }
        self.working = self.synced.clone();
        self.state = BufferState::Clean;
        Ok(())
    }
}

/// An in-flight commit on a mutex-held [`Staged`].
///
/// Dropping the guard without [`finish`](Self::finish) resolves the commit as failed,
/// leaving the buffer `Dirty` with its working copy.
pub struct CommitGuard<'a, T: Clone + PartialEq> {
    staged: &'a Mutex<Staged<T>>,
    finished: bool,
}

impl<'a, T: Clone + PartialEq> CommitGuard<'a, T> {
    /// Enter `Committing`. `None` when there is nothing to commit.
    pub fn begin(staged: &'a Mutex<Staged<T>>) -> AppResult<Option<(Self, T, T)>> {
        let Some((synced, working)) = staged.lock().begin_commit()? else {
            return Ok(None);
        };
        let guard = Self {
            staged,
            finished: false,
        };
        Ok(Some((guard, synced, working)))
    }

    pub fn finish(mut self, succeeded: bool) {
        self.finished = true;
        self.staged.lock().finish_commit(succeeded);
    }
}

impl<T: Clone + PartialEq> Drop for CommitGuard<'_, T> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!("Commit abandoned before the store answered, keeping local edits");
            self.staged.lock().finish_commit(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;

    fn push(v: i32) -> impl FnOnce(&mut Vec<i32>) -> Result<(), AppError> {
        move |list| {
            list.push(v);
            Ok(())
        }
    }

    #[test]
    fn test_edit_marks_dirty_and_back_to_clean() {
        let mut s = Staged::new(vec![1, 2]);
        s.edit(push(3)).unwrap();
        assert_eq!(s.state(), BufferState::Dirty);

        s.edit(|l: &mut Vec<i32>| -> Result<(), AppError> {
            l.pop();
            Ok(())
        })
        .unwrap();
        assert_eq!(s.state(), BufferState::Clean);
    }

    #[test]
    fn test_failed_edit_keeps_state() {
        let mut s = Staged::new(vec![1]);
        let err = s
            .edit(|l: &mut Vec<i32>| -> Result<(), AppError> {
                l.clear();
                Err(AppError::validation("nope"))
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(s.working(), &vec![1]);
        assert_eq!(s.state(), BufferState::Clean);
    }

    #[test]
    fn test_remote_update_while_dirty_keeps_working_copy() {
        let mut s = Staged::new(vec![1, 2]);
        s.edit(push(9)).unwrap();

        assert!(!s.on_remote_update(vec![5]));
        assert_eq!(s.synced(), &vec![5]);
        assert_eq!(s.working(), &vec![1, 2, 9]);
        assert_eq!(s.state(), BufferState::Dirty);
    }

    #[test]
    fn test_remote_update_while_clean_replaces_working_copy() {
        let mut s = Staged::new(vec![1, 2]);
        assert!(s.on_remote_update(vec![5]));
        assert_eq!(s.working(), &vec![5]);
    }

    #[test]
    fn test_commit_cycle() {
        let mut s = Staged::new(vec![1]);
        assert!(s.begin_commit().unwrap().is_none());

        s.edit(push(2)).unwrap();
        let (synced, working) = s.begin_commit().unwrap().unwrap();
        assert_eq!(synced, vec![1]);
        assert_eq!(working, vec![1, 2]);
        assert_eq!(s.state(), BufferState::Committing);

        // Everything but finishing is refused mid-commit
        assert_eq!(s.begin_commit().unwrap_err().code, ErrorCode::CommitInProgress);
        assert_eq!(s.edit(push(3)).unwrap_err().code, ErrorCode::CommitInProgress);
        assert_eq!(s.cancel().unwrap_err().code, ErrorCode::CommitInProgress);

        s.finish_commit(false);
        assert_eq!(s.state(), BufferState::Dirty);
        assert_eq!(s.working(), &vec![1, 2]);

        s.begin_commit().unwrap();
        s.finish_commit(true);
        assert_eq!(s.state(), BufferState::Clean);
        assert_eq!(s.synced(), &vec![1, 2]);
    }

    #[test]
    fn test_cancel_restores_snapshot() {
        let mut s = Staged::new(vec![1]);
        s.edit(push(2)).unwrap();
        s.cancel().unwrap();
        assert_eq!(s.working(), &vec![1]);
        assert_eq!(s.state(), BufferState::Clean);
    }

    #[test]
    fn test_commit_guard_finish() {
        let staged = Mutex::new(Staged::new(vec![1]));
        assert!(CommitGuard::begin(&staged).unwrap().is_none());

        staged.lock().edit(push(2)).unwrap();
        let (guard, _, working) = CommitGuard::begin(&staged).unwrap().unwrap();
        assert_eq!(working, vec![1, 2]);
        assert_eq!(staged.lock().state(), BufferState::Committing);

        guard.finish(true);
        assert_eq!(staged.lock().state(), BufferState::Clean);
        assert_eq!(staged.lock().synced(), &vec![1, 2]);
    }

    #[test]
    fn test_dropped_commit_guard_leaves_dirty() {
        let staged = Mutex::new(Staged::new(vec![1]));
        staged.lock().edit(push(2)).unwrap();

        let (guard, _, _) = CommitGuard::begin(&staged).unwrap().unwrap();
        drop(guard);

        assert_eq!(staged.lock().state(), BufferState::Dirty);
        assert_eq!(staged.lock().working(), &vec![1, 2]);
        staged.lock().cancel().unwrap();
        assert_eq!(staged.lock().state(), BufferState::Clean);
    }
}
