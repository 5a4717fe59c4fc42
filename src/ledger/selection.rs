//! Tracks which row of the filtered view is selected.
//!
//! The index refers to the current filtered view, which is recomputed from the store after every
//! change. Indices are therefore not stable across deletions and the owner must call
//! `Selection::reclamp` whenever the view may have changed length.

use serde::{Deserialize, Serialize};

/// The direction of a selection move.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

serde_plain::derive_display_from_serialize!(Direction);
serde_plain::derive_fromstr_from_deserialize!(Direction);

impl Direction {
    fn step(self) -> isize {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
        }
    }
}

/// A selected index into the filtered view, or nothing.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct Selection {
    index: Option<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// The index with `-1` standing for "no selection".
    pub fn raw_index(&self) -> isize {
        self.index.map(|ix| ix as isize).unwrap_or(-1)
    }

    /// Moves the selection one row in `direction` within a view of `len` rows. The result is
    /// clamped to the view; a first move lands on the top row whichever way it goes.
    pub fn move_by(&mut self, direction: Direction, len: usize) {
        if len == 0 {
            return;
        }
        let last = (len - 1) as isize;
        let target = self.raw_index() + direction.step();
        self.index = Some(target.clamp(0, last) as usize);
    }

    /// The entry at the selected index of `view`, if any.
    pub fn resolve<'v, T>(&self, view: &'v [T]) -> Option<&'v T> {
        view.get(self.index?)
    }

    /// True when the selection resolves to an entry in `view`.
    pub fn is_selected<T>(&self, view: &[T]) -> bool {
        self.resolve(view).is_some()
    }

    /// Pulls the index back into a view of `len` rows, clearing it when the view is empty.
    pub fn reclamp(&mut self, len: usize) {
        self.index = match self.index {
            _ if len == 0 => None,
            Some(ix) if ix >= len => Some(len - 1),
            other => other,
        };
    }

    pub fn select(&mut self, index: usize, len: usize) {
        self.index = Some(index);
        self.reclamp(len);
    }

    pub fn clear(&mut self) {
        self.index = None;
    }
}
