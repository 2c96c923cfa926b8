//! Write-once cache cells
//!
//! A [`Memo`] holds a value derived from immutable state. The first reader
//! runs the compute function; every later reader gets the same cached
//! value. Publication goes through [`OnceLock`], so a reader never sees a
//! partially written value and concurrent first readers wait for a single
//! computation instead of racing.

use std::fmt;
use std::sync::OnceLock;

/// Lazily computed, cached value
pub struct Memo<T> {
    cell: OnceLock<T>,
}

impl<T> Memo<T> {
    /// Create an empty cell
    pub const fn new() -> Self {
        Memo {
            cell: OnceLock::new(),
        }
    }

    /// Return the cached value, running `compute` if the cell is empty.
    ///
    /// `compute` must not read this same cell.
    pub fn get_or_compute<F>(&self, compute: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.cell.get_or_init(compute)
    }

    /// Return the cached value without computing it
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// Whether the value has been computed
    pub fn is_computed(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Memo<T> {
    fn clone(&self) -> Self {
        Memo {
            cell: self.cell.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(value) => f.debug_tuple("Memo").field(value).finish(),
            None => f.write_str("Memo(<pending>)"),
        }
    }
}
