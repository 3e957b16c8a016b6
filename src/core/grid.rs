//! # Binary Grid
//!
//! Boolean sampling of the working image on a `step`-spaced lattice, `(P + 1) x (Q + 1)`
//! cells.
//!
//! The row index is sized by the orchestrator before any worker exists; the storage of each
//! row is allocated later by the worker that owns it. Cells are atomics so that rows written
//! by one worker can be read by its neighbours after the next rendezvous without any lock.
//! The rendezvous supplies the ordering, so all cell accesses are `Relaxed`.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{ContourError, ContourResult, try_alloc};

/// `rows x cols` grid of bits with per-row deferred allocation.
#[derive(Debug)]
pub struct BinaryGrid {
    rows: Vec<OnceLock<Box<[AtomicBool]>>>,
    cols: usize,
}

impl BinaryGrid {
    /// Size the row index for `rows x cols` cells. No row storage is allocated yet.
    pub fn with_dims(rows: usize, cols: usize) -> ContourResult<Self> {
        let mut index = try_alloc("grid row index", rows)?;
        index.resize_with(rows, OnceLock::new);
        Ok(Self { rows: index, cols })
    }

    /// Number of rows, `P + 1`.
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns, `Q + 1`.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Allocate storage for row `i`, all cells cleared.
    ///
    /// Each row may be allocated once.
    pub fn allocate_row(&self, i: usize) -> ContourResult<()> {
        let slot = self.rows.get(i).ok_or_else(|| {
            ContourError::state("allocate", format!("grid row {} out of {}", i, self.rows.len()))
        })?;
        let mut cells = try_alloc("grid row", self.cols)?;
        cells.resize_with(self.cols, || AtomicBool::new(false));
        slot.set(cells.into_boxed_slice()).map_err(|_| {
            ContourError::state("allocate", format!("grid row {} allocated twice", i))
        })
    }

    /// Allocated storage of row `i`.
    pub fn row(&self, i: usize) -> ContourResult<&[AtomicBool]> {
        self.rows
            .get(i)
            .and_then(OnceLock::get)
            .map(|row| &row[..])
            .ok_or_else(|| ContourError::state("sample", format!("grid row {} not allocated", i)))
    }

    pub fn is_row_allocated(&self, i: usize) -> bool {
        self.rows.get(i).is_some_and(|row| row.get().is_some())
    }

    #[inline]
    pub fn set(&self, i: usize, j: usize, inside: bool) -> ContourResult<()> {
        store(self.row(i)?, j, inside);
        Ok(())
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> ContourResult<bool> {
        Ok(load(self.row(i)?, j))
    }

    /// Copy the grid into plain rows of `u8` (0 or 1).
    pub fn snapshot(&self) -> ContourResult<Vec<Vec<u8>>> {
        (0..self.rows())
            .map(|i| Ok(self.row(i)?.iter().map(|c| c.load(Ordering::Relaxed) as u8).collect()))
            .collect()
    }
}

#[inline]
pub(crate) fn store(row: &[AtomicBool], j: usize, inside: bool) {
    row[j].store(inside, Ordering::Relaxed);
}

#[inline]
pub(crate) fn load(row: &[AtomicBool], j: usize) -> bool {
    row[j].load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_start_unallocated() {
        let grid = BinaryGrid::with_dims(3, 4).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (3, 4));
        assert!(!grid.is_row_allocated(0));
        assert!(grid.row(0).is_err());
        assert!(grid.get(2, 0).is_err());
    }

    #[test]
    fn test_allocate_then_write() {
        let grid = BinaryGrid::with_dims(2, 3).unwrap();
        grid.allocate_row(0).unwrap();
        grid.allocate_row(1).unwrap();
        grid.set(1, 2, true).unwrap();

        assert!(grid.get(1, 2).unwrap());
        assert!(!grid.get(0, 0).unwrap());
        assert_eq!(grid.snapshot().unwrap(), vec![vec![0, 0, 0], vec![0, 0, 1]]);
    }

    #[test]
    fn test_double_allocation_is_an_error() {
        let grid = BinaryGrid::with_dims(1, 1).unwrap();
        grid.allocate_row(0).unwrap();
        let err = grid.allocate_row(0).unwrap_err();
        assert_eq!(err.category(), "state");
        assert!(grid.allocate_row(5).is_err());
    }

    #[test]
    fn test_rows_allocated_from_threads() {
        let grid = BinaryGrid::with_dims(8, 5).unwrap();
        std::thread::scope(|s| {
            for worker in 0..4 {
                let grid = &grid;
                s.spawn(move || {
                    for i in worker * 2..worker * 2 + 2 {
                        grid.allocate_row(i).unwrap();
                        grid.set(i, i % 5, true).unwrap();
                    }
                });
            }
        });
        for i in 0..8 {
            assert!(grid.get(i, i % 5).unwrap());
        }
    }
}
