//! Sparse spatial hash over body bounds

use crate::error::{PerceptionError, Result};
use std::collections::HashMap;
use swarm_math::{Vec3, AABB};

type CellCoord = (i32, i32, i32);

/// Cell size used when none (or an invalid one) is given
pub const DEFAULT_CELL_SIZE: f32 = 2.0;

/// Above this many cells a query scans every slot instead of walking cells
const MAX_CELLS_PER_QUERY: usize = 4096;

/// Sparse hash grid mapping cells to body slots
#[derive(Debug, Clone)]
pub struct SpatialHashGrid {
    cell_size: f32,
    cells: HashMap<CellCoord, Vec<usize>>,
}

/// Outcome of a cell walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridQuery {
    /// Candidate slots, sorted and deduplicated
    Candidates(Vec<usize>),
    /// The region is too large (or unbounded) to walk; check every slot
    Everything,
}

impl SpatialHashGrid {
    pub fn new(cell_size: f32) -> Result<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(PerceptionError::InvalidCellSize(cell_size));
        }
        Ok(Self {
            cell_size,
            cells: HashMap::new(),
        })
    }

    /// Grid with [`DEFAULT_CELL_SIZE`]
    pub fn with_default_cell_size() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            cells: HashMap::new(),
        }
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    fn cell_coord(&self, pos: Vec3) -> CellCoord {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
            (pos.z / self.cell_size).floor() as i32,
        )
    }

    /// Cell range covered by `aabb`, or `None` when it is too large to walk
    fn cell_range(&self, aabb: &AABB) -> Option<(CellCoord, CellCoord)> {
        if !(aabb.min.is_finite() && aabb.max.is_finite()) {
            return None;
        }
        let lo = self.cell_coord(aabb.min);
        let hi = self.cell_coord(aabb.max);
        let span = |a: i32, b: i32| (i64::from(b) - i64::from(a) + 1).max(0) as u64;
        let count = span(lo.0, hi.0)
            .saturating_mul(span(lo.1, hi.1))
            .saturating_mul(span(lo.2, hi.2));
        if count > MAX_CELLS_PER_QUERY as u64 {
            return None;
        }
        Some((lo, hi))
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Register `slot` in every cell its bounds touch.
    /// Returns false if the bounds were too large and the slot went nowhere.
    pub fn insert_aabb(&mut self, slot: usize, aabb: &AABB) -> bool {
        let Some((lo, hi)) = self.cell_range(aabb) else {
            return false;
        };
        for x in lo.0..=hi.0 {
            for y in lo.1..=hi.1 {
                for z in lo.2..=hi.2 {
                    self.cells.entry((x, y, z)).or_default().push(slot);
                }
            }
        }
        true
    }

    /// Slots registered in any cell touched by `aabb`
    pub fn query_aabb(&self, aabb: &AABB) -> GridQuery {
        let Some((lo, hi)) = self.cell_range(aabb) else {
            return GridQuery::Everything;
        };
        let mut slots = Vec::new();
        for x in lo.0..=hi.0 {
            for y in lo.1..=hi.1 {
                for z in lo.2..=hi.2 {
                    if let Some(cell) = self.cells.get(&(x, y, z)) {
                        slots.extend_from_slice(cell);
                    }
                }
            }
        }
        slots.sort_unstable();
        slots.dedup();
        GridQuery::Candidates(slots)
    }

    /// Rebuild from slot bounds
    pub fn rebuild(&mut self, bounds: impl Iterator<Item = (usize, AABB)>) -> Vec<usize> {
        self.clear();
        let mut oversized = Vec::new();
        for (slot, aabb) in bounds {
            if !self.insert_aabb(slot, &aabb) {
                oversized.push(slot);
            }
        }
        oversized
    }
}
