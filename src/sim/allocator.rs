//! Random non-overlapping spawn cells
//!
//! An occupancy grid over a spawn band (full width, top rows of the
//! playfield). `init_batch` snapshots the free cells; `next_free` then hands
//! them out in random order without repeats.

use glam::IVec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::{Entity, EntityKind};
use crate::cell_of;

#[derive(Debug, Clone)]
pub struct PositionAllocator {
    cols: usize,
    rows: usize,
    occupied: Vec<bool>,
    /// Cell indices still available in the current batch
    free: Vec<usize>,
}

impl PositionAllocator {
    pub fn new(cols: i32, rows: i32) -> Self {
        let cols = cols.max(0) as usize;
        let rows = rows.max(0) as usize;
        Self {
            cols,
            rows,
            occupied: vec![false; cols * rows],
            free: Vec::new(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn clear(&mut self) {
        self.occupied.fill(false);
        self.free.clear();
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        if cell.x < 0 || cell.y < 0 {
            return None;
        }
        let (x, y) = (cell.x as usize, cell.y as usize);
        if x >= self.cols || y >= self.rows {
            return None;
        }
        Some(y * self.cols + x)
    }

    /// Mark a cell occupied; false when it lies outside the band
    pub fn mark(&mut self, cell: IVec2) -> bool {
        match self.index(cell) {
            Some(i) => {
                self.occupied[i] = true;
                true
            }
            None => false,
        }
    }

    pub fn is_occupied(&self, cell: IVec2) -> bool {
        self.index(cell).is_some_and(|i| self.occupied[i])
    }

    /// Rebuild occupancy from the live entities of one kind
    pub fn fill_from_world(&mut self, entities: &[Entity], kind: EntityKind) {
        self.clear();
        for entity in entities.iter().filter(|e| e.active && e.kind == kind) {
            self.mark(cell_of(entity.pos));
        }
    }

    /// Snapshot the currently free cells as the pool for the next batch
    pub fn init_batch(&mut self) {
        self.free.clear();
        self.free.extend(
            self.occupied
                .iter()
                .enumerate()
                .filter(|(_, taken)| !**taken)
                .map(|(i, _)| i),
        );
    }

    /// Cells left in the current batch
    pub fn remaining(&self) -> usize {
        self.free.len()
    }

    /// Uniformly random cell from the batch, or `None` when exhausted
    pub fn next_free(&mut self, rng: &mut Pcg32) -> Option<IVec2> {
        if self.free.is_empty() {
            return None;
        }
        let pick = rng.random_range(0..self.free.len());
        let cell = self.free.swap_remove(pick);
        self.occupied[cell] = true;
        Some(IVec2::new((cell % self.cols) as i32, (cell / self.cols) as i32))
    }
}
