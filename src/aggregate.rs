// --- File: aggregate.rs ---
use crate::particle::Particle;
use crate::spatial::{CellEncoding, CellKey, SpatialIndex};

/// Append-only set of frozen particles, mirrored cell-by-cell into a `SpatialIndex`.
///
/// Members and index only change together through [`Aggregate::freeze`], so every
/// member's cell is registered with a count of at least one.
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    members: Vec<Particle>,
    index: SpatialIndex,
}

impl Aggregate {
    /// Empty aggregate whose index covers the grid of `encoding`.
    pub fn new(encoding: &CellEncoding, capacity: usize) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
            index: SpatialIndex::for_encoding(encoding),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Particle] {
        &self.members
    }

    #[inline]
    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Appends `particle` and registers it at `key`, its own cell.
    pub fn freeze(&mut self, particle: Particle, key: CellKey) {
        self.members.push(particle);
        self.index.increment(key);
    }

    /// Runs the 9-cell kernel around `walker` and returns the first occupied cell.
    /// Read-only: repeated calls with an unchanged aggregate give the same answer.
    #[inline]
    pub fn adjacent_cell(&self, encoding: &CellEncoding, walker: &Particle) -> Option<CellKey> {
        self.index
            .first_hit(&encoding.neighborhood(walker.x, walker.y))
    }
}

// --- End of File: aggregate.rs ---
