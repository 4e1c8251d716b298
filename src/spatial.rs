//! Occupancy map for the frozen aggregate, keyed by the linear cell encoding `x + y * W`.

use crate::constants::DENSE_INDEX_MAX_CELLS;
use crate::error::ConfigError;
use std::collections::HashMap;

pub type CellKey = i32;

/// Cells examined by the adjacency test: the cell itself plus its eight neighbours.
pub const NEIGHBORHOOD_SIZE: usize = 9;

// (dx, dy) in evaluation order: p, p+1, p-1, p-W, p-W-1, p-W+1, p+W, p+W-1, p+W+1
const NEIGHBOR_DELTAS: [(i32, i32); NEIGHBORHOOD_SIZE] = [
    (0, 0),
    (1, 0),
    (-1, 0),
    (0, -1),
    (-1, -1),
    (1, -1),
    (0, 1),
    (-1, 1),
    (1, 1),
];

/// How the 9-cell kernel treats the left and right edges of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NeighborhoodMode {
    /// Offsets are applied to the linear key, so `p - 1` at `x = 0` lands on column
    /// `W - 1` of the previous row. Walkers off the left/right edge alias the same way.
    #[default]
    Linear,
    /// Neighbours are formed in 2D and dropped when their column leaves `[0, W)`.
    /// A walker whose own column is outside the grid never tests positive.
    Planar,
}

/// Maps grid coordinates to cell keys and builds the adjacency kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellEncoding {
    width: i32,
    height: i32,
    mode: NeighborhoodMode,
}

impl CellEncoding {
    /// Fails if some in-grid cell, or a neighbour of one, has no representable key.
    pub fn new(width: u32, height: u32, mode: NeighborhoodMode) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyGrid { width, height });
        }
        // The largest key the kernel forms for an in-grid cell is (W*H - 1) + W + 1.
        let max_key = u64::from(width) * (u64::from(height) + 1);
        if max_key > CellKey::MAX as u64 {
            return Err(ConfigError::KeyOverflow {
                width,
                height,
                bits: CellKey::BITS,
            });
        }
        Ok(Self {
            width: width as CellKey,
            height: height as CellKey,
            mode,
        })
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn mode(&self) -> NeighborhoodMode {
        self.mode
    }

    /// In-grid cells, `W * H`.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Key of the cell at `(x, y)`, or `None` when the encoding cannot represent it
    /// (arithmetic overflow for far-away walkers, or an off-grid column in planar mode).
    #[inline]
    pub fn key(&self, x: i32, y: i32) -> Option<CellKey> {
        if self.mode == NeighborhoodMode::Planar && !(0..self.width).contains(&x) {
            return None;
        }
        y.checked_mul(self.width)?.checked_add(x)
    }

    /// The nine keys tested for adjacency, in fixed evaluation order.
    pub fn neighborhood(&self, x: i32, y: i32) -> [Option<CellKey>; NEIGHBORHOOD_SIZE] {
        let mut keys = [None; NEIGHBORHOOD_SIZE];
        match self.mode {
            NeighborhoodMode::Linear => {
                let Some(p) = self.key(x, y) else {
                    return keys;
                };
                for (slot, (dx, dy)) in keys.iter_mut().zip(NEIGHBOR_DELTAS) {
                    *slot = p.checked_add(dx + dy * self.width);
                }
            }
            NeighborhoodMode::Planar => {
                if self.key(x, y).is_none() {
                    return keys;
                }
                for (slot, (dx, dy)) in keys.iter_mut().zip(NEIGHBOR_DELTAS) {
                    *slot = match (x.checked_add(dx), y.checked_add(dy)) {
                        (Some(nx), Some(ny)) => self.key(nx, ny),
                        _ => None,
                    };
                }
            }
        }
        keys
    }
}

/// Occupancy counts per cell. Absent keys count as zero; counts only ever grow.
///
/// In-grid keys `[0, W*H)` live in a flat table indexed by key. Keys outside it (walkers
/// that froze off the grid) fall back to a map.
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    dense: Vec<u32>,
    sparse: HashMap<CellKey, u32>,
    occupied: usize,
    total: u64,
}

impl SpatialIndex {
    /// A flat table covering every in-grid cell of `encoding`. Grids larger than
    /// `DENSE_INDEX_MAX_CELLS` keep all counts in the map.
    pub fn for_encoding(encoding: &CellEncoding) -> Self {
        let cells = encoding.cell_count();
        let dense = if cells <= DENSE_INDEX_MAX_CELLS {
            vec![0; cells]
        } else {
            log::warn!(
                "{} cells exceed the flat index limit of {}; using a hash map",
                cells,
                DENSE_INDEX_MAX_CELLS
            );
            Vec::new()
        };
        Self {
            dense,
            ..Self::default()
        }
    }

    #[inline]
    fn slot(&self, key: CellKey) -> Option<usize> {
        usize::try_from(key).ok().filter(|&slot| slot < self.dense.len())
    }

    #[inline]
    pub fn is_occupied(&self, key: CellKey) -> bool {
        self.count(key) > 0
    }

    #[inline]
    pub fn count(&self, key: CellKey) -> u32 {
        match self.slot(key) {
            Some(slot) => self.dense[slot],
            None => self.sparse.get(&key).copied().unwrap_or(0),
        }
    }

    #[inline]
    pub fn increment(&mut self, key: CellKey) {
        let count = match self.slot(key) {
            Some(slot) => &mut self.dense[slot],
            None => self.sparse.entry(key).or_insert(0),
        };
        if *count == 0 {
            self.occupied += 1;
        }
        *count += 1;
        self.total += 1;
    }

    /// First occupied key of a neighbourhood, scanning in kernel order.
    #[inline]
    pub fn first_hit(&self, neighborhood: &[Option<CellKey>]) -> Option<CellKey> {
        neighborhood
            .iter()
            .flatten()
            .copied()
            .find(|&key| self.is_occupied(key))
    }

    /// Number of distinct occupied cells.
    pub fn occupied_cells(&self) -> usize {
        self.occupied
    }

    /// Sum of all counts; equals the number of registrations.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Occupied cells with their counts: in-grid cells in key order, then the rest.
    pub fn iter(&self) -> impl Iterator<Item = (CellKey, u32)> + '_ {
        self.dense
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(slot, &count)| (slot as CellKey, count))
            .chain(self.sparse.iter().map(|(&key, &count)| (key, count)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear(width: u32, height: u32) -> CellEncoding {
        CellEncoding::new(width, height, NeighborhoodMode::Linear).unwrap()
    }

    #[test]
    fn increment_counts_repeat_registrations() {
        let mut index = SpatialIndex::default();
        assert!(!index.is_occupied(42));
        index.increment(42);
        index.increment(42);
        assert!(index.is_occupied(42));
        assert_eq!(index.count(42), 2);
        assert_eq!(index.occupied_cells(), 1);
        assert_eq!(index.total(), 2);
        assert_eq!(index.count(41), 0);
    }

    #[test]
    fn linear_neighborhood_follows_kernel_order() {
        let encoding = linear(10, 10);
        let p = 5 + 5 * 10;
        let keys: Vec<CellKey> = encoding.neighborhood(5, 5).iter().flatten().copied().collect();
        assert_eq!(
            keys,
            vec![p, p + 1, p - 1, p - 10, p - 11, p - 9, p + 10, p + 9, p + 11]
        );
    }

    #[test]
    fn linear_neighborhood_wraps_row_edges() {
        let encoding = linear(10, 10);
        // x = 0: the left neighbour p - 1 is the last column of the previous row.
        let keys = encoding.neighborhood(0, 3);
        assert_eq!(keys[2], Some(29));
        assert_eq!(encoding.key(9, 2), Some(29));
    }

    #[test]
    fn planar_neighborhood_drops_off_grid_columns() {
        let encoding = CellEncoding::new(10, 10, NeighborhoodMode::Planar).unwrap();
        let keys = encoding.neighborhood(0, 3);
        assert_eq!(keys[0], Some(30));
        assert_eq!(keys[1], Some(31));
        assert_eq!(keys[2], None);
        assert_eq!(keys[4], None);
        assert_eq!(keys[7], None);
        assert_eq!(encoding.key(-1, 3), None);
        assert!(encoding.neighborhood(-1, 3).iter().all(Option::is_none));
    }

    #[test]
    fn far_walkers_have_no_key_instead_of_wrapping() {
        let encoding = linear(800, 800);
        assert_eq!(encoding.key(0, i32::MAX / 2), None);
        assert!(encoding.neighborhood(0, i32::MAX / 2).iter().all(Option::is_none));
    }

    #[test]
    fn first_hit_stops_at_earliest_occupied_cell() {
        let encoding = linear(10, 10);
        let mut index = SpatialIndex::default();
        index.increment(encoding.key(6, 5).unwrap());
        index.increment(encoding.key(5, 6).unwrap());
        let hit = index.first_hit(&encoding.neighborhood(5, 5));
        assert_eq!(hit, encoding.key(6, 5));
    }

    #[test]
    fn flat_and_spilled_keys_count_alike() {
        let encoding = linear(10, 10);
        assert_eq!(encoding.cell_count(), 100);
        let mut index = SpatialIndex::for_encoding(&encoding);
        // In the table, just past its end, and off the top of the grid.
        for key in [0, 99, 99, 100, -1, -1, -1] {
            index.increment(key);
        }
        assert_eq!(index.count(99), 2);
        assert_eq!(index.count(100), 1);
        assert_eq!(index.count(-1), 3);
        assert!(!index.is_occupied(50));
        assert_eq!(index.occupied_cells(), 4);
        assert_eq!(index.total(), 7);

        let mut cells: Vec<(CellKey, u32)> = index.iter().collect();
        cells.sort_unstable();
        assert_eq!(cells, vec![(-1, 3), (0, 1), (99, 2), (100, 1)]);
    }

    #[test]
    fn encoding_reports_its_geometry() {
        let encoding = CellEncoding::new(30, 20, NeighborhoodMode::Planar).unwrap();
        assert_eq!((encoding.width(), encoding.height()), (30, 20));
        assert_eq!(encoding.mode(), NeighborhoodMode::Planar);
        assert_eq!(encoding.cell_count(), 600);
    }

    #[test]
    fn encoding_rejects_overflowing_grid() {
        assert!(CellEncoding::new(1 << 16, 1 << 16, NeighborhoodMode::Linear).is_err());
        assert!(CellEncoding::new(0, 10, NeighborhoodMode::Linear).is_err());
    }
}
