use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::asteroid::AsteroidInstance;
use crate::generator::CellGenerator;

/// A 3D cell coordinate in the field grid.
///
/// Cell `c` spans `[c * cell_size, (c + 1) * cell_size)` on each axis.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CellCoord {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Cell containing a world position.
    pub fn containing(pos: DVec3, cell_size: f64) -> Self {
        let c = (pos / cell_size).floor();
        Self::new(c.x as i32, c.y as i32, c.z as i32)
    }

    /// World-space minimum corner.
    pub fn origin(self, cell_size: f64) -> DVec3 {
        DVec3::new(self.x as f64, self.y as f64, self.z as f64) * cell_size
    }

    /// World-space center.
    pub fn center(self, cell_size: f64) -> DVec3 {
        self.origin(cell_size) + DVec3::splat(0.5 * cell_size)
    }

    /// World-space `(min, max)` corners of the cube.
    pub fn bounds(self, cell_size: f64) -> (DVec3, DVec3) {
        let min = self.origin(cell_size);
        (min, min + DVec3::splat(cell_size))
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}_{}", self.x, self.y, self.z)
    }
}

/// Sparse cache of generated cells.
///
/// A cell is either absent (never touched, or evicted) or fully generated;
/// a cached list is never regenerated or mutated structurally until the cell
/// is evicted. Cells that overlap no part of the belt are cached as empty
/// lists so they are not visited again.
#[derive(Debug, Clone)]
pub struct CellIndex {
    cell_size: f64,
    cells: HashMap<CellCoord, Vec<AsteroidInstance>>,
    cells_generated: u64,
    cells_evicted: u64,
}

impl CellIndex {
    /// Create an empty index with the given cell size.
    pub fn new(cell_size: f64) -> Self {
        assert!(cell_size > 0.0, "cell_size must be positive");
        Self {
            cell_size,
            cells: HashMap::new(),
            cells_generated: 0,
            cells_evicted: 0,
        }
    }

    /// Cell size used for this index.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Convert a world position to a cell coordinate.
    pub fn position_to_cell(&self, pos: DVec3) -> CellCoord {
        CellCoord::containing(pos, self.cell_size)
    }

    /// Every cell whose cube could meet the sphere of `radius` around `point`.
    ///
    /// Over-approximates: the sphere's bounding box is floored onto the grid,
    /// so corner cells may lie entirely outside the sphere. Callers filter by
    /// exact distance. Cells are returned in ascending `(x, y, z)` order.
    pub fn cells_in_range(&self, point: DVec3, radius: f64) -> Vec<CellCoord> {
        let r = DVec3::splat(radius.max(0.0));
        self.cells_in_box(point - r, point + r)
    }

    /// Every cell meeting the box `[min, max]`, in ascending `(x, y, z)` order.
    pub fn cells_in_box(&self, min: DVec3, max: DVec3) -> Vec<CellCoord> {
        let min = self.position_to_cell(min);
        let max = self.position_to_cell(max);

        let mut result = Vec::new();
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    result.push(CellCoord::new(x, y, z));
                }
            }
        }
        result
    }

    /// Return the cached instances of `coord`, generating them on a miss.
    ///
    /// Generation runs at most once per cell for as long as the cell stays
    /// cached.
    pub fn get_or_generate(
        &mut self,
        coord: CellCoord,
        generator: &CellGenerator,
    ) -> &[AsteroidInstance] {
        let instances = match self.cells.entry(coord) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let instances = generator.generate(coord);
                tracing::debug!(cell = %coord, count = instances.len(), "generated cell");
                self.cells_generated += 1;
                entry.insert(instances)
            }
        };
        instances.as_slice()
    }

    /// Cached instances of a cell, without generating.
    pub fn cell(&self, coord: CellCoord) -> Option<&[AsteroidInstance]> {
        self.cells.get(&coord).map(Vec::as_slice)
    }

    pub(crate) fn cell_mut(&mut self, coord: CellCoord) -> Option<&mut [AsteroidInstance]> {
        self.cells.get_mut(&coord).map(Vec::as_mut_slice)
    }

    /// Check if a cell is currently cached.
    pub fn is_cached(&self, coord: CellCoord) -> bool {
        self.cells.contains_key(&coord)
    }

    /// Remove every cached cell whose center is farther than `keep_radius`
    /// from `reference`. Returns the evicted coordinates in ascending order.
    pub fn evict(&mut self, reference: DVec3, keep_radius: f64) -> Vec<CellCoord> {
        let cell_size = self.cell_size;
        let mut evicted = Vec::new();
        self.cells.retain(|coord, instances| {
            let keep = coord.center(cell_size).distance(reference) <= keep_radius;
            if !keep {
                tracing::debug!(cell = %coord, count = instances.len(), "evicting cell");
                evicted.push(*coord);
            }
            keep
        });
        evicted.sort_unstable();
        self.cells_evicted += evicted.len() as u64;
        evicted
    }

    /// Cached cell coordinates in ascending order.
    pub fn cached_cells(&self) -> Vec<CellCoord> {
        let mut coords: Vec<CellCoord> = self.cells.keys().copied().collect();
        coords.sort_unstable();
        coords
    }

    /// Number of cached cells, including empty ones.
    pub fn cached_cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Total number of instances across all cached cells.
    pub fn total_instances(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    /// Number of generator runs over the lifetime of the index.
    pub fn cells_generated(&self) -> u64 {
        self.cells_generated
    }

    /// Number of cells removed by eviction over the lifetime of the index.
    pub fn cells_evicted(&self) -> u64 {
        self.cells_evicted
    }

    pub fn instances(&self) -> impl Iterator<Item = &AsteroidInstance> {
        self.cells.values().flatten()
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut [AsteroidInstance]> {
        self.cells.values_mut().map(Vec::as_mut_slice)
    }
}
