use drift_common::BeltDescriptor;
use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::asteroid::{AsteroidId, AsteroidInstance, MESH_VARIANT_COUNT};
use crate::config::FieldConfig;
use crate::grid::CellCoord;
use crate::lod::DetailTier;
use crate::seed::cell_seed;

/// Produces the asteroids of a single cell.
///
/// `generate` is a pure function of the cell, the field seed, the belt and
/// the generation knobs: every call with the same inputs returns the same
/// instances in the same order. Randomness comes only from a ChaCha stream
/// seeded per cell.
#[derive(Debug, Clone)]
pub struct CellGenerator {
    field_id: u32,
    seed: u64,
    cell_size: f64,
    size_range: [f64; 2],
    max_spin: f64,
    belt: BeltDescriptor,
}

impl CellGenerator {
    /// Build a generator from a validated configuration.
    pub fn new(config: &FieldConfig) -> Self {
        Self {
            field_id: config.field_id,
            seed: config.seed,
            cell_size: config.cell_size,
            size_range: config.size_range,
            max_spin: config.max_spin_deg_per_sec,
            belt: config.belt.clone(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn belt(&self) -> &BeltDescriptor {
        &self.belt
    }

    /// Generate every asteroid of `cell`.
    ///
    /// Cells that cannot overlap the belt return immediately. Otherwise the
    /// points are drawn in [`CellGenerator::sampling_box`] and those outside
    /// the belt are rejected. A cell that overlaps the belt may still yield
    /// nothing.
    pub fn generate(&self, cell: CellCoord) -> Vec<AsteroidInstance> {
        let Some((lo, hi)) = self.sampling_box(cell) else {
            return Vec::new();
        };
        let extent = hi - lo;

        let mut rng = ChaCha8Rng::seed_from_u64(cell_seed(self.seed, cell));
        let count = self.sample_count(&mut rng, extent.x * extent.y * extent.z);

        let resource = self.belt.resource();
        let [min_size, max_size] = self.size_range;
        let mut instances = Vec::new();
        for _ in 0..count {
            let position = DVec3::new(
                uniform(&mut rng, lo.x, hi.x),
                uniform(&mut rng, lo.y, hi.y),
                uniform(&mut rng, lo.z, hi.z),
            );
            if !self.belt.contains(position) {
                continue;
            }

            let size = uniform(&mut rng, min_size, max_size);
            let rotation = DVec3::new(
                uniform(&mut rng, -180.0, 180.0),
                uniform(&mut rng, -180.0, 180.0),
                uniform(&mut rng, -180.0, 180.0),
            );
            let spin = DVec3::new(
                uniform(&mut rng, -self.max_spin, self.max_spin),
                uniform(&mut rng, -self.max_spin, self.max_spin),
                uniform(&mut rng, -self.max_spin, self.max_spin),
            );
            let mesh_variant = rng.random_range(0..MESH_VARIANT_COUNT);

            instances.push(AsteroidInstance {
                id: AsteroidId::new(self.field_id, cell, instances.len() as u32),
                position,
                rotation,
                spin,
                size,
                resource,
                mesh_variant,
                tier: DetailTier::default(),
                visible: false,
                detailed: false,
            });
        }
        instances
    }

    /// The cell clipped to the belt's bounding box, or `None` when the cell
    /// cannot overlap the belt.
    ///
    /// Points of the cube outside this box are always rejected, so sampling
    /// here with a count scaled to its volume gives the same distribution and
    /// expected count as sampling the whole cube.
    pub fn sampling_box(&self, cell: CellCoord) -> Option<(DVec3, DVec3)> {
        let (cell_min, cell_max) = cell.bounds(self.cell_size);
        if !self.belt.overlaps_box(cell_min, cell_max) {
            return None;
        }
        let (belt_min, belt_max) = self.belt.bounds();
        let lo = cell_min.max(belt_min);
        Some((lo, cell_max.min(belt_max).max(lo)))
    }

    /// Number of candidate points to draw for a sampling box of `volume`.
    ///
    /// The expected count `volume * density` is truncated, then offset by a
    /// uniform integer in `[-count / 4, count / 4]`. Integer division means
    /// counts of 3 or less get no variation.
    fn sample_count(&self, rng: &mut ChaCha8Rng, volume: f64) -> usize {
        let expected = volume * self.belt.density();
        let base = if expected.is_finite() {
            expected.floor() as i64
        } else {
            0
        };
        let variation = base / 4;
        let offset = if variation > 0 {
            rng.random_range(-variation..=variation)
        } else {
            0
        };
        (base + offset).max(0) as usize
    }
}

/// Uniform draw from `[lo, hi)`. A degenerate range returns `lo` without
/// drawing.
///
/// `lo + r * (hi - lo)` can round up to `hi`; such draws are redrawn so a
/// position clipped at a cell's upper face stays inside the cell.
fn uniform(rng: &mut ChaCha8Rng, lo: f64, hi: f64) -> f64 {
    if lo >= hi {
        return lo;
    }
    loop {
        let v = lo + rng.random::<f64>() * (hi - lo);
        if v < hi {
            return v;
        }
    }
}
