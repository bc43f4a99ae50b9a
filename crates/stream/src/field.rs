use drift_common::{BeltDescriptor, ResourceKind};
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::asteroid::{AsteroidId, AsteroidInstance};
use crate::config::{ConfigError, FieldConfig};
use crate::generator::CellGenerator;
use crate::grid::{CellCoord, CellIndex};
use crate::lod::{self, DetailTier};

/// Aggregate field statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    /// Generator runs over the field's lifetime, counting regenerations.
    pub cells_generated: u64,
    pub cells_evicted: u64,
    pub cached_cells: usize,
    pub total_instances: usize,
    pub visible_instances: usize,
    /// Visible instances per tier, indexed in `DetailTier::ALL` order.
    pub visible_by_tier: [usize; 4],
    /// Approximate belt volume.
    pub approximate_volume: f64,
}

/// A sparse, lazily generated asteroid field over one belt.
///
/// Single-writer: every operation that may generate or evict takes `&mut self`.
/// Wrap in [`crate::SharedField`] to use it from several threads.
#[derive(Debug, Clone)]
pub struct AsteroidField {
    config: FieldConfig,
    generator: CellGenerator,
    index: CellIndex,
}

impl AsteroidField {
    pub fn new(config: FieldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let generator = CellGenerator::new(&config);
        let index = CellIndex::new(config.cell_size);
        tracing::info!(
            field_id = config.field_id,
            seed = config.seed,
            cell_size = config.cell_size,
            resource = %config.belt.resource(),
            "asteroid field created"
        );
        Ok(Self {
            config,
            generator,
            index,
        })
    }

    /// Field with default knobs over `belt`.
    pub fn with_belt(belt: BeltDescriptor, seed: u64) -> Result<Self, ConfigError> {
        Self::new(FieldConfig {
            seed,
            ..FieldConfig::new(belt)
        })
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn belt(&self) -> &BeltDescriptor {
        &self.config.belt
    }

    pub fn resource(&self) -> ResourceKind {
        self.config.belt.resource()
    }

    pub fn index(&self) -> &CellIndex {
        &self.index
    }

    /// All asteroids within `radius` of `position`, generating missing cells.
    ///
    /// Results are copies in cell order, then generation order within a cell.
    /// A non-positive or non-finite radius yields nothing. Only cells inside
    /// the belt's bounding box are visited, since no others hold asteroids.
    pub fn query_region(&mut self, position: DVec3, radius: f64) -> Vec<AsteroidInstance> {
        let _span = tracing::info_span!("query_region", radius).entered();
        if !(radius.is_finite() && radius > 0.0 && position.is_finite()) {
            return Vec::new();
        }

        let (belt_min, belt_max) = self.config.belt.bounds();
        let r = DVec3::splat(radius);
        let lo = (position - r).max(belt_min);
        let hi = (position + r).min(belt_max);
        if lo.cmpgt(hi).any() {
            return Vec::new();
        }

        let cells = self.index.cells_in_box(lo, hi);
        let mut result = Vec::new();
        for coord in &cells {
            let instances = self.index.get_or_generate(*coord, &self.generator);
            result.extend(
                instances
                    .iter()
                    .filter(|a| a.position.distance(position) <= radius)
                    .cloned(),
            );
        }

        tracing::trace!(
            cells = cells.len(),
            found = result.len(),
            "region query complete"
        );
        result
    }

    /// Instances of one cell, generating it on a miss.
    pub fn cell(&mut self, coord: CellCoord) -> &[AsteroidInstance] {
        self.index.get_or_generate(coord, &self.generator)
    }

    /// Reclassify every cached instance against `observer`.
    /// Returns the number of visible instances.
    pub fn update_lod(&mut self, observer: DVec3) -> usize {
        let _span = tracing::info_span!("update_lod").entered();
        let thresholds = self.config.lod;
        let visible: usize = self
            .index
            .cells_mut()
            .map(|instances| lod::classify(&thresholds, observer, instances))
            .sum();
        tracing::trace!(visible, "lod pass complete");
        visible
    }

    /// Evict cached cells whose centers lie farther than `keep_radius` from
    /// `position`. Evicted cells regenerate identically on the next query.
    pub fn evict_distant(&mut self, position: DVec3, keep_radius: f64) -> usize {
        let _span = tracing::info_span!("evict_distant", keep_radius).entered();
        let evicted = self.index.evict(position, keep_radius);
        if !evicted.is_empty() {
            tracing::debug!(
                evicted = evicted.len(),
                remaining = self.index.cached_cell_count(),
                "evicted distant cells"
            );
        }
        evicted.len()
    }

    /// Record that the detail builder has materialized `id`.
    ///
    /// Returns false when the asteroid's cell is not cached or the id does not
    /// belong to this field. The mark is dropped with its cell on eviction.
    pub fn mark_detailed(&mut self, id: &AsteroidId) -> bool {
        if id.field_id != self.config.field_id {
            return false;
        }
        let instance = self
            .index
            .cell_mut(id.cell)
            .and_then(|instances| instances.get_mut(id.index as usize));
        match instance {
            Some(instance) => {
                instance.detailed = true;
                true
            }
            None => false,
        }
    }

    pub fn statistics(&self) -> FieldStats {
        let mut visible_by_tier = [0; 4];
        let mut visible_instances = 0;
        for a in self.index.instances().filter(|a| a.visible) {
            visible_instances += 1;
            visible_by_tier[tier_slot(a.tier)] += 1;
        }

        FieldStats {
            cells_generated: self.index.cells_generated(),
            cells_evicted: self.index.cells_evicted(),
            cached_cells: self.index.cached_cell_count(),
            total_instances: self.index.total_instances(),
            visible_instances,
            visible_by_tier,
            approximate_volume: self.config.belt.approximate_volume(),
        }
    }
}

fn tier_slot(tier: DetailTier) -> usize {
    match tier {
        DetailTier::High => 0,
        DetailTier::Medium => 1,
        DetailTier::Low => 2,
        DetailTier::Billboard => 3,
    }
}
