use std::sync::Arc;

use glam::DVec3;
use parking_lot::Mutex;

use crate::asteroid::{AsteroidId, AsteroidInstance};
use crate::config::{ConfigError, FieldConfig};
use crate::field::{AsteroidField, FieldStats};
use crate::lod::{self, LodThresholds};

/// Thread-safe handle to an [`AsteroidField`].
///
/// Every index mutation (generation, eviction, field-wide LOD) runs under one
/// lock, so a cell is generated at most once even when several threads query
/// it together, and eviction never races a generation in progress. Queries
/// return owned copies; callers classify those copies with
/// [`SharedField::classify`] without taking the lock.
#[derive(Debug, Clone)]
pub struct SharedField {
    inner: Arc<Mutex<AsteroidField>>,
    lod: LodThresholds,
}

impl SharedField {
    pub fn new(config: FieldConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_field(AsteroidField::new(config)?))
    }

    pub fn from_field(field: AsteroidField) -> Self {
        let lod = field.config().lod;
        Self {
            inner: Arc::new(Mutex::new(field)),
            lod,
        }
    }

    pub fn query_region(&self, position: DVec3, radius: f64) -> Vec<AsteroidInstance> {
        self.inner.lock().query_region(position, radius)
    }

    pub fn evict_distant(&self, position: DVec3, keep_radius: f64) -> usize {
        self.inner.lock().evict_distant(position, keep_radius)
    }

    pub fn update_lod(&self, observer: DVec3) -> usize {
        self.inner.lock().update_lod(observer)
    }

    pub fn mark_detailed(&self, id: &AsteroidId) -> bool {
        self.inner.lock().mark_detailed(id)
    }

    pub fn statistics(&self) -> FieldStats {
        self.inner.lock().statistics()
    }

    /// Classify a query result with this field's thresholds, lock-free.
    pub fn classify(&self, observer: DVec3, instances: &mut [AsteroidInstance]) -> usize {
        lod::classify(&self.lod, observer, instances)
    }

    /// Run `f` with exclusive access to the field.
    pub fn with<R>(&self, f: impl FnOnce(&mut AsteroidField) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
