use drift_common::{BeltDescriptor, BeltError, BeltParams, ResourceKind};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::lod::LodThresholds;

/// Errors from field configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid belt: {0}")]
    Belt(#[from] BeltError),
    #[error("cell_size must be finite and positive, got {0}")]
    InvalidCellSize(f64),
    #[error("LOD thresholds must be positive and strictly ascending: {0:?}")]
    InvalidThresholds(LodThresholds),
    #[error("size_range must satisfy 0 < min <= max, got {0:?}")]
    InvalidSizeRange([f64; 2]),
    #[error("max_spin_deg_per_sec must be finite and non-negative, got {0}")]
    InvalidSpin(f64),
    #[error("a cell may hold up to {bound} asteroids, above max_instances_per_cell {cap}")]
    CellTooDense { bound: usize, cap: usize },
}

/// Field configuration: the belt, the seed and the generation/LOD knobs.
///
/// Every field except `belt` has a default, so a YAML file may name only the
/// belt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Part of every asteroid identifier.
    #[serde(default)]
    pub field_id: u32,
    #[serde(default)]
    pub seed: u64,
    /// Edge length of a grid cell in world units.
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
    #[serde(default)]
    pub lod: LodThresholds,
    /// Uniform asteroid size bounds `[min, max]`.
    #[serde(default = "default_size_range")]
    pub size_range: [f64; 2],
    #[serde(default = "default_max_spin")]
    pub max_spin_deg_per_sec: f64,
    /// Optional memory guard: configs whose densest cell could exceed it are
    /// rejected by [`FieldConfig::validate`]. Generation never truncates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_instances_per_cell: Option<usize>,
    pub belt: BeltDescriptor,
}

pub const DEFAULT_CELL_SIZE: f64 = 5_000.0;

fn default_cell_size() -> f64 {
    DEFAULT_CELL_SIZE
}

fn default_size_range() -> [f64; 2] {
    [1.0, 3.0]
}

fn default_max_spin() -> f64 {
    5.0
}

impl FieldConfig {
    /// Configuration with defaults for everything but the belt.
    pub fn new(belt: BeltDescriptor) -> Self {
        Self {
            field_id: 0,
            seed: 0,
            cell_size: default_cell_size(),
            lod: LodThresholds::default(),
            size_range: default_size_range(),
            max_spin_deg_per_sec: default_max_spin(),
            max_instances_per_cell: None,
            belt,
        }
    }

    /// Configuration with defaults over a belt built from raw parameters.
    pub fn from_belt_params(params: BeltParams) -> Result<Self, ConfigError> {
        Ok(Self::new(BeltDescriptor::try_from(params)?))
    }

    /// Swap the belt's resource, keeping its geometry and density.
    pub fn set_resource(&mut self, resource: ResourceKind) -> Result<(), ConfigError> {
        let params = BeltParams {
            resource,
            ..BeltParams::from(self.belt.clone())
        };
        self.belt = BeltDescriptor::try_from(params)?;
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading field config");
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        self.lod.validate()?;
        let [min, max] = self.size_range;
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(ConfigError::InvalidSizeRange(self.size_range));
        }
        if !(self.max_spin_deg_per_sec.is_finite() && self.max_spin_deg_per_sec >= 0.0) {
            return Err(ConfigError::InvalidSpin(self.max_spin_deg_per_sec));
        }
        if let Some(cap) = self.max_instances_per_cell {
            let bound = self.densest_cell_bound();
            if bound > cap {
                return Err(ConfigError::CellTooDense { bound, cap });
            }
        }
        Ok(())
    }

    /// Upper bound on the points drawn for any single cell.
    ///
    /// A cell's sampling box is at most a cell edge, and at most the belt's
    /// bounding box, along each axis; its count varies by up to a quarter.
    pub fn densest_cell_bound(&self) -> usize {
        let (min, max) = self.belt.bounds();
        let extent = (max - min).min(DVec3::splat(self.cell_size));
        let expected = extent.x * extent.y * extent.z * self.belt.density();
        (expected * 1.25).floor() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn belt() -> BeltDescriptor {
        BeltDescriptor::new(DVec3::ZERO, 1000.0, 2000.0, 50.0, 1e-4, ResourceKind::Iron).unwrap()
    }

    #[test]
    fn field_config_defaults() {
        let config = FieldConfig::new(belt());
        assert_eq!(config.cell_size, 5_000.0);
        assert_eq!(config.size_range, [1.0, 3.0]);
        assert_eq!(config.max_spin_deg_per_sec, 5.0);
        assert_eq!(config.max_instances_per_cell, None);
        assert_eq!(config.lod, LodThresholds::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn yaml_with_only_belt_uses_defaults() {
        let yaml = r#"
seed: 42
belt:
  inner_radius: 1000.0
  outer_radius: 2000.0
  half_height: 50.0
  density: 0.0001
  resource: titanium
"#;
        let config = FieldConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.cell_size, DEFAULT_CELL_SIZE);
        assert_eq!(config.belt.center(), DVec3::ZERO);
        assert_eq!(config.belt.resource(), ResourceKind::Titanium);
    }

    #[test]
    fn yaml_rejects_malformed_belt() {
        let yaml = r#"
belt:
  inner_radius: 3000.0
  outer_radius: 2000.0
  half_height: 50.0
  density: 0.0001
"#;
        assert!(matches!(
            FieldConfig::from_yaml_str(yaml),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn yaml_round_trip() {
        let mut config = FieldConfig::new(belt());
        config.seed = 9;
        config.field_id = 4;
        config.max_instances_per_cell = Some(500_000);
        let yaml = config.to_yaml_string().unwrap();
        assert_eq!(FieldConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn validate_rejects_bad_knobs() {
        let mut config = FieldConfig::new(belt());
        config.cell_size = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCellSize(_))
        ));

        let mut config = FieldConfig::new(belt());
        config.size_range = [3.0, 1.0];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSizeRange(_))
        ));

        let mut config = FieldConfig::new(belt());
        config.lod.cull = config.lod.low;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThresholds(_))
        ));

        let mut config = FieldConfig::new(belt());
        config.max_spin_deg_per_sec = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSpin(_))));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let config = FieldConfig::new(belt());
        file.write_all(config.to_yaml_string().unwrap().as_bytes())
            .unwrap();

        let loaded = FieldConfig::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            FieldConfig::load(dir.path().join("missing.yaml")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn cap_rejects_belts_denser_than_it_allows() {
        // Densest box is 4000 x 100 x 4000 at 1e-4: 160_000 points, +25%.
        let mut config = FieldConfig::new(belt());
        assert!((199_999..=200_000).contains(&config.densest_cell_bound()));

        config.max_instances_per_cell = Some(100_000);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CellTooDense { cap: 100_000, .. })
        ));

        config.max_instances_per_cell = Some(250_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn cap_is_omitted_from_yaml_when_unset() {
        let yaml = FieldConfig::new(belt()).to_yaml_string().unwrap();
        assert!(!yaml.contains("max_instances_per_cell"));
    }

    #[test]
    fn malformed_belt_params_are_belt_errors() {
        let params = BeltParams {
            center: DVec3::ZERO,
            inner_radius: 3000.0,
            outer_radius: 2000.0,
            half_height: 50.0,
            density: 1e-4,
            resource: ResourceKind::Iron,
        };
        assert!(matches!(
            FieldConfig::from_belt_params(params),
            Err(ConfigError::Belt(BeltError::InvalidRadii { .. }))
        ));
    }

    #[test]
    fn set_resource_keeps_geometry() {
        let mut config = FieldConfig::new(belt());
        config.set_resource(ResourceKind::Avorion).unwrap();
        assert_eq!(config.belt.resource(), ResourceKind::Avorion);
        assert_eq!(config.belt.outer_radius(), 2000.0);
        assert_eq!(config.belt.density(), 1e-4);
    }
}
