use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::asteroid::AsteroidInstance;
use crate::config::ConfigError;

/// Distance-based detail tier, finest first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DetailTier {
    High,
    Medium,
    Low,
    #[default]
    Billboard,
}

impl DetailTier {
    pub const ALL: [DetailTier; 4] = [
        DetailTier::High,
        DetailTier::Medium,
        DetailTier::Low,
        DetailTier::Billboard,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DetailTier::High => "high",
            DetailTier::Medium => "medium",
            DetailTier::Low => "low",
            DetailTier::Billboard => "billboard",
        }
    }
}

impl std::fmt::Display for DetailTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Four ascending distance thresholds splitting space into detail bands.
///
/// `[0, high)` is High, `[high, medium)` Medium, `[medium, low)` Low,
/// `[low, cull)` Billboard, and anything at or beyond `cull` is not visible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LodThresholds {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
    pub cull: f64,
}

impl Default for LodThresholds {
    fn default() -> Self {
        Self {
            high: 2_000.0,
            medium: 8_000.0,
            low: 20_000.0,
            cull: 50_000.0,
        }
    }
}

impl LodThresholds {
    pub fn new(high: f64, medium: f64, low: f64, cull: f64) -> Result<Self, ConfigError> {
        let thresholds = Self {
            high,
            medium,
            low,
            cull,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Thresholds must be finite, positive and strictly ascending.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = [self.high, self.medium, self.low, self.cull];
        let ascending = t.windows(2).all(|w| w[0] < w[1]);
        if t.iter().all(|v| v.is_finite()) && self.high > 0.0 && ascending {
            Ok(())
        } else {
            Err(ConfigError::InvalidThresholds(*self))
        }
    }

    /// Tier for a distance, or `None` when culled.
    pub fn tier_for(&self, distance: f64) -> Option<DetailTier> {
        if distance < self.high {
            Some(DetailTier::High)
        } else if distance < self.medium {
            Some(DetailTier::Medium)
        } else if distance < self.low {
            Some(DetailTier::Low)
        } else if distance < self.cull {
            Some(DetailTier::Billboard)
        } else {
            None
        }
    }
}

/// Assign tier and visibility to each instance by its distance to `observer`.
///
/// A culled instance keeps its previous tier; only `visible` is meaningful
/// for it. Returns the number of visible instances.
pub fn classify(
    thresholds: &LodThresholds,
    observer: DVec3,
    instances: &mut [AsteroidInstance],
) -> usize {
    let mut visible = 0;
    for instance in instances.iter_mut() {
        match thresholds.tier_for(instance.position.distance(observer)) {
            Some(tier) => {
                instance.tier = tier;
                instance.visible = true;
                visible += 1;
            }
            None => instance.visible = false,
        }
    }
    visible
}
