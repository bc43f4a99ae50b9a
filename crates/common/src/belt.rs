use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::types::ResourceKind;

/// Errors from belt construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BeltError {
    #[error("belt parameter `{0}` is not finite")]
    NonFinite(&'static str),
    #[error("inner radius must be non-negative, got {0}")]
    NegativeInnerRadius(f64),
    #[error("inner radius {inner} must be less than outer radius {outer}")]
    InvalidRadii { inner: f64, outer: f64 },
    #[error("half-height must be non-negative, got {0}")]
    NegativeHalfHeight(f64),
    #[error("density must be non-negative, got {0}")]
    NegativeDensity(f64),
}

/// Raw belt parameters as they appear in configuration files.
///
/// Converted into a [`BeltDescriptor`] through validation; a descriptor that
/// exists is always well-formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeltParams {
    #[serde(default)]
    pub center: DVec3,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub half_height: f64,
    /// Expected asteroids per unit volume.
    pub density: f64,
    #[serde(default)]
    pub resource: ResourceKind,
}

/// Annular region (a flat ring around a vertical +Y axis) seeded with asteroids.
///
/// A point is inside when its horizontal (XZ) distance from `center` lies in
/// `[inner_radius, outer_radius]` and its vertical offset is at most
/// `half_height`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BeltParams", into = "BeltParams")]
pub struct BeltDescriptor {
    center: DVec3,
    inner_radius: f64,
    outer_radius: f64,
    half_height: f64,
    density: f64,
    resource: ResourceKind,
}

impl BeltDescriptor {
    pub fn new(
        center: DVec3,
        inner_radius: f64,
        outer_radius: f64,
        half_height: f64,
        density: f64,
        resource: ResourceKind,
    ) -> Result<Self, BeltError> {
        if !center.is_finite() {
            return Err(BeltError::NonFinite("center"));
        }
        for (name, value) in [
            ("inner_radius", inner_radius),
            ("outer_radius", outer_radius),
            ("half_height", half_height),
            ("density", density),
        ] {
            if !value.is_finite() {
                return Err(BeltError::NonFinite(name));
            }
        }
        if inner_radius < 0.0 {
            return Err(BeltError::NegativeInnerRadius(inner_radius));
        }
        if inner_radius >= outer_radius {
            return Err(BeltError::InvalidRadii {
                inner: inner_radius,
                outer: outer_radius,
            });
        }
        if half_height < 0.0 {
            return Err(BeltError::NegativeHalfHeight(half_height));
        }
        if density < 0.0 {
            return Err(BeltError::NegativeDensity(density));
        }
        Ok(Self {
            center,
            inner_radius,
            outer_radius,
            half_height,
            density,
            resource,
        })
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }

    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    pub fn half_height(&self) -> f64 {
        self.half_height
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn resource(&self) -> ResourceKind {
        self.resource
    }

    /// Containment test. Both radial bounds and the vertical bound are inclusive.
    pub fn contains(&self, point: DVec3) -> bool {
        let offset = point - self.center;
        let radial = offset.x.hypot(offset.z);
        radial >= self.inner_radius
            && radial <= self.outer_radius
            && offset.y.abs() <= self.half_height
    }

    /// Axis-aligned bounding box of the belt as `(min, max)`.
    pub fn bounds(&self) -> (DVec3, DVec3) {
        let extent = DVec3::new(self.outer_radius, self.half_height, self.outer_radius);
        (self.center - extent, self.center + extent)
    }

    /// Whether the box `[min, max]` shares at least one point with the belt.
    ///
    /// Exact for the ring-shaped slab: the horizontal distance over the box's
    /// XZ rectangle covers a closed interval, and the box overlaps iff that
    /// interval meets `[inner_radius, outer_radius]` while the vertical spans
    /// intersect.
    pub fn overlaps_box(&self, min: DVec3, max: DVec3) -> bool {
        let lo = min - self.center;
        let hi = max - self.center;
        if lo.y > self.half_height || hi.y < -self.half_height {
            return false;
        }

        let near_x = 0.0_f64.clamp(lo.x, hi.x);
        let near_z = 0.0_f64.clamp(lo.z, hi.z);
        let nearest = near_x.hypot(near_z);

        let far_x = lo.x.abs().max(hi.x.abs());
        let far_z = lo.z.abs().max(hi.z.abs());
        let farthest = far_x.hypot(far_z);

        nearest <= self.outer_radius && farthest >= self.inner_radius
    }

    /// Approximate belt volume: `(outer - inner) * thickness * 2π * mean radius`,
    /// where thickness is the full vertical extent (twice the half-height).
    pub fn approximate_volume(&self) -> f64 {
        let mean_radius = 0.5 * (self.inner_radius + self.outer_radius);
        (self.outer_radius - self.inner_radius) * (2.0 * self.half_height) * TAU * mean_radius
    }
}

impl TryFrom<BeltParams> for BeltDescriptor {
    type Error = BeltError;

    fn try_from(p: BeltParams) -> Result<Self, Self::Error> {
        Self::new(
            p.center,
            p.inner_radius,
            p.outer_radius,
            p.half_height,
            p.density,
            p.resource,
        )
    }
}

impl From<BeltDescriptor> for BeltParams {
    fn from(b: BeltDescriptor) -> Self {
        Self {
            center: b.center,
            inner_radius: b.inner_radius,
            outer_radius: b.outer_radius,
            half_height: b.half_height,
            density: b.density,
            resource: b.resource,
        }
    }
}
