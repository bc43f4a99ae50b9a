use drift_common::ResourceKind;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::grid::CellCoord;
use crate::lod::DetailTier;

/// Number of mesh variants an asteroid can select from.
pub const MESH_VARIANT_COUNT: u8 = 5;

/// Stable identifier of a generated asteroid.
///
/// Derived from the field id, the owning cell and the asteroid's ordinal within
/// that cell, so regenerating a cell reproduces the same identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AsteroidId {
    pub field_id: u32,
    pub cell: CellCoord,
    pub index: u32,
}

impl AsteroidId {
    pub fn new(field_id: u32, cell: CellCoord, index: u32) -> Self {
        Self {
            field_id,
            cell,
            index,
        }
    }

    /// Name-based (v5) UUID of the identifier string. Same id, same UUID.
    pub fn uuid(&self) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, self.to_string().as_bytes())
    }
}

impl std::fmt::Display for AsteroidId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "f{}:{}:{}", self.field_id, self.cell, self.index)
    }
}

/// Lightweight descriptor of one generated asteroid.
///
/// Owned by its cell in the index. Query results hand out copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidInstance {
    pub id: AsteroidId,
    pub position: DVec3,
    /// Euler angles in degrees, each in `[-180, 180)`.
    pub rotation: DVec3,
    /// Angular velocity in degrees per second around each axis.
    pub spin: DVec3,
    pub size: f64,
    pub resource: ResourceKind,
    /// Mesh variant in `0..MESH_VARIANT_COUNT`.
    pub mesh_variant: u8,
    pub tier: DetailTier,
    pub visible: bool,
    /// Set once the detail builder has produced full voxel geometry.
    /// Never set by generation.
    pub detailed: bool,
}
