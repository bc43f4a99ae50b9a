//! Sparse asteroid field: lazy cell generation, spatial index, LOD tiers, eviction.
//!
//! # Invariants
//! - Generating a cell is a pure function of (cell, field seed, belt, knobs).
//! - A cached cell is never regenerated; an evicted cell regenerates identically.
//! - Every generated asteroid lies inside the belt.
//!
//! # Layout
//! Space is cut into fixed-size cubes. A region query maps its sphere onto
//! the grid, generates any missing cells from a ChaCha stream seeded by the
//! cell coordinate, and filters the union by exact distance. LOD
//! classification and eviction run independently of queries.

mod asteroid;
mod config;
mod field;
mod generator;
mod grid;
pub mod lod;
pub mod seed;
mod shared;

pub use asteroid::{AsteroidId, AsteroidInstance, MESH_VARIANT_COUNT};
pub use config::{ConfigError, DEFAULT_CELL_SIZE, FieldConfig};
pub use field::{AsteroidField, FieldStats};
pub use generator::CellGenerator;
pub use grid::{CellCoord, CellIndex};
pub use lod::{DetailTier, LodThresholds};
pub use shared::SharedField;

pub fn crate_info() -> &'static str {
    "drift-stream v0.1.0"
}
