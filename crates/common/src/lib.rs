//! Shared value types for the drift field engine.
//!
//! # Invariants
//! - A `BeltDescriptor` that exists is well-formed: `0 <= inner < outer`,
//!   `half_height >= 0`, `density >= 0`, all finite.
//! - Belts are immutable after construction.

mod belt;
mod types;

pub use belt::{BeltDescriptor, BeltError, BeltParams};
pub use types::{ParseResourceError, ResourceKind};
