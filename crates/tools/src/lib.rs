//! Developer tooling: field inspector, cell listings, tier histograms.
//!
//! # Invariants
//! - Tools only read the field cache; they never generate or evict.

mod inspector;

pub use inspector::{AsteroidInfo, CellInfo, FieldInspector, FieldSummary};

pub fn crate_info() -> &'static str {
    "drift-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
