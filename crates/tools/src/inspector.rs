use drift_stream::{AsteroidField, AsteroidId, CellCoord, DetailTier, FieldStats};
use serde::Serialize;

/// Field inspector for developer tooling.
///
/// Read-only views over a field's cache for debugging, profiling and
/// development UI. Never generates or evicts.
pub struct FieldInspector;

impl FieldInspector {
    /// Produce a summary of the field state.
    pub fn summary(field: &AsteroidField) -> FieldSummary {
        let config = field.config();
        FieldSummary {
            field_id: config.field_id,
            seed: config.seed,
            cell_size: config.cell_size,
            resource: field.resource().as_str(),
            stats: field.statistics(),
        }
    }

    /// Per-cell listing of the cache, in ascending cell order.
    pub fn list_cells(field: &AsteroidField) -> Vec<CellInfo> {
        let index = field.index();
        index
            .cached_cells()
            .into_iter()
            .filter_map(|coord| {
                index.cell(coord).map(|instances| CellInfo {
                    coord,
                    center: coord.center(index.cell_size()).to_array(),
                    instances: instances.len(),
                    visible: instances.iter().filter(|a| a.visible).count(),
                    detailed: instances.iter().filter(|a| a.detailed).count(),
                })
            })
            .collect()
    }

    /// Look up a single cached asteroid.
    pub fn inspect_asteroid(field: &AsteroidField, id: &AsteroidId) -> Option<AsteroidInfo> {
        let instance = field.index().cell(id.cell)?.get(id.index as usize)?;
        (instance.id == *id).then(|| AsteroidInfo {
            id: instance.id.to_string(),
            uuid: instance.id.uuid().to_string(),
            position: instance.position.to_array(),
            size: instance.size,
            mesh_variant: instance.mesh_variant,
            tier: instance.visible.then_some(instance.tier),
            detailed: instance.detailed,
        })
    }
}

/// Summary of field state for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSummary {
    pub field_id: u32,
    pub seed: u64,
    pub cell_size: f64,
    pub resource: &'static str,
    pub stats: FieldStats,
}

impl std::fmt::Display for FieldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = &self.stats;
        writeln!(
            f,
            "Field {}: seed={} cell_size={} resource={}",
            self.field_id, self.seed, self.cell_size, self.resource
        )?;
        writeln!(
            f,
            "  cells: cached={} generated={} evicted={}",
            s.cached_cells, s.cells_generated, s.cells_evicted
        )?;
        write!(
            f,
            "  asteroids: total={} visible={}",
            s.total_instances, s.visible_instances
        )?;
        for (tier, count) in DetailTier::ALL.iter().zip(s.visible_by_tier) {
            write!(f, " {tier}={count}")?;
        }
        write!(f, "\n  approx volume: {:.3e}", s.approximate_volume)
    }
}

/// One cached cell.
#[derive(Debug, Clone, Serialize)]
pub struct CellInfo {
    pub coord: CellCoord,
    pub center: [f64; 3],
    pub instances: usize,
    pub visible: usize,
    pub detailed: usize,
}

impl std::fmt::Display for CellInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cell [{}] center=({:.0}, {:.0}, {:.0}) asteroids={} visible={} detailed={}",
            self.coord,
            self.center[0],
            self.center[1],
            self.center[2],
            self.instances,
            self.visible,
            self.detailed,
        )
    }
}

/// Detailed info about a single asteroid.
#[derive(Debug, Clone, Serialize)]
pub struct AsteroidInfo {
    pub id: String,
    pub uuid: String,
    pub position: [f64; 3],
    pub size: f64,
    pub mesh_variant: u8,
    /// `None` while culled or not yet classified.
    pub tier: Option<DetailTier>,
    pub detailed: bool,
}

impl std::fmt::Display for AsteroidInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tier = self.tier.map_or("hidden", DetailTier::as_str);
        write!(
            f,
            "Asteroid [{}] pos=({:.1}, {:.1}, {:.1}) size={:.2} mesh={} tier={} detailed={}",
            self.id,
            self.position[0],
            self.position[1],
            self.position[2],
            self.size,
            self.mesh_variant,
            tier,
            self.detailed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_common::{BeltDescriptor, ResourceKind};
    use glam::DVec3;

    const PROBE: DVec3 = DVec3::new(1500.0, 0.0, 0.0);

    fn field() -> AsteroidField {
        let belt =
            BeltDescriptor::new(DVec3::ZERO, 1000.0, 2000.0, 50.0, 1e-4, ResourceKind::Trinium)
                .unwrap();
        AsteroidField::with_belt(belt, 42).unwrap()
    }

    #[test]
    fn summary_empty_field() {
        let field = field();
        let summary = FieldInspector::summary(&field);
        assert_eq!(summary.seed, 42);
        assert_eq!(summary.resource, "trinium");
        assert_eq!(summary.stats.cached_cells, 0);
    }

    #[test]
    fn summary_after_query() {
        let mut field = field();
        field.query_region(PROBE, 200.0);
        field.update_lod(PROBE);

        let summary = FieldInspector::summary(&field);
        assert_eq!(summary.stats.cached_cells, 4);
        assert!(summary.stats.visible_instances > 0);
    }

    #[test]
    fn list_cells_is_sorted() {
        let mut field = field();
        field.query_region(PROBE, 200.0);

        let cells = FieldInspector::list_cells(&field);
        assert_eq!(cells.len(), 4);
        let coords: Vec<_> = cells.iter().map(|c| c.coord).collect();
        let mut sorted = coords.clone();
        sorted.sort();
        assert_eq!(coords, sorted);
        assert_eq!(
            cells.iter().map(|c| c.instances).sum::<usize>(),
            field.statistics().total_instances
        );
    }

    #[test]
    fn inspect_asteroid_found() {
        let mut field = field();
        let found = field.query_region(PROBE, 200.0);
        let info = FieldInspector::inspect_asteroid(&field, &found[0].id).unwrap();
        assert_eq!(info.id, found[0].id.to_string());
        assert_eq!(info.position, found[0].position.to_array());
        assert_eq!(info.tier, None);
    }

    #[test]
    fn inspect_asteroid_not_found() {
        let field = field();
        let id = AsteroidId::new(0, CellCoord::new(0, 0, 0), 0);
        assert!(FieldInspector::inspect_asteroid(&field, &id).is_none());
    }

    #[test]
    fn summary_display() {
        let field = field();
        let s = format!("{}", FieldInspector::summary(&field));
        assert!(s.contains("seed=42"));
        assert!(s.contains("high=0"));
    }
}
