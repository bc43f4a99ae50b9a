use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use drift_common::{BeltDescriptor, BeltParams, ResourceKind};
use drift_stream::{AsteroidField, FieldConfig};
use drift_tools::FieldInspector;
use glam::DVec3;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "drift-cli", about = "CLI tool for drift asteroid fields")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML field configuration; a built-in demo belt is used when absent
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured field seed
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Override the belt's resource
    #[arg(short, long, global = true)]
    resource: Option<ResourceKind>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, crate info and the effective configuration
    Info,
    /// List the asteroids within a radius of a point
    Query {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        #[arg(allow_negative_numbers = true)]
        z: f64,
        radius: f64,
        /// Classify results against the query point before printing
        #[arg(long)]
        lod: bool,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fly an observer around the belt, then print field statistics
    Stats {
        /// Number of observer positions along the ring
        #[arg(long, default_value = "16")]
        steps: usize,
        /// Query radius at each step
        #[arg(long, default_value = "500")]
        radius: f64,
        /// Keep radius for eviction at each step
        #[arg(long, default_value = "10000")]
        keep: f64,
        /// Also list every cached cell
        #[arg(long)]
        cells: bool,
    },
    /// Generate, evict and regenerate a region; fail if anything differs
    Verify {
        /// Query radius around the probe point
        #[arg(long, default_value = "200")]
        radius: f64,
    },
}

fn demo_belt() -> BeltParams {
    BeltParams {
        center: DVec3::ZERO,
        inner_radius: 1000.0,
        outer_radius: 2000.0,
        half_height: 50.0,
        density: 1e-4,
        resource: ResourceKind::Iron,
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<FieldConfig> {
    let mut config = match &cli.config {
        Some(path) => FieldConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => FieldConfig {
            seed: 42,
            ..FieldConfig::from_belt_params(demo_belt())?
        },
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(resource) = cli.resource {
        config.set_resource(resource)?;
    }
    Ok(config)
}

/// A point on the belt's mid-radius circle, `angle` radians around its axis.
fn ring_point(belt: &BeltDescriptor, angle: f64) -> DVec3 {
    let r = 0.5 * (belt.inner_radius() + belt.outer_radius());
    belt.center() + DVec3::new(r * angle.cos(), 0.0, r * angle.sin())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Info => {
            println!("drift-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("stream: {}", drift_stream::crate_info());
            println!("tools: {}", drift_tools::crate_info());
            print!("{}", config.to_yaml_string()?);
        }
        Commands::Query {
            x,
            y,
            z,
            radius,
            lod,
            json,
        } => {
            let mut field = AsteroidField::new(config)?;
            let point = DVec3::new(x, y, z);
            let mut found = field.query_region(point, radius);
            if lod {
                drift_stream::lod::classify(&field.config().lod, point, &mut found);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else {
                println!("{} asteroids within {radius} of {point}", found.len());
                for a in &found {
                    let tier = if a.visible { a.tier.as_str() } else { "hidden" };
                    println!(
                        "  {} pos=({:.1}, {:.1}, {:.1}) size={:.2} mesh={} tier={tier}",
                        a.id, a.position.x, a.position.y, a.position.z, a.size, a.mesh_variant
                    );
                }
            }
        }
        Commands::Stats {
            steps,
            radius,
            keep,
            cells,
        } => {
            let mut field = AsteroidField::new(config)?;
            let steps = steps.max(1);
            for i in 0..steps {
                let angle = i as f64 / steps as f64 * std::f64::consts::TAU;
                let observer = ring_point(field.belt(), angle);
                let found = field.query_region(observer, radius).len();
                let visible = field.update_lod(observer);
                let evicted = field.evict_distant(observer, keep);
                tracing::info!(step = i, found, visible, evicted, "observer step");
            }

            println!("{}", FieldInspector::summary(&field));
            if cells {
                for cell in FieldInspector::list_cells(&field) {
                    println!("  {cell}");
                }
            }
        }
        Commands::Verify { radius } => {
            let mut field = AsteroidField::new(config)?;
            let probe = ring_point(field.belt(), 0.0);

            let first = field.query_region(probe, radius);
            let evicted = field.evict_distant(probe, 0.0);
            let second = field.query_region(probe, radius);

            println!(
                "Verify: probe={probe} radius={radius} asteroids={} evicted_cells={evicted}",
                first.len()
            );
            if first != second {
                anyhow::bail!(
                    "regenerated region differs: {} vs {} asteroids",
                    first.len(),
                    second.len()
                );
            }
            println!("Match: OK");
        }
    }

    Ok(())
}
