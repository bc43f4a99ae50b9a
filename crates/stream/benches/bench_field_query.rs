use std::hint::black_box;
use std::time::Instant;

use drift_common::{BeltDescriptor, ResourceKind};
use drift_stream::{AsteroidField, CellCoord, CellGenerator, FieldConfig};
use glam::DVec3;

fn make_config(density: f64) -> FieldConfig {
    let belt = BeltDescriptor::new(
        DVec3::ZERO,
        20_000.0,
        40_000.0,
        500.0,
        density,
        ResourceKind::Iron,
    )
    .expect("valid belt");
    FieldConfig {
        seed: 42,
        ..FieldConfig::new(belt)
    }
}

fn bench_generate(density: f64, iterations: usize) {
    let generator = CellGenerator::new(&make_config(density));
    let cell = CellCoord::new(5, 0, 0);

    let start = Instant::now();
    let mut produced = 0;
    for _ in 0..iterations {
        produced = black_box(generator.generate(black_box(cell))).len();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  generate (density={density:e}, {produced} asteroids, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_query(radius: f64, iterations: usize) {
    let mut field = AsteroidField::new(make_config(1e-7)).expect("valid config");
    let probe = DVec3::new(30_000.0, 0.0, 0.0);
    // Warm the cache so the loop measures cached queries.
    let found = field.query_region(probe, radius).len();

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(field.query_region(black_box(probe), black_box(radius)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  cached query (r={radius}, {found} asteroids, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_lod_and_evict(iterations: usize) {
    let mut field = AsteroidField::new(make_config(1e-7)).expect("valid config");

    let start = Instant::now();
    for i in 0..iterations {
        // Simulate an observer flying along the ring.
        let angle = i as f64 * 0.05;
        let observer = DVec3::new(30_000.0 * angle.cos(), 0.0, 30_000.0 * angle.sin());
        let _ = black_box(field.query_region(observer, 8_000.0));
        let _ = black_box(field.update_lod(observer));
        let _ = black_box(field.evict_distant(observer, 20_000.0));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    let stats = field.statistics();
    println!(
        "  fly-through ({iterations} steps, {} cells generated, {} evicted): {per_iter:?}/step, total {elapsed:?}",
        stats.cells_generated, stats.cells_evicted
    );
}

fn main() {
    println!("=== Field Benchmarks ===\n");

    println!("Cell generation:");
    bench_generate(1e-8, 100);
    bench_generate(1e-7, 20);
    bench_generate(1e-6, 5);

    println!("\nCached region query:");
    bench_query(1_000.0, 1000);
    bench_query(5_000.0, 100);
    bench_query(15_000.0, 10);

    println!("\nQuery + LOD + eviction:");
    bench_lod_and_evict(200);

    println!("\n=== Done ===");
}
