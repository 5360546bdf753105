//! Benchmarks for the per-frame simulation passes.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use mdpe::prelude::*;
use mdpe::spatial::SpatialGrid;
use mdpe::flocking;

const DT: f32 = 1.0 / 60.0;

fn seeded_system(n: usize) -> ParticleSystem {
    let mut system = ParticleSystem::setup(Mode::Emitter, 800.0, 600.0);
    system.reseed(0xbe);
    system.lifecycle.immortal = true;
    system.add_particles(n);
    system
}

fn bench_flocking_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("flocking_pass");
    for &n in &[250usize, 1000, 4000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut system = seeded_system(n);
            system.flocking.enabled = true;
            let cfg = system.flocking.clone();
            let mut particles = system.particles().to_vec();
            let mut grid = SpatialGrid::new(800.0, 600.0, cfg.radius);
            b.iter(|| {
                flocking::flock(black_box(&mut particles), &cfg, &mut grid, DT);
            })
        });
    }
    group.finish();
}

fn bench_full_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_update");
    for &n in &[250usize, 1000, 4000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut system = seeded_system(n);
            system.flocking.enabled = true;
            system.physics.bounce = true;
            system.physics.gravity = Vec2::new(0.0, 50.0);
            system.physics.turbulence = 20.0;
            system.emitter.emit = false;
            let marker = Marker::at(Vec2::new(400.0, 300.0), 1);
            let contour = Contour::default();
            b.iter(|| {
                system.update(DT, std::slice::from_ref(&marker), &contour, &StillFluid);
                black_box(system.num_particles());
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_flocking_pass, bench_full_update);
criterion_main!(benches);
