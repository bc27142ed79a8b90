/*
 * Flock Simulation Benchmark
 *
 * This file contains benchmarks for the flock simulation to identify performance bottlenecks.
 * It measures spatial grid construction, neighbor gathering with and without the grid,
 * and the full per-frame step.
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use leader_flock::neighbors::{BruteForce, NeighborQuery};
use leader_flock::{Boid, SimulationParams, SimulationState, SpatialGrid};
use nannou::prelude::*;
use std::time::Duration;

const FLOCK_SIZES: [usize; 3] = [100, 500, 1000];
const STEP_DT: f32 = 1.0 / 60.0;

fn params_for(n: usize, spatial_grid: bool) -> SimulationParams {
    SimulationParams {
        initial_flock_size: n,
        enable_spatial_grid: spatial_grid,
        // Spread the flock out so neighborhoods stay realistic
        spawn_radius: (n as f32).cbrt() * 3.0,
        ..SimulationParams::default()
    }
}

fn flock(n: usize) -> Vec<Boid> {
    SimulationState::with_seed(params_for(n, false), 7).boids().to_vec()
}

// Benchmark building the spatial grid
fn bench_spatial_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatial_grid");
    let params = SimulationParams::default();

    for n in FLOCK_SIZES.iter() {
        let boids = flock(*n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &boids, |b, boids| {
            b.iter(|| black_box(SpatialGrid::build(params.query_radius(), boids)));
        });
    }

    group.finish();
}

// Benchmark gathering every agent's neighbors
fn bench_neighbor_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbor_queries");
    let radius = SimulationParams::default().query_radius();

    for n in FLOCK_SIZES.iter() {
        let boids = flock(*n);
        let grid = SpatialGrid::build(radius, &boids);

        group.bench_with_input(BenchmarkId::new("brute_force", n), &boids, |b, boids| {
            let mut out = Vec::new();
            b.iter(|| {
                for i in 0..boids.len() {
                    out.clear();
                    BruteForce.neighbors(boids, i, radius, &mut out);
                }
                black_box(out.len())
            });
        });

        group.bench_with_input(BenchmarkId::new("grid", n), &boids, |b, boids| {
            let mut out = Vec::new();
            b.iter(|| {
                for i in 0..boids.len() {
                    out.clear();
                    grid.neighbors(boids, i, radius, &mut out);
                }
                black_box(out.len())
            });
        });
    }

    group.finish();
}

// Benchmark the overall step
fn bench_update_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_loop");

    for n in FLOCK_SIZES.iter() {
        for (label, grid) in [("brute_force", false), ("grid", true)] {
            group.bench_with_input(BenchmarkId::new(label, n), n, |b, &n| {
                let mut state = SimulationState::with_seed(params_for(n, grid), 11);
                b.iter(|| black_box(state.step(vec3(0.0, 0.0, 1.0), STEP_DT)));
            });
        }
    }

    group.finish();
}

// Configure the benchmarks
criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(10)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));
    targets = bench_spatial_grid, bench_neighbor_queries, bench_update_loop
}

criterion_main!(benches);
