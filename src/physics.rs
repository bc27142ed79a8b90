/*
 * Physics Module
 *
 * This module advances the flock by one frame. Every agent reads the same
 * pre-step snapshot of the flock and writes its next state into a staging
 * buffer, which replaces the flock in one assignment. No agent ever sees a
 * neighbor that has already moved this step.
 *
 * Per agent:
 * 1. Zero acceleration and apply the weighted steering total
 * 2. Integrate velocity with the integration gain
 * 3. Keep speed inside [min_speed, max_speed]
 * 4. Integrate position, advance the wing flap, refresh the heading
 *
 * The per-agent pass can run on rayon; both paths give identical results.
 */

use nannou::prelude::*;
use rayon::prelude::*;

use crate::boid::Boid;
use crate::neighbors::{BruteForce, NeighborQuery};
use crate::params::SimulationParams;
use crate::spatial_grid::SpatialGrid;
use crate::steering::SteeringForces;
use crate::vector::{enforce_speed_band, safe_normalize};
use crate::MAX_DT;

/// Clamp a frame delta to `[0, MAX_DT]` to bound integration error
/// during frame-rate hitches.
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_nan() {
        return 0.0;
    }
    dt.clamp(0.0, MAX_DT)
}

/// Flock-level aggregates, recomputed after every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockSnapshot {
    pub centroid: Vec3,
    pub mean_velocity: Vec3,
    pub size: usize,
}

impl FlockSnapshot {
    /// Falls back to the leader's state when the flock is empty.
    pub fn from_agents(agents: &[Boid], leader: &Boid) -> Self {
        if agents.is_empty() {
            return Self {
                centroid: leader.position,
                mean_velocity: leader.velocity,
                size: 0,
            };
        }

        let count = agents.len() as f32;
        let (position_sum, velocity_sum) = agents
            .iter()
            .fold((Vec3::ZERO, Vec3::ZERO), |(p, v), agent| (p + agent.position, v + agent.velocity));

        Self {
            centroid: position_sum / count,
            mean_velocity: velocity_sum / count,
            size: agents.len(),
        }
    }
}

/// Advance every agent once, seeking the leader's position.
pub fn step_flock(boids: &mut Vec<Boid>, leader: &Boid, params: &SimulationParams, dt: f32) -> FlockSnapshot {
    let dt = clamp_dt(dt);

    let next = if params.enable_spatial_grid {
        let cell_size = params.query_radius() * params.cell_size_factor;
        let grid = SpatialGrid::build(cell_size, boids);
        advance_all(boids, &grid, leader.position, params, dt)
    } else {
        advance_all(boids, &BruteForce, leader.position, params, dt)
    };

    *boids = next;
    FlockSnapshot::from_agents(boids, leader)
}

// Compute the next state of every agent from an immutable snapshot
fn advance_all<Q>(snapshot: &[Boid], query: &Q, goal: Vec3, params: &SimulationParams, dt: f32) -> Vec<Boid>
where
    Q: NeighborQuery + Sync,
{
    let advance_one = |(index, agent): (usize, &Boid)| {
        let mut indices = Vec::new();
        query.neighbors(snapshot, index, params.query_radius(), &mut indices);
        let neighbors: Vec<&Boid> = indices.iter().map(|&i| &snapshot[i]).collect();

        let forces = SteeringForces::compute(agent, &neighbors, goal, params);
        integrate(agent, forces.total(params), params, dt)
    };

    if params.enable_parallel {
        snapshot.par_iter().enumerate().map(advance_one).collect()
    } else {
        snapshot.iter().enumerate().map(advance_one).collect()
    }
}

/// Integrate one agent's acceleration into its next state.
pub fn integrate(agent: &Boid, acceleration: Vec3, params: &SimulationParams, dt: f32) -> Boid {
    let mut next = agent.clone();

    next.reset_acceleration();
    next.apply_force(acceleration);

    next.velocity += next.acceleration * dt * params.integration_gain;
    next.velocity = enforce_speed_band(next.velocity, agent.forward, params.min_speed, params.max_speed);

    next.position += next.velocity * dt;
    next.advance_animation(dt);

    // The speed band keeps velocity away from zero, but keep the old heading
    // if it ever does degenerate
    next.forward = safe_normalize(next.velocity).unwrap_or(agent.forward);

    next
}
