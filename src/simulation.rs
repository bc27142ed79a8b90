/*
 * Simulation Module
 *
 * SimulationState is the one value that owns the leader, the flock and the
 * tuning parameters. The frame driver calls step() once per frame and
 * issues spawn/despawn/parameter swaps only between steps.
 */

use nannou::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::boid::Boid;
use crate::leader::Leader;
use crate::params::SimulationParams;
use crate::physics::{self, FlockSnapshot};

pub struct SimulationState {
    leader: Leader,
    boids: Vec<Boid>,
    params: SimulationParams,
    snapshot: FlockSnapshot,
    rng: StdRng,
}

impl SimulationState {
    pub fn new(params: SimulationParams) -> Self {
        Self::from_rng(params, StdRng::from_entropy())
    }

    /// Deterministic spawning, for tests and benchmarks.
    pub fn with_seed(params: SimulationParams, seed: u64) -> Self {
        Self::from_rng(params, StdRng::seed_from_u64(seed))
    }

    fn from_rng(params: SimulationParams, rng: StdRng) -> Self {
        let leader = Leader::new(params.leader_start());
        let snapshot = FlockSnapshot::from_agents(&[], &leader.boid);

        let mut state = Self {
            leader,
            boids: Vec::with_capacity(params.initial_flock_size),
            params,
            snapshot,
            rng,
        };

        for _ in 0..state.params.initial_flock_size {
            state.spawn();
        }
        info!(flock_size = state.boids.len(), "simulation initialised");

        state
    }

    /// Add one agent near the leader. Returns the new flock size.
    pub fn spawn(&mut self) -> usize {
        let boid = Boid::spawn_near(self.leader.position(), &self.params, &mut self.rng);
        self.boids.push(boid);
        self.refresh_snapshot();

        debug!(flock_size = self.boids.len(), "spawned boid");
        self.boids.len()
    }

    /// Remove the most recently added agent. No-op on an empty flock.
    pub fn despawn(&mut self) -> Option<Boid> {
        let removed = self.boids.pop();
        if removed.is_some() {
            self.refresh_snapshot();
            debug!(flock_size = self.boids.len(), "despawned boid");
        }
        removed
    }

    /// Leader first, then the flock chases the leader's new position.
    pub fn step(&mut self, leader_input: Vec3, dt: f32) -> FlockSnapshot {
        let dt = physics::clamp_dt(dt);

        self.leader.update(leader_input, &self.params, dt);
        self.snapshot = physics::step_flock(&mut self.boids, &self.leader.boid, &self.params, dt);
        self.snapshot
    }

    /// Swap in reloaded parameters. Existing agents keep their state.
    pub fn apply_params(&mut self, params: SimulationParams) {
        info!("applying new simulation parameters");
        self.params = params;
    }

    pub fn leader(&self) -> &Leader {
        &self.leader
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn flock_size(&self) -> usize {
        self.boids.len()
    }

    pub fn snapshot(&self) -> FlockSnapshot {
        self.snapshot
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    fn refresh_snapshot(&mut self) {
        self.snapshot = FlockSnapshot::from_agents(&self.boids, &self.leader.boid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_params() -> SimulationParams {
        SimulationParams {
            initial_flock_size: 0,
            ..SimulationParams::default()
        }
    }

    #[test]
    fn starts_with_initial_flock_around_leader() {
        let params = SimulationParams::default();
        let state = SimulationState::with_seed(params.clone(), 1);

        assert_eq!(state.flock_size(), params.initial_flock_size);
        assert_eq!(state.leader().position(), params.leader_start());
        for boid in state.boids() {
            assert!(boid.position.distance(params.leader_start()) <= params.spawn_radius + 1e-4);
        }
    }

    #[test]
    fn spawn_then_despawn_restores_flock() {
        let mut state = SimulationState::with_seed(SimulationParams::default(), 2);
        let before = state.boids().to_vec();

        let size = state.spawn();
        assert_eq!(size, before.len() + 1);
        let spawned = state.boids().last().cloned();

        let removed = state.despawn();
        assert_eq!(removed, spawned);
        assert_eq!(state.boids(), &before[..]);
    }

    #[test]
    fn despawn_on_empty_flock_is_noop() {
        let mut state = SimulationState::with_seed(empty_params(), 3);
        assert_eq!(state.despawn(), None);
        assert_eq!(state.flock_size(), 0);
    }

    #[test]
    fn empty_flock_snapshot_tracks_leader() {
        let mut state = SimulationState::with_seed(empty_params(), 4);
        let snapshot = state.step(Vec3::X, 0.05);

        assert_eq!(snapshot.size, 0);
        assert_eq!(snapshot.centroid, state.leader().position());
        assert_eq!(snapshot.mean_velocity, state.leader().velocity());
    }

    #[test]
    fn flock_follows_moving_leader() {
        let mut state = SimulationState::with_seed(SimulationParams::default(), 5);
        for _ in 0..600 {
            state.step(vec3(1.0, 0.0, 0.0), 1.0 / 60.0);
        }

        let snapshot = state.snapshot();
        let start = state.params().leader_start();
        assert!(state.leader().position().x > start.x + 20.0);
        assert!(snapshot.centroid.x > start.x + 10.0);
        assert!(snapshot.mean_velocity.x > 0.0);
    }

    #[test]
    fn oversized_dt_is_clamped() {
        let mut a = SimulationState::with_seed(SimulationParams::default(), 6);
        let mut b = SimulationState::with_seed(SimulationParams::default(), 6);

        a.step(Vec3::Z, 5.0);
        b.step(Vec3::Z, crate::MAX_DT);
        assert_eq!(a.boids(), b.boids());
        assert_eq!(a.leader(), b.leader());
    }

    #[test]
    fn applied_params_take_effect_next_step() {
        let mut state = SimulationState::with_seed(SimulationParams::default(), 7);
        let params = SimulationParams {
            max_speed: 6.0,
            min_speed: 5.0,
            ..SimulationParams::default()
        };
        state.apply_params(params);

        state.step(Vec3::ZERO, 1.0 / 60.0);
        for boid in state.boids() {
            assert!(boid.speed() <= 6.0 + 1e-4);
            assert!(boid.speed() >= 5.0 - 1e-4);
        }
    }
}
