/*
 * Leader Module
 *
 * The player-driven agent. Its physics is a plain thrust and damping
 * integrator, independent of the steering forces the flock uses.
 */

use nannou::prelude::*;

use crate::boid::Boid;
use crate::params::SimulationParams;
use crate::vector::{clamp_magnitude, safe_normalize};

/// Flap rate of the leader's wings, in radians per second.
const LEADER_FLAP_RATE: f32 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Leader {
    pub boid: Boid,
}

impl Leader {
    pub fn new(position: Vec3) -> Self {
        let mut boid = Boid::new(position, Vec3::ZERO);
        boid.animation_rate = LEADER_FLAP_RATE;
        Self { boid }
    }

    pub fn position(&self) -> Vec3 {
        self.boid.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.boid.velocity
    }

    pub fn forward(&self) -> Vec3 {
        self.boid.forward
    }

    /// Advance one frame. `input` is the desired direction (any length;
    /// zero means no input).
    pub fn update(&mut self, input: Vec3, params: &SimulationParams, dt: f32) {
        let boid = &mut self.boid;

        let thrust = safe_normalize(input).map_or(Vec3::ZERO, |dir| dir * params.leader_thrust);
        boid.reset_acceleration();
        boid.apply_force(thrust);

        boid.velocity += boid.acceleration * dt * params.leader_gain;
        // Exponential decay toward rest when there is no input
        boid.velocity *= params.leader_damping;
        boid.velocity = clamp_magnitude(boid.velocity, params.leader_max_speed);

        boid.position += boid.velocity * dt;
        boid.advance_animation(dt);

        // Hold the old heading at crawling speed to avoid flicker
        if boid.speed() > params.leader_heading_threshold {
            if let Some(forward) = safe_normalize(boid.velocity) {
                boid.forward = forward;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thrust_accelerates_along_input() {
        let params = SimulationParams::default();
        let mut leader = Leader::new(Vec3::ZERO);

        leader.update(vec3(0.0, 0.0, -3.0), &params, 0.1);
        let v = leader.velocity();
        let expected = params.leader_thrust * 0.1 * params.leader_gain * params.leader_damping;
        assert!((v.z + expected).abs() < 1e-4);
        assert!(leader.position().z < 0.0);
        assert!((leader.forward() - vec3(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn speed_is_capped() {
        let params = SimulationParams::default();
        let mut leader = Leader::new(Vec3::ZERO);
        for _ in 0..500 {
            leader.update(Vec3::X, &params, 0.1);
            assert!(leader.velocity().length() <= params.leader_max_speed + 1e-4);
        }
    }

    #[test]
    fn coasts_to_rest_without_input() {
        let params = SimulationParams::default();
        let mut leader = Leader::new(Vec3::ZERO);
        leader.boid.velocity = vec3(10.0, 0.0, 0.0);

        let mut last_speed = leader.velocity().length();
        for _ in 0..200 {
            leader.update(Vec3::ZERO, &params, 1.0 / 60.0);
            let speed = leader.velocity().length();
            assert!(speed < last_speed);
            last_speed = speed;
        }
        assert!(last_speed < 0.01);
    }

    #[test]
    fn heading_holds_below_threshold() {
        let params = SimulationParams::default();
        let mut leader = Leader::new(Vec3::ZERO);
        leader.boid.forward = Vec3::X;
        leader.boid.velocity = vec3(0.0, 0.0, 0.01);

        leader.update(Vec3::ZERO, &params, 1.0 / 60.0);
        assert_eq!(leader.forward(), Vec3::X);
    }
}
