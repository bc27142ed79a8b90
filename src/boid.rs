/*
 * Boid Module
 *
 * This module defines the Boid struct: the kinematic state shared by the
 * leader and every flock member, plus the wing-flap oscillator used by the
 * renderer. Forces are computed elsewhere (see steering.rs); a Boid only
 * accumulates them and exposes its facing transform.
 */

use nannou::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use crate::orientation::build_orientation;
use crate::params::SimulationParams;
use crate::vector::safe_normalize;

#[derive(Debug, Clone, PartialEq)]
pub struct Boid {
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    // Last non-degenerate heading, unit length
    pub forward: Vec3,
    pub animation_phase: f32,
    pub animation_rate: f32,
}

impl Boid {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        let forward = safe_normalize(velocity).unwrap_or(Vec3::Z);

        Self {
            position,
            velocity,
            acceleration: Vec3::ZERO,
            forward,
            animation_phase: 0.0,
            animation_rate: 0.0,
        }
    }

    // Create a flock member near `center` with random heading and flap phase
    pub fn spawn_near<R: Rng>(center: Vec3, params: &SimulationParams, rng: &mut R) -> Self {
        let offset = random_unit(rng) * rng.gen_range(0.0..=params.spawn_radius);
        let velocity = random_unit(rng) * params.min_speed;

        let mut boid = Self::new(center + offset, velocity);
        boid.animation_phase = rng.gen_range(0.0..TAU);
        boid.animation_rate = rng.gen_range(params.flap_rate_min..=params.flap_rate_max);
        boid
    }

    // Apply a force to the boid
    pub fn apply_force(&mut self, force: Vec3) {
        self.acceleration += force;
    }

    pub fn reset_acceleration(&mut self) {
        self.acceleration = Vec3::ZERO;
    }

    pub fn advance_animation(&mut self, dt: f32) {
        self.animation_phase += self.animation_rate * dt;
    }

    /// Wing deflection in [-1, 1] for the current flap phase.
    pub fn wing_flap(&self) -> f32 {
        self.animation_phase.sin()
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn orientation(&self) -> Mat4 {
        build_orientation(self.position, self.forward)
    }
}

// Uniformly distributed direction, rejection sampled from the unit cube
fn random_unit<R: Rng>(rng: &mut R) -> Vec3 {
    loop {
        let v = vec3(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let length_squared = v.length_squared();
        if length_squared > 1e-4 && length_squared <= 1.0 {
            return v / length_squared.sqrt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn new_boid_faces_its_velocity() {
        let boid = Boid::new(Vec3::ZERO, vec3(0.0, 0.0, -3.0));
        assert_eq!(boid.forward, vec3(0.0, 0.0, -1.0));

        let still = Boid::new(Vec3::ZERO, Vec3::ZERO);
        assert_eq!(still.forward, Vec3::Z);
    }

    #[test]
    fn spawned_boid_is_near_center_at_min_speed() {
        let params = SimulationParams::default();
        let mut rng = StdRng::seed_from_u64(7);
        let center = vec3(5.0, 10.0, -5.0);

        for _ in 0..50 {
            let boid = Boid::spawn_near(center, &params, &mut rng);
            assert!(boid.position.distance(center) <= params.spawn_radius + 1e-4);
            assert!((boid.speed() - params.min_speed).abs() < 1e-4);
            assert!(boid.animation_rate >= params.flap_rate_min);
            assert!(boid.animation_rate <= params.flap_rate_max);
            assert!((0.0..TAU).contains(&boid.animation_phase));
        }
    }

    #[test]
    fn animation_advances_by_rate() {
        let mut boid = Boid::new(Vec3::ZERO, Vec3::Z);
        boid.animation_rate = 8.0;
        boid.advance_animation(0.25);
        assert!((boid.animation_phase - 2.0).abs() < 1e-6);
    }

    #[test]
    fn forces_accumulate_until_reset() {
        let mut boid = Boid::new(Vec3::ZERO, Vec3::Z);
        boid.apply_force(vec3(1.0, 0.0, 0.0));
        boid.apply_force(vec3(0.0, 2.0, 0.0));
        assert_eq!(boid.acceleration, vec3(1.0, 2.0, 0.0));

        boid.reset_acceleration();
        assert_eq!(boid.acceleration, Vec3::ZERO);
    }
}
