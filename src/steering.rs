/*
 * Steering Module
 *
 * Force contributions for a single agent. Each behavior follows Reynolds:
 * Steering = Desired - Velocity, with desired velocity at max speed and the
 * result limited to max force. The functions are pure: they read the agent
 * and its neighbors from the pre-step snapshot and return an unweighted
 * force, leaving integration to physics.rs.
 */

use nannou::prelude::*;

use crate::boid::Boid;
use crate::params::SimulationParams;
use crate::vector::{clamp_magnitude, safe_normalize};

/// Added to the squared distance so the inverse-square push stays bounded
/// for neighbors that nearly overlap. Exactly coincident neighbors are skipped.
pub const SEPARATION_EPSILON: f32 = 1e-4;

// Velocity-matching force toward a desired direction
fn steer_along(agent: &Boid, direction: Vec3, params: &SimulationParams) -> Vec3 {
    match safe_normalize(direction) {
        Some(direction) => {
            let desired = direction * params.max_speed;
            clamp_magnitude(desired - agent.velocity, params.max_force)
        }
        None => Vec3::ZERO,
    }
}

/// Seek toward `target` at full speed. No arrival slowdown near the target.
pub fn steer_towards(agent: &Boid, target: Vec3, params: &SimulationParams) -> Vec3 {
    steer_along(agent, target - agent.position, params)
}

/// Raw inverse-square push away from neighbors inside the separation radius.
pub fn separation_push(agent: &Boid, neighbors: &[&Boid], params: &SimulationParams) -> Vec3 {
    let radius_sq = params.separation_radius * params.separation_radius;

    neighbors
        .iter()
        .filter_map(|other| {
            let diff = agent.position - other.position;
            let d_squared = diff.length_squared();
            if d_squared > 0.0 && d_squared < radius_sq {
                safe_normalize(diff).map(|away| away / (d_squared + SEPARATION_EPSILON))
            } else {
                None
            }
        })
        .fold(Vec3::ZERO, |sum, push| sum + push)
}

pub fn separation(agent: &Boid, neighbors: &[&Boid], params: &SimulationParams) -> Vec3 {
    steer_along(agent, separation_push(agent, neighbors, params), params)
}

pub fn alignment(agent: &Boid, neighbors: &[&Boid], params: &SimulationParams) -> Vec3 {
    let radius_sq = params.perception_radius * params.perception_radius;
    let mut heading = Vec3::ZERO;
    let mut count = 0;

    for other in neighbors {
        if agent.position.distance_squared(other.position) < radius_sq {
            heading += other.velocity;
            count += 1;
        }
    }

    if count == 0 {
        return Vec3::ZERO;
    }

    steer_along(agent, heading / count as f32, params)
}

pub fn cohesion(agent: &Boid, neighbors: &[&Boid], params: &SimulationParams) -> Vec3 {
    let radius_sq = params.perception_radius * params.perception_radius;
    let mut center = Vec3::ZERO;
    let mut count = 0;

    for other in neighbors {
        if agent.position.distance_squared(other.position) < radius_sq {
            center += other.position;
            count += 1;
        }
    }

    if count == 0 {
        return Vec3::ZERO;
    }

    steer_towards(agent, center / count as f32, params)
}

/// Pulls the agent up when it flies below the floor height. Not clamped to
/// max force.
pub fn floor_avoidance(agent: &Boid, params: &SimulationParams) -> Vec3 {
    if agent.position.y >= params.floor_height {
        return Vec3::ZERO;
    }

    let desired = vec3(agent.velocity.x, params.max_speed, agent.velocity.z);
    desired - agent.velocity
}

/// The unweighted contribution of every behavior for one agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringForces {
    pub separation: Vec3,
    pub alignment: Vec3,
    pub cohesion: Vec3,
    pub goal: Vec3,
    pub floor: Vec3,
}

impl SteeringForces {
    pub fn compute(agent: &Boid, neighbors: &[&Boid], goal: Vec3, params: &SimulationParams) -> Self {
        Self {
            separation: separation(agent, neighbors, params),
            alignment: alignment(agent, neighbors, params),
            cohesion: cohesion(agent, neighbors, params),
            goal: steer_towards(agent, goal, params),
            floor: floor_avoidance(agent, params),
        }
    }

    /// Weighted sum, limited to max force as a whole.
    pub fn total(&self, params: &SimulationParams) -> Vec3 {
        let combined = self.separation * params.separation_weight
            + self.alignment * params.alignment_weight
            + self.cohesion * params.cohesion_weight
            + self.goal * params.goal_weight
            + self.floor * params.floor_weight;

        clamp_magnitude(combined, params.max_force)
    }
}
