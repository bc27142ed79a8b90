/*
 * Neighbors Module
 *
 * The seam between the flock step and whatever indexes agent positions.
 * Steering formulas only ever see the neighbor indices a query produces,
 * so swapping the brute-force scan for the spatial grid changes speed,
 * never results.
 */

use crate::boid::Boid;

pub trait NeighborQuery {
    /// Appends to `out` the indices of every agent within `radius` of
    /// `agents[index]`, excluding `index` itself.
    fn neighbors(&self, agents: &[Boid], index: usize, radius: f32, out: &mut Vec<usize>);
}

/// Full O(N) scan per query.
#[derive(Debug, Default, Clone, Copy)]
pub struct BruteForce;

impl NeighborQuery for BruteForce {
    fn neighbors(&self, agents: &[Boid], index: usize, radius: f32, out: &mut Vec<usize>) {
        let position = agents[index].position;
        let radius_sq = radius * radius;

        out.extend(
            agents
                .iter()
                .enumerate()
                .filter(|&(i, other)| i != index && position.distance_squared(other.position) <= radius_sq)
                .map(|(i, _)| i),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nannou::prelude::*;

    #[test]
    fn brute_force_excludes_self_and_far_agents() {
        let agents = vec![
            Boid::new(Vec3::ZERO, Vec3::Z),
            Boid::new(vec3(1.0, 0.0, 0.0), Vec3::Z),
            Boid::new(vec3(0.0, 0.0, 5.0), Vec3::Z),
            Boid::new(vec3(0.0, 20.0, 0.0), Vec3::Z),
        ];

        let mut out = Vec::new();
        BruteForce.neighbors(&agents, 0, 5.0, &mut out);
        assert_eq!(out, vec![1, 2]);
    }
}
