/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid struct for faster neighbor lookups.
 * Space is divided into uniform cubic cells keyed by integer coordinates,
 * so the flock can roam the unbounded world without a fixed grid extent.
 * The grid is rebuilt from the pre-step snapshot every step.
 *
 * A query visits only the block of cells that can contain agents within
 * the radius, then filters by exact squared distance, so it returns the
 * same set as the brute-force scan.
 */

use std::collections::HashMap;

use nannou::prelude::*;

use crate::boid::Boid;
use crate::neighbors::NeighborQuery;

type Cell = (i32, i32, i32);

pub struct SpatialGrid {
    pub cell_size: f32,
    pub grid: HashMap<Cell, Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(f32::EPSILON),
            grid: HashMap::new(),
        }
    }

    pub fn build(cell_size: f32, agents: &[Boid]) -> Self {
        let mut grid = Self::new(cell_size);
        for (i, agent) in agents.iter().enumerate() {
            grid.insert(i, agent.position);
        }
        grid
    }

    // Convert world coordinates to grid cell coordinates
    #[inline]
    pub fn pos_to_cell(&self, pos: Vec3) -> Cell {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
            (pos.z / self.cell_size).floor() as i32,
        )
    }

    // Insert an agent into the grid
    #[inline]
    pub fn insert(&mut self, index: usize, position: Vec3) {
        let cell = self.pos_to_cell(position);
        self.grid.entry(cell).or_default().push(index);
    }
}

impl NeighborQuery for SpatialGrid {
    fn neighbors(&self, agents: &[Boid], index: usize, radius: f32, out: &mut Vec<usize>) {
        let position = agents[index].position;
        let radius_sq = radius * radius;
        let (cx, cy, cz) = self.pos_to_cell(position);

        // Number of cells the radius can reach in each direction
        let reach = (radius / self.cell_size).ceil().max(1.0) as i32;

        for x in (cx - reach)..=(cx + reach) {
            for y in (cy - reach)..=(cy + reach) {
                for z in (cz - reach)..=(cz + reach) {
                    let Some(cell) = self.grid.get(&(x, y, z)) else {
                        continue;
                    };

                    out.extend(cell.iter().copied().filter(|&i| {
                        i != index && position.distance_squared(agents[i].position) <= radius_sq
                    }));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighbors::BruteForce;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn negative_coordinates_floor_into_their_own_cell() {
        let grid = SpatialGrid::new(10.0);
        assert_eq!(grid.pos_to_cell(vec3(-0.5, 0.5, 19.9)), (-1, 0, 1));
    }

    #[test]
    fn matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(42);
        let agents: Vec<Boid> = (0..200)
            .map(|_| {
                let p = vec3(
                    rng.gen_range(-30.0..30.0),
                    rng.gen_range(0.0..20.0),
                    rng.gen_range(-30.0..30.0),
                );
                Boid::new(p, Vec3::Z)
            })
            .collect();

        // Cell sizes smaller, equal to and larger than the radius
        for cell_size in [2.5, 10.0, 25.0] {
            let grid = SpatialGrid::build(cell_size, &agents);
            for index in 0..agents.len() {
                let mut expected = Vec::new();
                BruteForce.neighbors(&agents, index, 10.0, &mut expected);
                let mut actual = Vec::new();
                grid.neighbors(&agents, index, 10.0, &mut actual);

                actual.sort_unstable();
                assert_eq!(actual, expected, "cell size {cell_size}, agent {index}");
            }
        }
    }
}
