/*
 * Leader Flock - Module Definitions
 *
 * This file defines the module structure of the flock simulation. The
 * simulation core (vector, orientation, boid, neighbors, spatial_grid,
 * steering, physics, leader, simulation, params) has no dependency on the
 * window; the remaining modules are the nannou demo shell around it.
 */

// Re-export key components for easier access
pub use app::Model;
pub use boid::Boid;
pub use camera::{Camera, CameraMode};
pub use leader::Leader;
pub use params::{ParamsError, ParamsSource, SimulationParams};
pub use physics::FlockSnapshot;
pub use simulation::SimulationState;
pub use spatial_grid::SpatialGrid;

// Simulation core
pub mod boid;
pub mod leader;
pub mod neighbors;
pub mod orientation;
pub mod params;
pub mod physics;
pub mod simulation;
pub mod spatial_grid;
pub mod steering;
pub mod vector;

// Demo shell
pub mod app;
pub mod camera;
pub mod culling;
pub mod debug;
pub mod input;
pub mod renderer;
pub mod ui;

// Constants
/// Largest time step the simulation integrates, in seconds.
pub const MAX_DT: f32 = 0.1;
/// Below this length a vector has no usable direction.
pub const EPSILON: f32 = 1e-6;

// Terrain: a square floor at y = 0 with a cone tower at the origin
pub const FLOOR_HALF_EXTENT: f32 = 50.0;
pub const TOWER_RADIUS: f32 = 2.0;
pub const TOWER_HEIGHT: f32 = 5.0;
