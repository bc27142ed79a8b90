/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct that holds every tuning
 * constant of the flock and the leader. Parameters are loaded once from a
 * TOML file and stay immutable until an explicit reload, which is driven by
 * ParamsSource polling the file's modification time.
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use nannou::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming the parameter file.
pub const CONFIG_ENV_VAR: &str = "LEADER_FLOCK_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "flock.toml";
/// Smaller grid cells make every neighbor query visit a cubic block of
/// `(2 * radius / cell + 1)^3` cells.
pub const MIN_CELL_SIZE_FACTOR: f32 = 0.1;

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse parameters: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid parameters: {0}")]
    Invalid(String),
}

// Tuning parameters for the flock and the leader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    // Neighborhood
    pub perception_radius: f32,
    pub separation_radius: f32,

    // Flock agent limits
    pub min_speed: f32,
    pub max_speed: f32,
    pub max_force: f32,
    pub integration_gain: f32,

    // Behavior weights
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub goal_weight: f32,
    pub floor_weight: f32,
    pub floor_height: f32,

    // Leader
    pub leader_thrust: f32,
    pub leader_gain: f32,
    pub leader_damping: f32,
    pub leader_max_speed: f32,
    pub leader_heading_threshold: f32,
    pub leader_start: [f32; 3],

    // Spawning
    pub spawn_radius: f32,
    pub flap_rate_min: f32,
    pub flap_rate_max: f32,
    pub initial_flock_size: usize,

    // Performance settings
    pub enable_parallel: bool,
    pub enable_spatial_grid: bool,
    pub cell_size_factor: f32, // Multiplier for cell size relative to the query radius
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            perception_radius: 10.0,
            separation_radius: 3.0,
            min_speed: 4.0,
            max_speed: 12.0,
            max_force: 8.0,
            integration_gain: 5.0,
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            goal_weight: 1.2,
            floor_weight: 10.0,
            floor_height: 5.0,
            leader_thrust: 40.0,
            leader_gain: 1.0,
            leader_damping: 0.95,
            leader_max_speed: 15.0,
            leader_heading_threshold: 0.1,
            leader_start: [0.0, 10.0, 0.0],
            spawn_radius: 2.0,
            flap_rate_min: 6.0,
            flap_rate_max: 10.0,
            initial_flock_size: 20,
            enable_parallel: true,
            enable_spatial_grid: false,
            cell_size_factor: 1.0,
        }
    }
}

impl SimulationParams {
    pub fn from_toml_str(source: &str) -> Result<Self, ParamsError> {
        let params: SimulationParams = toml::from_str(source)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_file(path: &Path) -> Result<Self, ParamsError> {
        let source = fs::read_to_string(path).map_err(|source| ParamsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        let positive = [
            ("perception_radius", self.perception_radius),
            ("separation_radius", self.separation_radius),
            ("min_speed", self.min_speed),
            ("max_speed", self.max_speed),
            ("max_force", self.max_force),
            ("leader_max_speed", self.leader_max_speed),
            ("cell_size_factor", self.cell_size_factor),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ParamsError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }

        if self.cell_size_factor < MIN_CELL_SIZE_FACTOR {
            return Err(ParamsError::Invalid(format!(
                "cell_size_factor must be at least {MIN_CELL_SIZE_FACTOR}, got {}",
                self.cell_size_factor
            )));
        }
        if self.min_speed > self.max_speed {
            return Err(ParamsError::Invalid(format!(
                "min_speed ({}) exceeds max_speed ({})",
                self.min_speed, self.max_speed
            )));
        }
        if !(self.leader_damping > 0.0 && self.leader_damping <= 1.0) {
            return Err(ParamsError::Invalid(format!(
                "leader_damping must be in (0, 1], got {}",
                self.leader_damping
            )));
        }
        if self.integration_gain < 0.0 || self.leader_gain < 0.0 || self.leader_thrust < 0.0 {
            return Err(ParamsError::Invalid("gains and thrust must not be negative".into()));
        }
        if self.spawn_radius < 0.0 {
            return Err(ParamsError::Invalid("spawn_radius must not be negative".into()));
        }
        if !(self.flap_rate_min >= 0.0 && self.flap_rate_min <= self.flap_rate_max) {
            return Err(ParamsError::Invalid(format!(
                "flap rates must satisfy 0 <= min <= max, got {}..{}",
                self.flap_rate_min, self.flap_rate_max
            )));
        }

        Ok(())
    }

    pub fn leader_start(&self) -> Vec3 {
        let [x, y, z] = self.leader_start;
        vec3(x, y, z)
    }

    /// Radius used to gather neighbors; each behavior filters by its own.
    pub fn query_radius(&self) -> f32 {
        self.perception_radius.max(self.separation_radius)
    }
}

/// A parameter file on disk, reloaded when its modification time changes.
pub struct ParamsSource {
    path: PathBuf,
    modified: Option<SystemTime>,
}

impl ParamsSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            modified: None,
        }
    }

    /// Path from `LEADER_FLOCK_CONFIG`, or `flock.toml` in the working directory.
    pub fn from_env() -> Self {
        let path = std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads and validates the file unconditionally.
    pub fn load(&mut self) -> Result<SimulationParams, ParamsError> {
        self.modified = self.modified_time();
        let params = SimulationParams::from_file(&self.path)?;
        info!(path = %self.path.display(), "loaded simulation parameters");
        Ok(params)
    }

    /// Reloads only when the file changed since the last load.
    pub fn reload_if_changed(&mut self) -> Option<Result<SimulationParams, ParamsError>> {
        let modified = self.modified_time()?;
        if self.modified == Some(modified) {
            return None;
        }

        debug!(path = %self.path.display(), "parameter file changed");
        Some(self.load())
    }

    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|meta| meta.modified()).ok()
    }
}
