/*
 * Application Module
 *
 * This module defines the main application model and the per-frame driver.
 * Each frame it:
 * - Runs the egui overlay and applies any button actions
 * - Polls the parameter file and hot-reloads it when it changes
 * - Turns held keys into the leader's input and steps the simulation once
 *   with the frame delta (clamped inside the simulation)
 */

use std::time::Instant;

use nannou::prelude::*;
use nannou_egui::Egui;
use tracing::{info, warn};

use crate::camera::Camera;
use crate::debug::DebugInfo;
use crate::input::{self, Command, CommandKeys};
use crate::params::{ParamsError, ParamsSource, SimulationParams};
use crate::renderer;
use crate::simulation::SimulationState;
use crate::ui::{self, UiSettings};

// Main model for the application
pub struct Model {
    pub state: SimulationState,
    pub params_source: ParamsSource,
    pub egui: Egui,
    pub ui_settings: UiSettings,
    pub debug_info: DebugInfo,
    pub camera: Camera,
    pub command_keys: CommandKeys,
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let window_id = app
        .new_window()
        .title("Leader Flock")
        .size(1280, 720)
        .view(renderer::view)
        .key_pressed(input::key_pressed)
        .key_released(input::key_released)
        .raw_event(input::raw_window_event)
        .build()
        .expect("failed to build window");

    let window = app.window(window_id).expect("window was just created");
    let egui = Egui::from_window(&window);

    let mut params_source = ParamsSource::from_env();
    let mut debug_info = DebugInfo::default();
    let params = load_initial_params(&mut params_source, &mut debug_info);

    Model {
        state: SimulationState::new(params),
        params_source,
        egui,
        ui_settings: UiSettings::default(),
        debug_info,
        camera: Camera::new(),
        command_keys: CommandKeys::default(),
    }
}

// Missing or broken parameter files fall back to defaults
fn load_initial_params(source: &mut ParamsSource, debug_info: &mut DebugInfo) -> SimulationParams {
    if !source.exists() {
        info!(path = %source.path().display(), "no parameter file, using defaults");
        return SimulationParams::default();
    }

    match source.load() {
        Ok(params) => {
            debug_info.params_status = String::from("loaded");
            params
        }
        Err(err) => {
            warn!(error = %err, "failed to load parameters, using defaults");
            debug_info.params_status = err.to_string();
            SimulationParams::default()
        }
    }
}

fn apply_reload(model: &mut Model, result: Result<SimulationParams, ParamsError>) {
    match result {
        Ok(params) => {
            model.state.apply_params(params);
            model.debug_info.params_status = String::from("reloaded");
        }
        Err(err) => {
            // Keep running with the previous parameters
            warn!(error = %err, "parameter reload failed");
            model.debug_info.params_status = err.to_string();
        }
    }
}

pub fn apply_command(model: &mut Model, command: Command) {
    match command {
        Command::Spawn => {
            model.state.spawn();
        }
        Command::Despawn => {
            model.state.despawn();
        }
        Command::CycleCamera => {
            let mode = model.camera.cycle_mode();
            info!(mode = mode.label(), "camera mode changed");
        }
        Command::ReloadParams => {
            let result = model.params_source.load();
            apply_reload(model, result);
        }
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;

    let actions = ui::update_ui(
        &mut model.egui,
        &mut model.ui_settings,
        &model.state,
        &model.camera,
        &model.debug_info,
        model.params_source.path(),
    );

    let requested = [
        (actions.spawn, Command::Spawn),
        (actions.despawn, Command::Despawn),
        (actions.cycle_camera, Command::CycleCamera),
        (actions.reload_params, Command::ReloadParams),
    ];
    for (clicked, command) in requested {
        if clicked {
            apply_command(model, command);
        }
    }

    // Hot reload when the file changes on disk
    if let Some(result) = model.params_source.reload_if_changed() {
        apply_reload(model, result);
    }

    if model.ui_settings.pause_simulation {
        return;
    }

    let leader_input = input::leader_direction(|key| app.keys.down.contains(&key));
    let started = Instant::now();
    model.state.step(leader_input, update.since_last.as_secs_f32());
    model.debug_info.step_time = started.elapsed();
}
