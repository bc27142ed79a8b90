/*
 * UI Module
 *
 * This module contains functions for the debug overlay: an egui window with
 * flock statistics and command buttons, and an on-screen text panel drawn
 * with nannou showing the leader and flock aggregates.
 */

use std::path::Path;

use nannou::prelude::*;
use nannou_egui::{egui, Egui};

use crate::camera::Camera;
use crate::debug::DebugInfo;
use crate::simulation::SimulationState;

// Overlay toggles that do not belong to the simulation parameters
pub struct UiSettings {
    pub show_debug: bool,
    pub pause_simulation: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            show_debug: true,
            pause_simulation: false,
        }
    }
}

// Buttons clicked this frame
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UiActions {
    pub spawn: bool,
    pub despawn: bool,
    pub reload_params: bool,
    pub cycle_camera: bool,
}

fn format_vec3(v: Vec3) -> String {
    format!("({:.1}, {:.1}, {:.1})", v.x, v.y, v.z)
}

// Update the UI and return the actions requested this frame
pub fn update_ui(
    egui: &mut Egui,
    settings: &mut UiSettings,
    state: &SimulationState,
    camera: &Camera,
    debug_info: &DebugInfo,
    params_path: &Path,
) -> UiActions {
    let mut actions = UiActions::default();
    let snapshot = state.snapshot();
    let leader = state.leader();

    let ctx = egui.begin_frame();

    egui::Window::new("Flock Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Flock", |ui| {
                ui.label(format!("Flock size: {}", state.flock_size()));
                ui.horizontal(|ui| {
                    if ui.button("Spawn (=)").clicked() {
                        actions.spawn = true;
                    }
                    if ui.button("Despawn (-)").clicked() {
                        actions.despawn = true;
                    }
                });
                ui.label(format!("Centroid: {}", format_vec3(snapshot.centroid)));
                ui.label(format!("Mean velocity: {}", format_vec3(snapshot.mean_velocity)));
            });

            ui.collapsing("Leader", |ui| {
                ui.label("Move: WASD / arrows, Space up, Shift down");
                ui.label(format!("Position: {}", format_vec3(leader.position())));
                ui.label(format!("Forward: {}", format_vec3(leader.forward())));
                ui.label(format!("Speed: {:.2}", leader.velocity().length()));
            });

            ui.collapsing("Camera", |ui| {
                ui.label(format!("Mode: {}", camera.mode.label()));
                if ui.button("Next mode (C)").clicked() {
                    actions.cycle_camera = true;
                }
            });

            ui.collapsing("Parameters", |ui| {
                ui.label(format!("File: {}", params_path.display()));
                ui.label(format!("Status: {}", debug_info.params_status));
                if ui.button("Reload (R)").clicked() {
                    actions.reload_params = true;
                }
            });

            ui.collapsing("Performance", |ui| {
                ui.label(format!("FPS: {:.1}", debug_info.fps));
                ui.label(format!("Frame time: {:.2} ms", debug_info.frame_time.as_secs_f64() * 1000.0));
                ui.label(format!("Step time: {:.3} ms", debug_info.step_time.as_secs_f64() * 1000.0));
                ui.label(format!("Visible agents: {}", debug_info.visible_agents.get()));
            });

            ui.checkbox(&mut settings.show_debug, "Show Debug Info");
            ui.checkbox(&mut settings.pause_simulation, "Pause Simulation");
        });

    actions
}

// Draw leader and flock readouts in the bottom-left corner
pub fn draw_debug_info(draw: &Draw, state: &SimulationState, camera: &Camera, window_rect: Rect) {
    let margin = 20.0;
    let line_height = 20.0;
    let panel_width = 320.0;

    let snapshot = state.snapshot();
    let leader = state.leader();
    let debug_texts = [
        format!("Camera: {}", camera.mode.label()),
        format!("Boids: {}", state.flock_size()),
        format!("Leader: {}", format_vec3(leader.position())),
        format!("Heading: {}", format_vec3(leader.forward())),
        format!("Flock center: {}", format_vec3(snapshot.centroid)),
    ];

    let panel_height = line_height * debug_texts.len() as f32 + margin;
    draw.rect()
        .x_y(window_rect.left() + panel_width / 2.0, window_rect.bottom() + panel_height / 2.0)
        .w_h(panel_width, panel_height)
        .color(rgba(0.0, 0.0, 0.0, 0.6));

    let text_y = window_rect.bottom() + panel_height - margin;
    for (i, text) in debug_texts.iter().enumerate() {
        let y = text_y - i as f32 * line_height;
        draw.text(text)
            .x_y(window_rect.left() + panel_width / 2.0, y)
            .w(panel_width - margin)
            .left_justify()
            .color(WHITE)
            .font_size(14);
    }
}
