/*
 * Renderer Module
 *
 * This module draws the scene: the floor grid, the tower at the origin, the
 * flock and the leader. Geometry is built in each agent's local frame,
 * moved into the world by its orientation matrix, then projected to the
 * window with the camera's view-projection. Agents are drawn far to near.
 */

use nannou::prelude::*;
use std::f32::consts::TAU;

use crate::app::Model;
use crate::boid::Boid;
use crate::culling::{self, Projector};
use crate::ui;
use crate::{FLOOR_HALF_EXTENT, TOWER_HEIGHT, TOWER_RADIUS};

const GRID_SPACING: f32 = 10.0;
const GRID_SUBDIVISIONS: usize = 10;
const TOWER_SEGMENTS: usize = 16;
const WING_FLAP_AMPLITUDE: f32 = 0.5;
const LEADER_SCALE: f32 = 1.8;
const CULL_MARGIN: f32 = 0.1;

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();

    // Sky
    draw.background().color(rgb(0.5, 0.8, 0.9));

    let window_rect = app.window_rect();
    let state = &model.state;
    let snapshot = state.snapshot();
    let aspect = window_rect.w() / window_rect.h();
    let view_projection = model.camera.view_projection(state.leader(), &snapshot, aspect);
    let projector = Projector::new(view_projection, window_rect);

    draw_floor(&draw, &projector);
    draw_tower(&draw, &projector);

    let visible = culling::visible_agents(&projector, state.boids(), CULL_MARGIN);
    model.debug_info.visible_agents.set(visible.len());

    for &i in &visible {
        draw_agent(&draw, &projector, &state.boids()[i], 1.0, rgb(0.15, 0.15, 0.2));
    }
    draw_agent(&draw, &projector, &state.leader().boid, LEADER_SCALE, rgb(0.85, 0.2, 0.1));

    if model.ui_settings.show_debug {
        // Flock centroid marker
        if let Some(centroid) = projector.project(snapshot.centroid) {
            draw.ellipse()
                .xy(centroid.screen)
                .radius(4.0)
                .no_fill()
                .stroke(YELLOW)
                .stroke_weight(2.0);
        }

        ui::draw_debug_info(&draw, state, &model.camera, window_rect);
    }

    if let Err(err) = draw.to_frame(app, &frame) {
        tracing::warn!(?err, "failed to draw frame");
    }

    // Draw the egui UI
    if let Err(err) = model.egui.draw_to_frame(&frame) {
        tracing::warn!(?err, "failed to draw overlay");
    }
}

// Line split into short segments so a partially visible line still draws
fn draw_world_line(draw: &Draw, projector: &Projector, start: Vec3, end: Vec3, color: Rgba) {
    let points: Vec<Option<Vec2>> = (0..=GRID_SUBDIVISIONS)
        .map(|i| {
            let t = i as f32 / GRID_SUBDIVISIONS as f32;
            projector.project(start.lerp(end, t)).map(|p| p.screen)
        })
        .collect();

    for pair in points.windows(2) {
        if let [Some(a), Some(b)] = pair {
            draw.line().start(*a).end(*b).weight(1.0).color(color);
        }
    }
}

fn draw_floor(draw: &Draw, projector: &Projector) {
    let color = rgba(0.2, 0.5, 0.2, 1.0);
    let lines = (2.0 * FLOOR_HALF_EXTENT / GRID_SPACING) as usize;

    for i in 0..=lines {
        let offset = -FLOOR_HALF_EXTENT + i as f32 * GRID_SPACING;
        draw_world_line(
            draw,
            projector,
            vec3(offset, 0.0, -FLOOR_HALF_EXTENT),
            vec3(offset, 0.0, FLOOR_HALF_EXTENT),
            color,
        );
        draw_world_line(
            draw,
            projector,
            vec3(-FLOOR_HALF_EXTENT, 0.0, offset),
            vec3(FLOOR_HALF_EXTENT, 0.0, offset),
            color,
        );
    }
}

fn draw_tower(draw: &Draw, projector: &Projector) {
    let Some(apex) = projector.project(vec3(0.0, TOWER_HEIGHT, 0.0)) else {
        return;
    };

    for i in 0..TOWER_SEGMENTS {
        let a0 = i as f32 / TOWER_SEGMENTS as f32 * TAU;
        let a1 = (i + 1) as f32 / TOWER_SEGMENTS as f32 * TAU;
        let p0 = projector.project(vec3(TOWER_RADIUS * a0.cos(), 0.0, TOWER_RADIUS * a0.sin()));
        let p1 = projector.project(vec3(TOWER_RADIUS * a1.cos(), 0.0, TOWER_RADIUS * a1.sin()));

        if let (Some(p0), Some(p1)) = (p0, p1) {
            // Alternate shades so the cone reads as a solid
            let shade = if i % 2 == 0 { 0.7 } else { 0.6 };
            draw.polygon()
                .color(rgb(shade, shade, shade))
                .points([apex.screen, p0.screen, p1.screen]);
        }
    }
}

// Paper-plane body plus two flapping wings, in the agent's local frame
fn agent_triangles(flap: f32) -> [[Vec3; 3]; 3] {
    let lift = flap * WING_FLAP_AMPLITUDE;
    let nose = vec3(0.0, 0.0, 1.0);
    let tail = vec3(0.0, 0.0, -0.6);

    [
        [nose, vec3(-0.25, 0.0, -0.6), vec3(0.25, 0.0, -0.6)],
        [vec3(0.0, 0.0, 0.3), tail, vec3(-1.0, lift, -0.2)],
        [vec3(0.0, 0.0, 0.3), tail, vec3(1.0, lift, -0.2)],
    ]
}

fn draw_agent(draw: &Draw, projector: &Projector, boid: &Boid, scale: f32, color: Rgb) {
    let model_matrix = boid.orientation() * Mat4::from_scale(Vec3::splat(scale));

    for triangle in agent_triangles(boid.wing_flap()) {
        let projected: Option<Vec<Vec2>> = triangle
            .iter()
            .map(|&local| projector.project(model_matrix.transform_point3(local)).map(|p| p.screen))
            .collect();

        if let Some(points) = projected {
            draw.polygon().color(color).points(points);
        }
    }
}
