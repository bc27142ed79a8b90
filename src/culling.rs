/*
 * Culling Module
 *
 * This module projects world points to screen space and decides which
 * agents are worth drawing. Points behind the camera have no screen
 * position; points outside the view volume (plus a margin) are culled.
 */

use nannou::prelude::*;

use crate::boid::Boid;

/// Smallest clip-space w still treated as in front of the camera.
const MIN_CLIP_W: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub screen: Vec2,
    // Distance along the view direction, used for back-to-front sorting
    pub depth: f32,
}

pub struct Projector {
    view_projection: Mat4,
    center: Vec2,
    half_size: Vec2,
}

impl Projector {
    pub fn new(view_projection: Mat4, window_rect: Rect) -> Self {
        Self {
            view_projection,
            center: window_rect.xy(),
            half_size: vec2(window_rect.w(), window_rect.h()) / 2.0,
        }
    }

    pub fn project(&self, point: Vec3) -> Option<Projected> {
        let clip = self.view_projection * point.extend(1.0);
        if !(clip.w > MIN_CLIP_W) {
            return None;
        }

        let ndc = clip.truncate() / clip.w;
        Some(Projected {
            screen: self.center + vec2(ndc.x, ndc.y) * self.half_size,
            depth: clip.w,
        })
    }

    // Is the point inside the view volume, with `margin` in NDC units?
    pub fn is_visible(&self, point: Vec3, margin: f32) -> bool {
        let clip = self.view_projection * point.extend(1.0);
        if !(clip.w > MIN_CLIP_W) {
            return false;
        }

        let ndc = clip.truncate() / clip.w;
        let limit = 1.0 + margin;
        ndc.x.abs() <= limit && ndc.y.abs() <= limit && ndc.z.abs() <= 1.0
    }
}

/// Indices of visible agents, sorted far to near.
pub fn visible_agents(projector: &Projector, boids: &[Boid], margin: f32) -> Vec<usize> {
    let mut visible: Vec<(usize, f32)> = boids
        .iter()
        .enumerate()
        .filter(|(_, boid)| projector.is_visible(boid.position, margin))
        .filter_map(|(i, boid)| projector.project(boid.position).map(|p| (i, p.depth)))
        .collect();

    visible.sort_by(|a, b| b.1.total_cmp(&a.1));
    visible.into_iter().map(|(i, _)| i).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projector() -> Projector {
        let projection = Mat4::perspective_rh_gl(45.0_f32.to_radians(), 1.0, 0.1, 200.0);
        let view = Mat4::look_at_rh(vec3(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        Projector::new(projection * view, Rect::from_w_h(800.0, 800.0))
    }

    #[test]
    fn points_behind_camera_are_culled() {
        let projector = projector();
        assert!(projector.project(vec3(0.0, 0.0, 20.0)).is_none());
        assert!(!projector.is_visible(vec3(0.0, 0.0, 20.0), 0.1));
    }

    #[test]
    fn look_target_lands_at_window_center() {
        let projected = projector().project(Vec3::ZERO).unwrap();
        assert!(projected.screen.length() < 1e-3);
        assert!((projected.depth - 10.0).abs() < 1e-3);
    }

    #[test]
    fn visible_agents_are_sorted_far_to_near() {
        let boids = vec![
            Boid::new(vec3(0.0, 0.0, 5.0), Vec3::Z),
            Boid::new(vec3(0.0, 0.0, -20.0), Vec3::Z),
            Boid::new(vec3(500.0, 0.0, 0.0), Vec3::Z),
            Boid::new(vec3(0.0, 0.0, 0.0), Vec3::Z),
        ];

        assert_eq!(visible_agents(&projector(), &boids, 0.1), vec![1, 3, 0]);
    }
}
