/*
 * Camera Module
 *
 * This module defines the Camera struct and its three viewing modes. The
 * camera only reads simulation output (leader state and the flock
 * snapshot) and turns it into a view-projection matrix.
 */

use nannou::prelude::*;

use crate::leader::Leader;
use crate::physics::FlockSnapshot;
use crate::vector::safe_normalize;

const OVERVIEW_EYE: [f32; 3] = [0.0, 15.0, 25.0];
const FOLLOW_DISTANCE: f32 = 25.0;
const FOLLOW_HEIGHT: f32 = 10.0;
const CHASE_DISTANCE: f32 = 12.0;
const CHASE_HEIGHT: f32 = 4.0;
const CHASE_LOOK_AHEAD: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Overview,
    FollowFlock,
    ChaseLeader,
}

impl CameraMode {
    pub fn next(self) -> Self {
        match self {
            CameraMode::Overview => CameraMode::FollowFlock,
            CameraMode::FollowFlock => CameraMode::ChaseLeader,
            CameraMode::ChaseLeader => CameraMode::Overview,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CameraMode::Overview => "Overview",
            CameraMode::FollowFlock => "Follow flock",
            CameraMode::ChaseLeader => "Chase leader",
        }
    }
}

pub struct Camera {
    pub mode: CameraMode,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        Self {
            mode: CameraMode::Overview,
            fov_y: 45.0_f32.to_radians(),
            near: 0.1,
            far: 200.0,
        }
    }

    pub fn cycle_mode(&mut self) -> CameraMode {
        self.mode = self.mode.next();
        self.mode
    }

    // Where the camera sits and what it looks at for the current mode
    pub fn eye_and_target(&self, leader: &Leader, snapshot: &FlockSnapshot) -> (Vec3, Vec3) {
        match self.mode {
            CameraMode::Overview => {
                let [x, y, z] = OVERVIEW_EYE;
                (vec3(x, y, z), Vec3::ZERO)
            }
            CameraMode::FollowFlock => {
                let heading = horizontal_heading(snapshot.mean_velocity)
                    .or_else(|| horizontal_heading(leader.forward()))
                    .unwrap_or(Vec3::Z);
                let eye = snapshot.centroid - heading * FOLLOW_DISTANCE + Vec3::Y * FOLLOW_HEIGHT;
                (eye, snapshot.centroid)
            }
            CameraMode::ChaseLeader => {
                let heading = horizontal_heading(leader.forward()).unwrap_or(Vec3::Z);
                let eye = leader.position() - heading * CHASE_DISTANCE + Vec3::Y * CHASE_HEIGHT;
                (eye, leader.position() + heading * CHASE_LOOK_AHEAD)
            }
        }
    }

    pub fn view_projection(&self, leader: &Leader, snapshot: &FlockSnapshot, aspect: f32) -> Mat4 {
        let (eye, target) = self.eye_and_target(leader, snapshot);
        let projection = Mat4::perspective_rh_gl(self.fov_y, aspect.max(f32::EPSILON), self.near, self.far);
        projection * Mat4::look_at_rh(eye, target, Vec3::Y)
    }
}

// Heading flattened onto the floor plane, so the camera never rolls
fn horizontal_heading(v: Vec3) -> Option<Vec3> {
    safe_normalize(vec3(v.x, 0.0, v.z))
}
