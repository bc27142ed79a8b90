/*
 * Orientation Module
 *
 * Builds the model transform for an agent from its position and facing.
 * The rotation maps local +Z onto the forward direction, with a world-up
 * reference that is swapped out when forward is nearly vertical.
 */

use nannou::prelude::*;

use crate::vector::safe_normalize;

/// Above this `|dot(forward, up)|` the cross product with world-up is too
/// unstable and +Z is used as the up reference instead.
const GIMBAL_THRESHOLD: f32 = 0.99;

/// Translation column is `position`; rotation columns are
/// `[right, true_up, forward]`. Zero or NaN forward falls back to +Z.
pub fn build_orientation(position: Vec3, forward: Vec3) -> Mat4 {
    let forward = safe_normalize(forward).unwrap_or(Vec3::Z);

    let up = if forward.dot(Vec3::Y).abs() > GIMBAL_THRESHOLD {
        Vec3::Z
    } else {
        Vec3::Y
    };

    let right = up.cross(forward).normalize();
    let true_up = forward.cross(right);

    Mat4::from_cols(
        right.extend(0.0),
        true_up.extend(0.0),
        forward.extend(0.0),
        position.extend(1.0),
    )
}
