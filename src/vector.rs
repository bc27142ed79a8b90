/*
 * Vector Module
 *
 * Small helpers shared by every force in the simulation. All steering
 * forces and speed limits pass through these functions, so they must be
 * total over their inputs: zero and non-finite vectors never divide.
 */

use nannou::prelude::*;

use crate::EPSILON;

/// Returns `v` unchanged if its length is at most `max_len`, otherwise `v`
/// rescaled to exactly `max_len`. A zero or non-finite vector gives zero.
pub fn clamp_magnitude(v: Vec3, max_len: f32) -> Vec3 {
    if max_len <= 0.0 || !is_finite(v) {
        return Vec3::ZERO;
    }

    if v.length_squared() <= max_len * max_len {
        return v;
    }

    // The squared length can overflow for large finite vectors
    safe_normalize(v).map_or(Vec3::ZERO, |direction| direction * max_len)
}

/// Unit vector in the direction of `v`, or `None` when `v` is near zero or
/// has a non-finite component.
pub fn safe_normalize(v: Vec3) -> Option<Vec3> {
    if !is_finite(v) {
        return None;
    }

    // Measure in units of the largest component so the length cannot
    // overflow or underflow
    let scale = v.abs().max_element();
    if scale == 0.0 {
        return None;
    }

    let unit_scaled = v / scale;
    let scaled_length = unit_scaled.length();
    if scale * scaled_length < EPSILON {
        None
    } else {
        Some(unit_scaled / scaled_length)
    }
}

pub fn is_finite(v: Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

/// Keeps `|v|` inside `[min_speed, max_speed]`.
///
/// The ceiling goes through [`clamp_magnitude`]; the floor rescales `v` up to
/// `min_speed`. A velocity with no usable direction is replaced by
/// `fallback_dir * min_speed`, so the result is never zero while
/// `min_speed > 0`.
pub fn enforce_speed_band(v: Vec3, fallback_dir: Vec3, min_speed: f32, max_speed: f32) -> Vec3 {
    match safe_normalize(v) {
        Some(direction) => {
            let speed = v.length();
            if speed < min_speed {
                direction * min_speed
            } else {
                clamp_magnitude(v, max_speed)
            }
        }
        None => safe_normalize(fallback_dir).unwrap_or(Vec3::Z) * min_speed,
    }
}
