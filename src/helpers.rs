//! Vector utilities shared by ball movement and collision handling
//!
//! Everything here works on the XZ ground plane: Y is "up" and the ball never
//! leaves the floor.

use bevy::prelude::*;

use crate::constants::DIRECTION_EPSILON;

/// Zero the vertical component
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Flatten onto the ground plane and normalize.
/// Returns None when nothing is left to normalize.
pub fn flat_direction(v: Vec3) -> Option<Vec3> {
    let flat = flatten(v);
    if flat.length() <= DIRECTION_EPSILON {
        None
    } else {
        Some(flat / flat.length())
    }
}

/// Reflect a direction across a contact normal: d - 2(d·n)n.
/// Returns None for a degenerate normal.
pub fn reflect(direction: Vec3, normal: Vec3) -> Option<Vec3> {
    let len = normal.length();
    if len <= DIRECTION_EPSILON {
        return None;
    }
    let n = normal / len;
    Some(direction - 2.0 * direction.dot(n) * n)
}

/// Spherical interpolation between two unit directions.
/// `t` is clamped to [0, 1]. Antiparallel inputs rotate about the up axis.
pub fn slerp_direction(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    let cos_theta = from.dot(to).clamp(-1.0, 1.0);

    // Nearly identical - a plain lerp is exact enough and avoids dividing by ~0
    if cos_theta > 0.9995 {
        return from.lerp(to, t).normalize_or_zero();
    }

    let theta = cos_theta.acos();

    // Antiparallel: any perpendicular axis works, stay on the ground plane
    if cos_theta < -0.9995 {
        let axis = Vec3::Y.cross(from).normalize_or_zero();
        let angle = theta * t;
        return (from * angle.cos() + axis * angle.sin()).normalize_or_zero();
    }

    let sin_theta = theta.sin();
    let a = ((1.0 - t) * theta).sin() / sin_theta;
    let b = (t * theta).sin() / sin_theta;
    (from * a + to * b).normalize_or_zero()
}

/// Distance between two points ignoring height
pub fn flat_distance(a: Vec3, b: Vec3) -> f32 {
    flatten(a - b).length()
}
