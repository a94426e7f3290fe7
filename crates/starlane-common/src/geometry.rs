//! 2D geometry helpers shared by the movement and AI code.
//!
//! Positions and velocities are `glam::Vec2`. Angles are radians measured
//! counter-clockwise from +X, as produced by `atan2(dy, dx)`.

use std::f32::consts::{PI, TAU};

pub use glam::Vec2;

/// Lengths below this are treated as zero when normalising.
pub const EPSILON: f32 = 1e-4;

/// Distance between two points.
#[must_use]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Unit vector from `from` toward `to`, or zero if the points coincide.
#[must_use]
pub fn direction(from: Vec2, to: Vec2) -> Vec2 {
    let delta = to - from;
    let len = delta.length();
    if len < EPSILON {
        Vec2::ZERO
    } else {
        delta / len
    }
}

/// Heading angle from `from` toward `to`.
#[must_use]
pub fn heading(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x)
}

/// Heading angle of a vector, zero for the zero vector.
#[must_use]
pub fn angle_of(v: Vec2) -> f32 {
    if v.length_squared() < EPSILON * EPSILON {
        0.0
    } else {
        v.y.atan2(v.x)
    }
}

/// Unit vector pointing along `angle`.
#[must_use]
pub fn unit_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Normalises an angle into the half-open range (-PI, PI].
#[must_use]
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        PI
    } else {
        wrapped
    }
}

/// Signed shortest rotation from `from` to `to`, in (-PI, PI].
#[must_use]
pub fn angle_difference(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Rotates `current` toward `target` by at most `max_step` radians.
#[must_use]
pub fn rotate_toward(current: f32, target: f32, max_step: f32) -> f32 {
    let diff = angle_difference(current, target);
    let step = diff.clamp(-max_step.abs(), max_step.abs());
    normalize_angle(current + step)
}

/// Limits the length of `v` to `max_len`.
#[must_use]
pub fn limit(v: Vec2, max_len: f32) -> Vec2 {
    if max_len <= 0.0 {
        return Vec2::ZERO;
    }
    v.clamp_length_max(max_len)
}
