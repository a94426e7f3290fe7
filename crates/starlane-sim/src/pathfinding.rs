//! Straight-line waypoint generation.
//!
//! Paths ignore obstacles: short hops are a single waypoint, longer ones are
//! split into evenly spaced points along the line.

use starlane_common::{distance, Vec2};

/// Below this distance the path is a single waypoint.
pub const DIRECT_PATH_DISTANCE: f32 = 100.0;

/// Target spacing between generated waypoints.
pub const WAYPOINT_SPACING: f32 = 80.0;

/// Generates waypoints from `start` to `end`. The last waypoint is always `end`.
#[must_use]
pub fn generate_waypoints(start: Vec2, end: Vec2) -> Vec<Vec2> {
    let total = distance(start, end);
    if !total.is_finite() || total < DIRECT_PATH_DISTANCE {
        return vec![end];
    }

    let segments = (total / WAYPOINT_SPACING).ceil().max(1.0) as usize;
    (1..=segments)
        .map(|i| {
            if i == segments {
                end
            } else {
                start.lerp(end, i as f32 / segments as f32)
            }
        })
        .collect()
}
