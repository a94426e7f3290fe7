//! Ship movement.
//!
//! [`ShipMover`] is the one movement component shared by the player ship and
//! every NPC. It has two modes:
//!
//! - **Seek**: a single target point. The ship turns at a bounded rate,
//!   accelerates toward a braking-aware cruise speed (`v = sqrt(2·a·d)` inside
//!   braking distance), and snaps onto the target inside [`ARRIVAL_RADIUS`].
//! - **Path**: a waypoint sequence. Velocity is steered toward each waypoint
//!   with a force cap derived from maneuverability, and the final leg hands
//!   over to seek mode for the braking approach.
//!
//! Without a target the ship coasts with exponential damping. Avoidance fades
//! out near the point being approached so ships sharing a destination still
//! arrive, and long updates are integrated in steps of at most
//! [`MAX_STEP_DT`].

use serde::{Deserialize, Serialize};
use starlane_common::{
    angle_difference, angle_of, direction, distance, limit, rotate_toward, unit_from_angle, Vec2,
    EPSILON,
};
use tracing::trace;

use crate::ship_class::MovementProfile;

/// Distance at which a seek target counts as reached.
pub const ARRIVAL_RADIUS: f32 = 5.0;

/// Distance at which an intermediate waypoint counts as reached.
pub const WAYPOINT_REACH_RADIUS: f32 = 10.0;

/// Braking speed never drops below this fraction of max speed.
pub const MIN_SPEED_FRACTION: f32 = 0.1;

/// Exponential velocity damping rate (1/s) while coasting.
pub const IDLE_DAMPING: f32 = 3.0;

/// Speeds below this are treated as stopped.
pub const STOP_SPEED_EPSILON: f32 = 0.5;

/// Share of the avoidance vector blended into seek velocity.
pub const TARGET_AVOIDANCE_WEIGHT: f32 = 0.3;

/// Share of the avoidance vector blended into path steering.
pub const PATH_AVOIDANCE_WEIGHT: f32 = 0.5;

/// Avoidance is fully faded out this close to the point being approached.
pub const AVOIDANCE_FADE_RADIUS: f32 = 4.0 * ARRIVAL_RADIUS;

/// Longest single integration step in seconds. Longer updates are split.
pub const MAX_STEP_DT: f32 = 1.0 / 30.0;

/// Desired path speed when the waypoint is directly behind the ship.
const MISALIGNED_PATH_SPEED: f32 = 0.2;

/// Share of the avoidance vector kept at `dist` from the approached point.
/// Ramps from zero at [`AVOIDANCE_FADE_RADIUS`] to full at twice that.
fn avoidance_fade(dist: f32) -> f32 {
    ((dist - AVOIDANCE_FADE_RADIUS) / AVOIDANCE_FADE_RADIUS).clamp(0.0, 1.0)
}

/// Movement state reported by [`Mover::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MovementPhase {
    /// No target, at rest
    #[default]
    Idle,
    /// Speeding up toward cruise speed
    Accelerating,
    /// Holding cruise speed
    Cruising,
    /// Slowing down, either for arrival or while coasting
    Braking,
    /// Steering through intermediate waypoints
    FollowingPath,
    /// Reached the target this tick
    Arrived,
}

/// Movement capability shared by every ship.
pub trait Mover {
    /// Seeks a single point. Clears any waypoint path.
    fn set_target(&mut self, point: Vec2);

    /// Follows a waypoint path ending at its last point. Empty paths are ignored.
    fn set_waypoints(&mut self, points: Vec<Vec2>);

    /// Clears target and path and halts immediately.
    fn stop(&mut self);

    /// Advances the simulation by `dt` seconds.
    fn update(&mut self, dt: f32) -> MovementPhase;

    /// Current position.
    fn position(&self) -> Vec2;

    /// Current velocity.
    fn velocity(&self) -> Vec2;

    /// Whether the ship has somewhere to go or is still drifting.
    fn is_moving(&self) -> bool;
}

/// Seek/path movement integrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipMover {
    position: Vec2,
    velocity: Vec2,
    /// Heading in radians
    rotation: f32,
    /// Scalar speed along the heading in seek mode
    speed: f32,
    profile: MovementProfile,
    /// Fraction of max speed this pilot actually uses
    speed_factor: f32,
    target: Option<Vec2>,
    waypoints: Vec<Vec2>,
    waypoint_index: Option<usize>,
    #[serde(skip)]
    avoidance: Vec2,
    phase: MovementPhase,
}

impl ShipMover {
    /// Creates a mover at rest.
    #[must_use]
    pub fn new(position: Vec2, profile: MovementProfile) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            speed: 0.0,
            profile,
            speed_factor: 1.0,
            target: None,
            waypoints: Vec::new(),
            waypoint_index: None,
            avoidance: Vec2::ZERO,
            phase: MovementPhase::Idle,
        }
    }

    /// Sets the initial heading.
    #[must_use]
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the speed factor.
    #[must_use]
    pub fn with_speed_factor(mut self, factor: f32) -> Self {
        self.set_speed_factor(factor);
        self
    }

    /// Heading in radians.
    #[must_use]
    pub const fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Current speed.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Movement profile.
    #[must_use]
    pub const fn profile(&self) -> &MovementProfile {
        &self.profile
    }

    /// Final destination, if any.
    #[must_use]
    pub const fn target(&self) -> Option<Vec2> {
        self.target
    }

    /// Active waypoint path. Empty when not path following.
    #[must_use]
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    /// Index of the waypoint being steered toward.
    #[must_use]
    pub const fn waypoint_index(&self) -> Option<usize> {
        self.waypoint_index
    }

    /// Phase reported by the last update.
    #[must_use]
    pub const fn phase(&self) -> MovementPhase {
        self.phase
    }

    /// Current avoidance vector.
    #[must_use]
    pub const fn avoidance(&self) -> Vec2 {
        self.avoidance
    }

    /// Sets the avoidance vector blended into the next updates.
    pub fn set_avoidance(&mut self, avoidance: Vec2) {
        self.avoidance = if avoidance.is_finite() {
            avoidance
        } else {
            Vec2::ZERO
        };
    }

    /// Fraction of max speed used, clamped to 0.1..=1.0.
    pub fn set_speed_factor(&mut self, factor: f32) {
        self.speed_factor = if factor.is_finite() {
            factor.clamp(0.1, 1.0)
        } else {
            1.0
        };
    }

    /// Teleports the ship, keeping target and velocity.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Speed the ship aims for when unobstructed.
    #[must_use]
    pub fn effective_max_speed(&self) -> f32 {
        self.profile.max_speed * self.speed_factor
    }

    /// Distance needed to stop from the current speed.
    #[must_use]
    pub fn braking_distance(&self) -> f32 {
        self.profile.braking_distance(self.speed())
    }

    fn clear_path(&mut self) {
        self.waypoints.clear();
        self.waypoint_index = None;
    }

    fn arrive(&mut self, target: Vec2) -> MovementPhase {
        self.position = target;
        self.velocity = Vec2::ZERO;
        self.speed = 0.0;
        self.target = None;
        self.clear_path();
        trace!(x = target.x, y = target.y, "Mover arrived");
        MovementPhase::Arrived
    }

    /// Hands a moving ship over to seek mode without losing momentum.
    fn enter_seek(&mut self) {
        self.speed = self.velocity.length();
        if self.speed > EPSILON {
            self.rotation = angle_of(self.velocity);
        }
    }

    fn coast(&mut self, dt: f32) -> MovementPhase {
        self.velocity *= (-IDLE_DAMPING * dt).exp();
        if self.velocity.length() < STOP_SPEED_EPSILON {
            self.velocity = Vec2::ZERO;
            self.speed = 0.0;
            return MovementPhase::Idle;
        }
        self.position += self.velocity * dt;
        self.speed = self.velocity.length();
        MovementPhase::Braking
    }

    fn seek(&mut self, target: Vec2, dt: f32) -> MovementPhase {
        let dist = distance(self.position, target);
        if dist <= ARRIVAL_RADIUS {
            return self.arrive(target);
        }

        let desired_heading = angle_of(target - self.position);
        self.rotation = rotate_toward(
            self.rotation,
            desired_heading,
            self.profile.rotation_speed * dt,
        );
        let alignment = angle_difference(self.rotation, desired_heading)
            .cos()
            .max(0.0);

        let max_speed = self.effective_max_speed();
        let remaining = (dist - ARRIVAL_RADIUS).max(0.0);
        let braking_speed = (2.0 * self.profile.acceleration * remaining)
            .sqrt()
            .max(max_speed * MIN_SPEED_FRACTION);
        let cruise = braking_speed.min(max_speed);
        let target_speed = cruise * alignment;

        let max_delta = self.profile.acceleration * dt;
        self.speed += (target_speed - self.speed).clamp(-max_delta, max_delta);
        self.speed = self.speed.max(0.0);

        self.velocity = unit_from_angle(self.rotation) * self.speed
            + self.avoidance * (TARGET_AVOIDANCE_WEIGHT * avoidance_fade(dist));

        let step = self.velocity * dt;
        if step.length() >= dist {
            return self.arrive(target);
        }
        self.position += step;

        if remaining <= self.profile.braking_distance(self.speed) {
            MovementPhase::Braking
        } else if self.speed + EPSILON < cruise {
            MovementPhase::Accelerating
        } else {
            MovementPhase::Cruising
        }
    }

    fn follow_path(&mut self, index: usize, dt: f32) -> MovementPhase {
        let mut index = index;
        let Some(mut waypoint) = self.waypoints.get(index).copied() else {
            self.clear_path();
            return MovementPhase::Idle;
        };

        if distance(self.position, waypoint) <= WAYPOINT_REACH_RADIUS {
            index += 1;
            // The last leg is flown in seek mode so the ship brakes onto it.
            if index + 1 >= self.waypoints.len() {
                self.clear_path();
                self.enter_seek();
                return match self.target {
                    Some(target) => self.seek(target, dt),
                    None => self.coast(dt),
                };
            }
            self.waypoint_index = Some(index);
            waypoint = self.waypoints[index];
        }

        let effective = self.effective_max_speed();
        let dir = direction(self.position, waypoint);
        let alignment = if self.velocity.length() > EPSILON {
            self.velocity.normalize_or_zero().dot(dir).max(0.0)
        } else {
            1.0
        };
        let desired_speed =
            effective * (MISALIGNED_PATH_SPEED + (1.0 - MISALIGNED_PATH_SPEED) * alignment);
        let fade = avoidance_fade(distance(self.position, waypoint));
        let desired = dir * desired_speed + self.avoidance * (PATH_AVOIDANCE_WEIGHT * fade);

        let max_force = self.profile.maneuverability / 100.0 * self.profile.acceleration * dt;
        let steering = limit(desired - self.velocity, max_force);
        self.velocity = limit(self.velocity + steering, effective);
        self.position += self.velocity * dt;

        self.speed = self.velocity.length();
        if self.speed > EPSILON {
            self.rotation = angle_of(self.velocity);
        }
        MovementPhase::FollowingPath
    }

    fn step(&mut self, dt: f32) -> MovementPhase {
        if let Some(index) = self.waypoint_index {
            self.follow_path(index, dt)
        } else if let Some(target) = self.target {
            self.seek(target, dt)
        } else {
            self.coast(dt)
        }
    }
}

impl Mover for ShipMover {
    fn set_target(&mut self, point: Vec2) {
        if self.waypoint_index.is_some() {
            self.enter_seek();
        }
        self.clear_path();
        self.target = Some(point);
        self.phase = MovementPhase::Accelerating;
    }

    fn set_waypoints(&mut self, points: Vec<Vec2>) {
        let Some(&last) = points.last() else {
            return;
        };
        if self.waypoint_index.is_none() {
            self.velocity = unit_from_angle(self.rotation) * self.speed;
        }
        self.target = Some(last);
        if points.len() == 1 {
            self.clear_path();
            self.phase = MovementPhase::Accelerating;
        } else {
            self.waypoints = points;
            self.waypoint_index = Some(0);
            self.phase = MovementPhase::FollowingPath;
        }
    }

    fn stop(&mut self) {
        self.target = None;
        self.clear_path();
        self.velocity = Vec2::ZERO;
        self.speed = 0.0;
        self.phase = MovementPhase::Idle;
    }

    fn update(&mut self, dt: f32) -> MovementPhase {
        if dt <= 0.0 || !dt.is_finite() {
            return self.phase;
        }

        let steps = (dt / MAX_STEP_DT).ceil().max(1.0) as u32;
        let sub_dt = dt / steps as f32;
        for _ in 0..steps {
            self.phase = self.step(sub_dt);
            if matches!(self.phase, MovementPhase::Arrived | MovementPhase::Idle) {
                break;
            }
        }
        self.phase
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn is_moving(&self) -> bool {
        self.target.is_some()
            || self.waypoint_index.is_some()
            || self.velocity.length() >= STOP_SPEED_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ship_class::{ShipClass, SHIP_CLASSES};
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn courier_at(position: Vec2) -> ShipMover {
        let class = ShipClass::by_name("Sparrow Courier").expect("class should exist");
        ShipMover::new(position, class.movement_profile(&[]))
    }

    /// Runs until arrival, returning the step count.
    fn run_until_arrived(mover: &mut ShipMover, max_steps: usize) -> Option<usize> {
        (1..=max_steps).find(|_| mover.update(DT) == MovementPhase::Arrived)
    }

    #[test]
    fn test_courier_arrives_within_four_seconds() {
        let mut mover = courier_at(Vec2::new(100.0, 100.0));
        let target = Vec2::new(300.0, 100.0);
        mover.set_target(target);

        let steps = run_until_arrived(&mut mover, 240).expect("courier should arrive");
        assert!(steps <= 240, "took {steps} steps");
        assert!(distance(mover.position(), target) < ARRIVAL_RADIUS);
        assert_eq!(mover.velocity(), Vec2::ZERO);
        assert!(!mover.is_moving());
    }

    #[test]
    fn test_heading_converges_to_travel_direction() {
        let start = Vec2::new(100.0, 100.0);
        let offsets = [
            Vec2::new(200.0, 0.0),
            Vec2::new(-200.0, 0.0),
            Vec2::new(0.0, 200.0),
            Vec2::new(0.0, -200.0),
            Vec2::new(200.0, 200.0),
        ];

        for offset in offsets {
            let mut mover = courier_at(start);
            let target = start + offset;
            mover.set_target(target);
            run_until_arrived(&mut mover, 2_000).expect("should arrive");

            let expected = offset.y.atan2(offset.x);
            let error = angle_difference(mover.rotation(), expected).abs();
            assert!(
                error <= 15f32.to_radians(),
                "offset {offset:?}: heading error {} deg",
                error.to_degrees()
            );
        }
    }

    #[test]
    fn test_no_overshoot_once_braking() {
        let start = Vec2::new(100.0, 100.0);
        let target = Vec2::new(300.0, 100.0);
        let mut mover = courier_at(start);
        mover.set_target(target);

        let mut braking = false;
        let mut last_distance = f32::MAX;
        let mut max_past_target = f32::MIN;
        for _ in 0..600 {
            let phase = mover.update(DT);
            let d = distance(mover.position(), target);
            max_past_target = max_past_target.max(mover.position().x - target.x);
            if braking {
                assert!(d <= last_distance + 1e-3, "distance grew while braking");
            }
            if phase == MovementPhase::Braking {
                braking = true;
            }
            last_distance = d;
            if phase == MovementPhase::Arrived {
                break;
            }
        }
        assert!(braking, "ship never entered braking");
        assert!(max_past_target < 50.0);
    }

    #[test]
    fn test_stop_halts_immediately() {
        let mut mover = courier_at(Vec2::ZERO);
        mover.set_target(Vec2::new(500.0, 0.0));
        for _ in 0..30 {
            mover.update(DT);
        }
        assert!(mover.speed() > 0.0);

        mover.stop();
        assert_eq!(mover.velocity(), Vec2::ZERO);
        assert!(mover.target().is_none());
        assert!(!mover.is_moving());
        let position = mover.position();
        assert_eq!(mover.update(DT), MovementPhase::Idle);
        assert_eq!(mover.position(), position);
    }

    #[test]
    fn test_coasting_damps_to_rest() {
        let mut mover = courier_at(Vec2::ZERO);
        mover.set_target(Vec2::new(1_000.0, 0.0));
        for _ in 0..60 {
            mover.update(DT);
        }
        // Drop the target without zeroing velocity.
        mover.target = None;
        assert!(mover.is_moving());

        for _ in 0..300 {
            mover.update(DT);
        }
        assert!(!mover.is_moving());
        assert_eq!(mover.phase(), MovementPhase::Idle);
    }

    #[test]
    fn test_waypoint_path_is_followed_and_cleared() {
        let mut mover = courier_at(Vec2::ZERO);
        let path = vec![
            Vec2::new(80.0, 0.0),
            Vec2::new(160.0, 0.0),
            Vec2::new(240.0, 0.0),
        ];
        mover.set_waypoints(path);
        assert_eq!(mover.waypoint_index(), Some(0));
        assert_eq!(mover.target(), Some(Vec2::new(240.0, 0.0)));

        let mut seen_index = 0;
        let mut arrived = false;
        for _ in 0..1_200 {
            let phase = mover.update(DT);
            if let Some(index) = mover.waypoint_index() {
                assert!(index < mover.waypoints().len());
                assert!(index >= seen_index, "index went backwards");
                seen_index = index;
            }
            if phase == MovementPhase::Arrived {
                arrived = true;
                break;
            }
        }

        assert!(arrived);
        assert!(mover.waypoint_index().is_none());
        assert!(mover.waypoints().is_empty());
        assert_eq!(mover.position(), Vec2::new(240.0, 0.0));
    }

    #[test]
    fn test_empty_waypoints_are_ignored() {
        let mut mover = courier_at(Vec2::ZERO);
        mover.set_target(Vec2::new(50.0, 0.0));
        mover.set_waypoints(Vec::new());
        assert_eq!(mover.target(), Some(Vec2::new(50.0, 0.0)));
        assert!(mover.waypoint_index().is_none());
    }

    #[test]
    fn test_zero_or_invalid_dt_is_ignored() {
        let mut mover = courier_at(Vec2::ZERO);
        mover.set_target(Vec2::new(50.0, 0.0));
        mover.update(0.0);
        mover.update(f32::NAN);
        assert_eq!(mover.position(), Vec2::ZERO);
    }

    #[test]
    fn test_avoidance_pushes_seek_velocity() {
        let mut mover = courier_at(Vec2::ZERO);
        mover.set_target(Vec2::new(500.0, 0.0));
        mover.set_avoidance(Vec2::new(0.0, 10.0));
        mover.update(DT);
        assert!(mover.velocity().y > 0.0);

        mover.set_avoidance(Vec2::new(f32::NAN, 0.0));
        assert_eq!(mover.avoidance(), Vec2::ZERO);
    }

    #[test]
    fn test_avoidance_fades_near_target() {
        for class in SHIP_CLASSES.iter() {
            let mut mover = ShipMover::new(Vec2::ZERO, class.movement_profile(&[]));
            let target = Vec2::new(200.0, 0.0);
            mover.set_target(target);

            // A ship parked beyond the target keeps pushing back.
            let arrived = (0..3_600).any(|_| {
                mover.set_avoidance(Vec2::new(-40.0, 0.0));
                mover.update(DT) == MovementPhase::Arrived
            });
            assert!(arrived, "{} stalled at {:?}", class.name, mover.position());
            assert_eq!(mover.position(), target);
        }
        assert!(avoidance_fade(AVOIDANCE_FADE_RADIUS) <= 0.0);
        assert!((avoidance_fade(AVOIDANCE_FADE_RADIUS * 2.0) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_large_dt_path_converges() {
        let end = Vec2::new(450.0, 450.0);
        for class in SHIP_CLASSES.iter() {
            let mut mover = ShipMover::new(Vec2::ZERO, class.movement_profile(&[]));
            mover.set_waypoints(crate::pathfinding::generate_waypoints(Vec2::ZERO, end));
            assert!(mover.waypoint_index().is_some());

            let arrived = (0..2_000).any(|_| mover.update(0.5) == MovementPhase::Arrived);
            assert!(arrived, "{} never finished the path", class.name);
            assert_eq!(mover.position(), end);
            assert!(!mover.is_moving());
        }
    }

    proptest! {
        #[test]
        fn prop_arrival_converges(
            class_index in 0..SHIP_CLASSES.len(),
            tx in -1_000.0f32..1_000.0,
            ty in -1_000.0f32..1_000.0,
            rotation in -3.1f32..3.1,
        ) {
            let profile = SHIP_CLASSES[class_index].movement_profile(&[]);
            let mut mover = ShipMover::new(Vec2::ZERO, profile).with_rotation(rotation);
            let target = Vec2::new(tx, ty);
            mover.set_target(target);

            let arrived = run_until_arrived(&mut mover, 3_600);
            prop_assert!(arrived.is_some());
            prop_assert!(distance(mover.position(), target) < ARRIVAL_RADIUS);
            prop_assert!(mover.speed() < STOP_SPEED_EPSILON);
        }
    }
}
