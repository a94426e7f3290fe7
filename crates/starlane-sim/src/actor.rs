//! Scene actors.
//!
//! [`ShipActor`] drives a [`ShipMover`] and mirrors its position into the
//! player record. [`NpcActor`] is the scene-side view of an NPC: it copies
//! position from the manager's record and forwards movement orders back to
//! the manager, which owns NPC movement.

use serde::{Deserialize, Serialize};
use starlane_common::{ActorId, NpcId, Vec2};
use std::fmt;
use tracing::debug;

use crate::manager::NpcAiManager;
use crate::movement::{MovementPhase, Mover, ShipMover};
use crate::npc::{NpcResult, NpcShip};
use crate::player::SharedPlayer;
use crate::ship_class::MovementProfile;
use crate::thrust::{ThrustParticle, ThrustTrail};

/// Snapshot handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderState {
    /// Actor ID
    pub id: ActorId,
    /// Position
    pub position: Vec2,
    /// Velocity
    pub velocity: Vec2,
    /// Heading in radians
    pub rotation: f32,
    /// Engine trail
    pub thrust: Vec<ThrustParticle>,
    /// Label to draw, if any
    pub label: Option<String>,
}

/// A positioned, updatable, renderable entity.
pub trait Actor: Send {
    /// Actor ID.
    fn id(&self) -> ActorId;

    /// Position.
    fn position(&self) -> Vec2;

    /// Velocity.
    fn velocity(&self) -> Vec2;

    /// Heading in radians.
    fn rotation(&self) -> f32;

    /// Inactive actors are skipped by the scene.
    fn is_active(&self) -> bool;

    /// Advances by `dt` seconds.
    fn update(&mut self, dt: f32);

    /// State for drawing.
    fn render_state(&self) -> RenderState;
}

/// One-shot arrival callback.
pub type ArrivalCallback = Box<dyn FnOnce(Vec2) + Send>;

/// Ship driven by a [`ShipMover`].
pub struct ShipActor {
    id: ActorId,
    mover: ShipMover,
    trail: ThrustTrail,
    active: bool,
    label: Option<String>,
    record: Option<SharedPlayer>,
    on_arrival: Option<ArrivalCallback>,
}

impl fmt::Debug for ShipActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShipActor")
            .field("id", &self.id)
            .field("mover", &self.mover)
            .field("active", &self.active)
            .field("label", &self.label)
            .field("has_record", &self.record.is_some())
            .field("has_callback", &self.on_arrival.is_some())
            .finish_non_exhaustive()
    }
}

impl ShipActor {
    /// Creates a free-standing ship actor.
    #[must_use]
    pub fn new(position: Vec2, profile: MovementProfile) -> Self {
        let id = ActorId::new();
        Self {
            id,
            mover: ShipMover::new(position, profile),
            trail: ThrustTrail::new(id.raw()),
            active: true,
            label: None,
            record: None,
            on_arrival: None,
        }
    }

    /// Creates the actor for the player, starting at the record's position.
    #[must_use]
    pub fn for_player(player: SharedPlayer, profile: MovementProfile) -> Self {
        let (position, name) = {
            let record = player.read();
            (record.position, record.name.clone())
        };
        let mut actor = Self::new(position, profile);
        actor.label = Some(name);
        actor.record = Some(player);
        actor
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Flies to `point`, undocking the owning record.
    pub fn move_to(&mut self, point: Vec2) {
        self.mover.set_target(point);
        self.mark_departed();
    }

    /// Flies along `path`. Empty paths are ignored.
    pub fn move_along(&mut self, path: Vec<Vec2>) {
        if path.is_empty() {
            return;
        }
        self.mover.set_waypoints(path);
        self.mark_departed();
    }

    /// Halts immediately.
    pub fn stop(&mut self) {
        self.mover.stop();
        if let Some(record) = &self.record {
            record.write().in_transit = false;
        }
    }

    /// Registers a callback run once on the next arrival. Replaces any previous one.
    pub fn on_arrival(&mut self, callback: impl FnOnce(Vec2) + Send + 'static) {
        self.on_arrival = Some(Box::new(callback));
    }

    /// Whether an arrival callback is pending.
    #[must_use]
    pub fn has_arrival_callback(&self) -> bool {
        self.on_arrival.is_some()
    }

    /// Current speed.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.mover.speed()
    }

    /// Whether the ship is travelling or drifting.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.mover.is_moving()
    }

    /// Underlying mover.
    #[must_use]
    pub const fn mover(&self) -> &ShipMover {
        &self.mover
    }

    /// Engine trail particles.
    #[must_use]
    pub fn thrust_particles(&self) -> &[ThrustParticle] {
        self.trail.particles()
    }

    /// Enables or disables the actor.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn mark_departed(&mut self) {
        if let Some(record) = &self.record {
            let mut record = record.write();
            record.station_id = None;
            record.in_transit = true;
        }
    }
}

impl Actor for ShipActor {
    fn id(&self) -> ActorId {
        self.id
    }

    fn position(&self) -> Vec2 {
        self.mover.position()
    }

    fn velocity(&self) -> Vec2 {
        self.mover.velocity()
    }

    fn rotation(&self) -> f32 {
        self.mover.rotation()
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        let phase = self.mover.update(dt);
        self.trail
            .update(dt, self.mover.position(), self.mover.rotation(), self.mover.speed());

        if let Some(record) = &self.record {
            let mut record = record.write();
            record.position = self.mover.position();
            record.in_transit = self.mover.is_moving();
        }

        if phase == MovementPhase::Arrived {
            let position = self.mover.position();
            debug!(actor = self.id.raw(), x = position.x, y = position.y, "Ship arrived");
            if let Some(callback) = self.on_arrival.take() {
                callback(position);
            }
        }
    }

    fn render_state(&self) -> RenderState {
        RenderState {
            id: self.id,
            position: self.mover.position(),
            velocity: self.mover.velocity(),
            rotation: self.mover.rotation(),
            thrust: self.trail.particles().to_vec(),
            label: self.label.clone(),
        }
    }
}

/// Scene mirror of an NPC owned by [`NpcAiManager`].
#[derive(Debug, Clone)]
pub struct NpcActor {
    id: ActorId,
    npc_id: NpcId,
    name: String,
    position: Vec2,
    velocity: Vec2,
    rotation: f32,
    active: bool,
}

impl NpcActor {
    /// Creates a mirror of `npc`.
    #[must_use]
    pub fn new(npc: &NpcShip) -> Self {
        let mut actor = Self {
            id: ActorId::new(),
            npc_id: npc.id,
            name: npc.name.clone(),
            position: npc.coordinates,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            active: true,
        };
        actor.sync(npc);
        actor
    }

    /// NPC this actor mirrors.
    #[must_use]
    pub const fn npc_id(&self) -> NpcId {
        self.npc_id
    }

    /// Copies position and motion from the NPC record.
    pub fn sync(&mut self, npc: &NpcShip) {
        self.position = npc.coordinates;
        self.velocity = npc.mover.velocity();
        self.rotation = npc.mover.rotation();
        // Docked ships are not drawn.
        self.active = !npc.is_docked();
    }

    /// Orders the NPC to fly to `point`.
    pub fn move_to(&self, manager: &mut NpcAiManager, point: Vec2) -> NpcResult<()> {
        manager.command_move(self.npc_id, point)
    }

    /// Orders the NPC along `path`.
    pub fn follow(&self, manager: &mut NpcAiManager, path: Vec<Vec2>) -> NpcResult<()> {
        manager.command_waypoints(self.npc_id, path)
    }
}

impl Actor for NpcActor {
    fn id(&self) -> ActorId {
        self.id
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn rotation(&self) -> f32 {
        self.rotation
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn update(&mut self, _dt: f32) {
        // Position is pulled from the manager in `sync`.
    }

    fn render_state(&self) -> RenderState {
        RenderState {
            id: self.id,
            position: self.position,
            velocity: self.velocity,
            rotation: self.rotation,
            thrust: Vec::new(),
            label: Some(self.name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerShip;
    use crate::ship_class::ShipClass;
    use starlane_common::SystemId;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn courier_profile() -> MovementProfile {
        ShipClass::by_name("Sparrow Courier")
            .expect("class should exist")
            .movement_profile(&[])
    }

    #[test]
    fn test_ship_actor_mirrors_position_into_record() {
        let player = PlayerShip::new("Wayfarer", "Sparrow Courier", SystemId::new(1), Vec2::new(100.0, 100.0))
            .into_shared();
        let mut actor = ShipActor::for_player(Arc::clone(&player), courier_profile());
        actor.move_to(Vec2::new(300.0, 100.0));
        assert!(player.read().in_transit);

        for _ in 0..30 {
            actor.update(1.0 / 60.0);
        }
        assert_eq!(player.read().position, actor.position());
        assert!(player.read().position.x > 100.0);
    }

    #[test]
    fn test_arrival_callback_fires_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut actor = ShipActor::new(Vec2::ZERO, courier_profile());
        let counter = Arc::clone(&calls);
        actor.on_arrival(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        actor.move_to(Vec2::new(60.0, 0.0));

        for _ in 0..600 {
            actor.update(1.0 / 60.0);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!actor.has_arrival_callback());

        actor.move_to(Vec2::new(0.0, 0.0));
        for _ in 0..600 {
            actor.update(1.0 / 60.0);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_thrust_trail_while_moving() {
        let mut actor = ShipActor::new(Vec2::ZERO, courier_profile());
        actor.move_to(Vec2::new(1_000.0, 0.0));
        for _ in 0..60 {
            actor.update(1.0 / 60.0);
        }
        let state = actor.render_state();
        assert!(!state.thrust.is_empty());
        assert!(state.thrust.len() <= crate::thrust::MAX_THRUST_PARTICLES);
    }

    #[test]
    fn test_stop_clears_transit() {
        let player = PlayerShip::new("Wayfarer", "Sparrow Courier", SystemId::new(1), Vec2::ZERO).into_shared();
        let mut actor = ShipActor::for_player(Arc::clone(&player), courier_profile());
        actor.move_to(Vec2::new(500.0, 0.0));
        actor.update(1.0 / 60.0);
        actor.stop();
        assert_eq!(actor.speed(), 0.0);
        assert!(!player.read().in_transit);
    }
}
