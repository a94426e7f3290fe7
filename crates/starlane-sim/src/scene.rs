//! Scene graph of renderable actors.
//!
//! [`Scene`] is a flat container of boxed actors. [`SceneManager`] wires the
//! player's [`ShipActor`] together with one [`NpcActor`] mirror per NPC
//! owned by the AI manager.

use starlane_common::{ActorId, NpcId, Vec2};
use std::collections::BTreeMap;
use tracing::{debug, trace};

use crate::actor::{Actor, NpcActor, RenderState, ShipActor};
use crate::manager::NpcAiManager;

/// Flat collection of actors updated and drawn together.
#[derive(Default)]
pub struct Scene {
    actors: BTreeMap<ActorId, Box<dyn Actor>>,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("actors", &self.actors.len())
            .finish()
    }
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an actor, returning its id.
    pub fn add(&mut self, actor: Box<dyn Actor>) -> ActorId {
        let id = actor.id();
        self.actors.insert(id, actor);
        id
    }

    /// Removes an actor.
    pub fn remove(&mut self, id: ActorId) -> Option<Box<dyn Actor>> {
        self.actors.remove(&id)
    }

    /// Looks up an actor.
    #[must_use]
    pub fn get(&self, id: ActorId) -> Option<&dyn Actor> {
        self.actors.get(&id).map(AsRef::as_ref)
    }

    /// Number of actors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Whether the scene is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Updates every active actor by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        for actor in self.actors.values_mut().filter(|a| a.is_active()) {
            actor.update(dt);
        }
    }

    /// Render states of active actors in id order.
    #[must_use]
    pub fn render_states(&self) -> Vec<RenderState> {
        self.actors
            .values()
            .filter(|a| a.is_active())
            .map(|a| a.render_state())
            .collect()
    }
}

/// Player ship plus NPC mirrors.
#[derive(Debug)]
pub struct SceneManager {
    player: ShipActor,
    npcs: BTreeMap<NpcId, NpcActor>,
    props: Scene,
}

impl SceneManager {
    /// Creates a scene around the player's actor.
    #[must_use]
    pub fn new(player: ShipActor) -> Self {
        Self {
            player,
            npcs: BTreeMap::new(),
            props: Scene::new(),
        }
    }

    /// Player actor.
    #[must_use]
    pub const fn player(&self) -> &ShipActor {
        &self.player
    }

    /// Player actor, mutably.
    pub fn player_mut(&mut self) -> &mut ShipActor {
        &mut self.player
    }

    /// Flies the player to `point`.
    pub fn move_player_to(&mut self, point: Vec2) {
        debug!(x = point.x, y = point.y, "Player move ordered");
        self.player.move_to(point);
    }

    /// Stops the player.
    pub fn stop_player(&mut self) {
        self.player.stop();
    }

    /// Player speed.
    #[must_use]
    pub fn player_speed(&self) -> f32 {
        self.player.speed()
    }

    /// Whether the player is moving.
    #[must_use]
    pub fn player_is_moving(&self) -> bool {
        self.player.is_moving()
    }

    /// Extra actors drawn alongside ships.
    pub fn props_mut(&mut self) -> &mut Scene {
        &mut self.props
    }

    /// Advances the player and props by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.player.update(dt);
        self.props.update(dt);
    }

    /// Brings NPC mirrors in line with the manager: new NPCs gain an actor,
    /// despawned ones lose theirs, the rest copy position.
    pub fn sync_npcs(&mut self, manager: &NpcAiManager) {
        self.npcs.retain(|id, _| manager.npc(*id).is_some());
        for npc in manager.npcs() {
            self.npcs
                .entry(npc.id)
                .and_modify(|actor| actor.sync(npc))
                .or_insert_with(|| NpcActor::new(npc));
        }
        trace!(npcs = self.npcs.len(), "NPC actors synced");
    }

    /// Mirror for `id`.
    #[must_use]
    pub fn npc_actor(&self, id: NpcId) -> Option<&NpcActor> {
        self.npcs.get(&id)
    }

    /// Number of NPC mirrors.
    #[must_use]
    pub fn npc_actor_count(&self) -> usize {
        self.npcs.len()
    }

    /// Render states: player first, then visible NPCs, then props.
    #[must_use]
    pub fn render_states(&self) -> Vec<RenderState> {
        let mut states = vec![self.player.render_state()];
        states.extend(
            self.npcs
                .values()
                .filter(|a| a.is_active())
                .map(Actor::render_state),
        );
        states.extend(self.props.render_states());
        states
    }
}
