//! # Starlane Sim
//!
//! NPC AI and ship movement for a space-trading game.
//!
//! This crate provides:
//! - Galaxy model (sectors, systems, stations) behind a query trait
//! - Ship classes, engine modules, and movement profiles
//! - Inertial ship movement with arrival braking and waypoint paths
//! - Scene actors for the player and NPC mirrors
//! - NPC records with goals, skills, personality, cargo, and route memory
//! - Trade, patrol, pirate, and idle decision making
//! - Threat assessment and local collision avoidance
//! - Branching NPC conversations
//! - Per-station market behaviours
//! - The AI manager that spawns, ticks, and persists NPCs
//! - Event bus for host integration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod actor;
pub mod combat;
pub mod commodity;
pub mod config;
pub mod conversation;
pub mod events;
pub mod manager;
pub mod market;
pub mod movement;
pub mod npc;
pub mod pathfinding;
pub mod player;
pub mod scene;
pub mod ship_class;
pub mod snapshot;
pub mod spawn;
pub mod thrust;
pub mod threat;
pub mod trade;
pub mod world;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::actor::*;
    pub use crate::combat::*;
    pub use crate::commodity::*;
    pub use crate::config::*;
    pub use crate::conversation::*;
    pub use crate::events::*;
    pub use crate::manager::*;
    pub use crate::market::*;
    pub use crate::movement::*;
    pub use crate::npc::*;
    pub use crate::pathfinding::*;
    pub use crate::player::*;
    pub use crate::scene::*;
    pub use crate::ship_class::*;
    pub use crate::snapshot::*;
    pub use crate::spawn::*;
    pub use crate::thrust::*;
    pub use crate::threat::*;
    pub use crate::trade::*;
    pub use crate::world::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use starlane_common::{ManualClock, Vec2};
    use std::sync::Arc;

    #[test]
    fn test_full_frame_loop() {
        let galaxy = Galaxy::generate(&GalaxyShape::default(), 42);
        let start = galaxy
            .system_ids()
            .first()
            .copied()
            .expect("galaxy has systems");
        let clock = ManualClock::new(0);
        let player = PlayerShip::new("Wayfarer", "Sparrow Courier", start, Vec2::ZERO).into_shared();
        let profile = ShipClass::by_name("Sparrow Courier")
            .expect("class exists")
            .movement_profile(&[]);

        let mut manager = NpcAiManager::new(Arc::new(galaxy), Arc::new(clock.clone()), AiConfig::default(), 42)
            .with_player(Arc::clone(&player));
        manager.initialize();
        let mut scene = SceneManager::new(ShipActor::for_player(player, profile));
        scene.move_player_to(Vec2::new(300.0, 300.0));

        for _ in 0..600 {
            clock.advance(16);
            manager.update(16.0);
            scene.update(0.016);
            scene.sync_npcs(&manager);
        }

        assert!(manager.npc_count() > 0);
        assert_eq!(scene.npc_actor_count(), manager.npc_count());
        assert!(!scene.render_states().is_empty());
    }
}
