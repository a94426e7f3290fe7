//! The player's ship record.
//!
//! The record is shared between the player's [`crate::actor::ShipActor`],
//! which is its only writer, and the AI manager, which reads location,
//! reputation, and cargo when pirates size up targets.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use starlane_common::{StationId, SystemId, Vec2};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::commodity::Commodity;

/// Shared handle to the player record.
pub type SharedPlayer = Arc<RwLock<PlayerShip>>;

/// Player ship state visible to the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerShip {
    /// Ship name
    pub name: String,
    /// Hull class
    pub ship_class: String,
    /// Current system
    pub system_id: SystemId,
    /// Station docked at
    pub station_id: Option<StationId>,
    /// In-system coordinates
    pub position: Vec2,
    /// Whether the ship is travelling
    pub in_transit: bool,
    /// Standing, -100..100
    pub reputation: i32,
    /// Cargo on board
    pub cargo: BTreeMap<Commodity, u32>,
    /// Credits
    pub credits: u64,
}

impl PlayerShip {
    /// Creates a player record at `position` in `system_id`.
    #[must_use]
    pub fn new(name: impl Into<String>, ship_class: impl Into<String>, system_id: SystemId, position: Vec2) -> Self {
        Self {
            name: name.into(),
            ship_class: ship_class.into(),
            system_id,
            station_id: None,
            position,
            in_transit: false,
            reputation: 0,
            cargo: BTreeMap::new(),
            credits: 0,
        }
    }

    /// Wraps the record in a shared handle.
    #[must_use]
    pub fn into_shared(self) -> SharedPlayer {
        Arc::new(RwLock::new(self))
    }

    /// Cargo value at base prices.
    #[must_use]
    pub fn estimated_cargo_value(&self) -> u64 {
        self.cargo
            .iter()
            .map(|(commodity, qty)| commodity.base_value() * u64::from(*qty))
            .sum()
    }
}
