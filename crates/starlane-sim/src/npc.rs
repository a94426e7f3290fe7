//! NPC ship records.
//!
//! An [`NpcShip`] is the complete state of one simulated ship: identity,
//! location, movement, AI state, cargo, and finances. Records are owned and
//! mutated by [`crate::manager::NpcAiManager`]; everything else reads them.

use serde::{Deserialize, Serialize};
use starlane_common::{NpcId, SectorId, StationId, SystemId, Vec2};
use std::collections::{BTreeMap, VecDeque};
use thiserror::Error;

use crate::commodity::Commodity;
use crate::movement::{Mover, ShipMover};

/// Goals kept in [`NpcShip::goal_history`].
pub const GOAL_HISTORY_LIMIT: usize = 10;

/// Routes kept in [`RouteKnowledge::profitable_routes`].
pub const PROFITABLE_ROUTE_LIMIT: usize = 10;

/// Error types for NPC lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NpcError {
    /// NPC not found
    #[error("NPC not found: {0}")]
    NotFound(NpcId),
}

/// Result type for NPC operations.
pub type NpcResult<T> = Result<T, NpcError>;

/// Error types for cargo mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CargoError {
    /// Hold cannot take the requested quantity
    #[error("Cargo capacity exceeded: requested {requested}, available {available}")]
    CapacityExceeded {
        /// Units requested
        requested: u32,
        /// Units of free space
        available: u32,
    },
    /// Not enough of the commodity on board
    #[error("Insufficient {commodity}: requested {requested}, held {held}")]
    InsufficientQuantity {
        /// Commodity requested
        commodity: Commodity,
        /// Units requested
        requested: u32,
        /// Units on board
        held: u32,
    },
}

/// Ship role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NpcType {
    /// Buys low, sells high
    Trader,
    /// Preys on other ships
    Pirate,
    /// Keeps the peace
    Patrol,
    /// Private traffic
    Civilian,
    /// Bulk cargo mover
    Transport,
}

impl NpcType {
    /// Every type, in a stable order.
    pub const ALL: [Self; 5] = [
        Self::Trader,
        Self::Pirate,
        Self::Patrol,
        Self::Civilian,
        Self::Transport,
    ];

    /// Name prefixes used when generating ship names.
    #[must_use]
    pub const fn name_prefixes(self) -> &'static [&'static str] {
        match self {
            Self::Trader => &["Merchant", "Trader", "Freebooter"],
            Self::Pirate => &["Raider", "Corsair", "Reaver"],
            Self::Patrol => &["Patrol", "Warden", "Sentinel"],
            Self::Civilian => &["Voyager", "Pilgrim", "Wanderer"],
            Self::Transport => &["Hauler", "Convoy", "Carrier"],
        }
    }

    /// Hull classes this type flies.
    #[must_use]
    pub const fn class_pool(self) -> &'static [&'static str] {
        match self {
            Self::Trader => &["Caravel Trader", "Mule Hauler", "Swift Runner"],
            Self::Pirate => &["Corsair Raider", "Viper Interceptor"],
            Self::Patrol => &["Warden Cutter", "Viper Interceptor"],
            Self::Civilian => &["Sparrow Courier", "Pathfinder Scout", "Swift Runner"],
            Self::Transport => &["Mule Hauler", "Leviathan Freighter"],
        }
    }

    /// Inclusive starting credit range.
    #[must_use]
    pub const fn credit_range(self) -> (u64, u64) {
        match self {
            Self::Trader => (5_000, 20_000),
            Self::Pirate => (1_000, 8_000),
            Self::Patrol => (2_000, 6_000),
            Self::Civilian => (500, 3_000),
            Self::Transport => (8_000, 25_000),
        }
    }

    /// Goal a freshly spawned ship starts with.
    #[must_use]
    pub const fn initial_goal_type(self) -> GoalType {
        match self {
            Self::Trader | Self::Transport => GoalType::Trade,
            Self::Pirate => GoalType::Pirate,
            Self::Patrol => GoalType::Patrol,
            Self::Civilian => GoalType::Idle,
        }
    }

    /// Goal an idle ship of this type rolls when it picks something to do.
    #[must_use]
    pub const fn active_goal_type(self) -> GoalType {
        match self {
            Self::Trader | Self::Transport | Self::Civilian => GoalType::Trade,
            Self::Pirate => GoalType::Pirate,
            Self::Patrol => GoalType::Patrol,
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Trader => "trader",
            Self::Pirate => "pirate",
            Self::Patrol => "patrol",
            Self::Civilian => "civilian",
            Self::Transport => "transport",
        }
    }
}

/// Goal discriminant, used in events and dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalType {
    /// Trading
    Trade,
    /// Patrolling
    Patrol,
    /// Hunting
    Pirate,
    /// Nothing to do
    Idle,
}

/// How a pirate hunts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HuntStyle {
    /// Takes whatever comes along
    Opportunistic,
    /// Waits near stations
    Ambush,
    /// Goes after rich targets
    Raid,
}

/// Goal with its typed parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GoalKind {
    /// Trade, optionally focused on one commodity
    Trade {
        /// Preferred commodity
        commodity: Option<Commodity>,
    },
    /// Patrol stations in the current system
    Patrol {
        /// Patrol radius
        radius: f32,
    },
    /// Hunt other ships
    Pirate {
        /// Hunting style
        hunt: HuntStyle,
    },
    /// No activity
    Idle,
}

impl GoalKind {
    /// Discriminant of this goal.
    #[must_use]
    pub const fn goal_type(&self) -> GoalType {
        match self {
            Self::Trade { .. } => GoalType::Trade,
            Self::Patrol { .. } => GoalType::Patrol,
            Self::Pirate { .. } => GoalType::Pirate,
            Self::Idle => GoalType::Idle,
        }
    }
}

/// An NPC's current high-level objective.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NpcGoal {
    /// Goal and parameters
    pub kind: GoalKind,
    /// Priority, 0-10
    pub priority: u8,
    /// When the goal was adopted (ms)
    pub started_at: u64,
}

impl NpcGoal {
    /// Creates a goal.
    #[must_use]
    pub const fn new(kind: GoalKind, priority: u8, started_at: u64) -> Self {
        Self {
            kind,
            priority,
            started_at,
        }
    }

    /// Idle goal.
    #[must_use]
    pub const fn idle(started_at: u64) -> Self {
        Self::new(GoalKind::Idle, 1, started_at)
    }

    /// Discriminant of this goal.
    #[must_use]
    pub const fn goal_type(&self) -> GoalType {
        self.kind.goal_type()
    }
}

/// A skill an NPC can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    /// Willingness to accept danger
    RiskTolerance,
    /// Inclination to start fights
    Aggressiveness,
    /// Trading ability
    Trading,
    /// Fighting ability
    Combat,
    /// Piloting ability
    Navigation,
    /// Conversation ability
    Social,
    /// Knowledge of prices
    MarketKnowledge,
}

/// Skill scalars, each 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    /// Willingness to accept danger
    pub risk_tolerance: f32,
    /// Inclination to start fights
    pub aggressiveness: f32,
    /// Trading ability
    pub trading: f32,
    /// Fighting ability
    pub combat: f32,
    /// Piloting ability
    pub navigation: f32,
    /// Conversation ability
    pub social: f32,
    /// Knowledge of prices
    pub market_knowledge: f32,
}

impl Default for Skills {
    fn default() -> Self {
        Self {
            risk_tolerance: 50.0,
            aggressiveness: 50.0,
            trading: 50.0,
            combat: 50.0,
            navigation: 50.0,
            social: 50.0,
            market_knowledge: 50.0,
        }
    }
}

impl Skills {
    /// Reads one skill.
    #[must_use]
    pub const fn get(&self, skill: Skill) -> f32 {
        match skill {
            Skill::RiskTolerance => self.risk_tolerance,
            Skill::Aggressiveness => self.aggressiveness,
            Skill::Trading => self.trading,
            Skill::Combat => self.combat,
            Skill::Navigation => self.navigation,
            Skill::Social => self.social,
            Skill::MarketKnowledge => self.market_knowledge,
        }
    }

    fn slot(&mut self, skill: Skill) -> &mut f32 {
        match skill {
            Skill::RiskTolerance => &mut self.risk_tolerance,
            Skill::Aggressiveness => &mut self.aggressiveness,
            Skill::Trading => &mut self.trading,
            Skill::Combat => &mut self.combat,
            Skill::Navigation => &mut self.navigation,
            Skill::Social => &mut self.social,
            Skill::MarketKnowledge => &mut self.market_knowledge,
        }
    }

    /// Adds `delta` to a skill, clamped to 0-100.
    pub fn adjust(&mut self, skill: Skill, delta: f32) {
        let slot = self.slot(skill);
        *slot = (*slot + delta).clamp(0.0, 100.0);
    }

    /// Fraction of top speed this pilot uses (0.7-1.0 by navigation).
    #[must_use]
    pub fn speed_factor(&self) -> f32 {
        0.7 + 0.3 * (self.navigation / 100.0).clamp(0.0, 1.0)
    }
}

/// Temperament archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonalityType {
    /// Avoids danger
    Cautious,
    /// Seeks confrontation
    Aggressive,
    /// Chases profit
    Greedy,
    /// Keeps its word
    Honorable,
    /// Goes where the wind blows
    Opportunist,
}

/// A character trait and the skill changes it causes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityTrait {
    /// Trait name
    pub name: String,
    /// Skill deltas applied when the NPC is created
    pub effects: Vec<(Skill, f32)>,
}

/// Temperament plus traits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    /// Archetype
    pub personality_type: PersonalityType,
    /// Traits
    pub traits: Vec<PersonalityTrait>,
}

impl Personality {
    /// Applies every trait's effects to `skills`.
    pub fn apply_to(&self, skills: &mut Skills) {
        for personality_trait in &self.traits {
            for (skill, delta) in &personality_trait.effects {
                skills.adjust(*skill, *delta);
            }
        }
    }
}

/// Nearby danger as seen by one NPC.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreatAssessment {
    /// NPCs currently considered threats
    pub nearby_threats: Vec<NpcId>,
    /// Highest threat level, 0-100
    pub level: f32,
    /// When the assessment was last refreshed (ms)
    pub last_update: u64,
}

/// A trade route an NPC found profitable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeRoute {
    /// Station bought at
    pub from: StationId,
    /// Station sold at
    pub to: StationId,
    /// Commodity carried
    pub commodity: Commodity,
    /// Profit as a fraction of purchase cost
    pub margin: f32,
    /// When the route was last confirmed (ms)
    pub discovered_at: u64,
}

/// Last purchase, used to price the next sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Where it was bought
    pub station_id: StationId,
    /// What was bought
    pub commodity: Commodity,
    /// Price paid per unit
    pub unit_price: u64,
    /// When (ms)
    pub at: u64,
}

/// Route knowledge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteKnowledge {
    /// Best known route per commodity
    pub preferred_routes: BTreeMap<Commodity, TradeRoute>,
    /// Sectors this NPC stays out of
    pub avoided_sectors: Vec<SectorId>,
    /// Most recent profitable routes, newest first
    pub profitable_routes: VecDeque<TradeRoute>,
    /// Last purchase
    pub last_purchase: Option<PurchaseRecord>,
}

impl RouteKnowledge {
    /// Records a profitable route, keeping the list bounded and the preferred map current.
    pub fn record_profitable_route(&mut self, route: TradeRoute) {
        self.profitable_routes.retain(|r| {
            !(r.from == route.from && r.to == route.to && r.commodity == route.commodity)
        });
        self.profitable_routes.push_front(route);
        self.profitable_routes.truncate(PROFITABLE_ROUTE_LIMIT);

        let replace = self
            .preferred_routes
            .get(&route.commodity)
            .map_or(true, |best| route.margin >= best.margin);
        if replace {
            self.preferred_routes.insert(route.commodity, route);
        }
    }

    /// Most profitable known route that starts somewhere other than `current`.
    #[must_use]
    pub fn best_route_from_elsewhere(&self, current: Option<StationId>) -> Option<&TradeRoute> {
        self.profitable_routes
            .iter()
            .filter(|r| Some(r.from) != current)
            .max_by(|a, b| a.margin.total_cmp(&b.margin))
    }
}

/// One simulated non-player ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcShip {
    // === Identity ===
    /// Ship ID
    pub id: NpcId,
    /// Ship name
    pub name: String,
    /// Role
    pub npc_type: NpcType,
    /// Faction
    pub faction: String,

    // === Position ===
    /// Current system
    pub system_id: SystemId,
    /// Station docked at
    pub station_id: Option<StationId>,
    /// In-system coordinates
    pub coordinates: Vec2,
    /// Whether the ship is travelling
    pub in_transit: bool,

    // === Movement ===
    /// Base speed scalar
    pub speed: f32,
    /// Movement integrator
    pub mover: ShipMover,
    /// Station to dock at on arrival
    pub target_station: Option<StationId>,

    // === AI ===
    /// Temperament
    pub personality: Personality,
    /// Current objective
    pub current_goal: NpcGoal,
    /// Previous objectives, newest last
    pub goal_history: VecDeque<NpcGoal>,
    /// No decisions before this time (ms)
    pub decision_cooldown: u64,
    /// Skills
    pub skills: Skills,
    /// Threat assessment
    pub threat: ThreatAssessment,
    /// Route knowledge
    pub routes: RouteKnowledge,

    // === Ship ===
    /// Hull class name
    pub ship_class: String,
    /// Hold size
    pub cargo_capacity: u32,
    /// Cargo on board
    pub cargo: BTreeMap<Commodity, u32>,
    /// Hull condition, 0-100
    pub condition: f32,
    /// Fuel on board
    pub fuel: f32,
    /// Tank size
    pub fuel_capacity: f32,

    // === Economy ===
    /// Credits
    pub credits: u64,
    /// Standing with the player, -100..100
    pub reputation: i32,
    /// Last time this NPC acted (ms)
    pub last_action_time: u64,
}

impl NpcShip {
    /// Replaces the current goal, archiving the old one. Returns the old goal type.
    pub fn set_goal(&mut self, goal: NpcGoal) -> GoalType {
        let previous = std::mem::replace(&mut self.current_goal, goal);
        self.goal_history.push_back(previous);
        while self.goal_history.len() > GOAL_HISTORY_LIMIT {
            self.goal_history.pop_front();
        }
        previous.goal_type()
    }

    /// Current goal type.
    #[must_use]
    pub const fn goal_type(&self) -> GoalType {
        self.current_goal.goal_type()
    }

    /// Units of cargo on board.
    #[must_use]
    pub fn cargo_used(&self) -> u32 {
        self.cargo.values().sum()
    }

    /// Free hold space.
    #[must_use]
    pub fn free_cargo(&self) -> u32 {
        self.cargo_capacity.saturating_sub(self.cargo_used())
    }

    /// Fraction of the hold in use.
    #[must_use]
    pub fn cargo_fill(&self) -> f32 {
        if self.cargo_capacity == 0 {
            return 1.0;
        }
        self.cargo_used() as f32 / self.cargo_capacity as f32
    }

    /// Units of `commodity` on board.
    #[must_use]
    pub fn cargo_of(&self, commodity: Commodity) -> u32 {
        self.cargo.get(&commodity).copied().unwrap_or(0)
    }

    /// Loads cargo.
    ///
    /// # Errors
    /// Returns [`CargoError::CapacityExceeded`] if the hold cannot take `quantity`.
    pub fn add_cargo(&mut self, commodity: Commodity, quantity: u32) -> Result<(), CargoError> {
        let available = self.free_cargo();
        if quantity > available {
            return Err(CargoError::CapacityExceeded {
                requested: quantity,
                available,
            });
        }
        if quantity > 0 {
            *self.cargo.entry(commodity).or_insert(0) += quantity;
        }
        Ok(())
    }

    /// Unloads cargo.
    ///
    /// # Errors
    /// Returns [`CargoError::InsufficientQuantity`] if fewer than `quantity` units are held.
    pub fn remove_cargo(&mut self, commodity: Commodity, quantity: u32) -> Result<(), CargoError> {
        let held = self.cargo_of(commodity);
        if quantity > held {
            return Err(CargoError::InsufficientQuantity {
                commodity,
                requested: quantity,
                held,
            });
        }
        if quantity == held {
            self.cargo.remove(&commodity);
        } else {
            self.cargo.insert(commodity, held - quantity);
        }
        Ok(())
    }

    /// Cargo value at base prices.
    #[must_use]
    pub fn estimated_cargo_value(&self) -> u64 {
        self.cargo
            .iter()
            .map(|(commodity, qty)| commodity.base_value() * u64::from(*qty))
            .sum()
    }

    /// Adds `delta` to reputation, clamped to -100..100.
    pub fn adjust_reputation(&mut self, delta: i32) {
        self.reputation = self.reputation.saturating_add(delta).clamp(-100, 100);
    }

    /// Whether the ship is docked.
    #[must_use]
    pub const fn is_docked(&self) -> bool {
        self.station_id.is_some()
    }

    /// Starts a direct flight to `point`, undocking if needed.
    pub fn fly_to(&mut self, point: Vec2, station: Option<StationId>) {
        self.station_id = None;
        self.target_station = station;
        self.in_transit = true;
        self.mover.set_target(point);
    }

    /// Starts a waypoint flight, undocking if needed. Empty paths are ignored.
    pub fn fly_path(&mut self, path: Vec<Vec2>, station: Option<StationId>) {
        if path.is_empty() {
            return;
        }
        self.station_id = None;
        self.target_station = station;
        self.in_transit = true;
        self.mover.set_waypoints(path);
    }

    /// Halts the ship where it is.
    pub fn halt(&mut self) {
        self.mover.stop();
        self.target_station = None;
        self.in_transit = false;
    }

    /// Docks at `station`, ending any flight.
    pub fn dock(&mut self, station: StationId) {
        self.mover.stop();
        self.station_id = Some(station);
        self.target_station = None;
        self.in_transit = false;
    }

    /// Copies the mover's position and motion flag into the record.
    pub fn sync_from_mover(&mut self) {
        self.coordinates = self.mover.position();
        self.in_transit = self.mover.is_moving();
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::ship_class::MovementProfile;

    /// Minimal ship used across module tests.
    pub(crate) fn test_ship(id: u64, npc_type: NpcType, system: SystemId, position: Vec2) -> NpcShip {
        NpcShip {
            id: NpcId::from_raw(id),
            name: format!("Test {id}"),
            npc_type,
            faction: "Independent".to_string(),
            system_id: system,
            station_id: None,
            coordinates: position,
            in_transit: false,
            speed: 100.0,
            mover: ShipMover::new(position, MovementProfile::default()),
            target_station: None,
            personality: Personality {
                personality_type: PersonalityType::Opportunist,
                traits: Vec::new(),
            },
            current_goal: NpcGoal::new(
                GoalKind::Trade { commodity: None },
                5,
                0,
            ),
            goal_history: VecDeque::new(),
            decision_cooldown: 0,
            skills: Skills::default(),
            threat: ThreatAssessment::default(),
            routes: RouteKnowledge::default(),
            ship_class: "Caravel Trader".to_string(),
            cargo_capacity: 100,
            cargo: BTreeMap::new(),
            condition: 100.0,
            fuel: 100.0,
            fuel_capacity: 100.0,
            credits: 10_000,
            reputation: 0,
            last_action_time: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::test_ship;
    use super::*;

    fn ship() -> NpcShip {
        test_ship(1, NpcType::Trader, SystemId::new(1), Vec2::ZERO)
    }

    #[test]
    fn test_goal_history_is_bounded() {
        let mut npc = ship();
        for i in 0..25 {
            let previous = npc.set_goal(NpcGoal::idle(i));
            assert!(matches!(previous, GoalType::Trade | GoalType::Idle));
            assert!(npc.goal_history.len() <= GOAL_HISTORY_LIMIT);
        }
        assert_eq!(npc.goal_history.len(), GOAL_HISTORY_LIMIT);
        assert_eq!(npc.goal_type(), GoalType::Idle);
    }

    #[test]
    fn test_cargo_capacity_enforced() {
        let mut npc = ship();
        npc.add_cargo(Commodity::Ore, 60).expect("fits");
        let err = npc
            .add_cargo(Commodity::Food, 50)
            .expect_err("hold is too small");
        assert_eq!(
            err,
            CargoError::CapacityExceeded {
                requested: 50,
                available: 40
            }
        );
        assert_eq!(npc.cargo_used(), 60);
        assert!((npc.cargo_fill() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_remove_cargo() {
        let mut npc = ship();
        npc.add_cargo(Commodity::Metals, 10).expect("fits");
        assert!(npc.remove_cargo(Commodity::Metals, 11).is_err());
        npc.remove_cargo(Commodity::Metals, 10).expect("held");
        assert!(npc.cargo.is_empty());
    }

    #[test]
    fn test_reputation_clamped() {
        let mut npc = ship();
        npc.adjust_reputation(500);
        assert_eq!(npc.reputation, 100);
        npc.adjust_reputation(i32::MIN);
        assert_eq!(npc.reputation, -100);
    }

    #[test]
    fn test_skill_adjust_clamps() {
        let mut skills = Skills::default();
        skills.adjust(Skill::Combat, 80.0);
        assert_eq!(skills.get(Skill::Combat), 100.0);
        skills.adjust(Skill::Combat, -250.0);
        assert_eq!(skills.get(Skill::Combat), 0.0);
        assert!((skills.speed_factor() - 0.85).abs() < 1e-6);
    }

    #[test]
    fn test_profitable_routes_bounded_and_deduplicated() {
        let mut routes = RouteKnowledge::default();
        for i in 0..15 {
            routes.record_profitable_route(TradeRoute {
                from: StationId::new(1),
                to: StationId::new(100 + i),
                commodity: Commodity::Food,
                margin: 0.1,
                discovered_at: u64::from(i),
            });
        }
        assert_eq!(routes.profitable_routes.len(), PROFITABLE_ROUTE_LIMIT);

        let repeat = TradeRoute {
            from: StationId::new(1),
            to: StationId::new(114),
            commodity: Commodity::Food,
            margin: 0.5,
            discovered_at: 99,
        };
        routes.record_profitable_route(repeat);
        assert_eq!(routes.profitable_routes.len(), PROFITABLE_ROUTE_LIMIT);
        assert_eq!(routes.profitable_routes.front(), Some(&repeat));
        assert_eq!(routes.preferred_routes.get(&Commodity::Food), Some(&repeat));
    }

    #[test]
    fn test_dock_ends_flight() {
        let mut npc = ship();
        npc.fly_to(Vec2::new(100.0, 0.0), Some(StationId::new(3)));
        assert!(npc.in_transit);
        assert!(!npc.is_docked());
        npc.dock(StationId::new(3));
        assert_eq!(npc.station_id, Some(StationId::new(3)));
        assert!(!npc.in_transit);
        assert!(!npc.mover.is_moving());
    }
}
