//! NPC AI manager.
//!
//! [`NpcAiManager`] owns every NPC record, conversation, and market
//! behaviour. The host calls [`NpcAiManager::update`] once per frame; the
//! manager fans out into gated passes (AI decisions, spawning, market) and
//! per-frame passes (threat refresh, avoidance, movement).

use starlane_common::{distance, NpcId, StationId, SystemId, TimeSource, Vec2};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, info, trace};

use crate::combat::{decide_combat, Candidate, CombatAction, TargetRef, PLAYER_THREAT};
use crate::config::AiConfig;
use crate::conversation::{ConversationError, ConversationResult, ConversationStep, NpcConversation};
use crate::events::{EventBus, SimEvent};
use crate::market::NpcMarketBehavior;
use crate::movement::{MovementPhase, Mover};
use crate::npc::{GoalKind, GoalType, NpcError, NpcResult, NpcShip, NpcType, Skill};
use crate::pathfinding::generate_waypoints;
use crate::player::SharedPlayer;
use crate::snapshot::SimSnapshot;
use crate::spawn::{make_goal, roll_npc_type, spawn_npc};
use crate::threat::{assess_threats, avoidance_vector, base_threat, Contact};
use crate::trade::{decide_trade, execute_buy, execute_sell, TradeAction};
use crate::world::{GalaxyQuery, Station};

/// Notable happenings remembered for conversation context.
const RECENT_ACTIVITY_LIMIT: usize = 5;

/// Spacing between pirates answering a backup call.
const BACKUP_SPACING: f32 = 40.0;

/// Threat assumed for NPCs that pose no particular danger to a pirate.
const HARMLESS_TARGET_THREAT: f32 = 10.0;

/// Owns and drives all NPCs.
#[derive(Debug)]
pub struct NpcAiManager {
    galaxy: Arc<dyn GalaxyQuery>,
    clock: Arc<dyn TimeSource>,
    player: Option<SharedPlayer>,
    config: AiConfig,
    rng: fastrand::Rng,
    events: EventBus,

    npc_ships: BTreeMap<NpcId, NpcShip>,
    active_conversations: BTreeMap<NpcId, NpcConversation>,
    market_behaviors: BTreeMap<(NpcId, StationId), NpcMarketBehavior>,

    last_spawn_tick: u64,
    last_ai_tick: u64,
    last_market_tick: u64,
    next_npc_id: u64,

    recent_activity: VecDeque<String>,
}

impl NpcAiManager {
    /// Creates a manager with no NPCs. Interval timers start at the current time.
    #[must_use]
    pub fn new(
        galaxy: Arc<dyn GalaxyQuery>,
        clock: Arc<dyn TimeSource>,
        mut config: AiConfig,
        seed: u64,
    ) -> Self {
        config.validate();
        let now = clock.now_ms();
        let events = EventBus::new(config.event_capacity);
        Self {
            galaxy,
            clock,
            player: None,
            config,
            rng: fastrand::Rng::with_seed(seed),
            events,
            npc_ships: BTreeMap::new(),
            active_conversations: BTreeMap::new(),
            market_behaviors: BTreeMap::new(),
            last_spawn_tick: now,
            last_ai_tick: now,
            last_market_tick: now,
            next_npc_id: 1,
            recent_activity: VecDeque::new(),
        }
    }

    /// Attaches the shared player record.
    #[must_use]
    pub fn with_player(mut self, player: SharedPlayer) -> Self {
        self.player = Some(player);
        self
    }

    /// Replaces the shared player record.
    pub fn set_player(&mut self, player: Option<SharedPlayer>) {
        self.player = player;
    }

    /// Runs the initial population passes.
    pub fn initialize(&mut self) {
        let now = self.clock.now_ms();
        for _ in 0..self.config.initial_spawn_rounds {
            self.spawn_pass(self.config.initial_spawn_chance, now);
        }
        self.last_spawn_tick = now;
        info!(
            npcs = self.npc_ships.len(),
            systems = self.galaxy.system_ids().len(),
            "NPC population initialised"
        );
    }

    /// Advances the simulation by one frame of `dt_ms` milliseconds.
    pub fn update(&mut self, dt_ms: f32) {
        let now = self.clock.now_ms();

        if now.saturating_sub(self.last_ai_tick) >= self.config.ai_tick_interval_ms {
            self.last_ai_tick = now;
            self.ai_pass(now);
        }

        if now.saturating_sub(self.last_spawn_tick) >= self.config.spawn_interval_ms {
            self.last_spawn_tick = now;
            self.spawn_pass(self.config.spawn_chance, now);
            self.despawn_idle(now);
        }

        if now.saturating_sub(self.last_market_tick) >= self.config.market_tick_interval_ms {
            self.last_market_tick = now;
            self.market_pass(now);
        }

        let dt = (dt_ms / 1000.0).max(0.0);
        self.refresh_threats(now);
        self.apply_avoidance();
        self.move_npcs(dt, now);
    }

    // ===== Queries =====

    /// NPCs in `system_id`.
    #[must_use]
    pub fn npcs_in_system(&self, system_id: SystemId) -> Vec<&NpcShip> {
        self.npc_ships
            .values()
            .filter(|npc| npc.system_id == system_id)
            .collect()
    }

    /// Looks up an NPC.
    #[must_use]
    pub fn npc(&self, id: NpcId) -> Option<&NpcShip> {
        self.npc_ships.get(&id)
    }

    /// All NPCs in id order.
    pub fn npcs(&self) -> impl Iterator<Item = &NpcShip> {
        self.npc_ships.values()
    }

    /// Number of live NPCs.
    #[must_use]
    pub fn npc_count(&self) -> usize {
        self.npc_ships.len()
    }

    /// Market behaviours keyed by (NPC, station).
    #[must_use]
    pub fn market_behaviors(&self) -> &BTreeMap<(NpcId, StationId), NpcMarketBehavior> {
        &self.market_behaviors
    }

    /// Active conversation with `id`.
    #[must_use]
    pub fn conversation(&self, id: NpcId) -> Option<&NpcConversation> {
        self.active_conversations.get(&id)
    }

    /// Number of open conversations.
    #[must_use]
    pub fn conversation_count(&self) -> usize {
        self.active_conversations.len()
    }

    /// Event bus.
    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &AiConfig {
        &self.config
    }

    // ===== Host commands =====

    /// Spawns an NPC of `npc_type` docked at `station_id`, respecting the system cap.
    pub fn spawn_at(&mut self, npc_type: NpcType, station_id: StationId) -> Option<NpcId> {
        let station = self.galaxy.station(station_id)?.clone();
        if self.count_in_system(station.system_id) >= self.config.max_npcs_per_system {
            return None;
        }
        let now = self.clock.now_ms();
        Some(self.spawn(npc_type, &station, now))
    }

    /// Removes an NPC with its market behaviours and conversation.
    pub fn despawn_npc(&mut self, id: NpcId) -> NpcResult<NpcShip> {
        let npc = self.npc_ships.remove(&id).ok_or(NpcError::NotFound(id))?;
        self.market_behaviors.retain(|(owner, _), _| *owner != id);
        if self.active_conversations.remove(&id).is_some() {
            self.events.publish(SimEvent::ConversationEnded { npc_id: id });
        }
        self.events.publish(SimEvent::NpcDespawned { npc_id: id });
        info!(npc = %id, name = %npc.name, "NPC despawned");
        Ok(npc)
    }

    /// Orders an NPC to fly directly to `point`.
    pub fn command_move(&mut self, id: NpcId, point: Vec2) -> NpcResult<()> {
        let npc = self.npc_ships.get_mut(&id).ok_or(NpcError::NotFound(id))?;
        npc.fly_to(point, None);
        debug!(npc = %id, x = point.x, y = point.y, "Move commanded");
        Ok(())
    }

    /// Orders an NPC along `path`. Empty paths are ignored.
    pub fn command_waypoints(&mut self, id: NpcId, path: Vec<Vec2>) -> NpcResult<()> {
        let npc = self.npc_ships.get_mut(&id).ok_or(NpcError::NotFound(id))?;
        npc.fly_path(path, None);
        Ok(())
    }

    // ===== Conversations =====

    /// Opens a conversation with `id`, replacing any open one.
    pub fn start_conversation(&mut self, id: NpcId) -> ConversationResult<&NpcConversation> {
        let npc = self
            .npc_ships
            .get(&id)
            .ok_or(ConversationError::NpcNotFound(id))?;
        let security = self.galaxy.system(npc.system_id).map(|s| s.security);
        let recent = self.recent_activity.iter().cloned().collect();
        let now = self.clock.now_ms();
        let conversation = NpcConversation::build(npc, security, recent, now, &mut self.rng);

        self.events.publish(SimEvent::ConversationStarted {
            npc_id: id,
            conversation_type: conversation.conversation_type,
        });
        debug!(npc = %id, kind = ?conversation.conversation_type, mood = ?conversation.context.mood, "Conversation started");
        self.active_conversations.insert(id, conversation);
        self.active_conversations
            .get(&id)
            .ok_or(ConversationError::NoActiveConversation(id))
    }

    /// Picks choice `index` in the conversation with `id`. Reaching the end closes it.
    pub fn choose(&mut self, id: NpcId, index: usize) -> ConversationResult<ConversationStep> {
        let conversation = self
            .active_conversations
            .get_mut(&id)
            .ok_or(ConversationError::NoActiveConversation(id))?;
        let step = conversation.choose(index)?;
        if step == ConversationStep::Ended {
            self.active_conversations.remove(&id);
            self.events.publish(SimEvent::ConversationEnded { npc_id: id });
        }
        Ok(step)
    }

    /// Closes the conversation with `id`.
    pub fn end_conversation(&mut self, id: NpcId) -> ConversationResult<()> {
        self.active_conversations
            .remove(&id)
            .ok_or(ConversationError::NoActiveConversation(id))?;
        self.events.publish(SimEvent::ConversationEnded { npc_id: id });
        Ok(())
    }

    // ===== Persistence =====

    /// Snapshot of every owned map and the interval timers.
    #[must_use]
    pub fn state(&self) -> SimSnapshot {
        SimSnapshot::new(
            self.npc_ships.clone(),
            self.market_behaviors.values().cloned().collect(),
            self.active_conversations.clone(),
            self.last_ai_tick,
            self.last_spawn_tick,
            self.last_market_tick,
            self.next_npc_id,
        )
    }

    /// Replaces all owned state with `snapshot`.
    pub fn load_state(&mut self, snapshot: SimSnapshot) {
        let highest = snapshot
            .npc_ships
            .keys()
            .map(|id| id.raw() + 1)
            .max()
            .unwrap_or(1);
        self.next_npc_id = snapshot.next_npc_id.max(highest);
        self.npc_ships = snapshot.npc_ships;
        self.market_behaviors = snapshot
            .market_behaviors
            .into_iter()
            .map(|b| ((b.npc_id, b.station_id), b))
            .collect();
        self.active_conversations = snapshot.active_conversations;
        self.last_ai_tick = snapshot.last_ai_tick;
        self.last_spawn_tick = snapshot.last_spawn_tick;
        self.last_market_tick = snapshot.last_market_tick;
        info!(npcs = self.npc_ships.len(), "Simulation state loaded");
    }

    // ===== Population =====

    fn count_in_system(&self, system_id: SystemId) -> usize {
        self.npc_ships
            .values()
            .filter(|npc| npc.system_id == system_id)
            .count()
    }

    fn spawn_pass(&mut self, chance: f32, now: u64) {
        let galaxy = Arc::clone(&self.galaxy);
        for system_id in galaxy.system_ids() {
            if self.count_in_system(system_id) >= self.config.max_npcs_per_system {
                continue;
            }
            if self.rng.f32() >= chance {
                continue;
            }
            let stations = galaxy.stations_in_system(system_id);
            if stations.is_empty() {
                continue;
            }
            let station = stations[self.rng.usize(..stations.len())];
            let npc_type = roll_npc_type(&mut self.rng);
            self.spawn(npc_type, station, now);
        }
    }

    fn spawn(&mut self, npc_type: NpcType, station: &Station, now: u64) -> NpcId {
        let id = NpcId::from_raw(self.next_npc_id);
        self.next_npc_id += 1;

        let npc = spawn_npc(id, npc_type, station, now, &mut self.rng);
        if npc_type == NpcType::Trader {
            let behavior = NpcMarketBehavior::generate(&npc, station.id, now, &mut self.rng);
            self.market_behaviors.insert((id, station.id), behavior);
        }
        info!(npc = %id, name = %npc.name, kind = npc_type.label(), station = %station.name, "NPC spawned");
        if npc_type == NpcType::Pirate {
            self.remember(format!("Pirate {} spotted near {}", npc.name, station.name));
        }

        self.events.publish(SimEvent::NpcSpawned {
            npc_id: id,
            npc_type,
            system_id: station.system_id,
        });
        self.npc_ships.insert(id, npc);
        id
    }

    fn despawn_idle(&mut self, now: u64) {
        let Some(ttl) = self.config.idle_despawn_after_ms else {
            return;
        };
        let expired: Vec<NpcId> = self
            .npc_ships
            .values()
            .filter(|npc| {
                let idle_since = npc.last_action_time.max(npc.current_goal.started_at);
                npc.is_docked()
                    && npc.goal_type() == GoalType::Idle
                    && now.saturating_sub(idle_since) >= ttl
            })
            .map(|npc| npc.id)
            .collect();
        for id in expired {
            self.despawn_npc(id).ok();
        }
    }

    fn remember(&mut self, note: String) {
        self.recent_activity.push_back(note);
        while self.recent_activity.len() > RECENT_ACTIVITY_LIMIT {
            self.recent_activity.pop_front();
        }
    }

    // ===== Decisions =====

    fn ai_pass(&mut self, now: u64) {
        let ids: Vec<NpcId> = self.npc_ships.keys().copied().collect();
        for id in ids {
            let Some(goal) = self
                .npc_ships
                .get(&id)
                .filter(|npc| npc.decision_cooldown <= now)
                .map(NpcShip::goal_type)
            else {
                continue;
            };

            match goal {
                GoalType::Trade => self.process_trade(id, now),
                GoalType::Patrol => self.process_patrol(id),
                GoalType::Pirate => self.process_pirate(id),
                GoalType::Idle => self.process_idle(id, now),
            }

            let cooldown = self
                .rng
                .u64(self.config.decision_cooldown_min_ms..=self.config.decision_cooldown_max_ms);
            if let Some(npc) = self.npc_ships.get_mut(&id) {
                npc.decision_cooldown = now + cooldown;
            }
        }
    }

    fn process_trade(&mut self, id: NpcId, now: u64) {
        let galaxy = Arc::clone(&self.galaxy);
        let Some(npc) = self.npc_ships.get_mut(&id) else {
            return;
        };
        let decision = decide_trade(npc, galaxy.as_ref(), &self.config, &mut self.rng);
        debug!(
            npc = %id,
            action = ?decision.action,
            confidence = decision.confidence,
            reason = %decision.reasoning,
            "Trade decision"
        );

        match decision.action {
            TradeAction::Travel { station } => {
                if let Some(target) = galaxy.station(station) {
                    npc.fly_path(generate_waypoints(npc.coordinates, target.position), Some(station));
                }
            }
            TradeAction::Buy {
                commodity,
                quantity,
            } => {
                let Some(station_id) = npc.station_id else {
                    return;
                };
                if let Some(receipt) =
                    execute_buy(npc, station_id, commodity, quantity, &mut self.rng, now)
                {
                    self.events.publish(SimEvent::TradeExecuted {
                        npc_id: id,
                        station_id,
                        commodity,
                        quantity: i64::from(receipt.quantity),
                        credits: -(receipt.total as i64),
                    });
                }
            }
            TradeAction::Sell {
                commodity,
                quantity,
            } => {
                let Some(station_id) = npc.station_id else {
                    return;
                };
                if let Some(receipt) =
                    execute_sell(npc, station_id, commodity, quantity, &mut self.rng, now)
                {
                    self.events.publish(SimEvent::TradeExecuted {
                        npc_id: id,
                        station_id,
                        commodity,
                        quantity: -i64::from(receipt.quantity),
                        credits: receipt.total as i64,
                    });
                }
            }
            TradeAction::Wait => {
                if npc.is_docked() {
                    npc.skills.adjust(Skill::MarketKnowledge, 1.0);
                }
            }
        }
    }

    /// Picks a station in the NPC's system other than the one it is docked at,
    /// preferring stations within the patrol radius.
    fn patrol_destination(&mut self, id: NpcId) -> Option<(StationId, Vec2)> {
        let npc = self.npc_ships.get(&id)?;
        let radius = match npc.current_goal.kind {
            GoalKind::Patrol { radius } => Some(radius),
            _ => None,
        };
        let candidates: Vec<(StationId, Vec2)> = self
            .galaxy
            .stations_in_system(npc.system_id)
            .into_iter()
            .filter(|station| Some(station.id) != npc.station_id)
            .map(|station| (station.id, station.position))
            .collect();
        let nearby: Vec<(StationId, Vec2)> = match radius {
            Some(radius) => candidates
                .iter()
                .copied()
                .filter(|(_, position)| distance(*position, npc.coordinates) <= radius)
                .collect(),
            None => Vec::new(),
        };
        let pool = if nearby.is_empty() { candidates } else { nearby };
        if pool.is_empty() {
            return None;
        }
        Some(pool[self.rng.usize(..pool.len())])
    }

    fn process_patrol(&mut self, id: NpcId) {
        if self.npc_ships.get(&id).map_or(true, |npc| npc.in_transit) {
            return;
        }
        match self.patrol_destination(id) {
            Some((station, position)) => {
                if let Some(npc) = self.npc_ships.get_mut(&id) {
                    npc.fly_path(generate_waypoints(npc.coordinates, position), Some(station));
                    debug!(npc = %id, %station, "Patrolling to station");
                }
            }
            None => debug!(npc = %id, "No patrol destination"),
        }
    }

    fn process_pirate(&mut self, id: NpcId) {
        let galaxy = Arc::clone(&self.galaxy);
        let Some(pirate) = self.npc_ships.get(&id) else {
            return;
        };

        let mut candidates = Vec::new();
        let mut allies = Vec::new();
        for other in self.npc_ships.values() {
            if other.id == id || other.system_id != pirate.system_id {
                continue;
            }
            if other.npc_type == NpcType::Pirate {
                allies.push((other.id, other.coordinates));
                continue;
            }
            let threat = base_threat(NpcType::Pirate, &Contact::from(other))
                .unwrap_or(HARMLESS_TARGET_THREAT);
            candidates.push(Candidate {
                target: TargetRef::Npc(other.id),
                position: other.coordinates,
                threat,
                value: other.estimated_cargo_value() + other.credits / 10,
            });
        }
        if let Some(player) = &self.player {
            let player = player.read();
            if player.system_id == pirate.system_id {
                candidates.push(Candidate {
                    target: TargetRef::Player,
                    position: player.position,
                    threat: PLAYER_THREAT,
                    value: player.estimated_cargo_value() + player.credits / 10,
                });
            }
        }

        let decision = decide_combat(pirate, &candidates, &allies, galaxy.as_ref());
        let origin = pirate.coordinates;
        let name = pirate.name.clone();
        debug!(
            npc = %id,
            action = ?decision.action,
            confidence = decision.confidence,
            reason = %decision.reasoning,
            "Combat decision"
        );

        match decision.action {
            CombatAction::Flee => {
                if let (Some(npc), Some(destination)) =
                    (self.npc_ships.get_mut(&id), decision.destination)
                {
                    npc.fly_path(generate_waypoints(origin, destination), decision.station);
                }
            }
            CombatAction::Engage | CombatAction::Intimidate => {
                if let (Some(npc), Some(destination)) =
                    (self.npc_ships.get_mut(&id), decision.destination)
                {
                    npc.fly_to(destination, None);
                }
            }
            CombatAction::CallBackup => {
                for (i, ally_id) in decision.backup.iter().enumerate() {
                    if let Some(ally) = self.npc_ships.get_mut(ally_id) {
                        let side = if i % 2 == 0 { 1.0 } else { -1.0 };
                        let offset = Vec2::new(0.0, side * BACKUP_SPACING * (i / 2 + 1) as f32);
                        ally.fly_path(generate_waypoints(ally.coordinates, origin + offset), None);
                    }
                }
            }
            CombatAction::Ignore => self.process_patrol(id),
        }

        if decision.action != CombatAction::Ignore {
            self.remember(format!(
                "{name} chose to {} near ({:.0}, {:.0})",
                decision.action.label(),
                origin.x,
                origin.y
            ));
        }
        self.events.publish(SimEvent::CombatDecision {
            npc_id: id,
            action: decision.action,
            target: decision.target.and_then(TargetRef::npc_id),
        });
    }

    fn process_idle(&mut self, id: NpcId, now: u64) {
        if self.rng.f32() >= self.config.idle_reroll_chance {
            return;
        }
        let Some(npc_type) = self.npc_ships.get(&id).map(|npc| npc.npc_type) else {
            return;
        };
        let goal = make_goal(npc_type.active_goal_type(), now, &mut self.rng);
        if let Some(npc) = self.npc_ships.get_mut(&id) {
            let from = npc.set_goal(goal);
            debug!(npc = %id, ?from, to = ?goal.goal_type(), "Goal changed");
            self.events.publish(SimEvent::GoalChanged {
                npc_id: id,
                from,
                to: goal.goal_type(),
            });
        }
    }

    // ===== Per-frame =====

    fn contacts_by_system(&self, include_docked: bool) -> BTreeMap<SystemId, Vec<Contact>> {
        let mut by_system: BTreeMap<SystemId, Vec<Contact>> = BTreeMap::new();
        for npc in self.npc_ships.values() {
            if include_docked || !npc.is_docked() {
                by_system
                    .entry(npc.system_id)
                    .or_default()
                    .push(Contact::from(npc));
            }
        }
        by_system
    }

    fn refresh_threats(&mut self, now: u64) {
        let refresh = self.config.threat_refresh_ms;
        let due = self
            .npc_ships
            .values()
            .any(|npc| now.saturating_sub(npc.threat.last_update) >= refresh);
        if !due {
            return;
        }

        let contacts = self.contacts_by_system(true);
        for npc in self.npc_ships.values_mut() {
            if now.saturating_sub(npc.threat.last_update) < refresh {
                continue;
            }
            let others = contacts.get(&npc.system_id).map_or(&[][..], Vec::as_slice);
            let scan = assess_threats(&Contact::from(&*npc), others, self.config.threat_scan_radius);
            npc.threat.nearby_threats = scan.threats;
            npc.threat.level = scan.level;
            npc.threat.last_update = now;
        }
    }

    fn apply_avoidance(&mut self) {
        let contacts = self.contacts_by_system(false);
        for npc in self.npc_ships.values_mut() {
            let avoidance = if npc.in_transit {
                let others = contacts.get(&npc.system_id).map_or(&[][..], Vec::as_slice);
                avoidance_vector(
                    &Contact::from(&*npc),
                    others,
                    self.config.avoidance_radius,
                    self.config.collision_radius,
                )
            } else {
                Vec2::ZERO
            };
            npc.mover.set_avoidance(avoidance);
        }
    }

    fn move_npcs(&mut self, dt: f32, now: u64) {
        if dt <= 0.0 {
            return;
        }
        for npc in self.npc_ships.values_mut() {
            if !npc.mover.is_moving() {
                continue;
            }
            let phase = npc.mover.update(dt);
            npc.sync_from_mover();
            trace!(npc = %npc.id, ?phase, x = npc.coordinates.x, y = npc.coordinates.y, "NPC moved");

            if phase == MovementPhase::Arrived {
                let docked_at = npc.target_station;
                if let Some(station) = docked_at {
                    npc.dock(station);
                }
                npc.last_action_time = now;
                debug!(npc = %npc.id, ?docked_at, "NPC arrived");
                self.events.publish(SimEvent::Arrived {
                    npc_id: npc.id,
                    position: npc.coordinates,
                    docked_at,
                });
            }
        }
    }

    // ===== Market =====

    fn market_pass(&mut self, now: u64) {
        for behavior in self.market_behaviors.values_mut() {
            for commodity in behavior.participate(now, &mut self.rng) {
                self.events.publish(SimEvent::MarketParticipation {
                    npc_id: behavior.npc_id,
                    station_id: behavior.station_id,
                    commodity,
                });
            }
        }
    }
}
