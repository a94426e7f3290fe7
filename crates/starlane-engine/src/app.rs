//! Headless simulation host.
//!
//! Generates a galaxy, wires the AI manager and the scene together, and
//! drives them at a fixed timestep for the configured duration.

use anyhow::{Context, Result};
use serde::Serialize;
use starlane_common::{ManualClock, MonotonicClock, TimeSource, Vec2};
use starlane_sim::{
    Galaxy, GalaxyQuery, Mover, NpcAiManager, PlayerShip, SceneManager, ShipActor, ShipClass, SimEvent,
    SHIP_CLASSES,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::timing::FramePacer;

/// Event counts gathered over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Fixed steps simulated
    pub steps: u64,
    /// NPCs spawned
    pub spawned: u64,
    /// NPCs despawned
    pub despawned: u64,
    /// Goal switches
    pub goal_changes: u64,
    /// Flights completed
    pub arrivals: u64,
    /// Buys and sells
    pub trades: u64,
    /// Pirate decisions
    pub combat_decisions: u64,
    /// Market participations
    pub market_participations: u64,
    /// Conversations opened
    pub conversations: u64,
    /// Live NPCs at the end
    pub final_npcs: usize,
}

impl RunStats {
    fn record(&mut self, event: &SimEvent) {
        match event {
            SimEvent::NpcSpawned { .. } => self.spawned += 1,
            SimEvent::NpcDespawned { .. } => self.despawned += 1,
            SimEvent::GoalChanged { .. } => self.goal_changes += 1,
            SimEvent::Arrived { .. } => self.arrivals += 1,
            SimEvent::TradeExecuted { .. } => self.trades += 1,
            SimEvent::CombatDecision { .. } => self.combat_decisions += 1,
            SimEvent::MarketParticipation { .. } => self.market_participations += 1,
            SimEvent::ConversationStarted { .. } => self.conversations += 1,
            SimEvent::ConversationEnded { .. } => {},
        }
    }
}

/// Everything the loop touches each step.
struct Simulation {
    galaxy: Arc<Galaxy>,
    clock: ManualClock,
    manager: NpcAiManager,
    scene: SceneManager,
    rng: fastrand::Rng,
    autopilot: bool,
    stats: RunStats,
}

impl Simulation {
    fn new(config: &EngineConfig, seed: u64) -> Result<Self> {
        let galaxy = Arc::new(Galaxy::generate(&config.galaxy, seed));
        let home = galaxy
            .system_ids()
            .first()
            .copied()
            .context("generated galaxy has no systems")?;
        let spawn_point = galaxy
            .stations_in_system(home)
            .first()
            .map_or(Vec2::ZERO, |station| station.position);

        let class = ShipClass::by_name(&config.player_class).unwrap_or(&SHIP_CLASSES[0]);
        let player = PlayerShip::new(&config.player_name, class.name, home, spawn_point).into_shared();

        let clock = ManualClock::new(0);
        let time: Arc<dyn TimeSource> = if config.realtime {
            Arc::new(MonotonicClock::with_time_scale(f64::from(config.time_scale)))
        } else {
            Arc::new(clock.clone())
        };

        let world: Arc<dyn GalaxyQuery> = Arc::clone(&galaxy) as Arc<dyn GalaxyQuery>;
        let mut manager = NpcAiManager::new(world, time, config.ai.clone(), seed)
            .with_player(Arc::clone(&player));
        manager.initialize();

        let scene = SceneManager::new(ShipActor::for_player(player, class.movement_profile(&[])));
        info!(
            seed,
            systems = galaxy.system_ids().len(),
            stations = galaxy.station_count(),
            player_class = class.name,
            "Simulation ready"
        );

        Ok(Self {
            galaxy,
            clock,
            manager,
            scene,
            rng: fastrand::Rng::with_seed(seed ^ 0x5eed),
            autopilot: config.player_autopilot,
            stats: RunStats::default(),
        })
    }

    /// Sends the idle player to another station in its system.
    fn steer_player(&mut self) {
        if !self.autopilot || self.scene.player_is_moving() {
            return;
        }
        let position = self.scene.player().mover().position();
        let Some(home) = self.galaxy.system_ids().first().copied() else {
            return;
        };
        let stations: Vec<Vec2> = self
            .galaxy
            .stations_in_system(home)
            .into_iter()
            .map(|station| station.position)
            .filter(|p| p.distance(position) > 1.0)
            .collect();
        if stations.is_empty() {
            return;
        }
        let destination = stations[self.rng.usize(..stations.len())];
        debug!(x = destination.x, y = destination.y, "Player autopilot engaged");
        self.scene.move_player_to(destination);
    }

    /// Runs one fixed step of `step_ms` simulated milliseconds.
    fn step(&mut self, step_ms: f64, sim_ms: f64) {
        self.clock.set(sim_ms as u64);
        self.steer_player();
        self.manager.update(step_ms as f32);
        self.scene.update((step_ms / 1000.0) as f32);
        self.scene.sync_npcs(&self.manager);

        for event in self.manager.events().drain() {
            self.stats.record(&event);
        }
        self.stats.steps += 1;
    }

    fn log_stats(&self, sim_ms: f64) {
        info!(
            sim_secs = (sim_ms / 1000.0) as u64,
            npcs = self.manager.npc_count(),
            visible = self.scene.render_states().len(),
            trades = self.stats.trades,
            arrivals = self.stats.arrivals,
            combat = self.stats.combat_decisions,
            "Simulation status"
        );
    }
}

/// Runs the simulation described by `config` and returns its statistics.
pub fn run(config: &EngineConfig) -> Result<RunStats> {
    let seed = config.seed.unwrap_or_else(|| fastrand::u64(..));
    let mut sim = Simulation::new(config, seed)?;

    let step_ms = config.step_ms();
    let end_ms = f64::from(config.duration_secs) * 1000.0 * f64::from(config.time_scale);
    let stats_every_ms = f64::from(config.stats_interval_secs) * 1000.0;
    let mut sim_ms = 0.0;
    let mut next_stats_ms = stats_every_ms;

    let started = Instant::now();
    let mut pacer = FramePacer::new(config.target_fps, config.fixed_dt);

    while sim_ms < end_ms {
        let updates = if config.realtime {
            pacer.begin_frame()
        } else {
            1
        };

        for _ in 0..updates {
            sim_ms += step_ms;
            sim.step(step_ms, sim_ms);
            if stats_every_ms > 0.0 && sim_ms >= next_stats_ms {
                sim.log_stats(sim_ms);
                next_stats_ms += stats_every_ms;
            }
        }

        if config.realtime {
            pacer.finish_frame();
        }
    }

    sim.stats.final_npcs = sim.manager.npc_count();
    info!(
        steps = sim.stats.steps,
        wall_ms = started.elapsed().as_millis() as u64,
        "Simulation finished"
    );

    if let Some(path) = &config.snapshot_path {
        sim.manager
            .state()
            .save_to(path, config.snapshot_format)
            .with_context(|| format!("writing snapshot to {}", path.display()))?;
    }

    Ok(sim.stats)
}

/// Renders `stats` as a single JSON line.
pub fn stats_json(stats: &RunStats) -> Result<String> {
    serde_json::to_string(stats).context("encoding run statistics")
}
