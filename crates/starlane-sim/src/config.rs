//! AI manager configuration.
//!
//! Every tunable of the population, decision, threat, and market loops lives
//! here so hosts can override them from their own config file.

use serde::{Deserialize, Serialize};

/// Tunables for [`crate::manager::NpcAiManager`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    // === Population ===
    /// Maximum live NPCs in one star system
    pub max_npcs_per_system: usize,
    /// Interval between spawn passes (ms)
    pub spawn_interval_ms: u64,
    /// Chance per system under cap to spawn on a spawn pass
    pub spawn_chance: f32,
    /// Spawn passes run at world initialisation
    pub initial_spawn_rounds: u32,
    /// Chance per system per initial pass
    pub initial_spawn_chance: f32,
    /// Remove NPCs docked with an idle goal for longer than this (ms). None disables despawning.
    pub idle_despawn_after_ms: Option<u64>,

    // === Decisions ===
    /// Interval between AI decision passes (ms)
    pub ai_tick_interval_ms: u64,
    /// Lower bound of the per-NPC decision cooldown (ms)
    pub decision_cooldown_min_ms: u64,
    /// Upper bound of the per-NPC decision cooldown (ms)
    pub decision_cooldown_max_ms: u64,
    /// Chance per decision pass that an idle NPC picks a new goal
    pub idle_reroll_chance: f32,
    /// Credits an NPC must hold before it considers buying
    pub buy_credit_threshold: u64,
    /// Cargo fill fraction at which traders sell
    pub sell_cargo_fraction: f32,

    // === Threat & avoidance ===
    /// Minimum time between threat refreshes for one NPC (ms)
    pub threat_refresh_ms: u64,
    /// Radius scanned for threats
    pub threat_scan_radius: f32,
    /// Radius scanned for avoidance neighbours
    pub avoidance_radius: f32,
    /// Ship collision radius used by avoidance
    pub collision_radius: f32,

    // === Market ===
    /// Interval between market behaviour passes (ms)
    pub market_tick_interval_ms: u64,

    // === Events ===
    /// Event bus capacity
    pub event_capacity: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            // Population
            max_npcs_per_system: 8,
            spawn_interval_ms: 60_000,
            spawn_chance: 0.1,
            initial_spawn_rounds: 4,
            initial_spawn_chance: 0.5,
            idle_despawn_after_ms: None,

            // Decisions
            ai_tick_interval_ms: 5_000,
            decision_cooldown_min_ms: 15_000,
            decision_cooldown_max_ms: 25_000,
            idle_reroll_chance: 0.1,
            buy_credit_threshold: 1_000,
            sell_cargo_fraction: 0.8,

            // Threat & avoidance
            threat_refresh_ms: 2_000,
            threat_scan_radius: 200.0,
            avoidance_radius: 50.0,
            collision_radius: 30.0,

            // Market
            market_tick_interval_ms: 300_000,

            // Events
            event_capacity: 1024,
        }
    }
}

impl AiConfig {
    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.max_npcs_per_system = self.max_npcs_per_system.clamp(1, 64);
        self.spawn_interval_ms = self.spawn_interval_ms.max(1_000);
        self.spawn_chance = self.spawn_chance.clamp(0.0, 1.0);
        self.initial_spawn_chance = self.initial_spawn_chance.clamp(0.0, 1.0);
        self.initial_spawn_rounds = self.initial_spawn_rounds.min(64);

        self.ai_tick_interval_ms = self.ai_tick_interval_ms.max(100);
        if self.decision_cooldown_max_ms < self.decision_cooldown_min_ms {
            std::mem::swap(
                &mut self.decision_cooldown_min_ms,
                &mut self.decision_cooldown_max_ms,
            );
        }
        self.idle_reroll_chance = self.idle_reroll_chance.clamp(0.0, 1.0);
        self.sell_cargo_fraction = self.sell_cargo_fraction.clamp(0.1, 1.0);

        self.threat_scan_radius = self.threat_scan_radius.max(1.0);
        self.avoidance_radius = self.avoidance_radius.max(1.0);
        self.collision_radius = self.collision_radius.clamp(1.0, self.avoidance_radius);

        self.market_tick_interval_ms = self.market_tick_interval_ms.max(1_000);
        self.event_capacity = self.event_capacity.clamp(16, 65_536);
    }
}
