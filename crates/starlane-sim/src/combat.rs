//! Pirate combat decisions.

use serde::{Deserialize, Serialize};
use starlane_common::{direction, distance, NpcId, StationId, Vec2};

use crate::npc::NpcShip;
use crate::world::GalaxyQuery;

/// Threat above which a timid pirate runs.
pub const FLEE_THREAT: f32 = 70.0;

/// Risk tolerance below which a pirate counts as timid.
pub const FLEE_RISK_TOLERANCE: f32 = 40.0;

/// Aggressiveness needed to call for backup when outnumbered.
pub const BACKUP_AGGRESSIVENESS: f32 = 60.0;

/// Aggressiveness needed to engage.
pub const ENGAGE_AGGRESSIVENESS: f32 = 50.0;

/// Combat skill needed to engage.
pub const ENGAGE_COMBAT_SKILL: f32 = 40.0;

/// Maximum pirates summoned as backup.
pub const MAX_BACKUP: usize = 2;

/// Distance kept from a target being intimidated.
pub const INTIMIDATE_STANDOFF: f32 = 80.0;

/// Sideways offset of the engagement point.
pub const ENGAGE_OFFSET: f32 = 30.0;

/// Threat assumed for the player ship.
pub const PLAYER_THREAT: f32 = 45.0;

/// Pirate reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatAction {
    /// Close in on a target
    Engage,
    /// Run for the farthest station
    Flee,
    /// Posture at standoff range
    Intimidate,
    /// Summon nearby pirates
    CallBackup,
    /// Carry on patrolling
    Ignore,
}

impl CombatAction {
    /// Short verb phrase for logs and chatter.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Engage => "engage",
            Self::Flee => "flee",
            Self::Intimidate => "intimidate",
            Self::CallBackup => "call for backup",
            Self::Ignore => "ignore",
        }
    }
}

/// Who a decision is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetRef {
    /// Another NPC
    Npc(NpcId),
    /// The player ship
    Player,
}

impl TargetRef {
    /// NPC ID, if the target is an NPC.
    #[must_use]
    pub const fn npc_id(self) -> Option<NpcId> {
        match self {
            Self::Npc(id) => Some(id),
            Self::Player => None,
        }
    }
}

/// A potential victim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Who
    pub target: TargetRef,
    /// Where
    pub position: Vec2,
    /// How dangerous, 0-100
    pub threat: f32,
    /// Estimated loot (cargo plus credits)
    pub value: u64,
}

impl Candidate {
    /// Loot per unit of risk.
    #[must_use]
    pub fn attractiveness(&self) -> f32 {
        self.value as f32 / (1.0 + self.threat)
    }
}

/// Chosen reaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatDecision {
    /// Action
    pub action: CombatAction,
    /// Target, if any
    pub target: Option<TargetRef>,
    /// Where to fly
    pub destination: Option<Vec2>,
    /// Station to dock at on arrival
    pub station: Option<StationId>,
    /// Pirates summoned
    pub backup: Vec<NpcId>,
    /// Confidence, 0-1
    pub confidence: f32,
    /// Why
    pub reasoning: String,
}

impl CombatDecision {
    /// Low-confidence ignore.
    #[must_use]
    pub fn ignore(reasoning: impl Into<String>) -> Self {
        Self {
            action: CombatAction::Ignore,
            target: None,
            destination: None,
            station: None,
            backup: Vec::new(),
            confidence: 0.2,
            reasoning: reasoning.into(),
        }
    }
}

/// Decides how `pirate` reacts to its surroundings.
///
/// `allies` are other pirates in the same system, used for backup.
pub fn decide_combat(
    pirate: &NpcShip,
    candidates: &[Candidate],
    allies: &[(NpcId, Vec2)],
    galaxy: &dyn GalaxyQuery,
) -> CombatDecision {
    let skills = &pirate.skills;
    let position = pirate.coordinates;

    if pirate.threat.level > FLEE_THREAT && skills.risk_tolerance < FLEE_RISK_TOLERANCE {
        return match galaxy.farthest_station(pirate.system_id, position) {
            Some(station) => CombatDecision {
                action: CombatAction::Flee,
                target: None,
                destination: Some(station.position),
                station: Some(station.id),
                backup: Vec::new(),
                confidence: 0.9,
                reasoning: format!("Threat {:.0} too high, fleeing to {}", pirate.threat.level, station.name),
            },
            None => CombatDecision::ignore("Threatened but nowhere to flee"),
        };
    }

    let Some(best) = candidates
        .iter()
        .max_by(|a, b| a.attractiveness().total_cmp(&b.attractiveness()))
    else {
        return CombatDecision::ignore("No targets in range");
    };

    if pirate.threat.nearby_threats.len() >= 2 && skills.aggressiveness > BACKUP_AGGRESSIVENESS {
        let mut nearby: Vec<_> = allies.iter().filter(|(id, _)| *id != pirate.id).collect();
        nearby.sort_by(|a, b| distance(a.1, position).total_cmp(&distance(b.1, position)));
        let backup: Vec<NpcId> = nearby.iter().take(MAX_BACKUP).map(|(id, _)| *id).collect();
        if !backup.is_empty() {
            return CombatDecision {
                action: CombatAction::CallBackup,
                target: Some(best.target),
                destination: None,
                station: None,
                backup,
                confidence: 0.7,
                reasoning: "Outnumbered, calling backup".to_string(),
            };
        }
    }

    let moderately_dangerous = (30.0..=70.0).contains(&best.threat);
    if skills.combat < best.threat && moderately_dangerous {
        let away = direction(best.position, position);
        let away = if away == Vec2::ZERO { Vec2::X } else { away };
        return CombatDecision {
            action: CombatAction::Intimidate,
            target: Some(best.target),
            destination: Some(best.position + away * INTIMIDATE_STANDOFF),
            station: None,
            backup: Vec::new(),
            confidence: 0.5,
            reasoning: "Target is risky, posturing first".to_string(),
        };
    }

    if skills.aggressiveness > ENGAGE_AGGRESSIVENESS && skills.combat >= ENGAGE_COMBAT_SKILL {
        let approach = direction(position, best.position);
        let approach = if approach == Vec2::ZERO { Vec2::X } else { approach };
        return CombatDecision {
            action: CombatAction::Engage,
            target: Some(best.target),
            destination: Some(best.position + approach.perp() * ENGAGE_OFFSET),
            station: None,
            backup: Vec::new(),
            confidence: 0.4 + skills.combat / 200.0,
            reasoning: "Engaging target".to_string(),
        };
    }

    CombatDecision::ignore("Not worth the fight, resuming patrol")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::npc::test_support::test_ship;
    use crate::npc::NpcType;
    use crate::world::{Galaxy, SecurityLevel};
    use starlane_common::SystemId;

    fn setup() -> (Galaxy, NpcShip, StationId) {
        let mut galaxy = Galaxy::new();
        let sector = galaxy.add_sector("Rim");
        let system = galaxy.add_system(sector, "Hadar", SecurityLevel::Lawless);
        galaxy.add_station(system, "Near", "Pirates", Vec2::new(20.0, 0.0));
        let far = galaxy.add_station(system, "Far", "Free Worlds", Vec2::new(900.0, 0.0));
        let pirate = test_ship(1, NpcType::Pirate, system, Vec2::ZERO);
        (galaxy, pirate, far)
    }

    fn victim(id: u64, threat: f32) -> Candidate {
        Candidate {
            target: TargetRef::Npc(NpcId::from_raw(id)),
            position: Vec2::new(100.0, 0.0),
            threat,
            value: 5_000,
        }
    }

    #[test]
    fn test_timid_pirate_flees_to_farthest_station() {
        let (galaxy, mut pirate, far) = setup();
        pirate.threat.level = 85.0;
        pirate.skills.risk_tolerance = 20.0;
        let decision = decide_combat(&pirate, &[victim(2, 20.0)], &[], &galaxy);
        assert_eq!(decision.action, CombatAction::Flee);
        assert_eq!(decision.station, Some(far));
    }

    #[test]
    fn test_no_candidates_ignores() {
        let (galaxy, pirate, _) = setup();
        let decision = decide_combat(&pirate, &[], &[], &galaxy);
        assert_eq!(decision.action, CombatAction::Ignore);
    }

    #[test]
    fn test_outnumbered_aggressive_pirate_calls_two_backups() {
        let (galaxy, mut pirate, _) = setup();
        pirate.skills.aggressiveness = 80.0;
        pirate.threat.nearby_threats = vec![NpcId::from_raw(2), NpcId::from_raw(3)];
        let allies = [
            (NpcId::from_raw(10), Vec2::new(500.0, 0.0)),
            (NpcId::from_raw(11), Vec2::new(50.0, 0.0)),
            (NpcId::from_raw(12), Vec2::new(100.0, 0.0)),
            (pirate.id, Vec2::ZERO),
        ];
        let decision = decide_combat(&pirate, &[victim(2, 20.0)], &allies, &galaxy);
        assert_eq!(decision.action, CombatAction::CallBackup);
        assert_eq!(decision.backup, vec![NpcId::from_raw(11), NpcId::from_raw(12)]);
    }

    #[test]
    fn test_weak_pirate_intimidates_dangerous_target() {
        let (galaxy, mut pirate, _) = setup();
        pirate.skills.combat = 20.0;
        let decision = decide_combat(&pirate, &[victim(2, 55.0)], &[], &galaxy);
        assert_eq!(decision.action, CombatAction::Intimidate);
        let destination = decision.destination.expect("has destination");
        assert!((distance(destination, Vec2::new(100.0, 0.0)) - INTIMIDATE_STANDOFF).abs() < 1e-3);
    }

    #[test]
    fn test_aggressive_skilled_pirate_engages_at_offset() {
        let (galaxy, mut pirate, _) = setup();
        pirate.skills.aggressiveness = 70.0;
        pirate.skills.combat = 60.0;
        let decision = decide_combat(&pirate, &[victim(2, 20.0)], &[], &galaxy);
        assert_eq!(decision.action, CombatAction::Engage);
        assert_eq!(decision.target, Some(TargetRef::Npc(NpcId::from_raw(2))));
        let destination = decision.destination.expect("has destination");
        assert!((distance(destination, Vec2::new(100.0, 0.0)) - ENGAGE_OFFSET).abs() < 1e-3);
    }

    #[test]
    fn test_passive_pirate_ignores() {
        let (galaxy, mut pirate, _) = setup();
        pirate.skills.aggressiveness = 30.0;
        let decision = decide_combat(&pirate, &[victim(2, 20.0)], &[], &galaxy);
        assert_eq!(decision.action, CombatAction::Ignore);
    }

    #[test]
    fn test_prefers_rich_safe_targets() {
        let (galaxy, mut pirate, _) = setup();
        pirate.skills.aggressiveness = 70.0;
        pirate.skills.combat = 90.0;
        let mut rich = victim(3, 10.0);
        rich.value = 50_000;
        let decision = decide_combat(&pirate, &[victim(2, 10.0), rich], &[], &galaxy);
        assert_eq!(decision.target, Some(TargetRef::Npc(NpcId::from_raw(3))));
    }
}
