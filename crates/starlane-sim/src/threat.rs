//! Threat assessment and collision avoidance.
//!
//! Both passes work on [`Contact`] snapshots of the NPCs in one system so the
//! manager can compute them before mutating any record.

use starlane_common::{distance, NpcId, SystemId, Vec2, EPSILON};

use crate::npc::{NpcShip, NpcType};

/// Base threat of a pirate seen by a non-pirate.
pub const PIRATE_THREAT: f32 = 60.0;

/// Base threat of a patrol seen by a pirate.
pub const PATROL_THREAT: f32 = 50.0;

/// Base threat of a ship with bad standing.
pub const OUTLAW_THREAT: f32 = 40.0;

/// Base threat of an ordinary ship seen by a pirate.
pub const WITNESS_THREAT: f32 = 20.0;

/// Reputation below which any ship is considered dangerous.
pub const OUTLAW_REPUTATION: i32 = -20;

/// Extra threat for a ship at point-blank range.
const PROXIMITY_THREAT: f32 = 40.0;

/// Extra distance past the collision radius where avoidance still applies.
pub const AVOIDANCE_BUFFER: f32 = 20.0;

/// Avoidance strength numerator (force = strength / distance).
pub const AVOIDANCE_STRENGTH: f32 = 500.0;

/// Position and disposition of one ship.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Ship ID
    pub id: NpcId,
    /// Ship role
    pub npc_type: NpcType,
    /// System
    pub system_id: SystemId,
    /// Position
    pub position: Vec2,
    /// Standing with the player
    pub reputation: i32,
}

impl From<&NpcShip> for Contact {
    fn from(npc: &NpcShip) -> Self {
        Self {
            id: npc.id,
            npc_type: npc.npc_type,
            system_id: npc.system_id,
            position: npc.coordinates,
            reputation: npc.reputation,
        }
    }
}

/// Base threat `other` poses to an observer of type `observer`, if any.
#[must_use]
pub fn base_threat(observer: NpcType, other: &Contact) -> Option<f32> {
    let by_type = match (observer, other.npc_type) {
        (NpcType::Pirate, NpcType::Pirate) => None,
        (NpcType::Pirate, NpcType::Patrol) => Some(PATROL_THREAT),
        (NpcType::Pirate, _) => Some(WITNESS_THREAT),
        (_, NpcType::Pirate) => Some(PIRATE_THREAT),
        _ => None,
    };
    let by_reputation = (other.reputation < OUTLAW_REPUTATION).then_some(OUTLAW_THREAT);

    match (by_type, by_reputation) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

/// Result of a threat scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreatScan {
    /// Threatening ships
    pub threats: Vec<NpcId>,
    /// Highest single threat, 0-100
    pub level: f32,
}

/// Scans same-system ships within `radius` of `observer`.
#[must_use]
pub fn assess_threats(observer: &Contact, others: &[Contact], radius: f32) -> ThreatScan {
    let mut scan = ThreatScan::default();
    for other in others {
        if other.id == observer.id || other.system_id != observer.system_id {
            continue;
        }
        let d = distance(observer.position, other.position);
        if d > radius {
            continue;
        }
        if let Some(base) = base_threat(observer.npc_type, other) {
            let proximity = (1.0 - d / radius.max(EPSILON)).clamp(0.0, 1.0) * PROXIMITY_THREAT;
            let level = (base + proximity).clamp(0.0, 100.0);
            scan.threats.push(other.id);
            scan.level = scan.level.max(level);
        }
    }
    scan
}

/// Repulsion from same-system ships closer than `collision_radius` plus the buffer.
#[must_use]
pub fn avoidance_vector(
    observer: &Contact,
    others: &[Contact],
    avoidance_radius: f32,
    collision_radius: f32,
) -> Vec2 {
    let cutoff = avoidance_radius.min(collision_radius + AVOIDANCE_BUFFER);
    others
        .iter()
        .filter(|other| other.id != observer.id && other.system_id == observer.system_id)
        .filter_map(|other| {
            let away = observer.position - other.position;
            let d = away.length();
            (d > EPSILON && d <= cutoff).then(|| away / d * (AVOIDANCE_STRENGTH / d))
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(id: u64, npc_type: NpcType, x: f32) -> Contact {
        Contact {
            id: NpcId::from_raw(id),
            npc_type,
            system_id: SystemId::new(1),
            position: Vec2::new(x, 0.0),
            reputation: 0,
        }
    }

    #[test]
    fn test_pirate_threatens_trader() {
        let trader = contact(1, NpcType::Trader, 0.0);
        let others = [trader, contact(2, NpcType::Pirate, 100.0)];
        let scan = assess_threats(&trader, &others, 200.0);
        assert_eq!(scan.threats, vec![NpcId::from_raw(2)]);
        assert!((scan.level - 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_out_of_range_and_other_systems_ignored() {
        let trader = contact(1, NpcType::Trader, 0.0);
        let mut elsewhere = contact(3, NpcType::Pirate, 10.0);
        elsewhere.system_id = SystemId::new(2);
        let others = [contact(2, NpcType::Pirate, 500.0), elsewhere];
        let scan = assess_threats(&trader, &others, 200.0);
        assert!(scan.threats.is_empty());
        assert_eq!(scan.level, 0.0);
    }

    #[test]
    fn test_low_reputation_is_threat() {
        let civilian = contact(1, NpcType::Civilian, 0.0);
        let mut outlaw = contact(2, NpcType::Trader, 0.0);
        outlaw.reputation = -50;
        let scan = assess_threats(&civilian, &[outlaw], 200.0);
        assert_eq!(scan.threats.len(), 1);
        assert!((scan.level - 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_threat_level_is_clamped() {
        let pirate = contact(1, NpcType::Pirate, 0.0);
        let mut patrol = contact(2, NpcType::Patrol, 0.0);
        patrol.reputation = -90;
        let scan = assess_threats(&pirate, &[patrol], 200.0);
        assert!(scan.level <= 100.0);
    }

    #[test]
    fn test_avoidance_pushes_apart() {
        let me = contact(1, NpcType::Trader, 0.0);
        let near = contact(2, NpcType::Trader, 10.0);
        let force = avoidance_vector(&me, &[near], 50.0, 30.0);
        assert!(force.x < 0.0);
        assert!((force.length() - AVOIDANCE_STRENGTH / 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_avoidance_zero_beyond_buffer_and_at_overlap() {
        let me = contact(1, NpcType::Trader, 0.0);
        let far = contact(2, NpcType::Trader, 51.0);
        let overlap = contact(3, NpcType::Trader, 0.0);
        let force = avoidance_vector(&me, &[far, overlap], 50.0, 30.0);
        assert_eq!(force, Vec2::ZERO);
    }
}
