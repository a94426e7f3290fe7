//! NPC generation: type, name, hull, personality, skills, goal, faction.

use starlane_common::{NpcId, Vec2};
use std::collections::{BTreeMap, VecDeque};
use std::f32::consts::TAU;

use crate::commodity::Commodity;
use crate::movement::ShipMover;
use crate::npc::{
    GoalKind, GoalType, HuntStyle, NpcGoal, NpcShip, NpcType, Personality, PersonalityTrait,
    PersonalityType, RouteKnowledge, Skill, Skills, ThreatAssessment,
};
use crate::ship_class::{EngineModule, ShipClass, SHIP_CLASSES};
use crate::world::Station;

/// Spawn weights per type. Sums to 1.
pub const SPAWN_WEIGHTS: [(NpcType, f32); 5] = [
    (NpcType::Trader, 0.4),
    (NpcType::Civilian, 0.3),
    (NpcType::Patrol, 0.15),
    (NpcType::Pirate, 0.1),
    (NpcType::Transport, 0.05),
];

/// Faction every pirate belongs to.
pub const PIRATE_FACTION: &str = "Pirates";

/// Trade guild faction.
pub const GUILD_FACTION: &str = "Merchants Guild";

/// Unaligned faction.
pub const INDEPENDENT_FACTION: &str = "Independent";

const NAME_SUFFIXES: [&str; 12] = [
    "Kestrel", "Osprey", "Comet", "Lantern", "Drift", "Ember", "Harrier", "Nomad", "Quasar",
    "Meridian", "Vesper", "Talon",
];

/// Trait table: name and skill deltas.
const TRAITS: [(&str, &[(Skill, f32)]); 8] = [
    ("Cautious", &[(Skill::RiskTolerance, -15.0), (Skill::Navigation, 5.0)]),
    ("Reckless", &[(Skill::RiskTolerance, 20.0), (Skill::Navigation, -5.0)]),
    ("Shrewd", &[(Skill::Trading, 15.0), (Skill::MarketKnowledge, 10.0)]),
    ("Bloodthirsty", &[(Skill::Aggressiveness, 20.0), (Skill::Combat, 10.0)]),
    ("Veteran", &[(Skill::Combat, 15.0), (Skill::Navigation, 10.0)]),
    ("Charming", &[(Skill::Social, 20.0)]),
    ("Greedy", &[(Skill::Trading, 10.0), (Skill::Aggressiveness, 5.0)]),
    ("Ace Pilot", &[(Skill::Navigation, 20.0)]),
];

/// Picks a type from [`SPAWN_WEIGHTS`].
pub fn roll_npc_type(rng: &mut fastrand::Rng) -> NpcType {
    let roll = rng.f32();
    let mut cumulative = 0.0;
    for (npc_type, weight) in SPAWN_WEIGHTS {
        cumulative += weight;
        if roll < cumulative {
            return npc_type;
        }
    }
    NpcType::Trader
}

/// Generates "<prefix> <suffix>-<number>".
pub fn generate_name(npc_type: NpcType, rng: &mut fastrand::Rng) -> String {
    let prefixes = npc_type.name_prefixes();
    let prefix = prefixes[rng.usize(..prefixes.len())];
    let suffix = NAME_SUFFIXES[rng.usize(..NAME_SUFFIXES.len())];
    format!("{prefix} {suffix}-{}", rng.u16(100..1000))
}

/// Patrols serve the station, pirates are pirates, everyone else picks.
pub fn choose_faction(npc_type: NpcType, station_faction: &str, rng: &mut fastrand::Rng) -> String {
    match npc_type {
        NpcType::Patrol => station_faction.to_string(),
        NpcType::Pirate => PIRATE_FACTION.to_string(),
        _ => match rng.u8(0..3) {
            0 => GUILD_FACTION.to_string(),
            1 => INDEPENDENT_FACTION.to_string(),
            _ => station_faction.to_string(),
        },
    }
}

/// Rolls a personality with one or two distinct traits.
pub fn generate_personality(npc_type: NpcType, rng: &mut fastrand::Rng) -> Personality {
    let types: &[PersonalityType] = match npc_type {
        NpcType::Pirate => &[
            PersonalityType::Aggressive,
            PersonalityType::Opportunist,
            PersonalityType::Greedy,
        ],
        NpcType::Patrol => &[
            PersonalityType::Honorable,
            PersonalityType::Cautious,
            PersonalityType::Aggressive,
        ],
        NpcType::Trader | NpcType::Transport => &[
            PersonalityType::Greedy,
            PersonalityType::Cautious,
            PersonalityType::Opportunist,
        ],
        NpcType::Civilian => &[
            PersonalityType::Cautious,
            PersonalityType::Honorable,
            PersonalityType::Opportunist,
        ],
    };
    let personality_type = types[rng.usize(..types.len())];

    let mut indices: Vec<usize> = (0..TRAITS.len()).collect();
    rng.shuffle(&mut indices);
    let count = rng.usize(1..=2);
    let traits = indices
        .into_iter()
        .take(count)
        .map(|i| {
            let (name, effects) = TRAITS[i];
            PersonalityTrait {
                name: name.to_string(),
                effects: effects.to_vec(),
            }
        })
        .collect();

    Personality {
        personality_type,
        traits,
    }
}

/// Rolls base skills with a role bias, before personality traits.
pub fn base_skills(npc_type: NpcType, rng: &mut fastrand::Rng) -> Skills {
    let mut roll = || rng.u8(20..=80) as f32;
    let mut skills = Skills {
        risk_tolerance: roll(),
        aggressiveness: roll(),
        trading: roll(),
        combat: roll(),
        navigation: roll(),
        social: roll(),
        market_knowledge: roll(),
    };
    let bias: &[(Skill, f32)] = match npc_type {
        NpcType::Pirate => &[(Skill::Aggressiveness, 15.0), (Skill::Combat, 10.0)],
        NpcType::Patrol => &[(Skill::Combat, 15.0), (Skill::RiskTolerance, 5.0)],
        NpcType::Trader => &[(Skill::Trading, 15.0), (Skill::MarketKnowledge, 10.0)],
        NpcType::Transport => &[(Skill::Trading, 5.0), (Skill::Navigation, 5.0)],
        NpcType::Civilian => &[(Skill::Social, 10.0)],
    };
    for (skill, delta) in bias {
        skills.adjust(*skill, *delta);
    }
    skills
}

/// Builds a goal of the requested type with rolled parameters.
pub fn make_goal(goal_type: GoalType, now: u64, rng: &mut fastrand::Rng) -> NpcGoal {
    match goal_type {
        GoalType::Trade => {
            let commodity = rng
                .bool()
                .then(|| Commodity::ALL[rng.usize(..Commodity::ALL.len())]);
            NpcGoal::new(GoalKind::Trade { commodity }, 5, now)
        }
        GoalType::Patrol => NpcGoal::new(
            GoalKind::Patrol {
                radius: 300.0 + rng.f32() * 300.0,
            },
            6,
            now,
        ),
        GoalType::Pirate => {
            let hunt = match rng.u8(0..3) {
                0 => HuntStyle::Opportunistic,
                1 => HuntStyle::Ambush,
                _ => HuntStyle::Raid,
            };
            NpcGoal::new(GoalKind::Pirate { hunt }, 7, now)
        }
        GoalType::Idle => NpcGoal::idle(now),
    }
}

/// Creates a ship of `npc_type` docked at `station`.
pub fn spawn_npc(
    id: NpcId,
    npc_type: NpcType,
    station: &Station,
    now: u64,
    rng: &mut fastrand::Rng,
) -> NpcShip {
    let pool = npc_type.class_pool();
    let class = ShipClass::by_name(pool[rng.usize(..pool.len())]).unwrap_or(&SHIP_CLASSES[0]);

    let mut engines = Vec::new();
    if rng.f32() < 0.3 {
        engines.push(EngineModule::new("Ion Booster", 5.0 + rng.f32() * 10.0));
    }
    let profile = class.movement_profile(&engines);

    let personality = generate_personality(npc_type, rng);
    let mut skills = base_skills(npc_type, rng);
    personality.apply_to(&mut skills);

    let (min_credits, max_credits) = npc_type.credit_range();
    let position: Vec2 = station.position;
    let mover = ShipMover::new(position, profile)
        .with_rotation(rng.f32() * TAU)
        .with_speed_factor(skills.speed_factor());

    NpcShip {
        id,
        name: generate_name(npc_type, rng),
        npc_type,
        faction: choose_faction(npc_type, &station.faction, rng),
        system_id: station.system_id,
        station_id: Some(station.id),
        coordinates: position,
        in_transit: false,
        speed: profile.max_speed,
        mover,
        target_station: None,
        personality,
        current_goal: make_goal(npc_type.initial_goal_type(), now, rng),
        goal_history: VecDeque::new(),
        decision_cooldown: now,
        skills,
        threat: ThreatAssessment::default(),
        routes: RouteKnowledge::default(),
        ship_class: class.name.to_string(),
        cargo_capacity: class.cargo_capacity,
        cargo: BTreeMap::new(),
        condition: 70.0 + rng.f32() * 30.0,
        fuel: class.fuel_capacity,
        fuel_capacity: class.fuel_capacity,
        credits: rng.u64(min_credits..=max_credits),
        reputation: rng.i32(-10..=10),
        last_action_time: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starlane_common::{StationId, SystemId};

    fn station() -> Station {
        Station {
            id: StationId::new(7),
            name: "Vega Prime".to_string(),
            faction: "Terran Federation".to_string(),
            system_id: SystemId::new(2),
            position: Vec2::new(250.0, -40.0),
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total: f32 = SPAWN_WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_type_distribution_roughly_matches_weights() {
        let mut rng = fastrand::Rng::with_seed(99);
        let mut traders = 0;
        let mut transports = 0;
        for _ in 0..10_000 {
            match roll_npc_type(&mut rng) {
                NpcType::Trader => traders += 1,
                NpcType::Transport => transports += 1,
                _ => {}
            }
        }
        assert!((3_500..4_500).contains(&traders), "traders {traders}");
        assert!((300..700).contains(&transports), "transports {transports}");
    }

    #[test]
    fn test_spawned_ship_is_consistent() {
        let mut rng = fastrand::Rng::with_seed(5);
        let station = station();
        for npc_type in NpcType::ALL {
            let npc = spawn_npc(NpcId::from_raw(1), npc_type, &station, 1_000, &mut rng);
            assert_eq!(npc.station_id, Some(station.id));
            assert_eq!(npc.system_id, station.system_id);
            assert_eq!(npc.coordinates, station.position);
            assert_eq!(npc.goal_type(), npc_type.initial_goal_type());
            assert!((-10..=10).contains(&npc.reputation));
            let (min, max) = npc_type.credit_range();
            assert!((min..=max).contains(&npc.credits));
            assert!(npc_type.class_pool().contains(&npc.ship_class.as_str()));
            assert!(npc.cargo_used() <= npc.cargo_capacity);
        }
    }

    #[test]
    fn test_factions() {
        let mut rng = fastrand::Rng::with_seed(2);
        assert_eq!(choose_faction(NpcType::Pirate, "Terran Federation", &mut rng), PIRATE_FACTION);
        assert_eq!(
            choose_faction(NpcType::Patrol, "Terran Federation", &mut rng),
            "Terran Federation"
        );
        for _ in 0..20 {
            let faction = choose_faction(NpcType::Trader, "Helix Consortium", &mut rng);
            assert!([GUILD_FACTION, INDEPENDENT_FACTION, "Helix Consortium"].contains(&faction.as_str()));
        }
    }

    #[test]
    fn test_personality_traits_shift_skills() {
        let personality = Personality {
            personality_type: PersonalityType::Greedy,
            traits: vec![PersonalityTrait {
                name: "Shrewd".to_string(),
                effects: vec![(Skill::Trading, 15.0)],
            }],
        };
        let mut skills = Skills::default();
        personality.apply_to(&mut skills);
        assert_eq!(skills.trading, 65.0);
    }

    #[test]
    fn test_make_goal_matches_type() {
        let mut rng = fastrand::Rng::with_seed(4);
        for goal_type in [GoalType::Trade, GoalType::Patrol, GoalType::Pirate, GoalType::Idle] {
            assert_eq!(make_goal(goal_type, 10, &mut rng).goal_type(), goal_type);
        }
    }
}
