//! Galaxy query surface consumed by the simulation.
//!
//! The AI core only ever reads the world: sectors contain systems, systems
//! contain stations, and stations have a faction and a position. [`Galaxy`]
//! is the plain-data implementation; hosts with their own world model can
//! implement [`GalaxyQuery`] directly.

use serde::{Deserialize, Serialize};
use starlane_common::{distance, SectorId, StationId, SystemId, Vec2};
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Law enforcement presence in a system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityLevel {
    /// Heavily patrolled core system
    High,
    /// Regular patrols
    Medium,
    /// Occasional patrols
    Low,
    /// No law enforcement
    Lawless,
}

impl SecurityLevel {
    /// Security as a 0-100 score.
    #[must_use]
    pub const fn score(self) -> u8 {
        match self {
            Self::High => 90,
            Self::Medium => 60,
            Self::Low => 30,
            Self::Lawless => 0,
        }
    }

    /// Short label used in dialogue.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "moderate",
            Self::Low => "low",
            Self::Lawless => "nonexistent",
        }
    }
}

/// A dockable station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Station ID
    pub id: StationId,
    /// Display name
    pub name: String,
    /// Owning faction
    pub faction: String,
    /// System the station orbits in
    pub system_id: SystemId,
    /// In-system coordinates
    pub position: Vec2,
}

/// A star system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarSystem {
    /// System ID
    pub id: SystemId,
    /// Display name
    pub name: String,
    /// Sector the system belongs to
    pub sector_id: SectorId,
    /// Security level
    pub security: SecurityLevel,
    /// Stations in this system
    pub stations: Vec<StationId>,
}

/// A group of systems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    /// Sector ID
    pub id: SectorId,
    /// Display name
    pub name: String,
    /// Systems in this sector
    pub systems: Vec<SystemId>,
}

/// Read-only world interface for spawning, patrol targets, and pathing.
pub trait GalaxyQuery: Debug + Send + Sync {
    /// All system IDs, in a stable order.
    fn system_ids(&self) -> Vec<SystemId>;

    /// Looks up a system.
    fn system(&self, id: SystemId) -> Option<&StarSystem>;

    /// Looks up a station.
    fn station(&self, id: StationId) -> Option<&Station>;

    /// Stations in a system. Empty when the system is unknown.
    fn stations_in_system(&self, id: SystemId) -> Vec<&Station> {
        self.system(id)
            .map(|system| {
                system
                    .stations
                    .iter()
                    .filter_map(|station_id| self.station(*station_id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Station in `system` closest to `position`.
    fn nearest_station(&self, system: SystemId, position: Vec2) -> Option<&Station> {
        self.stations_in_system(system).into_iter().min_by(|a, b| {
            distance(a.position, position).total_cmp(&distance(b.position, position))
        })
    }

    /// Station in `system` farthest from `position`.
    fn farthest_station(&self, system: SystemId, position: Vec2) -> Option<&Station> {
        self.stations_in_system(system).into_iter().max_by(|a, b| {
            distance(a.position, position).total_cmp(&distance(b.position, position))
        })
    }
}

/// Parameters for [`Galaxy::generate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyShape {
    /// Number of sectors
    pub sectors: u32,
    /// Systems per sector
    pub systems_per_sector: u32,
    /// Minimum stations per system
    pub min_stations: u32,
    /// Maximum stations per system
    pub max_stations: u32,
    /// Stations are placed within this radius of the system origin
    pub system_radius: f32,
}

impl Default for GalaxyShape {
    fn default() -> Self {
        Self {
            sectors: 2,
            systems_per_sector: 3,
            min_stations: 2,
            max_stations: 4,
            system_radius: 1_000.0,
        }
    }
}

/// Station-owning factions used by the generator.
const STATION_FACTIONS: [&str; 4] = [
    "Terran Federation",
    "Outer Rim Coalition",
    "Helix Consortium",
    "Free Worlds",
];

const SYSTEM_NAMES: [&str; 12] = [
    "Sol", "Vega", "Altair", "Deneb", "Rigel", "Sirius", "Castor", "Pollux", "Antares", "Mira",
    "Izar", "Hadar",
];

const STATION_SUFFIXES: [&str; 6] = ["Prime", "Outpost", "Relay", "Dock", "Hub", "Gate"];

/// In-memory galaxy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Galaxy {
    sectors: Vec<Sector>,
    systems: BTreeMap<SystemId, StarSystem>,
    stations: BTreeMap<StationId, Station>,
    next_id: u32,
}

impl Galaxy {
    /// Creates an empty galaxy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    /// Adds a sector.
    pub fn add_sector(&mut self, name: impl Into<String>) -> SectorId {
        let id = SectorId::new(self.allocate_id());
        self.sectors.push(Sector {
            id,
            name: name.into(),
            systems: Vec::new(),
        });
        id
    }

    /// Adds a system to a sector. Unknown sectors still get the system, unlisted.
    pub fn add_system(
        &mut self,
        sector_id: SectorId,
        name: impl Into<String>,
        security: SecurityLevel,
    ) -> SystemId {
        let id = SystemId::new(self.allocate_id());
        self.systems.insert(
            id,
            StarSystem {
                id,
                name: name.into(),
                sector_id,
                security,
                stations: Vec::new(),
            },
        );
        if let Some(sector) = self.sectors.iter_mut().find(|s| s.id == sector_id) {
            sector.systems.push(id);
        }
        id
    }

    /// Adds a station to a system.
    pub fn add_station(
        &mut self,
        system_id: SystemId,
        name: impl Into<String>,
        faction: impl Into<String>,
        position: Vec2,
    ) -> StationId {
        let id = StationId::new(self.allocate_id());
        self.stations.insert(
            id,
            Station {
                id,
                name: name.into(),
                faction: faction.into(),
                system_id,
                position,
            },
        );
        if let Some(system) = self.systems.get_mut(&system_id) {
            system.stations.push(id);
        }
        id
    }

    /// All sectors.
    #[must_use]
    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    /// Number of stations.
    #[must_use]
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Generates a deterministic galaxy from a seed.
    #[must_use]
    pub fn generate(shape: &GalaxyShape, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut galaxy = Self::new();
        let mut name_index = 0usize;

        for sector_index in 0..shape.sectors.max(1) {
            let sector = galaxy.add_sector(format!("Sector {}", sector_index + 1));

            for _ in 0..shape.systems_per_sector.max(1) {
                let base = SYSTEM_NAMES[name_index % SYSTEM_NAMES.len()];
                let system_name = if name_index < SYSTEM_NAMES.len() {
                    base.to_string()
                } else {
                    format!("{base} {}", name_index / SYSTEM_NAMES.len() + 1)
                };
                name_index += 1;

                let security = match rng.u8(0..10) {
                    0..=2 => SecurityLevel::High,
                    3..=5 => SecurityLevel::Medium,
                    6..=8 => SecurityLevel::Low,
                    _ => SecurityLevel::Lawless,
                };
                let system = galaxy.add_system(sector, system_name.clone(), security);

                let max = shape.max_stations.max(shape.min_stations).max(1);
                let min = shape.min_stations.clamp(1, max);
                let count = rng.u32(min..=max);
                for station_index in 0..count {
                    let angle = rng.f32() * std::f32::consts::TAU;
                    let radius = shape.system_radius * (0.2 + rng.f32() * 0.8);
                    let position = Vec2::new(angle.cos() * radius, angle.sin() * radius);
                    let faction = STATION_FACTIONS[rng.usize(..STATION_FACTIONS.len())];
                    let suffix = STATION_SUFFIXES[station_index as usize % STATION_SUFFIXES.len()];
                    galaxy.add_station(system, format!("{system_name} {suffix}"), faction, position);
                }
            }
        }

        galaxy
    }
}

impl GalaxyQuery for Galaxy {
    fn system_ids(&self) -> Vec<SystemId> {
        self.systems.keys().copied().collect()
    }

    fn system(&self, id: SystemId) -> Option<&StarSystem> {
        self.systems.get(&id)
    }

    fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_station_galaxy() -> (Galaxy, SystemId, StationId, StationId) {
        let mut galaxy = Galaxy::new();
        let sector = galaxy.add_sector("Core");
        let system = galaxy.add_system(sector, "Sol", SecurityLevel::High);
        let near = galaxy.add_station(system, "Near", "Terran Federation", Vec2::new(10.0, 0.0));
        let far = galaxy.add_station(system, "Far", "Free Worlds", Vec2::new(900.0, 0.0));
        (galaxy, system, near, far)
    }

    #[test]
    fn test_build_galaxy() {
        let (galaxy, system, near, _) = two_station_galaxy();
        assert_eq!(galaxy.system_ids(), vec![system]);
        assert_eq!(galaxy.stations_in_system(system).len(), 2);
        assert_eq!(galaxy.station(near).map(|s| s.system_id), Some(system));
        assert_eq!(galaxy.sectors()[0].systems, vec![system]);
    }

    #[test]
    fn test_nearest_and_farthest_station() {
        let (galaxy, system, near, far) = two_station_galaxy();
        let origin = Vec2::ZERO;
        assert_eq!(galaxy.nearest_station(system, origin).map(|s| s.id), Some(near));
        assert_eq!(galaxy.farthest_station(system, origin).map(|s| s.id), Some(far));
    }

    #[test]
    fn test_unknown_system_has_no_stations() {
        let (galaxy, ..) = two_station_galaxy();
        assert!(galaxy.stations_in_system(SystemId::new(999)).is_empty());
        assert!(galaxy.nearest_station(SystemId::new(999), Vec2::ZERO).is_none());
    }

    #[test]
    fn test_generate_is_deterministic() {
        let shape = GalaxyShape::default();
        let a = Galaxy::generate(&shape, 42);
        let b = Galaxy::generate(&shape, 42);
        assert_eq!(a.system_ids(), b.system_ids());
        assert_eq!(a.station_count(), b.station_count());
        assert_eq!(a.system_ids().len(), 6);
        for system in a.system_ids() {
            let count = a.stations_in_system(system).len();
            assert!((2..=4).contains(&count));
        }
    }
}
