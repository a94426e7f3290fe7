//! Ship class table and derived movement profiles.
//!
//! Every hull belongs to a [`ShipCategory`]. The category decides how fast
//! the hull reaches top speed and how quickly it turns; the class supplies
//! base speed and hold sizes. Installed engine modules add percentage speed
//! bonuses on top.

use serde::{Deserialize, Serialize};

/// Broad hull category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipCategory {
    /// Light, fast message runners
    Courier,
    /// Interceptors and patrol cutters
    Combat,
    /// Long-range scouts
    Explorer,
    /// Medium cargo haulers
    Transport,
    /// Bulk freighters
    HeavyFreight,
}

impl ShipCategory {
    /// Seconds needed to go from rest to full speed.
    #[must_use]
    pub const fn time_to_max_speed(self) -> f32 {
        match self {
            Self::Courier | Self::Combat => 1.0,
            Self::Explorer => 1.2,
            Self::Transport => 1.6,
            Self::HeavyFreight => 2.2,
        }
    }

    /// Turn rate in radians per second.
    #[must_use]
    pub const fn rotation_speed(self) -> f32 {
        match self {
            Self::Courier => 5.0,
            Self::Combat => 4.5,
            Self::Explorer => 3.5,
            Self::Transport => 2.5,
            Self::HeavyFreight => 1.5,
        }
    }

    /// Steering authority, 0-100.
    #[must_use]
    pub const fn maneuverability(self) -> f32 {
        match self {
            Self::Courier => 90.0,
            Self::Combat => 85.0,
            Self::Explorer => 70.0,
            Self::Transport => 50.0,
            Self::HeavyFreight => 30.0,
        }
    }
}

/// Static description of a hull.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipClass {
    /// Class name
    pub name: &'static str,
    /// Hull category
    pub category: ShipCategory,
    /// Base top speed (units/s)
    pub base_speed: f32,
    /// Cargo hold size (units)
    pub cargo_capacity: u32,
    /// Fuel tank size
    pub fuel_capacity: f32,
}

/// Known hulls.
pub const SHIP_CLASSES: [ShipClass; 9] = [
    ShipClass {
        name: "Sparrow Courier",
        category: ShipCategory::Courier,
        base_speed: 120.0,
        cargo_capacity: 20,
        fuel_capacity: 80.0,
    },
    ShipClass {
        name: "Swift Runner",
        category: ShipCategory::Courier,
        base_speed: 115.0,
        cargo_capacity: 30,
        fuel_capacity: 90.0,
    },
    ShipClass {
        name: "Viper Interceptor",
        category: ShipCategory::Combat,
        base_speed: 110.0,
        cargo_capacity: 10,
        fuel_capacity: 70.0,
    },
    ShipClass {
        name: "Warden Cutter",
        category: ShipCategory::Combat,
        base_speed: 100.0,
        cargo_capacity: 15,
        fuel_capacity: 100.0,
    },
    ShipClass {
        name: "Corsair Raider",
        category: ShipCategory::Combat,
        base_speed: 105.0,
        cargo_capacity: 25,
        fuel_capacity: 80.0,
    },
    ShipClass {
        name: "Pathfinder Scout",
        category: ShipCategory::Explorer,
        base_speed: 100.0,
        cargo_capacity: 30,
        fuel_capacity: 150.0,
    },
    ShipClass {
        name: "Mule Hauler",
        category: ShipCategory::Transport,
        base_speed: 80.0,
        cargo_capacity: 100,
        fuel_capacity: 120.0,
    },
    ShipClass {
        name: "Caravel Trader",
        category: ShipCategory::Transport,
        base_speed: 85.0,
        cargo_capacity: 80,
        fuel_capacity: 110.0,
    },
    ShipClass {
        name: "Leviathan Freighter",
        category: ShipCategory::HeavyFreight,
        base_speed: 55.0,
        cargo_capacity: 300,
        fuel_capacity: 200.0,
    },
];

impl ShipClass {
    /// Looks up a class by name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<&'static Self> {
        SHIP_CLASSES.iter().find(|class| class.name == name)
    }

    /// Movement profile for this hull with the given engines installed.
    #[must_use]
    pub fn movement_profile(&self, engines: &[EngineModule]) -> MovementProfile {
        let bonus: f32 = engines.iter().map(|e| e.speed_bonus_pct).sum();
        MovementProfile::from_category(self.category, self.base_speed * (1.0 + bonus / 100.0))
    }
}

/// An installed engine upgrade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineModule {
    /// Module name
    pub name: String,
    /// Speed bonus in percent
    pub speed_bonus_pct: f32,
}

impl EngineModule {
    /// Creates an engine module.
    #[must_use]
    pub fn new(name: impl Into<String>, speed_bonus_pct: f32) -> Self {
        Self {
            name: name.into(),
            speed_bonus_pct,
        }
    }
}

/// Movement constants derived once from hull and equipment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementProfile {
    /// Top speed (units/s)
    pub max_speed: f32,
    /// Linear acceleration (units/s^2)
    pub acceleration: f32,
    /// Turn rate (rad/s)
    pub rotation_speed: f32,
    /// Steering authority, 0-100
    pub maneuverability: f32,
}

impl Default for MovementProfile {
    fn default() -> Self {
        Self::from_category(ShipCategory::Courier, 100.0)
    }
}

impl MovementProfile {
    /// Builds a profile from a category and an already-boosted top speed.
    #[must_use]
    pub fn from_category(category: ShipCategory, max_speed: f32) -> Self {
        let max_speed = max_speed.max(1.0);
        Self {
            max_speed,
            acceleration: max_speed / category.time_to_max_speed(),
            rotation_speed: category.rotation_speed(),
            maneuverability: category.maneuverability(),
        }
    }

    /// Distance needed to stop from `speed` at this profile's acceleration.
    #[must_use]
    pub fn braking_distance(&self, speed: f32) -> f32 {
        if self.acceleration <= 0.0 {
            return f32::INFINITY;
        }
        speed * speed / (2.0 * self.acceleration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        let class = ShipClass::by_name("Sparrow Courier").expect("class should exist");
        assert_eq!(class.category, ShipCategory::Courier);
        assert!(ShipClass::by_name("Nonexistent").is_none());
    }

    #[test]
    fn test_courier_profile() {
        let class = ShipClass::by_name("Sparrow Courier").expect("class should exist");
        let profile = class.movement_profile(&[]);
        assert_eq!(profile.max_speed, 120.0);
        assert_eq!(profile.acceleration, 120.0);
        assert_eq!(profile.rotation_speed, 5.0);
        assert!((profile.braking_distance(120.0) - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_engine_bonus_stacks() {
        let class = ShipClass::by_name("Mule Hauler").expect("class should exist");
        let engines = [
            EngineModule::new("Ion Booster", 10.0),
            EngineModule::new("Plasma Injector", 15.0),
        ];
        let profile = class.movement_profile(&engines);
        assert!((profile.max_speed - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_heavier_hulls_are_slower_to_respond() {
        let courier = MovementProfile::from_category(ShipCategory::Courier, 100.0);
        let heavy = MovementProfile::from_category(ShipCategory::HeavyFreight, 100.0);
        assert!(heavy.acceleration < courier.acceleration);
        assert!(heavy.rotation_speed < courier.rotation_speed);
        assert!(heavy.maneuverability < courier.maneuverability);
    }
}
