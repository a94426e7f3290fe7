//! Tradeable commodities and their reference prices.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A tradeable good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Commodity {
    /// Food rations
    Food,
    /// Purified water
    Water,
    /// Starship fuel
    Fuel,
    /// Unrefined ore
    Ore,
    /// Refined metals
    Metals,
    /// Electronic components
    Electronics,
    /// Medical supplies
    Medicine,
    /// Luxury goods
    Luxuries,
    /// Weapons
    Weapons,
    /// Industrial machinery
    Machinery,
}

impl Commodity {
    /// Every commodity, in a stable order.
    pub const ALL: [Self; 10] = [
        Self::Food,
        Self::Water,
        Self::Fuel,
        Self::Ore,
        Self::Metals,
        Self::Electronics,
        Self::Medicine,
        Self::Luxuries,
        Self::Weapons,
        Self::Machinery,
    ];

    /// Reference price per unit.
    #[must_use]
    pub const fn base_value(self) -> u64 {
        match self {
            Self::Food => 50,
            Self::Water => 30,
            Self::Fuel => 80,
            Self::Ore => 40,
            Self::Metals => 120,
            Self::Electronics => 300,
            Self::Medicine => 250,
            Self::Luxuries => 500,
            Self::Weapons => 400,
            Self::Machinery => 200,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Water => "Water",
            Self::Fuel => "Fuel",
            Self::Ore => "Ore",
            Self::Metals => "Metals",
            Self::Electronics => "Electronics",
            Self::Medicine => "Medicine",
            Self::Luxuries => "Luxuries",
            Self::Weapons => "Weapons",
            Self::Machinery => "Machinery",
        }
    }

    /// Whether the good is high value (base value of 250 or more).
    #[must_use]
    pub const fn is_high_value(self) -> bool {
        self.base_value() >= 250
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
