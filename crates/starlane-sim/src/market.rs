//! Per-NPC, per-station trading profiles.
//!
//! Participation is recorded (timestamp, open order, event) but does not move
//! prices; there is no economy model behind the stations.

use serde::{Deserialize, Serialize};
use starlane_common::{NpcId, StationId};
use std::collections::{BTreeMap, VecDeque};

use crate::commodity::Commodity;
use crate::npc::NpcShip;

/// Open orders kept per behaviour.
pub const MAX_OPEN_ORDERS: usize = 8;

/// Commodities each behaviour cares about.
const PREFERRED_COMMODITIES: usize = 3;

/// Side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    /// Bid
    Buy,
    /// Ask
    Sell,
}

/// A standing order placed during a market tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketOrder {
    /// Commodity
    pub commodity: Commodity,
    /// Side
    pub side: OrderSide,
    /// Units
    pub quantity: u32,
    /// Limit price per unit
    pub limit_price: u64,
    /// When placed (ms)
    pub placed_at: u64,
}

/// Trading profile of one NPC at one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcMarketBehavior {
    /// Owning NPC
    pub npc_id: NpcId,
    /// Station
    pub station_id: StationId,
    /// Participation weight per commodity, 0-1
    pub preferences: BTreeMap<Commodity, f32>,
    /// Highest price paid per unit
    pub buy_price_ceiling: BTreeMap<Commodity, u64>,
    /// Lowest price accepted per unit
    pub sell_price_floor: BTreeMap<Commodity, u64>,
    /// Largest single trade
    pub max_trade_quantity: BTreeMap<Commodity, u32>,
    /// Most units held at once
    pub stock_limit: BTreeMap<Commodity, u32>,
    /// Minimum time between participations (ms)
    pub trade_frequency_ms: u64,
    /// Last participation (ms)
    pub last_trade: u64,
    /// Recent orders, oldest first
    pub open_orders: VecDeque<MarketOrder>,
}

impl NpcMarketBehavior {
    /// Rolls a profile for `npc` trading at `station`.
    pub fn generate(npc: &NpcShip, station: StationId, now: u64, rng: &mut fastrand::Rng) -> Self {
        let mut pool = Commodity::ALL.to_vec();
        rng.shuffle(&mut pool);
        let skill = npc.skills.trading / 100.0;

        let mut behavior = Self {
            npc_id: npc.id,
            station_id: station,
            preferences: BTreeMap::new(),
            buy_price_ceiling: BTreeMap::new(),
            sell_price_floor: BTreeMap::new(),
            max_trade_quantity: BTreeMap::new(),
            stock_limit: BTreeMap::new(),
            trade_frequency_ms: rng.u64(60_000..=180_000),
            last_trade: now,
            open_orders: VecDeque::new(),
        };

        let lot = (npc.cargo_capacity / 4).max(1);
        for commodity in pool.into_iter().take(PREFERRED_COMMODITIES) {
            let base = commodity.base_value() as f32;
            behavior.preferences.insert(commodity, 0.3 + rng.f32() * 0.7);
            // Skilled traders pay less and ask more.
            behavior
                .buy_price_ceiling
                .insert(commodity, (base * (1.1 - 0.15 * skill)).round() as u64);
            behavior
                .sell_price_floor
                .insert(commodity, (base * (0.9 + 0.15 * skill)).round() as u64);
            behavior.max_trade_quantity.insert(commodity, lot);
            behavior.stock_limit.insert(commodity, lot * 2);
        }
        behavior
    }

    /// Whether the trade-frequency window has elapsed.
    #[must_use]
    pub fn is_due(&self, now: u64) -> bool {
        now >= self.last_trade.saturating_add(self.trade_frequency_ms)
    }

    /// Rolls participation per preferred commodity.
    ///
    /// Returns the commodities traded. Does nothing if not yet due.
    pub fn participate(&mut self, now: u64, rng: &mut fastrand::Rng) -> Vec<Commodity> {
        if !self.is_due(now) {
            return Vec::new();
        }

        let mut traded = Vec::new();
        for (&commodity, &weight) in &self.preferences {
            if rng.f32() >= weight {
                continue;
            }
            let (side, limit_price) = if rng.bool() {
                (OrderSide::Buy, self.buy_price_ceiling.get(&commodity))
            } else {
                (OrderSide::Sell, self.sell_price_floor.get(&commodity))
            };
            let quantity = self.max_trade_quantity.get(&commodity).copied().unwrap_or(1);
            self.open_orders.push_back(MarketOrder {
                commodity,
                side,
                quantity: rng.u32(1..=quantity.max(1)),
                limit_price: limit_price.copied().unwrap_or_else(|| commodity.base_value()),
                placed_at: now,
            });
            traded.push(commodity);
        }

        while self.open_orders.len() > MAX_OPEN_ORDERS {
            self.open_orders.pop_front();
        }
        if !traded.is_empty() {
            self.last_trade = now;
        }
        traded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::npc::test_support::test_ship;
    use crate::npc::NpcType;
    use starlane_common::{SystemId, Vec2};

    fn behavior() -> NpcMarketBehavior {
        let npc = test_ship(1, NpcType::Trader, SystemId::new(1), Vec2::ZERO);
        let mut rng = fastrand::Rng::with_seed(21);
        NpcMarketBehavior::generate(&npc, StationId::new(3), 0, &mut rng)
    }

    #[test]
    fn test_generate_profile() {
        let behavior = behavior();
        assert_eq!(behavior.preferences.len(), PREFERRED_COMMODITIES);
        assert!((60_000..=180_000).contains(&behavior.trade_frequency_ms));
        for (commodity, ceiling) in &behavior.buy_price_ceiling {
            assert!(*ceiling >= behavior.sell_price_floor[commodity]);
        }
    }

    #[test]
    fn test_not_due_before_window() {
        let mut behavior = behavior();
        let mut rng = fastrand::Rng::with_seed(1);
        let early = behavior.trade_frequency_ms - 1;
        assert!(behavior.participate(early, &mut rng).is_empty());
        assert_eq!(behavior.last_trade, 0);
    }

    #[test]
    fn test_certain_participation_records_orders() {
        let mut behavior = behavior();
        for weight in behavior.preferences.values_mut() {
            *weight = 1.0;
        }
        let mut rng = fastrand::Rng::with_seed(1);
        let now = behavior.trade_frequency_ms;
        let traded = behavior.participate(now, &mut rng);
        assert_eq!(traded.len(), PREFERRED_COMMODITIES);
        assert_eq!(behavior.last_trade, now);
        assert_eq!(behavior.open_orders.len(), PREFERRED_COMMODITIES);
    }

    #[test]
    fn test_open_orders_bounded() {
        let mut behavior = behavior();
        for weight in behavior.preferences.values_mut() {
            *weight = 1.0;
        }
        let mut rng = fastrand::Rng::with_seed(1);
        let mut now = 0;
        for _ in 0..10 {
            now += behavior.trade_frequency_ms;
            behavior.participate(now, &mut rng);
        }
        assert_eq!(behavior.open_orders.len(), MAX_OPEN_ORDERS);
    }
}
