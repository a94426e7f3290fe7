//! Trade decisions and simulated buy/sell execution.

use serde::{Deserialize, Serialize};
use starlane_common::StationId;
use tracing::debug;

use crate::commodity::Commodity;
use crate::config::AiConfig;
use crate::npc::{GoalKind, NpcShip, PurchaseRecord, TradeRoute};
use crate::world::GalaxyQuery;

/// What a trader intends to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeAction {
    /// Fly to a station
    Travel {
        /// Destination
        station: StationId,
    },
    /// Buy up to `quantity` units
    Buy {
        /// Commodity
        commodity: Commodity,
        /// Planned units
        quantity: u32,
    },
    /// Sell `quantity` units
    Sell {
        /// Commodity
        commodity: Commodity,
        /// Units
        quantity: u32,
    },
    /// Do nothing this tick
    Wait,
}

/// A trade decision with its confidence and a human-readable reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeDecision {
    /// Chosen action
    pub action: TradeAction,
    /// Confidence, 0-1
    pub confidence: f32,
    /// Why
    pub reasoning: String,
}

impl TradeDecision {
    /// Low-confidence wait.
    #[must_use]
    pub fn wait(reasoning: impl Into<String>) -> Self {
        Self {
            action: TradeAction::Wait,
            confidence: 0.1,
            reasoning: reasoning.into(),
        }
    }
}

/// Completed buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeReceipt {
    /// Commodity
    pub commodity: Commodity,
    /// Units moved
    pub quantity: u32,
    /// Price per unit (purchase price for buys, average for sells)
    pub unit_price: u64,
    /// Total credits moved
    pub total: u64,
}

/// Picks the next trade action for `npc`.
pub fn decide_trade(
    npc: &NpcShip,
    galaxy: &dyn GalaxyQuery,
    config: &AiConfig,
    rng: &mut fastrand::Rng,
) -> TradeDecision {
    if npc.in_transit {
        return TradeDecision::wait("In transit");
    }

    let Some(station_id) = npc.station_id else {
        return match galaxy.nearest_station(npc.system_id, npc.coordinates) {
            Some(station) => TradeDecision {
                action: TradeAction::Travel {
                    station: station.id,
                },
                confidence: 0.9,
                reasoning: format!("Heading to nearest station {}", station.name),
            },
            None => TradeDecision::wait("No station in system"),
        };
    };

    if npc.cargo_fill() >= config.sell_cargo_fraction {
        if let Some((commodity, quantity)) = most_valuable_holding(npc) {
            return TradeDecision {
                action: TradeAction::Sell {
                    commodity,
                    quantity,
                },
                confidence: 0.8,
                reasoning: format!("Hold nearly full, selling {commodity}"),
            };
        }
    }

    if npc.free_cargo() > 0 && npc.credits > config.buy_credit_threshold {
        if let Some(commodity) = best_purchase(npc, rng) {
            let budget_units = npc.credits / (commodity.base_value() * 11 / 10).max(1);
            let quantity = u32::try_from(budget_units)
                .unwrap_or(u32::MAX)
                .min(npc.free_cargo());
            if quantity > 0 {
                return TradeDecision {
                    action: TradeAction::Buy {
                        commodity,
                        quantity,
                    },
                    confidence: 0.4 + npc.skills.trading / 200.0,
                    reasoning: format!("Buying {commodity} at {station_id}"),
                };
            }
        }
    }

    let route = npc
        .routes
        .best_route_from_elsewhere(Some(station_id))
        .and_then(|route| galaxy.station(route.from))
        .filter(|station| station.system_id == npc.system_id);
    if let Some(station) = route {
        return TradeDecision {
            action: TradeAction::Travel {
                station: station.id,
            },
            confidence: 0.6,
            reasoning: format!("Following known route from {}", station.name),
        };
    }

    TradeDecision::wait("Studying the market")
}

/// Held commodity with the highest value at base prices.
#[must_use]
pub fn most_valuable_holding(npc: &NpcShip) -> Option<(Commodity, u32)> {
    npc.cargo
        .iter()
        .filter(|(_, qty)| **qty > 0)
        .max_by_key(|(commodity, qty)| commodity.base_value() * u64::from(**qty))
        .map(|(commodity, qty)| (*commodity, *qty))
}

/// Commodity with the best skill-weighted score.
///
/// High-value goods need trading skill to pay off; market knowledge narrows
/// the random noise. A trade goal focused on one commodity favours it.
pub fn best_purchase(npc: &NpcShip, rng: &mut fastrand::Rng) -> Option<Commodity> {
    let trading = npc.skills.trading / 100.0;
    let noise = 0.4 * (1.0 - npc.skills.market_knowledge / 100.0).clamp(0.0, 1.0);
    let focus = match npc.current_goal.kind {
        GoalKind::Trade { commodity } => commodity,
        _ => None,
    };

    Commodity::ALL
        .iter()
        .filter(|commodity| commodity.base_value() <= npc.credits)
        .map(|&commodity| {
            let value = commodity.base_value() as f32;
            let skill_weight = if commodity.is_high_value() {
                trading
            } else {
                1.0 - trading * 0.5
            };
            let mut score = value.sqrt() * skill_weight * (1.0 + (rng.f32() - 0.5) * noise);
            if focus == Some(commodity) {
                score *= 1.5;
            }
            (commodity, score)
        })
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(commodity, _)| commodity)
}

/// Buys up to `max_quantity` at a randomised price around the base value.
///
/// Quantity is limited by free hold space and credits. Returns `None` when
/// nothing could be bought.
pub fn execute_buy(
    npc: &mut NpcShip,
    station: StationId,
    commodity: Commodity,
    max_quantity: u32,
    rng: &mut fastrand::Rng,
    now: u64,
) -> Option<TradeReceipt> {
    let unit_price = ((commodity.base_value() as f32) * (0.9 + rng.f32() * 0.2))
        .round()
        .max(1.0) as u64;
    let affordable = u32::try_from(npc.credits / unit_price).unwrap_or(u32::MAX);
    let quantity = max_quantity.min(npc.free_cargo()).min(affordable);
    if quantity == 0 {
        debug!(npc = %npc.id, %commodity, unit_price, "Purchase skipped");
        return None;
    }

    let total = unit_price * u64::from(quantity);
    npc.add_cargo(commodity, quantity).ok()?;
    npc.credits -= total;
    npc.routes.last_purchase = Some(PurchaseRecord {
        station_id: station,
        commodity,
        unit_price,
        at: now,
    });
    npc.last_action_time = now;

    debug!(npc = %npc.id, %commodity, quantity, unit_price, "Bought cargo");
    Some(TradeReceipt {
        commodity,
        quantity,
        unit_price,
        total,
    })
}

/// Sells up to `quantity` units with a randomised markup on the base value.
///
/// A sale above the last purchase price records a profitable route.
pub fn execute_sell(
    npc: &mut NpcShip,
    station: StationId,
    commodity: Commodity,
    quantity: u32,
    rng: &mut fastrand::Rng,
    now: u64,
) -> Option<TradeReceipt> {
    let quantity = quantity.min(npc.cargo_of(commodity));
    if quantity == 0 {
        return None;
    }

    let markup = 0.95 + rng.f32() * 0.3;
    let revenue =
        (commodity.base_value() as f32 * quantity as f32 * markup).round().max(0.0) as u64;
    npc.remove_cargo(commodity, quantity).ok()?;
    npc.credits = npc.credits.saturating_add(revenue);
    npc.last_action_time = now;

    let unit_price = revenue / u64::from(quantity);
    if let Some(purchase) = npc.routes.last_purchase {
        if purchase.commodity == commodity
            && purchase.station_id != station
            && unit_price > purchase.unit_price
        {
            let margin = (unit_price - purchase.unit_price) as f32 / purchase.unit_price as f32;
            npc.routes.record_profitable_route(TradeRoute {
                from: purchase.station_id,
                to: station,
                commodity,
                margin,
                discovered_at: now,
            });
        }
    }

    debug!(npc = %npc.id, %commodity, quantity, revenue, "Sold cargo");
    Some(TradeReceipt {
        commodity,
        quantity,
        unit_price,
        total: revenue,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::npc::test_support::test_ship;
    use crate::npc::NpcType;
    use crate::world::{Galaxy, SecurityLevel};
    use starlane_common::{SystemId, Vec2};

    fn galaxy() -> (Galaxy, SystemId, StationId, StationId) {
        let mut galaxy = Galaxy::new();
        let sector = galaxy.add_sector("Core");
        let system = galaxy.add_system(sector, "Sol", SecurityLevel::High);
        let a = galaxy.add_station(system, "Alpha", "Terran Federation", Vec2::new(50.0, 0.0));
        let b = galaxy.add_station(system, "Beta", "Free Worlds", Vec2::new(600.0, 0.0));
        (galaxy, system, a, b)
    }

    #[test]
    fn test_buy_conserves_credits_and_cargo() {
        let mut rng = fastrand::Rng::with_seed(11);
        let mut npc = test_ship(1, NpcType::Trader, SystemId::new(1), Vec2::ZERO);
        let credits_before = npc.credits;

        let receipt = execute_buy(&mut npc, StationId::new(5), Commodity::Metals, 20, &mut rng, 0)
            .expect("purchase should succeed");

        assert_eq!(receipt.quantity, 20);
        assert_eq!(receipt.total, receipt.unit_price * 20);
        assert_eq!(npc.credits, credits_before - receipt.unit_price * 20);
        assert_eq!(npc.cargo_of(Commodity::Metals), 20);
        assert!((108..=132).contains(&receipt.unit_price));
    }

    #[test]
    fn test_buy_limited_by_credits_and_skipped_when_broke() {
        let mut rng = fastrand::Rng::with_seed(3);
        let mut npc = test_ship(1, NpcType::Trader, SystemId::new(1), Vec2::ZERO);
        npc.credits = 1_000;
        let receipt = execute_buy(&mut npc, StationId::new(5), Commodity::Luxuries, 50, &mut rng, 0)
            .expect("can afford at least one");
        assert!(receipt.quantity <= 2);
        assert!(npc.credits < receipt.unit_price);

        npc.credits = 10;
        let cargo_before = npc.cargo.clone();
        assert!(execute_buy(&mut npc, StationId::new(5), Commodity::Luxuries, 5, &mut rng, 0)
            .is_none());
        assert_eq!(npc.credits, 10);
        assert_eq!(npc.cargo, cargo_before);
    }

    #[test]
    fn test_sell_removes_cargo_and_records_route() {
        let mut rng = fastrand::Rng::with_seed(5);
        let mut npc = test_ship(1, NpcType::Trader, SystemId::new(1), Vec2::ZERO);
        npc.add_cargo(Commodity::Food, 30).expect("fits");
        npc.routes.last_purchase = Some(PurchaseRecord {
            station_id: StationId::new(1),
            commodity: Commodity::Food,
            unit_price: 10,
            at: 0,
        });
        let credits_before = npc.credits;

        let receipt = execute_sell(&mut npc, StationId::new(2), Commodity::Food, 30, &mut rng, 500)
            .expect("sale should succeed");

        assert_eq!(receipt.quantity, 30);
        assert_eq!(npc.cargo_of(Commodity::Food), 0);
        assert_eq!(npc.credits, credits_before + receipt.total);
        let route = npc.routes.profitable_routes.front().expect("route recorded");
        assert_eq!(route.from, StationId::new(1));
        assert_eq!(route.to, StationId::new(2));
        assert!(route.margin > 0.0);
    }

    #[test]
    fn test_undocked_trader_travels_to_nearest_station() {
        let (galaxy, system, near, _) = galaxy();
        let mut rng = fastrand::Rng::with_seed(1);
        let npc = test_ship(1, NpcType::Trader, system, Vec2::ZERO);
        let decision = decide_trade(&npc, &galaxy, &AiConfig::default(), &mut rng);
        assert_eq!(decision.action, TradeAction::Travel { station: near });
    }

    #[test]
    fn test_full_hold_sells_most_valuable() {
        let (galaxy, system, near, _) = galaxy();
        let mut rng = fastrand::Rng::with_seed(1);
        let mut npc = test_ship(1, NpcType::Trader, system, Vec2::ZERO);
        npc.station_id = Some(near);
        npc.add_cargo(Commodity::Ore, 70).expect("fits");
        npc.add_cargo(Commodity::Electronics, 15).expect("fits");

        let decision = decide_trade(&npc, &galaxy, &AiConfig::default(), &mut rng);
        assert_eq!(
            decision.action,
            TradeAction::Sell {
                commodity: Commodity::Electronics,
                quantity: 15
            }
        );
    }

    #[test]
    fn test_docked_trader_with_credits_buys() {
        let (galaxy, system, near, _) = galaxy();
        let mut rng = fastrand::Rng::with_seed(9);
        let mut npc = test_ship(1, NpcType::Trader, system, Vec2::ZERO);
        npc.station_id = Some(near);
        let decision = decide_trade(&npc, &galaxy, &AiConfig::default(), &mut rng);
        assert!(matches!(decision.action, TradeAction::Buy { quantity, .. } if quantity > 0));
    }

    #[test]
    fn test_poor_trader_follows_route_or_waits() {
        let (galaxy, system, near, far) = galaxy();
        let mut rng = fastrand::Rng::with_seed(9);
        let mut npc = test_ship(1, NpcType::Trader, system, Vec2::ZERO);
        npc.station_id = Some(near);
        npc.credits = 500;

        let decision = decide_trade(&npc, &galaxy, &AiConfig::default(), &mut rng);
        assert_eq!(decision.action, TradeAction::Wait);

        npc.routes.record_profitable_route(TradeRoute {
            from: far,
            to: near,
            commodity: Commodity::Food,
            margin: 0.2,
            discovered_at: 0,
        });
        let decision = decide_trade(&npc, &galaxy, &AiConfig::default(), &mut rng);
        assert_eq!(decision.action, TradeAction::Travel { station: far });
    }

    #[test]
    fn test_in_transit_waits() {
        let (galaxy, system, ..) = galaxy();
        let mut rng = fastrand::Rng::with_seed(1);
        let mut npc = test_ship(1, NpcType::Trader, system, Vec2::ZERO);
        npc.in_transit = true;
        let decision = decide_trade(&npc, &galaxy, &AiConfig::default(), &mut rng);
        assert_eq!(decision.action, TradeAction::Wait);
        assert!(decision.confidence < 0.5);
    }
}
