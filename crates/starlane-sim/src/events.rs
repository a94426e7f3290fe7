//! Event bus for notifying the host about simulation activity.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use starlane_common::{NpcId, StationId, SystemId, Vec2};

use crate::combat::CombatAction;
use crate::commodity::Commodity;
use crate::conversation::ConversationType;
use crate::npc::{GoalType, NpcType};

/// Event types published by the AI manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// NPC added to the live set
    NpcSpawned {
        /// NPC ID
        npc_id: NpcId,
        /// Ship type
        npc_type: NpcType,
        /// System it spawned in
        system_id: SystemId,
    },
    /// NPC removed from the live set
    NpcDespawned {
        /// NPC ID
        npc_id: NpcId,
    },
    /// NPC replaced its current goal
    GoalChanged {
        /// NPC ID
        npc_id: NpcId,
        /// Previous goal
        from: GoalType,
        /// New goal
        to: GoalType,
    },
    /// NPC finished a movement order
    Arrived {
        /// NPC ID
        npc_id: NpcId,
        /// Final position
        position: Vec2,
        /// Station docked at, if the order targeted one
        docked_at: Option<StationId>,
    },
    /// NPC bought or sold cargo
    TradeExecuted {
        /// NPC ID
        npc_id: NpcId,
        /// Station the trade happened at
        station_id: StationId,
        /// Commodity traded
        commodity: Commodity,
        /// Units moved (positive = bought, negative = sold)
        quantity: i64,
        /// Credits moved (positive = earned, negative = spent)
        credits: i64,
    },
    /// Pirate decided on a combat action
    CombatDecision {
        /// NPC ID
        npc_id: NpcId,
        /// Chosen action
        action: CombatAction,
        /// Target NPC, if the target is not the player
        target: Option<NpcId>,
    },
    /// Conversation session opened
    ConversationStarted {
        /// NPC ID
        npc_id: NpcId,
        /// Conversation type
        conversation_type: ConversationType,
    },
    /// Conversation session closed
    ConversationEnded {
        /// NPC ID
        npc_id: NpcId,
    },
    /// NPC took part in a station market
    MarketParticipation {
        /// NPC ID
        npc_id: NpcId,
        /// Station
        station_id: StationId,
        /// Commodity considered
        commodity: Commodity,
    },
}

/// Event bus for broadcasting events to the host.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<SimEvent>,
    /// Receiver for collecting events
    receiver: Receiver<SimEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: SimEvent) {
        // Non-blocking send - if full, event is dropped
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<SimEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a receiver handle so another component can consume events.
    #[must_use]
    pub fn subscriber(&self) -> Receiver<SimEvent> {
        self.receiver.clone()
    }
}
