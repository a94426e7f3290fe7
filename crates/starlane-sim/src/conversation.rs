//! Player-NPC dialogue sessions.
//!
//! A conversation is a tiny graph: `greeting` branches to `trade_response`
//! or `info_response`, and everything leads to `end`. Greeting text depends
//! on the conversation type and on a mood rolled from reputation.

use serde::{Deserialize, Serialize};
use starlane_common::NpcId;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::npc::{NpcShip, NpcType};
use crate::world::SecurityLevel;

/// Entry node id.
pub const GREETING_NODE: &str = "greeting";
/// Trade branch node id.
pub const TRADE_NODE: &str = "trade_response";
/// Information branch node id.
pub const INFO_NODE: &str = "info_response";
/// Terminal node id.
pub const END_NODE: &str = "end";

/// Error types for conversation operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversationError {
    /// No such NPC
    #[error("NPC not found: {0}")]
    NpcNotFound(NpcId),
    /// NPC is not in a conversation
    #[error("No active conversation with {0}")]
    NoActiveConversation(NpcId),
    /// Choice index out of range
    #[error("Invalid choice {index} (node offers {available})")]
    InvalidChoice {
        /// Requested choice
        index: usize,
        /// Number of choices offered
        available: usize,
    },
}

/// Result type for conversation operations.
pub type ConversationResult<T> = Result<T, ConversationError>;

/// What the conversation is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConversationType {
    /// Buying and selling
    Trade,
    /// Gossip and news
    Information,
    /// A pirate shakedown
    Threat,
    /// A patrol inspection
    Inspection,
}

impl ConversationType {
    /// Type used when the player hails an NPC of `npc_type`.
    #[must_use]
    pub const fn for_npc(npc_type: NpcType) -> Self {
        match npc_type {
            NpcType::Trader | NpcType::Transport => Self::Trade,
            NpcType::Civilian => Self::Information,
            NpcType::Pirate => Self::Threat,
            NpcType::Patrol => Self::Inspection,
        }
    }

    fn greetings(self) -> &'static [&'static str] {
        match self {
            Self::Trade => &[
                "Looking to do business?",
                "I've got a hold full of goods and no patience for haggling.",
                "Credits talk. What are you buying?",
            ],
            Self::Information => &[
                "Hello there, traveller.",
                "Quiet lane today, isn't it?",
                "Need directions? I know these parts.",
            ],
            Self::Threat => &[
                "Nice ship. Be a shame if something happened to it.",
                "Cut your engines and nobody gets hurt.",
                "Your cargo or your hull. Choose.",
            ],
            Self::Inspection => &[
                "This is a routine inspection. Hold position.",
                "Transmit your manifest for review.",
                "Patrol authority. Identify yourself.",
            ],
        }
    }
}

/// NPC disposition toward the player for this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    /// Warm
    Friendly,
    /// Businesslike
    Neutral,
    /// Cold or threatening
    Hostile,
    /// Jumpy
    Nervous,
}

impl Mood {
    /// Rolls a mood, biased by reputation and the NPC's current threat level.
    pub fn roll(reputation: i32, threat_level: f32, rng: &mut fastrand::Rng) -> Self {
        let score = reputation as f32 / 100.0 + (rng.f32() - 0.5) * 0.6;
        if score > 0.3 {
            Self::Friendly
        } else if score < -0.3 {
            Self::Hostile
        } else if threat_level > 50.0 {
            Self::Nervous
        } else {
            Self::Neutral
        }
    }

    const fn opener(self) -> &'static str {
        match self {
            Self::Friendly => "Good to see you! ",
            Self::Neutral => "",
            Self::Hostile => "Make it quick. ",
            Self::Nervous => "Easy now... ",
        }
    }
}

/// Who speaks a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    /// The NPC
    Npc,
    /// The player
    Player,
}

/// A player reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueChoice {
    /// Reply text
    pub text: String,
    /// Node this reply leads to
    pub next_node: String,
    /// Declared effects; carried for hosts, never applied here
    pub consequences: Vec<String>,
}

impl DialogueChoice {
    fn new(text: &str, next_node: &str) -> Self {
        Self {
            text: text.to_string(),
            next_node: next_node.to_string(),
            consequences: Vec::new(),
        }
    }
}

/// A line of dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueNode {
    /// Node id
    pub id: String,
    /// Speaker
    pub speaker: Speaker,
    /// Text
    pub text: String,
    /// Replies; empty on the terminal node
    pub choices: Vec<DialogueChoice>,
}

/// Snapshot of the situation a conversation started in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    /// NPC reputation with the player when the session started
    pub player_reputation: i32,
    /// Rolled mood
    pub mood: Mood,
    /// Security of the NPC's system, if known
    pub system_security: Option<SecurityLevel>,
    /// Recent notable events, newest last
    pub recent_events: Vec<String>,
}

/// Step taken by [`NpcConversation::choose`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationStep {
    /// Conversation moved to this node
    Continue(DialogueNode),
    /// Terminal node reached
    Ended,
}

/// Active dialogue session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcConversation {
    /// NPC talking
    pub npc_id: NpcId,
    /// Subject
    pub conversation_type: ConversationType,
    /// Starting situation
    pub context: ConversationContext,
    /// Dialogue graph
    pub nodes: BTreeMap<String, DialogueNode>,
    /// Node currently shown
    pub current_node: String,
    /// When the session opened (ms)
    pub started_at: u64,
}

impl NpcConversation {
    /// Builds the dialogue graph for `npc`.
    pub fn build(
        npc: &NpcShip,
        system_security: Option<SecurityLevel>,
        recent_events: Vec<String>,
        now: u64,
        rng: &mut fastrand::Rng,
    ) -> Self {
        let conversation_type = ConversationType::for_npc(npc.npc_type);
        let mood = Mood::roll(npc.reputation, npc.threat.level, rng);
        let pool = conversation_type.greetings();
        let greeting = pool[rng.usize(..pool.len())];

        let mut nodes = BTreeMap::new();
        let mut insert = |node: DialogueNode| {
            nodes.insert(node.id.clone(), node);
        };

        insert(DialogueNode {
            id: GREETING_NODE.to_string(),
            speaker: Speaker::Npc,
            text: format!("{}{greeting}", mood.opener()),
            choices: vec![
                DialogueChoice::new("What are you carrying?", TRADE_NODE),
                DialogueChoice::new("Any news from around here?", INFO_NODE),
                DialogueChoice::new("Never mind.", END_NODE),
            ],
        });

        let cargo_line = match crate::trade::most_valuable_holding(npc) {
            Some((commodity, qty)) => format!("I've got {qty} units of {commodity} if the price is right."),
            None => "My hold is empty right now.".to_string(),
        };
        insert(DialogueNode {
            id: TRADE_NODE.to_string(),
            speaker: Speaker::Npc,
            text: cargo_line,
            choices: vec![DialogueChoice::new("I'll keep that in mind.", END_NODE)],
        });

        let security_line = match system_security {
            Some(level) => format!("Security around here is {}.", level.label()),
            None => "Couldn't tell you who keeps the peace here.".to_string(),
        };
        let danger_line = if npc.threat.nearby_threats.is_empty() {
            " Lanes look clear."
        } else {
            " Watch yourself, there's trouble nearby."
        };
        insert(DialogueNode {
            id: INFO_NODE.to_string(),
            speaker: Speaker::Npc,
            text: format!("{security_line}{danger_line}"),
            choices: vec![DialogueChoice::new("Thanks.", END_NODE)],
        });

        insert(DialogueNode {
            id: END_NODE.to_string(),
            speaker: Speaker::Npc,
            text: "Safe travels.".to_string(),
            choices: Vec::new(),
        });

        Self {
            npc_id: npc.id,
            conversation_type,
            context: ConversationContext {
                player_reputation: npc.reputation,
                mood,
                system_security,
                recent_events,
            },
            nodes,
            current_node: GREETING_NODE.to_string(),
            started_at: now,
        }
    }

    /// Node currently shown.
    #[must_use]
    pub fn current(&self) -> Option<&DialogueNode> {
        self.nodes.get(&self.current_node)
    }

    /// Whether the session is on its terminal node.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.current_node == END_NODE
    }

    /// Follows choice `index` from the current node.
    ///
    /// # Errors
    /// Returns [`ConversationError::InvalidChoice`] if `index` is out of range.
    pub fn choose(&mut self, index: usize) -> ConversationResult<ConversationStep> {
        let available = self.current().map_or(0, |node| node.choices.len());
        let next = self
            .current()
            .and_then(|node| node.choices.get(index))
            .map(|choice| choice.next_node.clone())
            .ok_or(ConversationError::InvalidChoice { index, available })?;

        self.current_node = next;
        if self.is_finished() {
            return Ok(ConversationStep::Ended);
        }
        if let Some(node) = self.current() {
            return Ok(ConversationStep::Continue(node.clone()));
        }
        // Dangling edge: treat as the end of the conversation.
        self.current_node = END_NODE.to_string();
        Ok(ConversationStep::Ended)
    }
}
