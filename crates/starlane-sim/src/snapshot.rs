//! Serializable simulation state.
//!
//! A [`SimSnapshot`] captures everything [`crate::manager::NpcAiManager`]
//! owns. It can be written as pretty JSON or as a compact binary blob
//! (`SLSN` magic followed by a bincode payload).

use serde::{Deserialize, Serialize};
use starlane_common::{MagicBytes, NpcId, SchemaVersion, StarlaneError, StarlaneResult};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::conversation::NpcConversation;
use crate::market::NpcMarketBehavior;
use crate::npc::NpcShip;

/// On-disk encoding of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// Magic-prefixed bincode
    Binary,
}

/// Complete manager state at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    /// Schema version
    pub version: SchemaVersion,
    /// NPC records
    pub npc_ships: BTreeMap<NpcId, NpcShip>,
    /// Market behaviours in (NPC, station) order
    pub market_behaviors: Vec<NpcMarketBehavior>,
    /// Open conversations
    pub active_conversations: BTreeMap<NpcId, NpcConversation>,
    /// Last AI pass (ms)
    pub last_ai_tick: u64,
    /// Last spawn pass (ms)
    pub last_spawn_tick: u64,
    /// Last market pass (ms)
    pub last_market_tick: u64,
    /// Next NPC id to hand out
    pub next_npc_id: u64,
}

impl SimSnapshot {
    /// Creates a snapshot at the current schema version.
    #[must_use]
    pub fn new(
        npc_ships: BTreeMap<NpcId, NpcShip>,
        market_behaviors: Vec<NpcMarketBehavior>,
        active_conversations: BTreeMap<NpcId, NpcConversation>,
        last_ai_tick: u64,
        last_spawn_tick: u64,
        last_market_tick: u64,
        next_npc_id: u64,
    ) -> Self {
        Self {
            version: SchemaVersion::SIM_SNAPSHOT,
            npc_ships,
            market_behaviors,
            active_conversations,
            last_ai_tick,
            last_spawn_tick,
            last_market_tick,
            next_npc_id,
        }
    }

    fn check_version(&self) -> StarlaneResult<()> {
        if SchemaVersion::SIM_SNAPSHOT.can_read(&self.version) {
            Ok(())
        } else {
            Err(StarlaneError::VersionMismatch {
                expected: SchemaVersion::SIM_SNAPSHOT.to_string(),
                actual: self.version.to_string(),
            })
        }
    }

    /// Encodes as pretty JSON.
    pub fn to_json(&self) -> StarlaneResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| StarlaneError::Serialization(e.to_string()))
    }

    /// Decodes from JSON, rejecting unreadable schema versions.
    pub fn from_json(json: &str) -> StarlaneResult<Self> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| StarlaneError::Corrupted(e.to_string()))?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    /// Encodes as magic bytes followed by a bincode payload.
    pub fn to_bytes(&self) -> StarlaneResult<Vec<u8>> {
        let payload =
            bincode::serialize(self).map_err(|e| StarlaneError::Serialization(e.to_string()))?;
        let mut bytes = Vec::with_capacity(4 + payload.len());
        bytes.extend_from_slice(&MagicBytes::SIM_SNAPSHOT.0);
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    /// Decodes from the binary encoding.
    pub fn from_bytes(bytes: &[u8]) -> StarlaneResult<Self> {
        if bytes.len() < 4 || bytes[0..4] != MagicBytes::SIM_SNAPSHOT.0 {
            return Err(StarlaneError::InvalidFormat);
        }
        let snapshot: Self = bincode::deserialize(&bytes[4..])
            .map_err(|e| StarlaneError::Corrupted(e.to_string()))?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    /// Writes to `path` through a temporary file and rename.
    pub fn save_to(&self, path: &Path, format: SnapshotFormat) -> StarlaneResult<()> {
        let bytes = match format {
            SnapshotFormat::Json => self.to_json()?.into_bytes(),
            SnapshotFormat::Binary => self.to_bytes()?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let temp_path = path.with_extension("tmp");
        {
            let mut writer = BufWriter::new(File::create(&temp_path)?);
            writer.write_all(&bytes)?;
            writer.flush()?;
        }
        fs::rename(&temp_path, path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            StarlaneError::Io(e)
        })?;

        info!(path = %path.display(), ?format, npcs = self.npc_ships.len(), "Snapshot written");
        Ok(())
    }

    /// Reads from `path`, detecting the format from the magic bytes.
    pub fn load_from(path: &Path) -> StarlaneResult<Self> {
        let bytes = fs::read(path)?;
        let snapshot = if bytes.starts_with(&MagicBytes::SIM_SNAPSHOT.0) {
            Self::from_bytes(&bytes)?
        } else {
            let text =
                std::str::from_utf8(&bytes).map_err(|_| StarlaneError::InvalidFormat)?;
            Self::from_json(text)?
        };
        debug!(path = %path.display(), version = %snapshot.version, "Snapshot read");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::npc::test_support::test_ship;
    use crate::npc::NpcType;
    use starlane_common::{SystemId, Vec2};

    fn sample() -> SimSnapshot {
        let mut ships = BTreeMap::new();
        for id in 1..=3 {
            let mut ship = test_ship(id, NpcType::Trader, SystemId::new(1), Vec2::new(id as f32 * 10.0, 0.0));
            ship.fly_to(Vec2::new(500.0, 500.0), None);
            ships.insert(ship.id, ship);
        }
        SimSnapshot::new(ships, Vec::new(), BTreeMap::new(), 5_000, 0, 0, 4)
    }

    #[test]
    fn test_json_preserves_state() {
        let snapshot = sample();
        let json = snapshot.to_json().expect("encode");
        let decoded = SimSnapshot::from_json(&json).expect("decode");
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_binary_has_magic() {
        let bytes = sample().to_bytes().expect("encode");
        assert_eq!(&bytes[0..4], b"SLSN");
        let decoded = SimSnapshot::from_bytes(&bytes).expect("decode");
        assert_eq!(decoded.npc_ships.len(), 3);
        assert_eq!(decoded.next_npc_id, 4);
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut bytes = sample().to_bytes().expect("encode");
        bytes[0] = b'X';
        assert!(matches!(SimSnapshot::from_bytes(&bytes), Err(StarlaneError::InvalidFormat)));
        assert!(matches!(SimSnapshot::from_bytes(b"SL"), Err(StarlaneError::InvalidFormat)));
    }

    #[test]
    fn test_rejects_truncated_payload() {
        let bytes = sample().to_bytes().expect("encode");
        let truncated = &bytes[..bytes.len() / 2];
        assert!(matches!(SimSnapshot::from_bytes(truncated), Err(StarlaneError::Corrupted(_))));
    }

    #[test]
    fn test_rejects_newer_major_version() {
        let mut snapshot = sample();
        snapshot.version = SchemaVersion::new(2, 0, 0);
        let json = snapshot.to_json().expect("encode");
        assert!(matches!(
            SimSnapshot::from_json(&json),
            Err(StarlaneError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_file_round_trip_detects_format() {
        let dir = tempfile::tempdir().expect("tempdir");
        let snapshot = sample();
        for (name, format) in [("state.json", SnapshotFormat::Json), ("state.bin", SnapshotFormat::Binary)] {
            let path = dir.path().join(name);
            snapshot.save_to(&path, format).expect("save");
            let loaded = SimSnapshot::load_from(&path).expect("load");
            assert_eq!(loaded.npc_ships.len(), snapshot.npc_ships.len());
            assert!(!path.with_extension("tmp").exists());
        }
    }
}
