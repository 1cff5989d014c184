//! Structured views of the ledger for queries and persistence.
//!
//! `StateView` answers the `state` query. `GameSnapshot` is the full
//! persisted layout (state plus transaction log and id counters) and can be
//! restored into a `Ledger` after validation. Snapshots are stored as
//! pretty-printed JSON files.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, ColorGroup, GameVersion, Money, ALL_VERSIONS};
use crate::error::LedgerError;
use crate::rules::monopolies_of;

use super::holding::Holding;
use super::invariants::{check_invariants, InvariantViolation};
use super::player::{Player, PlayerId};
use super::state::Ledger;
use super::transaction::{Transaction, TransactionLog};
use super::turn::TurnOrder;

/// A player's owned property and its development state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingRecord {
    pub property_id: String,
    #[serde(default)]
    pub houses: u8,
    #[serde(default)]
    pub has_hotel: bool,
    #[serde(default)]
    pub is_mortgaged: bool,
}

/// A player with cash and holdings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    pub cash: Money,
    #[serde(default)]
    pub properties: Vec<HoldingRecord>,
}

/// A player as shown by the `state` query, with the color groups they
/// hold outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    #[serde(flatten)]
    pub record: PlayerRecord,
    pub monopolies: Vec<ColorGroup>,
}

/// Answer to the `state` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateView {
    pub version: GameVersion,
    pub versions: Vec<GameVersion>,
    pub players: Vec<PlayerView>,
    pub free_parking_pot: Money,
    pub available_properties: Vec<String>,
    pub turn_order: Vec<PlayerId>,
    pub current_turn_index: usize,
    pub current_player: Option<PlayerId>,
}

/// Persisted game layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub version: GameVersion,
    pub players: Vec<PlayerRecord>,
    pub free_parking_pot: Money,
    pub available_properties: Vec<String>,
    pub turn_order: Vec<PlayerId>,
    #[serde(default)]
    pub current_turn_index: usize,
    pub next_player_id: u32,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// Reasons a snapshot cannot be restored.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("property '{0}' is owned more than once")]
    DuplicateOwnership(String),

    #[error("property '{0}' is both owned and available")]
    OwnedAndAvailable(String),

    #[error("property '{0}' is neither owned nor available")]
    Unaccounted(String),

    #[error("player {0} appears more than once")]
    DuplicatePlayer(PlayerId),

    #[error("transaction ids are not strictly increasing")]
    UnorderedTransactions,

    #[error("current turn index {index} out of range for {len} players")]
    TurnIndexOutOfRange { index: usize, len: usize },

    #[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Invariants(Vec<InvariantViolation>),
}

/// Reasons a snapshot file cannot be written or read back.
#[derive(Debug, Error)]
pub enum SnapshotFileError {
    #[error("failed to read snapshot at {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write snapshot to {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode snapshot at {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("invalid snapshot at {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: SnapshotError,
    },
}

impl SnapshotFileError {
    /// Failure class reported to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            SnapshotFileError::Read { .. } | SnapshotFileError::Write { .. } => "Io",
            SnapshotFileError::Encode(_) => "Serialization",
            SnapshotFileError::Decode { .. } | SnapshotFileError::Invalid { .. } => "Snapshot",
        }
    }
}

impl GameSnapshot {
    /// Reads and decodes a snapshot file. The result is not yet validated.
    pub fn read_from(path: &Path) -> Result<Self, SnapshotFileError> {
        let content = std::fs::read_to_string(path).map_err(|source| SnapshotFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SnapshotFileError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the snapshot as pretty-printed JSON.
    pub fn write_to(&self, path: &Path) -> Result<(), SnapshotFileError> {
        let encoded = serde_json::to_string_pretty(self).map_err(SnapshotFileError::Encode)?;
        std::fs::write(path, encoded).map_err(|source| SnapshotFileError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Ledger {
    fn player_records(&self) -> Vec<PlayerRecord> {
        self.players()
            .map(|p| PlayerRecord {
                id: p.id(),
                name: p.name().to_string(),
                cash: p.cash(),
                properties: self
                    .properties_of(p.id())
                    .map(|(def, h)| HoldingRecord {
                        property_id: def.id.to_string(),
                        houses: h.houses,
                        has_hotel: h.has_hotel,
                        is_mortgaged: h.is_mortgaged,
                    })
                    .collect(),
            })
            .collect()
    }

    fn available_ids(&self) -> Vec<String> {
        self.available().map(|d| d.id.to_string()).collect()
    }

    /// Builds the answer to the `state` query.
    pub fn state_view(&self) -> StateView {
        StateView {
            version: self.version(),
            versions: ALL_VERSIONS.to_vec(),
            players: self
                .player_records()
                .into_iter()
                .map(|record| PlayerView {
                    monopolies: monopolies_of(self, record.id),
                    record,
                })
                .collect(),
            free_parking_pot: self.free_parking,
            available_properties: self.available_ids(),
            turn_order: self.turns.order().to_vec(),
            current_turn_index: self.turns.current_index(),
            current_player: self.turns.current(),
        }
    }

    /// Captures the full persisted layout.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            version: self.version(),
            players: self.player_records(),
            free_parking_pot: self.free_parking,
            available_properties: self.available_ids(),
            turn_order: self.turns.order().to_vec(),
            current_turn_index: self.turns.current_index(),
            next_player_id: self.next_player_id,
            transactions: self.log.entries().to_vec(),
        }
    }

    /// Restores a ledger from a snapshot, rejecting anything inconsistent.
    pub fn from_snapshot(snapshot: GameSnapshot) -> Result<Ledger, SnapshotError> {
        let catalog = Catalog::for_version(snapshot.version);
        let mut holdings = vec![Holding::default(); catalog.len()];
        let mut owned = vec![false; catalog.len()];
        let mut players = std::collections::BTreeMap::new();

        for record in &snapshot.players {
            if players.contains_key(&record.id) {
                return Err(SnapshotError::DuplicatePlayer(record.id));
            }
            for h in &record.properties {
                let def = catalog.definition_of(&h.property_id)?;
                if owned[def.board_index] {
                    return Err(SnapshotError::DuplicateOwnership(h.property_id.clone()));
                }
                owned[def.board_index] = true;
                holdings[def.board_index] = Holding {
                    owner: Some(record.id),
                    is_mortgaged: h.is_mortgaged,
                    houses: h.houses,
                    has_hotel: h.has_hotel,
                };
            }
            players.insert(
                record.id,
                Player::new(record.id, record.name.clone(), record.cash),
            );
        }

        let mut available = BTreeSet::new();
        for id in &snapshot.available_properties {
            let def = catalog.definition_of(id)?;
            if owned[def.board_index] {
                return Err(SnapshotError::OwnedAndAvailable(id.clone()));
            }
            available.insert(def.board_index);
        }
        if let Some(def) = catalog
            .all_definitions()
            .iter()
            .find(|d| !owned[d.board_index] && !available.contains(&d.board_index))
        {
            return Err(SnapshotError::Unaccounted(def.id.to_string()));
        }

        let len = snapshot.turn_order.len();
        if len > 0 && snapshot.current_turn_index >= len {
            return Err(SnapshotError::TurnIndexOutOfRange {
                index: snapshot.current_turn_index,
                len,
            });
        }

        let log = TransactionLog::from_entries(snapshot.transactions)
            .ok_or(SnapshotError::UnorderedTransactions)?;

        let ledger = Ledger {
            catalog,
            players,
            holdings,
            free_parking: snapshot.free_parking_pot,
            turns: TurnOrder::from_parts(snapshot.turn_order, snapshot.current_turn_index),
            log,
            next_player_id: snapshot.next_player_id,
        };

        let violations = check_invariants(&ledger);
        if !violations.is_empty() {
            return Err(SnapshotError::Invariants(violations));
        }
        Ok(ledger)
    }
}
