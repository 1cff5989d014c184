//! The ledger: authoritative run-time state of one game.
//!
//! Holdings are stored in a vector indexed by catalog `board_index`, so
//! each property has exactly one slot and therefore at most one owner.
//! Player cash lives on the players; the free parking pot is a plain
//! balance. Only the command processor mutates any of it.

use std::collections::BTreeMap;

use crate::catalog::{Catalog, GameVersion, Money, PropertyDef};
use crate::error::LedgerError;

use super::holding::Holding;
use super::player::{Player, PlayerId};
use super::transaction::{Transaction, TransactionLog};
use super::turn::TurnOrder;

/// Complete mutable state of a game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    pub(crate) catalog: Catalog,
    pub(crate) players: BTreeMap<PlayerId, Player>,
    pub(crate) holdings: Vec<Holding>,
    pub(crate) free_parking: Money,
    pub(crate) turns: TurnOrder,
    pub(crate) log: TransactionLog,
    pub(crate) next_player_id: u32,
}

impl Ledger {
    /// Creates an empty ledger for `version`: no players, everything for sale.
    pub fn new(version: GameVersion) -> Self {
        let catalog = Catalog::for_version(version);
        Ledger {
            catalog,
            players: BTreeMap::new(),
            holdings: vec![Holding::default(); catalog.len()],
            free_parking: 0,
            turns: TurnOrder::new(),
            log: TransactionLog::new(),
            next_player_id: 1,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn version(&self) -> GameVersion {
        self.catalog.version()
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, LedgerError> {
        self.players.get(&id).ok_or(LedgerError::UnknownPlayer(id))
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, LedgerError> {
        self.players.get_mut(&id).ok_or(LedgerError::UnknownPlayer(id))
    }

    /// Players in id order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.keys().copied()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Id the next created player will receive.
    pub fn next_player_id(&self) -> PlayerId {
        PlayerId(self.next_player_id)
    }

    /// Ownership record for a catalog entry.
    pub fn holding(&self, def: &PropertyDef) -> Holding {
        self.holdings
            .get(def.board_index)
            .copied()
            .unwrap_or_default()
    }

    pub(crate) fn holding_mut(&mut self, def: &PropertyDef) -> Option<&mut Holding> {
        self.holdings.get_mut(def.board_index)
    }

    /// Looks up a property by id together with its ownership record.
    pub fn property(&self, id: &str) -> Result<(&'static PropertyDef, Holding), LedgerError> {
        let def = self.catalog.definition_of(id)?;
        Ok((def, self.holding(def)))
    }

    pub fn owner_of(&self, def: &PropertyDef) -> Option<PlayerId> {
        self.holding(def).owner
    }

    /// Every property with its holding, in board order.
    pub fn holdings(&self) -> impl Iterator<Item = (&'static PropertyDef, &Holding)> + '_ {
        self.catalog.all_definitions().iter().zip(self.holdings.iter())
    }

    /// Properties owned by `player`, in board order.
    pub fn properties_of(
        &self,
        player: PlayerId,
    ) -> impl Iterator<Item = (&'static PropertyDef, &Holding)> + '_ {
        self.holdings().filter(move |(_, h)| h.is_owned_by(player))
    }

    /// Properties nobody owns, in board order.
    pub fn available(&self) -> impl Iterator<Item = &'static PropertyDef> + '_ {
        self.holdings()
            .filter(|(_, h)| h.owner.is_none())
            .map(|(def, _)| def)
    }

    pub fn free_parking(&self) -> Money {
        self.free_parking
    }

    pub fn turns(&self) -> &TurnOrder {
        &self.turns
    }

    /// The full transaction log, oldest first.
    pub fn transactions(&self) -> &[Transaction] {
        self.log.entries()
    }

    /// Total cash held by players plus the pot.
    pub fn money_in_play(&self) -> Money {
        self.players
            .values()
            .map(Player::cash)
            .fold(self.free_parking, Money::saturating_add)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Ledger::new(GameVersion::default())
    }
}
