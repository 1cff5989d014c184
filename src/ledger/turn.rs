//! Turn sequencing.
//!
//! Keeps the seating order and whose turn it is. The order is always a
//! permutation of the current player ids; the ledger keeps it in step with
//! player creation and removal.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::LedgerError;
use super::player::PlayerId;

/// Player order and the index of the player whose turn it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TurnOrder {
    order: Vec<PlayerId>,
    current: usize,
}

impl TurnOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a turn order from persisted parts, clamping the index.
    pub(crate) fn from_parts(order: Vec<PlayerId>, current: usize) -> Self {
        let current = current.min(order.len().saturating_sub(1));
        TurnOrder { order, current }
    }

    pub fn order(&self) -> &[PlayerId] {
        &self.order
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The player whose turn it is, if anyone is playing.
    pub fn current(&self) -> Option<PlayerId> {
        self.order.get(self.current).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Moves to the next player, wrapping. No-op with no players.
    pub fn advance(&mut self) -> Option<PlayerId> {
        if self.order.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.order.len();
        self.current()
    }

    /// Appends a newly created player.
    pub(crate) fn push(&mut self, id: PlayerId) {
        self.order.push(id);
    }

    /// Drops a player and clamps the current index back into range.
    ///
    /// If the removed player sat before the current one, the index shifts so
    /// the same player keeps the turn.
    pub(crate) fn remove(&mut self, id: PlayerId) {
        let Some(pos) = self.order.iter().position(|&p| p == id) else {
            return;
        };
        self.order.remove(pos);
        if pos < self.current {
            self.current -= 1;
        }
        self.current = self.current.min(self.order.len().saturating_sub(1));
    }

    /// Replaces the order wholesale. `new_order` must be a permutation of the
    /// current order. The current index is kept.
    pub(crate) fn reorder(&mut self, new_order: Vec<PlayerId>) -> Result<(), LedgerError> {
        if new_order.len() != self.order.len() {
            return Err(LedgerError::InvalidTurnOrder(format!(
                "expected {} players, got {}",
                self.order.len(),
                new_order.len()
            )));
        }
        let existing: BTreeSet<PlayerId> = self.order.iter().copied().collect();
        let mut seen = BTreeSet::new();
        for id in &new_order {
            if !existing.contains(id) {
                return Err(LedgerError::InvalidTurnOrder(format!("unknown player {id}")));
            }
            if !seen.insert(*id) {
                return Err(LedgerError::InvalidTurnOrder(format!("player {id} listed twice")));
            }
        }
        self.order = new_order;
        Ok(())
    }

    /// Returns true if the order holds exactly the ids in `players`.
    pub fn is_permutation_of(&self, players: impl IntoIterator<Item = PlayerId>) -> bool {
        let mut expected: Vec<PlayerId> = players.into_iter().collect();
        let mut actual = self.order.clone();
        expected.sort_unstable();
        actual.sort_unstable();
        expected == actual
    }
}
