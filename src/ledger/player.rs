//! Player identity and cash balance.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::Money;
use crate::error::LedgerError;

/// Identifier assigned to a player on creation. Never reused until reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A player's identity and cash. Property ownership lives on the holdings.
///
/// Cash is private: only the command processor adjusts it, through
/// `credit` and `debit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    id: PlayerId,
    name: String,
    cash: Money,
}

impl Player {
    pub(crate) fn new(id: PlayerId, name: String, cash: Money) -> Self {
        Player { id, name, cash }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cash(&self) -> Money {
        self.cash
    }

    /// Fails with `InsufficientFunds` if the player cannot pay `amount`.
    pub fn ensure_can_pay(&self, amount: Money) -> Result<(), LedgerError> {
        if self.cash < amount {
            return Err(LedgerError::InsufficientFunds {
                player: self.id,
                needed: amount,
                available: self.cash,
            });
        }
        Ok(())
    }

    /// Fails if crediting `amount` would overflow the balance.
    pub fn ensure_can_receive(&self, amount: Money) -> Result<(), LedgerError> {
        self.cash
            .checked_add(amount)
            .map(|_| ())
            .ok_or(LedgerError::Overflow(amount))
    }

    pub(crate) fn credit(&mut self, amount: Money) {
        self.cash = self.cash.saturating_add(amount);
    }

    pub(crate) fn debit(&mut self, amount: Money) {
        self.cash = self.cash.saturating_sub(amount);
    }
}
