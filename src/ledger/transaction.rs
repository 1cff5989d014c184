//! Append-only transaction log.
//!
//! One `Transaction` is appended per committed command (per committed leg
//! for composite commands). Entries are never edited or removed; only a
//! full game reset starts a fresh log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Money;
use super::party::Party;

/// What a transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionKind {
    /// Player joined and received starting cash.
    Join,
    /// Player left; remaining cash forfeited to the bank.
    Leave,
    Purchase,
    Mortgage,
    Unmortgage,
    Build,
    SellBuilding,
    SellProperty,
    PropertyTransfer,
    Rent,
    Fine,
    /// Free parking pot paid out to a player.
    FreeParking,
    BankPayment,
    /// Direct player-to-player payment.
    Payment,
    PassGo,
    PayAll,
    ReceiveAll,
    BulkCashTransfer,
    BulkPropertyTransfer,
    CashOut,
}

/// An immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub kind: TransactionKind,
    pub from: Party,
    pub to: Party,
    pub amount: Money,
    /// Property involved, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    pub description: String,
}

/// Fields of a transaction before the log stamps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub kind: TransactionKind,
    pub from: Party,
    pub to: Party,
    pub amount: Money,
    pub property: Option<&'static str>,
    pub description: String,
}

/// Ordered log with monotonic ids starting at 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionLog {
    entries: Vec<Transaction>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a log from persisted entries. Ids must strictly increase.
    pub(crate) fn from_entries(entries: Vec<Transaction>) -> Option<Self> {
        if entries.windows(2).any(|w| w[0].id >= w[1].id) {
            return None;
        }
        Some(TransactionLog { entries })
    }

    /// Stamps and appends an entry, returning the stored transaction.
    pub(crate) fn append(&mut self, entry: Entry) -> &Transaction {
        let id = self.entries.last().map_or(1, |t| t.id + 1);
        self.entries.push(Transaction {
            id,
            timestamp: Utc::now(),
            kind: entry.kind,
            from: entry.from,
            to: entry.to,
            amount: entry.amount,
            property: entry.property.map(str::to_string),
            description: entry.description,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
