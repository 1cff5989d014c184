//! Error types for ledger commands.
//!
//! `LedgerError` is the precise, typed reason a command was rejected.
//! `ErrorKind` collapses it into the small taxonomy the presentation layer
//! switches on; the human-readable message comes from `Display`.

use serde::Serialize;
use thiserror::Error;

use crate::catalog::Money;
use crate::ledger::{PlayerId, Transaction};

/// Coarse classification of a rejected command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    NotFound,
    AlreadyOwned,
    NotOwner,
    InsufficientFunds,
    MustSellBuildingsFirst,
    InvalidBuildOrder,
    DiceRequired,
    InvalidTurnOrder,
    VersionLockedWithActivePlayers,
    InvalidAmount,
    InvalidState,
    InvalidTransfer,
    InvalidName,
    PlayerLimit,
}

/// Reasons a ledger command can be rejected.
///
/// Every variant is produced before any mutation takes place, so a command
/// that returns one of these has left the ledger untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("unknown property '{0}'")]
    UnknownProperty(String),

    #[error("unknown game version '{0}'")]
    UnknownVersion(String),

    #[error("{0} is already owned")]
    AlreadyOwned(&'static str),

    #[error("player {player} does not own {property}")]
    NotOwner {
        player: PlayerId,
        property: &'static str,
    },

    #[error("insufficient funds: player {player} has {available}, needs {needed}")]
    InsufficientFunds {
        player: PlayerId,
        needed: Money,
        available: Money,
    },

    #[error("must sell all houses and hotels on {0} first")]
    MustSellBuildingsFirst(&'static str),

    #[error("must sell the buildings on the {group} group before trading {property}")]
    GroupHasBuildings {
        property: &'static str,
        group: &'static str,
    },

    #[error("uneven build on {property}: {reason}")]
    InvalidBuildOrder {
        property: &'static str,
        reason: &'static str,
    },

    #[error("a dice total is required to charge rent on {0}")]
    DiceRequired(&'static str),

    #[error("dice total {0} is outside 2..=12")]
    InvalidDice(u32),

    #[error("invalid turn order: {0}")]
    InvalidTurnOrder(String),

    #[error("the game version cannot change while players exist")]
    VersionLockedWithActivePlayers,

    #[error("invalid amount {0}: must be a positive whole number")]
    InvalidAmount(i64),

    #[error("balance overflow crediting {0}")]
    Overflow(Money),

    #[error("{0} is already mortgaged")]
    AlreadyMortgaged(&'static str),

    #[error("{0} is not mortgaged")]
    NotMortgaged(&'static str),

    #[error("cannot build on {property}: {reason}")]
    CannotBuild {
        property: &'static str,
        reason: &'static str,
    },

    #[error("{0} has no buildings to sell")]
    NoBuildings(&'static str),

    #[error("invalid transfer: {0}")]
    InvalidTransfer(String),

    #[error("player name must not be empty")]
    EmptyName,

    #[error("at most {0} players are allowed")]
    TooManyPlayers(usize),
}

impl LedgerError {
    /// Maps this error to its coarse kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::UnknownPlayer(_)
            | LedgerError::UnknownProperty(_)
            | LedgerError::UnknownVersion(_) => ErrorKind::NotFound,
            LedgerError::AlreadyOwned(_) => ErrorKind::AlreadyOwned,
            LedgerError::NotOwner { .. } => ErrorKind::NotOwner,
            LedgerError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            LedgerError::MustSellBuildingsFirst(_) | LedgerError::GroupHasBuildings { .. } => {
                ErrorKind::MustSellBuildingsFirst
            }
            LedgerError::InvalidBuildOrder { .. } => ErrorKind::InvalidBuildOrder,
            LedgerError::DiceRequired(_) => ErrorKind::DiceRequired,
            LedgerError::InvalidTurnOrder(_) => ErrorKind::InvalidTurnOrder,
            LedgerError::VersionLockedWithActivePlayers => {
                ErrorKind::VersionLockedWithActivePlayers
            }
            LedgerError::InvalidAmount(_)
            | LedgerError::InvalidDice(_)
            | LedgerError::Overflow(_) => ErrorKind::InvalidAmount,
            LedgerError::AlreadyMortgaged(_)
            | LedgerError::NotMortgaged(_)
            | LedgerError::CannotBuild { .. }
            | LedgerError::NoBuildings(_) => ErrorKind::InvalidState,
            LedgerError::InvalidTransfer(_) => ErrorKind::InvalidTransfer,
            LedgerError::EmptyName => ErrorKind::InvalidName,
            LedgerError::TooManyPlayers(_) => ErrorKind::PlayerLimit,
        }
    }
}

/// A composite command stopped partway through.
///
/// Legs in `committed` were applied and stay applied; `error` is the reason
/// the next leg was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{error} ({} earlier step(s) remain committed)", .committed.len())]
pub struct CompositeFailure {
    pub committed: Vec<Transaction>,
    #[source]
    pub error: LedgerError,
}

impl CompositeFailure {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

impl From<LedgerError> for CompositeFailure {
    fn from(error: LedgerError) -> Self {
        CompositeFailure {
            committed: Vec::new(),
            error,
        }
    }
}

/// Converts a caller-supplied amount into ledger money, rejecting zero and
/// negative values.
pub fn positive_amount(amount: i64) -> Result<Money, LedgerError> {
    if amount <= 0 {
        return Err(LedgerError::InvalidAmount(amount));
    }
    Money::try_from(amount).map_err(|_| LedgerError::InvalidAmount(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(LedgerError::UnknownPlayer(PlayerId(3)).kind(), ErrorKind::NotFound);
        assert_eq!(LedgerError::UnknownProperty("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(LedgerError::InvalidDice(13).kind(), ErrorKind::InvalidAmount);
        assert_eq!(LedgerError::NoBuildings("Strand").kind(), ErrorKind::InvalidState);
        assert_eq!(
            LedgerError::VersionLockedWithActivePlayers.kind(),
            ErrorKind::VersionLockedWithActivePlayers
        );
    }

    #[test]
    fn messages_are_readable() {
        let err = LedgerError::InsufficientFunds {
            player: PlayerId(2),
            needed: 60,
            available: 10,
        };
        assert_eq!(err.to_string(), "insufficient funds: player 2 has 10, needs 60");
    }

    #[test]
    fn positive_amount_rejects_non_positive() {
        assert_eq!(positive_amount(50), Ok(50));
        assert_eq!(positive_amount(0), Err(LedgerError::InvalidAmount(0)));
        assert_eq!(positive_amount(-5), Err(LedgerError::InvalidAmount(-5)));
    }

    #[test]
    fn composite_failure_reports_committed_legs() {
        let failure = CompositeFailure::from(LedgerError::EmptyName);
        assert!(failure.committed.is_empty());
        assert_eq!(failure.kind(), ErrorKind::InvalidName);
        assert!(failure.to_string().contains("0 earlier step(s)"));
    }
}
