//! Ledger entities: players, holdings, transfer endpoints, the transaction
//! log, turn order and the `Ledger` that ties them together.

pub mod holding;
pub mod invariants;
pub mod party;
pub mod player;
pub mod snapshot;
pub mod state;
pub mod transaction;
pub mod turn;

pub use holding::{Holding, HOTEL_LEVEL};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use party::Party;
pub use player::{Player, PlayerId};
pub use snapshot::{
    GameSnapshot, HoldingRecord, PlayerRecord, PlayerView, SnapshotError, SnapshotFileError,
    StateView,
};
pub use state::Ledger;
pub use transaction::{Entry, Transaction, TransactionKind, TransactionLog};
pub use turn::TurnOrder;
