//! Banker library.
//!
//! Exposes the property catalog, ledger entities, rules engine, command
//! processor and line protocol for use by integration tests and the binary
//! entry point.

pub mod banker;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ledger;
pub mod protocol;
pub mod rules;
pub mod session;

pub use banker::Banker;
pub use config::{BankerConfig, CompositePolicy};
pub use error::{CompositeFailure, ErrorKind, LedgerError};
