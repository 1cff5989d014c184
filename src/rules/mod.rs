//! Rules engine: derived facts about a ledger.
//!
//! Everything here is a pure function of a `&Ledger` and its catalog. The
//! command processor calls into these to validate intents; nothing in this
//! module mutates state.

pub mod build;
pub mod monopoly;
pub mod rent;

pub use build::{check_build, check_group_bare, check_sell_building, BuildStep, Building, SaleStep};
pub use monopoly::{monopolies_of, owns_color_group, stations_owned, utilities_owned};
pub use rent::{quote, rent_due, validate_dice, RentQuote, DICE_RANGE};
