//! Rent computation.

use serde::Serialize;

use crate::catalog::{Money, PropertyDef, PropertyKind, STATION_RENT, UTILITY_MULTIPLIER};
use crate::error::LedgerError;
use crate::ledger::{Ledger, PlayerId};

use super::monopoly::{owns_color_group, stations_owned, utilities_owned};

/// Lowest and highest total two six-sided dice can show.
pub const DICE_RANGE: std::ops::RangeInclusive<u32> = 2..=12;

/// Rent owed on a property right now, with the facts that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RentQuote {
    pub property_id: String,
    pub owner: Option<PlayerId>,
    pub amount: Money,
    pub is_mortgaged: bool,
    /// True when a street's base rent was doubled for a full color group.
    pub monopoly_doubled: bool,
}

/// Checks a caller-supplied dice total.
pub fn validate_dice(total: u32) -> Result<u32, LedgerError> {
    if DICE_RANGE.contains(&total) {
        Ok(total)
    } else {
        Err(LedgerError::InvalidDice(total))
    }
}

/// Computes the rent a visitor owes on `def`.
///
/// Unowned and mortgaged properties cost nothing. Stations charge by the
/// owner's station count, utilities multiply the dice total by 4 or 10, and
/// streets read their rent table, doubling an unimproved street's base rent
/// when the owner holds the whole color group.
pub fn rent_due(
    ledger: &Ledger,
    def: &PropertyDef,
    dice: Option<u32>,
) -> Result<Money, LedgerError> {
    quote(ledger, def, dice).map(|q| q.amount)
}

/// Like `rent_due`, but reports the owner and whether doubling applied.
pub fn quote(
    ledger: &Ledger,
    def: &PropertyDef,
    dice: Option<u32>,
) -> Result<RentQuote, LedgerError> {
    let holding = ledger.holding(def);
    let mut quote = RentQuote {
        property_id: def.id.to_string(),
        owner: holding.owner,
        amount: 0,
        is_mortgaged: holding.is_mortgaged,
        monopoly_doubled: false,
    };
    let Some(owner) = holding.owner else {
        return Ok(quote);
    };
    if holding.is_mortgaged {
        return Ok(quote);
    }

    quote.amount = match def.kind {
        PropertyKind::Station => {
            let count = stations_owned(ledger, owner).clamp(1, STATION_RENT.len());
            STATION_RENT[count - 1]
        }
        PropertyKind::Utility => {
            let total = validate_dice(dice.ok_or(LedgerError::DiceRequired(def.name))?)?;
            let count = utilities_owned(ledger, owner).clamp(1, UTILITY_MULTIPLIER.len());
            UTILITY_MULTIPLIER[count - 1] * Money::from(total)
        }
        PropertyKind::Street { color, rent, .. } => {
            if holding.has_hotel {
                rent.hotel
            } else if holding.houses > 0 {
                rent.with_houses(holding.houses)
            } else if owns_color_group(ledger, owner, color) {
                quote.monopoly_doubled = true;
                rent.base * 2
            } else {
                rent.base
            }
        }
    };
    Ok(quote)
}
