//! Building legality: monopoly requirement and the even-build rule.
//!
//! A street's improvement level is its house count, or `HOTEL_LEVEL` with a
//! hotel. Across a color group, levels may never differ by more than one:
//! building raises a street to at most the group minimum plus one, and
//! selling lowers it to at least the group maximum minus one.

use serde::Serialize;

use crate::catalog::{Money, PropertyDef, PropertyKind};
use crate::error::LedgerError;
use crate::ledger::{Ledger, PlayerId, HOTEL_LEVEL};

use super::monopoly::owns_color_group;

/// A single building unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Building {
    House,
    Hotel,
}

/// A validated build: what goes up, at what price, and the resulting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildStep {
    pub building: Building,
    pub cost: Money,
    pub new_level: u8,
}

/// A validated building sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleStep {
    pub building: Building,
    pub refund: Money,
    pub new_level: u8,
}

fn ensure_owner(ledger: &Ledger, player: PlayerId, def: &PropertyDef) -> Result<(), LedgerError> {
    if ledger.holding(def).is_owned_by(player) {
        Ok(())
    } else {
        Err(LedgerError::NotOwner {
            player,
            property: def.name,
        })
    }
}

/// Improvement levels of every street in `def`'s color group except `def`.
fn other_levels<'a>(ledger: &'a Ledger, def: &'a PropertyDef) -> impl Iterator<Item = u8> + 'a {
    def.color_group()
        .into_iter()
        .flat_map(|color| ledger.catalog().color_group_members(color))
        .filter(move |member| member.id != def.id)
        .map(move |member| ledger.holding(member).level())
}

/// Rejects trading `def` while any street in its color group carries
/// buildings. Buildings may only stand on a group held by one owner.
pub fn check_group_bare(ledger: &Ledger, def: &PropertyDef) -> Result<(), LedgerError> {
    let Some(color) = def.color_group() else {
        return Ok(());
    };
    let built = ledger
        .catalog()
        .color_group_members(color)
        .any(|member| ledger.holding(member).has_buildings());
    if built {
        return Err(LedgerError::GroupHasBuildings {
            property: def.name,
            group: color.name(),
        });
    }
    Ok(())
}

/// Validates adding one building to `def` for `player`.
///
/// Affordability is left to the caller; this only checks the board.
pub fn check_build(
    ledger: &Ledger,
    player: PlayerId,
    def: &PropertyDef,
) -> Result<BuildStep, LedgerError> {
    ensure_owner(ledger, player, def)?;
    let PropertyKind::Street {
        color, house_cost, ..
    } = def.kind
    else {
        return Err(LedgerError::CannotBuild {
            property: def.name,
            reason: "only streets can carry buildings",
        });
    };
    let holding = ledger.holding(def);
    if holding.is_mortgaged {
        return Err(LedgerError::CannotBuild {
            property: def.name,
            reason: "it is mortgaged",
        });
    }
    if !owns_color_group(ledger, player, color) {
        return Err(LedgerError::CannotBuild {
            property: def.name,
            reason: "the owner does not hold the whole color group",
        });
    }
    if holding.has_hotel {
        return Err(LedgerError::CannotBuild {
            property: def.name,
            reason: "it already has a hotel",
        });
    }

    let new_level = holding.level() + 1;
    let group_min = other_levels(ledger, def).chain([holding.level()]).min().unwrap_or(0);
    if new_level > group_min + 1 {
        return Err(LedgerError::InvalidBuildOrder {
            property: def.name,
            reason: "another street in the group has fewer buildings",
        });
    }

    let building = if new_level == HOTEL_LEVEL {
        Building::Hotel
    } else {
        Building::House
    };
    Ok(BuildStep {
        building,
        cost: house_cost,
        new_level,
    })
}

/// Validates selling one building from `def` back to the bank.
///
/// A hotel sells back down to four houses. The refund is half the house
/// cost, rounded down.
pub fn check_sell_building(
    ledger: &Ledger,
    player: PlayerId,
    def: &PropertyDef,
) -> Result<SaleStep, LedgerError> {
    ensure_owner(ledger, player, def)?;
    let holding = ledger.holding(def);
    let house_cost = match def.house_cost() {
        Some(cost) if holding.has_buildings() => cost,
        _ => return Err(LedgerError::NoBuildings(def.name)),
    };

    let new_level = holding.level() - 1;
    let group_max = other_levels(ledger, def).max().unwrap_or(0);
    if new_level + 1 < group_max {
        return Err(LedgerError::InvalidBuildOrder {
            property: def.name,
            reason: "another street in the group has more buildings",
        });
    }

    let building = if holding.has_hotel {
        Building::Hotel
    } else {
        Building::House
    };
    Ok(SaleStep {
        building,
        refund: house_cost / 2,
        new_level,
    })
}
