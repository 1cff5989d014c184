//! Ledger invariants - consistency checks that detect bugs and corrupt
//! snapshots.
//!
//! The command processor is written so that none of these can trigger. They
//! run after every commit in debug builds and on every snapshot restore.

use std::collections::BTreeSet;

use crate::catalog::{ALL_COLOR_GROUPS, MAX_HOUSES};

use super::state::Ledger;

/// A broken ledger invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Checks every ledger invariant, returning all violations found.
pub fn check_invariants(ledger: &Ledger) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut fail = |message: String| violations.push(InvariantViolation { message });

    if ledger.holdings.len() != ledger.catalog.len() {
        fail(format!(
            "{} holdings for a catalog of {}",
            ledger.holdings.len(),
            ledger.catalog.len()
        ));
    }

    for (def, holding) in ledger.holdings() {
        if let Some(owner) = holding.owner {
            if !ledger.players.contains_key(&owner) {
                fail(format!("{} owned by missing player {owner}", def.id));
            }
        } else if holding.is_mortgaged || holding.has_buildings() {
            fail(format!("unowned {} carries mortgage or buildings", def.id));
        }
        if holding.has_hotel && holding.houses != 0 {
            fail(format!("{} has a hotel and {} houses", def.id, holding.houses));
        }
        if holding.houses > MAX_HOUSES {
            fail(format!("{} has {} houses", def.id, holding.houses));
        }
        if holding.has_buildings() && !def.is_street() {
            fail(format!("{} is not a street but has buildings", def.id));
        }
        if holding.has_buildings() && holding.is_mortgaged {
            fail(format!("{} is mortgaged with buildings", def.id));
        }
    }

    for color in ALL_COLOR_GROUPS {
        let members: Vec<_> = ledger
            .catalog
            .color_group_members(color)
            .map(|def| ledger.holding(def))
            .collect();
        if !members.iter().any(|h| h.has_buildings()) {
            continue;
        }
        let owner = members[0].owner;
        if owner.is_none() || members.iter().any(|h| h.owner != owner) {
            fail(format!("{} group has buildings without a single owner", color.name()));
        }
        let levels = members.iter().map(|h| h.level());
        let (min, max) = levels.fold((u8::MAX, 0), |(lo, hi), l| (lo.min(l), hi.max(l)));
        if max - min > 1 {
            fail(format!("{} group levels range from {min} to {max}", color.name()));
        }
    }

    for (key, player) in &ledger.players {
        if *key != player.id() {
            fail(format!("player {} stored under id {key}", player.id()));
        }
        if player.id().0 >= ledger.next_player_id {
            fail(format!(
                "player {} not below next id {}",
                player.id(),
                ledger.next_player_id
            ));
        }
    }

    let turns = &ledger.turns;
    let distinct: BTreeSet<_> = turns.order().iter().collect();
    if distinct.len() != turns.len() || !turns.is_permutation_of(ledger.player_ids()) {
        fail(format!(
            "turn order {:?} is not a permutation of the players",
            turns.order()
        ));
    }
    if !turns.is_empty() && turns.current_index() >= turns.len() {
        fail(format!(
            "current turn index {} out of range for {} players",
            turns.current_index(),
            turns.len()
        ));
    }

    violations
}

/// Panics with every violation listed if any invariant is broken.
///
/// Only active in debug builds.
#[cfg(debug_assertions)]
pub fn assert_invariants(ledger: &Ledger) {
    let violations = check_invariants(ledger);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("ledger invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_ledger: &Ledger) {}
