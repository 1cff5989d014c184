//! Color-group and set ownership counts.

use crate::catalog::{ColorGroup, ALL_COLOR_GROUPS};
use crate::ledger::{Ledger, PlayerId};

/// Returns true if `player` owns every street in `color`.
pub fn owns_color_group(ledger: &Ledger, player: PlayerId, color: ColorGroup) -> bool {
    let mut members = ledger.catalog().color_group_members(color).peekable();
    if members.peek().is_none() {
        return false;
    }
    members.all(|def| ledger.owner_of(def) == Some(player))
}

/// Color groups `player` holds completely, in board order.
pub fn monopolies_of(ledger: &Ledger, player: PlayerId) -> Vec<ColorGroup> {
    ALL_COLOR_GROUPS
        .iter()
        .copied()
        .filter(|&color| owns_color_group(ledger, player, color))
        .collect()
}

/// Number of stations owned by `player`, mortgaged or not.
pub fn stations_owned(ledger: &Ledger, player: PlayerId) -> usize {
    ledger
        .catalog()
        .stations()
        .filter(|def| ledger.owner_of(def) == Some(player))
        .count()
}

/// Number of utilities owned by `player`, mortgaged or not.
pub fn utilities_owned(ledger: &Ledger, player: PlayerId) -> usize {
    ledger
        .catalog()
        .utilities()
        .filter(|def| ledger.owner_of(def) == Some(player))
        .count()
}
