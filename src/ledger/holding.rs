//! Per-property ownership record.

use serde::{Deserialize, Serialize};

use crate::catalog::MAX_HOUSES;
use super::player::PlayerId;

/// Improvement level of a street carrying a hotel.
pub const HOTEL_LEVEL: u8 = MAX_HOUSES + 1;

/// Ownership and development state of one catalog entry.
///
/// A default holding is unowned, unmortgaged and bare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub owner: Option<PlayerId>,
    pub is_mortgaged: bool,
    pub houses: u8,
    pub has_hotel: bool,
}

impl Holding {
    /// Returns a fresh holding owned by `owner`.
    pub fn owned_by(owner: PlayerId) -> Self {
        Holding {
            owner: Some(owner),
            ..Holding::default()
        }
    }

    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }

    pub fn has_buildings(&self) -> bool {
        self.houses > 0 || self.has_hotel
    }

    /// Development level: house count, or `HOTEL_LEVEL` with a hotel.
    pub fn level(&self) -> u8 {
        if self.has_hotel {
            HOTEL_LEVEL
        } else {
            self.houses
        }
    }

    /// Sets the development level, converting `HOTEL_LEVEL` into a hotel.
    pub(crate) fn set_level(&mut self, level: u8) {
        if level >= HOTEL_LEVEL {
            self.houses = 0;
            self.has_hotel = true;
        } else {
            self.houses = level;
            self.has_hotel = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unowned_and_bare() {
        let h = Holding::default();
        assert_eq!(h.owner, None);
        assert!(!h.has_buildings());
        assert_eq!(h.level(), 0);
    }

    #[test]
    fn hotel_is_level_five_with_no_houses() {
        let mut h = Holding::owned_by(PlayerId(1));
        h.set_level(4);
        assert_eq!((h.houses, h.has_hotel), (4, false));
        h.set_level(HOTEL_LEVEL);
        assert_eq!((h.houses, h.has_hotel), (0, true));
        assert_eq!(h.level(), 5);
        h.set_level(4);
        assert_eq!((h.houses, h.has_hotel), (4, false));
    }
}
