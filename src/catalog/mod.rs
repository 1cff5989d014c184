//! Property catalog: the static board definition for a game version.
//!
//! A `Catalog` is a cheap, copyable handle onto one of the compile-time
//! edition tables. It never changes for the lifetime of a game; switching
//! version builds a new catalog and an empty ledger around it.

pub mod editions;
pub mod property;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

pub use editions::{PROPERTY_COUNT, UK_PROPERTIES, US_PROPERTIES};
pub use property::{
    ColorGroup, Money, PropertyDef, PropertyKind, RentTable, ALL_COLOR_GROUPS, MAX_HOUSES,
    STATION_RENT, UTILITY_MULTIPLIER,
};

/// A selectable board edition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameVersion {
    /// London edition.
    #[default]
    Uk,
    /// Atlantic City edition.
    Us,
}

/// All versions in display order.
pub const ALL_VERSIONS: [GameVersion; 2] = [GameVersion::Uk, GameVersion::Us];

impl GameVersion {
    /// Returns the short wire name.
    pub const fn name(self) -> &'static str {
        match self {
            GameVersion::Uk => "uk",
            GameVersion::Us => "us",
        }
    }

    pub fn from_name(name: &str) -> Option<GameVersion> {
        ALL_VERSIONS.iter().copied().find(|v| v.name() == name)
    }

    fn table(self) -> &'static [PropertyDef] {
        match self {
            GameVersion::Uk => &UK_PROPERTIES,
            GameVersion::Us => &US_PROPERTIES,
        }
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameVersion {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameVersion::from_name(&s.to_ascii_lowercase())
            .ok_or_else(|| LedgerError::UnknownVersion(s.to_string()))
    }
}

/// Read-only view of the property definitions for one game version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Catalog {
    version: GameVersion,
    entries: &'static [PropertyDef],
}

impl Catalog {
    pub fn for_version(version: GameVersion) -> Self {
        Catalog {
            version,
            entries: version.table(),
        }
    }

    pub fn version(&self) -> GameVersion {
        self.version
    }

    /// Number of purchasable squares.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a definition by its stable id.
    pub fn definition_of(&self, id: &str) -> Result<&'static PropertyDef, LedgerError> {
        self.entries
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| LedgerError::UnknownProperty(id.to_string()))
    }

    /// All definitions ordered by board index.
    pub fn all_definitions(&self) -> &'static [PropertyDef] {
        self.entries
    }

    /// Streets belonging to `color`, in board order.
    pub fn color_group_members(
        &self,
        color: ColorGroup,
    ) -> impl Iterator<Item = &'static PropertyDef> {
        self.entries
            .iter()
            .filter(move |d| d.color_group() == Some(color))
    }

    pub fn stations(&self) -> impl Iterator<Item = &'static PropertyDef> {
        self.entries.iter().filter(|d| d.is_station())
    }

    pub fn utilities(&self) -> impl Iterator<Item = &'static PropertyDef> {
        self.entries.iter().filter(|d| d.is_utility())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::for_version(GameVersion::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_names_roundtrip() {
        for v in ALL_VERSIONS {
            assert_eq!(GameVersion::from_name(v.name()), Some(v));
            assert_eq!(v.name().parse::<GameVersion>().unwrap(), v);
        }
        assert_eq!("UK".parse::<GameVersion>().unwrap(), GameVersion::Uk);
        assert!(matches!(
            "mars".parse::<GameVersion>(),
            Err(LedgerError::UnknownVersion(_))
        ));
    }

    #[test]
    fn definition_lookup() {
        let catalog = Catalog::for_version(GameVersion::Uk);
        let def = catalog.definition_of("mayfair").unwrap();
        assert_eq!(def.name, "Mayfair");
        assert_eq!(def.purchase_cost, 400);
        assert_eq!(catalog.all_definitions()[def.board_index].id, "mayfair");
        assert!(matches!(
            catalog.definition_of("boardwalk"),
            Err(LedgerError::UnknownProperty(_))
        ));
    }

    #[test]
    fn all_definitions_are_in_board_order() {
        let catalog = Catalog::for_version(GameVersion::Us);
        let defs = catalog.all_definitions();
        assert_eq!(defs.len(), PROPERTY_COUNT);
        assert!(defs.windows(2).all(|w| w[0].board_index < w[1].board_index));
    }

    #[test]
    fn color_group_members() {
        let catalog = Catalog::for_version(GameVersion::Uk);
        let brown: Vec<_> = catalog
            .color_group_members(ColorGroup::Brown)
            .map(|d| d.id)
            .collect();
        assert_eq!(brown, vec!["old_kent_road", "whitechapel_road"]);
        assert_eq!(catalog.color_group_members(ColorGroup::Red).count(), 3);
        for color in ALL_COLOR_GROUPS {
            let n = catalog.color_group_members(color).count();
            assert!(n == 2 || n == 3, "{color:?} has {n} members");
        }
    }

    #[test]
    fn stations_and_utilities() {
        let catalog = Catalog::default();
        assert_eq!(catalog.stations().count(), 4);
        assert_eq!(catalog.utilities().count(), 2);
    }
}
