//! Property definitions: the immutable reference data for one board square.
//!
//! A `PropertyDef` describes a purchasable square. Streets carry a color
//! group, a house cost and a six-entry rent table; stations and utilities
//! derive their rent from how many of their kind the owner holds.

use serde::{Deserialize, Serialize};

/// Whole-currency amount. Cash can never go negative, so it is unsigned.
pub type Money = u64;

/// Maximum number of houses on a street before it can take a hotel.
pub const MAX_HOUSES: u8 = 4;

/// Station rent indexed by number of stations held by the owner, minus one.
pub const STATION_RENT: [Money; 4] = [25, 50, 100, 200];

/// Utility dice multiplier indexed by number of utilities held, minus one.
pub const UTILITY_MULTIPLIER: [Money; 2] = [4, 10];

/// A color group of streets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorGroup {
    Brown,
    LightBlue,
    Pink,
    Orange,
    Red,
    Yellow,
    Green,
    DarkBlue,
}

/// All color groups in board order.
pub const ALL_COLOR_GROUPS: [ColorGroup; 8] = [
    ColorGroup::Brown,
    ColorGroup::LightBlue,
    ColorGroup::Pink,
    ColorGroup::Orange,
    ColorGroup::Red,
    ColorGroup::Yellow,
    ColorGroup::Green,
    ColorGroup::DarkBlue,
];

impl ColorGroup {
    /// Returns the snake_case name used on the wire.
    pub const fn name(self) -> &'static str {
        match self {
            ColorGroup::Brown => "brown",
            ColorGroup::LightBlue => "light_blue",
            ColorGroup::Pink => "pink",
            ColorGroup::Orange => "orange",
            ColorGroup::Red => "red",
            ColorGroup::Yellow => "yellow",
            ColorGroup::Green => "green",
            ColorGroup::DarkBlue => "dark_blue",
        }
    }
}

/// Rent for a street at each improvement level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RentTable {
    /// Unimproved rent (before any monopoly doubling).
    pub base: Money,
    /// Rent with one to four houses.
    pub houses: [Money; 4],
    pub hotel: Money,
}

impl RentTable {
    /// Builds a table from `[base, 1 house, 2, 3, 4, hotel]`.
    pub const fn new(r: [Money; 6]) -> Self {
        RentTable {
            base: r[0],
            houses: [r[1], r[2], r[3], r[4]],
            hotel: r[5],
        }
    }

    /// Rent with `houses` houses (0 gives the base rent).
    pub fn with_houses(&self, houses: u8) -> Money {
        match houses {
            0 => self.base,
            n => self.houses[usize::from(n.min(MAX_HOUSES)) - 1],
        }
    }
}

/// What sort of square a property is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PropertyKind {
    /// An ordinary, buildable street.
    Street {
        color: ColorGroup,
        house_cost: Money,
        rent: RentTable,
    },
    Station,
    Utility,
}

/// Static definition of one purchasable square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PropertyDef {
    /// Stable key, unique within a catalog version.
    pub id: &'static str,
    pub name: &'static str,
    #[serde(flatten)]
    pub kind: PropertyKind,
    pub purchase_cost: Money,
    pub mortgage_value: Money,
    /// Contiguous ordinal among purchasable squares, in board order.
    pub board_index: usize,
    /// Physical square on the 40-square board.
    pub square: u8,
}

impl PropertyDef {
    /// Defines a street. Mortgage value is half the purchase cost.
    pub const fn street(
        board_index: usize,
        square: u8,
        id: &'static str,
        name: &'static str,
        color: ColorGroup,
        purchase_cost: Money,
        house_cost: Money,
        rent: [Money; 6],
    ) -> Self {
        PropertyDef {
            id,
            name,
            kind: PropertyKind::Street {
                color,
                house_cost,
                rent: RentTable::new(rent),
            },
            purchase_cost,
            mortgage_value: purchase_cost / 2,
            board_index,
            square,
        }
    }

    /// Defines a station costing 200.
    pub const fn station(
        board_index: usize,
        square: u8,
        id: &'static str,
        name: &'static str,
    ) -> Self {
        PropertyDef {
            id,
            name,
            kind: PropertyKind::Station,
            purchase_cost: 200,
            mortgage_value: 100,
            board_index,
            square,
        }
    }

    /// Defines a utility costing 150.
    pub const fn utility(
        board_index: usize,
        square: u8,
        id: &'static str,
        name: &'static str,
    ) -> Self {
        PropertyDef {
            id,
            name,
            kind: PropertyKind::Utility,
            purchase_cost: 150,
            mortgage_value: 75,
            board_index,
            square,
        }
    }

    /// Returns the color group for streets, None for stations and utilities.
    pub const fn color_group(&self) -> Option<ColorGroup> {
        match self.kind {
            PropertyKind::Street { color, .. } => Some(color),
            _ => None,
        }
    }

    /// Returns the house cost for streets.
    pub const fn house_cost(&self) -> Option<Money> {
        match self.kind {
            PropertyKind::Street { house_cost, .. } => Some(house_cost),
            _ => None,
        }
    }

    /// Returns the rent table for streets.
    pub const fn rent_table(&self) -> Option<&RentTable> {
        match &self.kind {
            PropertyKind::Street { rent, .. } => Some(rent),
            _ => None,
        }
    }

    pub const fn is_street(&self) -> bool {
        matches!(self.kind, PropertyKind::Street { .. })
    }

    pub const fn is_station(&self) -> bool {
        matches!(self.kind, PropertyKind::Station)
    }

    pub const fn is_utility(&self) -> bool {
        matches!(self.kind, PropertyKind::Utility)
    }
}
