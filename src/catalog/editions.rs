//! Static property tables for each supported board edition.
//!
//! Both editions share identical economics; only names and ids differ.
//! Entries are listed in board order so that `board_index` equals the
//! array position.

use super::property::ColorGroup::{Brown, DarkBlue, Green, LightBlue, Orange, Pink, Red, Yellow};
use super::property::PropertyDef;

/// Number of purchasable squares on a standard board.
pub const PROPERTY_COUNT: usize = 28;

/// London edition.
#[rustfmt::skip]
pub static UK_PROPERTIES: [PropertyDef; PROPERTY_COUNT] = [
    PropertyDef::street(0, 1, "old_kent_road", "Old Kent Road", Brown, 60, 50, [2, 10, 30, 90, 160, 250]),
    PropertyDef::street(1, 3, "whitechapel_road", "Whitechapel Road", Brown, 60, 50, [4, 20, 60, 180, 320, 450]),
    PropertyDef::station(2, 5, "kings_cross_station", "King's Cross Station"),
    PropertyDef::street(3, 6, "angel_islington", "The Angel Islington", LightBlue, 100, 50, [6, 30, 90, 270, 400, 550]),
    PropertyDef::street(4, 8, "euston_road", "Euston Road", LightBlue, 100, 50, [6, 30, 90, 270, 400, 550]),
    PropertyDef::street(5, 9, "pentonville_road", "Pentonville Road", LightBlue, 120, 50, [8, 40, 100, 300, 450, 600]),
    PropertyDef::street(6, 11, "pall_mall", "Pall Mall", Pink, 140, 100, [10, 50, 150, 450, 625, 750]),
    PropertyDef::utility(7, 12, "electric_company", "Electric Company"),
    PropertyDef::street(8, 13, "whitehall", "Whitehall", Pink, 140, 100, [10, 50, 150, 450, 625, 750]),
    PropertyDef::street(9, 14, "northumberland_avenue", "Northumberland Avenue", Pink, 160, 100, [12, 60, 180, 500, 700, 900]),
    PropertyDef::station(10, 15, "marylebone_station", "Marylebone Station"),
    PropertyDef::street(11, 16, "bow_street", "Bow Street", Orange, 180, 100, [14, 70, 200, 550, 750, 950]),
    PropertyDef::street(12, 18, "marlborough_street", "Marlborough Street", Orange, 180, 100, [14, 70, 200, 550, 750, 950]),
    PropertyDef::street(13, 19, "vine_street", "Vine Street", Orange, 200, 100, [16, 80, 220, 600, 800, 1000]),
    PropertyDef::street(14, 21, "strand", "Strand", Red, 220, 150, [18, 90, 250, 700, 875, 1050]),
    PropertyDef::street(15, 23, "fleet_street", "Fleet Street", Red, 220, 150, [18, 90, 250, 700, 875, 1050]),
    PropertyDef::street(16, 24, "trafalgar_square", "Trafalgar Square", Red, 240, 150, [20, 100, 300, 750, 925, 1100]),
    PropertyDef::station(17, 25, "fenchurch_street_station", "Fenchurch Street Station"),
    PropertyDef::street(18, 26, "leicester_square", "Leicester Square", Yellow, 260, 150, [22, 110, 330, 800, 975, 1150]),
    PropertyDef::street(19, 27, "coventry_street", "Coventry Street", Yellow, 260, 150, [22, 110, 330, 800, 975, 1150]),
    PropertyDef::utility(20, 28, "water_works", "Water Works"),
    PropertyDef::street(21, 29, "piccadilly", "Piccadilly", Yellow, 280, 150, [24, 120, 360, 850, 1025, 1200]),
    PropertyDef::street(22, 31, "regent_street", "Regent Street", Green, 300, 200, [26, 130, 390, 900, 1100, 1275]),
    PropertyDef::street(23, 32, "oxford_street", "Oxford Street", Green, 300, 200, [26, 130, 390, 900, 1100, 1275]),
    PropertyDef::street(24, 34, "bond_street", "Bond Street", Green, 320, 200, [28, 150, 450, 1000, 1200, 1400]),
    PropertyDef::station(25, 35, "liverpool_street_station", "Liverpool Street Station"),
    PropertyDef::street(26, 37, "park_lane", "Park Lane", DarkBlue, 350, 200, [35, 175, 500, 1100, 1300, 1500]),
    PropertyDef::street(27, 39, "mayfair", "Mayfair", DarkBlue, 400, 200, [50, 200, 600, 1400, 1700, 2000]),
];

/// Atlantic City edition.
#[rustfmt::skip]
pub static US_PROPERTIES: [PropertyDef; PROPERTY_COUNT] = [
    PropertyDef::street(0, 1, "mediterranean_avenue", "Mediterranean Avenue", Brown, 60, 50, [2, 10, 30, 90, 160, 250]),
    PropertyDef::street(1, 3, "baltic_avenue", "Baltic Avenue", Brown, 60, 50, [4, 20, 60, 180, 320, 450]),
    PropertyDef::station(2, 5, "reading_railroad", "Reading Railroad"),
    PropertyDef::street(3, 6, "oriental_avenue", "Oriental Avenue", LightBlue, 100, 50, [6, 30, 90, 270, 400, 550]),
    PropertyDef::street(4, 8, "vermont_avenue", "Vermont Avenue", LightBlue, 100, 50, [6, 30, 90, 270, 400, 550]),
    PropertyDef::street(5, 9, "connecticut_avenue", "Connecticut Avenue", LightBlue, 120, 50, [8, 40, 100, 300, 450, 600]),
    PropertyDef::street(6, 11, "st_charles_place", "St. Charles Place", Pink, 140, 100, [10, 50, 150, 450, 625, 750]),
    PropertyDef::utility(7, 12, "electric_company", "Electric Company"),
    PropertyDef::street(8, 13, "states_avenue", "States Avenue", Pink, 140, 100, [10, 50, 150, 450, 625, 750]),
    PropertyDef::street(9, 14, "virginia_avenue", "Virginia Avenue", Pink, 160, 100, [12, 60, 180, 500, 700, 900]),
    PropertyDef::station(10, 15, "pennsylvania_railroad", "Pennsylvania Railroad"),
    PropertyDef::street(11, 16, "st_james_place", "St. James Place", Orange, 180, 100, [14, 70, 200, 550, 750, 950]),
    PropertyDef::street(12, 18, "tennessee_avenue", "Tennessee Avenue", Orange, 180, 100, [14, 70, 200, 550, 750, 950]),
    PropertyDef::street(13, 19, "new_york_avenue", "New York Avenue", Orange, 200, 100, [16, 80, 220, 600, 800, 1000]),
    PropertyDef::street(14, 21, "kentucky_avenue", "Kentucky Avenue", Red, 220, 150, [18, 90, 250, 700, 875, 1050]),
    PropertyDef::street(15, 23, "indiana_avenue", "Indiana Avenue", Red, 220, 150, [18, 90, 250, 700, 875, 1050]),
    PropertyDef::street(16, 24, "illinois_avenue", "Illinois Avenue", Red, 240, 150, [20, 100, 300, 750, 925, 1100]),
    PropertyDef::station(17, 25, "b_and_o_railroad", "B. & O. Railroad"),
    PropertyDef::street(18, 26, "atlantic_avenue", "Atlantic Avenue", Yellow, 260, 150, [22, 110, 330, 800, 975, 1150]),
    PropertyDef::street(19, 27, "ventnor_avenue", "Ventnor Avenue", Yellow, 260, 150, [22, 110, 330, 800, 975, 1150]),
    PropertyDef::utility(20, 28, "water_works", "Water Works"),
    PropertyDef::street(21, 29, "marvin_gardens", "Marvin Gardens", Yellow, 280, 150, [24, 120, 360, 850, 1025, 1200]),
    PropertyDef::street(22, 31, "pacific_avenue", "Pacific Avenue", Green, 300, 200, [26, 130, 390, 900, 1100, 1275]),
    PropertyDef::street(23, 32, "north_carolina_avenue", "North Carolina Avenue", Green, 300, 200, [26, 130, 390, 900, 1100, 1275]),
    PropertyDef::street(24, 34, "pennsylvania_avenue", "Pennsylvania Avenue", Green, 320, 200, [28, 150, 450, 1000, 1200, 1400]),
    PropertyDef::station(25, 35, "short_line", "Short Line"),
    PropertyDef::street(26, 37, "park_place", "Park Place", DarkBlue, 350, 200, [35, 175, 500, 1100, 1300, 1500]),
    PropertyDef::street(27, 39, "boardwalk", "Boardwalk", DarkBlue, 400, 200, [50, 200, 600, 1400, 1700, 2000]),
];
