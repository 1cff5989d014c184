//! Money transfer endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// One side of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Party {
    Player(PlayerId),
    /// Infinite source and sink; never holds a balance.
    Bank,
    /// The communal pot fed by fines.
    FreeParking,
}

impl Party {
    pub fn player(self) -> Option<PlayerId> {
        match self {
            Party::Player(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::Player(id) => write!(f, "player {id}"),
            Party::Bank => f.write_str("bank"),
            Party::FreeParking => f.write_str("free parking"),
        }
    }
}

/// Parses `bank`, `fine` / `free-parking`, or a numeric player id.
impl FromStr for Party {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bank" => Ok(Party::Bank),
            "fine" | "free-parking" | "freeparking" | "pot" => Ok(Party::FreeParking),
            other => other
                .parse::<u32>()
                .map(|n| Party::Player(PlayerId(n)))
                .map_err(|_| format!("expected a player id, 'bank' or 'fine', got '{s}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_parties() {
        assert_eq!("bank".parse::<Party>(), Ok(Party::Bank));
        assert_eq!("FINE".parse::<Party>(), Ok(Party::FreeParking));
        assert_eq!("free-parking".parse::<Party>(), Ok(Party::FreeParking));
        assert_eq!("4".parse::<Party>(), Ok(Party::Player(PlayerId(4))));
        assert!("-4".parse::<Party>().is_err());
        assert!("alice".parse::<Party>().is_err());
    }

    #[test]
    fn serializes_as_tagged_variant() {
        assert_eq!(serde_json::to_string(&Party::Bank).unwrap(), "\"bank\"");
        assert_eq!(
            serde_json::to_string(&Party::FreeParking).unwrap(),
            "\"free-parking\""
        );
        assert_eq!(
            serde_json::to_string(&Party::Player(PlayerId(2))).unwrap(),
            "{\"player\":2}"
        );
    }
}
