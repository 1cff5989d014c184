//! Banker configuration.
//!
//! Every field has a default, so an empty or partial TOML file is valid.
//! Values can be changed at run time through `setoption`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::catalog::{GameVersion, Money};

/// How composite commands react when one leg fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositePolicy {
    /// Apply legs in order and stop at the first failure; earlier legs stay.
    #[default]
    BestEffort,
    /// Validate every leg first and apply none if any would fail.
    AllOrNothing,
}

impl fmt::Display for CompositePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompositePolicy::BestEffort => "best_effort",
            CompositePolicy::AllOrNothing => "all_or_nothing",
        })
    }
}

impl FromStr for CompositePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "best_effort" => Ok(CompositePolicy::BestEffort),
            "all_or_nothing" => Ok(CompositePolicy::AllOrNothing),
            _ => Err(ConfigError::InvalidValue {
                name: "CompositePolicy".into(),
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for option {name}")]
    InvalidValue { name: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BankerConfig {
    /// Cash handed to each new player.
    pub starting_cash: Money,
    pub max_players: usize,
    /// Paid by the bank on `passgo`.
    pub pass_go_amount: Money,
    /// Version a fresh game starts in.
    pub default_version: GameVersion,
    /// Surcharge on lifting a mortgage, as a percentage of the mortgage value.
    pub unmortgage_interest_percent: u32,
    pub composite_policy: CompositePolicy,
}

impl Default for BankerConfig {
    fn default() -> Self {
        BankerConfig {
            starting_cash: 1500,
            max_players: 8,
            pass_go_amount: 200,
            default_version: GameVersion::Uk,
            unmortgage_interest_percent: 0,
            composite_policy: CompositePolicy::BestEffort,
        }
    }
}

impl BankerConfig {
    /// Loads a config file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies a `setoption name <name> value <value>` override.
    ///
    /// Names are matched case-insensitively, in either `StartingCash` or
    /// `starting_cash` form.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        };
        let key = name.to_ascii_lowercase().replace(['_', '-'], "");
        match key.as_str() {
            "startingcash" => self.starting_cash = value.parse().map_err(|_| invalid())?,
            "maxplayers" => self.max_players = value.parse().map_err(|_| invalid())?,
            "passgoamount" => self.pass_go_amount = value.parse().map_err(|_| invalid())?,
            "defaultversion" => self.default_version = value.parse().map_err(|_| invalid())?,
            "unmortgageinterestpercent" => {
                self.unmortgage_interest_percent = value.parse().map_err(|_| invalid())?
            }
            "compositepolicy" => self.composite_policy = value.parse().map_err(|_| invalid())?,
            _ => return Err(ConfigError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    /// Cost of lifting the mortgage on a property worth `mortgage_value`.
    pub fn unmortgage_cost(&self, mortgage_value: Money) -> Money {
        let percent = Money::from(self.unmortgage_interest_percent);
        let interest = mortgage_value.saturating_mul(percent) / 100;
        mortgage_value.saturating_add(interest)
    }
}
