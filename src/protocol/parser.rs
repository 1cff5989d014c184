//! Banker command parser.
//!
//! Parses one line of input into a `Request` that the session can dispatch.
//! Commands are a lowercase keyword followed by whitespace-separated
//! arguments. Player arguments are numeric ids; transfer endpoints also
//! accept `bank` and `fine`.

use std::str::FromStr;

use thiserror::Error;

use crate::ledger::{Party, PlayerId};

/// Errors produced while parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("{command}: missing {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("{command}: unexpected argument '{value}'")]
    UnexpectedArgument { command: &'static str, value: String },

    #[error("{command}: invalid {argument} '{value}'")]
    InvalidArgument {
        command: &'static str,
        argument: &'static str,
        value: String,
    },

    /// An amount or dice total that is not a whole number in range.
    #[error("{command}: invalid amount '{value}': must be a positive whole number")]
    InvalidAmount { command: &'static str, value: String },

    #[error("{command}: {message}")]
    InvalidParty { command: &'static str, message: String },

    #[error("malformed setoption: expected 'setoption name <id> value <x>'")]
    MalformedSetOption,
}

/// A parsed client-to-banker request.
///
/// Amounts are carried as signed integers so that zero and negative values
/// reach the ledger and are rejected there with `InvalidAmount`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    State,
    Transactions,
    Properties,
    QuoteRent { property: String, dice: Option<u32> },

    AddPlayer { name: String },
    RemovePlayer { player: PlayerId },

    Buy { player: PlayerId, property: String },
    Mortgage { player: PlayerId, property: String },
    Unmortgage { player: PlayerId, property: String },
    Build { player: PlayerId, property: String },
    SellBuilding { player: PlayerId, property: String },
    SellProperty { player: PlayerId, property: String },
    TransferProperty {
        from: PlayerId,
        to: PlayerId,
        property: String,
        price: Option<i64>,
    },

    Transfer { from: Party, to: Party, amount: i64 },
    PayRent {
        player: PlayerId,
        property: String,
        dice: Option<u32>,
    },
    CollectFreeParking { player: PlayerId },
    PayFine { player: PlayerId, amount: i64 },
    ReceiveFromBank { player: PlayerId, amount: i64 },
    PassGo { player: PlayerId },

    PayEveryone { player: PlayerId, amount: i64 },
    ReceiveFromEveryone { player: PlayerId, amount: i64 },
    TransferAllCash { from: PlayerId, to: PlayerId },
    TransferAllProperties { from: PlayerId, to: PlayerId },
    SellAllBuildings { player: PlayerId },
    SellAllProperties { player: PlayerId },
    CashOut { player: PlayerId },

    NextTurn,
    Reorder { order: Vec<PlayerId> },
    Reset,
    SetVersion { version: String },

    Save { path: String },
    Load { path: String },
    SetOption { name: String, value: String },
    Quit,
}

impl Request {
    /// The command keyword, echoed back in responses.
    pub fn name(&self) -> &'static str {
        match self {
            Request::State => "state",
            Request::Transactions => "transactions",
            Request::Properties => "properties",
            Request::QuoteRent { .. } => "rent",
            Request::AddPlayer { .. } => "addplayer",
            Request::RemovePlayer { .. } => "removeplayer",
            Request::Buy { .. } => "buy",
            Request::Mortgage { .. } => "mortgage",
            Request::Unmortgage { .. } => "unmortgage",
            Request::Build { .. } => "build",
            Request::SellBuilding { .. } => "sellbuilding",
            Request::SellProperty { .. } => "sellproperty",
            Request::TransferProperty { .. } => "transferproperty",
            Request::Transfer { .. } => "transfer",
            Request::PayRent { .. } => "payrent",
            Request::CollectFreeParking { .. } => "collect",
            Request::PayFine { .. } => "fine",
            Request::ReceiveFromBank { .. } => "receive",
            Request::PassGo { .. } => "passgo",
            Request::PayEveryone { .. } => "payall",
            Request::ReceiveFromEveryone { .. } => "receiveall",
            Request::TransferAllCash { .. } => "transferallcash",
            Request::TransferAllProperties { .. } => "transferallproperties",
            Request::SellAllBuildings { .. } => "sellallbuildings",
            Request::SellAllProperties { .. } => "sellallproperties",
            Request::CashOut { .. } => "cashout",
            Request::NextTurn => "nextturn",
            Request::Reorder { .. } => "reorder",
            Request::Reset => "reset",
            Request::SetVersion { .. } => "version",
            Request::Save { .. } => "save",
            Request::Load { .. } => "load",
            Request::SetOption { .. } => "setoption",
            Request::Quit => "quit",
        }
    }
}

/// Cursor over the arguments of one command.
struct Args<'a> {
    command: &'static str,
    tokens: std::slice::Iter<'a, &'a str>,
}

impl<'a> Args<'a> {
    fn next(&mut self, argument: &'static str) -> Result<&'a str, ParseError> {
        self.tokens
            .next()
            .copied()
            .ok_or(ParseError::MissingArgument {
                command: self.command,
                argument,
            })
    }

    fn number<T: FromStr>(&mut self, argument: &'static str) -> Result<T, ParseError> {
        let raw = self.next(argument)?;
        raw.parse().map_err(|_| ParseError::InvalidArgument {
            command: self.command,
            argument,
            value: raw.to_string(),
        })
    }

    fn parse_amount<T: FromStr>(&self, raw: &str) -> Result<T, ParseError> {
        raw.parse().map_err(|_| ParseError::InvalidAmount {
            command: self.command,
            value: raw.to_string(),
        })
    }

    /// Money and dice arguments. Fractions, words and values that overflow
    /// are invalid amounts, not syntax errors.
    fn amount<T: FromStr>(&mut self, argument: &'static str) -> Result<T, ParseError> {
        let raw = self.next(argument)?;
        self.parse_amount(raw)
    }

    fn optional_amount<T: FromStr>(&mut self) -> Result<Option<T>, ParseError> {
        match self.tokens.next() {
            Some(raw) => self.parse_amount(raw).map(Some),
            None => Ok(None),
        }
    }

    fn player(&mut self, argument: &'static str) -> Result<PlayerId, ParseError> {
        self.number(argument).map(PlayerId)
    }

    fn party(&mut self, argument: &'static str) -> Result<Party, ParseError> {
        let raw = self.next(argument)?;
        raw.parse().map_err(|message| ParseError::InvalidParty {
            command: self.command,
            message,
        })
    }

    fn text(&mut self, argument: &'static str) -> Result<String, ParseError> {
        self.next(argument).map(str::to_string)
    }

    /// Fails if any argument is left over.
    fn end(mut self) -> Result<(), ParseError> {
        match self.tokens.next() {
            Some(extra) => Err(ParseError::UnexpectedArgument {
                command: self.command,
                value: extra.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Parses a single line of input into a `Request`.
///
/// Returns `Ok(None)` for blank lines.
pub fn parse_command(line: &str) -> Result<Option<Request>, ParseError> {
    let trimmed = line.trim();
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let Some((&keyword, rest)) = tokens.split_first() else {
        return Ok(None);
    };

    let keyword = keyword.to_ascii_lowercase();
    let request = match keyword.as_str() {
        "state" => bare(rest, "state", Request::State)?,
        "transactions" => bare(rest, "transactions", Request::Transactions)?,
        "properties" => bare(rest, "properties", Request::Properties)?,
        "nextturn" => bare(rest, "nextturn", Request::NextTurn)?,
        "reset" => bare(rest, "reset", Request::Reset)?,
        "quit" => bare(rest, "quit", Request::Quit)?,

        "addplayer" => {
            // Names may contain spaces.
            let name = trimmed[tokens[0].len()..].trim();
            if name.is_empty() {
                return Err(ParseError::MissingArgument {
                    command: "addplayer",
                    argument: "name",
                });
            }
            Request::AddPlayer {
                name: name.to_string(),
            }
        }
        "rent" => {
            let mut args = args("rent", rest);
            let property = args.text("property")?;
            let dice = args.optional_amount()?;
            args.end()?;
            Request::QuoteRent { property, dice }
        }
        "removeplayer" => {
            let mut args = args("removeplayer", rest);
            let player = args.player("player")?;
            args.end()?;
            Request::RemovePlayer { player }
        }

        "buy" => player_property(rest, "buy", |player, property| Request::Buy {
            player,
            property,
        })?,
        "mortgage" => {
            player_property(rest, "mortgage", |player, property| Request::Mortgage {
                player,
                property,
            })?
        }
        "unmortgage" => player_property(rest, "unmortgage", |player, property| {
            Request::Unmortgage { player, property }
        })?,
        "build" => player_property(rest, "build", |player, property| Request::Build {
            player,
            property,
        })?,
        "sellbuilding" => player_property(rest, "sellbuilding", |player, property| {
            Request::SellBuilding { player, property }
        })?,
        "sellproperty" => player_property(rest, "sellproperty", |player, property| {
            Request::SellProperty { player, property }
        })?,
        "transferproperty" => {
            let mut args = args("transferproperty", rest);
            let from = args.player("source player")?;
            let to = args.player("target player")?;
            let property = args.text("property")?;
            let price = args.optional_amount()?;
            args.end()?;
            Request::TransferProperty {
                from,
                to,
                property,
                price,
            }
        }

        "transfer" => {
            let mut args = args("transfer", rest);
            let from = args.party("source")?;
            let to = args.party("destination")?;
            let amount = args.amount("amount")?;
            args.end()?;
            Request::Transfer { from, to, amount }
        }
        "payrent" => {
            let mut args = args("payrent", rest);
            let player = args.player("player")?;
            let property = args.text("property")?;
            let dice = args.optional_amount()?;
            args.end()?;
            Request::PayRent {
                player,
                property,
                dice,
            }
        }
        "collect" => {
            single_player(rest, "collect", |player| Request::CollectFreeParking { player })?
        }
        "passgo" => single_player(rest, "passgo", |player| Request::PassGo { player })?,
        "fine" => player_amount(rest, "fine", |player, amount| Request::PayFine {
            player,
            amount,
        })?,
        "receive" => player_amount(rest, "receive", |player, amount| Request::ReceiveFromBank {
            player,
            amount,
        })?,
        "payall" => player_amount(rest, "payall", |player, amount| Request::PayEveryone {
            player,
            amount,
        })?,
        "receiveall" => player_amount(rest, "receiveall", |player, amount| {
            Request::ReceiveFromEveryone { player, amount }
        })?,
        "transferallcash" => player_pair(rest, "transferallcash", |from, to| {
            Request::TransferAllCash { from, to }
        })?,
        "transferallproperties" => player_pair(rest, "transferallproperties", |from, to| {
            Request::TransferAllProperties { from, to }
        })?,
        "sellallbuildings" => {
            single_player(rest, "sellallbuildings", |player| Request::SellAllBuildings { player })?
        }
        "sellallproperties" => {
            single_player(rest, "sellallproperties", |player| {
                Request::SellAllProperties { player }
            })?
        }
        "cashout" => single_player(rest, "cashout", |player| Request::CashOut { player })?,

        "reorder" => {
            let mut args = args("reorder", rest);
            let mut order = Vec::with_capacity(rest.len());
            while args.tokens.len() > 0 {
                order.push(args.player("player")?);
            }
            Request::Reorder { order }
        }
        "version" => {
            let mut args = args("version", rest);
            let version = args.text("version")?;
            args.end()?;
            Request::SetVersion { version }
        }
        "save" => {
            let mut args = args("save", rest);
            let path = args.text("path")?;
            args.end()?;
            Request::Save { path }
        }
        "load" => {
            let mut args = args("load", rest);
            let path = args.text("path")?;
            args.end()?;
            Request::Load { path }
        }
        "setoption" => parse_setoption(rest)?,

        _ => return Err(ParseError::UnknownCommand(tokens[0].to_string())),
    };
    Ok(Some(request))
}

fn args<'a>(command: &'static str, rest: &'a [&'a str]) -> Args<'a> {
    Args {
        command,
        tokens: rest.iter(),
    }
}

fn bare(rest: &[&str], command: &'static str, request: Request) -> Result<Request, ParseError> {
    args(command, rest).end()?;
    Ok(request)
}

fn single_player(
    rest: &[&str],
    command: &'static str,
    build: impl FnOnce(PlayerId) -> Request,
) -> Result<Request, ParseError> {
    let mut args = args(command, rest);
    let player = args.player("player")?;
    args.end()?;
    Ok(build(player))
}

fn player_pair(
    rest: &[&str],
    command: &'static str,
    build: impl FnOnce(PlayerId, PlayerId) -> Request,
) -> Result<Request, ParseError> {
    let mut args = args(command, rest);
    let from = args.player("source player")?;
    let to = args.player("target player")?;
    args.end()?;
    Ok(build(from, to))
}

fn player_property(
    rest: &[&str],
    command: &'static str,
    build: impl FnOnce(PlayerId, String) -> Request,
) -> Result<Request, ParseError> {
    let mut args = args(command, rest);
    let player = args.player("player")?;
    let property = args.text("property")?;
    args.end()?;
    Ok(build(player, property))
}

fn player_amount(
    rest: &[&str],
    command: &'static str,
    build: impl FnOnce(PlayerId, i64) -> Request,
) -> Result<Request, ParseError> {
    let mut args = args(command, rest);
    let player = args.player("player")?;
    let amount = args.amount("amount")?;
    args.end()?;
    Ok(build(player, amount))
}

/// Parses `setoption name <id> value <x>`. Both name and value may span
/// several words.
fn parse_setoption(rest: &[&str]) -> Result<Request, ParseError> {
    if rest.first() != Some(&"name") {
        return Err(ParseError::MalformedSetOption);
    }
    let value_idx = rest
        .iter()
        .position(|&t| t == "value")
        .ok_or(ParseError::MalformedSetOption)?;
    let name = rest[1..value_idx].join(" ");
    let value = rest[value_idx + 1..].join(" ");
    if name.is_empty() || value.is_empty() {
        return Err(ParseError::MalformedSetOption);
    }
    Ok(Request::SetOption { name, value })
}
