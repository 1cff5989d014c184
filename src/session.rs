//! Request dispatch.
//!
//! A `Session` wraps a `Banker` and turns each parsed `Request` into
//! exactly one `Response`. Commands run strictly one after another; each
//! finishes validating, mutating and recording before the next starts.

use std::path::Path;

use serde_json::json;
use tracing::{debug, warn};

use crate::banker::{Banker, CompositeResult};
use crate::catalog::GameVersion;
use crate::error::{positive_amount, ErrorKind, LedgerError};
use crate::ledger::Transaction;
use crate::protocol::{parse_command, ParseError, Request, Response};

/// Whether the input loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    banker: Banker,
}

impl Session {
    pub fn new(banker: Banker) -> Self {
        Session { banker }
    }

    pub fn banker(&self) -> &Banker {
        &self.banker
    }

    /// Parses and executes one input line.
    ///
    /// Blank lines produce no response. `quit` produces none and stops the
    /// loop.
    pub fn handle_line(&mut self, line: &str) -> (Option<Response>, Flow) {
        match parse_command(line) {
            Ok(None) => (None, Flow::Continue),
            Ok(Some(Request::Quit)) => (None, Flow::Quit),
            Ok(Some(request)) => (Some(self.execute(request)), Flow::Continue),
            Err(err) => {
                warn!(%err, line, "rejected input");
                (Some(parse_error_response(&err)), Flow::Continue)
            }
        }
    }

    /// Executes a parsed request against the banker.
    pub fn execute(&mut self, request: Request) -> Response {
        let command = request.name();
        let response = self.dispatch(command, request);
        if let Some(error) = &response.error {
            debug!(command, kind = ?error.kind, message = %error.message, "command rejected");
        }
        response
    }

    fn dispatch(&mut self, command: &'static str, request: Request) -> Response {
        let banker = &mut self.banker;
        match request {
            Request::State => Response::ok(command, banker.state()),
            Request::Transactions => Response::ok(command, banker.transactions()),
            Request::Properties => Response::ok(command, banker.properties()),
            Request::QuoteRent { property, dice } => {
                ledger(command, banker.quote_rent(&property, dice))
            }

            Request::AddPlayer { name } => ledger(command, banker.add_player(&name)),
            Request::RemovePlayer { player } => ledger(command, banker.remove_player(player)),

            Request::Buy { player, property } => {
                ledger(command, banker.buy_property(player, &property))
            }
            Request::Mortgage { player, property } => {
                ledger(command, banker.mortgage_property(player, &property))
            }
            Request::Unmortgage { player, property } => {
                ledger(command, banker.unmortgage_property(player, &property))
            }
            Request::Build { player, property } => {
                ledger(command, banker.build_house(player, &property))
            }
            Request::SellBuilding { player, property } => {
                ledger(command, banker.sell_building(player, &property))
            }
            Request::SellProperty { player, property } => {
                ledger(command, banker.sell_property(player, &property))
            }
            Request::TransferProperty {
                from,
                to,
                property,
                price,
            } => {
                let result = price
                    .map(positive_amount)
                    .transpose()
                    .and_then(|price| banker.transfer_property(from, to, &property, price));
                ledger(command, result)
            }

            Request::Transfer { from, to, amount } => ledger(
                command,
                positive_amount(amount).and_then(|amount| banker.transfer_money(from, to, amount)),
            ),
            Request::PayRent {
                player,
                property,
                dice,
            } => optional(command, banker.pay_rent(player, &property, dice), "no rent due"),
            Request::CollectFreeParking { player } => optional(
                command,
                banker.collect_free_parking(player),
                "free parking is empty",
            ),
            Request::PayFine { player, amount } => ledger(
                command,
                positive_amount(amount).and_then(|amount| banker.pay_fine(player, amount)),
            ),
            Request::ReceiveFromBank { player, amount } => ledger(
                command,
                positive_amount(amount).and_then(|amount| banker.receive_from_bank(player, amount)),
            ),
            Request::PassGo { player } => ledger(command, banker.pass_go(player)),

            Request::PayEveryone { player, amount } => match positive_amount(amount) {
                Ok(amount) => composite(command, banker.pay_everyone(player, amount)),
                Err(err) => Response::ledger_error(command, &err),
            },
            Request::ReceiveFromEveryone { player, amount } => match positive_amount(amount) {
                Ok(amount) => composite(command, banker.receive_from_everyone(player, amount)),
                Err(err) => Response::ledger_error(command, &err),
            },
            Request::TransferAllCash { from, to } => {
                ledger(command, banker.transfer_all_cash(from, to))
            }
            Request::TransferAllProperties { from, to } => {
                ledger(command, banker.transfer_all_properties(from, to))
            }
            Request::SellAllBuildings { player } => {
                composite(command, banker.sell_all_buildings(player))
            }
            Request::SellAllProperties { player } => {
                composite(command, banker.sell_all_properties(player))
            }
            Request::CashOut { player } => composite(command, banker.cash_out(player)),

            Request::NextTurn => {
                let current = banker.next_turn();
                Response::ok(
                    command,
                    json!({
                        "current_player": current,
                        "current_turn_index": banker.ledger().turns().current_index(),
                    }),
                )
            }
            Request::Reorder { order } => match banker.reorder_turns(order) {
                Ok(()) => Response::ok(command, banker.ledger().turns()),
                Err(err) => Response::ledger_error(command, &err),
            },
            Request::Reset => {
                banker.reset_game();
                Response::message(command, "game reset")
            }
            Request::SetVersion { version } => {
                let result = version
                    .parse::<GameVersion>()
                    .and_then(|version| banker.set_game_version(version));
                match result {
                    Ok(()) => {
                        Response::ok(command, json!({ "version": banker.ledger().version() }))
                    }
                    Err(err) => Response::ledger_error(command, &err),
                }
            }

            Request::Save { path } => save(command, banker, Path::new(&path)),
            Request::Load { path } => load(command, banker, Path::new(&path)),
            Request::SetOption { name, value } => match banker.set_option(&name, &value) {
                Ok(()) => Response::message(command, format!("{name} set to {value}")),
                Err(err) => Response::other(command, "Config", err.to_string()),
            },
            Request::Quit => Response::message(command, "bye"),
        }
    }
}

fn ledger<T: serde::Serialize>(command: &'static str, result: Result<T, LedgerError>) -> Response {
    match result {
        Ok(value) => Response::ok(command, value),
        Err(err) => Response::ledger_error(command, &err),
    }
}

fn optional(
    command: &'static str,
    result: Result<Option<Transaction>, LedgerError>,
    nothing: &str,
) -> Response {
    match result {
        Ok(Some(tx)) => Response::ok(command, tx),
        Ok(None) => Response::message(command, nothing),
        Err(err) => Response::ledger_error(command, &err),
    }
}

fn composite(command: &'static str, result: CompositeResult) -> Response {
    match result {
        Ok(legs) => Response::ok(command, legs),
        Err(failure) => Response::composite_error(command, failure),
    }
}

fn save(command: &'static str, banker: &Banker, path: &Path) -> Response {
    match banker.save_file(path) {
        Ok(()) => Response::message(command, format!("saved to {}", path.display())),
        Err(err) => Response::other(command, err.kind(), err.to_string()),
    }
}

fn load(command: &'static str, banker: &mut Banker, path: &Path) -> Response {
    match banker.load_file(path) {
        Ok(()) => Response::ok(command, banker.state()),
        Err(err) => Response::other(command, err.kind(), err.to_string()),
    }
}

/// Builds the response for a line that failed to parse, echoing the
/// keyword when it is a known command. A malformed amount is reported the
/// same way the ledger reports a non-positive one.
fn parse_error_response(err: &ParseError) -> Response {
    let command = match err {
        ParseError::MissingArgument { command, .. }
        | ParseError::UnexpectedArgument { command, .. }
        | ParseError::InvalidArgument { command, .. }
        | ParseError::InvalidParty { command, .. } => *command,
        ParseError::InvalidAmount { command, .. } => {
            return Response::rejected(*command, ErrorKind::InvalidAmount, err.to_string());
        }
        ParseError::MalformedSetOption => "setoption",
        ParseError::UnknownCommand(_) => "unknown",
    };
    Response::other(command, "Parse", err.to_string())
}
