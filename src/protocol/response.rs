//! JSON response encoding.
//!
//! Every request produces exactly one line on stdout: a JSON object with
//! `ok`, the echoed `command`, and either `result` or `error`.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{CompositeFailure, ErrorKind, LedgerError};
use crate::ledger::Transaction;

/// Classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FailureKind {
    /// A rule or validation failure from the ledger.
    Ledger(ErrorKind),
    /// Anything outside the ledger: parsing, config, files, snapshots.
    Other(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub kind: FailureKind,
    pub message: String,
    /// Legs of a composite command that stayed committed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub committed: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub ok: bool,
    pub command: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Response {
    /// A successful response carrying `result`.
    pub fn ok(command: &'static str, result: impl Serialize) -> Response {
        match serde_json::to_value(result) {
            Ok(value) => Response {
                ok: true,
                command,
                result: Some(value),
                error: None,
            },
            Err(err) => Response::other(command, "Serialization", err.to_string()),
        }
    }

    /// A successful response with only a message.
    pub fn message(command: &'static str, message: impl Into<String>) -> Response {
        Response::ok(command, json!({ "message": message.into() }))
    }

    pub fn ledger_error(command: &'static str, error: &LedgerError) -> Response {
        Response::failure(command, FailureKind::Ledger(error.kind()), error.to_string(), Vec::new())
    }

    /// A ledger-class failure detected before the ledger was consulted.
    pub fn rejected(
        command: &'static str,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Response {
        Response::failure(command, FailureKind::Ledger(kind), message.into(), Vec::new())
    }

    pub fn composite_error(command: &'static str, failure: CompositeFailure) -> Response {
        let kind = FailureKind::Ledger(failure.kind());
        let message = failure.to_string();
        Response::failure(command, kind, message, failure.committed)
    }

    pub fn other(
        command: &'static str,
        kind: &'static str,
        message: impl Into<String>,
    ) -> Response {
        Response::failure(command, FailureKind::Other(kind), message.into(), Vec::new())
    }

    fn failure(
        command: &'static str,
        kind: FailureKind,
        message: String,
        committed: Vec<Transaction>,
    ) -> Response {
        Response {
            ok: false,
            command,
            result: None,
            error: Some(ErrorBody {
                kind,
                message,
                committed,
            }),
        }
    }

    /// Encodes the response as a single JSON line (without newline).
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            format!(
                r#"{{"ok":false,"command":"{}","error":{{"kind":"Serialization","message":{:?}}}}}"#,
                self.command,
                err.to_string()
            )
        })
    }
}
