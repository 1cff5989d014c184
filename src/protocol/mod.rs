//! Line protocol: commands in on stdin, one JSON response per line out.

pub mod parser;
pub mod response;

pub use parser::{parse_command, ParseError, Request};
pub use response::{ErrorBody, FailureKind, Response};
