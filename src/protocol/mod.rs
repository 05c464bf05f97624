//! Call adapter
//!
//! Transport-independent request/response contract: a verb name plus a
//! parameter mapping in, a result or error envelope out.

pub mod commands;
pub mod handlers;
pub mod parser;
pub mod responses;

pub use commands::{Request, Verb, parse_verb};
pub use handlers::{execute, handle_request};
pub use parser::{Params, parse_request};
pub use responses::Response;
