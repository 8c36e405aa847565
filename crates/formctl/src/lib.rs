//! Command-line tooling around the parameter exchange protocol.

pub mod cmd_check;
pub mod cmd_identity;
pub mod cmd_invoke;
pub mod common;
pub mod terminal;
