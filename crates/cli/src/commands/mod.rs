//! CLI subcommands.

pub mod board;
pub mod login;
pub mod logout;
