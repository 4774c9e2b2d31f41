//! CLI subcommands.

pub mod route;
