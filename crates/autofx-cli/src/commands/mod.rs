//! CLI subcommands.

pub mod classify;
pub mod common;
pub mod effects;
pub mod process;
