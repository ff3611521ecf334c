//! `draftboard` command-line surface: argument definitions, stage commands,
//! logging setup and summary tables.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod paths;
pub mod summary;
pub mod types;
