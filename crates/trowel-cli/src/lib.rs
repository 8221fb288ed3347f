#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config_handlers;
pub mod logging;

pub use cli::{Cli, Command, ConfigAction};
pub use commands::run;
