//! Command-line interface for Folio.
//!
//! # Key Abstractions
//!
//! - [`FolioConfig`]: layered configuration (file, environment, defaults)
//! - [`CliArgs`]: `clap` argument tree
//! - [`FolioCli`]: command dispatch and logging setup

#![doc = include_str!("../README.md")]

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;

pub use app::FolioCli;
pub use cli::{CliArgs, Command};
pub use config::FolioConfig;
