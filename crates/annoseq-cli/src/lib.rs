//! Annotation sequence CLI library.
//!
//! This crate provides the CLI interface and the JSON document adapter.

mod cli;
pub mod commands;
mod config;
pub mod document;

pub use cli::{Cli, Commands};
pub use config::Config;
