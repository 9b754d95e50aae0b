//! # mopro-cli — Command-Line Host Binding
//!
//! The `mopro` binary is a host binding like any other: it registers the
//! bridge module, forwards a command name and a JSON array of positional
//! arguments, and reports either the JSON result or the coded rejection.
//!
//! ## Subcommands
//!
//! - `call` — invoke any module function by name
//! - `list` — module name, functions and events
//! - `constants` — the constants map
//! - `hello` — the greeting
//! - `watch` — set a value and print the resulting `onChange` event
//!
//! ## Crate Policy
//!
//! - No proof logic here. Handlers delegate to `mopro-bridge`.
//! - Results go to stdout, rejections and logs go to stderr, both as JSON
//!   when asked for.
//! - Proving runs on the deterministic mock engines until a native backend
//!   is linked in.

pub mod config;
pub mod invoke;

pub use config::{BridgeConfig, ConfigError, LogFormat};
pub use invoke::Outcome;
