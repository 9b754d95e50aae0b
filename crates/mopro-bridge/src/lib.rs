//! # mopro-bridge — Command Surface for the mopro Proof Toolkit
//!
//! The boundary between a host runtime and the proving engines. A host
//! binding hands over a command name and positional arguments; the bridge
//! checks files, converts shapes, runs the engine off the caller's task,
//! and returns either a host-shaped result or one coded error.
//!
//! ## Layers
//!
//! - `precondition` — fail-fast file existence checks.
//! - `dispatcher` — typed async handlers, one per proof command.
//! - `command` — the canonical name → handler → error-code table.
//! - `module` — what a binding registers: the table plus `hello`, `PI`
//!   and the `onChange` event.
//!
//! ## Crate Policy
//!
//! - No engine failure leaves the bridge without being mapped to a
//!   [`mopro_core::BridgeError`].
//! - No shared state between calls. `Dispatcher` and `BridgeModule` are
//!   cheap to clone and safe to use from many tasks at once.
//! - Bindings contain no proof logic; they forward to [`BridgeModule::call`].

pub mod command;
pub mod dispatcher;
pub mod module;
pub mod precondition;

pub use command::{dispatch, Command};
pub use dispatcher::Dispatcher;
pub use module::{BridgeModule, ChangeEvent};
pub use precondition::require_file_exists;
