//! # mopro-engine — Proving Engine Adapters
//!
//! The bridge treats proving and verification as an opaque backend. This
//! crate fixes the interface that backend presents, one trait per proof
//! system, and ships a deterministic stand-in.
//!
//! ## Architecture
//!
//! - **Traits** (`traits.rs`): [`CircomEngine`], [`Halo2Engine`] and
//!   [`NoirEngine`]. The three systems share nothing beyond "generate" and
//!   "verify", so they get separate traits rather than one generic one.
//!   [`Engines`] bundles one of each behind `Arc`s for the dispatcher.
//!
//! - **Mock** (`mock.rs`, feature `mock`): SHA-256 based engines that
//!   produce verifiable but transparent "proofs". They let the command
//!   surface run end to end without native prover libraries.
//!
//! ## Crate Policy
//!
//! - Engines are synchronous and CPU-bound. Callers run them on a
//!   blocking thread.
//! - Cryptographic rejection is `Ok(false)`. `Err` means the engine could
//!   not do its job.

#[cfg(feature = "mock")]
pub mod mock;
pub mod traits;

#[cfg(feature = "mock")]
pub use mock::{MockCircomEngine, MockHalo2Engine, MockNoirEngine};
pub use traits::{CircomEngine, Engines, Halo2Engine, NoirEngine, NoirOptions};
