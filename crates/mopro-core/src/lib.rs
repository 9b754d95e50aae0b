//! # mopro-core — Canonical Proof Model for the mopro Bridge
//!
//! The leaf crate of the workspace. It defines the value types that cross
//! the host boundary and the rules for turning permissive host input into
//! strict, fully-populated proof artifacts.
//!
//! ## Key Design Principles
//!
//! 1. **Field elements are opaque.** `FieldElement` wraps a decimal string.
//!    Nothing in the bridge parses it as a number; coordinates and public
//!    inputs flow end to end untouched.
//!
//! 2. **Two shapes per artifact.** The `wire` module mirrors what a host
//!    runtime sends (every sub-field nullable); the `proof` module holds the
//!    canonical shape (every field present). The only path between them is
//!    the `convert` module.
//!
//! 3. **One default table.** Absent wire fields resolve through
//!    [`convert::DefaultPolicy`]. No inline fallbacks anywhere else.
//!
//! 4. **Coded errors.** Every failure the bridge can surface is a
//!    [`BridgeError`] variant with a stable code string.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `mopro-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod convert;
pub mod error;
pub mod proof;
pub mod wire;

// Re-export primary types for ergonomic imports.
pub use convert::{to_canonical, to_wire, Canonicalize, DefaultPolicy, StandardDefaults};
pub use error::{BridgeError, EngineError, FileKind, ProofSystem, Rejection};
pub use proof::{
    CircomProof, CircomProofResult, FieldElement, Fq2, G1, G2, Halo2ProofResult, ProofLib,
};
pub use wire::{WireCircomProof, WireCircomProofResult, WireG1, WireG2, WireProofLib};
