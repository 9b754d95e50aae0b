//! # Engine Traits
//!
//! The interface the bridge expects from a proving backend, one trait per
//! proof system. Implementations wrap native prover libraries; the bridge
//! never looks inside.
//!
//! ## Contract
//!
//! - All methods are blocking and may take seconds. The dispatcher calls
//!   them from a blocking worker, never from an async task directly.
//! - Paths handed in have already passed the bridge's existence checks
//!   where the command requires them, and are absolute.
//! - `verify_*` returns `Ok(false)` for a proof that does not check out and
//!   reserves `Err` for operational failures.
//! - Implementations must be `Send + Sync`; one instance serves every
//!   in-flight call concurrently.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use mopro_core::{CircomProofResult, EngineError, Halo2ProofResult, ProofLib};

/// Groth16 proving over Circom circuits.
pub trait CircomEngine: Send + Sync {
    /// Prove from a zkey and a JSON object of named input arrays, computing
    /// the witness with the circuit's bundled witness generator.
    fn generate_proof(
        &self,
        zkey_path: &Path,
        circuit_inputs: &str,
        proof_lib: ProofLib,
    ) -> Result<CircomProofResult, EngineError>;

    /// Prove using a precompiled witness graph instead of the bundled
    /// witness generator.
    fn prove_with_graph(
        &self,
        graph_path: &Path,
        circuit_inputs: &str,
        zkey_path: &Path,
    ) -> Result<CircomProofResult, EngineError>;

    /// Verify a proof against the verifying key embedded in the zkey.
    ///
    /// `proof_lib` must match the backend that generated the proof.
    fn verify_proof(
        &self,
        zkey_path: &Path,
        proof_result: &CircomProofResult,
        proof_lib: ProofLib,
    ) -> Result<bool, EngineError>;
}

/// Polynomial-commitment proving keyed by a structured reference string.
pub trait Halo2Engine: Send + Sync {
    fn generate_proof(
        &self,
        srs_path: &Path,
        pk_path: &Path,
        circuit_inputs: &HashMap<String, Vec<String>>,
    ) -> Result<Halo2ProofResult, EngineError>;

    fn verify_proof(
        &self,
        srs_path: &Path,
        vk_path: &Path,
        proof: &[u8],
        public_inputs: &[u8],
    ) -> Result<bool, EngineError>;
}

/// Execution flags shared by every Noir call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoirOptions {
    /// Emit proofs and keys in the format on-chain verifiers expect.
    pub on_chain: bool,
    /// Trade speed for a smaller peak memory footprint.
    pub low_memory_mode: bool,
}

/// General-purpose proving over compiled Noir circuits.
///
/// Paths are not pre-checked by the bridge for this system; the engine
/// reports missing files itself.
pub trait NoirEngine: Send + Sync {
    fn generate_proof(
        &self,
        circuit_path: &Path,
        srs_path: Option<&Path>,
        inputs: &[String],
        vk: &[u8],
        options: NoirOptions,
    ) -> Result<Vec<u8>, EngineError>;

    /// Verify `proof` against `vk`.
    ///
    /// There is no SRS argument: an empty `vk` is derived from the circuit
    /// alone. A proof generated against an SRS only verifies under the key
    /// returned by [`NoirEngine::verification_key`] for that same SRS.
    fn verify_proof(
        &self,
        circuit_path: &Path,
        proof: &[u8],
        vk: &[u8],
        options: NoirOptions,
    ) -> Result<bool, EngineError>;

    fn verification_key(
        &self,
        circuit_path: &Path,
        srs_path: Option<&Path>,
        options: NoirOptions,
    ) -> Result<Vec<u8>, EngineError>;
}

/// One engine per proof system, shared across every in-flight call.
#[derive(Clone)]
pub struct Engines {
    pub circom: Arc<dyn CircomEngine>,
    pub halo2: Arc<dyn Halo2Engine>,
    pub noir: Arc<dyn NoirEngine>,
}

impl Engines {
    pub fn new(
        circom: impl CircomEngine + 'static,
        halo2: impl Halo2Engine + 'static,
        noir: impl NoirEngine + 'static,
    ) -> Self {
        Self {
            circom: Arc::new(circom),
            halo2: Arc::new(halo2),
            noir: Arc::new(noir),
        }
    }

    /// The deterministic mock engines for every system.
    #[cfg(feature = "mock")]
    pub fn mock() -> Self {
        use crate::mock::{MockCircomEngine, MockHalo2Engine, MockNoirEngine};
        Self::new(MockCircomEngine, MockHalo2Engine, MockNoirEngine)
    }

    /// Replace the Circom engine.
    pub fn with_circom(mut self, engine: impl CircomEngine + 'static) -> Self {
        self.circom = Arc::new(engine);
        self
    }

    /// Replace the Halo2 engine.
    pub fn with_halo2(mut self, engine: impl Halo2Engine + 'static) -> Self {
        self.halo2 = Arc::new(engine);
        self
    }

    /// Replace the Noir engine.
    pub fn with_noir(mut self, engine: impl NoirEngine + 'static) -> Self {
        self.noir = Arc::new(engine);
        self
    }
}

impl fmt::Debug for Engines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engines").finish_non_exhaustive()
    }
}
