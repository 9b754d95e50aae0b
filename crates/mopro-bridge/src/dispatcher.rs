//! # Command Dispatcher
//!
//! Typed handlers for the eight proof commands. Every handler follows the
//! same shape:
//!
//! 1. check required files, in argument order (first miss wins);
//! 2. convert host-shaped inputs to canonical form;
//! 3. run the engine on tokio's blocking pool;
//! 4. convert the output back to host shape;
//! 5. map any engine failure, including a panic, to the command's coded
//!    error via [`Command::engine_failure`].
//!
//! Nothing is retried and nothing is partially returned. The dispatcher
//! holds no per-call state, so one instance can serve any number of
//! concurrent calls.
//!
//! Dropping a handler's future does not stop an engine computation that
//! has already started on the blocking pool.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Instant;

use mopro_core::{
    BridgeError, Canonicalize, EngineError, FileKind, Halo2ProofResult, ProofLib,
    WireCircomProofResult,
};
use mopro_engine::{Engines, NoirOptions};
use tracing::Instrument;

use crate::command::Command;
use crate::precondition::require_file_exists;

/// Async front end over one set of [`Engines`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    engines: Engines,
}

impl Dispatcher {
    pub fn new(engines: Engines) -> Self {
        Self { engines }
    }

    pub fn engines(&self) -> &Engines {
        &self.engines
    }

    /// Generate a Circom proof from a zkey and JSON-encoded named inputs.
    pub async fn generate_circom_proof(
        &self,
        zkey_path: impl AsRef<Path>,
        circuit_inputs: impl Into<String>,
        proof_lib: ProofLib,
    ) -> Result<WireCircomProofResult, BridgeError> {
        let zkey_path = zkey_path.as_ref().to_path_buf();
        let circuit_inputs = circuit_inputs.into();
        observe(Command::GenerateCircomProof, async {
            let zkey = require_file_exists(&zkey_path, FileKind::Zkey)?;
            let engine = self.engines.circom.clone();
            tracing::debug!(proof_lib = %proof_lib, "generating circom proof");
            let result = run_blocking(move || {
                engine.generate_proof(&zkey, &circuit_inputs, proof_lib)
            })
            .await
            .map_err(|source| Command::GenerateCircomProof.engine_failure(source))?;
            Ok(result.into())
        })
        .await
    }

    /// Generate a Circom proof using a precompiled witness graph.
    pub async fn circom_prove(
        &self,
        graph_path: impl AsRef<Path>,
        circuit_inputs: impl Into<String>,
        zkey_path: impl AsRef<Path>,
    ) -> Result<WireCircomProofResult, BridgeError> {
        let graph_path = graph_path.as_ref().to_path_buf();
        let zkey_path = zkey_path.as_ref().to_path_buf();
        let circuit_inputs = circuit_inputs.into();
        observe(Command::CircomProve, async {
            let graph = require_file_exists(&graph_path, FileKind::Graph)?;
            let zkey = require_file_exists(&zkey_path, FileKind::Zkey)?;
            let engine = self.engines.circom.clone();
            let result = run_blocking(move || {
                engine.prove_with_graph(&graph, &circuit_inputs, &zkey)
            })
            .await
            .map_err(|source| Command::CircomProve.engine_failure(source))?;
            Ok(result.into())
        })
        .await
    }

    /// Verify a Circom proof.
    ///
    /// Absent fields of `proof_result` are filled from the standard default
    /// table before verification. `proof_lib` is passed to the engine as
    /// given and must be the backend that produced the proof; verifying
    /// with the other backend is a caller error and yields `false` or an
    /// engine failure, depending on the backend.
    pub async fn verify_circom_proof(
        &self,
        zkey_path: impl AsRef<Path>,
        proof_result: WireCircomProofResult,
        proof_lib: ProofLib,
    ) -> Result<bool, BridgeError> {
        let zkey_path = zkey_path.as_ref().to_path_buf();
        observe(Command::VerifyCircomProof, async {
            let zkey = require_file_exists(&zkey_path, FileKind::Zkey)?;
            let proof_result = proof_result.to_canonical();
            let engine = self.engines.circom.clone();
            tracing::debug!(proof_lib = %proof_lib, "verifying circom proof");
            run_blocking(move || engine.verify_proof(&zkey, &proof_result, proof_lib))
                .await
                .map_err(|source| Command::VerifyCircomProof.engine_failure(source))
        })
        .await
    }

    /// Generate a Halo2 proof. Inputs are a map, not a JSON string.
    pub async fn generate_halo2_proof(
        &self,
        srs_path: impl AsRef<Path>,
        pk_path: impl AsRef<Path>,
        circuit_inputs: HashMap<String, Vec<String>>,
    ) -> Result<Halo2ProofResult, BridgeError> {
        let srs_path = srs_path.as_ref().to_path_buf();
        let pk_path = pk_path.as_ref().to_path_buf();
        observe(Command::GenerateHalo2Proof, async {
            let srs = require_file_exists(&srs_path, FileKind::Srs)?;
            let pk = require_file_exists(&pk_path, FileKind::ProvingKey)?;
            let engine = self.engines.halo2.clone();
            run_blocking(move || engine.generate_proof(&srs, &pk, &circuit_inputs))
                .await
                .map_err(|source| Command::GenerateHalo2Proof.engine_failure(source))
        })
        .await
    }

    pub async fn verify_halo2_proof(
        &self,
        srs_path: impl AsRef<Path>,
        vk_path: impl AsRef<Path>,
        proof: Vec<u8>,
        public_input: Vec<u8>,
    ) -> Result<bool, BridgeError> {
        let srs_path = srs_path.as_ref().to_path_buf();
        let vk_path = vk_path.as_ref().to_path_buf();
        observe(Command::VerifyHalo2Proof, async {
            let srs = require_file_exists(&srs_path, FileKind::Srs)?;
            let vk = require_file_exists(&vk_path, FileKind::VerificationKey)?;
            let engine = self.engines.halo2.clone();
            run_blocking(move || engine.verify_proof(&srs, &vk, &proof, &public_input))
                .await
                .map_err(|source| Command::VerifyHalo2Proof.engine_failure(source))
        })
        .await
    }

    /// Generate a Noir proof. Paths are left for the engine to check.
    pub async fn generate_noir_proof(
        &self,
        circuit_path: impl AsRef<Path>,
        srs_path: Option<PathBuf>,
        inputs: Vec<String>,
        on_chain: bool,
        vk: Vec<u8>,
        low_memory_mode: bool,
    ) -> Result<Vec<u8>, BridgeError> {
        let circuit_path = circuit_path.as_ref().to_path_buf();
        let options = NoirOptions {
            on_chain,
            low_memory_mode,
        };
        observe(Command::GenerateNoirProof, async {
            let engine = self.engines.noir.clone();
            run_blocking(move || {
                engine.generate_proof(&circuit_path, srs_path.as_deref(), &inputs, &vk, options)
            })
            .await
            .map_err(|source| Command::GenerateNoirProof.engine_failure(source))
        })
        .await
    }

    pub async fn verify_noir_proof(
        &self,
        circuit_path: impl AsRef<Path>,
        proof: Vec<u8>,
        on_chain: bool,
        vk: Vec<u8>,
        low_memory_mode: bool,
    ) -> Result<bool, BridgeError> {
        let circuit_path = circuit_path.as_ref().to_path_buf();
        let options = NoirOptions {
            on_chain,
            low_memory_mode,
        };
        observe(Command::VerifyNoirProof, async {
            let engine = self.engines.noir.clone();
            run_blocking(move || engine.verify_proof(&circuit_path, &proof, &vk, options))
                .await
                .map_err(|source| Command::VerifyNoirProof.engine_failure(source))
        })
        .await
    }

    /// Derive the verification key for a Noir circuit.
    pub async fn get_noir_verification_key(
        &self,
        circuit_path: impl AsRef<Path>,
        srs_path: Option<PathBuf>,
        on_chain: bool,
        low_memory_mode: bool,
    ) -> Result<Vec<u8>, BridgeError> {
        let circuit_path = circuit_path.as_ref().to_path_buf();
        let options = NoirOptions {
            on_chain,
            low_memory_mode,
        };
        observe(Command::GetNoirVerificationKey, async {
            let engine = self.engines.noir.clone();
            run_blocking(move || {
                engine.verification_key(&circuit_path, srs_path.as_deref(), options)
            })
            .await
            .map_err(|source| Command::GetNoirVerificationKey.engine_failure(source))
        })
        .await
    }
}

/// Run one command inside its span and log the outcome.
async fn observe<T, F>(command: Command, fut: F) -> Result<T, BridgeError>
where
    F: Future<Output = Result<T, BridgeError>>,
{
    let span = tracing::info_span!(
        "command",
        command = command.name(),
        system = %command.system()
    );
    async move {
        let started = Instant::now();
        tracing::debug!("dispatching");
        let result = fut.await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => tracing::info!(elapsed_ms, "command succeeded"),
            Err(e) => tracing::warn!(code = e.code(), elapsed_ms, "command failed: {e}"),
        }
        result
    }
    .instrument(span)
    .await
}

/// Run an engine call on the blocking pool. A panic or an aborted task
/// comes back as [`EngineError::Panicked`].
async fn run_blocking<T, F>(f: F) -> Result<T, EngineError>
where
    F: FnOnce() -> Result<T, EngineError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result,
        Err(join_err) if join_err.is_panic() => {
            let payload = join_err.into_panic();
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "engine panicked".to_string());
            Err(EngineError::Panicked(message))
        }
        Err(join_err) => Err(EngineError::Panicked(join_err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn run_blocking_passes_results_through() {
        let value = run_blocking(|| Ok::<_, EngineError>(42)).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn run_blocking_converts_panics() {
        let err = run_blocking::<(), _>(|| panic!("ark-groth16 exploded"))
            .await
            .unwrap_err();
        match err {
            EngineError::Panicked(msg) => assert_eq!(msg, "ark-groth16 exploded"),
            other => panic!("expected Panicked, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn run_blocking_keeps_engine_errors() {
        let err = run_blocking::<(), _>(|| Err(EngineError::Witness("x".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Witness(_)));
    }
}
