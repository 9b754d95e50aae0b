//! # Mock Engines
//!
//! Deterministic, transparent engines for development and testing. Every
//! "proof" is built from SHA-256 digests of the key files and inputs, so it
//! verifies exactly when the same artifacts are presented again.
//!
//! ## Security Warning
//!
//! **NOT PRIVATE.** Anyone holding the inputs can recompute a mock proof.
//! These engines exist so the command surface can be exercised without
//! native prover libraries. They MUST NOT back a deployment that needs
//! zero-knowledge or soundness guarantees.
//!
//! ## Binding
//!
//! - Circom: `c` commits to the zkey, the backend choice, `a`, `b` and the
//!   public inputs. A proof generated with one [`ProofLib`] does not verify
//!   under the other.
//! - Halo2: the proof commits to the SRS and the serialized inputs.
//! - Noir: the proof is `digest || inputs_json`, where the digest commits
//!   to the verification key, the on-chain flag and the inputs.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use mopro_core::{
    CircomProof, CircomProofResult, EngineError, FieldElement, Halo2ProofResult, ProofLib, G1, G2,
};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::traits::{CircomEngine, Halo2Engine, NoirEngine, NoirOptions};

const DIGEST_LEN: usize = 32;

/// Domain-separated SHA-256 over length-prefixed parts.
struct Transcript(Sha256);

impl Transcript {
    fn new(domain: &str) -> Self {
        let mut t = Self(Sha256::new());
        t.append(domain.as_bytes());
        t
    }

    fn append(&mut self, bytes: &[u8]) -> &mut Self {
        self.0.update((bytes.len() as u64).to_be_bytes());
        self.0.update(bytes);
        self
    }

    fn finish(&mut self) -> [u8; DIGEST_LEN] {
        std::mem::take(&mut self.0).finalize().into()
    }
}

fn read(path: &Path) -> Result<Vec<u8>, EngineError> {
    std::fs::read(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Two field elements from one digest, each the decimal of 16 bytes.
fn field_pair(digest: &[u8; DIGEST_LEN]) -> [FieldElement; 2] {
    let mut hi = [0u8; 16];
    let mut lo = [0u8; 16];
    hi.copy_from_slice(&digest[..16]);
    lo.copy_from_slice(&digest[16..]);
    [
        FieldElement::new(u128::from_be_bytes(hi).to_string()),
        FieldElement::new(u128::from_be_bytes(lo).to_string()),
    ]
}

fn affine_g1(digest: &[u8; DIGEST_LEN]) -> G1 {
    let [x, y] = field_pair(digest);
    G1 {
        x,
        y,
        z: FieldElement::one(),
    }
}

fn flatten_signal(name: &str, value: &Value, out: &mut Vec<FieldElement>) -> Result<(), EngineError> {
    match value {
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            out.push(FieldElement::new(s.as_str()));
            Ok(())
        }
        Value::Number(n) if n.is_u64() => {
            out.push(FieldElement::new(n.to_string()));
            Ok(())
        }
        Value::Array(items) => {
            for item in items {
                flatten_signal(name, item, out)?;
            }
            Ok(())
        }
        other => Err(EngineError::InvalidInput(format!(
            "signal {name:?} is not a non-negative decimal: {other}"
        ))),
    }
}

/// Parse Circom inputs and flatten them into public signals in key order.
///
/// The mock treats every input signal as public.
fn circom_signals(circuit_inputs: &str) -> Result<Vec<FieldElement>, EngineError> {
    let parsed: Value = serde_json::from_str(circuit_inputs)
        .map_err(|e| EngineError::InvalidInput(format!("circuit inputs are not JSON: {e}")))?;
    let Value::Object(map) = parsed else {
        return Err(EngineError::InvalidInput(
            "circuit inputs must be a JSON object of named signals".into(),
        ));
    };
    let sorted: BTreeMap<_, _> = map.into_iter().collect();
    let mut signals = Vec::new();
    for (name, value) in &sorted {
        flatten_signal(name, value, &mut signals)?;
    }
    Ok(signals)
}

fn circom_commitment(
    zkey: &[u8],
    proof_lib: ProofLib,
    a: &G1,
    b: &G2,
    inputs: &[FieldElement],
) -> G1 {
    let mut t = Transcript::new("mopro.mock.circom.c");
    t.append(zkey).append(proof_lib.as_str().as_bytes());
    for coord in [&a.x, &a.y, &a.z] {
        t.append(coord.as_str().as_bytes());
    }
    for pair in [&b.x, &b.y, &b.z] {
        t.append(pair[0].as_str().as_bytes())
            .append(pair[1].as_str().as_bytes());
    }
    for input in inputs {
        t.append(input.as_str().as_bytes());
    }
    affine_g1(&t.finish())
}

fn circom_prove(
    zkey: &[u8],
    graph: Option<&[u8]>,
    circuit_inputs: &str,
    proof_lib: ProofLib,
) -> Result<CircomProofResult, EngineError> {
    let inputs = circom_signals(circuit_inputs)?;

    let mut witness = Transcript::new("mopro.mock.circom.witness");
    witness.append(graph.unwrap_or_default());
    for input in &inputs {
        witness.append(input.as_str().as_bytes());
    }
    let witness = witness.finish();

    let a = affine_g1(&Transcript::new("mopro.mock.circom.a").append(zkey).append(&witness).finish());
    let b_x = field_pair(&Transcript::new("mopro.mock.circom.b.x").append(zkey).append(&witness).finish());
    let b_y = field_pair(&Transcript::new("mopro.mock.circom.b.y").append(zkey).append(&witness).finish());
    let b = G2 {
        x: b_x,
        y: b_y,
        z: [FieldElement::one(), FieldElement::zero()],
    };
    let c = circom_commitment(zkey, proof_lib, &a, &b, &inputs);

    Ok(CircomProofResult {
        proof: CircomProof {
            a,
            b,
            c,
            protocol: "groth16".into(),
            curve: "bn128".into(),
        },
        inputs,
    })
}

/// Mock Groth16 engine for Circom circuits.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockCircomEngine;

impl CircomEngine for MockCircomEngine {
    fn generate_proof(
        &self,
        zkey_path: &Path,
        circuit_inputs: &str,
        proof_lib: ProofLib,
    ) -> Result<CircomProofResult, EngineError> {
        let zkey = read(zkey_path)?;
        circom_prove(&zkey, None, circuit_inputs, proof_lib)
    }

    /// Graph proving always uses the Arkworks backend.
    fn prove_with_graph(
        &self,
        graph_path: &Path,
        circuit_inputs: &str,
        zkey_path: &Path,
    ) -> Result<CircomProofResult, EngineError> {
        let graph = read(graph_path)?;
        let zkey = read(zkey_path)?;
        circom_prove(&zkey, Some(&graph), circuit_inputs, ProofLib::Arkworks)
    }

    fn verify_proof(
        &self,
        zkey_path: &Path,
        proof_result: &CircomProofResult,
        proof_lib: ProofLib,
    ) -> Result<bool, EngineError> {
        let zkey = read(zkey_path)?;
        let proof = &proof_result.proof;
        let expected = circom_commitment(&zkey, proof_lib, &proof.a, &proof.b, &proof_result.inputs);
        Ok(expected == proof.c)
    }
}

/// Mock Halo2 engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockHalo2Engine;

fn halo2_proof(srs: &[u8], public_inputs: &[u8]) -> [u8; DIGEST_LEN] {
    Transcript::new("mopro.mock.halo2.proof")
        .append(srs)
        .append(public_inputs)
        .finish()
}

impl Halo2Engine for MockHalo2Engine {
    fn generate_proof(
        &self,
        srs_path: &Path,
        pk_path: &Path,
        circuit_inputs: &HashMap<String, Vec<String>>,
    ) -> Result<Halo2ProofResult, EngineError> {
        let srs = read(srs_path)?;
        read(pk_path)?;
        let sorted: BTreeMap<_, _> = circuit_inputs.iter().collect();
        let inputs = serde_json::to_vec(&sorted)
            .map_err(|e| EngineError::Prover(format!("failed to serialize inputs: {e}")))?;
        let proof = halo2_proof(&srs, &inputs).to_vec();
        Ok(Halo2ProofResult { proof, inputs })
    }

    fn verify_proof(
        &self,
        srs_path: &Path,
        vk_path: &Path,
        proof: &[u8],
        public_inputs: &[u8],
    ) -> Result<bool, EngineError> {
        let srs = read(srs_path)?;
        read(vk_path)?;
        if proof.len() != DIGEST_LEN {
            return Err(EngineError::Verifier(format!(
                "malformed proof: expected {DIGEST_LEN} bytes, got {}",
                proof.len()
            )));
        }
        Ok(halo2_proof(&srs, public_inputs).as_slice() == proof)
    }
}

/// Mock Noir engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockNoirEngine;

impl MockNoirEngine {
    fn derive_vk(circuit: &[u8], srs: Option<&[u8]>, options: NoirOptions) -> Vec<u8> {
        Transcript::new("mopro.mock.noir.vk")
            .append(circuit)
            .append(srs.unwrap_or_default())
            .append(&[u8::from(options.on_chain)])
            .finish()
            .to_vec()
    }

    fn digest(vk: &[u8], options: NoirOptions, inputs_json: &[u8]) -> [u8; DIGEST_LEN] {
        Transcript::new("mopro.mock.noir.proof")
            .append(vk)
            .append(&[u8::from(options.on_chain)])
            .append(inputs_json)
            .finish()
    }

    fn resolve_vk(
        circuit_path: &Path,
        srs_path: Option<&Path>,
        vk: &[u8],
        options: NoirOptions,
    ) -> Result<Vec<u8>, EngineError> {
        let circuit = read(circuit_path)?;
        if !vk.is_empty() {
            return Ok(vk.to_vec());
        }
        let srs = srs_path.map(read).transpose()?;
        Ok(Self::derive_vk(&circuit, srs.as_deref(), options))
    }
}

impl NoirEngine for MockNoirEngine {
    /// An empty `vk` means "derive it from the circuit".
    fn generate_proof(
        &self,
        circuit_path: &Path,
        srs_path: Option<&Path>,
        inputs: &[String],
        vk: &[u8],
        options: NoirOptions,
    ) -> Result<Vec<u8>, EngineError> {
        if let Some(bad) = inputs
            .iter()
            .find(|i| i.is_empty() || !i.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err(EngineError::InvalidInput(format!(
                "input {bad:?} is not a non-negative decimal"
            )));
        }
        let vk = Self::resolve_vk(circuit_path, srs_path, vk, options)?;
        let inputs_json = serde_json::to_vec(inputs)
            .map_err(|e| EngineError::Prover(format!("failed to serialize inputs: {e}")))?;
        let mut proof = Self::digest(&vk, options, &inputs_json).to_vec();
        proof.extend_from_slice(&inputs_json);
        Ok(proof)
    }

    /// An empty `vk` means "derive it from the circuit" without an SRS, so
    /// a proof made with `srs_path` set needs the SRS-derived key here.
    fn verify_proof(
        &self,
        circuit_path: &Path,
        proof: &[u8],
        vk: &[u8],
        options: NoirOptions,
    ) -> Result<bool, EngineError> {
        let vk = Self::resolve_vk(circuit_path, None, vk, options)?;
        if proof.len() < DIGEST_LEN {
            return Err(EngineError::Verifier(format!(
                "malformed proof: {} bytes is shorter than the {DIGEST_LEN}-byte commitment",
                proof.len()
            )));
        }
        let (commitment, inputs_json) = proof.split_at(DIGEST_LEN);
        serde_json::from_slice::<Vec<String>>(inputs_json)
            .map_err(|e| EngineError::Verifier(format!("malformed proof inputs: {e}")))?;
        Ok(Self::digest(&vk, options, inputs_json).as_slice() == commitment)
    }

    fn verification_key(
        &self,
        circuit_path: &Path,
        srs_path: Option<&Path>,
        options: NoirOptions,
    ) -> Result<Vec<u8>, EngineError> {
        Self::resolve_vk(circuit_path, srs_path, &[], options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn artifact(contents: &[u8]) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents).unwrap();
        f
    }

    const MULTIPLIER_INPUTS: &str = r#"{"b": ["4"], "a": ["3"]}"#;

    #[test]
    fn circom_proof_verifies_with_same_backend() {
        let zkey = artifact(b"multiplier2_final.zkey");
        let engine = MockCircomEngine;
        let result = engine
            .generate_proof(zkey.path(), MULTIPLIER_INPUTS, ProofLib::Rapidsnark)
            .unwrap();
        assert_eq!(result.proof.protocol, "groth16");
        assert_eq!(result.proof.curve, "bn128");
        assert!(engine
            .verify_proof(zkey.path(), &result, ProofLib::Rapidsnark)
            .unwrap());
    }

    #[test]
    fn circom_proof_rejects_other_backend() {
        let zkey = artifact(b"multiplier2_final.zkey");
        let engine = MockCircomEngine;
        let result = engine
            .generate_proof(zkey.path(), MULTIPLIER_INPUTS, ProofLib::Rapidsnark)
            .unwrap();
        assert!(!engine
            .verify_proof(zkey.path(), &result, ProofLib::Arkworks)
            .unwrap());
    }

    #[test]
    fn circom_signals_follow_key_order() {
        let zkey = artifact(b"zkey");
        let result = MockCircomEngine
            .generate_proof(zkey.path(), MULTIPLIER_INPUTS, ProofLib::Arkworks)
            .unwrap();
        assert_eq!(result.inputs, vec![FieldElement::new("3"), FieldElement::new("4")]);
    }

    #[test]
    fn tampered_public_input_fails_verification() {
        let zkey = artifact(b"zkey");
        let engine = MockCircomEngine;
        let mut result = engine
            .generate_proof(zkey.path(), MULTIPLIER_INPUTS, ProofLib::Arkworks)
            .unwrap();
        result.inputs[0] = FieldElement::new("5");
        assert!(!engine.verify_proof(zkey.path(), &result, ProofLib::Arkworks).unwrap());
    }

    #[test]
    fn graph_proof_verifies_with_arkworks() {
        let zkey = artifact(b"zkey");
        let graph = artifact(b"multiplier2.bin");
        let engine = MockCircomEngine;
        let result = engine
            .prove_with_graph(graph.path(), MULTIPLIER_INPUTS, zkey.path())
            .unwrap();
        assert!(engine.verify_proof(zkey.path(), &result, ProofLib::Arkworks).unwrap());
    }

    #[test]
    fn non_numeric_circom_input_is_invalid() {
        let zkey = artifact(b"zkey");
        let err = MockCircomEngine
            .generate_proof(zkey.path(), r#"{"a": ["three"]}"#, ProofLib::Arkworks)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));

        let err = MockCircomEngine
            .generate_proof(zkey.path(), "not json", ProofLib::Arkworks)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn missing_zkey_is_io_error() {
        let err = MockCircomEngine
            .generate_proof(Path::new("/does/not/exist.zkey"), "{}", ProofLib::Arkworks)
            .unwrap_err();
        assert!(matches!(err, EngineError::Io { .. }));
    }

    #[test]
    fn halo2_round_trip_and_tamper() {
        let srs = artifact(b"plonk_fibonacci_srs.bin");
        let pk = artifact(b"plonk_fibonacci_pk.bin");
        let vk = artifact(b"plonk_fibonacci_vk.bin");
        let mut inputs = HashMap::new();
        inputs.insert("out".to_string(), vec!["55".to_string()]);

        let engine = MockHalo2Engine;
        let result = engine.generate_proof(srs.path(), pk.path(), &inputs).unwrap();
        assert_eq!(result.proof.len(), 32);
        assert!(engine
            .verify_proof(srs.path(), vk.path(), &result.proof, &result.inputs)
            .unwrap());
        assert!(!engine
            .verify_proof(srs.path(), vk.path(), &result.proof, b"{\"out\":[\"56\"]}")
            .unwrap());
    }

    #[test]
    fn halo2_truncated_proof_is_an_error_not_false() {
        let srs = artifact(b"srs");
        let vk = artifact(b"vk");
        let err = MockHalo2Engine
            .verify_proof(srs.path(), vk.path(), &[1, 2, 3], &[])
            .unwrap_err();
        assert!(matches!(err, EngineError::Verifier(_)));
    }

    #[test]
    fn noir_proof_verifies_with_derived_key() {
        let circuit = artifact(br#"{"noir_version":"1.0.0","bytecode":"H4sI"}"#);
        let engine = MockNoirEngine;
        let options = NoirOptions {
            on_chain: true,
            low_memory_mode: false,
        };
        let vk = engine.verification_key(circuit.path(), None, options).unwrap();
        let inputs = vec!["5".to_string(), "3".to_string()];
        let proof = engine
            .generate_proof(circuit.path(), None, &inputs, &vk, options)
            .unwrap();
        assert!(engine.verify_proof(circuit.path(), &proof, &vk, options).unwrap());

        let off_chain = NoirOptions {
            on_chain: false,
            ..options
        };
        assert!(!engine.verify_proof(circuit.path(), &proof, &vk, off_chain).unwrap());
    }

    #[test]
    fn noir_srs_bound_proof_needs_the_srs_derived_key() {
        let circuit = artifact(b"noir_keccak256");
        let srs = artifact(b"bn254 g1 points");
        let engine = MockNoirEngine;
        let options = NoirOptions::default();
        let inputs = vec!["7".to_string()];
        let proof = engine
            .generate_proof(circuit.path(), Some(srs.path()), &inputs, &[], options)
            .unwrap();

        assert!(!engine.verify_proof(circuit.path(), &proof, &[], options).unwrap());

        let vk = engine
            .verification_key(circuit.path(), Some(srs.path()), options)
            .unwrap();
        assert!(engine.verify_proof(circuit.path(), &proof, &vk, options).unwrap());
    }

    #[test]
    fn noir_short_proof_is_malformed() {
        let circuit = artifact(b"circuit");
        let err = MockNoirEngine
            .verify_proof(circuit.path(), &[0u8; 4], &[], NoirOptions::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::Verifier(_)));
    }

    #[test]
    fn noir_low_memory_mode_does_not_change_output() {
        let circuit = artifact(b"circuit");
        let engine = MockNoirEngine;
        let fast = engine
            .verification_key(circuit.path(), None, NoirOptions::default())
            .unwrap();
        let lean = engine
            .verification_key(
                circuit.path(),
                None,
                NoirOptions {
                    on_chain: false,
                    low_memory_mode: true,
                },
            )
            .unwrap();
        assert_eq!(fast, lean);
    }
}
