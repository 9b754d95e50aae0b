//! # Command Table
//!
//! The one canonical table of proof commands: host-facing name, proof
//! system, positional arity, and the error code raised when the engine
//! fails. Host bindings stay thin; they forward a name and a JSON array of
//! positional arguments to [`dispatch`] and hand back either the encoded
//! result or a [`mopro_core::Rejection`].
//!
//! | Name                     | Args | System | Failure code          |
//! |--------------------------|------|--------|-----------------------|
//! | `generateCircomProof`    | 3    | circom | `GenerateProofFailed` |
//! | `circomProve`            | 3    | circom | `CircomProveFailed`   |
//! | `verifyCircomProof`      | 3    | circom | `VerifyProofFailed`   |
//! | `generateHalo2Proof`     | 3    | halo2  | `GenerateProofFailed` |
//! | `verifyHalo2Proof`       | 4    | halo2  | `VerifyProofFailed`   |
//! | `generateNoirProof`      | 6    | noir   | `GenerateProofFailed` |
//! | `verifyNoirProof`        | 5    | noir   | `VerifyProofFailed`   |
//! | `getNoirVerificationKey` | 4    | noir   | `GenerateProofFailed` |

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use mopro_core::{BridgeError, EngineError, ProofSystem, WireCircomProofResult, WireProofLib};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::dispatcher::Dispatcher;

/// A proof command from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    GenerateCircomProof,
    CircomProve,
    VerifyCircomProof,
    GenerateHalo2Proof,
    VerifyHalo2Proof,
    GenerateNoirProof,
    VerifyNoirProof,
    GetNoirVerificationKey,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Self::GenerateCircomProof,
        Self::CircomProve,
        Self::VerifyCircomProof,
        Self::GenerateHalo2Proof,
        Self::VerifyHalo2Proof,
        Self::GenerateNoirProof,
        Self::VerifyNoirProof,
        Self::GetNoirVerificationKey,
    ];

    /// Host-facing command name.
    pub fn name(self) -> &'static str {
        match self {
            Self::GenerateCircomProof => "generateCircomProof",
            Self::CircomProve => "circomProve",
            Self::VerifyCircomProof => "verifyCircomProof",
            Self::GenerateHalo2Proof => "generateHalo2Proof",
            Self::VerifyHalo2Proof => "verifyHalo2Proof",
            Self::GenerateNoirProof => "generateNoirProof",
            Self::VerifyNoirProof => "verifyNoirProof",
            Self::GetNoirVerificationKey => "getNoirVerificationKey",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn system(self) -> ProofSystem {
        match self {
            Self::GenerateCircomProof | Self::CircomProve | Self::VerifyCircomProof => {
                ProofSystem::Circom
            }
            Self::GenerateHalo2Proof | Self::VerifyHalo2Proof => ProofSystem::Halo2,
            Self::GenerateNoirProof | Self::VerifyNoirProof | Self::GetNoirVerificationKey => {
                ProofSystem::Noir
            }
        }
    }

    /// Number of positional arguments.
    pub fn arity(self) -> usize {
        match self {
            Self::GenerateCircomProof
            | Self::CircomProve
            | Self::VerifyCircomProof
            | Self::GenerateHalo2Proof => 3,
            Self::VerifyHalo2Proof | Self::GetNoirVerificationKey => 4,
            Self::VerifyNoirProof => 5,
            Self::GenerateNoirProof => 6,
        }
    }

    /// Code raised when the engine fails during this command.
    pub fn failure_code(self) -> &'static str {
        match self {
            Self::CircomProve => "CircomProveFailed",
            Self::VerifyCircomProof | Self::VerifyHalo2Proof | Self::VerifyNoirProof => {
                "VerifyProofFailed"
            }
            Self::GenerateCircomProof
            | Self::GenerateHalo2Proof
            | Self::GenerateNoirProof
            | Self::GetNoirVerificationKey => "GenerateProofFailed",
        }
    }
}

impl Command {
    /// Wrap an engine failure in this command's coded error.
    pub fn engine_failure(self, source: EngineError) -> BridgeError {
        let system = self.system();
        match self {
            Self::CircomProve => BridgeError::CircomProveFailed { source },
            Self::VerifyCircomProof | Self::VerifyHalo2Proof | Self::VerifyNoirProof => {
                BridgeError::VerifyProofFailed { system, source }
            }
            Self::GetNoirVerificationKey => BridgeError::GenerateProofFailed {
                system,
                operation: "verification key generation",
                source,
            },
            Self::GenerateCircomProof | Self::GenerateHalo2Proof | Self::GenerateNoirProof => {
                BridgeError::GenerateProofFailed {
                    system,
                    operation: "proof generation",
                    source,
                }
            }
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| BridgeError::UnknownCommand { name: s.to_string() })
    }
}

/// Decode a positional argument array into a typed tuple.
pub(crate) fn decode_args<T: DeserializeOwned>(
    command: &str,
    arity: usize,
    args: Vec<Value>,
) -> Result<T, BridgeError> {
    if args.len() != arity {
        return Err(BridgeError::InvalidArguments {
            command: command.to_string(),
            reason: format!("expected {arity} positional arguments, got {}", args.len()),
        });
    }
    serde_json::from_value(Value::Array(args)).map_err(|e| BridgeError::InvalidArguments {
        command: command.to_string(),
        reason: e.to_string(),
    })
}

pub(crate) fn encode<T: Serialize>(command: &str, value: T) -> Result<Value, BridgeError> {
    serde_json::to_value(value).map_err(|e| BridgeError::EncodingFailed {
        command: command.to_string(),
        reason: e.to_string(),
    })
}

/// Decode `args`, run `command` on `dispatcher`, and encode the result.
///
/// Argument errors are reported before any precondition or engine call.
pub async fn dispatch(
    dispatcher: &Dispatcher,
    command: Command,
    args: Vec<Value>,
) -> Result<Value, BridgeError> {
    let name = command.name();
    let arity = command.arity();
    match command {
        Command::GenerateCircomProof => {
            let (zkey_path, circuit_inputs, proof_lib): (PathBuf, String, WireProofLib) =
                decode_args(name, arity, args)?;
            let result = dispatcher
                .generate_circom_proof(zkey_path, circuit_inputs, proof_lib.into())
                .await?;
            encode(name, result)
        }
        Command::CircomProve => {
            let (graph_path, circuit_inputs, zkey_path): (PathBuf, String, PathBuf) =
                decode_args(name, arity, args)?;
            let result = dispatcher
                .circom_prove(graph_path, circuit_inputs, zkey_path)
                .await?;
            encode(name, result)
        }
        Command::VerifyCircomProof => {
            let (zkey_path, proof_result, proof_lib): (PathBuf, WireCircomProofResult, WireProofLib) =
                decode_args(name, arity, args)?;
            let valid = dispatcher
                .verify_circom_proof(zkey_path, proof_result, proof_lib.into())
                .await?;
            encode(name, valid)
        }
        Command::GenerateHalo2Proof => {
            let (srs_path, pk_path, circuit_inputs): (PathBuf, PathBuf, HashMap<String, Vec<String>>) =
                decode_args(name, arity, args)?;
            let result = dispatcher
                .generate_halo2_proof(srs_path, pk_path, circuit_inputs)
                .await?;
            encode(name, result)
        }
        Command::VerifyHalo2Proof => {
            let (srs_path, vk_path, proof, public_input): (PathBuf, PathBuf, Vec<u8>, Vec<u8>) =
                decode_args(name, arity, args)?;
            let valid = dispatcher
                .verify_halo2_proof(srs_path, vk_path, proof, public_input)
                .await?;
            encode(name, valid)
        }
        Command::GenerateNoirProof => {
            let (circuit_path, srs_path, inputs, on_chain, vk, low_memory_mode): (
                PathBuf,
                Option<PathBuf>,
                Vec<String>,
                bool,
                Vec<u8>,
                bool,
            ) = decode_args(name, arity, args)?;
            let proof = dispatcher
                .generate_noir_proof(circuit_path, srs_path, inputs, on_chain, vk, low_memory_mode)
                .await?;
            encode(name, proof)
        }
        Command::VerifyNoirProof => {
            let (circuit_path, proof, on_chain, vk, low_memory_mode): (
                PathBuf,
                Vec<u8>,
                bool,
                Vec<u8>,
                bool,
            ) = decode_args(name, arity, args)?;
            let valid = dispatcher
                .verify_noir_proof(circuit_path, proof, on_chain, vk, low_memory_mode)
                .await?;
            encode(name, valid)
        }
        Command::GetNoirVerificationKey => {
            let (circuit_path, srs_path, on_chain, low_memory_mode): (
                PathBuf,
                Option<PathBuf>,
                bool,
                bool,
            ) = decode_args(name, arity, args)?;
            let vk = dispatcher
                .get_noir_verification_key(circuit_path, srs_path, on_chain, low_memory_mode)
                .await?;
            encode(name, vk)
        }
    }
}
