//! # Error Types — Coded Error Taxonomy
//!
//! Defines the failures the bridge can surface. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - [`EngineError`] is what a proving backend reports. It never crosses
//!   the dispatcher boundary on its own.
//! - [`BridgeError`] is what callers see. Each variant has a stable code
//!   string ([`BridgeError::code`]) for programmatic branching, and engine
//!   failures stay attached as the structured `source`.
//! - [`Rejection`] is the serializable `{code, message, cause}` body a host
//!   binding returns in place of a rejected promise.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The three proof systems behind the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProofSystem {
    /// Groth16 over a Circom circuit.
    Circom,
    /// Polynomial-commitment proofs keyed by an SRS.
    Halo2,
    /// General-purpose proofs over a compiled Noir circuit.
    Noir,
}

impl ProofSystem {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Circom => "circom",
            Self::Halo2 => "halo2",
            Self::Noir => "noir",
        }
    }
}

impl fmt::Display for ProofSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which required input file a precondition refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileKind {
    Zkey,
    Graph,
    Srs,
    ProvingKey,
    VerificationKey,
}

impl FileKind {
    /// Short label used in messages (`"zkey"`, `"pk"`, ...).
    pub fn label(self) -> &'static str {
        match self {
            Self::Zkey => "zkey",
            Self::Graph => "graph",
            Self::Srs => "srs",
            Self::ProvingKey => "pk",
            Self::VerificationKey => "vk",
        }
    }

    /// The per-kind code older host bindings raised, e.g. `ZkeyFileNotFound`.
    pub fn legacy_code(self) -> &'static str {
        match self {
            Self::Zkey => "ZkeyFileNotFound",
            Self::Graph => "GraphFileNotFound",
            Self::Srs => "SrsFileNotFound",
            Self::ProvingKey => "PkFileNotFound",
            Self::VerificationKey => "VkFileNotFound",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Failure reported by a proving or verification backend.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A key, circuit, or reference string could not be read.
    #[error("I/O error while accessing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Inputs were rejected before proving started (bad JSON, wrong arity).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Witness generation failed.
    #[error("witness error: {0}")]
    Witness(String),

    /// Internal prover error.
    #[error("prover error: {0}")]
    Prover(String),

    /// The verifier could not run, e.g. malformed proof bytes. A proof
    /// that runs but does not check out is `Ok(false)`, not this.
    #[error("verifier error: {0}")]
    Verifier(String),

    /// The backend does not implement the requested mode.
    #[error("not supported: {0}")]
    Unsupported(String),

    /// The engine task panicked or was torn down before returning.
    #[error("engine task aborted: {0}")]
    Panicked(String),
}

/// Every failure a bridge command can surface.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// A required file is missing. Raised before any engine call.
    #[error("the {kind} file was not found at path: {}", path.display())]
    FileNotFound { kind: FileKind, path: PathBuf },

    /// Proof or verification-key generation failed inside the engine.
    #[error("{system} {operation} failed: {source}")]
    GenerateProofFailed {
        system: ProofSystem,
        operation: &'static str,
        #[source]
        source: EngineError,
    },

    /// Graph-based Circom proving failed inside the engine.
    #[error("circom graph proving failed: {source}")]
    CircomProveFailed {
        #[source]
        source: EngineError,
    },

    /// Verification could not be carried out.
    #[error("{system} proof verification failed: {source}")]
    VerifyProofFailed {
        system: ProofSystem,
        #[source]
        source: EngineError,
    },

    /// The command table has no entry with this name.
    #[error("unknown command: {name}")]
    UnknownCommand { name: String },

    /// Positional arguments did not decode for the named command.
    #[error("invalid arguments for {command}: {reason}")]
    InvalidArguments { command: String, reason: String },

    /// A successful result could not be encoded for the host.
    #[error("failed to encode result of {command}: {reason}")]
    EncodingFailed { command: String, reason: String },
}

impl BridgeError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } => "FileNotFound",
            Self::GenerateProofFailed { .. } => "GenerateProofFailed",
            Self::CircomProveFailed { .. } => "CircomProveFailed",
            Self::VerifyProofFailed { .. } => "VerifyProofFailed",
            Self::UnknownCommand { .. } => "UnknownCommand",
            Self::InvalidArguments { .. } => "InvalidArguments",
            Self::EncodingFailed { .. } => "EncodingFailed",
        }
    }

    /// The engine failure behind this error, if any.
    pub fn engine_error(&self) -> Option<&EngineError> {
        match self {
            Self::GenerateProofFailed { source, .. }
            | Self::CircomProveFailed { source }
            | Self::VerifyProofFailed { source, .. } => Some(source),
            _ => None,
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::FileNotFound { kind, path } => Some(serde_json::json!({
                "fileKind": kind,
                "path": path.display().to_string(),
                "legacyCode": kind.legacy_code(),
            })),
            Self::GenerateProofFailed { system, .. } | Self::VerifyProofFailed { system, .. } => {
                Some(serde_json::json!({ "system": system }))
            }
            Self::CircomProveFailed { .. } => {
                Some(serde_json::json!({ "system": ProofSystem::Circom }))
            }
            Self::UnknownCommand { .. }
            | Self::InvalidArguments { .. }
            | Self::EncodingFailed { .. } => None,
        }
    }
}

/// Serializable rejection body handed back to a host runtime.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct Rejection {
    pub code: String,
    pub message: String,
    /// Message of the underlying engine failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&BridgeError> for Rejection {
    fn from(err: &BridgeError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            cause: err.engine_error().map(ToString::to_string),
            details: err.details(),
        }
    }
}

impl From<BridgeError> for Rejection {
    fn from(err: BridgeError) -> Self {
        Self::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn codes_are_stable() {
        let missing = BridgeError::FileNotFound {
            kind: FileKind::Zkey,
            path: "/tmp/x.zkey".into(),
        };
        assert_eq!(missing.code(), "FileNotFound");

        let verify = BridgeError::VerifyProofFailed {
            system: ProofSystem::Halo2,
            source: EngineError::Verifier("bad".into()),
        };
        assert_eq!(verify.code(), "VerifyProofFailed");

        let prove = BridgeError::CircomProveFailed {
            source: EngineError::Witness("x".into()),
        };
        assert_eq!(prove.code(), "CircomProveFailed");
    }

    #[test]
    fn file_not_found_message_names_kind_and_path() {
        let err = BridgeError::FileNotFound {
            kind: FileKind::Srs,
            path: "/keys/plonk_fibonacci_srs.bin".into(),
        };
        assert_eq!(
            err.to_string(),
            "the srs file was not found at path: /keys/plonk_fibonacci_srs.bin"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn engine_source_is_preserved() {
        let err = BridgeError::GenerateProofFailed {
            system: ProofSystem::Noir,
            operation: "proof generation",
            source: EngineError::Prover("constraint 12 unsatisfied".into()),
        };
        assert!(err.to_string().contains("constraint 12 unsatisfied"));
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "prover error: constraint 12 unsatisfied");
    }

    #[test]
    fn rejection_carries_code_cause_and_details() {
        let err = BridgeError::VerifyProofFailed {
            system: ProofSystem::Halo2,
            source: EngineError::Verifier("truncated proof".into()),
        };
        let rejection = Rejection::from(&err);
        assert_eq!(rejection.code, "VerifyProofFailed");
        assert_eq!(rejection.cause.as_deref(), Some("verifier error: truncated proof"));
        assert_eq!(rejection.details.unwrap()["system"], "halo2");
    }

    #[test]
    fn rejection_for_missing_file_has_legacy_code() {
        let rejection = Rejection::from(BridgeError::FileNotFound {
            kind: FileKind::VerificationKey,
            path: "/vk".into(),
        });
        let details = rejection.details.unwrap();
        assert_eq!(details["legacyCode"], "VkFileNotFound");
        assert_eq!(details["fileKind"], "verificationKey");
        assert!(rejection.cause.is_none());
    }

    #[test]
    fn rejection_json_omits_empty_fields() {
        let rejection = Rejection::from(BridgeError::UnknownCommand {
            name: "frobnicate".into(),
        });
        let json = serde_json::to_value(&rejection).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"code": "UnknownCommand", "message": "unknown command: frobnicate"})
        );
    }
}
