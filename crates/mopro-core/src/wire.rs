//! # Wire Shapes
//!
//! The permissive representation a host runtime hands across the boundary.
//! Host record types are nullable by construction, so every sub-field here
//! is an `Option` and a missing JSON key deserializes the same as `null`.
//!
//! Wire values are never handed to an engine directly. They go through
//! [`crate::convert`] first.

use serde::{Deserialize, Serialize};

use crate::proof::{FieldElement, Fq2, ProofLib};

/// G1 point with nullable coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireG1 {
    pub x: Option<FieldElement>,
    pub y: Option<FieldElement>,
    pub z: Option<FieldElement>,
}

/// G2 point with nullable coordinates. A present coordinate must still be
/// a pair; arity is enforced when the host payload is decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireG2 {
    pub x: Option<Fq2>,
    pub y: Option<Fq2>,
    pub z: Option<Fq2>,
}

/// Circom proof with nullable points and labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireCircomProof {
    pub a: Option<WireG1>,
    pub b: Option<WireG2>,
    pub c: Option<WireG1>,
    pub protocol: Option<String>,
    pub curve: Option<String>,
}

/// Circom proof result as the host sends it back for verification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireCircomProofResult {
    pub proof: Option<WireCircomProof>,
    pub inputs: Option<Vec<FieldElement>>,
}

/// Host record carrying the backend selection, `{ "proofLib": 0 | 1 }`.
///
/// An absent `proofLib` key selects [`ProofLib::Arkworks`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WireProofLib {
    pub proof_lib: ProofLib,
}

impl From<WireProofLib> for ProofLib {
    fn from(wire: WireProofLib) -> Self {
        wire.proof_lib
    }
}

impl From<ProofLib> for WireProofLib {
    fn from(proof_lib: ProofLib) -> Self {
        Self { proof_lib }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_and_nulls_both_decode_as_absent() {
        let missing: WireCircomProof = serde_json::from_str("{}").unwrap();
        let nulls: WireCircomProof = serde_json::from_value(serde_json::json!({
            "a": null, "b": null, "c": null, "protocol": null, "curve": null
        }))
        .unwrap();
        assert_eq!(missing, WireCircomProof::default());
        assert_eq!(nulls, missing);
    }

    #[test]
    fn partial_g1_keeps_present_coordinates() {
        let g1: WireG1 = serde_json::from_str(r#"{"x": "5"}"#).unwrap();
        assert_eq!(g1.x, Some(FieldElement::new("5")));
        assert!(g1.y.is_none());
        assert!(g1.z.is_none());
    }

    #[test]
    fn proof_lib_record_defaults_when_key_absent() {
        let lib: WireProofLib = serde_json::from_str("{}").unwrap();
        assert_eq!(ProofLib::from(lib), ProofLib::Arkworks);

        let lib: WireProofLib = serde_json::from_str(r#"{"proofLib": 1}"#).unwrap();
        assert_eq!(ProofLib::from(lib), ProofLib::Rapidsnark);
    }
}
