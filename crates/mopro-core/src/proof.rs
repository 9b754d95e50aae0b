//! # Canonical Proof Model
//!
//! Fully-populated proof artifacts as the engines produce and consume them.
//! Every struct here is an immutable value object: built fresh per call,
//! never shared across calls.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A field element as a decimal string of arbitrary precision.
///
/// The bridge never interprets the digits. Engines own parsing and
/// range checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldElement(pub String);

impl FieldElement {
    /// Wrap a decimal string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the decimal string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The additive identity, `"0"`.
    pub fn zero() -> Self {
        Self::new("0")
    }

    /// The multiplicative identity, `"1"`.
    pub fn one() -> Self {
        Self::new("1")
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldElement {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FieldElement {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// An element of the quadratic extension field, `(c0, c1)`.
pub type Fq2 = [FieldElement; 2];

/// A G1 point in projective coordinates over the base field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct G1 {
    pub x: FieldElement,
    pub y: FieldElement,
    pub z: FieldElement,
}

impl G1 {
    pub fn new(
        x: impl Into<FieldElement>,
        y: impl Into<FieldElement>,
        z: impl Into<FieldElement>,
    ) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            z: z.into(),
        }
    }
}

/// A G2 point in projective coordinates over the quadratic extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct G2 {
    pub x: Fq2,
    pub y: Fq2,
    pub z: Fq2,
}

/// A Groth16 proof as produced by the Circom engine.
///
/// `protocol` and `curve` are free-form labels (`"groth16"`, `"bn128"`);
/// the bridge carries them without validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircomProof {
    pub a: G1,
    pub b: G2,
    pub c: G1,
    pub protocol: String,
    pub curve: String,
}

/// A Circom proof together with its ordered public inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircomProofResult {
    pub proof: CircomProof,
    /// Public inputs in circuit order.
    pub inputs: Vec<FieldElement>,
}

/// A Halo2 proof and its serialized public inputs. Both are opaque bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Halo2ProofResult {
    pub proof: Vec<u8>,
    pub inputs: Vec<u8>,
}

/// Backend used for Circom proving and verification.
///
/// The two backends encode proofs differently internally, so a proof must
/// be verified with the same backend that generated it. The bridge passes
/// the caller's choice through on every call and does not check the pairing.
///
/// Encoded on the wire as an integer: `0` for Arkworks, `1` for Rapidsnark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ProofLib {
    #[default]
    Arkworks,
    Rapidsnark,
}

impl ProofLib {
    /// Lowercase backend name, as used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Arkworks => "arkworks",
            Self::Rapidsnark => "rapidsnark",
        }
    }
}

impl fmt::Display for ProofLib {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ProofLib> for u8 {
    fn from(lib: ProofLib) -> Self {
        match lib {
            ProofLib::Arkworks => 0,
            ProofLib::Rapidsnark => 1,
        }
    }
}

impl TryFrom<u8> for ProofLib {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Arkworks),
            1 => Ok(Self::Rapidsnark),
            other => Err(format!("unknown proof library option: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_element_serializes_as_bare_string() {
        let fe = FieldElement::new("21888242871839275222246405745257275088548364400416034343698204186575808495617");
        let json = serde_json::to_string(&fe).unwrap();
        assert!(json.starts_with("\"2188"));
        let back: FieldElement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fe);
    }

    #[test]
    fn g2_coordinates_are_pairs() {
        let json = serde_json::json!({
            "x": ["1", "2"], "y": ["3", "4"], "z": ["1", "0"]
        });
        let g2: G2 = serde_json::from_value(json).unwrap();
        assert_eq!(g2.y[1].as_str(), "4");
    }

    #[test]
    fn g2_rejects_wrong_arity() {
        let json = serde_json::json!({
            "x": ["1"], "y": ["3", "4"], "z": ["1", "0"]
        });
        assert!(serde_json::from_value::<G2>(json).is_err());
    }

    #[test]
    fn proof_lib_encodes_as_integer() {
        assert_eq!(serde_json::to_string(&ProofLib::Arkworks).unwrap(), "0");
        assert_eq!(serde_json::to_string(&ProofLib::Rapidsnark).unwrap(), "1");
        let lib: ProofLib = serde_json::from_str("1").unwrap();
        assert_eq!(lib, ProofLib::Rapidsnark);
    }

    #[test]
    fn proof_lib_rejects_unknown_option() {
        let err = serde_json::from_str::<ProofLib>("7").unwrap_err();
        assert!(err.to_string().contains("unknown proof library option"));
    }

    #[test]
    fn proof_lib_defaults_to_arkworks() {
        assert_eq!(ProofLib::default(), ProofLib::Arkworks);
        assert_eq!(ProofLib::Rapidsnark.to_string(), "rapidsnark");
    }

    #[test]
    fn halo2_result_bytes_are_integer_arrays() {
        let res = Halo2ProofResult {
            proof: vec![0xde, 0xad],
            inputs: vec![1],
        };
        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json, serde_json::json!({"proof": [222, 173], "inputs": [1]}));
    }
}
