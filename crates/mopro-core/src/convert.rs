//! # Wire/Canonical Converter
//!
//! Total, pure translation between [`crate::wire`] and [`crate::proof`].
//!
//! ## Wire → canonical
//!
//! Never fails. Each absent field resolves through a [`DefaultPolicy`],
//! field by field and coordinate by coordinate. The standard table:
//!
//! | Field      | Default                                   |
//! |------------|-------------------------------------------|
//! | `a`, `c`   | `(x="0", y="0", z="1")`                   |
//! | `b`        | `(x=("1","0"), y=("1","0"), z=("1","0"))` |
//! | `protocol` | `"groth16"`                               |
//! | `curve`    | `"bn128"`                                 |
//! | `inputs`   | `["0"]`                                   |
//!
//! The G1 default is the point at infinity in projective form. A proof
//! built entirely from defaults converts fine and then fails verification,
//! which is where garbage is supposed to be rejected.
//!
//! ## Canonical → wire
//!
//! A direct copy via `From`. Every field becomes `Some`, so the round trip
//! `canonical → wire → canonical` is the identity.

use crate::proof::{CircomProof, CircomProofResult, FieldElement, G1, G2};
use crate::wire::{WireCircomProof, WireCircomProofResult, WireG1, WireG2};

/// Default values substituted for absent wire fields.
pub trait DefaultPolicy {
    /// Fallback for the `a` and `c` points.
    fn g1(&self) -> G1;
    /// Fallback for the `b` point.
    fn g2(&self) -> G2;
    fn protocol(&self) -> String;
    fn curve(&self) -> String;
    fn public_inputs(&self) -> Vec<FieldElement>;
}

/// The default table host bindings have always applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDefaults;

impl StandardDefaults {
    pub const PROTOCOL: &'static str = "groth16";
    pub const CURVE: &'static str = "bn128";
}

impl DefaultPolicy for StandardDefaults {
    fn g1(&self) -> G1 {
        G1::new("0", "0", "1")
    }

    fn g2(&self) -> G2 {
        let unit = || [FieldElement::one(), FieldElement::zero()];
        G2 {
            x: unit(),
            y: unit(),
            z: unit(),
        }
    }

    fn protocol(&self) -> String {
        Self::PROTOCOL.to_string()
    }

    fn curve(&self) -> String {
        Self::CURVE.to_string()
    }

    fn public_inputs(&self) -> Vec<FieldElement> {
        vec![FieldElement::zero()]
    }
}

/// Conversion from a wire shape into its canonical counterpart.
pub trait Canonicalize: Sized {
    type Canonical;

    /// Resolve absent fields through `policy`.
    fn to_canonical_with<P: DefaultPolicy + ?Sized>(self, policy: &P) -> Self::Canonical;

    /// Resolve absent fields through [`StandardDefaults`].
    fn to_canonical(self) -> Self::Canonical {
        self.to_canonical_with(&StandardDefaults)
    }
}

fn g1_or(wire: Option<WireG1>, fallback: G1) -> G1 {
    match wire {
        None => fallback,
        Some(w) => G1 {
            x: w.x.unwrap_or(fallback.x),
            y: w.y.unwrap_or(fallback.y),
            z: w.z.unwrap_or(fallback.z),
        },
    }
}

fn g2_or(wire: Option<WireG2>, fallback: G2) -> G2 {
    match wire {
        None => fallback,
        Some(w) => G2 {
            x: w.x.unwrap_or(fallback.x),
            y: w.y.unwrap_or(fallback.y),
            z: w.z.unwrap_or(fallback.z),
        },
    }
}

impl Canonicalize for WireCircomProof {
    type Canonical = CircomProof;

    fn to_canonical_with<P: DefaultPolicy + ?Sized>(self, policy: &P) -> CircomProof {
        CircomProof {
            a: g1_or(self.a, policy.g1()),
            b: g2_or(self.b, policy.g2()),
            c: g1_or(self.c, policy.g1()),
            protocol: self.protocol.unwrap_or_else(|| policy.protocol()),
            curve: self.curve.unwrap_or_else(|| policy.curve()),
        }
    }
}

impl Canonicalize for WireCircomProofResult {
    type Canonical = CircomProofResult;

    fn to_canonical_with<P: DefaultPolicy + ?Sized>(self, policy: &P) -> CircomProofResult {
        CircomProofResult {
            proof: self.proof.unwrap_or_default().to_canonical_with(policy),
            inputs: self.inputs.unwrap_or_else(|| policy.public_inputs()),
        }
    }
}

impl From<G1> for WireG1 {
    fn from(p: G1) -> Self {
        Self {
            x: Some(p.x),
            y: Some(p.y),
            z: Some(p.z),
        }
    }
}

impl From<G2> for WireG2 {
    fn from(p: G2) -> Self {
        Self {
            x: Some(p.x),
            y: Some(p.y),
            z: Some(p.z),
        }
    }
}

impl From<CircomProof> for WireCircomProof {
    fn from(p: CircomProof) -> Self {
        Self {
            a: Some(p.a.into()),
            b: Some(p.b.into()),
            c: Some(p.c.into()),
            protocol: Some(p.protocol),
            curve: Some(p.curve),
        }
    }
}

impl From<CircomProofResult> for WireCircomProofResult {
    fn from(r: CircomProofResult) -> Self {
        Self {
            proof: Some(r.proof.into()),
            inputs: Some(r.inputs),
        }
    }
}

/// Convert a host proof result into the canonical shape using the standard defaults.
pub fn to_canonical(wire: WireCircomProofResult) -> CircomProofResult {
    wire.to_canonical()
}

/// Copy a canonical proof result into the host shape.
pub fn to_wire(canonical: CircomProofResult) -> WireCircomProofResult {
    canonical.into()
}
