//! Public parameters shared by every participant in a deployment.
//!
//! The parameters fix the two group generators, the auxiliary Pedersen generator
//! `h1`, and the deterministic hash-to-curve and hash-to-scalar maps. Construction is
//! deterministic, so independently-built parameters are identical; all protocol
//! messages implicitly assume both sides hold the same [`PublicParameters`].

use crate::{common::*, serde::SerializeElement};
use bls12_381::hash_to_curve::{ExpandMsgXmd, HashToCurve};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use sha3::{Digest, Sha3_256};
use std::convert::TryFrom;

/// Domain separation tag for all hash-to-curve operations in this deployment.
const HASH_TO_G1_DST: &[u8] = b"COCONUT-EPETITION-V01-CS01-with-BLS12381G1_XMD:SHA-256_SSWU_RO_";

/// Seed string from which the auxiliary generator `h1` is derived.
const H1_SEED: &[u8] = b"coconut-epetition-v01-pedersen-h1";

/// Fixed public parameters for the scheme.
///
/// `g1` and `g2` are the standard generators of the BLS12-381 groups. `h1` is an
/// auxiliary G1 generator obtained by hashing to the curve, so no party knows its
/// discrete logarithm with respect to `g1`; this is what makes Pedersen commitments
/// formed over `(g1, h1)` hiding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicParameters {
    #[serde(with = "SerializeElement")]
    g1: G1Projective,
    #[serde(with = "SerializeElement")]
    g2: G2Projective,
    #[serde(with = "SerializeElement")]
    h1: G1Projective,
}

impl PublicParameters {
    /// Construct the deployment-wide parameters.
    ///
    /// Deterministic: every caller gets an identical value.
    pub fn shared() -> Self {
        Self {
            g1: G1Projective::generator(),
            g2: G2Projective::generator(),
            h1: hash_to_g1(H1_SEED),
        }
    }

    /// The G1 generator.
    pub fn g1(&self) -> &G1Projective {
        &self.g1
    }

    /// The G2 generator.
    pub fn g2(&self) -> &G2Projective {
        &self.g2
    }

    /// The auxiliary Pedersen generator in G1.
    pub fn h1(&self) -> &G1Projective {
        &self.h1
    }
}

impl Default for PublicParameters {
    fn default() -> Self {
        Self::shared()
    }
}

/// Hash arbitrary bytes to a point in G1 with unknown discrete logarithm.
///
/// Used to derive the per-credential signing base `h` and the per-petition nullifier
/// base `gs`. Follows RFC 9380 (simplified SWU for the BLS12-381 G1 suite), so the
/// map is stable across implementations sharing a deployment.
pub fn hash_to_g1(bytes: &[u8]) -> G1Projective {
    <G1Projective as HashToCurve<ExpandMsgXmd<Sha256>>>::hash_to_curve(bytes, HASH_TO_G1_DST)
}

/// Hash arbitrary bytes to a scalar in Z_o.
pub fn hash_to_scalar(bytes: &[u8]) -> Scalar {
    let mut hasher = Sha3_256::new();
    hasher.update(bytes);
    scalar_from_hash(hasher)
}

/// Reduce a finished SHA3-256 state into a scalar.
pub(crate) fn scalar_from_hash(hasher: Sha3_256) -> Scalar {
    let mut digested = [0; 32];
    digested.copy_from_slice(hasher.finalize().as_ref());
    Scalar::from_raw([
        u64::from_le_bytes(<[u8; 8]>::try_from(&digested[0..8]).unwrap()),
        u64::from_le_bytes(<[u8; 8]>::try_from(&digested[8..16]).unwrap()),
        u64::from_le_bytes(<[u8; 8]>::try_from(&digested[16..24]).unwrap()),
        u64::from_le_bytes(<[u8; 8]>::try_from(&digested[24..32]).unwrap()),
    ])
}
