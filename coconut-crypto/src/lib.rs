//! This crate implements the cryptographic core of a Coconut-style threshold-issuance
//! anonymous credential scheme over the pairing-friendly curve BLS12-381:
//! - Pedersen commitments to a credential attribute.
//! - Blind Pointcheval-Sanders signatures issued by a set of authorities over an
//!   ElGamal-encrypted attribute, with aggregation and randomization.
//! - Schnorr-style zero-knowledge proofs: opening of an attribute commitment, a
//!   signing-request proof linking a ciphertext to that commitment, a petition-bound
//!   "show" proof producing a double-use nullifier, and a vote-validity proof.
//! - Exponential ElGamal with homomorphic ciphertext addition and the bounded
//!   discrete-log recovery used for vote tallies.
//!
//! The signature scheme is the one defined in ["Short randomizable
//! signatures"](https://eprint.iacr.org/2015/525.pdf); the credential layer follows
//! ["Coconut: Threshold Issuance Selective Disclosure Credentials with Applications to
//! Distributed Ledgers"](https://arxiv.org/abs/1802.07344).

#![warn(missing_docs)]
#![warn(missing_copy_implementations, missing_debug_implementations)]
#![warn(unused_qualifications, unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
#![forbid(rustdoc::broken_intra_doc_links)]

pub mod elgamal;
pub mod keys;
pub mod parameters;
pub mod pedersen;
pub mod proofs;
pub mod signature;

mod serde;

pub use crate::serde::SerializeElement;

use crate::common::*;
use ::serde::*;
use ff::Field;
use thiserror::*;

/// Error types that may arise from cryptographic operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Caused by aggregating signature shares that were not issued over the same base
    /// point `h` (that is, over the same credential).
    #[error("signature shares were issued over different base points")]
    ShareBaseMismatch,
    /// Caused by aggregating verification keys that do not share a common `g2`
    /// generator and therefore do not describe one authority set.
    #[error("verification keys do not describe a single authority set")]
    KeySetMismatch,
    /// Caused by aggregating an empty collection of keys or shares.
    #[error("cannot aggregate an empty collection")]
    EmptyAggregation,
}

/// The attribute embedded in a credential, as a scalar.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Attribute(#[serde(with = "SerializeElement")] Scalar);

impl Attribute {
    /// Draw a fresh attribute uniformly at random.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self(Scalar::random(rng))
    }

    /// Construct an attribute from its scalar representation.
    pub fn from_scalar(scalar: Scalar) -> Self {
        Self(scalar)
    }

    /// The scalar representation of this attribute.
    pub fn to_scalar(&self) -> Scalar {
        self.0
    }
}

/// Blinding factor for a Pedersen commitment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BlindingFactor(#[serde(with = "SerializeElement")] Scalar);

impl BlindingFactor {
    /// Generate a new blinding factor uniformly at random from the set of possible
    /// [`Scalar`]s.
    pub fn new(rng: &mut impl Rng) -> Self {
        Self(Scalar::random(rng))
    }

    /// Construct a blinding factor from the scalar representing it.
    pub fn from_scalar(scalar: Scalar) -> Self {
        Self(scalar)
    }

    /// Convert to the inner scalar representing this blinding factor.
    pub fn as_scalar(&self) -> Scalar {
        self.0
    }
}

mod common {
    //! Common types used internally.

    pub use crate::{Attribute, BlindingFactor};
    pub use bls12_381::{pairing, G1Affine, G1Projective, G2Affine, G2Projective, Scalar};
    pub use group::{Curve, Group, GroupEncoding};

    /// A trait synonym for a cryptographically secure random number generator. This
    /// trait is blanket-implemented for all valid types and will never need to be
    /// implemented by-hand.
    pub trait Rng: rand::CryptoRng + rand::RngCore {}
    impl<T: rand::CryptoRng + rand::RngCore> Rng for T {}

    /// Select a nonzero scalar uniformly at random.
    pub fn random_nonzero_scalar(rng: &mut impl Rng) -> Scalar {
        use ff::Field;
        loop {
            let r = Scalar::random(&mut *rng);
            if !bool::from(r.is_zero()) {
                return r;
            }
        }
    }
}
