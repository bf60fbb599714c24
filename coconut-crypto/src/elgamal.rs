//! Exponential ElGamal encryption over G1.
//!
//! Messages are scalars embedded as `m * base` for a caller-chosen base point, so
//! decryption recovers the *point* `m * base` rather than `m` itself. The scheme is
//! additively homomorphic: component-wise addition of ciphertexts adds the embedded
//! plaintexts. [`bounded_discrete_log`] recovers small plaintexts (vote counts) by
//! linear scan; it is never used on the credential attribute, which stays hidden.
//!
//! Ciphertexts are `(c1, c2) = (k * g1, k * pk + m * base)` for fresh randomness `k`.
//! Keeping `c1` over the fixed generator `g1` (rather than over `base`) is what lets
//! both decryption and blind-signature unblinding cancel the key term.

use crate::{
    common::*,
    parameters::PublicParameters,
    proofs::{ChallengeBuilder, ChallengeInput},
    serde::SerializeElement,
};
use ff::Field;
use serde::{Deserialize, Serialize};
use std::ops::Add;

/// Public half of an ElGamal keypair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElGamalPublicKey(#[serde(with = "SerializeElement")] G1Projective);

/// An ElGamal keypair over G1.
///
/// Clients hold one per session to receive blind signature shares; authorities hold
/// one as their share of the joint tally key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ElGamalKeyPair {
    #[serde(with = "SerializeElement")]
    d: Scalar,
    pk: ElGamalPublicKey,
}

/// The randomness used to form a ciphertext.
///
/// Returned to the encrypting party only; needed as a witness in the signing-request
/// proof.
#[derive(Debug, Clone, Copy)]
pub struct EncryptionRandomness(pub(crate) Scalar);

impl EncryptionRandomness {
    /// The scalar representation of this randomness.
    pub fn as_scalar(&self) -> Scalar {
        self.0
    }
}

/// An ElGamal ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    #[serde(with = "SerializeElement")]
    pub(crate) c1: G1Projective,
    #[serde(with = "SerializeElement")]
    pub(crate) c2: G1Projective,
}

impl ElGamalKeyPair {
    /// Generate a new keypair with `pk = d * g1` for uniformly random nonzero `d`.
    pub fn new(rng: &mut impl Rng, params: &PublicParameters) -> Self {
        let d = random_nonzero_scalar(rng);
        let pk = ElGamalPublicKey(params.g1() * d);
        ElGamalKeyPair { d, pk }
    }

    /// Get the public half of the keypair.
    pub fn public_key(&self) -> &ElGamalPublicKey {
        &self.pk
    }

    /// The secret scalar. Needed as a witness in the signing-request proof and to
    /// unblind signature shares; never serialized onto the wire.
    pub fn secret(&self) -> Scalar {
        self.d
    }

    /// Decrypt a ciphertext, recovering the embedded point `m * base`.
    pub fn decrypt(&self, ct: &Ciphertext) -> G1Projective {
        ct.c2 - ct.c1 * self.d
    }

    /// Strip this key's share from a ciphertext formed under a sum of public keys.
    ///
    /// After every holder of a summed key has applied its share, `c2` holds the
    /// plaintext point. This is the building block of the sequential tally chain.
    pub fn partial_decrypt(&self, ct: &Ciphertext) -> Ciphertext {
        Ciphertext {
            c1: ct.c1,
            c2: ct.c2 - ct.c1 * self.d,
        }
    }
}

impl ElGamalPublicKey {
    /// Encrypt `message * base` under this key.
    ///
    /// The randomness is returned alongside the ciphertext and must be kept local by
    /// the caller.
    pub fn encrypt(
        &self,
        rng: &mut impl Rng,
        params: &PublicParameters,
        message: Scalar,
        base: &G1Projective,
    ) -> (Ciphertext, EncryptionRandomness) {
        let k = Scalar::random(rng);
        let ct = Ciphertext {
            c1: params.g1() * k,
            c2: self.0 * k + base * message,
        };
        (ct, EncryptionRandomness(k))
    }

    /// Sum a set of public keys into a joint key.
    ///
    /// A ciphertext under the joint key decrypts only once every share holder has
    /// applied [`ElGamalKeyPair::partial_decrypt`].
    pub fn aggregate(keys: &[ElGamalPublicKey]) -> ElGamalPublicKey {
        ElGamalPublicKey(keys.iter().map(|key| key.0).sum())
    }

    /// The group element representing this key.
    pub fn to_element(&self) -> G1Projective {
        self.0
    }
}

impl Add for Ciphertext {
    type Output = Ciphertext;

    /// Component-wise addition; adds the embedded plaintexts.
    fn add(self, other: Ciphertext) -> Ciphertext {
        Ciphertext {
            c1: self.c1 + other.c1,
            c2: self.c2 + other.c2,
        }
    }
}

impl Ciphertext {
    /// The first component, `k * g1`.
    pub fn c1(&self) -> &G1Projective {
        &self.c1
    }

    /// The second component, `k * pk + m * base`.
    pub fn c2(&self) -> &G1Projective {
        &self.c2
    }
}

impl ChallengeInput for Ciphertext {
    fn consume(&self, builder: &mut ChallengeBuilder) {
        builder.consume_bytes(self.c1.to_bytes());
        builder.consume_bytes(self.c2.to_bytes());
    }
}

impl ChallengeInput for ElGamalPublicKey {
    fn consume(&self, builder: &mut ChallengeBuilder) {
        builder.consume_bytes(self.0.to_bytes());
    }
}

/// Search for the discrete logarithm of `target` with respect to `base`, trying every
/// exponent in `0..=bound`.
///
/// Only suitable when the plaintext is known small a priori, such as a vote count
/// bounded by a petition quota. Returns `None` if no exponent in range matches.
pub fn bounded_discrete_log(
    target: &G1Projective,
    base: &G1Projective,
    bound: u64,
) -> Option<u64> {
    let mut acc = G1Projective::identity();
    for i in 0..=bound {
        if acc == *target {
            return Some(i);
        }
        acc += base;
    }
    None
}
