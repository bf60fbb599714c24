//! Authority signing keys and their additive aggregation.
//!
//! Each signing authority holds a [`AuthorityKeyPair`]; the verification halves of a
//! fixed authority set sum into an [`AggregateVerificationKey`], which verifies
//! credentials carrying the sum of that set's signature shares. An aggregate key is
//! only meaningful for the specific authority set it was built from.

use crate::{
    common::*,
    parameters::PublicParameters,
    proofs::{ChallengeBuilder, ChallengeInput},
    serde::SerializeElement,
    Error,
};
use serde::{Deserialize, Serialize};

/// An authority's secret signing key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct SecretKey {
    #[serde(with = "SerializeElement")]
    pub(crate) x: Scalar,
    #[serde(with = "SerializeElement")]
    pub(crate) y: Scalar,
}

impl SecretKey {
    /// Generate a new `SecretKey` from uniformly random nonzero scalars.
    fn new(rng: &mut impl Rng) -> Self {
        SecretKey {
            x: random_nonzero_scalar(rng),
            y: random_nonzero_scalar(rng),
        }
    }
}

/// An authority's public verification key `(g2, X = x * g2, Y = y * g2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationKey {
    #[serde(with = "SerializeElement")]
    g2: G2Projective,
    #[serde(with = "SerializeElement")]
    x2: G2Projective,
    #[serde(with = "SerializeElement")]
    y2: G2Projective,
}

impl VerificationKey {
    fn from_secret_key(params: &PublicParameters, sk: &SecretKey) -> Self {
        VerificationKey {
            g2: *params.g2(),
            x2: params.g2() * sk.x,
            y2: params.g2() * sk.y,
        }
    }

    /// The G2 generator this key was formed over.
    pub fn g2(&self) -> &G2Projective {
        &self.g2
    }

    /// The `X` component.
    pub fn x2(&self) -> &G2Projective {
        &self.x2
    }

    /// The `Y` component.
    pub fn y2(&self) -> &G2Projective {
        &self.y2
    }
}

impl ChallengeInput for VerificationKey {
    fn consume(&self, builder: &mut ChallengeBuilder) {
        builder.consume_bytes(self.g2.to_bytes());
        builder.consume_bytes(self.x2.to_bytes());
        builder.consume_bytes(self.y2.to_bytes());
    }
}

/// A signing authority's keypair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthorityKeyPair {
    pub(crate) sk: SecretKey,
    vk: VerificationKey,
}

impl AuthorityKeyPair {
    /// Generate a new `AuthorityKeyPair`. The secret scalars are chosen uniformly at
    /// random and are nonzero.
    pub fn new(rng: &mut impl Rng, params: &PublicParameters) -> Self {
        let sk = SecretKey::new(rng);
        let vk = VerificationKey::from_secret_key(params, &sk);
        AuthorityKeyPair { sk, vk }
    }

    /// Get the public portion of the keypair.
    pub fn verification_key(&self) -> &VerificationKey {
        &self.vk
    }
}

/// The sum of the verification keys of a fixed authority set.
///
/// Verifies aggregate signatures formed from exactly that set's shares; any other
/// combination of shares fails verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateVerificationKey {
    #[serde(with = "SerializeElement")]
    g2: G2Projective,
    #[serde(with = "SerializeElement")]
    x2: G2Projective,
    #[serde(with = "SerializeElement")]
    y2: G2Projective,
}

impl AggregateVerificationKey {
    /// Aggregate the verification keys of an authority set by point addition.
    ///
    /// Fails with [`Error::KeySetMismatch`] if the keys were not formed over a common
    /// `g2` generator, and with [`Error::EmptyAggregation`] on an empty set; a partial
    /// aggregate is never returned.
    pub fn aggregate(keys: &[VerificationKey]) -> Result<Self, Error> {
        let first = keys.first().ok_or(Error::EmptyAggregation)?;
        if keys.iter().any(|key| key.g2 != first.g2) {
            return Err(Error::KeySetMismatch);
        }

        Ok(AggregateVerificationKey {
            g2: first.g2,
            x2: keys.iter().map(|key| key.x2).sum(),
            y2: keys.iter().map(|key| key.y2).sum(),
        })
    }

    /// The G2 generator the key set was formed over.
    pub fn g2(&self) -> &G2Projective {
        &self.g2
    }

    /// The summed `X` component.
    pub fn x2(&self) -> &G2Projective {
        &self.x2
    }

    /// The summed `Y` component.
    pub fn y2(&self) -> &G2Projective {
        &self.y2
    }
}

impl ChallengeInput for AggregateVerificationKey {
    fn consume(&self, builder: &mut ChallengeBuilder) {
        builder.consume_bytes(self.g2.to_bytes());
        builder.consume_bytes(self.x2.to_bytes());
        builder.consume_bytes(self.y2.to_bytes());
    }
}
