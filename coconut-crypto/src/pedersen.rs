//! Pedersen commitments to a credential attribute.
//!
//! A commitment is formed over the fixed generators `(g1, h1)` from
//! [`PublicParameters`], as `m * g1 + o * h1` for attribute `m` and blinding factor
//! `o`. Because no party knows the discrete logarithm of `h1` with respect to `g1`,
//! the commitment unconditionally hides `m`.

use crate::{
    common::*,
    parameters::PublicParameters,
    proofs::{ChallengeBuilder, ChallengeInput},
    serde::SerializeElement,
};
use serde::{Deserialize, Serialize};

/// A Pedersen commitment to a single credential attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment(#[serde(with = "SerializeElement")] G1Projective);

impl Commitment {
    /// Commit to an attribute with the given blinding factor.
    pub fn new(params: &PublicParameters, attribute: Attribute, bf: BlindingFactor) -> Self {
        Commitment(params.g1() * attribute.to_scalar() + params.h1() * bf.as_scalar())
    }

    /// Verify a provided opening of the commitment.
    pub fn verify_opening(
        &self,
        params: &PublicParameters,
        attribute: Attribute,
        bf: BlindingFactor,
    ) -> bool {
        Self::new(params, attribute, bf) == *self
    }

    /// Get the inner group element representing the commitment.
    pub fn to_element(self) -> G1Projective {
        self.0
    }

    /// The canonical compressed encoding of the commitment.
    pub fn to_bytes(self) -> [u8; 48] {
        self.0.to_affine().to_compressed()
    }

    /// Decode a commitment from its compressed encoding.
    pub fn from_bytes(bytes: &[u8; 48]) -> Option<Self> {
        let maybe_point: Option<G1Affine> = G1Affine::from_compressed(bytes).into();
        maybe_point.map(|point| Commitment(point.into()))
    }
}

impl ChallengeInput for Commitment {
    fn consume(&self, builder: &mut ChallengeBuilder) {
        builder.consume_bytes(self.to_bytes());
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::rng;

    #[test]
    fn commit_open() {
        let mut rng = rng();
        let params = PublicParameters::shared();
        let attribute = Attribute::random(&mut rng);
        let bf = BlindingFactor::new(&mut rng);

        let com = Commitment::new(&params, attribute, bf);
        assert!(com.verify_opening(&params, attribute, bf));
    }

    #[test]
    fn commit_does_not_open_on_wrong_attribute() {
        let mut rng = rng();
        let params = PublicParameters::shared();
        let attribute = Attribute::random(&mut rng);
        let bf = BlindingFactor::new(&mut rng);

        let bad_attribute = Attribute::random(&mut rng);
        assert_ne!(
            attribute.to_scalar(),
            bad_attribute.to_scalar(),
            "unfortunate RNG seed: bad_attribute should be different"
        );

        let com = Commitment::new(&params, attribute, bf);
        assert!(!com.verify_opening(&params, bad_attribute, bf));
    }

    #[test]
    fn commit_does_not_open_on_wrong_blinding_factor() {
        let mut rng = rng();
        let params = PublicParameters::shared();
        let attribute = Attribute::random(&mut rng);
        let bf = BlindingFactor::new(&mut rng);
        let bad_bf = BlindingFactor::new(&mut rng);

        assert_ne!(
            bf.as_scalar(),
            bad_bf.as_scalar(),
            "unfortunate RNG seed: bad_bf should be different"
        );

        let com = Commitment::new(&params, attribute, bf);
        assert!(!com.verify_opening(&params, attribute, bad_bf));
    }

    #[test]
    fn commitment_encoding_round_trips() {
        let mut rng = rng();
        let params = PublicParameters::shared();
        let com = Commitment::new(
            &params,
            Attribute::random(&mut rng),
            BlindingFactor::new(&mut rng),
        );

        assert_eq!(Commitment::from_bytes(&com.to_bytes()), Some(com));
    }
}
