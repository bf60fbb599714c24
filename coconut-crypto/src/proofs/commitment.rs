//! Proof of knowledge of the opening of an attribute commitment.
//!
//! Shown to the issuer before it endorses a commitment: a Schnorr AND-proof that the
//! prover knows `(m, o)` with `pk_cred = m * g1 + o * h1`. The challenge is bound to
//! the issuer's public identity string so a transcript accepted by one issuer cannot
//! be replayed at another.

use crate::{
    common::*,
    parameters::PublicParameters,
    pedersen::Commitment,
    proofs::{ChallengeBuilder, ChallengeInput},
    serde::SerializeElement,
};
use ff::Field;
use serde::{Deserialize, Serialize};

/// Proof of knowledge of the opening of a [`Commitment`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CommitmentProof {
    #[serde(with = "SerializeElement")]
    challenge: Scalar,
    #[serde(with = "SerializeElement")]
    response_m: Scalar,
    #[serde(with = "SerializeElement")]
    response_o: Scalar,
}

impl CommitmentProof {
    /// Prove knowledge of the opening `(attribute, bf)` of `commitment`.
    ///
    /// `verifier_id` is the public identity of the party the proof is intended for.
    pub fn new(
        rng: &mut impl Rng,
        params: &PublicParameters,
        attribute: Attribute,
        bf: BlindingFactor,
        verifier_id: &[u8],
    ) -> Self {
        let wm = Scalar::random(&mut *rng);
        let wo = Scalar::random(&mut *rng);
        let witness_commitment = params.g1() * wm + params.h1() * wo;

        let challenge = ChallengeBuilder::new()
            .with(&witness_commitment)
            .with_bytes(verifier_id)
            .finish()
            .to_scalar();

        CommitmentProof {
            challenge,
            response_m: wm - challenge * attribute.to_scalar(),
            response_o: wo - challenge * bf.as_scalar(),
        }
    }

    /// Verify the proof against a commitment and the verifier's own identity.
    pub fn verify(
        &self,
        params: &PublicParameters,
        commitment: &Commitment,
        verifier_id: &[u8],
    ) -> bool {
        let witness_commitment = params.g1() * self.response_m
            + params.h1() * self.response_o
            + commitment.to_element() * self.challenge;

        let expected = ChallengeBuilder::new()
            .with(&witness_commitment)
            .with_bytes(verifier_id)
            .finish()
            .to_scalar();

        self.challenge == expected
    }
}

impl ChallengeInput for CommitmentProof {
    fn consume(&self, builder: &mut ChallengeBuilder) {
        builder.consume(&self.challenge);
        builder.consume(&self.response_m);
        builder.consume(&self.response_o);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::rng;

    const ISSUER: &[u8] = b"issuer-1";

    fn proof_setup(
        rng: &mut impl Rng,
    ) -> (PublicParameters, Attribute, BlindingFactor, Commitment) {
        let params = PublicParameters::shared();
        let attribute = Attribute::random(rng);
        let bf = BlindingFactor::new(rng);
        let commitment = Commitment::new(&params, attribute, bf);
        (params, attribute, bf, commitment)
    }

    #[test]
    fn honest_proof_verifies() {
        let mut rng = rng();
        let (params, attribute, bf, commitment) = proof_setup(&mut rng);

        let proof = CommitmentProof::new(&mut rng, &params, attribute, bf, ISSUER);
        assert!(proof.verify(&params, &commitment, ISSUER));
    }

    #[test]
    fn proof_is_bound_to_the_verifier() {
        let mut rng = rng();
        let (params, attribute, bf, commitment) = proof_setup(&mut rng);

        let proof = CommitmentProof::new(&mut rng, &params, attribute, bf, ISSUER);
        assert!(!proof.verify(&params, &commitment, b"issuer-2"));
    }

    #[test]
    fn proof_fails_on_a_different_commitment() {
        let mut rng = rng();
        let (params, attribute, bf, _) = proof_setup(&mut rng);
        let other =
            Commitment::new(&params, Attribute::random(&mut rng), BlindingFactor::new(&mut rng));

        let proof = CommitmentProof::new(&mut rng, &params, attribute, bf, ISSUER);
        assert!(!proof.verify(&params, &other, ISSUER));
    }

    #[test]
    fn tampered_responses_fail() {
        let mut rng = rng();
        let (params, attribute, bf, commitment) = proof_setup(&mut rng);

        let mut proof = CommitmentProof::new(&mut rng, &params, attribute, bf, ISSUER);
        proof.response_m += Scalar::one();
        assert!(!proof.verify(&params, &commitment, ISSUER));
    }
}
