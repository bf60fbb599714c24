//! Validity proof for an encrypted ballot bit.
//!
//! A ballot is a pair of ElGamal ciphertexts under the joint tally key: the vote `v`
//! and its algebraic complement `1 - v`, both embedded over the base `h1`. The
//! complement ciphertext is derived, not independently encrypted, so the verifier
//! checks its shape directly; the Schnorr proof covers the vote ciphertext together
//! with an auxiliary commitment `Cv = v * g1 + r1 * h1` and the relation
//! `Cv = v * Cv + r2 * h1` (with `r2 = r1 - v * r1`), which holds exactly when
//! `v * v = v`. Soundness rests on proof of knowledge of the opening rather than a
//! full disjunctive range proof.

use crate::{
    common::*,
    elgamal::{Ciphertext, ElGamalPublicKey},
    parameters::PublicParameters,
    proofs::{ChallengeBuilder, ChallengeInput},
    serde::SerializeElement,
};
use ff::Field;
use serde::{Deserialize, Serialize};

/// A ballot: encryptions of a vote bit and of its complement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BallotCiphertexts {
    /// Encryption of the vote bit over `h1`.
    vote: Ciphertext,
    /// Encryption of the complement bit, derived from `vote`.
    complement: Ciphertext,
}

impl BallotCiphertexts {
    /// The ciphertext carrying the vote bit.
    pub fn vote(&self) -> &Ciphertext {
        &self.vote
    }

    /// The ciphertext carrying the complement bit.
    pub fn complement(&self) -> &Ciphertext {
        &self.complement
    }
}

/// Proof that a [`BallotCiphertexts`] pair encrypts a bit and its complement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VoteProof {
    #[serde(with = "SerializeElement")]
    vote_commitment: G1Projective,
    #[serde(with = "SerializeElement")]
    challenge: Scalar,
    #[serde(with = "SerializeElement")]
    response_k: Scalar,
    #[serde(with = "SerializeElement")]
    response_v: Scalar,
    #[serde(with = "SerializeElement")]
    response_r1: Scalar,
    #[serde(with = "SerializeElement")]
    response_r2: Scalar,
}

impl VoteProof {
    /// Encrypt `vote` under the joint tally key and prove the ballot well-formed.
    pub fn new(
        rng: &mut impl Rng,
        params: &PublicParameters,
        tally_pk: &ElGamalPublicKey,
        vote: bool,
    ) -> (BallotCiphertexts, VoteProof) {
        let v = if vote { Scalar::one() } else { Scalar::zero() };
        let (ciphertext, randomness) = tally_pk.encrypt(&mut *rng, params, v, params.h1());
        let k = randomness.as_scalar();

        // Complement ciphertext: negate and embed the constant 1.
        let complement = Ciphertext {
            c1: -ciphertext.c1,
            c2: params.h1() - ciphertext.c2,
        };
        let ballot = BallotCiphertexts {
            vote: ciphertext,
            complement,
        };

        let r1 = Scalar::random(&mut *rng);
        let r2 = r1 - v * r1;
        let vote_commitment = params.g1() * v + params.h1() * r1;

        let wk = Scalar::random(&mut *rng);
        let wv = Scalar::random(&mut *rng);
        let wr1 = Scalar::random(&mut *rng);
        let wr2 = Scalar::random(&mut *rng);

        let pk = tally_pk.to_element();
        let witness_a = params.g1() * wk;
        let witness_b = pk * wk + params.h1() * wv;
        let witness_cv = params.g1() * wv + params.h1() * wr1;
        let witness_cv2 = vote_commitment * wv + params.h1() * wr2;

        let challenge = challenge(
            params,
            &ballot.vote,
            &vote_commitment,
            &witness_a,
            &witness_b,
            &witness_cv,
            &witness_cv2,
        );

        let proof = VoteProof {
            vote_commitment,
            challenge,
            response_k: wk - challenge * k,
            response_v: wv - challenge * v,
            response_r1: wr1 - challenge * r1,
            response_r2: wr2 - challenge * r2,
        };

        (ballot, proof)
    }

    /// Verify a ballot against the joint tally key.
    ///
    /// Checks that the complement ciphertext is the algebraic complement of the vote
    /// ciphertext and that the Schnorr relations hold. Pass/fail only.
    pub fn verify(
        &self,
        params: &PublicParameters,
        tally_pk: &ElGamalPublicKey,
        ballot: &BallotCiphertexts,
    ) -> bool {
        // The complement is derived, never free-standing; a mismatched pair would
        // corrupt the "no" tally even with a valid vote ciphertext.
        if ballot.complement.c1 != -ballot.vote.c1
            || ballot.complement.c2 != params.h1() - ballot.vote.c2
        {
            return false;
        }

        let pk = tally_pk.to_element();
        let witness_a = params.g1() * self.response_k + ballot.vote.c1 * self.challenge;
        let witness_b = pk * self.response_k
            + params.h1() * self.response_v
            + ballot.vote.c2 * self.challenge;
        let witness_cv = params.g1() * self.response_v
            + params.h1() * self.response_r1
            + self.vote_commitment * self.challenge;
        let witness_cv2 = self.vote_commitment * self.response_v
            + params.h1() * self.response_r2
            + self.vote_commitment * self.challenge;

        let expected = challenge(
            params,
            &ballot.vote,
            &self.vote_commitment,
            &witness_a,
            &witness_b,
            &witness_cv,
            &witness_cv2,
        );

        self.challenge == expected
    }
}

/// Derive the ballot challenge: binds the generators, the vote ciphertext, and the
/// commitment and witness elements.
fn challenge(
    params: &PublicParameters,
    vote: &Ciphertext,
    vote_commitment: &G1Projective,
    witness_a: &G1Projective,
    witness_b: &G1Projective,
    witness_cv: &G1Projective,
    witness_cv2: &G1Projective,
) -> Scalar {
    ChallengeBuilder::new()
        .with(params.g1())
        .with(params.h1())
        .with(vote)
        .with(vote_commitment)
        .with(witness_a)
        .with(witness_b)
        .with(witness_cv)
        .with(witness_cv2)
        .finish()
        .to_scalar()
}

impl ChallengeInput for VoteProof {
    fn consume(&self, builder: &mut ChallengeBuilder) {
        builder.consume(&self.vote_commitment);
        builder.consume(&self.challenge);
        builder.consume(&self.response_k);
        builder.consume(&self.response_v);
        builder.consume(&self.response_r1);
        builder.consume(&self.response_r2);
    }
}

impl ChallengeInput for BallotCiphertexts {
    fn consume(&self, builder: &mut ChallengeBuilder) {
        builder.consume(&self.vote);
        builder.consume(&self.complement);
    }
}
