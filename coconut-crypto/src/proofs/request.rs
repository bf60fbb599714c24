//! The proof of knowledge accompanying a blind-signing request.
//!
//! A 4-witness Schnorr proof over three linked commitments, showing that one party
//! simultaneously knows the ElGamal secret `d` behind its session key, the opening
//! `(m, o)` of the issuer-endorsed attribute commitment, and the randomness `k` of
//! the ciphertext `(k * g1, k * pk + m * h)`. Without this binding, a client could
//! request a blind signature over a ciphertext or attribute it does not control.

use crate::{
    common::*,
    elgamal::{Ciphertext, ElGamalKeyPair, ElGamalPublicKey, EncryptionRandomness},
    parameters::PublicParameters,
    pedersen::Commitment,
    proofs::{ChallengeBuilder, ChallengeInput},
    serde::SerializeElement,
};
use ff::Field;
use serde::{Deserialize, Serialize};

/// Proof of knowledge of `(d, m, o, k)` linking an ElGamal key, a commitment
/// opening, and an encryption of the committed attribute.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RequestProof {
    #[serde(with = "SerializeElement")]
    challenge: Scalar,
    #[serde(with = "SerializeElement")]
    response_d: Scalar,
    #[serde(with = "SerializeElement")]
    response_m: Scalar,
    #[serde(with = "SerializeElement")]
    response_o: Scalar,
    #[serde(with = "SerializeElement")]
    response_k: Scalar,
}

#[allow(clippy::too_many_arguments)]
impl RequestProof {
    /// Prove the signing-request statement.
    ///
    /// `h` is the per-credential base point and `randomness` the value returned by
    /// the encryption of `attribute * h` under the prover's own key.
    pub fn new(
        rng: &mut impl Rng,
        params: &PublicParameters,
        h: &G1Projective,
        attribute: Attribute,
        bf: BlindingFactor,
        keys: &ElGamalKeyPair,
        randomness: EncryptionRandomness,
    ) -> Self {
        let wd = Scalar::random(&mut *rng);
        let wm = Scalar::random(&mut *rng);
        let wo = Scalar::random(&mut *rng);
        let wk = Scalar::random(&mut *rng);

        let elgamal_pk = keys.public_key().to_element();
        let key_commitment = params.g1() * wd;
        let opening_commitment = params.g1() * wm + params.h1() * wo;
        let cipher_commitment_1 = params.g1() * wk;
        let cipher_commitment_2 = elgamal_pk * wk + h * wm;

        let challenge = challenge(
            params,
            h,
            &elgamal_pk,
            &key_commitment,
            &opening_commitment,
            &cipher_commitment_1,
            &cipher_commitment_2,
        );

        RequestProof {
            challenge,
            response_d: wd - challenge * keys.secret(),
            response_m: wm - challenge * attribute.to_scalar(),
            response_o: wo - challenge * bf.as_scalar(),
            response_k: wk - challenge * randomness.as_scalar(),
        }
    }

    /// Verify the proof against the public parts of a signing request.
    ///
    /// `h` must be recomputed by the verifier from the issuer-endorsed credential
    /// fields, never taken from the request itself.
    pub fn verify(
        &self,
        params: &PublicParameters,
        h: &G1Projective,
        commitment: &Commitment,
        elgamal_pk: &ElGamalPublicKey,
        ciphertext: &Ciphertext,
    ) -> bool {
        let pk = elgamal_pk.to_element();
        let key_commitment = params.g1() * self.response_d + pk * self.challenge;
        let opening_commitment = params.g1() * self.response_m
            + params.h1() * self.response_o
            + commitment.to_element() * self.challenge;
        let cipher_commitment_1 =
            params.g1() * self.response_k + ciphertext.c1() * self.challenge;
        let cipher_commitment_2 =
            pk * self.response_k + h * self.response_m + ciphertext.c2() * self.challenge;

        let expected = challenge(
            params,
            h,
            &pk,
            &key_commitment,
            &opening_commitment,
            &cipher_commitment_1,
            &cipher_commitment_2,
        );

        self.challenge == expected
    }
}

/// Derive the request challenge: binds the generators, the credential base, the
/// client key, and all three witness commitments.
fn challenge(
    params: &PublicParameters,
    h: &G1Projective,
    elgamal_pk: &G1Projective,
    key_commitment: &G1Projective,
    opening_commitment: &G1Projective,
    cipher_commitment_1: &G1Projective,
    cipher_commitment_2: &G1Projective,
) -> Scalar {
    ChallengeBuilder::new()
        .with(params.g1())
        .with(params.g2())
        .with(h)
        .with(elgamal_pk)
        .with(key_commitment)
        .with(opening_commitment)
        .with(cipher_commitment_1)
        .with(cipher_commitment_2)
        .finish()
        .to_scalar()
}

impl ChallengeInput for RequestProof {
    fn consume(&self, builder: &mut ChallengeBuilder) {
        builder.consume(&self.challenge);
        builder.consume(&self.response_d);
        builder.consume(&self.response_m);
        builder.consume(&self.response_o);
        builder.consume(&self.response_k);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{parameters::hash_to_g1, test::rng};

    struct Instance {
        params: PublicParameters,
        h: G1Projective,
        commitment: Commitment,
        keys: ElGamalKeyPair,
        ciphertext: Ciphertext,
        proof: RequestProof,
    }

    fn instance(rng: &mut impl Rng) -> Instance {
        let params = PublicParameters::shared();
        let h = hash_to_g1(b"issued credential fields");
        let attribute = Attribute::random(rng);
        let bf = BlindingFactor::new(rng);
        let commitment = Commitment::new(&params, attribute, bf);
        let keys = ElGamalKeyPair::new(rng, &params);
        let (ciphertext, randomness) =
            keys.public_key()
                .encrypt(rng, &params, attribute.to_scalar(), &h);
        let proof = RequestProof::new(rng, &params, &h, attribute, bf, &keys, randomness);
        Instance {
            params,
            h,
            commitment,
            keys,
            ciphertext,
            proof,
        }
    }

    #[test]
    fn honest_proof_verifies() {
        let mut rng = rng();
        let i = instance(&mut rng);
        assert!(i.proof.verify(
            &i.params,
            &i.h,
            &i.commitment,
            i.keys.public_key(),
            &i.ciphertext,
        ));
    }

    #[test]
    fn proof_fails_for_a_different_base_point() {
        let mut rng = rng();
        let i = instance(&mut rng);
        assert!(!i.proof.verify(
            &i.params,
            &hash_to_g1(b"some other credential"),
            &i.commitment,
            i.keys.public_key(),
            &i.ciphertext,
        ));
    }

    #[test]
    fn proof_fails_for_a_different_commitment() {
        let mut rng = rng();
        let i = instance(&mut rng);
        let other = Commitment::new(
            &i.params,
            Attribute::random(&mut rng),
            BlindingFactor::new(&mut rng),
        );
        assert!(!i
            .proof
            .verify(&i.params, &i.h, &other, i.keys.public_key(), &i.ciphertext));
    }

    #[test]
    fn proof_fails_for_a_foreign_elgamal_key() {
        let mut rng = rng();
        let i = instance(&mut rng);
        let other = ElGamalKeyPair::new(&mut rng, &i.params);
        assert!(!i.proof.verify(
            &i.params,
            &i.h,
            &i.commitment,
            other.public_key(),
            &i.ciphertext,
        ));
    }

    #[test]
    fn proof_fails_for_a_substituted_ciphertext() {
        let mut rng = rng();
        let i = instance(&mut rng);
        let other_attribute = Attribute::random(&mut rng).to_scalar();
        let (other_ct, _) =
            i.keys
                .public_key()
                .encrypt(&mut rng, &i.params, other_attribute, &i.h);
        assert!(!i.proof.verify(
            &i.params,
            &i.h,
            &i.commitment,
            i.keys.public_key(),
            &other_ct,
        ));
    }

    #[test]
    fn tampered_response_fails() {
        let mut rng = rng();
        let mut i = instance(&mut rng);
        i.proof.response_k += Scalar::one();
        assert!(!i.proof.verify(
            &i.params,
            &i.h,
            &i.commitment,
            i.keys.public_key(),
            &i.ciphertext,
        ));
    }
}
