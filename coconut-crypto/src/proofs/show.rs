//! Petition-bound credential presentation.
//!
//! A show proves possession of an aggregate signature on a hidden attribute `m`
//! while exposing `zeta = m * gs`, where `gs` is hashed from the petition
//! identifier. `zeta` is deterministic in `(m, petition)`: submitting twice to one
//! petition yields the same value, which the verifier's nullifier store catches. It
//! is nonetheless unlinkable across petitions because the bases are independent.
//!
//! The group elements are `kappa = t * g2 + X + m * Y` and `nu = t * h` for a fresh
//! `t`; `kappa` stands in for `X + m * Y` in the pairing equation, so verifying the
//! Schnorr relation plus `e(h, kappa) == e(s + nu, g2)` simultaneously checks the
//! proof of knowledge and the underlying signature.

use crate::{
    common::*,
    keys::AggregateVerificationKey,
    parameters::{hash_to_g1, PublicParameters},
    proofs::{ChallengeBuilder, ChallengeInput},
    serde::SerializeElement,
    signature::Signature,
};
use ff::Field;
use serde::{Deserialize, Serialize};

/// A credential presentation bound to one petition.
///
/// Carries the randomized signature elements `(kappa, nu)`, the nullifier `zeta`,
/// and the Schnorr proof tying them together.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShowProof {
    #[serde(with = "SerializeElement")]
    kappa: G2Projective,
    #[serde(with = "SerializeElement")]
    nu: G1Projective,
    #[serde(with = "SerializeElement")]
    zeta: G1Projective,
    #[serde(with = "SerializeElement")]
    challenge: Scalar,
    #[serde(with = "SerializeElement")]
    response_m: Scalar,
    #[serde(with = "SerializeElement")]
    response_t: Scalar,
}

impl ShowProof {
    /// Build a presentation of `signature` on `attribute` for the named petition.
    ///
    /// The signature must already be randomized by the caller; the proof draws its
    /// own fresh blinding scalar `t` on top, so the transmitted `(kappa, nu)` pair
    /// never repeats.
    pub fn new(
        rng: &mut impl Rng,
        params: &PublicParameters,
        agg_vk: &AggregateVerificationKey,
        signature: &Signature,
        attribute: Attribute,
        owner_id: &[u8],
        petition_id: &[u8],
    ) -> Self {
        let t = Scalar::random(&mut *rng);
        let gs = hash_to_g1(petition_id);
        let m = attribute.to_scalar();

        let kappa = params.g2() * t + agg_vk.x2() + agg_vk.y2() * m;
        let nu = signature.h() * t;
        let zeta = gs * m;

        let wm = Scalar::random(&mut *rng);
        let wt = Scalar::random(&mut *rng);
        let kappa_commitment = params.g2() * wt + agg_vk.x2() + agg_vk.y2() * wm;
        let nu_commitment = signature.h() * wt;
        let zeta_commitment = gs * wm;

        let challenge = challenge(
            params,
            agg_vk,
            &kappa_commitment,
            &nu_commitment,
            &zeta_commitment,
            owner_id,
        );

        ShowProof {
            kappa,
            nu,
            zeta,
            challenge,
            response_m: wm - challenge * m,
            response_t: wt - challenge * t,
        }
    }

    /// Verify the presentation.
    ///
    /// Recomputes the witness commitments from the responses and the claimed
    /// relation, re-derives the challenge, and checks the pairing equation linking
    /// `kappa`, `nu`, and the signature. Pass/fail only.
    ///
    /// The nullifier contract (rejecting a `zeta` already recorded for this
    /// petition) is verifier state, not proof math, and is enforced by the caller.
    pub fn verify(
        &self,
        params: &PublicParameters,
        agg_vk: &AggregateVerificationKey,
        signature: &Signature,
        owner_id: &[u8],
        petition_id: &[u8],
    ) -> bool {
        if !signature.is_well_formed() {
            return false;
        }
        let gs = hash_to_g1(petition_id);

        // The recombination consistent with kappa = t*g2 + X + m*Y: the X term
        // enters once unscaled and is removed from the challenge-scaled copy.
        let kappa_commitment = params.g2() * self.response_t
            + agg_vk.y2() * self.response_m
            + agg_vk.x2()
            + (self.kappa - agg_vk.x2()) * self.challenge;
        let nu_commitment = signature.h() * self.response_t + self.nu * self.challenge;
        let zeta_commitment = gs * self.response_m + self.zeta * self.challenge;

        let expected = challenge(
            params,
            agg_vk,
            &kappa_commitment,
            &nu_commitment,
            &zeta_commitment,
            owner_id,
        );
        if self.challenge != expected {
            return false;
        }

        // kappa substitutes for X + m*Y in the signature equation.
        let shifted = G1Projective::from(signature.s()) + self.nu;
        pairing(signature.h(), &self.kappa.to_affine())
            == pairing(&shifted.to_affine(), &agg_vk.g2().to_affine())
    }

    /// The nullifier exposed by this presentation.
    pub fn zeta(&self) -> &G1Projective {
        &self.zeta
    }

    /// The canonical encoding of the nullifier, as stored by verifiers.
    pub fn nullifier_bytes(&self) -> [u8; 48] {
        self.zeta.to_affine().to_compressed()
    }
}

/// Derive the show challenge: binds the generators, the aggregate key, the witness
/// commitments, and the petition owner's identity.
fn challenge(
    params: &PublicParameters,
    agg_vk: &AggregateVerificationKey,
    kappa_commitment: &G2Projective,
    nu_commitment: &G1Projective,
    zeta_commitment: &G1Projective,
    owner_id: &[u8],
) -> Scalar {
    ChallengeBuilder::new()
        .with(params.g1())
        .with(params.g2())
        .with(agg_vk.x2())
        .with(agg_vk.y2())
        .with(kappa_commitment)
        .with(nu_commitment)
        .with(zeta_commitment)
        .with_bytes(owner_id)
        .finish()
        .to_scalar()
}

impl ChallengeInput for ShowProof {
    fn consume(&self, builder: &mut ChallengeBuilder) {
        builder.consume(&self.kappa);
        builder.consume(&self.nu);
        builder.consume(&self.zeta);
        builder.consume(&self.challenge);
        builder.consume(&self.response_m);
        builder.consume(&self.response_t);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{keys::AuthorityKeyPair, test::rng};

    const OWNER: &[u8] = b"petition-owner";
    const PETITION: &[u8] = b"e-petition-42";

    struct Instance {
        params: PublicParameters,
        agg_vk: AggregateVerificationKey,
        signature: Signature,
        attribute: Attribute,
    }

    fn instance(rng: &mut impl Rng) -> Instance {
        let params = PublicParameters::shared();
        let kps: Vec<_> = (0..3)
            .map(|_| AuthorityKeyPair::new(rng, &params))
            .collect();
        let agg_vk = AggregateVerificationKey::aggregate(
            &kps.iter().map(|kp| kp.verification_key().clone()).collect::<Vec<_>>(),
        )
        .unwrap();
        let attribute = Attribute::random(rng);
        let h = hash_to_g1(b"issued credential fields");
        let shares: Vec<_> = kps.iter().map(|kp| kp.sign(attribute, &h)).collect();
        let mut signature = Signature::aggregate(&shares).unwrap();
        signature.randomize(rng);
        Instance {
            params,
            agg_vk,
            signature,
            attribute,
        }
    }

    #[test]
    fn honest_show_verifies() {
        let mut rng = rng();
        let i = instance(&mut rng);
        let show = ShowProof::new(
            &mut rng,
            &i.params,
            &i.agg_vk,
            &i.signature,
            i.attribute,
            OWNER,
            PETITION,
        );
        assert!(show.verify(&i.params, &i.agg_vk, &i.signature, OWNER, PETITION));
    }

    #[test]
    fn nullifier_is_deterministic_per_petition() {
        let mut rng = rng();
        let i = instance(&mut rng);
        let show_a = ShowProof::new(
            &mut rng,
            &i.params,
            &i.agg_vk,
            &i.signature,
            i.attribute,
            OWNER,
            PETITION,
        );
        let show_b = ShowProof::new(
            &mut rng,
            &i.params,
            &i.agg_vk,
            &i.signature,
            i.attribute,
            OWNER,
            PETITION,
        );
        // Fresh proof scalars, same nullifier.
        assert_ne!(show_a.kappa, show_b.kappa);
        assert_eq!(show_a.nullifier_bytes(), show_b.nullifier_bytes());
    }

    #[test]
    fn nullifier_is_unlinkable_across_petitions() {
        let mut rng = rng();
        let i = instance(&mut rng);
        let show_a = ShowProof::new(
            &mut rng,
            &i.params,
            &i.agg_vk,
            &i.signature,
            i.attribute,
            OWNER,
            PETITION,
        );
        let show_b = ShowProof::new(
            &mut rng,
            &i.params,
            &i.agg_vk,
            &i.signature,
            i.attribute,
            OWNER,
            b"e-petition-43",
        );
        assert_ne!(show_a.nullifier_bytes(), show_b.nullifier_bytes());
    }

    #[test]
    fn show_is_bound_to_the_petition_owner() {
        let mut rng = rng();
        let i = instance(&mut rng);
        let show = ShowProof::new(
            &mut rng,
            &i.params,
            &i.agg_vk,
            &i.signature,
            i.attribute,
            OWNER,
            PETITION,
        );
        assert!(!show.verify(&i.params, &i.agg_vk, &i.signature, b"someone-else", PETITION));
    }

    #[test]
    fn show_fails_for_the_wrong_petition() {
        let mut rng = rng();
        let i = instance(&mut rng);
        let show = ShowProof::new(
            &mut rng,
            &i.params,
            &i.agg_vk,
            &i.signature,
            i.attribute,
            OWNER,
            PETITION,
        );
        assert!(!show.verify(&i.params, &i.agg_vk, &i.signature, OWNER, b"e-petition-43"));
    }

    #[test]
    fn show_fails_with_an_invalid_signature() {
        let mut rng = rng();
        let i = instance(&mut rng);
        // A signature from a key outside the aggregated set.
        let rogue = AuthorityKeyPair::new(&mut rng, &i.params);
        let mut bad_sig = rogue.sign(i.attribute, &hash_to_g1(b"issued credential fields"));
        bad_sig.randomize(&mut rng);

        let show = ShowProof::new(
            &mut rng,
            &i.params,
            &i.agg_vk,
            &bad_sig,
            i.attribute,
            OWNER,
            PETITION,
        );
        assert!(!show.verify(&i.params, &i.agg_vk, &bad_sig, OWNER, PETITION));
    }

    #[test]
    fn tampered_show_fails() {
        let mut rng = rng();
        let i = instance(&mut rng);
        let mut show = ShowProof::new(
            &mut rng,
            &i.params,
            &i.agg_vk,
            &i.signature,
            i.attribute,
            OWNER,
            PETITION,
        );
        show.response_m += Scalar::one();
        assert!(!show.verify(&i.params, &i.agg_vk, &i.signature, OWNER, PETITION));
    }

    #[test]
    fn show_round_trips_through_serde() {
        let mut rng = rng();
        let i = instance(&mut rng);
        let show = ShowProof::new(
            &mut rng,
            &i.params,
            &i.agg_vk,
            &i.signature,
            i.attribute,
            OWNER,
            PETITION,
        );

        let encoded = bincode::serialize(&show).unwrap();
        let decoded: ShowProof = bincode::deserialize(&encoded).unwrap();
        assert_eq!(decoded.nullifier_bytes(), show.nullifier_bytes());
        assert!(decoded.verify(&i.params, &i.agg_vk, &i.signature, OWNER, PETITION));
    }

    #[test]
    fn zeta_substitution_fails() {
        let mut rng = rng();
        let i = instance(&mut rng);
        let mut show = ShowProof::new(
            &mut rng,
            &i.params,
            &i.agg_vk,
            &i.signature,
            i.attribute,
            OWNER,
            PETITION,
        );
        show.zeta = hash_to_g1(b"forged nullifier");
        assert!(!show.verify(&i.params, &i.agg_vk, &i.signature, OWNER, PETITION));
    }
}
