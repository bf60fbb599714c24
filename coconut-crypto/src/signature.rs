//! Blind Pointcheval-Sanders signatures over a single credential attribute.
//!
//! An authority signs an ElGamal encryption of `m * h` without learning `m`,
//! producing a [`BlindedSignatureShare`]. The client unblinds each share with its
//! ElGamal secret, sums the shares from every authority in the set into one
//! [`Signature`], and randomizes it before each presentation so that two
//! presentations of the same credential cannot be linked by signature value.
//!
//! The base point `h` is not chosen by the signer: it is derived deterministically
//! from the issued credential (see the protocol layer), and an authority always
//! recomputes it rather than trusting a value supplied with a request.

use crate::{
    common::*,
    elgamal::{Ciphertext, ElGamalKeyPair},
    keys::{AggregateVerificationKey, AuthorityKeyPair},
    proofs::{ChallengeBuilder, ChallengeInput},
    serde::SerializeElement,
    Error,
};
use ff::Field;
use serde::{Deserialize, Serialize};

/// A Pointcheval-Sanders signature `(h, s = (x + m*y) * h)` on an attribute `m`.
///
/// Produced by unblinding a share, by aggregation, or (in tests) by signing
/// directly. The pair is a valid credential only under the key set that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(with = "SerializeElement")]
    h: G1Affine,
    #[serde(with = "SerializeElement")]
    s: G1Affine,
}

/// One authority's blind signature over an encrypted attribute.
///
/// Holds the base point and the ciphertext `(a, b) = (y * c1, x*h + y * c2)`; the
/// client recovers its share of the signature with [`unblind`].
///
/// [`unblind`]: BlindedSignatureShare::unblind
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BlindedSignatureShare {
    #[serde(with = "SerializeElement")]
    h: G1Affine,
    #[serde(with = "SerializeElement")]
    a: G1Affine,
    #[serde(with = "SerializeElement")]
    b: G1Affine,
}

impl AuthorityKeyPair {
    /// Sign an attribute in the clear over the given base point.
    ///
    /// The blind issuance path never calls this; it exists for the issuing tests and
    /// to state the relation that [`BlindedSignatureShare::unblind`] recovers.
    pub fn sign(&self, attribute: Attribute, h: &G1Projective) -> Signature {
        let exponent = self.sk.x + self.sk.y * attribute.to_scalar();
        Signature {
            h: h.to_affine(),
            s: (h * exponent).to_affine(),
        }
    }

    /// Blind-sign an encrypted attribute over the base point `h`.
    ///
    /// Applies the signing key as a linear map to the ciphertext without decrypting
    /// it. The caller must have recomputed `h` from the issuer-endorsed credential
    /// fields and verified the accompanying proof of knowledge; this operation
    /// performs no validation of its own.
    pub fn blind_sign(&self, h: &G1Projective, ciphertext: &Ciphertext) -> BlindedSignatureShare {
        BlindedSignatureShare {
            h: h.to_affine(),
            a: (ciphertext.c1 * self.sk.y).to_affine(),
            b: (h * self.sk.x + ciphertext.c2 * self.sk.y).to_affine(),
        }
    }
}

impl BlindedSignatureShare {
    /// Unblind the share with the ElGamal secret it was encrypted to, recovering the
    /// signature share `(h, (x + m*y) * h)`.
    ///
    /// This always computes; a share unblinded with the wrong key yields an invalid
    /// signature rather than an error.
    pub fn unblind(&self, keys: &ElGamalKeyPair) -> Signature {
        Signature {
            h: self.h,
            s: (G1Projective::from(self.b) - self.a * keys.secret()).to_affine(),
        }
    }

    /// The base point this share was issued over.
    pub fn h(&self) -> &G1Affine {
        &self.h
    }
}

impl Signature {
    /// Sum a set of signature shares into a single signature.
    ///
    /// Every share must carry the identical base point `h`; a mismatch means the
    /// shares were issued over different credentials and aggregation fails with
    /// [`Error::ShareBaseMismatch`] rather than producing a silently invalid result.
    /// The aggregate of a single share is that share.
    pub fn aggregate(shares: &[Signature]) -> Result<Signature, Error> {
        let first = shares.first().ok_or(Error::EmptyAggregation)?;
        if shares.iter().any(|share| share.h != first.h) {
            return Err(Error::ShareBaseMismatch);
        }

        let sum: G1Projective = shares.iter().map(|share| G1Projective::from(share.s)).sum();
        Ok(Signature {
            h: first.h,
            s: sum.to_affine(),
        })
    }

    /// Re-randomize the signature into a fresh, unlinkable representative of the same
    /// credential.
    ///
    /// Must be called before every presentation; the nullifier, not the signature
    /// value, is what intentionally links repeat shows for one petition.
    pub fn randomize(&mut self, rng: &mut impl Rng) {
        let t = random_nonzero_scalar(rng);
        *self = Signature {
            h: (self.h * t).to_affine(),
            s: (self.s * t).to_affine(),
        };
    }

    /// Check whether the signature is well-formed, i.e. its base point is not the
    /// identity element.
    pub fn is_well_formed(&self) -> bool {
        !bool::from(self.h.is_identity())
    }

    /// The base point component.
    pub fn h(&self) -> &G1Affine {
        &self.h
    }

    /// The signature component.
    pub fn s(&self) -> &G1Affine {
        &self.s
    }
}

impl ChallengeInput for Signature {
    fn consume(&self, builder: &mut ChallengeBuilder) {
        builder.consume_bytes(self.h.to_bytes());
        builder.consume_bytes(self.s.to_bytes());
    }
}

impl AggregateVerificationKey {
    /// Verify a signature on an attribute against this key set.
    ///
    /// Accepts iff the base point is not the identity and
    /// `e(h, X + m*Y) == e(s, g2)`.
    pub fn verify(&self, attribute: Attribute, sig: &Signature) -> bool {
        if !sig.is_well_formed() {
            return false;
        }

        let lhs = self.x2() + self.y2() * attribute.to_scalar();
        pairing(&sig.h, &lhs.to_affine()) == pairing(&sig.s, &self.g2().to_affine())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{parameters::PublicParameters, test::rng};

    fn setup(
        rng: &mut impl Rng,
        authorities: usize,
    ) -> (PublicParameters, Vec<AuthorityKeyPair>, AggregateVerificationKey) {
        let params = PublicParameters::shared();
        let kps: Vec<_> = (0..authorities)
            .map(|_| AuthorityKeyPair::new(rng, &params))
            .collect();
        let agg = AggregateVerificationKey::aggregate(
            &kps.iter().map(|kp| kp.verification_key().clone()).collect::<Vec<_>>(),
        )
        .unwrap();
        (params, kps, agg)
    }

    #[test]
    fn signing_is_correct() {
        let mut rng = rng();
        let (_, kps, agg) = setup(&mut rng, 1);
        let attribute = Attribute::random(&mut rng);
        let h = crate::parameters::hash_to_g1(b"credential");

        let sig = kps[0].sign(attribute, &h);
        assert!(agg.verify(attribute, &sig), "signature didn't verify!");
    }

    #[test]
    fn fail_verification_of_different_attribute() {
        let mut rng = rng();
        let (_, kps, agg) = setup(&mut rng, 1);
        let attribute = Attribute::random(&mut rng);
        let h = crate::parameters::hash_to_g1(b"credential");

        let sig = kps[0].sign(attribute, &h);
        let bad_attribute = Attribute::random(&mut rng);
        assert_ne!(attribute.to_scalar(), bad_attribute.to_scalar());
        assert!(!agg.verify(bad_attribute, &sig));
    }

    #[test]
    fn fail_identity_base_point() {
        let mut rng = rng();
        let (_, _, agg) = setup(&mut rng, 1);
        let attribute = Attribute::random(&mut rng);

        let bad_sig = Signature {
            h: G1Affine::identity(),
            s: G1Projective::random(&mut rng).to_affine(),
        };
        assert!(!agg.verify(attribute, &bad_sig));
    }

    #[test]
    fn blind_signing_recovers_the_plain_signature() {
        let mut rng = rng();
        let params = PublicParameters::shared();
        let (_, kps, _) = setup(&mut rng, 1);
        let attribute = Attribute::random(&mut rng);
        let h = crate::parameters::hash_to_g1(b"credential");
        let client_keys = ElGamalKeyPair::new(&mut rng, &params);

        let (ct, _) =
            client_keys
                .public_key()
                .encrypt(&mut rng, &params, attribute.to_scalar(), &h);
        let share = kps[0].blind_sign(&h, &ct);
        let sig = share.unblind(&client_keys);

        assert_eq!(sig, kps[0].sign(attribute, &h));
    }

    #[test]
    fn unblinding_with_the_wrong_key_fails_verification() {
        let mut rng = rng();
        let params = PublicParameters::shared();
        let (_, kps, agg) = setup(&mut rng, 1);
        let attribute = Attribute::random(&mut rng);
        let h = crate::parameters::hash_to_g1(b"credential");
        let client_keys = ElGamalKeyPair::new(&mut rng, &params);
        let other_keys = ElGamalKeyPair::new(&mut rng, &params);

        let (ct, _) =
            client_keys
                .public_key()
                .encrypt(&mut rng, &params, attribute.to_scalar(), &h);
        let share = kps[0].blind_sign(&h, &ct);
        let sig = share.unblind(&other_keys);

        assert!(!agg.verify(attribute, &sig));
    }

    #[test]
    fn aggregate_of_one_share_is_identity_operation() {
        let mut rng = rng();
        let (_, kps, _) = setup(&mut rng, 1);
        let attribute = Attribute::random(&mut rng);
        let h = crate::parameters::hash_to_g1(b"credential");

        let sig = kps[0].sign(attribute, &h);
        assert_eq!(Signature::aggregate(&[sig]).unwrap(), sig);
    }

    #[test]
    fn aggregated_shares_verify_under_aggregate_key() {
        let mut rng = rng();
        let (_, kps, agg) = setup(&mut rng, 3);
        let attribute = Attribute::random(&mut rng);
        let h = crate::parameters::hash_to_g1(b"credential");

        let shares: Vec<_> = kps.iter().map(|kp| kp.sign(attribute, &h)).collect();
        let sig = Signature::aggregate(&shares).unwrap();
        assert!(agg.verify(attribute, &sig));
    }

    #[test]
    fn aggregation_fails_on_mismatched_base_points() {
        let mut rng = rng();
        let (_, kps, _) = setup(&mut rng, 2);
        let attribute = Attribute::random(&mut rng);

        let sig0 = kps[0].sign(attribute, &crate::parameters::hash_to_g1(b"credential"));
        let sig1 = kps[1].sign(attribute, &crate::parameters::hash_to_g1(b"different"));
        assert_eq!(
            Signature::aggregate(&[sig0, sig1]),
            Err(Error::ShareBaseMismatch)
        );
    }

    #[test]
    fn aggregation_of_nothing_fails() {
        assert_eq!(Signature::aggregate(&[]), Err(Error::EmptyAggregation));
    }

    #[test]
    fn randomization_preserves_validity_and_changes_representation() {
        let mut rng = rng();
        let (_, kps, agg) = setup(&mut rng, 1);
        let attribute = Attribute::random(&mut rng);
        let h = crate::parameters::hash_to_g1(b"credential");

        let sig = kps[0].sign(attribute, &h);
        let mut randomized = sig;
        randomized.randomize(&mut rng);

        assert_ne!(sig, randomized);
        assert!(agg.verify(attribute, &randomized));
    }

    #[test]
    fn signature_round_trips_through_serde() {
        let mut rng = rng();
        let (_, kps, _) = setup(&mut rng, 1);
        let attribute = Attribute::random(&mut rng);
        let h = crate::parameters::hash_to_g1(b"credential");

        let sig = kps[0].sign(attribute, &h);
        let encoded = bincode::serialize(&sig).unwrap();
        let decoded: Signature = bincode::deserialize(&encoded).unwrap();
        assert_eq!(decoded, sig);
    }

    #[test]
    fn aggregate_missing_one_authority_fails_verification() {
        let mut rng = rng();
        let (_, kps, agg) = setup(&mut rng, 3);
        let attribute = Attribute::random(&mut rng);
        let h = crate::parameters::hash_to_g1(b"credential");

        // n-of-n: dropping any share leaves an invalid aggregate.
        let shares: Vec<_> = kps[..2].iter().map(|kp| kp.sign(attribute, &h)).collect();
        let sig = Signature::aggregate(&shares).unwrap();
        assert!(!agg.verify(attribute, &sig));
    }
}
