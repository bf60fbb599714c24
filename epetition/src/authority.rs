//! A signing authority: verifies requests, blind-signs each at most once, and holds
//! one share of the joint ElGamal tally key.

use crate::{
    issuer::EndorsementScheme,
    request::SigningRequest,
    tally::{AggregatedBallots, TallyHop},
    Rng,
};
use coconut_crypto::{
    elgamal::{ElGamalKeyPair, ElGamalPublicKey},
    keys::{AuthorityKeyPair, VerificationKey},
    parameters::PublicParameters,
    pedersen::Commitment,
    signature::BlindedSignatureShare,
};
use std::collections::HashSet;
use std::sync::Mutex;
use thiserror::Error;

/// The reasons an authority refuses to blind-sign a request.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SigningRejection {
    /// The credential anchor is not endorsed by the expected issuer.
    #[error("issuer endorsement is invalid")]
    BadEndorsement,
    /// The request's authenticity signature did not verify under the key embedded
    /// in the anchor.
    #[error("request authenticity signature is invalid")]
    BadAuthenticity,
    /// An encoded field of the request did not decode to a canonical value.
    #[error("request contains a malformed encoding")]
    MalformedRequest,
    /// The proof of knowledge did not verify.
    #[error("signing request proof is invalid")]
    BadProof,
    /// This authority has already signed this exact request.
    #[error("request was already signed by this authority")]
    AlreadySigned,
}

/// One signing authority.
///
/// Holds a Pointcheval-Sanders key pair, the ElGamal share it contributes to the
/// joint tally key, the endorsement key of the issuer it trusts, and the set of
/// request digests it has already signed.
#[derive(Debug)]
pub struct SigningAuthority {
    keys: AuthorityKeyPair,
    tally_share: ElGamalKeyPair,
    issuer_public: Vec<u8>,
    signed: Mutex<HashSet<[u8; 32]>>,
}

impl SigningAuthority {
    /// Set up an authority with fresh signing and tally-share keys.
    pub fn new(rng: &mut impl Rng, params: &PublicParameters, issuer_public: Vec<u8>) -> Self {
        Self {
            keys: AuthorityKeyPair::new(rng, params),
            tally_share: ElGamalKeyPair::new(rng, params),
            issuer_public,
            signed: Mutex::new(HashSet::new()),
        }
    }

    /// This authority's Pointcheval-Sanders verification key.
    pub fn verification_key(&self) -> &VerificationKey {
        self.keys.verification_key()
    }

    /// The public half of this authority's tally key share.
    pub fn tally_public_key(&self) -> &ElGamalPublicKey {
        self.tally_share.public_key()
    }

    /// Verify a signing request end to end and return a blinded signature share.
    ///
    /// The per-credential base `h` is recomputed from the endorsed anchor fields;
    /// nothing position-dependent in the request is trusted. Duplicate detection is
    /// a check-and-insert under one lock, so two concurrent submissions of the same
    /// request cannot both be signed, and any rejection leaves the store unchanged.
    pub fn blind_sign<E: EndorsementScheme>(
        &self,
        params: &PublicParameters,
        request: &SigningRequest,
    ) -> Result<BlindedSignatureShare, SigningRejection> {
        let issued = request.issued();
        if !E::verify(
            &self.issuer_public,
            &issued.endorsed_bytes(),
            issued.endorsement(),
        ) {
            return Err(SigningRejection::BadEndorsement);
        }
        if !E::verify(
            issued.client_pk_bytes(),
            &request.signed_bytes(),
            request.authenticity(),
        ) {
            return Err(SigningRejection::BadAuthenticity);
        }

        let commitment = Commitment::from_bytes(issued.commitment_bytes())
            .ok_or(SigningRejection::MalformedRequest)?;
        let h = issued.base();
        if !request.proof().verify(
            params,
            &h,
            &commitment,
            request.elgamal_pk(),
            request.ciphertext(),
        ) {
            return Err(SigningRejection::BadProof);
        }

        {
            let mut signed = self
                .signed
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if !signed.insert(request.digest()) {
                return Err(SigningRejection::AlreadySigned);
            }
        }

        Ok(self.keys.blind_sign(&h, request.ciphertext()))
    }
}

impl TallyHop for SigningAuthority {
    /// Strip this authority's tally share from both running ciphertexts.
    fn strip(&self, ballots: &AggregatedBallots) -> Option<AggregatedBallots> {
        Some(AggregatedBallots::new(
            self.tally_share.partial_decrypt(ballots.yes()),
            self.tally_share.partial_decrypt(ballots.no()),
        ))
    }
}
