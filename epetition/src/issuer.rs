//! The external issuer surface: endorsement of attribute commitments.
//!
//! The issuer never learns the attribute. It checks a proof of knowledge of the
//! commitment opening, bound to its own identity so an accepted transcript cannot be
//! replayed at a different issuer, and signs the commitment together with the
//! holder's authenticity key. The signature scheme itself is deployment-specific and
//! is kept behind the [`EndorsementScheme`] trait.

use crate::{credential::IssuedCredential, Rng};
use coconut_crypto::{
    parameters::PublicParameters, pedersen::Commitment, proofs::CommitmentProof,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An opaque signature from an [`EndorsementScheme`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endorsement(Vec<u8>);

impl Endorsement {
    /// Wrap an encoded signature.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The encoded signature.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// An EUF-CMA signature scheme supplied by the deployment.
///
/// Used in two roles: the issuer endorses credential anchors with it, and clients
/// authenticate their requests with it. The protocol only ever moves encoded public
/// keys and signatures, so any concrete scheme with canonical encodings fits.
pub trait EndorsementScheme {
    /// Sign a message with this scheme's secret key.
    fn endorse(&self, message: &[u8]) -> Endorsement;

    /// The canonical encoding of this scheme's public key.
    fn public_bytes(&self) -> Vec<u8>;

    /// Verify a signature under an encoded public key.
    fn verify(public_bytes: &[u8], message: &[u8], endorsement: &Endorsement) -> bool;
}

/// The reasons an issuer refuses to endorse a credential request.
///
/// Deliberately coarse: a rejected requester learns which check failed and nothing
/// else.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IssuanceError {
    /// The request's authenticity signature did not verify under the embedded
    /// client key.
    #[error("request authenticity signature is invalid")]
    BadAuthenticity,
    /// The proof of knowledge of the commitment opening did not verify.
    #[error("commitment opening proof is invalid")]
    BadProof,
}

/// A request for an issuer endorsement of a fresh attribute commitment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRequest {
    commitment: Commitment,
    client_pk_bytes: Vec<u8>,
    proof: CommitmentProof,
    authenticity: Endorsement,
}

impl CredentialRequest {
    /// Build a request for `issuer_id` from the holder's credential secret and
    /// authenticity key.
    pub fn new<E: EndorsementScheme>(
        rng: &mut impl Rng,
        params: &PublicParameters,
        secret: &crate::credential::CredentialSecret,
        client: &E,
        issuer_id: &[u8],
    ) -> Self {
        let commitment = secret.commitment(params);
        let proof = CommitmentProof::new(
            rng,
            params,
            secret.attribute(),
            secret.blinding_factor(),
            issuer_id,
        );
        let client_pk_bytes = client.public_bytes();
        let mut request = CredentialRequest {
            commitment,
            client_pk_bytes,
            proof,
            authenticity: Endorsement::from_bytes(Vec::new()),
        };
        request.authenticity = client.endorse(&request.signed_bytes());
        request
    }

    /// The byte string covered by the request's authenticity signature.
    fn signed_bytes(&self) -> Vec<u8> {
        let mut bytes = self.commitment.to_bytes().to_vec();
        bytes.extend_from_slice(&self.client_pk_bytes);
        bytes
    }
}

/// An issuer: an identity string and the endorsement key it signs with.
#[derive(Debug)]
pub struct Issuer<E> {
    identity: Vec<u8>,
    scheme: E,
}

impl<E: EndorsementScheme> Issuer<E> {
    /// Construct an issuer from its public identity and endorsement scheme.
    pub fn new(identity: impl Into<Vec<u8>>, scheme: E) -> Self {
        Self {
            identity: identity.into(),
            scheme,
        }
    }

    /// The identity string clients must bind their opening proofs to.
    pub fn identity(&self) -> &[u8] {
        &self.identity
    }

    /// The encoding of this issuer's endorsement public key.
    pub fn public_bytes(&self) -> Vec<u8> {
        self.scheme.public_bytes()
    }

    /// Check a credential request and endorse it.
    pub fn issue(
        &self,
        params: &PublicParameters,
        request: &CredentialRequest,
    ) -> Result<IssuedCredential, IssuanceError> {
        if !E::verify(
            &request.client_pk_bytes,
            &request.signed_bytes(),
            &request.authenticity,
        ) {
            return Err(IssuanceError::BadAuthenticity);
        }
        if !request.proof.verify(params, &request.commitment, &self.identity) {
            return Err(IssuanceError::BadProof);
        }

        let mut endorsed = request.commitment.to_bytes().to_vec();
        endorsed.extend_from_slice(&request.client_pk_bytes);
        let endorsement = self.scheme.endorse(&endorsed);
        Ok(IssuedCredential::new(
            request.commitment.to_bytes(),
            request.client_pk_bytes.clone(),
            endorsement,
        ))
    }
}
