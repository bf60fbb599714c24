//! Blind-signing requests sent by credential holders to the signing authorities.

use crate::{
    credential::{CredentialSecret, IssuedCredential},
    issuer::{Endorsement, EndorsementScheme},
    Rng,
};
use coconut_crypto::{
    elgamal::{Ciphertext, ElGamalKeyPair, ElGamalPublicKey},
    parameters::PublicParameters,
    proofs::RequestProof,
};
use group::Curve;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

/// A request for a blind signature share over an issued credential.
///
/// Carries the issuer-endorsed anchor, the holder's session ElGamal key, the
/// encryption of `m * h` under that key, the proof tying the three together, and an
/// authenticity signature under the key embedded in the anchor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningRequest {
    issued: IssuedCredential,
    elgamal_pk: ElGamalPublicKey,
    ciphertext: Ciphertext,
    proof: RequestProof,
    authenticity: Endorsement,
}

impl SigningRequest {
    /// Build a request over `issued` from the holder's secret material.
    ///
    /// `keys` is the holder's session ElGamal key pair; the returned request can be
    /// sent to every authority, and each returned share unblinds with the same key.
    pub fn new<E: EndorsementScheme>(
        rng: &mut impl Rng,
        params: &PublicParameters,
        secret: &CredentialSecret,
        issued: IssuedCredential,
        keys: &ElGamalKeyPair,
        client: &E,
    ) -> Self {
        let h = issued.base();
        let (ciphertext, randomness) =
            keys.public_key()
                .encrypt(rng, params, secret.attribute().to_scalar(), &h);
        let proof = RequestProof::new(
            rng,
            params,
            &h,
            secret.attribute(),
            secret.blinding_factor(),
            keys,
            randomness,
        );

        let mut request = SigningRequest {
            issued,
            elgamal_pk: *keys.public_key(),
            ciphertext,
            proof,
            authenticity: Endorsement::from_bytes(Vec::new()),
        };
        request.authenticity = client.endorse(&request.signed_bytes());
        request
    }

    /// The issuer-endorsed credential anchor.
    pub fn issued(&self) -> &IssuedCredential {
        &self.issued
    }

    /// The holder's session ElGamal public key.
    pub fn elgamal_pk(&self) -> &ElGamalPublicKey {
        &self.elgamal_pk
    }

    /// The encryption of the attribute over the per-credential base.
    pub fn ciphertext(&self) -> &Ciphertext {
        &self.ciphertext
    }

    /// The proof of knowledge linking key, commitment opening, and ciphertext.
    pub fn proof(&self) -> &RequestProof {
        &self.proof
    }

    /// The authenticity signature over [`Self::signed_bytes`].
    pub fn authenticity(&self) -> &Endorsement {
        &self.authenticity
    }

    /// The byte string covered by the request's authenticity signature: the
    /// endorsed credential fields plus the session key and ciphertext.
    pub fn signed_bytes(&self) -> Vec<u8> {
        let mut bytes = self.issued.endorsed_bytes();
        bytes.extend_from_slice(self.issued.endorsement().as_bytes());
        bytes.extend_from_slice(&self.elgamal_pk.to_element().to_affine().to_compressed());
        bytes.extend_from_slice(&self.ciphertext.c1().to_affine().to_compressed());
        bytes.extend_from_slice(&self.ciphertext.c2().to_affine().to_compressed());
        bytes
    }

    /// The digest an authority records to refuse signing the same request twice.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha3_256::new();
        hasher.update(&self.signed_bytes());
        hasher.update(self.authenticity.as_bytes());
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        digest
    }
}
