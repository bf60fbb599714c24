//! Client-side credential material and the issuer-anchored credential record.

use crate::{issuer::Endorsement, Rng};
use coconut_crypto::{
    parameters::{hash_to_g1, PublicParameters},
    pedersen::Commitment,
    Attribute, BlindingFactor,
};
use bls12_381::G1Projective;
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;

/// The secret material behind one credential: the attribute `m` and the blinding
/// factor `o` of its commitment.
///
/// Generated fresh per credential and never shared; every proof about the
/// credential is a proof of knowledge of these two scalars.
#[derive(Debug, Clone, Copy)]
pub struct CredentialSecret {
    attribute: Attribute,
    blinding_factor: BlindingFactor,
}

impl CredentialSecret {
    /// Draw a fresh credential secret.
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            attribute: Attribute::random(rng),
            blinding_factor: BlindingFactor::new(rng),
        }
    }

    /// The public commitment `m * g1 + o * h1` to this secret.
    pub fn commitment(&self, params: &PublicParameters) -> Commitment {
        Commitment::new(params, self.attribute, self.blinding_factor)
    }

    /// The committed attribute.
    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    pub(crate) fn blinding_factor(&self) -> BlindingFactor {
        self.blinding_factor
    }
}

/// A credential anchor produced by an external issuer: the attribute commitment,
/// the holder's authenticity public key, and the issuer's endorsement over both.
///
/// This record is public. Everything the signing authorities need to verify about
/// a request is derived from these fields, so an authority never has to trust a
/// value the client supplies separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedCredential {
    #[serde(with = "BigArray")]
    commitment_bytes: [u8; 48],
    client_pk_bytes: Vec<u8>,
    endorsement: Endorsement,
}

impl IssuedCredential {
    pub(crate) fn new(
        commitment_bytes: [u8; 48],
        client_pk_bytes: Vec<u8>,
        endorsement: Endorsement,
    ) -> Self {
        Self {
            commitment_bytes,
            client_pk_bytes,
            endorsement,
        }
    }

    /// The compressed encoding of the attribute commitment.
    pub fn commitment_bytes(&self) -> &[u8; 48] {
        &self.commitment_bytes
    }

    /// The encoded authenticity public key of the credential holder.
    pub fn client_pk_bytes(&self) -> &[u8] {
        &self.client_pk_bytes
    }

    /// The issuer's endorsement over [`Self::endorsed_bytes`].
    pub fn endorsement(&self) -> &Endorsement {
        &self.endorsement
    }

    /// The byte string the issuer endorsed: commitment followed by client key.
    pub fn endorsed_bytes(&self) -> Vec<u8> {
        let mut bytes = self.commitment_bytes.to_vec();
        bytes.extend_from_slice(&self.client_pk_bytes);
        bytes
    }

    /// The per-credential base point `h`, hashed from the endorsed fields.
    ///
    /// Both the client and every authority derive `h` from this method; a base
    /// point carried inside a request is never trusted.
    pub fn base(&self) -> G1Projective {
        hash_to_g1(&self.endorsed_bytes())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tests::rng;

    #[test]
    fn base_is_deterministic_in_the_issued_fields() {
        let mut rng = rng();
        let params = PublicParameters::shared();
        let secret = CredentialSecret::new(&mut rng);
        let commitment_bytes = secret.commitment(&params).to_bytes();

        let a = IssuedCredential::new(
            commitment_bytes,
            b"client-key".to_vec(),
            Endorsement::from_bytes(vec![0u8; 64]),
        );
        let b = IssuedCredential::new(
            commitment_bytes,
            b"client-key".to_vec(),
            Endorsement::from_bytes(vec![1u8; 64]),
        );
        // The endorsement authenticates the fields but does not feed the base.
        assert_eq!(a.base(), b.base());

        let c = IssuedCredential::new(
            commitment_bytes,
            b"other-client".to_vec(),
            Endorsement::from_bytes(vec![0u8; 64]),
        );
        assert_ne!(a.base(), c.base());
    }

    #[test]
    fn issued_credential_round_trips_through_serde() {
        let mut rng = rng();
        let params = PublicParameters::shared();
        let secret = CredentialSecret::new(&mut rng);
        let issued = IssuedCredential::new(
            secret.commitment(&params).to_bytes(),
            b"client-key".to_vec(),
            Endorsement::from_bytes(vec![7u8; 32]),
        );

        let encoded = bincode::serialize(&issued).unwrap();
        let decoded: IssuedCredential = bincode::deserialize(&encoded).unwrap();
        assert_eq!(decoded.commitment_bytes(), issued.commitment_bytes());
        assert_eq!(decoded.client_pk_bytes(), issued.client_pk_bytes());
        assert_eq!(decoded.endorsement(), issued.endorsement());
        assert_eq!(decoded.base(), issued.base());
    }
}
