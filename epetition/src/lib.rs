/*!
This crate describes an anonymous e-petition and referendum protocol built on the
threshold-issuance credentials defined in `coconut-crypto`. It wires the raw
primitives into the four protocol roles:

- a **client**, who holds a credential secret, obtains an issuer endorsement, and
  requests blind signature shares from the authorities;
- an external **issuer**, who endorses attribute commitments after checking a proof
  of the opening;
- a set of **signing authorities**, who each blind-sign endorsed requests exactly
  once and each hold one share of the joint ElGamal tally key;
- a **petition owner**, who verifies credential presentations and ballot proofs,
  enforces one-vote-per-credential through a nullifier store, and hands the
  homomorphically summed ballots to the sequential decryption chain.
*/
#![warn(missing_docs)]
#![warn(missing_copy_implementations, missing_debug_implementations)]
#![warn(unused_qualifications, unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
#![forbid(rustdoc::broken_intra_doc_links)]

pub mod authority;
pub mod credential;
pub mod issuer;
pub mod petition;
pub mod request;
pub mod tally;

pub use authority::{SigningAuthority, SigningRejection};
pub use credential::{CredentialSecret, IssuedCredential};
pub use issuer::{CredentialRequest, Endorsement, EndorsementScheme, IssuanceError, Issuer};
pub use petition::{BallotOutcome, PetitionError, PetitionOwner, SubmissionRejection};
pub use request::SigningRequest;
pub use tally::{AggregatedBallots, TallyChain, TallyError, TallyHop, TallyResult};

/// Trait synonym for a cryptographically secure random number generator.
pub trait Rng: rand::CryptoRng + rand::RngCore {}
impl<T: rand::CryptoRng + rand::RngCore> Rng for T {}

#[cfg(test)]
mod tests {
    use crate::issuer::{Endorsement, EndorsementScheme};
    use rand::SeedableRng;
    use sha3::{Digest, Sha3_256};

    // Seeded rng for replicable tests.
    pub fn rng() -> (impl rand::CryptoRng + rand::RngCore) {
        const TEST_RNG_SEED: [u8; 32] = *b"NEVER USE THIS FOR ANYTHING REAL";
        rand::rngs::StdRng::from_seed(TEST_RNG_SEED)
    }

    // Hash-based stand-in for a real signature scheme. Checkable and
    // deterministic, but NOT unforgeable; test use only.
    pub struct KeyedScheme {
        key: Vec<u8>,
    }

    impl KeyedScheme {
        pub fn new(key: &[u8]) -> Self {
            Self { key: key.to_vec() }
        }
    }

    impl EndorsementScheme for KeyedScheme {
        fn endorse(&self, message: &[u8]) -> Endorsement {
            let mut hasher = Sha3_256::new();
            hasher.update(&self.public_bytes());
            hasher.update(message);
            Endorsement::from_bytes(hasher.finalize().to_vec())
        }

        fn public_bytes(&self) -> Vec<u8> {
            let mut hasher = Sha3_256::new();
            hasher.update(b"pk");
            hasher.update(&self.key);
            hasher.finalize().to_vec()
        }

        fn verify(public_bytes: &[u8], message: &[u8], endorsement: &Endorsement) -> bool {
            let mut hasher = Sha3_256::new();
            hasher.update(public_bytes);
            hasher.update(message);
            hasher.finalize().as_slice() == endorsement.as_bytes()
        }
    }
}
