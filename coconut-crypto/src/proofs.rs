//! Non-interactive Schnorr-style zero-knowledge proofs, made non-interactive with
//! the Fiat-Shamir transform.
//!
//! Four proof statements cover the credential lifecycle:
//! - [`CommitmentProof`]: opening of an attribute commitment, shown to the issuer.
//! - [`RequestProof`]: the 4-witness statement accompanying a blind-signing request.
//! - [`ShowProof`]: petition-bound credential presentation with a nullifier.
//! - [`VoteProof`]: validity of an encrypted ballot bit.
//!
//! All challenges are derived through [`ChallengeBuilder`], which length-prefixes
//! every absorbed element under a versioned transcript tag.

mod challenge;
mod commitment;
mod request;
mod show;
mod vote;

pub use self::{
    challenge::{Challenge, ChallengeBuilder, ChallengeInput},
    commitment::CommitmentProof,
    request::RequestProof,
    show::ShowProof,
    vote::{BallotCiphertexts, VoteProof},
};
