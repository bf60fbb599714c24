//! The petition owner: verifies presentations and ballots, enforces the nullifier
//! contract, and closes the petition when its quota of ballots is reached.

use crate::tally::AggregatedBallots;
use coconut_crypto::{
    elgamal::ElGamalPublicKey,
    keys::AggregateVerificationKey,
    parameters::PublicParameters,
    proofs::{BallotCiphertexts, ShowProof, VoteProof},
    signature::Signature,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use thiserror::Error;

/// The reasons a petition cannot be created.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PetitionError {
    /// A petition with this identifier already exists.
    #[error("petition already exists")]
    DuplicatePetition,
    /// A petition must admit at least one ballot.
    #[error("petition quota must be nonzero")]
    InvalidQuota,
}

/// The reasons a ballot submission is refused.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionRejection {
    /// No petition with this identifier exists.
    #[error("unknown petition")]
    UnknownPetition,
    /// The credential presentation did not verify.
    #[error("credential presentation is invalid")]
    InvalidCredentialProof,
    /// The ballot validity proof did not verify.
    #[error("ballot validity proof is invalid")]
    InvalidVoteProof,
    /// This credential has already voted on this petition.
    #[error("credential was already used on this petition")]
    AlreadyUsed,
    /// The petition reached its quota and is closed.
    #[error("petition is closed")]
    PetitionClosed,
}

/// The result of an accepted ballot.
#[derive(Debug, Clone, Copy)]
#[must_use = "a QuotaReached outcome carries the aggregated ballots for the tally"]
pub enum BallotOutcome {
    /// The ballot was recorded; the petition stays open for `remaining` more.
    Recorded {
        /// Ballots still accepted before the quota closes the petition.
        remaining: usize,
    },
    /// This ballot filled the quota. The petition is now closed and the
    /// homomorphic sums are ready for the decryption chain.
    QuotaReached(AggregatedBallots),
}

struct PetitionState {
    quota: usize,
    nullifiers: HashSet<[u8; 48]>,
    ballots: Vec<BallotCiphertexts>,
    closed: bool,
}

/// A petition owner.
///
/// Holds the identity string that credential presentations must be bound to, the
/// aggregate key of the authority set, the joint tally key, and the per-petition
/// stores.
#[derive(Debug)]
pub struct PetitionOwner {
    identity: Vec<u8>,
    agg_vk: AggregateVerificationKey,
    tally_pk: ElGamalPublicKey,
    petitions: Mutex<HashMap<String, PetitionState>>,
}

impl std::fmt::Debug for PetitionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PetitionState")
            .field("quota", &self.quota)
            .field("ballots", &self.ballots.len())
            .field("closed", &self.closed)
            .finish()
    }
}

impl PetitionOwner {
    /// Construct an owner for a fixed authority set and tally key.
    pub fn new(
        identity: impl Into<Vec<u8>>,
        agg_vk: AggregateVerificationKey,
        tally_pk: ElGamalPublicKey,
    ) -> Self {
        Self {
            identity: identity.into(),
            agg_vk,
            tally_pk,
            petitions: Mutex::new(HashMap::new()),
        }
    }

    /// The identity string presentations must bind their challenges to.
    pub fn identity(&self) -> &[u8] {
        &self.identity
    }

    /// Open a petition accepting exactly `quota` ballots.
    pub fn create_petition(&self, petition_id: &str, quota: usize) -> Result<(), PetitionError> {
        if quota == 0 {
            return Err(PetitionError::InvalidQuota);
        }
        let mut petitions = self
            .petitions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if petitions.contains_key(petition_id) {
            return Err(PetitionError::DuplicatePetition);
        }
        let previous = petitions.insert(
            petition_id.to_string(),
            PetitionState {
                quota,
                nullifiers: HashSet::new(),
                ballots: Vec::new(),
                closed: false,
            },
        );
        debug_assert!(previous.is_none());
        Ok(())
    }

    /// Verify and record one ballot.
    ///
    /// The credential presentation and the ballot proof are checked first, without
    /// touching any state; the nullifier insert is the atomic commit point, so two
    /// concurrent submissions of the same credential cannot both land and a
    /// rejection leaves the stores unchanged.
    pub fn submit_ballot(
        &self,
        params: &PublicParameters,
        petition_id: &str,
        show: &ShowProof,
        signature: &Signature,
        ballot: &BallotCiphertexts,
        vote_proof: &VoteProof,
    ) -> Result<BallotOutcome, SubmissionRejection> {
        if !show.verify(
            params,
            &self.agg_vk,
            signature,
            &self.identity,
            petition_id.as_bytes(),
        ) {
            return Err(SubmissionRejection::InvalidCredentialProof);
        }
        if !vote_proof.verify(params, &self.tally_pk, ballot) {
            return Err(SubmissionRejection::InvalidVoteProof);
        }

        let mut petitions = self
            .petitions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let petition = petitions
            .get_mut(petition_id)
            .ok_or(SubmissionRejection::UnknownPetition)?;
        if petition.closed {
            return Err(SubmissionRejection::PetitionClosed);
        }
        if !petition.nullifiers.insert(show.nullifier_bytes()) {
            return Err(SubmissionRejection::AlreadyUsed);
        }
        petition.ballots.push(*ballot);

        if petition.ballots.len() == petition.quota {
            petition.closed = true;
            // Component-wise homomorphic sums: vote ciphertexts count "yes",
            // complement ciphertexts count "no".
            let (yes, no) = petition.ballots.iter().skip(1).fold(
                (
                    *petition.ballots[0].vote(),
                    *petition.ballots[0].complement(),
                ),
                |(yes, no), recorded| (yes + *recorded.vote(), no + *recorded.complement()),
            );
            return Ok(BallotOutcome::QuotaReached(AggregatedBallots::new(yes, no)));
        }
        Ok(BallotOutcome::Recorded {
            remaining: petition.quota - petition.ballots.len(),
        })
    }

    /// Verify and record a signature-only presentation, with no ballot attached.
    ///
    /// Supports petitions that collect signatures rather than encrypted votes. The
    /// nullifier store is shared with [`Self::submit_ballot`], so a credential that
    /// has signed cannot also vote on the same petition, and vice versa. Signatures
    /// do not count toward the ballot quota.
    pub fn submit_show(
        &self,
        params: &PublicParameters,
        petition_id: &str,
        show: &ShowProof,
        signature: &Signature,
    ) -> Result<(), SubmissionRejection> {
        if !show.verify(
            params,
            &self.agg_vk,
            signature,
            &self.identity,
            petition_id.as_bytes(),
        ) {
            return Err(SubmissionRejection::InvalidCredentialProof);
        }

        let mut petitions = self
            .petitions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let petition = petitions
            .get_mut(petition_id)
            .ok_or(SubmissionRejection::UnknownPetition)?;
        if petition.closed {
            return Err(SubmissionRejection::PetitionClosed);
        }
        if !petition.nullifiers.insert(show.nullifier_bytes()) {
            return Err(SubmissionRejection::AlreadyUsed);
        }
        Ok(())
    }

    /// How many distinct credentials have voted on a petition so far.
    pub fn ballot_count(&self, petition_id: &str) -> Option<usize> {
        let petitions = self
            .petitions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        petitions.get(petition_id).map(|p| p.ballots.len())
    }
}
