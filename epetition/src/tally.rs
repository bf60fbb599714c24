//! The sequential n-of-n tally over the joint ElGamal key.
//!
//! The homomorphic sums of the "yes" and "no" ballot ciphertexts travel down the
//! ordered authority list from the last authority to the first, each hop stripping
//! one tally-key share with a partial decryption. After hop 0 the `c2` components
//! hold `count * h1`, which a bounded discrete-log scan converts back to integers.
//!
//! An unavailable hop is retried a bounded number of times, with the delay between
//! attempts doubling each time, and then reported as a terminal
//! [`TallyError::Stalled`] naming the hop, so a chain that cannot finish surfaces
//! as a result instead of hanging.

use coconut_crypto::{
    elgamal::{bounded_discrete_log, Ciphertext},
    parameters::PublicParameters,
};
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// How many times a single hop is attempted before the chain gives up on it.
const MAX_HOP_ATTEMPTS: usize = 3;

/// Delay before the first retry of an unresponsive hop; doubles per attempt.
const HOP_RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// The homomorphic sums of all accepted ballots for one petition.
#[derive(Debug, Clone, Copy)]
pub struct AggregatedBallots {
    yes: Ciphertext,
    no: Ciphertext,
}

impl AggregatedBallots {
    /// Assemble the running pair from its components.
    pub fn new(yes: Ciphertext, no: Ciphertext) -> Self {
        Self { yes, no }
    }

    /// The running "yes" ciphertext.
    pub fn yes(&self) -> &Ciphertext {
        &self.yes
    }

    /// The running "no" ciphertext.
    pub fn no(&self) -> &Ciphertext {
        &self.no
    }
}

/// One decryption hop in the tally chain.
///
/// Returns `None` when the hop is currently unable to answer; the chain retries a
/// bounded number of times before declaring the tally stalled.
pub trait TallyHop {
    /// Strip this hop's key share from both running ciphertexts.
    fn strip(&self, ballots: &AggregatedBallots) -> Option<AggregatedBallots>;
}

/// The reasons a tally fails to produce counts.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TallyError {
    /// A hop stayed unavailable through every attempt. Terminal for this run; the
    /// named hop must recover before the tally can be re-run.
    #[error("tally stalled: hop {hop} did not answer")]
    Stalled {
        /// Index of the hop that did not answer.
        hop: usize,
    },
    /// A fully decrypted count fell outside the expected range, which means the
    /// inputs did not come from a quota-bounded set of valid ballots.
    #[error("decrypted count outside the expected range")]
    CountOutOfRange,
}

/// The final counts of a petition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TallyResult {
    /// Number of "yes" ballots.
    pub yes: u64,
    /// Number of "no" ballots.
    pub no: u64,
}

/// An ordered chain of decryption hops.
///
/// The order must list the same authorities whose public key shares were summed
/// into the joint tally key; the chain walks them from the last to the first.
pub struct TallyChain<'a> {
    hops: Vec<&'a dyn TallyHop>,
    backoff: Duration,
}

impl<'a> TallyChain<'a> {
    /// Build a chain over the given hop order with the default retry backoff.
    pub fn new(hops: Vec<&'a dyn TallyHop>) -> Self {
        Self {
            hops,
            backoff: HOP_RETRY_BACKOFF,
        }
    }

    /// Override the delay before the first retry of an unresponsive hop.
    ///
    /// The delay doubles on each further attempt. A zero duration retries
    /// immediately.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Run the chain over the aggregated ballots and recover the counts.
    ///
    /// `bound` is the maximum credible value for either count, normally the
    /// petition quota.
    pub fn run(
        &self,
        params: &PublicParameters,
        aggregated: AggregatedBallots,
        bound: u64,
    ) -> Result<TallyResult, TallyError> {
        let mut running = aggregated;
        for hop in (0..self.hops.len()).rev() {
            running = self.attempt_hop(hop, &running)?;
        }

        let yes = bounded_discrete_log(running.yes.c2(), params.h1(), bound)
            .ok_or(TallyError::CountOutOfRange)?;
        let no = bounded_discrete_log(running.no.c2(), params.h1(), bound)
            .ok_or(TallyError::CountOutOfRange)?;
        Ok(TallyResult { yes, no })
    }

    fn attempt_hop(
        &self,
        hop: usize,
        running: &AggregatedBallots,
    ) -> Result<AggregatedBallots, TallyError> {
        for attempt in 0..MAX_HOP_ATTEMPTS {
            if let Some(next) = self.hops[hop].strip(running) {
                return Ok(next);
            }
            if attempt + 1 < MAX_HOP_ATTEMPTS {
                thread::sleep(self.backoff * (1u32 << attempt));
            }
        }
        Err(TallyError::Stalled { hop })
    }
}
