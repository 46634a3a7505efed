#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Weighted reward selection that favours participants who are behind.
//!
//! Each candidate's weight is a function of the losing metric
//! `ln(max(0, leader - score) + 1)`, so the further a participant trails the
//! leader, the more the pool tilts toward candidates whose curves rise with it.

mod candidate;
mod pool;

pub use candidate::{Candidate, Capabilities, WeightCurve};
pub use pool::{CandidatePool, PoolError, PoolSource};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Candidate withheld while its exclusive mode is already running.
pub const DEFAULT_EXCLUSIVE_CANDIDATE: &str = "mega_mushroom";

/// Score of one participant relative to the current leader.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// Participant score.
    pub score: f32,
    /// Highest score among all participants.
    pub leader: f32,
}

impl Standing {
    /// Creates a standing from a score and the leading score.
    #[must_use]
    pub const fn new(score: f32, leader: f32) -> Self {
        Self { score, leader }
    }

    /// Natural log of one plus the deficit to the leader.
    #[must_use]
    pub fn losing(&self) -> f32 {
        ((self.leader - self.score).max(0.0) + 1.0).ln()
    }
}

/// Picks a candidate index given a uniform draw in `[0, 1)`.
///
/// Candidates whose requirements are not all enabled, and the candidate named
/// `excluded`, are skipped. If rounding lets the draw run past every eligible
/// weight the first eligible candidate wins; with no eligible candidate the
/// first pool entry does.
///
/// The exhaustion fallback therefore never returns a disabled or excluded
/// candidate while an eligible one exists, even when that candidate heads the
/// pool.
#[must_use]
pub fn select_index(
    candidates: &[Candidate],
    losing: f32,
    enabled: &Capabilities,
    excluded: Option<&str>,
    unit_draw: f32,
) -> usize {
    let eligible = |candidate: &Candidate| {
        enabled.allows(candidate.requires()) && Some(candidate.name()) != excluded
    };

    let total: f32 = candidates
        .iter()
        .filter(|&candidate| eligible(candidate))
        .map(|candidate| candidate.weight(losing))
        .sum();

    let mut remaining = unit_draw * total;
    let mut first_eligible = None;
    for (index, candidate) in candidates.iter().enumerate() {
        if !eligible(candidate) {
            continue;
        }
        let _ = first_eligible.get_or_insert(index);

        let weight = candidate.weight(losing);
        if remaining < weight {
            return index;
        }
        remaining -= weight;
    }

    first_eligible.unwrap_or(0)
}

/// Reward system drawing from a lazily loaded pool with a seeded stream.
#[derive(Debug)]
pub struct Rewards<S> {
    pool: CandidatePool<S>,
    rng: ChaCha8Rng,
    exclusive: String,
}

impl<S: PoolSource> Rewards<S> {
    /// Creates a reward system whose draws replay exactly for the same seed.
    #[must_use]
    pub fn new(source: S, seed: u64) -> Self {
        Self {
            pool: CandidatePool::new(source),
            rng: ChaCha8Rng::seed_from_u64(seed),
            exclusive: DEFAULT_EXCLUSIVE_CANDIDATE.to_owned(),
        }
    }

    /// Overrides the candidate withheld during its exclusive mode.
    #[must_use]
    pub fn with_exclusive(mut self, name: impl Into<String>) -> Self {
        self.exclusive = name.into();
        self
    }

    /// Candidate withheld during its exclusive mode.
    #[must_use]
    pub fn exclusive(&self) -> &str {
        &self.exclusive
    }

    /// Draws one candidate for a participant.
    ///
    /// Errors only when the pool cannot be loaded.
    pub fn pick(
        &mut self,
        standing: Standing,
        enabled: &Capabilities,
        exclusive_active: bool,
    ) -> Result<&Candidate, PoolError> {
        let candidates = self.pool.candidates()?;
        let excluded = exclusive_active.then_some(self.exclusive.as_str());
        let draw: f32 = self.rng.gen();
        let index = select_index(candidates, standing.losing(), enabled, excluded, draw);
        candidates.get(index).ok_or(PoolError::Empty)
    }

    /// Drops the cached pool so the next draw reloads it.
    pub fn reset_pool(&mut self) {
        self.pool.reset();
    }
}
