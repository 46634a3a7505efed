//! Lazily loaded candidate pool.

use thiserror::Error;
use tracing::debug;

use crate::candidate::Candidate;

/// Errors raised while loading the candidate pool.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The pool provider failed.
    #[error("failed to load the reward pool: {0}")]
    Source(String),
    /// The provider returned no candidates.
    #[error("the reward pool is empty")]
    Empty,
    /// A candidate carries a curve that cannot produce weights.
    #[error("candidate `{name}` has a non-finite or negative weight curve")]
    InvalidCurve {
        /// Name of the offending candidate.
        name: String,
    },
}

/// Provider that bulk-loads every candidate.
pub trait PoolSource {
    /// Loads the whole pool in selection order.
    fn load(&self) -> Result<Vec<Candidate>, PoolError>;
}

impl PoolSource for Vec<Candidate> {
    fn load(&self) -> Result<Vec<Candidate>, PoolError> {
        Ok(self.clone())
    }
}

/// Candidate pool loaded on first use and kept until reset.
#[derive(Debug)]
pub struct CandidatePool<S> {
    source: S,
    loaded: Option<Vec<Candidate>>,
}

impl<S: PoolSource> CandidatePool<S> {
    /// Creates an unloaded pool in front of `source`.
    #[must_use]
    pub const fn new(source: S) -> Self {
        Self {
            source,
            loaded: None,
        }
    }

    /// Whether the pool has been loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Returns the candidates, loading and validating them on first use.
    ///
    /// A failed load leaves the pool unloaded so the next call retries.
    pub fn candidates(&mut self) -> Result<&[Candidate], PoolError> {
        if self.loaded.is_none() {
            let candidates = self.source.load()?;
            if candidates.is_empty() {
                return Err(PoolError::Empty);
            }
            if let Some(invalid) = candidates
                .iter()
                .find(|candidate| !candidate.curve().is_valid())
            {
                return Err(PoolError::InvalidCurve {
                    name: invalid.name().to_owned(),
                });
            }
            debug!(candidates = candidates.len(), "loaded reward pool");
            self.loaded = Some(candidates);
        }
        Ok(self.loaded.as_deref().unwrap_or_default())
    }

    /// Drops the loaded candidates so the next draw reloads them.
    pub fn reset(&mut self) {
        self.loaded = None;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::candidate::WeightCurve;

    struct CountingSource {
        loads: Cell<u32>,
        candidates: Vec<Candidate>,
    }

    impl PoolSource for CountingSource {
        fn load(&self) -> Result<Vec<Candidate>, PoolError> {
            self.loads.set(self.loads.get() + 1);
            Ok(self.candidates.clone())
        }
    }

    #[test]
    fn loads_once_until_reset() {
        let mut pool = CandidatePool::new(CountingSource {
            loads: Cell::new(0),
            candidates: vec![Candidate::new("mushroom", WeightCurve::flat(1.0))],
        });

        assert!(!pool.is_loaded());
        assert_eq!(pool.candidates().map(<[Candidate]>::len), Ok(1));
        assert_eq!(pool.candidates().map(<[Candidate]>::len), Ok(1));
        assert_eq!(pool.source.loads.get(), 1);

        pool.reset();
        assert!(!pool.is_loaded());
        let _ = pool.candidates();
        assert_eq!(pool.source.loads.get(), 2);
    }

    #[test]
    fn rejects_empty_and_invalid_pools() {
        let mut empty = CandidatePool::new(Vec::<Candidate>::new());
        assert_eq!(empty.candidates().map(<[Candidate]>::len), Err(PoolError::Empty));

        let mut invalid = CandidatePool::new(vec![Candidate::new(
            "star",
            WeightCurve::flat(f32::INFINITY),
        )]);
        assert_eq!(
            invalid.candidates().map(<[Candidate]>::len),
            Err(PoolError::InvalidCurve {
                name: "star".to_owned()
            })
        );
        assert!(!invalid.is_loaded());
    }
}
