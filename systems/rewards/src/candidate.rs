//! Reward candidates and their standing-dependent weights.

use serde::{Deserialize, Serialize};

/// Optional candidate families a session may enable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// Oversized rewards.
    pub large: bool,
    /// Rewards that grant vertical movement.
    pub vertical: bool,
    /// Rewards outside the classic set.
    pub custom: bool,
}

impl Capabilities {
    /// Every family enabled.
    pub const ALL: Self = Self {
        large: true,
        vertical: true,
        custom: true,
    };

    /// No optional family enabled.
    pub const NONE: Self = Self {
        large: false,
        vertical: false,
        custom: false,
    };

    /// Whether every family in `required` is enabled here.
    #[must_use]
    pub const fn allows(&self, required: &Self) -> bool {
        (self.large || !required.large)
            && (self.vertical || !required.vertical)
            && (self.custom || !required.custom)
    }
}

/// Linear weight in the losing metric, clamped to `[0, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightCurve {
    /// Weight for a participant that is not behind.
    pub base: f32,
    /// Weight gained (or lost) per unit of the losing metric.
    #[serde(default)]
    pub per_losing: f32,
    /// Upper clamp.
    pub max: f32,
}

impl WeightCurve {
    /// Curve with the same weight regardless of standing.
    #[must_use]
    pub const fn flat(weight: f32) -> Self {
        Self {
            base: weight,
            per_losing: 0.0,
            max: weight,
        }
    }

    /// Weight at the given losing metric.
    #[must_use]
    pub fn weight(&self, losing: f32) -> f32 {
        let value = self.base + self.per_losing * losing;
        if value.is_nan() {
            return 0.0;
        }
        value.clamp(0.0, self.max.max(0.0))
    }

    /// Whether every parameter is finite and the clamp is non-negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.base.is_finite() && self.per_losing.is_finite() && self.max.is_finite() && self.max >= 0.0
    }
}

/// Named reward that may be drawn from the pool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    name: String,
    #[serde(default)]
    requires: Capabilities,
    weight: WeightCurve,
}

impl Candidate {
    /// Creates a candidate that needs no optional family.
    #[must_use]
    pub fn new(name: impl Into<String>, weight: WeightCurve) -> Self {
        Self {
            name: name.into(),
            requires: Capabilities::NONE,
            weight,
        }
    }

    /// Restricts the candidate to sessions enabling `requires`.
    #[must_use]
    pub fn with_requirements(mut self, requires: Capabilities) -> Self {
        self.requires = requires;
        self
    }

    /// Name of the reward.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Families the session must enable for the candidate to be drawn.
    #[must_use]
    pub const fn requires(&self) -> &Capabilities {
        &self.requires
    }

    /// Curve mapping the losing metric to a weight.
    #[must_use]
    pub const fn curve(&self) -> &WeightCurve {
        &self.weight
    }

    /// Weight at the given losing metric.
    #[must_use]
    pub fn weight(&self, losing: f32) -> f32 {
        self.weight.weight(losing)
    }
}
