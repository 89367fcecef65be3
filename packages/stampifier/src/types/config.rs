//! Configuration types for stamp page picking and story building.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::StampError;

/// Strategy used to cap the candidate stamp pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CappingMethod {
    /// Approximate budgeted maximum coverage. Returns an unordered set.
    #[default]
    BudgetedMaxCover,

    /// Greedy interestingness sequence. Returns a deliberately ordered list.
    InterestingSequencePicker,

    /// Budgeted max cover for small candidate lists, the sequence picker above
    /// `PickerConfig::max_cover_candidate_limit`.
    Auto,
}

impl CappingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CappingMethod::BudgetedMaxCover => "budgeted-max-cover",
            CappingMethod::InterestingSequencePicker => "interesting-sequence-picker",
            CappingMethod::Auto => "auto",
        }
    }
}

impl fmt::Display for CappingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CappingMethod {
    type Err = StampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "budgeted-max-cover" => Ok(CappingMethod::BudgetedMaxCover),
            "interesting-sequence-picker" => Ok(CappingMethod::InterestingSequencePicker),
            "auto" => Ok(CappingMethod::Auto),
            other => Err(StampError::UnknownCappingMethod(other.to_string())),
        }
    }
}

/// Cost of including a page, by page kind.
///
/// Cheaper kinds are easier to fit into a budget, so they are the ones the
/// budgeted solver favours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverCosts {
    pub embedded: f32,
    pub quoted: f32,
    /// Any page showing an image or video
    pub visual: f32,
    pub text_only: f32,
}

impl Default for CoverCosts {
    fn default() -> Self {
        Self {
            embedded: 1.0,
            quoted: 1.0,
            visual: 1.5,
            text_only: 2.0,
        }
    }
}

/// Weights of the three interestingness signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Reward for switching coarse page type relative to the last pick
    pub content_change: f32,

    /// Reward for covering summary sentences not yet covered, per unit cost
    pub unpicked_weight_to_cost: f32,

    /// Reward for intrinsically richer page types
    pub content_type: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            content_change: 1.0,
            unpicked_weight_to_cost: 1.0,
            content_type: 1.0,
        }
    }
}

/// Tuning for the budgeted max cover solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Size of the seed subsets enumerated exhaustively (`k`).
    ///
    /// Must be in `1..=MAX_SEED_SUBSET_SIZE`. Default: 3.
    pub seed_subset_size: usize,

    /// Step of the binary search on the budget.
    ///
    /// If None, derived from the smallest cost difference between covers.
    pub budget_step: Option<f32>,

    /// Wall-clock limit for one solve.
    ///
    /// Checked while enumerating the size-k seeds. When it expires the best
    /// cover found so far is returned. None means no limit.
    pub deadline: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            seed_subset_size: 3,
            budget_step: None,
            deadline: None,
        }
    }
}

impl SolverConfig {
    /// Largest supported seed subset size. Enumeration is `O(n^k)` per
    /// budget probe, and the candidate limit assumes cubic cost.
    pub const MAX_SEED_SUBSET_SIZE: usize = 3;

    /// Check the seed subset size.
    pub fn validate(&self) -> Result<(), StampError> {
        if !(1..=Self::MAX_SEED_SUBSET_SIZE).contains(&self.seed_subset_size) {
            return Err(StampError::InvalidSeedSubsetSize {
                actual: self.seed_subset_size,
                max: Self::MAX_SEED_SUBSET_SIZE,
            });
        }
        Ok(())
    }

    /// Set the seed subset size.
    pub fn with_seed_subset_size(mut self, k: usize) -> Self {
        self.seed_subset_size = k;
        self
    }

    /// Set an explicit budget step.
    pub fn with_budget_step(mut self, step: f32) -> Self {
        self.budget_step = Some(step);
        self
    }

    /// Set the solve deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Configuration for the stamp page picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickerConfig {
    /// Similarity at which a page is considered to cover a summary sentence
    /// (budgeted max cover).
    ///
    /// Default: 0.4.
    pub cover_threshold: f32,

    /// Same threshold, used by the interesting sequence picker.
    ///
    /// Default: 0.5.
    pub sequence_threshold: f32,

    /// Largest candidate count for which budgeted max cover is used.
    ///
    /// The seed enumeration is cubic in the candidate count, so above this
    /// the picker switches to the sequence picker. Default: 20.
    pub max_cover_candidate_limit: usize,

    #[serde(default)]
    pub costs: CoverCosts,

    #[serde(default)]
    pub weights: ScoreWeights,

    #[serde(default)]
    pub solver: SolverConfig,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            cover_threshold: 0.4,
            sequence_threshold: 0.5,
            max_cover_candidate_limit: 20,
            costs: CoverCosts::default(),
            weights: ScoreWeights::default(),
            solver: SolverConfig::default(),
        }
    }
}

impl PickerConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cover threshold for budgeted max cover.
    pub fn with_cover_threshold(mut self, threshold: f32) -> Self {
        self.cover_threshold = threshold;
        self
    }

    /// Set the cover threshold for the sequence picker.
    pub fn with_sequence_threshold(mut self, threshold: f32) -> Self {
        self.sequence_threshold = threshold;
        self
    }

    /// Set the candidate count above which budgeted max cover is not used.
    pub fn with_max_cover_candidate_limit(mut self, limit: usize) -> Self {
        self.max_cover_candidate_limit = limit;
        self
    }

    pub fn with_costs(mut self, costs: CoverCosts) -> Self {
        self.costs = costs;
        self
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }
}

/// Configuration for building a whole stamp story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryConfig {
    /// Maximum number of stamp pages in the story.
    ///
    /// Default: 10.
    pub max_pages: usize,

    /// Default: budgeted max cover.
    #[serde(default)]
    pub capping_method: CappingMethod,

    #[serde(default)]
    pub picker: PickerConfig,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            max_pages: 10,
            capping_method: CappingMethod::default(),
            picker: PickerConfig::default(),
        }
    }
}

impl StoryConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page cap.
    pub fn with_max_pages(mut self, max: usize) -> Self {
        self.max_pages = max;
        self
    }

    /// Set the capping method.
    pub fn with_capping_method(mut self, method: CappingMethod) -> Self {
        self.capping_method = method;
        self
    }

    /// Set the picker config.
    pub fn with_picker(mut self, picker: PickerConfig) -> Self {
        self.picker = picker;
        self
    }
}
