use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Incumbent measure below which the search stops after the deterministic stages
pub const NEAR_PERFECT: f64 = 0.01;
/// Incumbent measure below which annealing restarts stop
pub const EXCELLENT: f64 = 0.05;

pub(crate) const ANNEAL_T_START: f64 = 20.0;
pub(crate) const ANNEAL_T_END: f64 = 0.001;
pub(crate) const ANNEAL_MAX_STEP: f64 = 0.6;
pub(crate) const ANNEAL_MIN_STEP: f64 = 0.005;
/// Rotation angle of the random-axis kick used for perturbed restarts
pub(crate) const RESTART_KICK: f64 = 0.3;

pub(crate) const REFINE_T_START: f64 = 3.0;
pub(crate) const REFINE_T_END: f64 = 1e-4;
pub(crate) const REFINE_PATIENCE: usize = 500;

pub(crate) const POLISH_ROUNDS: usize = 8;

/// Search effort preset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Default,
    Intensive,
}

impl SearchMode {
    pub fn budget(self) -> SearchBudget {
        match self {
            SearchMode::Default => SearchBudget {
                grid_steps: 18,
                grid_stride: 3,
                num_restarts: 6,
                steps_per_run: 3000,
                refinement_steps: 2000,
            },
            SearchMode::Intensive => SearchBudget {
                grid_steps: 30,
                grid_stride: 2,
                num_restarts: 12,
                steps_per_run: 8000,
                refinement_steps: 6000,
            },
        }
    }
}

/// Iteration counts for the stochastic and grid stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchBudget {
    /// Divisions of each Euler angle range
    pub grid_steps: usize,
    /// Sample every `grid_stride`-th division
    pub grid_stride: usize,
    pub num_restarts: usize,
    pub steps_per_run: usize,
    pub refinement_steps: usize,
}

impl Default for SearchBudget {
    fn default() -> Self {
        SearchMode::Default.budget()
    }
}

/// Rotation search configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub mode: SearchMode,
    /// RNG seed; `None` draws from OS entropy
    pub seed: Option<u64>,
    /// Explicit budget overriding the mode preset
    pub budget: Option<SearchBudget>,
}

impl OptimizerConfig {
    pub fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn effective_budget(&self) -> SearchBudget {
        self.budget.unwrap_or_else(|| self.mode.budget())
    }

    /// Config for the `index`-th of several independent searches.
    ///
    /// Seeded configs derive a distinct, reproducible seed per index.
    pub fn for_index(&self, index: usize) -> Self {
        Self {
            seed: self.seed.map(|s| s.wrapping_add(index as u64)),
            ..self.clone()
        }
    }

    pub(crate) fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
