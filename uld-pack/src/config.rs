//! Solver configuration (component of the ambient stack, §4.8).
//!
//! Mirrors the teacher's `LBFConfig`: a serialisable, `Copy`-able bag of
//! knobs that can be round-tripped through a config file or an HTTP request
//! body, with a hand-written [`Default`].

use serde::{Deserialize, Serialize};

use crate::Unit;

/// Tie-break rule used by the placement engine (§4.2) to choose among
/// feasible extreme-point anchors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreak {
    /// `(z, y, x)` lexicographic — builds against the back wall first.
    Wall,
    /// `(y, z, x)` lexicographic — builds in horizontal layers first.
    Layer,
    /// `(x, y, z)` lexicographic — builds in columns first.
    Column,
}

/// First-Fit-Decreasing variant used to order priority packages before the
/// genetic search has produced a decoded permutation (and as the initial
/// seed chromosome).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FfdVariant {
    /// `volume * max_volume + weight`, descending.
    Volume,
    /// `weight * max_weight + volume`, descending.
    Weight,
    /// `max_dim * max_volume + volume`, descending.
    MaxDim,
}

/// Full solver configuration. `Copy` so it can be handed to parallel GA
/// workers (§4.4/§5) without cloning overhead.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Seed for the PRNG. If `None`, the algorithm runs in non-deterministic
    /// mode, seeded from OS entropy.
    pub prng_seed: Option<u64>,

    /// Extreme-point tie-break rule (§4.2).
    pub heuristic: TieBreak,
    /// FFD variant used to sort priority packages outside the GA (and as
    /// the population's seed chromosome).
    pub ffd_variant: FfdVariant,

    /// GA population size (§4.4).
    pub population_size: usize,
    /// Number of top individuals carried unchanged each generation.
    pub elite_count: usize,
    /// Probability that a crossover gene is inherited from a random elite
    /// parent rather than a random non-elite parent.
    pub elite_bias: f64,
    /// Maximum number of generations to run.
    pub max_generations: usize,
    /// Optional wall-clock budget for the whole search, in milliseconds.
    /// `None` means "generation count is the only stopping condition".
    pub time_budget_ms: Option<u64>,

    /// Per-unplaced-priority-package penalty in the fitness function.
    pub penalty_cost: Unit,
    /// Per-ULD penalty for priority dispersion in the fitness function.
    pub cost_per_uld: Unit,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            prng_seed: Some(0),
            heuristic: TieBreak::Wall,
            ffd_variant: FfdVariant::Volume,
            population_size: 40,
            elite_count: 6,
            elite_bias: 0.8,
            max_generations: 200,
            // `solve(inputs, seed)` must be a pure function of its inputs
            // (§8); a wall-clock budget would truncate the generation loop
            // at a machine-speed-dependent point. Generation count is the
            // sole stopping condition by default — callers that accept
            // non-determinism can opt into a budget explicitly.
            time_budget_ms: None,
            penalty_cost: 10_000_000,
            cost_per_uld: 5_000,
        }
    }
}
