//! Solver orchestration (§4.7): the counterpart of the teacher's
//! `LBFOptimizer`. Owns a [`SolverConfig`], a parsed [`Instance`], and a
//! seeded PRNG; runs the genetic search to completion, validates the
//! winning layout, and derives its unload order.

use std::collections::HashMap;

use log::info;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use thousands::Separable;

use crate::config::SolverConfig;
use crate::entities::{ConflictMaps, PackageId, Placement, Uld, UldId};
use crate::entities::Package;
use crate::error::SolverResult;
use crate::search::GeneticSearch;
use crate::unload;
use crate::validate::{self, ReportedTotals};

/// A solve invocation's input: packages, ULDs, and their optional conflict
/// maps. Constructed once per solve; packages/ULDs are validated at
/// construction (`Package::new`/`Uld::new`/`ConflictMaps::new`).
#[derive(Clone, Debug)]
pub struct Instance {
    pub packages: Vec<Package>,
    pub ulds: Vec<Uld>,
    pub conflicts: ConflictMaps,
}

/// Whether every priority package was placed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveOutcome {
    Optimal,
    /// One or more priority packages could not be placed (§7). Carries the
    /// best-effort layout anyway — the caller decides whether to retry
    /// with relaxed constraints.
    Infeasible { unplaced_priority: Vec<PackageId> },
}

/// The bundle `Solver::solve` returns: the winning layout, its unload
/// order per ULD, the recomputed header triple, and which packages (if
/// any) were left unplaced.
#[derive(Clone, Debug)]
pub struct SolveReport {
    pub outcome: SolveOutcome,
    pub placements: Vec<Placement>,
    pub unplaced: Vec<PackageId>,
    pub unload_order: HashMap<UldId, Vec<PackageId>>,
    pub totals: ReportedTotals,
}

pub struct Solver {
    config: SolverConfig,
    rng: SmallRng,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Solver {
        let rng = match config.prng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Solver { config, rng }
    }

    /// Runs the search to completion (or its generation/time budget) and
    /// returns the validated best layout found.
    pub fn solve(&mut self, instance: &Instance) -> SolverResult<SolveReport> {
        self.solve_cancellable(instance, || false)
    }

    /// As [`Solver::solve`], but `cancel` is polled once per generation
    /// boundary (§5); on cancellation the best-so-far layout is used.
    pub fn solve_cancellable(&mut self, instance: &Instance, cancel: impl FnMut() -> bool) -> SolverResult<SolveReport> {
        info!(
            "solving instance: {} packages ({} priority), {} ulds",
            instance.packages.len(),
            instance.packages.iter().filter(|p| p.priority).count(),
            instance.ulds.len()
        );

        let search = GeneticSearch::new(&instance.packages, &instance.ulds, &instance.conflicts, self.config);
        let (placements, fitness) = search.run(&mut self.rng, cancel);

        info!(
            "search finished: {} package(s) placed, fitness {}",
            placements.len(),
            (fitness.round() as i64).separate_with_commas()
        );

        let placed_ids: std::collections::HashSet<PackageId> = placements.iter().map(|p| p.pack_id).collect();
        let unplaced: Vec<PackageId> = instance
            .packages
            .iter()
            .filter(|p| !placed_ids.contains(&p.id))
            .map(|p| p.id)
            .collect();
        let unplaced_priority: Vec<PackageId> = unplaced
            .iter()
            .copied()
            .filter(|&id| instance.packages[id].priority)
            .collect();

        let totals = validate::compute_totals(&instance.packages, &placements);
        validate::validate(&instance.packages, &instance.ulds, &placements, Some(&totals))?;

        let unload_order = unload::unload_plan(&placements, &instance.ulds);

        let outcome = if unplaced_priority.is_empty() {
            SolveOutcome::Optimal
        } else {
            SolveOutcome::Infeasible { unplaced_priority }
        };

        Ok(SolveReport {
            outcome,
            placements,
            unplaced,
            unload_order,
            totals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::PlaceableOn;

    fn pack(id: usize, lx: i64, ly: i64, lz: i64, weight: i64, cost: i64, priority: bool) -> Package {
        Package::new(id, lx, ly, lz, weight, cost, priority, false, false, PlaceableOn::ALL).unwrap()
    }

    #[test]
    fn single_uld_single_package_exact_fit() {
        let instance = Instance {
            packages: vec![pack(0, 10, 10, 10, 50, 1, true)],
            ulds: vec![Uld::new(0, 10, 10, 10, 100).unwrap()],
            conflicts: ConflictMaps::default(),
        };
        let mut config = SolverConfig::default();
        config.max_generations = 3;
        config.population_size = 6;
        let mut solver = Solver::new(config);
        let report = solver.solve(&instance).unwrap();
        assert_eq!(report.outcome, SolveOutcome::Optimal);
        assert_eq!(report.totals.number_packed, 1);
        assert_eq!(report.totals.number_priority_ulds, 1);
        assert_eq!(report.totals.total_cost, 0);
    }

    #[test]
    fn weight_bound_leaves_one_priority_package_unplaced() {
        let instance = Instance {
            packages: vec![pack(0, 5, 10, 10, 6, 1, true), pack(1, 5, 10, 10, 6, 1, true)],
            ulds: vec![Uld::new(0, 10, 10, 10, 10).unwrap()],
            conflicts: ConflictMaps::default(),
        };
        let mut config = SolverConfig::default();
        config.max_generations = 5;
        config.population_size = 6;
        let mut solver = Solver::new(config);
        let report = solver.solve(&instance).unwrap();
        assert_eq!(report.placements.len(), 1);
        match report.outcome {
            SolveOutcome::Infeasible { unplaced_priority } => assert_eq!(unplaced_priority.len(), 1),
            SolveOutcome::Optimal => panic!("expected infeasible outcome"),
        }
    }
}
