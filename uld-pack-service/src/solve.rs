//! Translates between the HTTP DTOs and the core `Instance`/`SolveReport`
//! (§6). Package and ULD ids in the wire format are caller-chosen labels;
//! internally they're re-indexed by position, mirroring the CSV importer
//! in `uld_pack::io`.

use anyhow::{Context, Result};

use uld_pack::config::SolverConfig;
use uld_pack::entities::{ConflictMaps, PlaceableOn, Package, Uld, MUST_PLACE_COST};
use uld_pack::solver::{Instance, SolveOutcome, SolveReport, Solver};

use crate::dto::{PackageDto, PlacementDto, SolveRequestBody, SolveResponseBody, UldDto};

pub struct Labels {
    package_labels: Vec<String>,
    uld_labels: Vec<String>,
}

pub fn build_instance(body: &SolveRequestBody) -> Result<(Instance, Labels)> {
    let mut packages = Vec::with_capacity(body.packages.len());
    let mut package_labels = Vec::with_capacity(body.packages.len());
    for (index, dto) in body.packages.iter().enumerate() {
        packages.push(build_package(index, dto)?);
        package_labels.push(dto.id.clone());
    }

    let mut ulds = Vec::with_capacity(body.ulds.len());
    let mut uld_labels = Vec::with_capacity(body.ulds.len());
    for (index, dto) in body.ulds.iter().enumerate() {
        let uld = Uld::new(index, dto.length, dto.width, dto.height, dto.capacity)
            .with_context(|| format!("uld {}: invalid", dto.id))?;
        ulds.push(uld);
        uld_labels.push(dto.id.clone());
    }

    let conflicts = ConflictMaps::default();
    let instance = Instance { packages, ulds, conflicts };
    Ok((instance, Labels { package_labels, uld_labels }))
}

fn build_package(index: usize, dto: &PackageDto) -> Result<Package> {
    let cost = dto.cost.unwrap_or(MUST_PLACE_COST);
    Package::new(index, dto.length, dto.width, dto.height, dto.weight, cost, dto.priority, dto.fragile, dto.heavy, PlaceableOn::ALL)
        .with_context(|| format!("package {}: invalid", dto.id))
}

/// Runs one solve to completion. Synchronous and CPU-bound; callers run
/// this inside `tokio::task::spawn_blocking` (§5) so the async runtime
/// stays responsive.
pub fn solve(instance: &Instance, config: SolverConfig) -> Result<SolveReport> {
    let mut solver = Solver::new(config);
    solver.solve(instance).context("solve failed")
}

pub fn response_body(report: &SolveReport, labels: &Labels) -> SolveResponseBody {
    let placements = report
        .placements
        .iter()
        .map(|p| PlacementDto {
            package_id: labels.package_labels[p.pack_id].clone(),
            uld_id: labels.uld_labels[p.uld_id].clone(),
            p1: [p.p1().x, p.p1().y, p.p1().z],
            p2: [p.p2().x, p.p2().y, p.p2().z],
        })
        .collect();

    let unload_order = report
        .unload_order
        .iter()
        .map(|(uld_id, order)| {
            let packages = order.iter().map(|pid| labels.package_labels[*pid].clone()).collect();
            (labels.uld_labels[*uld_id].clone(), packages)
        })
        .collect();

    let unplaced_priority = match &report.outcome {
        SolveOutcome::Optimal => Vec::new(),
        SolveOutcome::Infeasible { unplaced_priority } => {
            unplaced_priority.iter().map(|pid| labels.package_labels[*pid].clone()).collect()
        }
    };

    SolveResponseBody {
        feasible: matches!(report.outcome, SolveOutcome::Optimal),
        unplaced_priority,
        placements,
        unload_order,
        total_cost: report.totals.total_cost,
        number_packed: report.totals.number_packed,
        number_priority_ulds: report.totals.number_priority_ulds,
    }
}

/// The in-process fixture returned for `mock: true` requests (§6):
/// never touches the cache, the database, or the solver.
pub fn mock_response(body: &SolveRequestBody) -> SolveResponseBody {
    SolveResponseBody {
        feasible: true,
        unplaced_priority: Vec::new(),
        placements: body
            .packages
            .iter()
            .zip(body.ulds.iter().cycle())
            .map(|(pkg, uld)| PlacementDto {
                package_id: pkg.id.clone(),
                uld_id: uld.id.clone(),
                p1: [0, 0, 0],
                p2: [pkg.length, pkg.width, pkg.height],
            })
            .collect(),
        unload_order: std::collections::HashMap::new(),
        total_cost: 0,
        number_packed: body.packages.len(),
        number_priority_ulds: if body.ulds.is_empty() { 0 } else { 1 },
    }
}
