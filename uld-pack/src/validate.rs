//! Validator (component V, §4.6): re-checks the full invariant set (I1-I8)
//! on any candidate layout, plus rotation fidelity and reported-totals
//! agreement. This is the only component permitted to raise
//! [`SolverError::InvariantViolation`] (§7).

use std::collections::HashSet;

use crate::entities::{Package, PackageId, Placement, Uld, UldId};
use crate::error::{SolverError, SolverResult};
use crate::Unit;

/// The header triple a solution file reports (§6): total delay cost of
/// unplaced packages, number of packages packed, and number of distinct
/// ULDs carrying at least one priority package.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportedTotals {
    pub total_cost: Unit,
    pub number_packed: usize,
    pub number_priority_ulds: usize,
}

fn violation(msg: impl Into<String>) -> SolverError {
    SolverError::InvariantViolation(msg.into())
}

/// Validates `placements` against `packages`/`ulds` and, if given, checks
/// that `reported` agrees with the recomputed totals.
pub fn validate(
    packages: &[Package],
    ulds: &[Uld],
    placements: &[Placement],
    reported: Option<&ReportedTotals>,
) -> SolverResult<()> {
    for p in placements {
        if !(p.p1().x < p.p2().x && p.p1().y < p.p2().y && p.p1().z < p.p2().z) {
            return Err(violation(format!("package {}: p1 is not strictly less than p2", p.pack_id)));
        }
        let uld = find_uld(ulds, p.uld_id)
            .ok_or_else(|| violation(format!("package {}: references unknown uld {}", p.pack_id, p.uld_id)))?;
        if !uld.bounds().contains(&p.cuboid) {
            return Err(violation(format!(
                "package {} is not contained within uld {} (I2)",
                p.pack_id, p.uld_id
            )));
        }
        if p.pack_id >= packages.len() {
            return Err(violation(format!("placement references unknown package {}", p.pack_id)));
        }
    }

    for uld in ulds {
        let members: Vec<&Placement> = placements.iter().filter(|p| p.uld_id == uld.id).collect();

        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                if members[i].cuboid.intersection_volume(&members[j].cuboid) != 0 {
                    return Err(violation(format!(
                        "packages {} and {} overlap in uld {} (I3)",
                        members[i].pack_id, members[j].pack_id, uld.id
                    )));
                }
            }
        }

        let total_weight: Unit = members.iter().map(|p| packages[p.pack_id].weight).sum();
        if total_weight > uld.capacity {
            return Err(violation(format!(
                "uld {} carries weight {} over capacity {} (I4)",
                uld.id, total_weight, uld.capacity
            )));
        }
    }

    // I5/I6 as a physical (always-checkable) invariant: no package, priority
    // or not, is ever placed more than once. Whether every priority package
    // *must* be placed (I5's completeness half) is a feasibility property,
    // not a structural one — the search may legitimately leave priority
    // packages unplaced (§7's `Infeasible` outcome, scenarios 2 and 5), and
    // that is reported by the solver as data, not raised here as a fatal
    // `InvariantViolation`. `validate` only rejects a physically impossible
    // layout: the same package occupying more than one placement record.
    let mut counts = vec![0usize; packages.len()];
    for p in placements {
        if p.pack_id < counts.len() {
            counts[p.pack_id] += 1;
        }
    }
    for pack in packages {
        if counts[pack.id] > 1 {
            return Err(violation(format!(
                "package {} is placed {} times, expected at most 1 (I5/I6)",
                pack.id, counts[pack.id]
            )));
        }
    }

    for p in placements {
        let pack = &packages[p.pack_id];
        if pack.heavy && p.p1().z != 0 {
            return Err(violation(format!("heavy package {} is not on the floor (I7)", p.pack_id)));
        }
    }

    // I8 is a two-way no-stack constraint: a fragile package may carry
    // nothing on top of it, and may not itself rest on top of anything.
    // Gating only on `a`'s fragility would miss a fragile package resting
    // on a non-fragile one — see `fragile_package_refuses_to_be_stacked_on_something_else`
    // in placement.rs.
    for uld in ulds {
        let members: Vec<&Placement> = placements.iter().filter(|p| p.uld_id == uld.id).collect();
        for a in &members {
            for b in &members {
                if a.pack_id == b.pack_id {
                    continue;
                }
                if !(packages[a.pack_id].fragile || packages[b.pack_id].fragile) {
                    continue;
                }
                if b.cuboid.on_top_of(&a.cuboid) {
                    return Err(violation(format!(
                        "package {} is stacked on top of package {}, and one of them is fragile (I8)",
                        b.pack_id, a.pack_id
                    )));
                }
            }
        }
    }

    for p in placements {
        let pack = &packages[p.pack_id];
        let mut declared = [pack.lx, pack.ly, pack.lz];
        declared.sort_unstable();
        let (dx, dy, dz) = p.cuboid.dims();
        let mut placed = [dx, dy, dz];
        placed.sort_unstable();
        if declared != placed {
            return Err(violation(format!(
                "package {}'s placed dimensions are not a permutation of its declared dimensions",
                p.pack_id
            )));
        }
    }

    if let Some(reported) = reported {
        let recomputed_cost: Unit = packages
            .iter()
            .filter(|pack| counts[pack.id] == 0)
            .map(|pack| pack.cost)
            .sum();
        if reported.total_cost != recomputed_cost {
            return Err(violation(format!(
                "reported total_cost {} does not match recomputed {}",
                reported.total_cost, recomputed_cost
            )));
        }
        if reported.number_packed != placements.len() {
            return Err(violation(format!(
                "reported number_packed {} does not match recomputed {}",
                reported.number_packed,
                placements.len()
            )));
        }
        let priority_ulds: HashSet<UldId> = placements
            .iter()
            .filter(|p| packages[p.pack_id].priority)
            .map(|p| p.uld_id)
            .collect();
        if reported.number_priority_ulds != priority_ulds.len() {
            return Err(violation(format!(
                "reported number_priority_ulds {} does not match recomputed {}",
                reported.number_priority_ulds,
                priority_ulds.len()
            )));
        }
    }

    Ok(())
}

fn find_uld(ulds: &[Uld], id: UldId) -> Option<&Uld> {
    ulds.iter().find(|u| u.id == id)
}

/// Recomputes the header triple for a layout, for callers that don't
/// already have one to compare against.
pub fn compute_totals(packages: &[Package], placements: &[Placement]) -> ReportedTotals {
    let placed: HashSet<PackageId> = placements.iter().map(|p| p.pack_id).collect();
    let total_cost = packages
        .iter()
        .filter(|p| !placed.contains(&p.id))
        .map(|p| p.cost)
        .sum();
    let number_priority_ulds = placements
        .iter()
        .filter(|p| packages[p.pack_id].priority)
        .map(|p| p.uld_id)
        .collect::<HashSet<_>>()
        .len();
    ReportedTotals {
        total_cost,
        number_packed: placements.len(),
        number_priority_ulds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::PlaceableOn;
    use crate::geometry::Point3;

    fn pack(id: usize, lx: Unit, ly: Unit, lz: Unit, priority: bool, heavy: bool) -> Package {
        Package::new(id, lx, ly, lz, 1, 10, priority, false, heavy, PlaceableOn::ALL).unwrap()
    }

    #[test]
    fn valid_single_placement_passes() {
        let packages = vec![pack(0, 10, 10, 10, true, false)];
        let ulds = vec![Uld::new(0, 10, 10, 10, 100).unwrap()];
        let placements = vec![Placement::new(0, 0, Point3::ORIGIN, (10, 10, 10)).unwrap()];
        assert!(validate(&packages, &ulds, &placements, None).is_ok());
    }

    #[test]
    fn overlap_is_rejected() {
        let packages = vec![pack(0, 10, 10, 10, true, false), pack(1, 10, 10, 10, true, false)];
        let ulds = vec![Uld::new(0, 10, 10, 10, 100).unwrap()];
        let placements = vec![
            Placement::new(0, 0, Point3::ORIGIN, (10, 10, 10)).unwrap(),
            Placement::new(0, 1, Point3::ORIGIN, (10, 10, 10)).unwrap(),
        ];
        let err = validate(&packages, &ulds, &placements, None).unwrap_err();
        assert!(matches!(err, SolverError::InvariantViolation(_)));
    }

    #[test]
    fn priority_package_placed_twice_is_rejected() {
        let packages = vec![pack(0, 2, 2, 2, true, false)];
        let ulds = vec![Uld::new(0, 10, 10, 10, 100).unwrap()];
        let placements = vec![
            Placement::new(0, 0, Point3::ORIGIN, (2, 2, 2)).unwrap(),
            Placement::new(0, 0, Point3::new(2, 0, 0), (2, 2, 2)).unwrap(),
        ];
        let err = validate(&packages, &ulds, &placements, None).unwrap_err();
        assert!(matches!(err, SolverError::InvariantViolation(_)));
    }

    /// An unplaced priority package is a feasibility concern (§7's
    /// `Infeasible` outcome), not a structural one: `validate` must accept
    /// a best-effort layout that leaves one unplaced, so the solver can
    /// report it as data rather than fail outright.
    #[test]
    fn missing_priority_package_is_not_a_structural_violation() {
        let packages = vec![pack(0, 10, 10, 10, true, false)];
        let ulds = vec![Uld::new(0, 10, 10, 10, 100).unwrap()];
        assert!(validate(&packages, &ulds, &[], None).is_ok());
    }

    #[test]
    fn fragile_package_resting_on_another_is_rejected() {
        let packages = vec![pack(0, 10, 10, 5, true, false), pack(1, 10, 10, 5, true, false)];
        let mut fragile_on_top = packages.clone();
        fragile_on_top[1].fragile = true;
        let ulds = vec![Uld::new(0, 10, 10, 10, 100).unwrap()];
        let placements = vec![
            Placement::new(0, 0, Point3::ORIGIN, (10, 10, 5)).unwrap(),
            Placement::new(0, 1, Point3::new(0, 0, 5), (10, 10, 5)).unwrap(),
        ];
        let err = validate(&fragile_on_top, &ulds, &placements, None).unwrap_err();
        assert!(matches!(err, SolverError::InvariantViolation(_)));
    }

    #[test]
    fn heavy_package_off_floor_is_rejected() {
        let packages = vec![pack(0, 2, 2, 2, true, true)];
        let ulds = vec![Uld::new(0, 10, 10, 10, 100).unwrap()];
        let placements = vec![Placement::new(0, 0, Point3::new(0, 0, 1), (2, 2, 2)).unwrap()];
        let err = validate(&packages, &ulds, &placements, None).unwrap_err();
        assert!(matches!(err, SolverError::InvariantViolation(_)));
    }

    #[test]
    fn recomputed_totals_match_header() {
        let packages = vec![pack(0, 10, 10, 10, true, false)];
        let placements = vec![Placement::new(0, 0, Point3::ORIGIN, (10, 10, 10)).unwrap()];
        let totals = compute_totals(&packages, &placements);
        assert_eq!(totals.number_packed, 1);
        assert_eq!(totals.total_cost, 0);
        assert_eq!(totals.number_priority_ulds, 1);
    }
}
