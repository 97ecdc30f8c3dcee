use std::collections::HashSet;

use crate::entities::{PackageId, UldId};
use crate::error::{SolverError, SolverResult};

/// Optional per-pair constraints the placement engine consults alongside
/// the geometric/weight invariants.
///
/// Both maps default to empty. Unknown ids referenced by either map are an
/// [`SolverError::InvalidInput`] at construction time, so the placement
/// engine never needs to re-check id ranges on its hot path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConflictMaps {
    /// Pairs of packages that must never share a ULD. Unordered: `(a, b)`
    /// forbids `(b, a)` too.
    package_conflicts: HashSet<(PackageId, PackageId)>,
    /// Packages barred from specific ULDs.
    pack_uld_forbidden: HashSet<(PackageId, UldId)>,
}

impl ConflictMaps {
    pub fn new(
        package_conflicts: HashSet<(PackageId, PackageId)>,
        pack_uld_forbidden: HashSet<(PackageId, UldId)>,
        n_packages: usize,
        n_ulds: usize,
    ) -> SolverResult<ConflictMaps> {
        for &(a, b) in &package_conflicts {
            if a >= n_packages || b >= n_packages {
                return Err(SolverError::InvalidInput(format!(
                    "package_conflicts references unknown package id in ({a}, {b})"
                )));
            }
        }
        for &(p, u) in &pack_uld_forbidden {
            if p >= n_packages || u >= n_ulds {
                return Err(SolverError::InvalidInput(format!(
                    "pack_uld_forbidden references unknown package/uld id in ({p}, {u})"
                )));
            }
        }

        let package_conflicts = package_conflicts
            .into_iter()
            .flat_map(|(a, b)| [(a, b), (b, a)])
            .collect();

        Ok(ConflictMaps {
            package_conflicts,
            pack_uld_forbidden,
        })
    }

    /// True iff `a` and `b` may never share a ULD.
    pub fn conflicts(&self, a: PackageId, b: PackageId) -> bool {
        self.package_conflicts.contains(&(a, b))
    }

    /// True iff `pack` is barred from `uld`.
    pub fn forbidden(&self, pack: PackageId, uld: UldId) -> bool {
        self.pack_uld_forbidden.contains(&(pack, uld))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_is_symmetric() {
        let maps = ConflictMaps::new(HashSet::from([(0, 1)]), HashSet::new(), 2, 1).unwrap();
        assert!(maps.conflicts(0, 1));
        assert!(maps.conflicts(1, 0));
        assert!(!maps.conflicts(0, 2.min(1)));
    }

    #[test]
    fn unknown_package_id_is_invalid() {
        let err = ConflictMaps::new(HashSet::from([(0, 5)]), HashSet::new(), 2, 1).unwrap_err();
        assert!(matches!(err, SolverError::InvalidInput(_)));
    }

    #[test]
    fn unknown_uld_id_in_forbidden_is_invalid() {
        let err = ConflictMaps::new(HashSet::new(), HashSet::from([(0, 3)]), 2, 1).unwrap_err();
        assert!(matches!(err, SolverError::InvalidInput(_)));
    }
}
