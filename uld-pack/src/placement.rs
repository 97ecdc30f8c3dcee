//! Placement engine (component P, §4.2): an extreme-point constructive
//! heuristic that places one package at a time into the first ULD (in
//! ascending id order) offering a feasible anchor.

use itertools::Itertools;

use crate::config::{FfdVariant, TieBreak};
use crate::entities::{ConflictMaps, Package, PackageId, Placement, Uld};
use crate::geometry::Point3;
use crate::Unit;

/// A ULD's mutable packing state: what's been placed in it so far and the
/// current extreme-point set available as anchors for the next package.
#[derive(Clone, Debug)]
pub struct UldState<'a> {
    pub uld: &'a Uld,
    pub packed_volume: Unit,
    pub packed_weight: Unit,
    pub has_priority: bool,
    placed: Vec<PlacedEntry>,
    extreme_points: Vec<Point3>,
}

#[derive(Clone, Copy, Debug)]
struct PlacedEntry {
    placement: Placement,
    fragile: bool,
}

impl<'a> UldState<'a> {
    pub fn new(uld: &'a Uld) -> UldState<'a> {
        UldState {
            uld,
            packed_volume: 0,
            packed_weight: 0,
            has_priority: false,
            placed: Vec::new(),
            extreme_points: vec![Point3::ORIGIN],
        }
    }

    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.placed.iter().map(|e| &e.placement)
    }

    pub fn reset(&mut self) {
        self.packed_volume = 0;
        self.packed_weight = 0;
        self.has_priority = false;
        self.placed.clear();
        self.extreme_points.clear();
        self.extreme_points.push(Point3::ORIGIN);
    }

    fn conflicts_with_placed(&self, pack: &Package, conflicts: &ConflictMaps) -> bool {
        self.placed
            .iter()
            .any(|e| conflicts.conflicts(pack.id, e.placement.pack_id))
    }

    /// Attempts to place `pack` in this ULD. On success, mutates the ULD's
    /// packing state (extreme points, weight, volume, `has_priority`) and
    /// returns the new placement.
    pub fn try_place(&mut self, pack: &Package, heuristic: TieBreak) -> Option<Placement> {
        if self.packed_weight + pack.weight > self.uld.capacity {
            return None;
        }

        let bounds = self.uld.bounds();

        let mut best: Option<(Placement, (Unit, Unit, Unit))> = None;
        for orientation in pack.orientations() {
            for &e in &self.extreme_points {
                if pack.heavy && e.z != 0 {
                    continue;
                }
                let Some(placement) = Placement::new(self.uld.id, pack.id, e, orientation.dims) else {
                    continue;
                };
                if !bounds.contains(&placement.cuboid) {
                    continue;
                }
                if self
                    .placed
                    .iter()
                    .any(|other| placement.cuboid.intersects(&other.placement.cuboid))
                {
                    continue;
                }
                // Fragile is a two-way no-stack constraint (I8): nothing may
                // rest on top of a fragile package, and a fragile package may
                // not itself rest on top of anything. Checking only the
                // first half left the search order-dependent — see
                // `fragile_no_stack` in tests/scenarios.rs.
                if self.placed.iter().any(|other| {
                    (other.fragile || pack.fragile) && placement.cuboid.on_top_of(&other.placement.cuboid)
                }) {
                    continue;
                }

                let key = tie_break_key(heuristic, placement.p1());
                let better = match &best {
                    None => true,
                    Some((_, best_key)) => key < *best_key,
                };
                if better {
                    best = Some((placement, key));
                }
            }
        }

        let (placement, _) = best?;
        self.commit(pack, placement);
        Some(placement)
    }

    fn commit(&mut self, pack: &Package, placement: Placement) {
        let e = placement.p1();
        self.extreme_points.retain(|&p| p != e);
        if !pack.fragile {
            let dims = placement.cuboid.dims();
            self.extreme_points.push(Point3::new(e.x + dims.0, e.y, e.z));
            self.extreme_points.push(Point3::new(e.x, e.y + dims.1, e.z));
            self.extreme_points.push(Point3::new(e.x, e.y, e.z + dims.2));
        }
        self.packed_volume += placement.cuboid.volume();
        self.packed_weight += pack.weight;
        self.has_priority |= pack.priority;
        self.placed.push(PlacedEntry {
            placement,
            fragile: pack.fragile,
        });
    }
}

fn tie_break_key(heuristic: TieBreak, p: Point3) -> (Unit, Unit, Unit) {
    match heuristic {
        TieBreak::Wall => (p.z, p.y, p.x),
        TieBreak::Layer => (p.y, p.z, p.x),
        TieBreak::Column => (p.x, p.y, p.z),
    }
}

/// Owns one [`UldState`] per ULD and places packages one at a time,
/// committing each to the first ULD (ascending id) that yields a feasible
/// anchor.
pub struct PlacementEngine<'a> {
    ulds: Vec<UldState<'a>>,
    conflicts: &'a ConflictMaps,
    heuristic: TieBreak,
}

impl<'a> PlacementEngine<'a> {
    pub fn new(ulds: &'a [Uld], conflicts: &'a ConflictMaps, heuristic: TieBreak) -> PlacementEngine<'a> {
        PlacementEngine {
            ulds: ulds.iter().map(UldState::new).collect(),
            conflicts,
            heuristic,
        }
    }

    pub fn uld_states(&self) -> &[UldState<'a>] {
        &self.ulds
    }

    pub fn uld_states_mut(&mut self) -> &mut [UldState<'a>] {
        &mut self.ulds
    }

    pub fn reset(&mut self) {
        for uld in &mut self.ulds {
            uld.reset();
        }
    }

    /// Tries every ULD in ascending id order; commits to the first
    /// feasible one. Returns `None` (not an error) if `pack` fits nowhere.
    pub fn place(&mut self, pack: &Package) -> Option<Placement> {
        for uld in &mut self.ulds {
            if self.conflicts.forbidden(pack.id, uld.uld.id) {
                continue;
            }
            if uld.conflicts_with_placed(pack, self.conflicts) {
                continue;
            }
            if let Some(placement) = uld.try_place(pack, self.heuristic) {
                return Some(placement);
            }
        }
        None
    }

    /// Places every package in `order`, returning the set of ids left
    /// unplaced. Failures are data, never errors (§4.2 / §7).
    pub fn place_all(&mut self, packages: &[Package], order: &[PackageId]) -> Vec<PackageId> {
        let mut unplaced = Vec::new();
        for &id in order {
            if self.place(&packages[id]).is_none() {
                unplaced.push(id);
            }
        }
        unplaced
    }

    pub fn all_placements(&self) -> Vec<Placement> {
        self.ulds.iter().flat_map(|u| u.placements().copied()).collect()
    }
}

/// Composite FFD sort key for priority packages (descending; largest key
/// placed first). See §4.2's "Top-level sort".
pub fn ffd_key(pack: &Package, variant: FfdVariant, max_volume: Unit, max_weight: Unit) -> Unit {
    match variant {
        FfdVariant::Volume => pack.volume() * max_volume + pack.weight,
        FfdVariant::Weight => pack.weight * max_weight + pack.volume(),
        FfdVariant::MaxDim => pack.max_dim() * max_volume + pack.volume(),
    }
}

/// Default top-level order: priority packages first (by FFD key,
/// descending), then non-priority packages by `cost / volume` descending.
pub fn default_order(packages: &[Package], ffd_variant: FfdVariant) -> Vec<PackageId> {
    let max_volume = packages.iter().map(Package::volume).max().unwrap_or(1).max(1);
    let max_weight = packages.iter().map(|p| p.weight).max().unwrap_or(1).max(1);

    let (mut priority, mut rest): (Vec<&Package>, Vec<&Package>) =
        packages.iter().partition(|p| p.priority);

    priority.sort_by_key(|p| std::cmp::Reverse(ffd_key(p, ffd_variant, max_volume, max_weight)));
    rest.sort_by(|a, b| {
        let da = a.cost as f64 / a.volume() as f64;
        let db = b.cost as f64 / b.volume() as f64;
        db.partial_cmp(&da).unwrap()
    });

    priority.into_iter().chain(rest).map(|p| p.id).collect_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{PlaceableOn, Uld};

    fn uld(lx: Unit, ly: Unit, lz: Unit, capacity: Unit) -> Uld {
        Uld::new(0, lx, ly, lz, capacity).unwrap()
    }

    fn pack(id: usize, lx: Unit, ly: Unit, lz: Unit, weight: Unit, priority: bool) -> Package {
        Package::new(id, lx, ly, lz, weight, 1, priority, false, false, PlaceableOn::ALL).unwrap()
    }

    #[test]
    fn exact_fit_places_at_origin() {
        let container = uld(10, 10, 10, 100);
        let ulds = vec![container];
        let conflicts = ConflictMaps::default();
        let mut engine = PlacementEngine::new(&ulds, &conflicts, TieBreak::Wall);
        let p = pack(0, 10, 10, 10, 50, true);
        let placement = engine.place(&p).unwrap();
        assert_eq!(placement.p1(), Point3::ORIGIN);
        assert_eq!(placement.p2(), Point3::new(10, 10, 10));
    }

    #[test]
    fn orientation_rescue_fits_via_axis_permutation() {
        let container = uld(6, 4, 4, 100);
        let ulds = vec![container];
        let conflicts = ConflictMaps::default();
        let mut engine = PlacementEngine::new(&ulds, &conflicts, TieBreak::Wall);
        let p = pack(0, 4, 4, 6, 1, true);
        let placement = engine.place(&p).unwrap();
        assert_eq!(placement.p1(), Point3::ORIGIN);
    }

    #[test]
    fn weight_capacity_blocks_second_package() {
        let container = uld(10, 10, 10, 10);
        let ulds = vec![container];
        let conflicts = ConflictMaps::default();
        let mut engine = PlacementEngine::new(&ulds, &conflicts, TieBreak::Wall);
        let a = pack(0, 5, 10, 10, 6, true);
        let b = pack(1, 5, 10, 10, 6, true);
        assert!(engine.place(&a).is_some());
        assert!(engine.place(&b).is_none());
    }

    #[test]
    fn column_heuristic_walks_unit_cubes_along_x() {
        let container = uld(10, 10, 10, 100);
        let ulds = vec![container];
        let conflicts = ConflictMaps::default();
        let mut engine = PlacementEngine::new(&ulds, &conflicts, TieBreak::Column);
        let cubes = [pack(0, 1, 1, 1, 1, true), pack(1, 1, 1, 1, 1, true), pack(2, 1, 1, 1, 1, true)];
        let anchors: Vec<Point3> = cubes.iter().map(|p| engine.place(p).unwrap().p1()).collect();
        assert_eq!(anchors, vec![Point3::new(0, 0, 0), Point3::new(1, 0, 0), Point3::new(2, 0, 0)]);
    }

    #[test]
    fn fragile_package_blocks_stacking() {
        let container = uld(10, 10, 10, 100);
        let ulds = vec![container];
        let conflicts = ConflictMaps::default();
        let mut engine = PlacementEngine::new(&ulds, &conflicts, TieBreak::Wall);
        let a = Package::new(0, 10, 10, 5, 1, 1, true, true, false, PlaceableOn::ALL).unwrap();
        let b = Package::new(1, 10, 10, 5, 1, 1, true, false, false, PlaceableOn::ALL).unwrap();
        assert!(engine.place(&a).is_some());
        assert!(engine.place(&b).is_none());
    }

    /// The no-stack constraint is symmetric: a fragile package also can't
    /// land on top of a non-fragile one, regardless of placement order.
    #[test]
    fn fragile_package_refuses_to_be_stacked_on_something_else() {
        let container = uld(10, 10, 10, 100);
        let ulds = vec![container];
        let conflicts = ConflictMaps::default();
        let mut engine = PlacementEngine::new(&ulds, &conflicts, TieBreak::Wall);
        let b = Package::new(0, 10, 10, 5, 1, 1, true, false, false, PlaceableOn::ALL).unwrap();
        let a = Package::new(1, 10, 10, 5, 1, 1, true, true, false, PlaceableOn::ALL).unwrap();
        assert!(engine.place(&b).is_some());
        assert!(engine.place(&a).is_none());
    }
}
