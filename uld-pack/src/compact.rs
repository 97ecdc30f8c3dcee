//! Compactor (component C, §4.3): slides placed cuboids against each of
//! the four lateral faces of their ULD to close waste pockets left by the
//! placement engine.
//!
//! Each directional pass computes, for every placement (processed nearest-
//! wall-first), the furthest in-bounds, collision-free offset along the
//! moving axis and translates it there in one step. This is equivalent to
//! the unit-step sliding described in §4.3 — same final position, without
//! the O(distance) loop — and realises the canonical "slide to the last
//! collision-free step" semantics called out under the REDESIGN FLAGS
//! resolution for `push_to_side_face_first`'s off-by-one.

use std::cmp::Reverse;

use crate::entities::{Package, Placement, Uld};
use crate::geometry::{Axis, Cuboid};
use crate::Unit;

/// The four lateral compaction passes, in the order §4.3 specifies.
const PASSES: [(Axis, bool); 4] = [(Axis::X, false), (Axis::X, true), (Axis::Y, false), (Axis::Y, true)];

/// Compacts `placements` in place, ULD by ULD, running all four passes.
/// Never creates or destroys placements, and never touches the `z` axis or
/// `pack_id`/`uld_id` fields. `packages` is consulted only to keep a lateral
/// slide from sliding a package's footprint into alignment under or over a
/// fragile package's (I8) — see `slide_pass`.
pub fn compact(placements: &mut [Placement], ulds: &[Uld], packages: &[Package]) {
    for uld in ulds {
        let bounds = uld.bounds();
        let members: Vec<usize> = placements
            .iter()
            .enumerate()
            .filter(|(_, p)| p.uld_id == uld.id)
            .map(|(i, _)| i)
            .collect();
        if members.len() < 2 {
            continue;
        }
        for &(axis, positive) in &PASSES {
            slide_pass(placements, &members, &bounds, axis, positive, packages);
        }
    }
}

fn slide_pass(
    placements: &mut [Placement],
    members: &[usize],
    bounds: &Cuboid,
    axis: Axis,
    positive: bool,
    packages: &[Package],
) {
    let mut order = members.to_vec();
    if positive {
        order.sort_by_key(|&i| Reverse(placements[i].cuboid.p2.get(axis)));
    } else {
        order.sort_by_key(|&i| placements[i].cuboid.p1.get(axis));
    }

    for &i in &order {
        let cur = placements[i].cuboid;
        let cur_fragile = packages[placements[i].pack_id].fragile;
        let boundary = if positive { bounds.p2.get(axis) } else { bounds.p1.get(axis) };

        let mut stop = boundary;
        for &j in members {
            if j == i {
                continue;
            }
            let other = placements[j].cuboid;
            let other_fragile = packages[placements[j].pack_id].fragile;
            let blocks = overlaps_on_other_axes(&cur, &other, axis)
                || would_slide_into_fragile_stack(&cur, cur_fragile, &other, other_fragile, axis);
            if !blocks {
                continue;
            }
            if positive {
                if other.p1.get(axis) >= cur.p2.get(axis) {
                    stop = stop.min(other.p1.get(axis));
                }
            } else if other.p2.get(axis) <= cur.p1.get(axis) {
                stop = stop.max(other.p2.get(axis));
            }
        }

        let axis_len = cur.p2.get(axis) - cur.p1.get(axis);
        let new_p1 = if positive { stop - axis_len } else { stop };
        placements[i].cuboid = cur.translated_to(axis, new_p1);
    }
}

/// True iff `a` and `b` overlap on the two axes *other* than `axis` (open
/// intervals — cuboids that merely touch don't block each other's slide).
fn overlaps_on_other_axes(a: &Cuboid, b: &Cuboid, axis: Axis) -> bool {
    Axis::ALL
        .into_iter()
        .filter(|&other| other != axis)
        .all(|other| a.p1.get(other) < b.p2.get(other) && b.p1.get(other) < a.p2.get(other))
}

/// True iff `a` and `b` already sit at touching `z` levels and overlap on
/// the lateral axis the slide *isn't* moving along, with at least one of
/// them fragile. Closing the remaining gap along `axis` would complete
/// `Cuboid::on_top_of`'s footprint-overlap test and create a forbidden
/// stack (I8) — a case `overlaps_on_other_axes` misses because it demands
/// `z` overlap, not merely a touch.
fn would_slide_into_fragile_stack(a: &Cuboid, a_fragile: bool, b: &Cuboid, b_fragile: bool, axis: Axis) -> bool {
    if !(a_fragile || b_fragile) || axis == Axis::Z {
        return false;
    }
    let z_touches = a.p1.z == b.p2.z || b.p1.z == a.p2.z;
    if !z_touches {
        return false;
    }
    let other_lateral = if axis == Axis::X { Axis::Y } else { Axis::X };
    a.p1.get(other_lateral) < b.p2.get(other_lateral) && b.p1.get(other_lateral) < a.p2.get(other_lateral)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{PlaceableOn, Package};
    use crate::geometry::Point3;
    use crate::placement::{PlacementEngine};
    use crate::config::TieBreak;
    use crate::entities::ConflictMaps;

    fn uld(lx: Unit, ly: Unit, lz: Unit, capacity: Unit) -> Uld {
        Uld::new(0, lx, ly, lz, capacity).unwrap()
    }

    fn pack(id: usize, lx: Unit, ly: Unit, lz: Unit) -> Package {
        Package::new(id, lx, ly, lz, 1, 1, true, false, false, PlaceableOn::ALL).unwrap()
    }

    #[test]
    fn compaction_closes_a_gap_left_behind() {
        let container = uld(10, 10, 10, 1000);
        let ulds = vec![container];
        let mut placements = vec![
            Placement::new(0, 0, Point3::new(5, 0, 0), (2, 2, 2)).unwrap(),
            Placement::new(0, 1, Point3::new(8, 0, 0), (2, 2, 2)).unwrap(),
        ];
        let packages = vec![pack(0, 2, 2, 2), pack(1, 2, 2, 2)];
        compact(&mut placements, &ulds, &packages);
        assert_eq!(placements[0].p1(), Point3::new(0, 0, 0));
        assert_eq!(placements[1].p1(), Point3::new(2, 0, 0));
    }

    #[test]
    fn compaction_is_idempotent() {
        let container = uld(10, 10, 10, 1000);
        let ulds = vec![container];
        let conflicts = ConflictMaps::default();
        let mut engine = PlacementEngine::new(&ulds, &conflicts, TieBreak::Wall);
        let packs = [pack(0, 3, 3, 3), pack(1, 3, 3, 3), pack(2, 3, 3, 3)];
        for p in &packs {
            engine.place(p).unwrap();
        }
        let mut once = engine.all_placements();
        compact(&mut once, &ulds, &packs);

        let mut twice = once.clone();
        compact(&mut twice, &ulds, &packs);

        let sort_key = |p: &Placement| (p.pack_id, p.p1());
        let mut once_sorted = once.clone();
        let mut twice_sorted = twice.clone();
        once_sorted.sort_by_key(sort_key);
        twice_sorted.sort_by_key(sort_key);
        assert_eq!(once_sorted, twice_sorted);
    }

    #[test]
    fn compaction_never_creates_overlap() {
        let container = uld(10, 10, 10, 1000);
        let ulds = vec![container];
        let conflicts = ConflictMaps::default();
        let mut engine = PlacementEngine::new(&ulds, &conflicts, TieBreak::Layer);
        let packs = [pack(0, 4, 4, 4), pack(1, 4, 4, 4), pack(2, 4, 4, 4), pack(3, 2, 2, 2)];
        for p in &packs {
            engine.place(p).unwrap();
        }
        let mut placements = engine.all_placements();
        compact(&mut placements, &ulds, &packs);
        for i in 0..placements.len() {
            for j in (i + 1)..placements.len() {
                assert_eq!(placements[i].cuboid.intersection_volume(&placements[j].cuboid), 0);
            }
        }
    }

    /// A same-height package beside a fragile one, at an already-touching
    /// `z` level, must not slide laterally into alignment with it — that
    /// would create an `on_top_of` relation the placement engine never
    /// would have permitted (I8), even though the two cuboids never
    /// volumetrically overlap along the way.
    #[test]
    fn compaction_does_not_slide_a_package_onto_a_fragile_one() {
        let container = uld(10, 10, 10, 1000);
        let ulds = vec![container];
        let mut fragile = pack(0, 4, 4, 5);
        fragile.fragile = true;
        let packages = vec![fragile, pack(1, 4, 4, 5)];
        let mut placements = vec![
            Placement::new(0, 0, Point3::new(0, 0, 0), (4, 4, 5)).unwrap(),
            Placement::new(0, 1, Point3::new(5, 0, 5), (4, 4, 5)).unwrap(),
        ];
        compact(&mut placements, &ulds, &packages);
        let fragile_p = placements.iter().find(|p| p.pack_id == 0).unwrap().cuboid;
        let other_p = placements.iter().find(|p| p.pack_id == 1).unwrap().cuboid;
        assert!(!other_p.on_top_of(&fragile_p));
        assert!(!fragile_p.on_top_of(&other_p));
    }
}
