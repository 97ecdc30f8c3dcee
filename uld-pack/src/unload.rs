//! Unload planner (component U, §4.5): from a final layout, derives a
//! dependency DAG of which placements physically obstruct which, and
//! returns a safe unload order.
//!
//! Unloading is modelled as pulling each package out horizontally through
//! the ULD's origin-corner door: a placement `b` blocks `a` if sweeping
//! `a`'s cuboid back to the `x = 0` face passes through `b` (something is
//! in the way along the pull direction), or if `b` sits anywhere above `a`
//! up to the ceiling (something would have to be lifted off first). `b`
//! must then be unloaded before `a`. Built with an explicit work-stack
//! (Kahn's algorithm over in-degree), per the REDESIGN FLAGS guidance
//! against recursive DFS on large layouts.

use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::entities::{PackageId, Placement, Uld, UldId};
use crate::geometry::{Axis, Cuboid};
use crate::Unit;

/// The unload order for a single ULD: package ids in the sequence they
/// should be physically removed, blockers before the packages they block.
pub fn unload_order_for_uld(placements: &[&Placement], ceiling: Unit) -> Vec<PackageId> {
    let n = placements.len();

    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut indegree = vec![0usize; n];

    for (i, a) in placements.iter().enumerate() {
        let x_swept = swept_back(&a.cuboid, Axis::X);
        let above = swept_forward(&a.cuboid, Axis::Z, ceiling);
        for (j, b) in placements.iter().enumerate() {
            if i == j {
                continue;
            }
            if x_swept.intersects(&b.cuboid) || above.intersects(&b.cuboid) {
                // b blocks a: edge b -> a.
                adj[j].push(i);
                indegree[i] += 1;
            }
        }
    }

    // Ready set keyed by ascending package id (the tie-break rule), not
    // insertion order, so the result is independent of input ordering.
    let mut ready: BTreeSet<(PackageId, usize)> = (0..n)
        .filter(|&i| indegree[i] == 0)
        .map(|i| (placements[i].pack_id, i))
        .collect();

    let mut order = Vec::with_capacity(n);
    let mut queue: VecDeque<usize> = VecDeque::new();
    while let Some(&(_, i)) = ready.iter().next() {
        ready.remove(&(placements[i].pack_id, i));
        queue.push_back(i);
        while let Some(i) = queue.pop_front() {
            order.push(placements[i].pack_id);
            for &j in &adj[i] {
                indegree[j] -= 1;
                if indegree[j] == 0 {
                    ready.insert((placements[j].pack_id, j));
                }
            }
        }
    }

    debug_assert_eq!(
        order.len(),
        n,
        "unload graph should be acyclic (non-overlapping placements, I3)"
    );
    order
}

/// Computes an unload order per ULD for a whole layout.
pub fn unload_plan(placements: &[Placement], ulds: &[Uld]) -> HashMap<UldId, Vec<PackageId>> {
    ulds.iter()
        .map(|uld| {
            let members: Vec<&Placement> = placements.iter().filter(|p| p.uld_id == uld.id).collect();
            (uld.id, unload_order_for_uld(&members, uld.lz))
        })
        .collect()
}

/// The volume swept when `cuboid` is pulled back to the `axis = 0` face,
/// keeping its extent on the other two axes.
fn swept_back(cuboid: &Cuboid, axis: Axis) -> Cuboid {
    Cuboid {
        p1: cuboid.p1.with(axis, 0),
        p2: cuboid.p2,
    }
}

/// The volume above `cuboid`'s leading face on `axis`, up to `limit`.
fn swept_forward(cuboid: &Cuboid, axis: Axis, limit: Unit) -> Cuboid {
    Cuboid {
        p1: cuboid.p1,
        p2: cuboid.p2.with(axis, limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3;

    fn placement(pack_id: PackageId, p1: Point3, p2: Point3) -> Placement {
        Placement {
            uld_id: 0,
            pack_id,
            cuboid: Cuboid::from_corners(p1, p2).unwrap(),
        }
    }

    #[test]
    fn package_behind_another_unloads_first() {
        let front = placement(0, Point3::new(0, 0, 0), Point3::new(2, 2, 2));
        let back = placement(1, Point3::new(2, 0, 0), Point3::new(4, 2, 2));
        let refs = vec![&front, &back];
        let order = unload_order_for_uld(&refs, 10);
        let pos_front = order.iter().position(|&id| id == 0).unwrap();
        let pos_back = order.iter().position(|&id| id == 1).unwrap();
        assert!(pos_front < pos_back);
    }

    #[test]
    fn independent_packages_order_by_ascending_id() {
        let a = placement(5, Point3::new(0, 0, 0), Point3::new(1, 1, 1));
        let b = placement(2, Point3::new(5, 5, 5), Point3::new(6, 6, 6));
        let refs = vec![&a, &b];
        let order = unload_order_for_uld(&refs, 10);
        assert_eq!(order, vec![2, 5]);
    }

    #[test]
    fn stacked_package_unloads_before_what_is_beneath_it() {
        let bottom = placement(0, Point3::new(0, 0, 0), Point3::new(2, 2, 2));
        let top = placement(1, Point3::new(0, 0, 2), Point3::new(2, 2, 4));
        let refs = vec![&bottom, &top];
        let order = unload_order_for_uld(&refs, 10);
        assert_eq!(order, vec![1, 0]);
    }
}
