use crate::entities::{PackageId, UldId};
use crate::geometry::{Cuboid, Point3};
use crate::Unit;

/// A single package placed inside a ULD at an axis-aligned position.
///
/// `cuboid.p1` is the corner with minimum `(x, y, z)` and `cuboid.p2 =
/// cuboid.p1 + oriented_dims`, matching the data model's placement record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub uld_id: UldId,
    pub pack_id: PackageId,
    pub cuboid: Cuboid,
}

impl Placement {
    pub fn new(uld_id: UldId, pack_id: PackageId, p1: Point3, dims: (Unit, Unit, Unit)) -> Option<Placement> {
        Cuboid::new(p1, dims).map(|cuboid| Placement {
            uld_id,
            pack_id,
            cuboid,
        })
    }

    pub fn p1(&self) -> Point3 {
        self.cuboid.p1
    }

    pub fn p2(&self) -> Point3 {
        self.cuboid.p2
    }
}
