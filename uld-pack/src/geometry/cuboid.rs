use crate::Unit;

/// A point in the integer grid the packages and ULDs live on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point3 {
    pub x: Unit,
    pub y: Unit,
    pub z: Unit,
}

impl Point3 {
    pub const ORIGIN: Point3 = Point3 { x: 0, y: 0, z: 0 };

    pub fn new(x: Unit, y: Unit, z: Unit) -> Self {
        Point3 { x, y, z }
    }

    pub fn get(&self, axis: Axis) -> Unit {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn with(&self, axis: Axis, value: Unit) -> Self {
        let mut p = *self;
        match axis {
            Axis::X => p.x = value,
            Axis::Y => p.y = value,
            Axis::Z => p.z = value,
        }
        p
    }
}

impl std::ops::Add for Point3 {
    type Output = Point3;

    fn add(self, rhs: Point3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

/// One of the three coordinate axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

/// An axis-aligned cuboid, defined by its min and max corners.
///
/// `p1` is always the corner with the minimum `(x, y, z)` and
/// `p2 = p1 + dims`; callers are expected to construct these through
/// [`Cuboid::new`], which enforces `p1 < p2` coordinate-wise (invariant I1).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cuboid {
    pub p1: Point3,
    pub p2: Point3,
}

impl Cuboid {
    /// Builds a cuboid from its min corner and the (already-oriented)
    /// dimensions. Returns `None` if any dimension is non-positive.
    pub fn new(p1: Point3, dims: (Unit, Unit, Unit)) -> Option<Cuboid> {
        let (lx, ly, lz) = dims;
        if lx <= 0 || ly <= 0 || lz <= 0 {
            return None;
        }
        Some(Cuboid {
            p1,
            p2: Point3::new(p1.x + lx, p1.y + ly, p1.z + lz),
        })
    }

    pub fn from_corners(p1: Point3, p2: Point3) -> Option<Cuboid> {
        if p1.x < p2.x && p1.y < p2.y && p1.z < p2.z {
            Some(Cuboid { p1, p2 })
        } else {
            None
        }
    }

    pub fn dims(&self) -> (Unit, Unit, Unit) {
        (
            self.p2.x - self.p1.x,
            self.p2.y - self.p1.y,
            self.p2.z - self.p1.z,
        )
    }

    pub fn volume(&self) -> Unit {
        let (lx, ly, lz) = self.dims();
        lx * ly * lz
    }

    /// True iff the open intervals on all three axes overlap. Cuboids that
    /// merely touch a face are not considered intersecting.
    pub fn intersects(&self, other: &Cuboid) -> bool {
        self.p1.x < other.p2.x
            && other.p1.x < self.p2.x
            && self.p1.y < other.p2.y
            && other.p1.y < self.p2.y
            && self.p1.z < other.p2.z
            && other.p1.z < self.p2.z
    }

    /// Volume of the (possibly empty) intersection of two cuboids.
    pub fn intersection_volume(&self, other: &Cuboid) -> Unit {
        let dx = (self.p2.x.min(other.p2.x) - self.p1.x.max(other.p1.x)).max(0);
        let dy = (self.p2.y.min(other.p2.y) - self.p1.y.max(other.p1.y)).max(0);
        let dz = (self.p2.z.min(other.p2.z) - self.p1.z.max(other.p1.z)).max(0);
        dx * dy * dz
    }

    /// True iff `other` is contained within `self` (closed, inclusive of
    /// shared boundaries).
    pub fn contains(&self, other: &Cuboid) -> bool {
        self.p1.x <= other.p1.x
            && self.p1.y <= other.p1.y
            && self.p1.z <= other.p1.z
            && other.p2.x <= self.p2.x
            && other.p2.y <= self.p2.y
            && other.p2.z <= self.p2.z
    }

    /// True iff `self` sits directly on top of `other`: `self`'s floor
    /// coincides with `other`'s ceiling, and their `(x, y)` footprints
    /// strictly overlap.
    pub fn on_top_of(&self, other: &Cuboid) -> bool {
        self.p1.z == other.p2.z && self.xy_overlaps(other)
    }

    fn xy_overlaps(&self, other: &Cuboid) -> bool {
        self.p1.x < other.p2.x
            && other.p1.x < self.p2.x
            && self.p1.y < other.p2.y
            && other.p1.y < self.p2.y
    }

    /// Returns a copy of `self` translated so that `p1.axis == value`.
    pub fn translated_to(&self, axis: Axis, value: Unit) -> Cuboid {
        let delta = value - self.p1.get(axis);
        let shift = match axis {
            Axis::X => Point3::new(delta, 0, 0),
            Axis::Y => Point3::new(0, delta, 0),
            Axis::Z => Point3::new(0, 0, delta),
        };
        Cuboid {
            p1: self.p1 + shift,
            p2: self.p2 + shift,
        }
    }
}
