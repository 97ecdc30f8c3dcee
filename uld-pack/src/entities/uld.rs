use crate::error::{SolverError, SolverResult};
use crate::geometry::Cuboid;
use crate::Unit;

/// A rigid rectangular container: inner dimensions and a weight capacity.
///
/// `Uld` itself is immutable static data; the mutable packing state (packed
/// volume/weight, placed ids, extreme points) lives in
/// [`crate::placement::UldState`], mirroring how the placement engine
/// mutates working state without touching the instance's entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Uld {
    pub id: usize,
    pub lx: Unit,
    pub ly: Unit,
    pub lz: Unit,
    pub capacity: Unit,
}

impl Uld {
    pub fn new(id: usize, lx: Unit, ly: Unit, lz: Unit, capacity: Unit) -> SolverResult<Uld> {
        if lx <= 0 || ly <= 0 || lz <= 0 {
            return Err(SolverError::InvalidInput(format!(
                "uld {id}: dimensions must be positive, got ({lx}, {ly}, {lz})"
            )));
        }
        if capacity < 0 {
            return Err(SolverError::InvalidInput(format!(
                "uld {id}: capacity must be non-negative"
            )));
        }
        Ok(Uld {
            id,
            lx,
            ly,
            lz,
            capacity,
        })
    }

    pub fn volume(&self) -> Unit {
        self.lx * self.ly * self.lz
    }

    /// The cuboid spanning the ULD's full inner space, used for
    /// containment checks (invariant I2).
    pub fn bounds(&self) -> Cuboid {
        Cuboid::new(crate::geometry::Point3::ORIGIN, (self.lx, self.ly, self.lz))
            .expect("uld dimensions validated positive at construction")
    }
}
