//! Axis-aligned cuboid geometry kernel (component G).
//!
//! Every operation here is a pure function over integer corners, with no
//! allocation in the hot path, so the placement engine and compactor can
//! call them at the core of their innermost loops.

mod cuboid;

pub use cuboid::{Axis, Cuboid, Point3};
