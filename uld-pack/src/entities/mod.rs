//! The data model shared by every core component: packages, ULDs,
//! placements and the optional per-pair conflict maps the placement
//! engine consults.

mod conflicts;
mod package;
mod placement;
mod uld;

pub use conflicts::ConflictMaps;
pub use package::{Orientation, PlaceableOn, Package, MUST_PLACE_COST};
pub use placement::Placement;
pub use uld::Uld;

/// Identifies a [`Package`] by its position in the instance's package list.
pub type PackageId = usize;

/// Identifies a [`Uld`] by its position in the instance's ULD list.
pub type UldId = usize;
