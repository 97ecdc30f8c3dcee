use itertools::Itertools;

use crate::error::{SolverError, SolverResult};
use crate::Unit;

/// Which original faces of a package may rest on the floor (or on top of
/// another package). At least one must be set; an empty set is an
/// [`SolverError::InvalidInput`].
///
/// `xy` allows the original `z` dimension to become the height (the `x`/`y`
/// face rests flat); `xz` allows `y` to become the height; `yz` allows `x`
/// to become the height. Each allowed face yields two orientations (the
/// footprint dimensions may still swap), for up to six orientations total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaceableOn {
    pub xy: bool,
    pub xz: bool,
    pub yz: bool,
}

impl PlaceableOn {
    pub const ALL: PlaceableOn = PlaceableOn {
        xy: true,
        xz: true,
        yz: true,
    };

    pub fn is_empty(&self) -> bool {
        !self.xy && !self.xz && !self.yz
    }
}

/// One of up to six ways a package's original `(lx, ly, lz)` dimensions can
/// be assigned to the container's `(x, y, z)` axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Orientation {
    /// Oriented `(x, y, z)` dimensions, ready to anchor at a corner.
    pub dims: (Unit, Unit, Unit),
}

impl Orientation {
    fn base_area(&self) -> Unit {
        self.dims.0 * self.dims.1
    }
}

/// An immutable package to be loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Package {
    pub id: usize,
    /// Original `(length, width, height)` as given in the input, before any
    /// orientation is chosen.
    pub lx: Unit,
    pub ly: Unit,
    pub lz: Unit,
    pub weight: Unit,
    /// Delay cost incurred if this package is left unplaced. `-` in the
    /// input CSV is encoded as [`MUST_PLACE_COST`] by the importer.
    pub cost: Unit,
    pub priority: bool,
    pub fragile: bool,
    pub heavy: bool,
    pub placeable_on: PlaceableOn,
    /// Allowed orientations, pre-sorted by descending footprint area so
    /// large footprints are tried first by the placement engine.
    orientations: Vec<Orientation>,
}

/// Sentinel cost the importer substitutes for the CSV's `-` ("must be
/// placed") marker.
pub const MUST_PLACE_COST: Unit = 1_000_000_000;

impl Package {
    pub fn new(
        id: usize,
        lx: Unit,
        ly: Unit,
        lz: Unit,
        weight: Unit,
        cost: Unit,
        priority: bool,
        fragile: bool,
        heavy: bool,
        placeable_on: PlaceableOn,
    ) -> SolverResult<Package> {
        if lx <= 0 || ly <= 0 || lz <= 0 {
            return Err(SolverError::InvalidInput(format!(
                "package {id}: dimensions must be positive, got ({lx}, {ly}, {lz})"
            )));
        }
        if weight < 0 || cost < 0 {
            return Err(SolverError::InvalidInput(format!(
                "package {id}: weight and cost must be non-negative"
            )));
        }
        if fragile && heavy {
            return Err(SolverError::InvalidInput(format!(
                "package {id}: cannot be both fragile and heavy"
            )));
        }
        if placeable_on.is_empty() {
            return Err(SolverError::InvalidInput(format!(
                "package {id}: placeable_on must allow at least one face"
            )));
        }

        let orientations = build_orientations(lx, ly, lz, placeable_on);

        Ok(Package {
            id,
            lx,
            ly,
            lz,
            weight,
            cost,
            priority,
            fragile,
            heavy,
            placeable_on,
            orientations,
        })
    }

    pub fn volume(&self) -> Unit {
        self.lx * self.ly * self.lz
    }

    pub fn max_dim(&self) -> Unit {
        self.lx.max(self.ly).max(self.lz)
    }

    /// Allowed orientations, largest footprint first.
    pub fn orientations(&self) -> &[Orientation] {
        &self.orientations
    }
}

fn build_orientations(lx: Unit, ly: Unit, lz: Unit, placeable_on: PlaceableOn) -> Vec<Orientation> {
    let mut candidates = Vec::with_capacity(6);

    // `xy` face down: z stays the height, x/y footprint may swap.
    if placeable_on.xy {
        candidates.push((lx, ly, lz));
        candidates.push((ly, lx, lz));
    }
    // `xz` face down: y becomes the height.
    if placeable_on.xz {
        candidates.push((lx, lz, ly));
        candidates.push((lz, lx, ly));
    }
    // `yz` face down: x becomes the height.
    if placeable_on.yz {
        candidates.push((ly, lz, lx));
        candidates.push((lz, ly, lx));
    }

    candidates
        .into_iter()
        .map(|dims| Orientation { dims })
        .sorted_by(|a, b| b.base_area().cmp(&a.base_area()))
        .collect()
}
