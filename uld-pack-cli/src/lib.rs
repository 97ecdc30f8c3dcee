//! Thin CLI driver over the `uld-pack` core: reads a Package/ULD CSV pair,
//! runs the solver, and writes the solution file plus per-ULD SVGs.

pub mod io;
