use std::fs;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use uld_pack::io::{PackageRow, UldRow};

pub mod cli;

pub fn read_package_file(path: &Path) -> Result<Vec<PackageRow>> {
    let file = File::open(path).with_context(|| format!("could not open package file {path:?}"))?;
    uld_pack::io::read_packages(BufReader::new(file)).with_context(|| format!("could not parse package file {path:?}"))
}

pub fn read_uld_file(path: &Path) -> Result<Vec<UldRow>> {
    let file = File::open(path).with_context(|| format!("could not open uld file {path:?}"))?;
    uld_pack::io::read_ulds(BufReader::new(file)).with_context(|| format!("could not parse uld file {path:?}"))
}

pub fn write_solution_file(
    path: &Path,
    totals: &uld_pack::validate::ReportedTotals,
    placements: &[uld_pack::entities::Placement],
    packages: &[PackageRow],
    ulds: &[UldRow],
) -> Result<()> {
    let file = File::create(path).with_context(|| format!("could not create solution file {path:?}"))?;
    uld_pack::io::write_solution(BufWriter::new(file), totals, placements, packages, ulds)?;
    info!("solution written to file://{}", fs::canonicalize(path)?.to_str().unwrap());
    Ok(())
}
