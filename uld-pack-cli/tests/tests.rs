use std::fs;
use std::io::Write;

use uld_pack::config::SolverConfig;
use uld_pack::entities::ConflictMaps;
use uld_pack::solver::{Instance, SolveOutcome, Solver};
use uld_pack_cli::io;

fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("uld-pack-cli-test-{name}"));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_file(path: &std::path::Path, contents: &str) {
    let mut f = fs::File::create(path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
}

/// Scenario 1 (§8): single ULD, single package, exact fit.
#[test]
fn cli_reads_csv_and_writes_solution_file() {
    let dir = scratch_dir("exact-fit");
    let package_path = dir.join("packages.csv");
    let uld_path = dir.join("ulds.csv");
    write_file(&package_path, "id,length,width,height,weight,priority,cost\nP1,10,10,10,50,Priority,-\n");
    write_file(&uld_path, "id,length,width,height,capacity\nU1,10,10,10,100\n");

    let package_rows = io::read_package_file(&package_path).unwrap();
    let uld_rows = io::read_uld_file(&uld_path).unwrap();
    let packages = package_rows.iter().map(|r| r.package.clone()).collect::<Vec<_>>();
    let ulds = uld_rows.iter().map(|r| r.uld).collect::<Vec<_>>();

    let instance = Instance { packages, ulds, conflicts: ConflictMaps::default() };
    let mut solver = Solver::new(SolverConfig::default());
    let report = solver.solve(&instance).unwrap();

    assert_eq!(report.outcome, SolveOutcome::Optimal);
    assert_eq!(report.totals.total_cost, 0);
    assert_eq!(report.totals.number_packed, 1);

    let solution_path = dir.join("solution.csv");
    io::write_solution_file(&solution_path, &report.totals, &report.placements, &package_rows, &uld_rows).unwrap();

    let written = fs::read_to_string(&solution_path).unwrap();
    assert!(written.starts_with("0 1 1\n"));
    assert!(written.contains("P1,U1,0,0,0,10,10,10\n"));
}

/// Scenario 2 (§8): weight bound binds, one of two priority packages
/// necessarily unplaced.
#[test]
fn weight_bound_yields_infeasible_outcome() {
    let dir = scratch_dir("weight-bound");
    let package_path = dir.join("packages.csv");
    let uld_path = dir.join("ulds.csv");
    write_file(
        &package_path,
        "id,length,width,height,weight,priority,cost\nP1,5,10,10,6,Priority,1\nP2,5,10,10,6,Priority,1\n",
    );
    write_file(&uld_path, "id,length,width,height,capacity\nU1,10,10,10,10\n");

    let package_rows = io::read_package_file(&package_path).unwrap();
    let uld_rows = io::read_uld_file(&uld_path).unwrap();
    let packages = package_rows.iter().map(|r| r.package.clone()).collect::<Vec<_>>();
    let ulds = uld_rows.iter().map(|r| r.uld).collect::<Vec<_>>();

    let mut config = SolverConfig::default();
    config.max_generations = 10;
    config.population_size = 8;

    let instance = Instance { packages, ulds, conflicts: ConflictMaps::default() };
    let mut solver = Solver::new(config);
    let report = solver.solve(&instance).unwrap();

    assert_eq!(report.placements.len(), 1);
    assert!(matches!(report.outcome, SolveOutcome::Infeasible { .. }));
}
