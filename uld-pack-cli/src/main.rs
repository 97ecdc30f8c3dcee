use std::fs;

use clap::Parser;
use log::warn;
use uld_pack::config::SolverConfig;
use uld_pack::entities::ConflictMaps;
use uld_pack::solver::{Instance, SolveOutcome, Solver};
use uld_pack_cli::io;
use uld_pack_cli::io::cli::Cli;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    uld_pack::util::init_logger(args.log_level)?;

    let config = match &args.config_file {
        None => {
            warn!("no config file provided, use --config-file to provide a custom config");
            SolverConfig::default()
        }
        Some(config_file) => {
            let file = std::fs::File::open(config_file)?;
            serde_json::from_reader(std::io::BufReader::new(file))?
        }
    };

    let package_rows = io::read_package_file(&args.package_file)?;
    let uld_rows = io::read_uld_file(&args.uld_file)?;

    let packages = package_rows.iter().map(|r| r.package.clone()).collect::<Vec<_>>();
    let ulds = uld_rows.iter().map(|r| r.uld).collect::<Vec<_>>();
    let conflicts = ConflictMaps::default();

    let instance = Instance { packages, ulds, conflicts };

    let mut solver = Solver::new(config);
    let report = solver.solve(&instance)?;

    match &report.outcome {
        SolveOutcome::Optimal => {
            log::info!("solved: every priority package placed");
        }
        SolveOutcome::Infeasible { unplaced_priority } => {
            warn!("infeasible: {} priority package(s) could not be placed", unplaced_priority.len());
        }
    }

    if !args.solution_folder.exists() {
        fs::create_dir_all(&args.solution_folder)?;
    }

    let solution_path = args.solution_folder.join("solution.csv");
    io::write_solution_file(&solution_path, &report.totals, &report.placements, &package_rows, &uld_rows)?;

    uld_pack_utils::write_uld_svgs(&args.solution_folder, &instance.ulds, &report.placements)?;

    Ok(())
}
