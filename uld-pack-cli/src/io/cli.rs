use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

/// Solves a package/ULD CSV instance and writes the solution file and
/// per-ULD SVGs to the given output folder.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Package CSV (`id,length,width,height,weight,priority,cost`).
    #[arg(short = 'p', long, value_name = "FILE")]
    pub package_file: PathBuf,
    /// ULD CSV (`id,length,width,height,capacity`).
    #[arg(short = 'u', long, value_name = "FILE")]
    pub uld_file: PathBuf,
    /// Optional JSON-serialised `SolverConfig`; falls back to `Default`.
    #[arg(short, long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
    /// Output folder for the solution file and per-ULD SVGs.
    #[arg(short, long, value_name = "FOLDER")]
    pub solution_folder: PathBuf,
    /// Log level filter.
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: LevelFilter,
}
