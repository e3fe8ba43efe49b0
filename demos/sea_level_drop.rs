// Sea-level drop experiment: seafloor rises from 800 m to 650 m below sea level
// and the sediment column drains toward the new hydrostatic profile.
//
// cargo run --release --example sea_level_drop -- [config.json] [--json]

use colored::Colorize;
use seafloor_pressure::sim::sim_op::ProgressReporterOp;
use seafloor_pressure::{PressureConfig, SimProps, Simulation};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let emit_json = args.iter().any(|arg| arg == "--json");
    let config_path = args.iter().find(|arg| !arg.starts_with("--"));

    let config = match config_path {
        Some(path) => PressureConfig::from_json_file(path),
        None => Ok(PressureConfig::default()),
    };

    let sim = match config.and_then(|config| {
        Simulation::new(SimProps {
            name: "sea_level_drop",
            config,
            ops: vec![ProgressReporterOp::handle_with_options(25_000, !emit_json)],
        })
    }) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("{} {err}", "❌ cannot start simulation:".red().bold());
            return ExitCode::FAILURE;
        }
    };

    let report = sim.run();

    if emit_json {
        match report.to_json() {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("{} {err}", "❌ cannot encode report:".red().bold());
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
