use clap::{Parser, Subcommand};
use pn_project::{CompiledScenario, ProjectError};
use pn_sim::{Request, SimError, Simulation, Snapshot};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "pn-cli")]
#[command(about = "pipenet CLI - device network simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenario file syntax and topology
    Validate {
        /// Path to the scenario file (YAML or JSON)
        scenario_path: PathBuf,
    },
    /// List devices in a scenario
    Devices {
        /// Path to the scenario file (YAML or JSON)
        scenario_path: PathBuf,
    },
    /// Run a scenario for a number of ticks
    Run {
        /// Path to the scenario file (YAML or JSON)
        scenario_path: PathBuf,
        /// Number of ticks to solve
        #[arg(long, default_value_t = 1)]
        ticks: u64,
        /// Valve openness override, applied before the first tick (NAME=VALUE)
        #[arg(long = "openness", value_parser = parse_assignment)]
        openness: Vec<(String, f64)>,
        /// Pump rise override, applied before the first tick (NAME=VALUE)
        #[arg(long = "rise", value_parser = parse_assignment)]
        rise: Vec<(String, f64)>,
        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error("Unknown device: {0}")]
    UnknownDevice(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Devices { scenario_path } => cmd_devices(&scenario_path),
        Commands::Run {
            scenario_path,
            ticks,
            openness,
            rise,
            json,
        } => cmd_run(&scenario_path, ticks, &openness, &rise, json),
    }
}

fn parse_assignment(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid number '{value}': {e}"))?;
    Ok((name.trim().to_string(), value))
}

fn load(path: &Path) -> CliResult<CompiledScenario> {
    let scenario = pn_project::load(path)?;
    Ok(pn_project::compile(&scenario)?)
}

fn cmd_validate(scenario_path: &Path) -> CliResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let compiled = load(scenario_path)?;
    let loops = compiled.graph.order().cycles().len();
    println!(
        "✓ Scenario '{}' is valid ({} devices, {} connections, {} loops)",
        compiled.name,
        compiled.graph.len(),
        compiled.graph.connections().len(),
        loops
    );
    Ok(())
}

fn cmd_devices(scenario_path: &Path) -> CliResult<()> {
    let compiled = load(scenario_path)?;
    if compiled.graph.is_empty() {
        println!("No devices found in scenario");
        return Ok(());
    }

    println!("Devices in '{}' (evaluation order):", compiled.name);
    for &id in compiled.graph.order().sequence() {
        let Some(device) = compiled.graph.device(id) else {
            continue;
        };
        let mut line = format!(
            "  {:>4} {:<16} {:<15} in={} out={} loss={}",
            id.to_string(),
            device.name(),
            device.kind().to_string(),
            device.slots_in().len(),
            device.slots_out().len(),
            device.pressure_loss()
        );
        if device.is_source() {
            line.push_str(" [source]");
        }
        if let Some(sibling) = device.parallel().and_then(|s| compiled.graph.device(s)) {
            line.push_str(&format!(" [parallel: {}]", sibling.name()));
        }
        println!("{line}");
    }
    Ok(())
}

fn cmd_run(
    scenario_path: &Path,
    ticks: u64,
    openness: &[(String, f64)],
    rise: &[(String, f64)],
    json: bool,
) -> CliResult<()> {
    let compiled = load(scenario_path)?;
    let resolve = |name: &str| {
        compiled
            .id(name)
            .ok_or_else(|| CliError::UnknownDevice(name.to_string()))
    };

    let mut sim = Simulation::new(compiled.graph.clone(), compiled.config)?;
    sim.start();
    for (name, value) in openness {
        sim.submit(Request::SetOpenness {
            device: resolve(name)?,
            openness: *value,
        });
    }
    for (name, value) in rise {
        sim.submit(Request::SetPumpRise {
            device: resolve(name)?,
            rise: *value,
        });
    }

    info!(scenario = %compiled.name, ticks, "running");
    for _ in 0..ticks {
        let outcome = sim.tick()?;
        for (request, err) in &outcome.rejected {
            eprintln!("✗ Request {request:?} rejected: {err}");
        }
        if let Some(report) = outcome.report {
            if !json {
                println!(
                    "tick {}: {} after {} passes (max delta {:.3e})",
                    report.tick, report.phase, report.iterations, report.max_delta
                );
            }
        }
    }

    let snapshot = sim.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&*snapshot)?);
    } else {
        print_snapshot(&snapshot);
    }
    Ok(())
}

fn print_snapshot(snapshot: &Snapshot) {
    println!(
        "{:<16} {:<15} {:>12} {:>12} {:>12}",
        "device", "kind", "flow m3/h", "p bar", "T °C"
    );
    for r in &snapshot.devices {
        if r.data.valid {
            println!(
                "{:<16} {:<15} {:>12.4} {:>12.4} {:>12.4}",
                r.name,
                r.kind.to_string(),
                r.data.flow,
                r.data.pressure,
                r.data.temperature
            );
        } else {
            println!("{:<16} {:<15} {:>12}", r.name, r.kind.to_string(), "invalid");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_parses() {
        assert_eq!(parse_assignment("valve=0.5"), Ok(("valve".to_string(), 0.5)));
        assert_eq!(parse_assignment(" v = 1 "), Ok(("v".to_string(), 1.0)));
        assert!(parse_assignment("valve").is_err());
        assert!(parse_assignment("valve=abc").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
