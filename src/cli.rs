//! Command-line dispatch: `rotasim <simulate|validate|serve>`.

use std::env;

use crate::combat::Simulation;
use crate::data::build::{load_build, sample_build, BuildConfig};
use crate::data::validate::validate_build;
use crate::parallel::{run_seed_sweep, WorkerPool};
use crate::server;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Simulate,
    Validate,
    Serve,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("simulate") => Some(Command::Simulate),
        Some("validate") => Some(Command::Validate),
        Some("serve") => Some(Command::Serve),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Simulate) => handle_simulate(args),
        Some(Command::Validate) => handle_validate(args),
        Some(Command::Serve) => handle_serve(),
        None => {
            eprintln!("usage: rotasim <simulate|validate|serve>");
            eprintln!("  simulate [build.json] [--seed N] [--sweep N] [--workers N] [--table] [--log out.csv]");
            eprintln!("  validate <build.json>");
            eprintln!("  serve");
            2
        }
    }
}

fn handle_serve() -> i32 {
    let bind_addr = env::var("ROTASIM_BIND").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    match server::run_server(&bind_addr) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn load_or_sample(args: &[String]) -> Option<BuildConfig> {
    match args.get(2).filter(|arg| !arg.starts_with("--")) {
        Some(path) => match load_build(path) {
            Ok(build) => Some(build),
            Err(err) => {
                eprintln!("{err}");
                None
            }
        },
        None => {
            eprintln!("no build file given, using the built-in sample build");
            Some(sample_build())
        }
    }
}

fn handle_simulate(args: &[String]) -> i32 {
    let Some(build) = load_or_sample(args) else {
        return 1;
    };

    let report = validate_build(&build);
    for diagnostic in &report.diagnostics {
        eprintln!("{diagnostic}");
    }
    if report.has_errors() {
        eprintln!("build rejected; nothing simulated");
        return 1;
    }

    let seed = flag_value(args, "--seed").and_then(|raw| parse_or_warn::<u64>(&raw, "--seed"));
    let sweep = flag_value(args, "--sweep").and_then(|raw| parse_or_warn::<u32>(&raw, "--sweep"));
    let as_table = args.iter().any(|arg| arg == "--table");

    if let Some(runs) = sweep {
        return handle_sweep(args, &build, seed.unwrap_or(1), runs, as_table);
    }

    let mut simulation = match Simulation::new(&build, seed) {
        Ok(simulation) => simulation,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    let summary = simulation.run();

    if let Some(path) = flag_value(args, "--log") {
        match std::fs::File::create(&path) {
            Ok(file) => {
                if let Err(err) = simulation.log().export_csv(file) {
                    eprintln!("failed to write log '{path}': {err}");
                }
            }
            Err(err) => eprintln!("failed to create log '{path}': {err}"),
        }
    }

    if as_table {
        println!("trials\telapsed_ms\tdmg_low\tdmg_avg\tdmg_high\tdps_low\tdps_avg\tdps_high");
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            summary.trials,
            summary.elapsed_ms,
            summary.damage.lowest,
            summary.damage.average,
            summary.damage.highest,
            summary.dps.lowest,
            summary.dps.average,
            summary.dps.highest
        );
        return 0;
    }

    match serde_json::to_string_pretty(&summary) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize summary: {err}");
            1
        }
    }
}

fn handle_sweep(args: &[String], build: &BuildConfig, base_seed: u64, runs: u32, as_table: bool) -> i32 {
    let workers = flag_value(args, "--workers")
        .and_then(|raw| parse_or_warn::<usize>(&raw, "--workers"))
        .unwrap_or(0);
    let pool = WorkerPool::with_workers(workers);

    let results = match run_seed_sweep(build, base_seed, runs, &pool) {
        Ok(results) => results,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };

    if as_table {
        println!("seed\tdmg_avg\tdps_avg");
        for result in &results {
            println!(
                "{}\t{}\t{}",
                result.seed, result.summary.damage.average, result.summary.dps.average
            );
        }
        return 0;
    }

    let payload: Vec<_> = results
        .iter()
        .map(|result| {
            serde_json::json!({
                "seed": result.seed,
                "summary": result.summary,
            })
        })
        .collect();
    match serde_json::to_string_pretty(&payload) {
        Ok(text) => {
            println!("{text}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize sweep results: {err}");
            1
        }
    }
}

fn handle_validate(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: rotasim validate <build.json>");
        return 2;
    };
    let build = match load_build(path) {
        Ok(build) => build,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };

    let report = validate_build(&build);
    if report.diagnostics.is_empty() {
        println!("validation passed: {path}");
        return 0;
    }
    for diagnostic in &report.diagnostics {
        println!("{diagnostic}");
    }
    i32::from(report.has_errors())
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|pos| args.get(pos + 1))
        .cloned()
}

fn parse_or_warn<T: std::str::FromStr>(raw: &str, flag: &str) -> Option<T> {
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            eprintln!("invalid value '{raw}' for {flag}, ignoring");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn dispatches_known_commands() {
        assert_eq!(parse_command(&args(&["rotasim", "simulate"])), Some(Command::Simulate));
        assert_eq!(parse_command(&args(&["rotasim", "validate"])), Some(Command::Validate));
        assert_eq!(parse_command(&args(&["rotasim", "serve"])), Some(Command::Serve));
        assert_eq!(parse_command(&args(&["rotasim", "nope"])), None);
        assert_eq!(parse_command(&args(&["rotasim"])), None);
    }

    #[test]
    fn flag_value_reads_following_argument() {
        let argv = args(&["rotasim", "simulate", "build.json", "--seed", "42"]);
        assert_eq!(flag_value(&argv, "--seed"), Some("42".to_string()));
        assert_eq!(flag_value(&argv, "--sweep"), None);
    }

    #[test]
    fn unknown_command_exits_with_usage() {
        assert_eq!(run_with_args(&args(&["rotasim", "bogus"])), 2);
    }
}
