//! demo-scan: run the suspicion analyzer over parsed match dumps.
//!
//! Usage:
//!   demo-scan analyze --input match.json [--config config.json] [--output report.json]
//!   demo-scan synthetic --output match.json [--seed 42] [--rounds 16] [--bot]

mod synthetic;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;

use tracing_subscriber::EnvFilter;

use sightline_core::config::AnalysisConfig;
use sightline_core::input::MatchData;
use sightline_core::report::{MatchReport, PlayerOutcome};
use sightline_engine::MatchAnalyzer;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "analyze" => cmd_analyze(&args[2..]),
        "synthetic" => cmd_synthetic(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "demo-scan: replay suspicion analysis\n\
         \n\
         Commands:\n\
         \n\
         analyze   Score every player in a parsed match dump\n\
         \n\
           --input <path>     Match JSON produced by the demo parser\n\
           --config <path>    Analysis config JSON (optional, missing fields use defaults)\n\
           --output <path>    Write the report JSON here (default: stdout)\n\
         \n\
         synthetic Generate a synthetic match for testing/demo\n\
         \n\
           --output <path>    Output match JSON path\n\
           --seed <N>         RNG seed (default: 42)\n\
           --rounds <N>       Number of rounds (default: 16)\n\
           --bot              Make player {} a scripted aimbot\n\
         \n\
         Set RUST_LOG=debug for per-player detail.\n\
         \n\
         Examples:\n\
         \n\
           demo-scan synthetic --bot --output match.json\n\
           demo-scan analyze --input match.json --output report.json\n",
        synthetic::BOT_ID
    );
}

fn parse_path(args: &[String], flag: &str) -> Option<PathBuf> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(PathBuf::from(&args[i + 1]));
        }
    }
    None
}

fn parse_number<T: FromStr>(args: &[String], flag: &str, default: T) -> T {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            match args[i + 1].parse::<T>() {
                Ok(n) => return n,
                Err(_) => fail(&format!("{flag} expects a number, got {}", args[i + 1])),
            }
        }
    }
    default
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {message}");
    process::exit(1);
}

// --- Analyze command ---

fn cmd_analyze(args: &[String]) {
    let input = match parse_path(args, "--input") {
        Some(p) => p,
        None => fail("--input <path> is required"),
    };

    let config = match parse_path(args, "--config") {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .unwrap_or_else(|e| fail(&format!("reading {}: {e}", path.display())));
            AnalysisConfig::from_json(&json).unwrap_or_else(|e| fail(&e.to_string()))
        }
        None => AnalysisConfig::default(),
    };

    eprintln!("Loading {}...", input.display());
    let data = read_match(&input).unwrap_or_else(|e| fail(&e));
    eprintln!(
        "Loaded: {} ticks, {} snapshots, {} fires, {} damages, {} kills, {} rounds",
        data.ticks.len(),
        data.snapshots.len(),
        data.fires.len(),
        data.damages.len(),
        data.kills.len(),
        data.rounds.len(),
    );

    let analyzer = MatchAnalyzer::new(config).unwrap_or_else(|e| fail(&e.to_string()));
    let report = analyzer
        .analyze(&data)
        .unwrap_or_else(|e| fail(&format!("match rejected: {e}")));

    print_summary(&report);

    let written = match parse_path(args, "--output") {
        Some(path) => write_json(&path, &report).map(|()| Some(path)),
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            serde_json::to_writer_pretty(&mut out, &report)
                .map_err(|e| e.to_string())
                .and_then(|()| writeln!(out).map_err(|e| e.to_string()))
                .map(|()| None)
        }
    };
    match written {
        Ok(Some(path)) => eprintln!("Done! Report: {}", path.display()),
        Ok(None) => {}
        Err(e) => fail(&format!("writing report: {e}")),
    }
}

fn read_match(path: &Path) -> Result<MatchData, String> {
    let file = File::open(path).map_err(|e| format!("opening {}: {e}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| format!("parsing {}: {e}", path.display()))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), String> {
    let file = File::create(path).map_err(|e| e.to_string())?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value).map_err(|e| e.to_string())?;
    writer.flush().map_err(|e| e.to_string())
}

fn print_summary(report: &MatchReport) {
    eprintln!(
        "\n{} players, {} rounds, {} Hz",
        report.players.len(),
        report.total_rounds,
        report.tick_rate
    );
    eprintln!("{:>20}  {:>5}  {:<7}  flags", "player", "score", "level");
    for (id, outcome) in &report.players {
        match outcome {
            PlayerOutcome::Analyzed(p) => {
                let flags: Vec<String> = p.flags.iter().map(|f| f.to_string()).collect();
                eprintln!(
                    "{id:>20}  {:>5}  {:<7}  {}",
                    p.suspicion_score,
                    format!("{:?}", p.suspicion_level).to_lowercase(),
                    flags.join("; ")
                );
            }
            PlayerOutcome::Failed { error } => {
                eprintln!("{id:>20}  {:>5}  {:<7}  {error}", "-", "failed");
            }
        }
    }
    eprintln!();
}

// --- Synthetic match command ---

fn cmd_synthetic(args: &[String]) {
    let output = match parse_path(args, "--output") {
        Some(p) => p,
        None => fail("--output <path> is required"),
    };
    let seed: u64 = parse_number(args, "--seed", 42);
    let rounds: u32 = parse_number(args, "--rounds", 16);
    let bot = has_flag(args, "--bot");
    if rounds == 0 {
        fail("--rounds must be at least 1");
    }

    eprintln!("Generating {rounds} rounds (seed {seed}, bot: {bot})...");
    let data = synthetic::generate(seed, rounds, bot);

    eprintln!("Writing match to {}...", output.display());
    match write_json(&output, &data) {
        Ok(()) => {
            let file_size = std::fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
            eprintln!("Done! Output: {} ({} bytes)", output.display(), file_size);
        }
        Err(e) => fail(&format!("writing match: {e}")),
    }
}
