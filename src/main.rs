use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::process::ExitCode;

use sat_watchdog::config::Config;
use sat_watchdog::decoders::DecoderRegistry;
use sat_watchdog::ingest;
use sat_watchdog::normalizer::FrameNormalizer;
use sat_watchdog::scoring::{top_n, SatelliteScore, SatelliteScorer};

#[derive(Parser)]
#[command(name = "sat-watchdog")]
#[command(about = "Satellite telemetry normalization and pass ranking")]
struct Cli {
    /// Analysis config (YAML)
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a JSONL frame dump into canonical records
    Decode {
        #[arg(long)]
        frames: String,
        /// NORAD id for lines that carry none
        #[arg(long)]
        norad_id: Option<u32>,
        #[arg(long, default_value = "satnogs_db")]
        source: String,
    },
    /// Rank satellites by total observable time
    Rank {
        #[arg(long)]
        events: String,
        /// Overrides analysis.top_n
        #[arg(long)]
        top: Option<usize>,
        /// Horizon start (RFC3339), defaults to the first event
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Validate the config file
    ValidateConfig,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Config error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    match cli.command {
        Commands::Decode {
            frames,
            norad_id,
            source,
        } => decode(&frames, norad_id, &source),
        Commands::Rank {
            events,
            top,
            start,
            json,
        } => rank(&config, &events, top, start.as_deref(), json),
        Commands::ValidateConfig => validate_config(&cli.config, &config),
    }
}

fn decode(path: &str, norad_id: Option<u32>, source: &str) -> ExitCode {
    let dump = match ingest::read_frames(path, norad_id, source) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading frames: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let registry = DecoderRegistry::with_builtin();
    let normalizer = FrameNormalizer::new(&registry);
    let report = normalizer.process_batch(&dump.frames);

    for record in &report.records {
        match serde_json::to_string(record) {
            Ok(line) => println!("{}", line),
            Err(e) => log::warn!("Failed to serialize record: {}", e),
        }
    }

    eprintln!("{}", report);
    if dump.skipped > 0 {
        eprintln!("{} malformed input lines skipped", dump.skipped);
    }
    ExitCode::SUCCESS
}

fn rank(
    config: &Config,
    path: &str,
    top: Option<usize>,
    start: Option<&str>,
    json: bool,
) -> ExitCode {
    let file = match ingest::read_event_streams(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error reading events: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let start = match start {
        Some(s) => match DateTime::parse_from_rfc3339(s) {
            Ok(dt) => dt.with_timezone(&Utc),
            Err(e) => {
                eprintln!("Invalid start time: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => file
            .streams
            .values()
            .filter_map(|s| s.events.first().map(|e| e.time))
            .min()
            .unwrap_or_else(Utc::now),
    };

    let options = match config.scoring_options(start) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Config catalog names take precedence over inline ones
    let mut names = file.names.clone();
    names.extend(config.names());

    let scorer = SatelliteScorer::new().with_names(names).with_options(options);
    let scores = top_n(
        scorer.score(&file.streams),
        top.unwrap_or(config.analysis.top_n),
    );

    if json {
        return match serde_json::to_string_pretty(&scores) {
            Ok(out) => {
                println!("{}", out);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to serialize ranking: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    print_ranking(&scores);
    ExitCode::SUCCESS
}

fn print_ranking(scores: &[SatelliteScore]) {
    if scores.is_empty() {
        println!("No satellite has a complete pass");
        return;
    }

    println!("Top satellites by total observable time:");
    for (i, score) in scores.iter().enumerate() {
        println!(
            "  {}: {} ({}) {} passes, {:.1} min, max {:.1}°",
            i + 1,
            score.display_name,
            score.satellite_id,
            score.pass_count,
            score.total_duration_minutes,
            score.max_elevation_deg
        );
        for pass in &score.passes {
            println!(
                "       {} -> {}  {:.1} min  peak {:.1}°",
                pass.start_time.format("%Y-%m-%d %H:%M:%S"),
                pass.end_time.format("%H:%M:%S"),
                pass.duration_minutes,
                pass.peak_elevation_deg
            );
        }
    }
}

fn validate_config(path: &Option<String>, config: &Config) -> ExitCode {
    if path.is_none() {
        eprintln!("No config file given (use --config)");
        return ExitCode::FAILURE;
    }

    println!(
        "Config is valid ({} satellites, top {})",
        config.satellites.len(),
        config.analysis.top_n
    );
    if let Some(horizon) = &config.analysis.horizon {
        println!("  horizon: {}", horizon);
    }
    if let Some(min_el) = config.analysis.min_peak_elevation_deg {
        println!("  min peak elevation: {:.1}°", min_el);
    }
    ExitCode::SUCCESS
}
