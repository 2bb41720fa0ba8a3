//! `jetlag` CLI — compute jet-lag adjustment timetables from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Compute a timetable (JSON request on stdin → {"events": [...]} on stdout)
//! jetlag compute < request.json
//!
//! # Read from a file, resolve offsets from IANA zones, pretty-print
//! jetlag compute -i request.json --origin-tz Europe/London --dest-tz Asia/Singapore --pretty
//!
//! # Half-hour ASCII grid of the same timetable
//! jetlag grid -i request.json
//!
//! # UTC offset of a zone at a local wall-clock time
//! jetlag offset America/New_York 2025-07-01T09:00
//! ```
//!
//! `compute` failures are reported as `{"error": "..."}` on stdout with exit
//! status 1. Diagnostics go to stderr, filtered by `JETLAG_LOG`.

use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use jetlag_engine::clock::parse_local_datetime;
use jetlag_engine::{
    bucket_events, compute_timetable_with, offset_hours_at, render_ascii, JetLagEvent,
    ScheduleSettings, TimetableRequest,
};
use tracing::{debug, error};
use tracing_subscriber::{fmt, EnvFilter};

const LOG_ENV: &str = "JETLAG_LOG";

#[derive(Parser)]
#[command(name = "jetlag", version, about = "Jet-lag adjustment timetable calculator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a timetable and print it as JSON
    Compute {
        #[command(flatten)]
        request: RequestArgs,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Compute a timetable and print it as a half-hour UTC grid
    Grid {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Print the UTC offset (hours) of an IANA zone at a local time
    Offset {
        /// IANA zone name, e.g. "Asia/Tokyo"
        zone: String,
        /// Local wall-clock time as YYYY-MM-DDTHH:MM
        local: String,
    },
}

#[derive(Args)]
struct RequestArgs {
    /// Input request JSON (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
    /// Give up if the clock has not settled within this many days
    #[arg(long)]
    max_days: Option<u32>,
    /// Resolve originOffset from this IANA zone at the departure time
    #[arg(long)]
    origin_tz: Option<String>,
    /// Resolve destOffset from this IANA zone at the arrival time
    #[arg(long)]
    dest_tz: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries JSON only; logs go to stderr.
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Compute { request, pretty } => match compute(&request, pretty) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                error!("{err:#}");
                let body = serde_json::json!({ "error": format!("{err:#}") });
                // Error reports always go to stdout, like successful output.
                println!("{body}");
                ExitCode::FAILURE
            }
        },
        Commands::Grid { request } => report(grid(&request)),
        Commands::Offset { zone, local } => report(offset(&zone, &local)),
    }
}

fn report(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn compute(args: &RequestArgs, pretty: bool) -> Result<()> {
    let events = timetable(args)?;
    let body = serde_json::json!({ "events": events });
    let mut text = if pretty {
        serde_json::to_string_pretty(&body)?
    } else {
        serde_json::to_string(&body)?
    };
    text.push('\n');
    write_output(args.output.as_deref(), &text)
}

fn grid(args: &RequestArgs) -> Result<()> {
    let events = timetable(args)?;
    write_output(args.output.as_deref(), &render_ascii(&bucket_events(&events)))
}

fn offset(zone: &str, local: &str) -> Result<()> {
    let local = parse_local_datetime(local)?;
    let hours = offset_hours_at(zone, local)?;
    println!("{hours}");
    Ok(())
}

fn timetable(args: &RequestArgs) -> Result<Vec<JetLagEvent>> {
    let raw = read_input(args.input.as_deref())?;
    let mut request: TimetableRequest =
        serde_json::from_str(&raw).context("Invalid request JSON")?;
    apply_zone_overrides(&mut request, args)?;

    let mut settings = ScheduleSettings::default();
    if let Some(max_days) = args.max_days {
        settings.max_days = max_days;
    }
    debug!(?settings, "computing timetable");

    Ok(compute_timetable_with(&request, &settings)?)
}

/// Replace the request's offsets with the zones' offsets at departure and arrival.
fn apply_zone_overrides(request: &mut TimetableRequest, args: &RequestArgs) -> Result<()> {
    if let Some(zone) = args.origin_tz.as_deref() {
        let departure = parse_local_datetime(&request.travel_start)?;
        request.origin_offset = offset_hours_at(zone, departure)?;
        debug!(zone, offset = request.origin_offset, "resolved origin offset");
    }
    if let Some(zone) = args.dest_tz.as_deref() {
        let arrival = parse_local_datetime(&request.travel_end)?;
        request.dest_offset = offset_hours_at(zone, arrival)?;
        debug!(zone, offset = request.dest_offset, "resolved destination offset");
    }
    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
