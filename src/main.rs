use anyhow::{Context, Result};
use clap::Parser;
use glscope::{
    analysis::TraceAnalysis,
    apitrace::Apitrace,
    cli::{Cli, OutputFormat},
    config::AnalysisConfig,
    report::{self, AnalysisReport},
};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Load the config file (if any) and apply command-line overrides
fn load_config(args: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(window) = args.timer_window {
        config.timer_window = window;
    }
    Ok(config)
}

fn open_log(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Analyse pre-captured dump and profile logs
fn analyse_logs(
    dump_log: &Path,
    profile_log: &Path,
    config: AnalysisConfig,
) -> Result<TraceAnalysis> {
    let mut analysis = TraceAnalysis::from_reader(open_log(dump_log)?, config)
        .with_context(|| format!("Failed to read call log {}", dump_log.display()))?;
    analysis
        .attribute_reader(open_log(profile_log)?)
        .with_context(|| format!("Failed to process profile {}", profile_log.display()))?;
    Ok(analysis)
}

/// Run apitrace dump and replay against a trace file
fn analyse_trace(tool: &Apitrace, trace: &Path, config: AnalysisConfig) -> Result<TraceAnalysis> {
    let mut dump = tool.dump(trace)?;
    let reader = dump
        .take_reader()
        .context("apitrace dump output already consumed")?;
    let mut analysis =
        TraceAnalysis::from_reader(reader, config).context("Failed to read apitrace dump")?;
    dump.finish()?;

    let summary = analysis.summary();
    eprintln!(
        "[*] Found {} shader labels, {} debug group instances, and {} timestamp fetches.",
        summary.shader_labels, summary.marker_instances, summary.timestamp_fetches
    );

    let mut replay = tool.replay_profile(trace)?;
    let reader = replay
        .take_reader()
        .context("apitrace replay output already consumed")?;
    analysis
        .attribute_reader(reader)
        .context("Failed to process apitrace replay profile")?;
    replay.finish()?;

    Ok(analysis)
}

fn print_report(report: &AnalysisReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", report::text::render(report)),
        OutputFormat::Json => println!("{}", report::json::render(report)?),
        OutputFormat::Csv => print!("{}", report::csv::render(report)),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = load_config(&args)?;
    let tool = Apitrace::new(&args.apitrace);

    let (analysis, frames) = match (&args.dump_log, &args.profile_log, &args.trace) {
        (Some(dump_log), Some(profile_log), _) => {
            (analyse_logs(dump_log, profile_log, config)?, args.frames)
        }
        (_, _, Some(trace)) => {
            let frames = args.frames.or_else(|| tool.frame_count(trace));
            eprintln!(
                "[*] Analyzing trace (Frames: {}): {}",
                report::normalize_frame_count(frames),
                trace.display()
            );
            (analyse_trace(&tool, trace, config)?, frames)
        }
        _ => anyhow::bail!(
            "Must specify either TRACE or both --dump-log and --profile-log. Usage: glscope TRACE"
        ),
    };

    print_report(&analysis.report(frames), args.format)?;

    Ok(())
}
