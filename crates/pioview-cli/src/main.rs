mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pioview_build::{
    BuildConfig, BuildRequest, BuildType, ProcessSource, PumpReport, pump_stream, start_build,
};
use pioview_log::RenderEvent;
use render::{Tee, TerminalSink};
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pioview")]
#[command(about = "Run PlatformIO builds with colorized output", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run PlatformIO and show its output as it arrives
    Run {
        /// PlatformIO environment (`-e`)
        #[arg(short, long)]
        env: String,
        /// build, auto-build, clean, upload, program, traceback, test, remote or debug
        #[arg(short = 't', long = "type", default_value = "build")]
        build_type: BuildType,
        /// Board name shown under the build output
        #[arg(short, long)]
        board: Option<String>,
        /// Config file (defaults to ./pioview.json when present)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Also write the plain transcript to FILE
        #[arg(long, value_name = "FILE")]
        save: Option<PathBuf>,
        /// Disable colors
        #[arg(long)]
        plain: bool,
    },
    /// Highlight a saved build log, or stdin when no file is given
    Highlight {
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,
        /// Emit the render events as JSON
        #[arg(long)]
        json: bool,
        /// Disable colors
        #[arg(long)]
        plain: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            env,
            build_type,
            board,
            config,
            save,
            plain,
        } => {
            let config = load_config(config.as_deref())?;
            let mut request = BuildRequest::new(build_type, env);
            if let Some(board) = board {
                request = request.with_board(board);
            }

            let monitor = start_build(&request, &config, &ProcessSource)
                .with_context(|| format!("Could not run {}", config.program))?;
            let terminal = terminal_sink(plain);
            let report = match save {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    let mut sink = Tee::new(terminal, TerminalSink::new(BufWriter::new(file), false));
                    monitor.run_to_completion(&mut sink, config.poll_interval())
                }
                None => {
                    let mut sink = terminal;
                    monitor.run_to_completion(&mut sink, config.poll_interval())
                }
            }
            .context("Build output stream failed")?;
            print_summary(&report);
        }
        Commands::Highlight { path, json, plain } => {
            let reader: Box<dyn Read + Send> = match &path {
                Some(path) => Box::new(
                    File::open(path)
                        .with_context(|| format!("Failed to open {}", path.display()))?,
                ),
                None => Box::new(io::stdin()),
            };
            let monitor = pump_stream(reader)?;
            let poll = BuildConfig::default().poll_interval();

            if json {
                let mut events: Vec<RenderEvent> = Vec::new();
                monitor.run_to_completion(&mut events, poll)?;
                println!("{}", serde_json::to_string_pretty(&events)?);
            } else {
                let mut sink = terminal_sink(plain);
                let report = monitor.run_to_completion(&mut sink, poll)?;
                print_summary(&report);
            }
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<BuildConfig> {
    match path {
        Some(path) => BuildConfig::load(path),
        None => BuildConfig::load_or_default(Path::new(".")),
    }
}

fn terminal_sink(plain: bool) -> TerminalSink<io::Stdout> {
    let stdout = io::stdout();
    let color = !plain && stdout.is_terminal();
    TerminalSink::new(stdout, color)
}

fn print_summary(report: &PumpReport) {
    log::info!("{}", serde_json::to_string(report).unwrap_or_default());
    eprintln!(
        "{} lines, {} warnings, {} errors",
        report.lines, report.warnings, report.errors
    );
}
