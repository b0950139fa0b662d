//! Command-line interface for the fsaviz utility
//!
//! Runs input strings against saved automata, validates and inspects save
//! files, and exports the render scene as JSON.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::colorizer::format_run;
use fsaviz::automaton::{self, Automaton, Executor, Scene};
use fsaviz::core::logging::init_logging;
use fsaviz::{CurveVector, EditorConfig};

/// fsaviz - Run and inspect finite-state automata
#[derive(Parser)]
#[command(name = "fsaviz")]
#[command(about = "Run, validate and inspect saved finite-state automata")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run input strings against an automaton
    Run {
        /// Saved automaton (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// When to use colors in output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,

        /// Input strings to run
        #[arg(required = true)]
        strings: Vec<String>,
    },

    /// Check that a saved automaton loads and all references resolve
    Validate {
        /// Saved automaton (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// List states, transitions, acceptors and the start state
    Inspect {
        /// Saved automaton (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the render scene as JSON
    Scene {
        /// Saved automaton (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the scene (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Serialize)]
struct RunReport<'a> {
    input: &'a str,
    #[serde(flatten)]
    result: automaton::RunResult,
}

#[derive(Serialize)]
struct StateEntry<'a> {
    label: &'a str,
    x: f64,
    y: f64,
}

#[derive(Serialize)]
struct TransitionEntry<'a> {
    source: &'a str,
    symbols: String,
    target: &'a str,
    curvature: CurveVector,
}

#[derive(Serialize)]
struct InspectReport<'a> {
    states: Vec<StateEntry<'a>>,
    transitions: Vec<TransitionEntry<'a>>,
    acceptors: Vec<&'a str>,
    start: Option<&'a str>,
}

impl<'a> InspectReport<'a> {
    fn new(automaton: &'a Automaton) -> Self {
        Self {
            states: automaton
                .states()
                .map(|(label, pos)| StateEntry {
                    label,
                    x: pos.x,
                    y: pos.y,
                })
                .collect(),
            transitions: automaton
                .transitions()
                .map(|(key, transition)| TransitionEntry {
                    source: &key.source,
                    symbols: key.symbols.to_string(),
                    target: &transition.target,
                    curvature: transition.curvature,
                })
                .collect(),
            acceptors: automaton.acceptors().collect(),
            start: automaton.start(),
        }
    }
}

/// Main CLI application
pub struct FsavizApp {
    config: EditorConfig,
    executor: Executor,
}

impl FsavizApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// Create a new application instance with an editor config
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            config,
            executor: Executor::new(),
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags
        let log_level_str = std::env::var("FSAVIZ_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("FSAVIZ_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("fsaviz v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Run {
                input,
                json,
                color,
                strings,
            } => self.run_command(input, json, color, &strings, cli.verbose),
            Commands::Validate { input } => self.validate_command(input, cli.verbose),
            Commands::Inspect { input, json } => self.inspect_command(input, json, cli.verbose),
            Commands::Scene { input, output } => self.scene_command(input, output, cli.verbose),
        }
    }

    fn load(&self, input: Option<PathBuf>, verbose: bool) -> Result<Automaton> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }
        let automaton = automaton::load_text(&content).context("Failed to load automaton")?;
        info!(
            states = automaton.state_count(),
            transitions = automaton.transition_count(),
            "Loaded automaton"
        );
        Ok(automaton)
    }

    /// Handle the run command
    fn run_command(
        &self,
        input: Option<PathBuf>,
        json: bool,
        color: ColorChoice,
        strings: &[String],
        verbose: bool,
    ) -> Result<()> {
        let automaton = self.load(input, verbose)?;
        let report = self.run_report(&automaton, strings, json, self.should_colorize(color))?;
        self.write_output(None, &report)
    }

    /// Run every string and format the results
    pub fn run_report(
        &self,
        automaton: &Automaton,
        strings: &[String],
        json: bool,
        colorize: bool,
    ) -> Result<String> {
        let mut reports = Vec::with_capacity(strings.len());
        for input in strings {
            let result = self.executor.run(automaton, input)?;
            reports.push(RunReport { input, result });
        }

        if json {
            return Ok(serde_json::to_string_pretty(&reports)?);
        }
        Ok(reports
            .iter()
            .map(|report| format_run(report.input, &report.result, colorize))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Determine if we should colorize stdout
    fn should_colorize(&self, color: ColorChoice) -> bool {
        match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                crossterm::tty::IsTty::is_tty(&std::io::stdout())
            }
        }
    }

    /// Handle the validate command
    fn validate_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        let automaton = match self.load(input, verbose) {
            Ok(automaton) => automaton,
            Err(e) => {
                println!("✗ Invalid automaton: {:#}", e);
                return Err(e);
            }
        };

        match automaton.validate() {
            Ok(()) => {
                println!(
                    "✓ Valid automaton: {} states, {} transitions",
                    automaton.state_count(),
                    automaton.transition_count()
                );
                if automaton.start().is_none() {
                    println!("  note: no start state set; runs will fail");
                }
                Ok(())
            }
            Err(e) => {
                println!("✗ Invalid automaton: {}", e);
                Err(e.into())
            }
        }
    }

    /// Handle the inspect command
    fn inspect_command(&self, input: Option<PathBuf>, json: bool, verbose: bool) -> Result<()> {
        let automaton = self.load(input, verbose)?;
        let report = self.inspect_report(&automaton, json)?;
        self.write_output(None, &report)
    }

    /// Describe the automaton as text or JSON
    pub fn inspect_report(&self, automaton: &Automaton, json: bool) -> Result<String> {
        let report = InspectReport::new(automaton);
        if json {
            return Ok(serde_json::to_string_pretty(&report)?);
        }

        let mut lines = vec![format!("States ({}):", report.states.len())];
        for state in &report.states {
            let mut flags = Vec::new();
            if report.start == Some(state.label) {
                flags.push("start");
            }
            if report.acceptors.contains(&state.label) {
                flags.push("accept");
            }
            let flags = if flags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", flags.join(", "))
            };
            lines.push(format!("  {} ({}, {}){}", state.label, state.x, state.y, flags));
        }

        lines.push(format!("Transitions ({}):", report.transitions.len()));
        for t in &report.transitions {
            lines.push(format!(
                "  {} --{}--> {}  curvature {}",
                t.source, t.symbols, t.target, t.curvature
            ));
        }

        lines.push(format!("Start: {}", report.start.unwrap_or("-")));
        lines.push(format!("Acceptors: {}", report.acceptors.join(", ")));
        Ok(lines.join("\n"))
    }

    /// Handle the scene command
    fn scene_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let automaton = self.load(input, verbose)?;
        let scene = Scene::build(&automaton, None, &self.config);
        if verbose {
            eprintln!(
                "Built scene with {} states and {} transitions",
                scene.states.len(),
                scene.transitions.len()
            );
        }
        let json = serde_json::to_string_pretty(&scene)?;
        self.write_output(output, &json)
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => {
                debug!(path = %path.display(), "Reading input file");
                fs::read_to_string(&path)
                    .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e))
            }
            _ => {
                debug!("Reading input from stdin");
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                debug!(path = %path.display(), bytes = content.len(), "Writing output file");
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                let mut stdout = io::stdout();
                if content.is_empty() || content.ends_with('\n') {
                    write!(stdout, "{}", content)?;
                } else {
                    writeln!(stdout, "{}", content)?;
                }
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

impl Default for FsavizApp {
    fn default() -> Self {
        Self::new()
    }
}
