#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use branch_metrics::{
    CancelFlag, DefaultClock, DefaultFsOps, DefaultGitRunner, Options, collect_report_data,
    generate_report, load_config,
    output::{TabStyle, format_tab, to_json},
};
use clap::{Parser, ValueEnum};
use tracing::{Level, debug, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Tab,
    Json,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum LogLevel {
    Info,
    Debug,
    Warn,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Warn => Level::WARN,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Collect metrics about branches in git repos.")]
struct Args {
    /// Repository list (TOML with [[repo]] name, url, base-branch)
    #[arg(long, default_value = "branch-metrics.toml")]
    config: PathBuf,

    /// Directory holding the local mirrors; overrides repos-dir from the config
    #[arg(long)]
    repos_dir: Option<PathBuf>,

    /// Set logging level
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    loglevel: LogLevel,

    /// Worker threads (0 = one per CPU)
    #[arg(long, default_value_t = 0)]
    jobs: usize,

    /// Per-query timeout for history lookups in seconds (0 = no limit)
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Output format: text (default), tab or json
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Table style to use with --output tab
    #[arg(long, value_enum, default_value_t = TabStyle::Rounded)]
    tab_style: TabStyle,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level: Level = args.loglevel.into();
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
    debug!("{args:?}");

    let config = load_config(&args.config)
        .with_context(|| format!("cannot load {}", args.config.display()))?;
    let opts = Options {
        repos_dir: args.repos_dir.clone(),
        jobs: args.jobs,
        query_timeout: (args.timeout_secs > 0).then(|| Duration::from_secs(args.timeout_secs)),
    };

    let cancel = CancelFlag::new();
    let on_interrupt = cancel.clone();
    if let Err(err) = ctrlc::set_handler(move || on_interrupt.cancel()) {
        warn!("interrupts will not stop the run early: {err}");
    }

    let data = collect_report_data(
        &config,
        &opts,
        &DefaultFsOps,
        &DefaultGitRunner,
        &DefaultClock,
        &cancel,
    )?;

    let out = match args.output {
        OutputFormat::Text => generate_report(&data),
        OutputFormat::Tab => format_tab(&data, args.tab_style),
        OutputFormat::Json => to_json(&data)?,
    };
    println!("{out}");

    if cancel.is_cancelled() {
        warn!("run cancelled; the report is partial");
    }
    Ok(())
}
