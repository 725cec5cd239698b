use std::path::{Component, PathBuf};
use std::sync::Once;

static TRACE_INIT: Once = Once::new();
const DEFAULT_TRACE_FILTER: &str =
    "seqbench::session=info,seqbench::controller=warn,seqbench::fixture=info,seqbench_cli=info";

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use seqbench_core::perf::scenarios;
use seqbench_core::{Registry, Session, SessionConfig};

mod output;


#[derive(Debug, Parser)]
#[command(
    name = "seqbench",
    author,
    version,
    about = "Microbenchmarks for traversal idioms across container kinds",
    long_about = None,
    after_help = "Set SEQBENCH_TRACE=1 (or a filter expression) to log session progress to stderr."
)]
struct CliArgs {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the scenario catalog and report mean and dispersion per cell
    Run(RunArgs),
    /// Print the registered scenarios without running them
    List {
        /// Fixture size used to compute expected values
        #[arg(long)]
        size: Option<usize>,
        /// Keep scenarios whose `kind/operation` label contains this text
        #[arg(long)]
        filter: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Session config file (.toml, .yaml, .yml or .json)
    #[arg(long, value_name = "FILE", value_parser = parse_sanitized_path)]
    config: Option<PathBuf>,

    /// Discarded invocations before measuring each scenario
    #[arg(long)]
    warmup: Option<u64>,

    /// Recorded invocations per scenario
    #[arg(long)]
    iterations: Option<u64>,

    /// Elements per fixture
    #[arg(long)]
    size: Option<usize>,

    /// Wall-clock cap on each scenario's measurement phase
    #[arg(long)]
    budget_ms: Option<u64>,

    /// Wall-clock cap on the whole session
    #[arg(long)]
    deadline_ms: Option<u64>,

    /// Build fixtures on worker threads (measurement stays sequential)
    #[arg(long)]
    parallel_fixtures: bool,

    /// Keep scenarios whose `kind/operation` label contains this text
    #[arg(long)]
    filter: Option<String>,

    /// Format printed to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Also write the report as JSON
    #[arg(long, value_name = "FILE", value_parser = parse_sanitized_path)]
    json: Option<PathBuf>,

    /// Also write the report as CSV
    #[arg(long, value_name = "FILE", value_parser = parse_sanitized_path)]
    csv: Option<PathBuf>,
}

impl RunArgs {
    fn session_config(&self) -> anyhow::Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::from_path(path)?,
            None => SessionConfig::default(),
        };
        if let Some(warmup) = self.warmup {
            config.warmup_iterations = warmup;
        }
        if let Some(iterations) = self.iterations {
            config.measurement_iterations = iterations;
        }
        if let Some(size) = self.size {
            config.fixture_size = size;
        }
        if let Some(budget) = self.budget_ms {
            config.time_budget_per_scenario_ms = Some(budget);
        }
        if let Some(deadline) = self.deadline_ms {
            config.session_deadline_ms = Some(deadline);
        }
        if self.parallel_fixtures {
            config.parallel_fixtures = true;
        }
        config.validate()?;
        Ok(config)
    }
}

fn sanitize_path(raw: &str) -> anyhow::Result<PathBuf> {
    let p = PathBuf::from(raw);
    if raw.trim().is_empty() {
        anyhow::bail!("Empty path is not allowed");
    }
    if p.components().any(|c| matches!(c, Component::ParentDir)) {
        anyhow::bail!("Parent directory components ('..') are not allowed: {}", raw);
    }
    Ok(p)
}

fn parse_sanitized_path(raw: &str) -> Result<PathBuf, String> {
    sanitize_path(raw).map_err(|e| e.to_string())
}

fn env_toggle_enabled(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }
    !(trimmed.eq_ignore_ascii_case("0") || trimmed.eq_ignore_ascii_case("false") || trimmed.eq_ignore_ascii_case("off"))
}

fn filter_expr_from(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("1")
        || trimmed.eq_ignore_ascii_case("true")
        || trimmed.eq_ignore_ascii_case("on")
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn maybe_init_tracing() {
    let raw = match std::env::var("SEQBENCH_TRACE") {
        Ok(value) => value,
        Err(_) => return,
    };

    if !env_toggle_enabled(&raw) {
        return;
    }

    TRACE_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        use tracing_subscriber::fmt;

        let filter_expr = filter_expr_from(&raw).or_else(|| std::env::var("RUST_LOG").ok());

        let builder = fmt().with_writer(std::io::stderr);

        let builder = match filter_expr.and_then(|expr| EnvFilter::try_new(expr).ok()) {
            Some(filter) => builder.with_env_filter(filter),
            None => builder.with_env_filter(DEFAULT_TRACE_FILTER),
        };

        let _ = builder.try_init();
    });
}

fn filtered_catalog(size: usize, filter: Option<&str>) -> anyhow::Result<Registry> {
    let registry = scenarios::catalog(size)?;
    Ok(match filter {
        Some(needle) => registry.retain(|workload| workload.label().contains(needle)),
        None => registry,
    })
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = args.session_config()?;
    let registry = filtered_catalog(config.fixture_size, args.filter.as_deref())?;
    let report = Session::new(config, registry).run().context("benchmark session aborted")?;

    match args.format {
        OutputFormat::Table => print!("{}", output::render_table(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    if let Some(path) = &args.json {
        output::write_json(path, &report)?;
        tracing::info!(target: "seqbench_cli", path = %path.display(), "wrote JSON report");
    }
    if let Some(path) = &args.csv {
        output::write_csv(path, &report)?;
        tracing::info!(target: "seqbench_cli", path = %path.display(), "wrote CSV report");
    }
    Ok(())
}

fn list(size: Option<usize>, filter: Option<&str>) -> anyhow::Result<()> {
    let size = size.unwrap_or(SessionConfig::default().fixture_size);
    let registry = filtered_catalog(size, filter)?;
    print!("{}", output::render_list(&registry));
    Ok(())
}

fn main() -> anyhow::Result<()> {
    maybe_init_tracing();

    let CliArgs { command } = CliArgs::parse();
    match command {
        Commands::Run(args) => run(args),
        Commands::List { size, filter } => list(size, filter.as_deref()),
    }
}
