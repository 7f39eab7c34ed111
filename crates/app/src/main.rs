use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use clap::{Parser, Subcommand};
use sort_visualiser_core::{
    parse_values, Algorithm, AppConfig, BarRenderer, Change, Controller, InstantScheduler,
    Scheduler, SequenceStore, TokioScheduler,
};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> sort_visualiser_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_sort(args).await,
        Commands::Algorithms => {
            for algorithm in Algorithm::ALL {
                println!("{:<12} {}", algorithm.key(), algorithm.display_name());
            }
            Ok(())
        }
        Commands::DumpConfig { output } => dump_config(&output),
    }
}

async fn run_sort(args: RunArgs) -> sort_visualiser_core::Result<()> {
    let config = args.resolve_config()?;
    let values = match args.values.as_deref() {
        Some(text) => parse_values(text)?,
        None => config.initial_values(),
    };
    tracing::info!(algorithm = %config.sort.algorithm, len = values.len(), "preparing run");

    let scheduler: Arc<dyn Scheduler> = if args.instant {
        Arc::new(InstantScheduler::new())
    } else {
        Arc::new(TokioScheduler::new())
    };
    let store = Arc::new(SequenceStore::with_values(values));
    let mut controller = Controller::new(store.clone(), scheduler, config.sort);
    if let Some(seed) = config.seed {
        controller = controller.with_seed(seed);
    }

    if !args.quiet {
        let renderer = Mutex::new(BarRenderer::new());
        store.subscribe(move |event| {
            if matches!(event.change, Change::Published | Change::Shuffled) {
                if let Ok(mut renderer) = renderer.lock() {
                    let line = renderer.render_line(&event.sequence);
                    let mut stdout = std::io::stdout().lock();
                    let _ = write!(stdout, "\r{line}");
                    let _ = stdout.flush();
                }
            }
        });
    }

    // Explicit values are played as given; generated columns are shuffled.
    if args.values.is_none() {
        controller.reset()?;
    }

    let report = controller.start().await?;
    if !args.quiet {
        println!();
    }

    if args.report {
        if let Some(report) = report {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn dump_config(output: &Path) -> sort_visualiser_core::Result<()> {
    tracing::info!(?output, "writing default config");
    AppConfig::default().save(output)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Step-by-step sorting algorithm visualiser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Shuffle a sequence and animate sorting it.
    Run(RunArgs),
    /// List the available sorting algorithms.
    Algorithms,
    /// Write the default configuration as JSON.
    DumpConfig {
        /// Path of the file to create.
        output: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Sorting algorithm (bubbleSort, quickSort, mergeSort).
    #[arg(short, long)]
    algorithm: Option<Algorithm>,
    /// Delay between animation steps in milliseconds.
    #[arg(short, long)]
    delay_ms: Option<u64>,
    /// Run without pacing between steps.
    #[arg(long)]
    no_delay: bool,
    /// Number of columns to generate (values 1..=N).
    #[arg(short, long)]
    columns: Option<usize>,
    /// Explicit comma separated values; these are not shuffled.
    #[arg(long)]
    values: Option<String>,
    /// Seed for the shuffle.
    #[arg(long)]
    seed: Option<u64>,
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Skip all suspension, even when pacing is enabled.
    #[arg(long)]
    instant: bool,
    /// Do not draw the bars.
    #[arg(short, long)]
    quiet: bool,
    /// Print the run report as JSON when the run finishes.
    #[arg(long)]
    report: bool,
}

impl RunArgs {
    /// Layers command line overrides on top of the config file or defaults.
    fn resolve_config(&self) -> sort_visualiser_core::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        if let Some(algorithm) = self.algorithm {
            config.sort.algorithm = algorithm;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.sort.delay_ms = delay_ms;
        }
        if self.no_delay {
            config.sort.paced = false;
        }
        if let Some(columns) = self.columns {
            config.columns = columns;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(args: &[&str]) -> RunArgs {
        let cli = Cli::try_parse_from(std::iter::once("sort-visualiser").chain(args.iter().copied()))
            .expect("arguments should parse");
        match cli.command {
            Commands::Run(args) => args,
            other => panic!("expected run command, got {other:?}"),
        }
    }

    #[test]
    fn command_line_overrides_defaults() {
        let config = run_args(&["run", "-a", "merge", "--delay-ms", "25", "--no-delay", "--seed", "9"])
            .resolve_config()
            .unwrap();

        assert_eq!(config.sort.algorithm, Algorithm::MergeSort);
        assert_eq!(config.sort.delay_ms, 25);
        assert!(!config.sort.paced);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.columns, 70);
    }

    #[test]
    fn rejects_unknown_algorithms_and_negative_delays() {
        let prefix = std::iter::once("sort-visualiser");
        assert!(Cli::try_parse_from(prefix.clone().chain(["run", "-a", "bogo"])).is_err());
        assert!(Cli::try_parse_from(prefix.chain(["run", "--delay-ms", "-5"])).is_err());
    }
}
