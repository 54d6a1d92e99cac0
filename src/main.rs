use clap::Parser;
use geotally::config::{load_config, ConfigLayer};
use geotally::mapreduce::Coordinator;
use geotally::report::{write_report_file, OutputFormat, ReportFormatter};
use geotally::error::describe_error_code;
use geotally::GeoTallyError;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, trace};
use tracing_subscriber::EnvFilter;

/// Count geotagged events per grid cell and language
#[derive(Parser)]
#[command(name = "geotally")]
#[command(about = "Count geotagged events per grid cell and language", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// File path to the event json file
    #[arg(short = 'f', long = "file")]
    events: Option<PathBuf>,

    /// File path to the grid json file
    #[arg(long)]
    grid: Option<PathBuf>,

    /// File path to a json file mapping language iso codes to names
    #[arg(long = "lang-map")]
    languages: Option<PathBuf>,

    /// Number of parallel workers (default: available parallelism)
    #[arg(short = 'n', long)]
    workers: Option<usize>,

    /// Number of languages listed per cell in the table
    #[arg(long = "top")]
    top_n: Option<usize>,

    /// Also write the table to a timestamped file in this directory
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Language code treated as "undefined"
    #[arg(long)]
    undefined_language: Option<String>,

    /// Path to configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> ConfigLayer {
        ConfigLayer {
            events: self.events.clone(),
            grid: self.grid.clone(),
            languages: self.languages.clone(),
            workers: self.workers,
            top_n: self.top_n,
            output_dir: self.output_dir.clone(),
            format: self.format,
            undefined_language: self.undefined_language.clone(),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2) // Show target module for -vv and above
        .with_thread_ids(cli.verbose >= 3) // Show thread IDs for -vvv
        .with_line_number(cli.verbose >= 3) // Show line numbers for -vvv
        .init();

    debug!("geotally started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli).await {
        error!("Fatal error: {}", e);
        let code = match e.downcast_ref::<GeoTallyError>() {
            Some(err) => {
                debug!("E{:04}: {}", err.code(), describe_error_code(err.code()));
                eprintln!("Error: {}", err.user_message());
                err.exit_code()
            }
            None => {
                eprintln!("Error: {e}");
                1
            }
        };
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(cli.config.as_deref(), cli.overrides())?;
    debug!("Resolved configuration: {:?}", config);

    let coordinator = Coordinator::new(config);
    let outcome = coordinator.run().await?;
    let config = coordinator.config();

    let formatter = ReportFormatter::new(config.format, config.top_n);
    println!("{}", formatter.format(&outcome.report, &outcome.stats));

    if let Some(dir) = &config.output_dir {
        write_report_file(dir, &outcome.report, config.top_n, chrono::Local::now())?;
    }

    info!(
        "Elapsed time: {:.3} seconds ({:.3} in workers)",
        start.elapsed().as_secs_f64(),
        outcome.elapsed.as_secs_f64()
    );
    Ok(())
}
