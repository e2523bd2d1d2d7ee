//! routegen CLI - generate typed zod/TypeScript clients from introspection data.
//!
//! ## Usage
//!
//! ```bash
//! # Generate once using ./routegen.config.json or ./routegen.toml
//! routegen
//!
//! # Use an explicit config file
//! routegen --config config/routegen.toml
//!
//! # Regenerate whenever the remote API changes
//! routegen --watch -v
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use routegen_lib::config::discover;
use routegen_lib::{generate, GeneratorConfig, IntrospectionClient, RetryPolicy};
use tracing::{error, info};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Interval between regenerations in watch mode.
const WATCH_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Parser)]
#[command(
    name = "routegen",
    about = "Generate typed zod/TypeScript clients from RPC introspection data",
    version
)]
struct Cli {
    /// Path to the config file (defaults to routegen.config.json or routegen.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Keep running and regenerate whenever the introspection data changes
    #[arg(short, long)]
    watch: bool,

    /// Increase verbosity (-v INFO, -vv DEBUG, -vvv TRACE, -vvvv TRACE with file/line)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Initialize tracing subscriber based on verbosity level.
///
/// Verbosity levels:
/// - 0 (default): WARN only, so retries and collisions are still visible
/// - 1 (-v): INFO (files written)
/// - 2 (-vv): DEBUG (per-operation compilation)
/// - 3+ (-vvv): TRACE (schema fallbacks)
/// - 4+ (-vvvv): TRACE with file/line numbers
///
/// `RUST_LOG` overrides the level mapping.
fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,routegen=info,routegen_lib=info".to_string(),
            2 => "info,routegen=debug,routegen_lib=debug".to_string(),
            _ => "debug,routegen=trace,routegen_lib=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose >= 2)
                .with_level(true)
                .with_file(verbose >= 4)
                .with_line_number(verbose >= 4)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir().wrap_err("Failed to determine the current directory")?;
    let config_path = discover(cli.config.as_deref(), &cwd)?;
    let config = GeneratorConfig::load(&config_path)
        .wrap_err_with(|| format!("Failed to load config from {:?}", config_path))?;
    let client = IntrospectionClient::new(RetryPolicy::default(), config.headers.clone())?;

    if cli.watch {
        watch(&config, &client).await;
        return Ok(());
    }

    let report = generate(&config, &client)
        .await
        .wrap_err("Client generation failed")?;
    if report.written {
        println!(
            "Generated {} operation(s) into {}",
            report.operations,
            report.path.display()
        );
    } else {
        println!("{} is up to date", report.path.display());
    }
    Ok(())
}

/// Regenerates on a fixed interval until the process is stopped.
///
/// Failed iterations are logged and retried on the next tick.
async fn watch(config: &GeneratorConfig, client: &IntrospectionClient) {
    info!(interval = ?WATCH_INTERVAL, path = %config.output_path().display(), "watching for changes");
    let mut ticker = tokio::time::interval(WATCH_INTERVAL);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match generate(config, client).await {
            Ok(report) if report.written => {
                println!(
                    "Regenerated {} operation(s) into {}",
                    report.operations,
                    report.path.display()
                );
            }
            Ok(_) => {}
            Err(e) => error!("Generation failed: {e}"),
        }
    }
}
