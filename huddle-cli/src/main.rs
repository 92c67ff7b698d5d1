use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use huddle_core::config::Config;
use huddle_core::core_space::SharedModel;
use huddle_core::logging::{init_logging_with_config, LogConfig};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

mod demo;

#[derive(Parser, Debug)]
#[command(name = "huddle")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Set the log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable JSON formatted logging
    #[arg(long)]
    json_logs: bool,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print model version and uptime
    Info,

    /// Seed a sample conversation and print a follower's status report
    Demo {
        /// Messages posted before the follower starts watching
        #[arg(long, default_value_t = 5)]
        backlog: usize,

        /// Messages posted after the follower starts watching
        #[arg(long, default_value_t = 3)]
        unread: usize,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// File config if given, then environment overrides, then `--log-level`
fn load_config(path: Option<&Path>, log_level: Option<&str>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };
    config.apply_env()?;
    if let Some(level) = log_level {
        config.logging.level = level.to_string();
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref(), args.log_level.as_deref())?;

    let mut log_config = LogConfig::from(&config.logging);
    if args.json_logs {
        log_config = log_config.json_format(true);
    }
    init_logging_with_config(log_config)?;

    if config.metrics.enabled {
        huddle_core::metrics::init_metrics();
    }

    let model = SharedModel::new(config.model.clone());
    let version = model.version().await;
    info!(version = %version, "Huddle started");

    match args.command {
        Some(Command::Info) => {
            println!("version: {}", version);
            println!("uptime: {}ms", model.uptime().await.as_millis());
        }
        Some(Command::Demo {
            backlog,
            unread,
            json,
        }) => {
            let report = demo::run(&model, backlog, unread).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report);
            }
        }
        None => {
            warn!("No command specified. Use --help for usage information.");
        }
    }

    Ok(())
}
