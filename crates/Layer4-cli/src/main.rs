//! Pluggable CLI - Main entry point
//!
//! 실행할 때마다 새 매니저를 만들고 기본 플러그인을 등록한 뒤 커맨드를 수행합니다.

mod cli;

use clap::{Parser, Subcommand};
use pluggable_core::{builtin, PluginManager, PluginManagerConfig};
use pluggable_foundation::{PluggableConfig, RuntimeEnvironment};
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pluggable - plugin lifecycle manager demo
#[derive(Parser, Debug)]
#[command(name = "pluggable")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Runtime environment passed to plugins (development, production)
    #[arg(long)]
    env: Option<RuntimeEnvironment>,

    /// Default timeout for lifecycle hooks in milliseconds (0 = none)
    #[arg(long)]
    hook_timeout_ms: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered plugins
    List,
    /// Show dependencies and dependents of a plugin
    Graph {
        /// Plugin id
        id: String,
    },
    /// Run input through transformers, validators and formatters
    Run {
        /// Input data
        input: String,

        /// Parse input as JSON instead of a plain string
        #[arg(long)]
        json: bool,

        /// Deactivate a plugin before running (repeatable, in order)
        #[arg(long = "deactivate", value_name = "ID")]
        deactivate: Vec<String>,

        /// Order each stage by plugin priority instead of registration order
        #[arg(long)]
        by_priority: bool,
    },
    /// Run an operation plugin (addition, subtraction, multiplication, division)
    Calc {
        /// Operation plugin id
        operation: String,

        /// Operands, folded left to right
        #[arg(allow_negative_numbers = true, required = true)]
        operands: Vec<f64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration (global, then project)
    let load_result = PluggableConfig::load();
    let mut config = match &load_result {
        Ok(config) => config.clone(),
        Err(_) => PluggableConfig::default(),
    };
    if let Some(environment) = args.env {
        config.environment = Some(environment);
    }
    if let Some(ms) = args.hook_timeout_ms {
        config.hook_timeout_ms = Some(ms);
    }

    // Initialize logging
    let log_level = if args.debug {
        "debug".to_string()
    } else {
        config.log_level.clone().unwrap_or_else(|| "info".to_string())
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(e) = &load_result {
        warn!("Failed to load config, using defaults: {}", e);
    }

    // Build manager and register built-ins
    let manager = PluginManager::with_config(PluginManagerConfig::from(&config));
    debug!(environment = %manager.environment(), "Plugin manager ready");

    for err in builtin::register_all(&manager).await {
        eprintln!("Warning: {}", err);
    }

    match args.command {
        Command::List => cli::list(&manager).await,
        Command::Graph { id } => cli::graph(&manager, &id).await,
        Command::Run {
            input,
            json,
            deactivate,
            by_priority,
        } => cli::run(&manager, &input, json, &deactivate, by_priority).await,
        Command::Calc {
            operation,
            operands,
        } => cli::calc(&manager, &operation, &operands).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let args = Args::try_parse_from([
            "pluggable",
            "--env",
            "production",
            "run",
            "hello",
            "--deactivate",
            "html-formatter",
            "--deactivate",
            "json-formatter",
            "--by-priority",
        ])
        .unwrap();

        assert_eq!(args.env, Some(RuntimeEnvironment::Production));
        match args.command {
            Command::Run {
                input,
                deactivate,
                by_priority,
                json,
            } => {
                assert_eq!(input, "hello");
                assert_eq!(deactivate, vec!["html-formatter", "json-formatter"]);
                assert!(by_priority);
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_calc_with_negative_operands() {
        let args = Args::try_parse_from(["pluggable", "calc", "subtraction", "10", "-2.5"]).unwrap();
        match args.command {
            Command::Calc {
                operation,
                operands,
            } => {
                assert_eq!(operation, "subtraction");
                assert_eq!(operands, vec![10.0, -2.5]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_calc_requires_operands() {
        assert!(Args::try_parse_from(["pluggable", "calc", "addition"]).is_err());
    }
}
