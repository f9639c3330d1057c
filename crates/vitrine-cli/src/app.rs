//! The Vitrine CLI application.

use crate::cli::{CliArgs, Command};
use crate::config::VitrineConfig;
use crate::state::AppState;
use crate::{config_handlers, search_handlers, server};
use tracing_subscriber::EnvFilter;
use vitrine_core::Result;

// ============================================================================
// VitrineCli
// ============================================================================

/// CLI application holding the loaded configuration.
pub struct VitrineCli {
    name: String,
    config: VitrineConfig,
    version: String,
}

impl VitrineCli {
    /// Create from CLI args, loading config from file/env.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let config = VitrineConfig::load(args.config.as_deref())?;
        Ok(Self::new(config))
    }

    /// Create a new CLI application.
    pub fn new(config: VitrineConfig) -> Self {
        Self {
            name: "vitrine".to_string(),
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// The loaded configuration.
    pub fn config(&self) -> &VitrineConfig {
        &self.config
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses `RUST_LOG` env var if set, otherwise defaults based on verbosity
    /// flags. Records from the `log` facade are forwarded to the subscriber.
    pub fn init_logging(verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // Ignore error if a subscriber is already set (e.g. in tests).
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }

    /// Run the CLI with the given arguments.
    pub async fn run(&self, args: CliArgs) -> Result<()> {
        match args.command {
            Some(Command::Version) => {
                println!("{} {}", self.name, self.version);
                Ok(())
            }
            Some(Command::Health) => {
                let state = AppState::from_config(self.config.clone())?;
                println!(
                    "{}: healthy ({} records, embedding {})",
                    self.name,
                    state.store().len().await,
                    if state.router().has_provider() {
                        "configured"
                    } else {
                        "not configured"
                    }
                );
                Ok(())
            }
            Some(Command::Serve { host, port }) => {
                let mut config = self.config.clone();
                if let Some(host) = host {
                    config.server.host = host;
                }
                if let Some(port) = port {
                    config.server.port = port;
                }
                let addr = config.bind_address();
                let state = AppState::from_config(config)?;
                server::serve(state, &addr).await
            }
            Some(Command::Index { check }) => {
                let state = AppState::from_config(self.config.clone())?;
                search_handlers::handle_index(&state, check).await
            }
            Some(Command::Search { query, json }) => {
                let state = AppState::from_config(self.config.clone())?;
                search_handlers::handle_search(&state, &query, json).await
            }
            Some(Command::Config(config_cmd)) => {
                config_handlers::handle_config_command(args.config.as_deref(), config_cmd.command)
            }
            None => {
                println!("{} {}, use --help for usage", self.name, self.version);
                Ok(())
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
