//! FolioCli application.
//!
//! Holds the loaded configuration, installs logging, and dispatches
//! parsed commands.

use std::sync::Arc;

use folio_content::DocumentStore;
use folio_core::Result;
use tracing_subscriber::EnvFilter;

use crate::cli::{CliArgs, Command};
use crate::config::FolioConfig;
use crate::{commands, config_handlers};

/// The Folio command-line application.
pub struct FolioCli {
    name: String,
    config: Arc<FolioConfig>,
    version: String,
}

impl FolioCli {
    /// Create from CLI args, loading config from file/env.
    pub fn from_args(name: impl Into<String>, args: &CliArgs) -> Result<Self> {
        let config = FolioConfig::load(args.config.as_deref())?;
        Ok(Self::new(name, config))
    }

    /// Create a new CLI application.
    pub fn new(name: impl Into<String>, config: FolioConfig) -> Self {
        Self {
            name: name.into(),
            config: Arc::new(config),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Get a reference to the loaded configuration.
    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses `RUST_LOG` env var if set, otherwise defaults based on verbosity flags.
    pub fn init_logging(&self, verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // A subscriber may already be installed (e.g. in tests).
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Run the CLI with the given arguments.
    pub async fn run(&self, args: CliArgs) -> Result<()> {
        self.init_logging(args.verbose, args.quiet);

        match args.command {
            Some(Command::Serve { host, port }) => commands::serve(&self.config, host, port).await,
            Some(Command::Tree { json }) => {
                print!("{}", commands::tree(&self.store()?, json).await?);
                Ok(())
            }
            Some(Command::Doc { path, meta }) => {
                println!("{}", commands::doc(&self.store()?, &path, meta).await?);
                Ok(())
            }
            Some(Command::Meta { url }) => {
                let state = commands::build_state(&self.config)?;
                println!("{}", commands::link_meta(&state.links, &url).await?);
                Ok(())
            }
            Some(Command::Video { bvid, page }) => {
                let state = commands::build_state(&self.config)?;
                println!("{}", commands::video_meta(&state.videos, &bvid, page).await?);
                Ok(())
            }
            Some(Command::Version) => {
                println!("{} {}", self.name, self.version);
                Ok(())
            }
            Some(Command::Config(config_cmd)) => {
                config_handlers::handle_config_command(args.config.as_deref(), config_cmd.command)
            }
            None => {
                println!("{} {} - use --help for usage", self.name, self.version);
                Ok(())
            }
        }
    }

    fn store(&self) -> Result<DocumentStore> {
        DocumentStore::from_config(&*self.config)
    }
}
