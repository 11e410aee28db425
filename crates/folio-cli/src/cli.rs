//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};

// ============================================================================
// CLI argument types
// ============================================================================

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "folio", author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "FOLIO_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Folio commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API server.
    Serve {
        /// Address to bind (overrides `server.host`).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides `server.port`).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the document tree of the content root.
    Tree {
        /// Print the tree as JSON instead of an outline.
        #[arg(long)]
        json: bool,
    },

    /// Print a document, or its frontmatter.
    Doc {
        /// Path relative to the content root.
        path: String,

        /// Print the frontmatter as JSON instead of the text.
        #[arg(short, long)]
        meta: bool,
    },

    /// Resolve the link preview for a URL.
    Meta {
        /// Absolute http(s) URL.
        url: String,
    },

    /// Resolve cover and duration for a video.
    Video {
        /// Video id (BV...).
        bvid: String,

        /// Part number, starting at 1.
        #[arg(short, long, allow_negative_numbers = true)]
        page: Option<i64>,
    },

    /// Print version information.
    Version,

    /// Configuration operations.
    Config(ConfigCommand),
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Print the effective configuration as TOML.
    Show,

    /// Create a default configuration file.
    Init {
        /// Output file path (defaults to XDG config path).
        #[arg(short, long)]
        file: Option<String>,

        /// Overwrite existing file.
        #[arg(long)]
        force: bool,
    },

    /// Export configuration as environment variables.
    Export {
        /// Format as Docker --env flags.
        #[arg(long)]
        docker_env: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================
