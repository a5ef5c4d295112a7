//! CLI argument definitions
//!
//! Contains the main CLI struct and Commands enum for clap parsing.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Query used by `run` when none is given
pub const DEFAULT_QUERY: &str = "Create a professional LinkedIn image only about AI in healthcare";

#[derive(Parser)]
#[command(name = "content-agent")]
#[command(about = "Generate social media posts and images, optionally delivered over WhatsApp")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Chat model (default: from .content-agent.toml or gpt-4o-mini)
    #[arg(short = 'm', long, env = "OPENAI_MODEL", global = true)]
    pub model: Option<String>,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "OPENAI_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Config file to use instead of searching for .content-agent.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one content request end to end and print the posts
    Run {
        /// What to create
        #[arg(default_value = DEFAULT_QUERY)]
        query: String,
    },
    /// Start the HTTP API
    Serve {
        /// Port to listen on (default: from config, or 8000)
        #[arg(long, short)]
        port: Option<u16>,
    },
}
