//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::{Gender, Occasion, OutfitId, Season};

/// FashionLabs - outfit generator with a digital closet
#[derive(Parser)]
#[command(
    name = "fl",
    about = "Generate outfits, swap garments and keep a digital closet",
    version,
    after_help = "Logs are written to: ~/.local/share/fashionlabs/logs/fashionlabs.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Subcommand to execute (defaults to the interactive shell)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Launch the interactive shell
    Shell,

    /// Generate one outfit and print it
    Generate {
        #[arg(short, long)]
        gender: Option<Gender>,

        #[arg(short, long)]
        season: Option<Season>,

        #[arg(short, long)]
        occasion: Option<Occasion>,

        /// Free-text style hint
        #[arg(long)]
        style: Option<String>,

        /// Save the result to the closet, optionally under NAME
        #[arg(long, value_name = "NAME", num_args = 0..=1)]
        save: Option<Option<String>>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Manage saved outfits
    Closet {
        #[command(subcommand)]
        command: ClosetCommand,
    },

    /// Download a garment image
    Image {
        /// Image identifier as returned by the service
        image: String,

        /// Output file (defaults to the image's file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Closet subcommands
#[derive(Subcommand)]
pub enum ClosetCommand {
    /// List saved outfits
    List {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show one saved outfit
    Show {
        id: OutfitId,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Rename a saved outfit
    Rename { id: OutfitId, name: String },

    /// Delete a saved outfit
    Delete { id: OutfitId },
}

/// Output format for generate/closet commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fashionlabs")
        .join("logs")
        .join("fashionlabs.log")
}
