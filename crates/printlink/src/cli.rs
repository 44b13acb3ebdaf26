use clap::{Parser, Subcommand};
use printlink_core::DefaultChoice;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "printlink")]
#[command(version)]
#[command(about = "Manage OctoPrint instances and send jobs to them")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the settings file and repair its shape
    Init,

    /// Show stored settings (API keys redacted)
    Status,

    /// Print version information
    Version,

    /// Manage OctoPrint instances
    Instances {
        #[command(subcommand)]
        action: Option<InstanceAction>,
    },

    /// Send a G-code file to an instance
    Send {
        /// File to send
        file: PathBuf,

        /// Instance id or 1-based position
        #[arg(long)]
        to: Option<String>,

        /// Pick the default instance instead of asking
        #[arg(long)]
        auto: bool,
    },

    /// Manage plugins
    Plugins {
        #[command(subcommand)]
        action: Option<PluginAction>,
    },
}

#[derive(Subcommand)]
pub enum InstanceAction {
    /// List configured instances
    List,
    /// Add an instance
    Add {
        #[arg(long, default_value = "")]
        name: String,
        /// Base URL, e.g. https://printer.local
        #[arg(long, default_value = "")]
        url: String,
        /// API key
        #[arg(long, default_value = "")]
        key: String,
        /// Make this the default instance
        #[arg(long)]
        default: bool,
    },
    /// Edit an instance
    Edit {
        /// Instance id or 1-based position
        target: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        key: Option<String>,
        /// yes or no
        #[arg(long)]
        default: Option<DefaultChoice>,
    },
    /// Remove an instance
    Remove { target: String },
    /// Make an instance the default
    Default { target: String },
}

#[derive(Subcommand)]
pub enum PluginAction {
    /// List all plugins
    List,
    /// Enable a plugin
    Enable { name: String },
    /// Disable a plugin
    Disable { name: String },
}
