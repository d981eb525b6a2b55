use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::data::LogLevel;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Inspect and modify files and directories as path nodes")]
pub struct Cli {
    #[clap(long, short, default_value = "warn", value_enum, global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Describe a path and, for a directory, its entries
    Show {
        path: PathBuf,
        /// Read the whole hierarchy below the path
        #[clap(long, short)]
        recursive: bool,
    },
    /// Open a directory and move through it one segment at a time
    Navigate {
        path: PathBuf,
        /// Entry names, "." or ".."
        segments: Vec<String>,
    },
    /// Create an empty file inside a directory, truncating an existing one
    Mkfile { directory: PathBuf, name: String },
    /// Create a directory inside a directory
    Mkdir { directory: PathBuf, name: String },
    /// Remove an entry from a directory
    Rm {
        directory: PathBuf,
        name: String,
        /// Also remove directories that still have entries
        #[clap(long, short)]
        recursive: bool,
    },
}
