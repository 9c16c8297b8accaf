use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Main entrypoint for versefill when called as executable
#[derive(Parser)]
#[command(name = "versefill", version, about)]
pub struct Cli {
    /// Site root containing the data/ directory.
    #[arg(short = 'd', long = "site-dir", default_value = ".")]
    pub site_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate the per-section answer data files for the foundation course
    Answers,

    /// Write placeholder answer files for the one2one course pages
    Scaffold {
        /// Page directory, relative to the site root; placeholder files
        /// land in its data/answers/ subdirectory
        #[arg(default_value = "done2one")]
        pages_dir: PathBuf,
    },

    /// Fill unresolved one2one references from the foundation answers
    Populate {
        /// One2one directory, relative to the site root
        #[arg(long = "one2one-dir", default_value = "done2one")]
        one2one_dir: PathBuf,
    },

    /// Render the foundation course pages with standard answers pre-filled
    Pages,

    /// Serve the site locally, with the verse-editing API
    Serve {
        #[arg(short = 'p', long = "port", default_value_t = 8001)]
        port: u16,
    },
}
