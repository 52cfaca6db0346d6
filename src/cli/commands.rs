//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Intacct custom object reader
#[derive(Parser, Debug)]
#[command(name = "intacct")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML); INTACCT_* environment variables override it
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Control id sent with the request
    #[arg(long, global = true)]
    pub control_id: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read one page of a custom view
    ReadView {
        /// View id
        #[arg(long)]
        view: String,

        /// Records per page
        #[arg(long)]
        page_size: Option<u64>,
    },

    /// Read every page of a custom view
    ViewRecords {
        /// View id
        #[arg(long)]
        view: String,

        /// Records per page
        #[arg(long)]
        page_size: Option<u64>,

        /// Fail when the view holds more records than this
        #[arg(long)]
        max_total_count: Option<u64>,
    },

    /// Read records related to object keys
    ReadRelated {
        /// Object name
        #[arg(long)]
        object: String,

        /// Relationship name
        #[arg(long)]
        relation: String,

        /// Object keys (comma-separated)
        #[arg(long, value_delimiter = ',')]
        keys: Vec<String>,

        /// Fields to return (comma-separated, default all)
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },
}
