//! CLI argument parsing

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Convert a Norton Guide database to HTML documents.
#[derive(Parser, Debug)]
#[command(name = "ng2web")]
#[command(about = "Convert a Norton Guide database to HTML documents.")]
#[command(version = crate::VERSION, disable_version_flag = true)]
pub struct Args {
    /// The guide to convert
    pub guide: PathBuf,

    /// Directory where the output files will be created [default: .]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file path [default: ./ng2web.toml if present]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Only report warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Show debug output
    #[arg(long)]
    pub verbose: bool,

    /// Write entry pages one at a time
    #[arg(long)]
    pub sequential: bool,

    /// Show version information
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}
