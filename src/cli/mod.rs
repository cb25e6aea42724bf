//! CLI module for ng2web

mod args;

pub use args::Args;

use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::error::Result;
use crate::output::{HtmlConfig, HtmlGenerator};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: Args) -> Result<()> {
    let mut cfg = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    };

    // CLI takes precedence over the config file
    cfg.merge_cli(args.output.clone(), args.sequential, args.quiet, args.verbose);
    cfg.validate()?;

    init_logging(&cfg.log.level);
    tracing::debug!(
        guide = %args.guide.display(),
        output = %cfg.output.directory.display(),
        parallel = cfg.generate.parallel,
        "Starting conversion"
    );

    let generator = HtmlGenerator::new(HtmlConfig {
        output_dir: cfg.output.directory.clone(),
        parallel: cfg.generate.parallel,
        progress: cfg.generate.progress,
    });
    let report = generator.convert(&args.guide)?;

    if !args.quiet {
        println!("{}", report.summary());
        println!("Documentation written to: {}", report.output_dir.display());
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the configured level
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
