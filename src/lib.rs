//! ng2web - Convert Norton Guide databases to static HTML sites
//!
//! Reads a Norton Guide (or Expert Help) database and writes one HTML page
//! per entry, an about page and a stylesheet, with every menu, see-also
//! and line link turned into a relative hyperlink.

pub mod cli;
pub mod config;
pub mod error;
pub mod ngdb;
pub mod output;

/// Version banner printed by `--version`
pub const VERSION: &str = concat!(
    "v",
    env!("CARGO_PKG_VERSION"),
    " (ngdb reader v",
    env!("CARGO_PKG_VERSION"),
    ", tera engine v1.x)"
);

// Re-export main types
pub use config::Config;
pub use error::{Error, Result};
pub use ngdb::{Choice, Entry, Guide, Menu};
pub use output::{GenerationReport, HtmlConfig, HtmlGenerator};
