// HTML site generator
//
// Writes the static site for one guide: the stylesheet, the about page,
// then one page per entry. Stops at the first failed render or write and
// leaves whatever was already written on disk.

use crate::error::{Error, Result};
use crate::ngdb::{Entry, Guide};
use crate::output::context::RenderContext;
use crate::output::integrity::{self, DanglingReference};
use crate::output::naming::Naming;
use crate::output::paths::{self, OutputTarget, PathResolver};
use crate::output::templates::{Template, TemplateEngine};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration for HTML generation
#[derive(Debug, Clone)]
pub struct HtmlConfig {
    /// Output directory, before `~` expansion and canonicalization
    pub output_dir: PathBuf,
    /// Render entry pages on the rayon pool
    pub parallel: bool,
    /// Show a progress bar while writing entry pages
    pub progress: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            parallel: true,
            progress: false,
        }
    }
}

/// Where a conversion run has got to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    GuideOpened,
    StylesheetWritten,
    AboutWritten,
    EntriesTraversed,
    Closed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::GuideOpened => "guide opened",
            Stage::StylesheetWritten => "stylesheet written",
            Stage::AboutWritten => "about page written",
            Stage::EntriesTraversed => "entries traversed",
            Stage::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// HTML site generator
pub struct HtmlGenerator {
    config: HtmlConfig,
}

impl HtmlGenerator {
    pub fn new(config: HtmlConfig) -> Self {
        Self { config }
    }

    /// Open the guide at `source` and generate its site.
    ///
    /// Nothing is written unless the guide opens cleanly. The guide is
    /// dropped when this returns, on success and failure alike.
    pub fn convert(&self, source: &Path) -> Result<GenerationReport> {
        debug!(stage = %Stage::Start, source = %source.display());
        let path = paths::expand_home(source);
        let path = path
            .canonicalize()
            .map_err(|_| Error::SourceNotFound(source.to_path_buf()))?;
        let guide = Guide::open(&path)?;
        info!(
            guide = %guide.title(),
            kind = %guide.kind(),
            entries = guide.len(),
            menus = guide.menus().len(),
            "Opened guide"
        );
        let result = self.generate(&guide);
        drop(guide);
        debug!(stage = %Stage::Closed, ok = result.is_ok());
        result
    }

    /// Generate the complete static site for an open guide
    pub fn generate(&self, guide: &Guide) -> Result<GenerationReport> {
        debug!(stage = %Stage::GuideOpened);
        let naming = Naming::for_guide(guide.path());
        // Guides sharing a file stem share a namespace and overwrite each other.
        debug!(namespace = naming.namespace(), source = %guide.path().display());
        let resolver = PathResolver::new(&self.config.output_dir, naming.clone());
        let render = RenderContext::build(guide, &naming);
        let engine = TemplateEngine::new(&render)?;

        let integrity = integrity::check(guide);
        for dangling in &integrity.dangling {
            warn!(
                target_file = %naming.entry(dangling.target),
                "{}",
                dangling
            );
        }
        if !integrity.unreachable.is_empty() {
            info!(
                count = integrity.unreachable.len(),
                "Entries not reachable from any menu"
            );
        }

        let mut report = GenerationReport {
            namespace: naming.namespace().to_string(),
            output_dir: resolver.root().to_path_buf(),
            dangling: integrity.dangling,
            unreachable: integrity.unreachable,
            ..Default::default()
        };

        let css = engine.render(Template::Stylesheet, render.context())?;
        write_target(&resolver.stylesheet(), &css)?;
        report.files_written += 1;
        debug!(stage = %Stage::StylesheetWritten);

        let about = engine.render(Template::About, render.context())?;
        write_target(&resolver.about(), &about)?;
        report.files_written += 1;
        debug!(stage = %Stage::AboutWritten);

        let progress = self.progress_bar(guide.len());
        let write_entry = |entry: &Entry| -> Result<()> {
            let html = engine.render(Template::Entry, &render.for_entry(entry))?;
            write_target(&resolver.entry(entry.offset), &html)?;
            progress.inc(1);
            Ok(())
        };

        let traversal = if self.config.parallel {
            guide.entries().par_iter().try_for_each(write_entry)
        } else {
            guide.entries().iter().try_for_each(write_entry)
        };
        progress.finish_and_clear();
        traversal?;

        report.entries_written = guide.len();
        report.files_written += guide.len();
        debug!(stage = %Stage::EntriesTraversed);

        Ok(report)
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.config.progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message("entries");
        pb
    }
}

/// Write one generated file, creating its directory first
fn write_target(target: &OutputTarget, contents: &str) -> Result<()> {
    if let Some(parent) = target.path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::output(parent, e))?;
    }
    fs::write(&target.path, contents).map_err(|e| Error::output(&target.path, e))?;
    debug!(role = ?target.role, path = %target.path.display(), "Wrote file");
    Ok(())
}

/// Report of what was generated
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub namespace: String,
    pub output_dir: PathBuf,
    pub files_written: usize,
    pub entries_written: usize,
    pub dangling: Vec<DanglingReference>,
    pub unreachable: Vec<u32>,
}

impl GenerationReport {
    pub fn summary(&self) -> String {
        format!(
            "Generated {} files ({} entries), dangling links: {}, unreachable entries: {}",
            self.files_written,
            self.entries_written,
            self.dangling.len(),
            self.unreachable.len()
        )
    }
}
