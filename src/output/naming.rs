// Output file naming
//
// Every generated file name is prefixed with the guide's namespace so that
// several guides can share one output directory.

use std::path::Path;

/// Namespace used when a guide path has no usable file stem
const FALLBACK_NAMESPACE: &str = "guide";

/// The logical role a generated file plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Stylesheet,
    About,
    Entry(u32),
}

/// Guide-scoped naming scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Naming {
    namespace: String,
}

impl Naming {
    /// Derive the naming scheme from a guide's source path
    pub fn for_guide(path: &Path) -> Self {
        let namespace = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| FALLBACK_NAMESPACE.to_string());
        Self { namespace }
    }

    /// The guide's namespace: its file name without extension
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Prefix `text` with the namespace
    pub fn prefix(&self, text: &str) -> String {
        format!("{}-{}", self.namespace, text)
    }

    pub fn stylesheet(&self) -> String {
        self.prefix("style.css")
    }

    pub fn about(&self) -> String {
        self.prefix("about.html")
    }

    /// File name of the page for the entry at `offset`
    pub fn entry(&self, offset: u32) -> String {
        self.prefix(&format!("{}.html", offset))
    }

    pub fn file_name(&self, role: Role) -> String {
        match role {
            Role::Stylesheet => self.stylesheet(),
            Role::About => self.about(),
            Role::Entry(offset) => self.entry(offset),
        }
    }
}
