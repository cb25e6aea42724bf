// Output path resolution
//
// Pure path arithmetic: nothing here creates or writes anything, so an
// output root that does not exist yet still resolves.

use crate::output::naming::{Naming, Role};
use std::path::{Component, Path, PathBuf};

/// Expand a leading `~` to the user's home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(raw) => PathBuf::from(shellexpand::tilde(raw).into_owned()),
        None => path.to_path_buf(),
    }
}

/// Make `path` absolute and canonical.
///
/// The longest existing prefix is canonicalized (following symlinks); the
/// components below it are normalized lexically.
pub fn canonicalize_lenient(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let components: Vec<Component<'_>> = absolute.components().collect();

    for split in (1..=components.len()).rev() {
        let head: PathBuf = components[..split].iter().collect();
        if let Ok(mut resolved) = head.canonicalize() {
            for component in &components[split..] {
                match component {
                    Component::CurDir => {}
                    Component::ParentDir => {
                        resolved.pop();
                    }
                    other => resolved.push(other.as_os_str()),
                }
            }
            return resolved;
        }
    }

    absolute
}

/// Resolve a user supplied output root
pub fn resolve_root(root: &Path) -> PathBuf {
    canonicalize_lenient(&expand_home(root))
}

/// Join a generated file name onto a resolved root
pub fn resolve(root: &Path, file_name: &str) -> PathBuf {
    debug_assert!(
        !file_name.contains(std::path::MAIN_SEPARATOR) && !file_name.contains('/'),
        "output file names are flat: {file_name}"
    );
    root.join(file_name)
}

/// A generated file and the role it plays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub role: Role,
    pub path: PathBuf,
}

/// Computes every output path for one guide
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    naming: Naming,
}

impl PathResolver {
    /// `root` is resolved once here; later calls are plain joins
    pub fn new(root: &Path, naming: Naming) -> Self {
        Self {
            root: resolve_root(root),
            naming,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn target(&self, role: Role) -> OutputTarget {
        OutputTarget {
            role,
            path: resolve(&self.root, &self.naming.file_name(role)),
        }
    }

    pub fn stylesheet(&self) -> OutputTarget {
        self.target(Role::Stylesheet)
    }

    pub fn about(&self) -> OutputTarget {
        self.target(Role::About)
    }

    pub fn entry(&self, offset: u32) -> OutputTarget {
        self.target(Role::Entry(offset))
    }
}
