// Link resolution
//
// Turns references to entries into same-directory relative URLs. The
// resolver never checks whether the target exists; that is the integrity
// pass's job.

use crate::ngdb::Entry;
use crate::output::naming::Naming;
use tera::Value;

/// Something a link can point at
#[derive(Debug, Clone, Copy)]
pub enum Reference<'a> {
    /// An offset taken verbatim from a menu, line or see-also
    RawOffset(u32),
    /// An entry that has already been looked up
    Entry(&'a Entry),
}

impl Reference<'_> {
    pub fn offset(&self) -> u32 {
        match self {
            Reference::RawOffset(offset) => *offset,
            Reference::Entry(entry) => entry.offset,
        }
    }
}

impl From<u32> for Reference<'_> {
    fn from(offset: u32) -> Self {
        Reference::RawOffset(offset)
    }
}

impl<'a> From<&'a Entry> for Reference<'a> {
    fn from(entry: &'a Entry) -> Self {
        Reference::Entry(entry)
    }
}

/// Resolves references for one guide
#[derive(Debug, Clone)]
pub struct LinkResolver {
    naming: Naming,
}

impl LinkResolver {
    pub fn new(naming: Naming) -> Self {
        Self { naming }
    }

    /// The file name the generator writes for the referenced entry
    pub fn urlify<'a>(&self, reference: impl Into<Reference<'a>>) -> String {
        self.naming.entry(reference.into().offset())
    }
}

/// Pull a target offset out of a template value.
///
/// Numbers are raw offsets; objects (choices, lines, entries) must carry an
/// `offset` field.
pub fn offset_of(value: &Value) -> Option<u32> {
    let number = match value {
        Value::Object(map) => map.get("offset")?,
        other => other,
    };
    number.as_u64().and_then(|n| u32::try_from(n).ok())
}
