// Norton Guide database model
//
// A guide is read once into memory. Entries, menus and choices are plain
// read-only values; nothing here is mutated after the guide is built.

pub mod charset;
pub mod markup;
pub mod reader;

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Which flavour of help database a file is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum GuideKind {
    #[default]
    #[serde(rename = "Norton Guide")]
    NortonGuide,
    #[serde(rename = "Expert Help")]
    ExpertHelp,
}

impl GuideKind {
    /// Detect the kind from the two magic bytes at the start of a file
    pub fn from_magic(magic: &[u8]) -> Option<Self> {
        match magic {
            b"NG" => Some(GuideKind::NortonGuide),
            b"EH" => Some(GuideKind::ExpertHelp),
            _ => None,
        }
    }
}

impl std::fmt::Display for GuideKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GuideKind::NortonGuide => write!(f, "Norton Guide"),
            GuideKind::ExpertHelp => write!(f, "Expert Help"),
        }
    }
}

/// A labelled reference to another entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    /// Label as stored in the guide, markup included
    pub prompt: String,
    /// Offset of the target entry
    pub offset: u32,
}

impl Choice {
    pub fn new(prompt: impl Into<String>, offset: u32) -> Self {
        Self {
            prompt: prompt.into(),
            offset,
        }
    }
}

/// A guide-level menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Menu {
    pub title: String,
    pub choices: Vec<Choice>,
}

impl Menu {
    pub fn new(title: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            title: title.into(),
            choices,
        }
    }
}

/// Short entries are lists of links; long entries are free text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Short,
    Long,
}

/// One line of entry text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    /// Raw text, markup included
    pub text: String,
    /// Entry this line links to (short entries only)
    pub offset: Option<u32>,
}

impl Line {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            offset: None,
        }
    }

    pub fn link(text: impl Into<String>, offset: u32) -> Self {
        Self {
            text: text.into(),
            offset: Some(offset),
        }
    }
}

/// Where an entry was reached from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Parent {
    pub offset: u32,
    pub line: Option<u16>,
    pub menu: Option<u16>,
    pub prompt: Option<u16>,
}

/// One addressable unit of guide content, keyed by its physical offset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub offset: u32,
    pub kind: EntryKind,
    pub lines: Vec<Line>,
    /// Linked lines of a short entry, in order
    pub menu: Vec<Choice>,
    pub see_also: Vec<Choice>,
    pub parent: Option<Parent>,
    pub previous: Option<u32>,
    pub next: Option<u32>,
}

impl Entry {
    /// A short entry; every line that carries an offset becomes a menu choice
    pub fn short(offset: u32, lines: Vec<Line>) -> Self {
        let menu = lines
            .iter()
            .filter_map(|line| line.offset.map(|target| Choice::new(line.text.clone(), target)))
            .collect();
        Self {
            offset,
            kind: EntryKind::Short,
            lines,
            menu,
            see_also: Vec::new(),
            parent: None,
            previous: None,
            next: None,
        }
    }

    /// A long entry with an optional see-also list
    pub fn long<S: Into<String>>(offset: u32, lines: Vec<S>, see_also: Vec<Choice>) -> Self {
        Self {
            offset,
            kind: EntryKind::Long,
            lines: lines.into_iter().map(Line::text).collect(),
            menu: Vec::new(),
            see_also,
            parent: None,
            previous: None,
            next: None,
        }
    }

    pub fn with_navigation(mut self, previous: Option<u32>, next: Option<u32>) -> Self {
        self.previous = previous;
        self.next = next;
        self
    }

    pub fn with_parent(mut self, parent: Option<Parent>) -> Self {
        self.parent = parent;
        self
    }
}

/// An opened guide
#[derive(Debug, Clone)]
pub struct Guide {
    path: PathBuf,
    kind: GuideKind,
    title: String,
    credits: Vec<String>,
    menus: Vec<Menu>,
    entries: Vec<Entry>,
    index: HashMap<u32, usize>,
}

impl Guide {
    /// Open and read a guide from disk
    pub fn open(path: &Path) -> Result<Self> {
        reader::open(path)
    }

    /// Start building a guide in memory
    pub fn builder(path: impl Into<PathBuf>) -> GuideBuilder {
        GuideBuilder::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> GuideKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn credits(&self) -> &[String] {
        &self.credits
    }

    pub fn menus(&self) -> &[Menu] {
        &self.menus
    }

    /// Entries in physical file order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry(&self, offset: u32) -> Option<&Entry> {
        self.index.get(&offset).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, offset: u32) -> bool {
        self.index.contains_key(&offset)
    }

    pub fn first_entry(&self) -> Option<&Entry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Assembles a [`Guide`], enforcing unique entry offsets
#[derive(Debug, Default)]
pub struct GuideBuilder {
    path: PathBuf,
    kind: GuideKind,
    title: String,
    credits: Vec<String>,
    menus: Vec<Menu>,
    entries: Vec<Entry>,
}

impl GuideBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn kind(mut self, kind: GuideKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn credit(mut self, line: impl Into<String>) -> Self {
        self.credits.push(line.into());
        self
    }

    pub fn menu(mut self, menu: Menu) -> Self {
        self.menus.push(menu);
        self
    }

    pub fn entry(mut self, entry: Entry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn build(self) -> Result<Guide> {
        let mut index = HashMap::with_capacity(self.entries.len());
        for (i, entry) in self.entries.iter().enumerate() {
            if index.insert(entry.offset, i).is_some() {
                return Err(Error::InvalidGuide(format!(
                    "{}: more than one entry at offset {}",
                    self.path.display(),
                    entry.offset
                )));
            }
        }

        Ok(Guide {
            path: self.path,
            kind: self.kind,
            title: self.title,
            credits: self.credits,
            menus: self.menus,
            entries: self.entries,
            index,
        })
    }
}
