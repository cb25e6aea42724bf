// Link integrity analysis
//
// Builds the entry link graph for a guide, records links whose target is
// not an entry, and finds entries nothing leads to. None of this is fatal.

use crate::ngdb::Guide;
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Dfs;
use serde::Serialize;
use std::fmt;

/// How one entry refers to another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Menu,
    Line,
    SeeAlso,
    Previous,
    Next,
    Parent,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LinkKind::Menu => "menu",
            LinkKind::Line => "line",
            LinkKind::SeeAlso => "see also",
            LinkKind::Previous => "previous",
            LinkKind::Next => "next",
            LinkKind::Parent => "parent",
        };
        f.write_str(name)
    }
}

/// A link whose target offset is not an entry in the guide
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    /// Entry holding the link; `None` for guide menus
    pub source: Option<u32>,
    pub target: u32,
    pub kind: LinkKind,
    pub prompt: Option<String>,
}

impl fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            Some(source) => write!(f, "entry {}", source)?,
            None => write!(f, "guide menu")?,
        }
        write!(f, " has a {} link to missing entry {}", self.kind, self.target)?;
        if let Some(prompt) = &self.prompt {
            write!(f, " ({})", crate::ngdb::markup::to_plain(prompt))?;
        }
        Ok(())
    }
}

/// Outcome of the integrity pass
#[derive(Debug, Default)]
pub struct IntegrityReport {
    pub dangling: Vec<DanglingReference>,
    /// Entries not reachable from the menus or the first entry, in guide order
    pub unreachable: Vec<u32>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty() && self.unreachable.is_empty()
    }
}

/// Every link that leaves an entry, in display order
fn entry_links(entry: &crate::ngdb::Entry) -> Vec<(LinkKind, u32, Option<&str>)> {
    let mut links = Vec::new();
    for line in &entry.lines {
        if let Some(target) = line.offset {
            links.push((LinkKind::Line, target, Some(line.text.as_str())));
        }
    }
    for choice in &entry.see_also {
        links.push((LinkKind::SeeAlso, choice.offset, Some(choice.prompt.as_str())));
    }
    if let Some(parent) = &entry.parent {
        links.push((LinkKind::Parent, parent.offset, None));
    }
    if let Some(previous) = entry.previous {
        links.push((LinkKind::Previous, previous, None));
    }
    if let Some(next) = entry.next {
        links.push((LinkKind::Next, next, None));
    }
    links
}

/// Check every link in the guide
pub fn check(guide: &Guide) -> IntegrityReport {
    let mut graph: DiGraphMap<u32, LinkKind> = DiGraphMap::new();
    let mut dangling = Vec::new();

    for entry in guide.entries() {
        graph.add_node(entry.offset);
    }

    let mut roots = Vec::new();
    for menu in guide.menus() {
        for choice in &menu.choices {
            if guide.contains(choice.offset) {
                roots.push(choice.offset);
            } else {
                dangling.push(DanglingReference {
                    source: None,
                    target: choice.offset,
                    kind: LinkKind::Menu,
                    prompt: Some(choice.prompt.clone()),
                });
            }
        }
    }
    if let Some(first) = guide.first_entry() {
        roots.push(first.offset);
    }

    for entry in guide.entries() {
        for (kind, target, prompt) in entry_links(entry) {
            if guide.contains(target) {
                graph.add_edge(entry.offset, target, kind);
            } else {
                dangling.push(DanglingReference {
                    source: Some(entry.offset),
                    target,
                    kind,
                    prompt: prompt.map(str::to_string),
                });
            }
        }
    }

    let mut reached = std::collections::HashSet::new();
    for root in roots {
        if reached.contains(&root) {
            continue;
        }
        let mut dfs = Dfs::new(&graph, root);
        while let Some(offset) = dfs.next(&graph) {
            reached.insert(offset);
        }
    }

    let unreachable = guide
        .entries()
        .iter()
        .map(|entry| entry.offset)
        .filter(|offset| !reached.contains(offset))
        .collect();

    IntegrityReport {
        dangling,
        unreachable,
    }
}
