// Shared helpers for building guide files on disk

#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const HEADER_SIZE: usize = 378;

/// Where a link in a built guide points
#[derive(Debug, Clone, Copy)]
pub enum Target {
    /// Another record of the same guide, by position
    Record(usize),
    /// A raw offset, for links to nothing
    Offset(u32),
}

#[derive(Debug, Clone)]
enum Record {
    Menu {
        title: String,
        choices: Vec<(String, Target)>,
    },
    Short {
        lines: Vec<(String, Option<Target>)>,
    },
    Long {
        lines: Vec<String>,
        see_also: Vec<(String, Target)>,
    },
}

impl Record {
    fn size(&self) -> usize {
        match self {
            Record::Menu { title, choices } => {
                6 + 20
                    + choices.len() * 4
                    + (choices.len() + 1) * 8
                    + title.len()
                    + 1
                    + choices.iter().map(|(p, _)| p.len() + 1).sum::<usize>()
                    + 1
            }
            _ => 26 + self.body_size(),
        }
    }

    fn body_size(&self) -> usize {
        match self {
            Record::Menu { .. } => 0,
            Record::Short { lines } => lines.iter().map(|(t, _)| 6 + t.len() + 1).sum(),
            Record::Long { lines, see_also } => {
                let text: usize = lines.iter().map(|t| t.len() + 1).sum();
                if see_also.is_empty() {
                    text
                } else {
                    text + 2 + see_also.iter().map(|(p, _)| 4 + p.len() + 1).sum::<usize>()
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Navigation {
    previous: Option<Target>,
    next: Option<Target>,
    parent: Option<Target>,
}

/// Builds a Norton Guide image byte by byte
#[derive(Debug, Clone)]
pub struct GuideFile {
    magic: [u8; 2],
    title: String,
    credits: Vec<String>,
    records: Vec<(Record, Navigation)>,
}

impl GuideFile {
    pub fn new(title: &str) -> Self {
        Self {
            magic: *b"NG",
            title: title.to_string(),
            credits: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn expert_help(mut self) -> Self {
        self.magic = *b"EH";
        self
    }

    pub fn credit(mut self, line: &str) -> Self {
        self.credits.push(line.to_string());
        self
    }

    pub fn menu(mut self, title: &str, choices: &[(&str, Target)]) -> Self {
        let choices = choices.iter().map(|(p, t)| (p.to_string(), *t)).collect();
        self.records.push((
            Record::Menu {
                title: title.to_string(),
                choices,
            },
            Navigation::default(),
        ));
        self
    }

    pub fn short(mut self, lines: &[(&str, Option<Target>)]) -> Self {
        let lines = lines.iter().map(|(t, o)| (t.to_string(), *o)).collect();
        self.records
            .push((Record::Short { lines }, Navigation::default()));
        self
    }

    pub fn long(mut self, lines: &[&str], see_also: &[(&str, Target)]) -> Self {
        self.records.push((
            Record::Long {
                lines: lines.iter().map(|l| l.to_string()).collect(),
                see_also: see_also.iter().map(|(p, t)| (p.to_string(), *t)).collect(),
            },
            Navigation::default(),
        ));
        self
    }

    /// Set previous and next on the most recently added record
    pub fn navigation(mut self, previous: Option<Target>, next: Option<Target>) -> Self {
        if let Some((_, nav)) = self.records.last_mut() {
            nav.previous = previous;
            nav.next = next;
        }
        self
    }

    /// Set the parent of the most recently added record
    pub fn parent(mut self, parent: Target) -> Self {
        if let Some((_, nav)) = self.records.last_mut() {
            nav.parent = Some(parent);
        }
        self
    }

    /// Offset the record at `index` will have in the written file
    pub fn offset_of(&self, index: usize) -> u32 {
        let before: usize = self.records[..index].iter().map(|(r, _)| r.size()).sum();
        (HEADER_SIZE + before) as u32
    }

    fn resolve(&self, target: Target) -> u32 {
        match target {
            Target::Record(index) => self.offset_of(index),
            Target::Offset(offset) => offset,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes[..2].copy_from_slice(&self.magic);
        let menus = self
            .records
            .iter()
            .filter(|(r, _)| matches!(r, Record::Menu { .. }))
            .count() as u16;
        bytes[6..8].copy_from_slice(&menus.to_le_bytes());
        bytes[8..8 + self.title.len()].copy_from_slice(self.title.as_bytes());
        for (i, credit) in self.credits.iter().take(5).enumerate() {
            let start = 48 + i * 66;
            bytes[start..start + credit.len()].copy_from_slice(credit.as_bytes());
        }

        let mut body = Vec::new();
        for (record, nav) in &self.records {
            self.encode(record, nav, &mut body);
        }
        bytes.extend(body.iter().map(|b| b ^ 0x1A));
        bytes
    }

    fn encode(&self, record: &Record, nav: &Navigation, out: &mut Vec<u8>) {
        let start = out.len();
        match record {
            Record::Menu { title, choices } => {
                out.extend_from_slice(&2u16.to_le_bytes());
                out.extend_from_slice(&0u16.to_le_bytes());
                out.extend_from_slice(&((choices.len() + 1) as u16).to_le_bytes());
                out.extend_from_slice(&[0u8; 20]);
                for (_, target) in choices {
                    out.extend_from_slice(&self.resolve(*target).to_le_bytes());
                }
                out.extend(std::iter::repeat(0u8).take((choices.len() + 1) * 8));
                push_string(out, title);
                for (prompt, _) in choices {
                    push_string(out, prompt);
                }
                out.push(0);
            }
            Record::Short { lines } => {
                self.entry_header(0, record, lines.len(), false, nav, out);
                for (_, target) in lines {
                    out.extend_from_slice(&0u16.to_le_bytes());
                    let offset = target.map(|t| self.resolve(t)).unwrap_or(u32::MAX);
                    out.extend_from_slice(&offset.to_le_bytes());
                }
                for (text, _) in lines {
                    push_string(out, text);
                }
            }
            Record::Long { lines, see_also } => {
                self.entry_header(1, record, lines.len(), !see_also.is_empty(), nav, out);
                for line in lines {
                    push_string(out, line);
                }
                if !see_also.is_empty() {
                    out.extend_from_slice(&(see_also.len() as u16).to_le_bytes());
                    for (_, target) in see_also {
                        out.extend_from_slice(&self.resolve(*target).to_le_bytes());
                    }
                    for (prompt, _) in see_also {
                        push_string(out, prompt);
                    }
                }
            }
        }
        debug_assert_eq!(out.len() - start, record.size());
    }

    fn entry_header(
        &self,
        kind: u16,
        record: &Record,
        lines: usize,
        see_also: bool,
        nav: &Navigation,
        out: &mut Vec<u8>,
    ) {
        let link = |t: Option<Target>| t.map(|t| self.resolve(t)).unwrap_or(u32::MAX);
        out.extend_from_slice(&kind.to_le_bytes());
        out.extend_from_slice(&(record.body_size() as u16).to_le_bytes());
        out.extend_from_slice(&(lines as u16).to_le_bytes());
        out.extend_from_slice(&u16::from(see_also).to_le_bytes());
        out.extend_from_slice(&u16::MAX.to_le_bytes());
        out.extend_from_slice(&link(nav.parent).to_le_bytes());
        out.extend_from_slice(&u16::MAX.to_le_bytes());
        out.extend_from_slice(&u16::MAX.to_le_bytes());
        out.extend_from_slice(&link(nav.previous).to_le_bytes());
        out.extend_from_slice(&link(nav.next).to_le_bytes());
    }

    /// Write the guide into `dir` as `name`
    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.to_bytes()).expect("write guide");
        path
    }
}

fn push_string(out: &mut Vec<u8>, text: &str) {
    out.extend_from_slice(text.as_bytes());
    out.push(0);
}

/// Menu, a short root entry and a long leaf entry with a see-also back
pub fn sample_guide(title: &str) -> GuideFile {
    GuideFile::new(title)
        .credit("Written by ^Bsomeone^B")
        .menu("Main", &[("Root", Target::Record(1))])
        .short(&[
            ("Leaf topic", Some(Target::Record(2))),
            ("not a link", None),
        ])
        .navigation(None, Some(Target::Record(2)))
        .long(&["Leaf text", "x < y"], &[("Back to root", Target::Record(1))])
        .navigation(Some(Target::Record(1)), None)
        .parent(Target::Record(1))
}
