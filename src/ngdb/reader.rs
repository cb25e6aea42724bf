// Binary guide reader
//
// Layout: a 378 byte plain header followed by records that are XORed
// with 0x1A. Record positions are the entry offsets used everywhere else.

use super::charset;
use super::{Choice, Entry, Guide, GuideKind, Line, Menu, Parent};
use crate::error::{Error, Result};
use std::path::Path;

const HEADER_SIZE: usize = 378;
const TITLE_OFFSET: usize = 8;
const TITLE_LENGTH: usize = 40;
const CREDITS_OFFSET: usize = TITLE_OFFSET + TITLE_LENGTH;
const CREDIT_LENGTH: usize = 66;
const CREDIT_LINES: usize = 5;
const MENU_COUNT_OFFSET: usize = 6;

const ENTRY_HEADER_SIZE: usize = 26;
const XOR_KEY: u8 = 0x1A;
const RLE_MARKER: u8 = 0xFF;

const MAX_LINE_LENGTH: usize = 1024;
const MAX_PROMPT_LENGTH: usize = 128;

const RECORD_SHORT: u16 = 0;
const RECORD_LONG: u16 = 1;
const RECORD_MENU: u16 = 2;

/// Read a guide file from disk.
///
/// The file handle is released before this returns; the guide lives
/// entirely in memory.
pub fn open(path: &Path) -> Result<Guide> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::SourceNotFound(path.to_path_buf()),
        _ => Error::source_format(path, format!("cannot read guide: {}", e)),
    })?;
    parse(path, &bytes)
}

/// Parse a complete guide image.
pub fn parse(path: &Path, bytes: &[u8]) -> Result<Guide> {
    if bytes.len() < HEADER_SIZE {
        return Err(Error::source_format(path, "file is too short to be a guide"));
    }

    let kind = GuideKind::from_magic(&bytes[..2])
        .ok_or_else(|| Error::source_format(path, "not a Norton Guide or Expert Help file"))?;

    let menu_count = u16::from_le_bytes([bytes[MENU_COUNT_OFFSET], bytes[MENU_COUNT_OFFSET + 1]]);
    let title = header_string(&bytes[TITLE_OFFSET..TITLE_OFFSET + TITLE_LENGTH]);

    let mut builder = Guide::builder(path).kind(kind).title(title);
    for i in 0..CREDIT_LINES {
        let start = CREDITS_OFFSET + i * CREDIT_LENGTH;
        builder = builder.credit(header_string(&bytes[start..start + CREDIT_LENGTH]));
    }

    let mut data = bytes.to_vec();
    for byte in &mut data[HEADER_SIZE..] {
        *byte ^= XOR_KEY;
    }

    let mut cursor = Cursor {
        data: &data,
        pos: HEADER_SIZE,
        path,
    };

    let mut menus_read = 0u16;
    // A lone trailing byte cannot start a record.
    while cursor.remaining() >= 2 {
        match cursor.peek_word()? {
            RECORD_SHORT | RECORD_LONG => {
                builder = builder.entry(read_entry(&mut cursor)?);
            }
            RECORD_MENU => {
                let menu = read_menu(&mut cursor)?;
                if menus_read < menu_count {
                    builder = builder.menu(menu);
                    menus_read += 1;
                }
            }
            other => {
                return Err(Error::source_format(
                    path,
                    format!("unknown record type {} at offset {}", other, cursor.pos),
                ));
            }
        }
    }

    builder.build()
}

/// Decode a NUL padded header field
fn header_string(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    charset::decode(&field[..end]).trim_end().to_string()
}

/// Treat the "no link" markers as absent
fn link_offset(raw: u32) -> Option<u32> {
    match raw {
        0 | u32::MAX => None,
        offset => Some(offset),
    }
}

fn optional_word(raw: u16) -> Option<u16> {
    (raw != u16::MAX).then_some(raw)
}

fn read_entry(cursor: &mut Cursor<'_>) -> Result<Entry> {
    let start = cursor.pos;
    let offset = cursor.offset()?;
    let kind = cursor.word()?;
    let size = cursor.word()? as usize;
    let line_count = cursor.word()? as usize;
    let has_see_also = cursor.word()? != 0;
    let parent_line = cursor.word()?;
    let parent_offset = cursor.long()?;
    let parent_menu = cursor.word()?;
    let parent_prompt = cursor.word()?;
    let previous = cursor.long()?;
    let next = cursor.long()?;

    let end = start + ENTRY_HEADER_SIZE + size;
    if end > cursor.data.len() {
        return Err(cursor.truncated("entry"));
    }

    let mut entry = if kind == RECORD_SHORT {
        let mut targets = Vec::with_capacity(line_count);
        for _ in 0..line_count {
            cursor.skip(2)?;
            targets.push(link_offset(cursor.long()?));
        }
        let lines = targets
            .into_iter()
            .map(|target| -> Result<Line> {
                let text = cursor.line()?;
                Ok(Line {
                    text,
                    offset: target,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Entry::short(offset, lines)
    } else {
        let lines = (0..line_count)
            .map(|_| cursor.line())
            .collect::<Result<Vec<_>>>()?;
        let see_also = if has_see_also {
            read_see_also(cursor)?
        } else {
            Vec::new()
        };
        Entry::long(offset, lines, see_also)
    };

    let parent = link_offset(parent_offset).map(|offset| Parent {
        offset,
        line: optional_word(parent_line),
        menu: optional_word(parent_menu),
        prompt: optional_word(parent_prompt),
    });
    entry = entry
        .with_parent(parent)
        .with_navigation(link_offset(previous), link_offset(next));

    cursor.seek(end);
    Ok(entry)
}

fn read_see_also(cursor: &mut Cursor<'_>) -> Result<Vec<Choice>> {
    let count = cursor.word()? as usize;
    let offsets = (0..count)
        .map(|_| cursor.long())
        .collect::<Result<Vec<_>>>()?;
    offsets
        .into_iter()
        .map(|offset| -> Result<Choice> {
            Ok(Choice::new(cursor.string(MAX_PROMPT_LENGTH)?, offset))
        })
        .collect()
}

fn read_menu(cursor: &mut Cursor<'_>) -> Result<Menu> {
    cursor.skip(2)?; // record type
    cursor.skip(2)?; // size
    let prompts = (cursor.word()? as usize).saturating_sub(1);
    cursor.skip(20)?;
    let offsets = (0..prompts)
        .map(|_| cursor.long())
        .collect::<Result<Vec<_>>>()?;
    cursor.skip((prompts + 1) * 8)?;
    let title = cursor.string(MAX_PROMPT_LENGTH)?;
    let choices = offsets
        .into_iter()
        .map(|offset| -> Result<Choice> {
            Ok(Choice::new(cursor.string(MAX_PROMPT_LENGTH)?, offset))
        })
        .collect::<Result<Vec<_>>>()?;
    cursor.skip(1)?;
    Ok(Menu::new(title, choices))
}

/// Position in a decrypted guide image
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    path: &'a Path,
}

impl Cursor<'_> {
    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn truncated(&self, what: &str) -> Error {
        Error::source_format(
            self.path,
            format!("truncated {} at offset {}", what, self.pos),
        )
    }

    fn offset(&self) -> Result<u32> {
        u32::try_from(self.pos)
            .map_err(|_| Error::source_format(self.path, "guide is larger than 4GB"))
    }

    fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    fn skip(&mut self, count: usize) -> Result<()> {
        if self.remaining() < count {
            return Err(self.truncated("record"));
        }
        self.pos += count;
        Ok(())
    }

    fn peek_word(&self) -> Result<u16> {
        match self.data.get(self.pos..self.pos + 2) {
            Some(b) => Ok(u16::from_le_bytes([b[0], b[1]])),
            None => Err(self.truncated("record")),
        }
    }

    fn word(&mut self) -> Result<u16> {
        let value = self.peek_word()?;
        self.pos += 2;
        Ok(value)
    }

    fn long(&mut self) -> Result<u32> {
        match self.data.get(self.pos..self.pos + 4) {
            Some(b) => {
                self.pos += 4;
                Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            }
            None => Err(self.truncated("record")),
        }
    }

    /// Read a NUL terminated string of at most `max` bytes
    fn string(&mut self, max: usize) -> Result<String> {
        let raw = self.terminated(max, false)?;
        Ok(charset::decode(raw))
    }

    /// Read a NUL terminated entry line, expanding runs of spaces
    fn line(&mut self) -> Result<String> {
        let raw = self.terminated(MAX_LINE_LENGTH, true)?;
        Ok(charset::decode(&expand_runs(raw)))
    }

    /// Anything past `max` bytes is dropped, but the cursor still moves to
    /// just after the terminating NUL.
    fn terminated(&mut self, max: usize, rle: bool) -> Result<&[u8]> {
        let start = self.pos;
        let mut i = start;
        let mut cut = None;
        loop {
            if cut.is_none() && i - start >= max {
                cut = Some(start + max);
            }
            match self.data.get(i) {
                None => return Err(self.truncated("string")),
                Some(0) => {
                    self.pos = i + 1;
                    return Ok(&self.data[start..cut.unwrap_or(i)]);
                }
                // The count byte after a run marker may be anything, NUL included.
                Some(&RLE_MARKER) if rle => i = (i + 2).min(self.data.len()),
                Some(_) => i += 1,
            }
        }
    }
}

/// Expand `0xFF <count>` pairs into `count` spaces
fn expand_runs(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    let mut bytes = raw.iter();
    while let Some(&b) = bytes.next() {
        if b == RLE_MARKER {
            if let Some(&count) = bytes.next() {
                out.extend(std::iter::repeat(b' ').take(count as usize));
            }
        } else {
            out.push(b);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ngdb::EntryKind;
    use std::path::PathBuf;

    fn header(magic: &[u8; 2], menus: u16, title: &str) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes[..2].copy_from_slice(magic);
        bytes[MENU_COUNT_OFFSET..MENU_COUNT_OFFSET + 2].copy_from_slice(&menus.to_le_bytes());
        bytes[TITLE_OFFSET..TITLE_OFFSET + title.len()].copy_from_slice(title.as_bytes());
        bytes
    }

    fn encrypted(plain: &[u8]) -> Vec<u8> {
        plain.iter().map(|b| b ^ XOR_KEY).collect()
    }

    fn long_entry(lines: &[&[u8]]) -> Vec<u8> {
        let body: Vec<u8> = lines
            .iter()
            .flat_map(|l| l.iter().copied().chain(std::iter::once(0)))
            .collect();
        let mut record = Vec::new();
        record.extend_from_slice(&RECORD_LONG.to_le_bytes());
        record.extend_from_slice(&(body.len() as u16).to_le_bytes());
        record.extend_from_slice(&(lines.len() as u16).to_le_bytes());
        record.extend_from_slice(&0u16.to_le_bytes()); // no see also
        record.extend_from_slice(&u16::MAX.to_le_bytes());
        record.extend_from_slice(&u32::MAX.to_le_bytes());
        record.extend_from_slice(&u16::MAX.to_le_bytes());
        record.extend_from_slice(&u16::MAX.to_le_bytes());
        record.extend_from_slice(&u32::MAX.to_le_bytes());
        record.extend_from_slice(&u32::MAX.to_le_bytes());
        record.extend_from_slice(&body);
        record
    }

    #[test]
    fn test_header_only_guide() {
        let bytes = header(b"NG", 0, "Empty Guide");
        let guide = parse(&PathBuf::from("empty.ng"), &bytes).unwrap();
        assert_eq!(guide.title(), "Empty Guide");
        assert_eq!(guide.kind(), GuideKind::NortonGuide);
        assert_eq!(guide.credits().len(), CREDIT_LINES);
        assert!(guide.is_empty());
    }

    #[test]
    fn test_expert_help_magic() {
        let bytes = header(b"EH", 0, "EH");
        let guide = parse(&PathBuf::from("eh.ng"), &bytes).unwrap();
        assert_eq!(guide.kind(), GuideKind::ExpertHelp);
    }

    #[test]
    fn test_bad_magic() {
        let bytes = header(b"ZZ", 0, "x");
        let err = parse(&PathBuf::from("bad.ng"), &bytes).unwrap_err();
        assert!(matches!(err, Error::SourceFormat { .. }));
    }

    #[test]
    fn test_too_short() {
        let err = parse(&PathBuf::from("tiny.ng"), b"NG").unwrap_err();
        assert!(err.to_string().contains("too short"));
    }

    #[test]
    fn test_long_entry_with_run_length_spaces() {
        let mut bytes = header(b"NG", 0, "RLE");
        bytes.extend(encrypted(&long_entry(&[b"a\xFF\x03b", b"second"])));
        let guide = parse(&PathBuf::from("rle.ng"), &bytes).unwrap();

        let entry = guide.entry(HEADER_SIZE as u32).unwrap();
        assert_eq!(entry.kind, EntryKind::Long);
        assert_eq!(entry.lines[0].text, "a   b");
        assert_eq!(entry.lines[1].text, "second");
        assert!(entry.parent.is_none());
        assert!(entry.previous.is_none());
        assert!(entry.next.is_none());
    }

    fn menu_record(title: &str, choices: &[(&[u8], u32)]) -> Vec<u8> {
        let mut record = Vec::new();
        record.extend_from_slice(&RECORD_MENU.to_le_bytes());
        record.extend_from_slice(&0u16.to_le_bytes());
        record.extend_from_slice(&((choices.len() + 1) as u16).to_le_bytes());
        record.extend_from_slice(&[0u8; 20]);
        for (_, offset) in choices {
            record.extend_from_slice(&offset.to_le_bytes());
        }
        record.extend(std::iter::repeat(0u8).take((choices.len() + 1) * 8));
        record.extend_from_slice(title.as_bytes());
        record.push(0);
        for (prompt, _) in choices {
            record.extend_from_slice(prompt);
            record.push(0);
        }
        record.push(0);
        record
    }

    #[test]
    fn test_over_long_line_keeps_following_lines() {
        let long_line = vec![b'L'; MAX_LINE_LENGTH + 476];
        let mut bytes = header(b"NG", 0, "Long");
        bytes.extend(encrypted(&long_entry(&[long_line.as_slice(), b"next"])));
        let guide = parse(&PathBuf::from("long.ng"), &bytes).unwrap();

        let entry = guide.first_entry().unwrap();
        assert_eq!(entry.lines.len(), 2);
        assert_eq!(entry.lines[0].text.len(), MAX_LINE_LENGTH);
        assert_eq!(entry.lines[1].text, "next");
    }

    #[test]
    fn test_over_long_menu_prompt_keeps_records_aligned() {
        let prompt = vec![b'P'; MAX_PROMPT_LENGTH + 72];
        // Record length does not depend on the offsets it holds.
        let prompt = prompt.as_slice();
        let second: &[u8] = b"Second";
        let entry_offset =
            (HEADER_SIZE + menu_record("Main", &[(prompt, 0), (second, 0)]).len()) as u32;
        let menu = menu_record("Main", &[(prompt, entry_offset), (second, entry_offset)]);

        let mut bytes = header(b"NG", 1, "Menus");
        bytes.extend(encrypted(&menu));
        bytes.extend(encrypted(&long_entry(&[b"after the menu"])));

        let guide = parse(&PathBuf::from("menus.ng"), &bytes).unwrap();
        let choices = &guide.menus()[0].choices;
        assert_eq!(choices[0].prompt.len(), MAX_PROMPT_LENGTH);
        assert_eq!(choices[1].prompt, "Second");
        let entry = guide.entry(entry_offset).unwrap();
        assert_eq!(entry.lines[0].text, "after the menu");
    }

    #[test]
    fn test_run_with_zero_count_does_not_end_line() {
        let mut bytes = header(b"NG", 0, "RLE");
        bytes.extend(encrypted(&long_entry(&[b"x\xFF\x00y"])));
        let guide = parse(&PathBuf::from("rle.ng"), &bytes).unwrap();
        let entry = guide.first_entry().unwrap();
        assert_eq!(entry.lines[0].text, "xy");
    }

    #[test]
    fn test_unknown_record_type() {
        let mut bytes = header(b"NG", 0, "Bad");
        bytes.extend(encrypted(&[7, 0, 0, 0]));
        let err = parse(&PathBuf::from("bad.ng"), &bytes).unwrap_err();
        assert!(err.to_string().contains("unknown record type 7"));
    }

    #[test]
    fn test_truncated_entry() {
        let mut bytes = header(b"NG", 0, "Cut");
        let record = long_entry(&[b"some text"]);
        bytes.extend(encrypted(&record[..record.len() - 3]));
        let err = parse(&PathBuf::from("cut.ng"), &bytes).unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn test_expand_runs() {
        assert_eq!(expand_runs(b"\xFF\x02x"), b"  x".to_vec());
        assert_eq!(expand_runs(b"x\xFF"), b"x".to_vec());
    }

    #[test]
    fn test_link_offset_markers() {
        assert_eq!(link_offset(0), None);
        assert_eq!(link_offset(u32::MAX), None);
        assert_eq!(link_offset(400), Some(400));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = open(Path::new("/definitely/not/here.ng")).unwrap_err();
        assert!(matches!(err, Error::SourceNotFound(_)));
    }
}
