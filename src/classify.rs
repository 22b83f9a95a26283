//! Per-file line classification.
//!
//! Each line is matched against the language's markers after trimming, anchored at
//! the start of the line. Trailing comments after code and markers in the middle of
//! a line are not detected, and block comments do not nest: the first close
//! delimiter ends the block.

use std::fs;
use std::ops::AddAssign;
use std::path::Path;

use crate::error::SkipReason;
use crate::language::LanguageSyntax;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FileStats {
    pub total: u64,
    pub empty: u64,
    pub comment: u64,
    pub code: u64,
}

impl FileStats {
    /// Every counted line lands in exactly one bucket, except region tag lines
    /// which are only part of `total`.
    pub fn classified(&self) -> u64 {
        self.empty + self.comment + self.code
    }
}

impl AddAssign for FileStats {
    fn add_assign(&mut self, rhs: Self) {
        self.total += rhs.total;
        self.empty += rhs.empty;
        self.comment += rhs.comment;
        self.code += rhs.code;
    }
}

/// State carried from one line to the next within a single file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ClassifierState {
    in_block_comment: bool,
    /// Bit `i` is set while inside region `i` of `region_tags`.
    /// Tracked but not consulted when classifying other lines.
    regions: u32,
}

enum RegionEdge {
    Open(usize),
    Close(usize),
}

fn match_region_tag(syntax: &LanguageSyntax, stripped: &str) -> Option<RegionEdge> {
    syntax
        .region_tags
        .iter()
        .enumerate()
        .find_map(|(idx, tag)| {
            if stripped.starts_with(tag.open) {
                Some(RegionEdge::Open(idx))
            } else if stripped.starts_with(tag.close) {
                Some(RegionEdge::Close(idx))
            } else {
                None
            }
        })
}

fn step(
    syntax: &LanguageSyntax,
    (mut state, mut stats): (ClassifierState, FileStats),
    line: &str,
) -> (ClassifierState, FileStats) {
    stats.total += 1;
    let stripped = line.trim();

    match match_region_tag(syntax, stripped) {
        Some(RegionEdge::Open(idx)) => {
            state.regions |= 1 << idx;
            return (state, stats);
        }
        Some(RegionEdge::Close(idx)) => {
            state.regions &= !(1 << idx);
            return (state, stats);
        }
        None => {}
    }

    if state.in_block_comment {
        stats.comment += 1;
        if let Some(block) = syntax.block_comment {
            if stripped.contains(block.close) {
                state.in_block_comment = false;
            }
        }
        return (state, stats);
    }

    if let Some(block) = syntax.block_comment {
        if stripped.starts_with(block.open) {
            stats.comment += 1;
            state.in_block_comment = !stripped.contains(block.close);
            return (state, stats);
        }
    }

    if syntax
        .single_line
        .iter()
        .any(|marker| stripped.starts_with(marker))
    {
        stats.comment += 1;
    } else if stripped.is_empty() {
        stats.empty += 1;
    } else {
        stats.code += 1;
    }
    (state, stats)
}

/// Classify every line of one file in a single forward pass.
///
/// An unterminated block comment is not an error; every line after the opening
/// delimiter is counted as a comment.
pub fn classify<I, S>(lines: I, syntax: &LanguageSyntax) -> FileStats
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    debug_assert!(syntax.region_tags.len() <= u32::BITS as usize);
    let (_, stats) = lines.into_iter().fold(
        (ClassifierState::default(), FileStats::default()),
        |acc, line| step(syntax, acc, line.as_ref()),
    );
    debug_assert!(stats.classified() <= stats.total);
    stats
}

/// Split text on `\r\n`, `\r` or `\n`. A final line ending does not start an
/// extra empty line.
fn split_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let normalized = text.replace("\r\n", "\n");
    let body = normalized
        .strip_suffix(['\n', '\r'])
        .unwrap_or(normalized.as_str());
    body.split(['\r', '\n']).map(str::to_owned).collect()
}

/// Read a file as UTF-8 text and split it into lines.
pub fn read_lines(path: &Path) -> Result<Vec<String>, SkipReason> {
    let bytes = fs::read(path).map_err(|source| SkipReason::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|_| SkipReason::Undecodable {
        path: path.to_path_buf(),
    })?;
    Ok(split_lines(&text))
}
