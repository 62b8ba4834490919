//! Heading-based section splitting
//!
//! A heading is a line of the form `== Title ==`. The level is the smaller
//! of the two `=` runs (capped at 6); surplus `=` belong to the title, as in
//! MediaWiki. A section's body runs to the next heading of equal or
//! shallower level, so it contains its subsections. Headings inside HTML
//! comments are ignored, and trailing comments after a heading are allowed.

use regex::Regex;

use crate::core::models::Section;
use crate::core::ports::SectionSplitter;

/// Deepest heading level MediaWiki renders
pub const MAX_LEVEL: u8 = 6;

/// Level given to the text before the first heading
pub const LEAD_LEVEL: u8 = 1;

/// Splits wikitext on `=` headings
#[derive(Debug, Clone)]
pub struct HeadingSplitter {
    comment: Regex,
}

impl HeadingSplitter {
    /// Create a splitter
    #[must_use]
    pub fn new() -> Self {
        Self {
            comment: comment_pattern(),
        }
    }

    fn headings(&self, text: &str) -> Vec<Heading> {
        let comments: Vec<(usize, usize)> =
            self.comment.find_iter(text).map(|m| (m.start(), m.end())).collect();
        let in_comment = |pos: usize| comments.iter().any(|&(start, end)| pos >= start && pos < end);

        let mut headings = Vec::new();
        let mut offset = 0;
        for line in text.split_inclusive('\n') {
            let start = offset;
            offset += line.len();
            if in_comment(start) {
                continue;
            }
            let visible = self.comment.replace_all(line, "");
            if let Some((heading, level)) = parse_heading(&visible) {
                headings.push(Heading {
                    heading,
                    level,
                    line_start: start,
                    body_start: offset,
                });
            }
        }
        headings
    }
}

impl Default for HeadingSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionSplitter for HeadingSplitter {
    fn split(&self, text: &str) -> Vec<Section> {
        let headings = self.headings(text);
        let mut sections = Vec::with_capacity(headings.len() + 1);

        let lead_end = headings.first().map_or(text.len(), |h| h.line_start);
        let lead = &text[..lead_end];
        if !lead.trim().is_empty() {
            sections.push(Section::new("", LEAD_LEVEL, lead));
        }

        for (index, heading) in headings.iter().enumerate() {
            let body_end = headings[index + 1..]
                .iter()
                .find(|next| next.level <= heading.level)
                .map_or(text.len(), |next| next.line_start);
            sections.push(Section::new(
                heading.heading.clone(),
                heading.level,
                &text[heading.body_start..body_end],
            ));
        }
        sections
    }
}

#[derive(Debug)]
struct Heading {
    heading: String,
    level: u8,
    line_start: usize,
    body_start: usize,
}

/// # Panics
///
/// Panics if the literal pattern fails to compile (should never happen)
fn comment_pattern() -> Regex {
    // an unterminated comment runs to the end of the text
    Regex::new(r"(?s)<!--.*?(?:-->|\z)").expect("comment pattern is valid")
}

/// Parse `== Title ==` into `("Title", 2)`
fn parse_heading(line: &str) -> Option<(String, u8)> {
    let line = line.trim_end();
    let leading = line.bytes().take_while(|&b| b == b'=').count();
    let trailing = line.bytes().rev().take_while(|&b| b == b'=').count();
    if leading == 0 || leading == line.len() {
        return None;
    }
    let level = leading.min(trailing).min(usize::from(MAX_LEVEL));
    if level == 0 {
        return None;
    }
    let inner = &line[level..line.len() - level];
    let heading = inner.trim();
    if heading.is_empty() {
        return None;
    }
    u8::try_from(level).ok().map(|level| (heading.to_string(), level))
}
