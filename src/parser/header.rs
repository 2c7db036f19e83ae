//! `.tsc` header parser — line-by-line state machine.
//!
//! A header is the leading `//` comment block of a test file. It holds four
//! marker lines (`Description`, `Input`, `Output`, `Requirements`, in that
//! order, case-insensitive) with free text under each:
//!
//! ```text
//! // Description
//! // Checks that the generated sources compile.
//! // Input
//! // Default configuration.
//! // Output
//! // No compiler errors.
//! // Requirements
//! // REQ-1, REQ-2
//!
//! test body...
//! ```

use crate::model::{HeaderKind, ParsedHeader, Section, SectionLines};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use thiserror::Error;

// -- Regex patterns -----------------------------------------------------------

static RE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(description|input|output|requirements)\s*$").unwrap()
});

static RE_TAG_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,\s]+").unwrap());

// -- Errors -------------------------------------------------------------------

/// Structural header problems. Each one excludes the file from generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("Header missing")]
    MissingHeader,

    #[error("Header must start with 'Description'")]
    MissingDescription { line: usize },

    #[error("Unexpected or out-of-order section '{}'", .section.marker())]
    OutOfOrder { line: usize, section: Section },

    #[error("Missing header section(s): {}", join_labels(.missing))]
    MissingSections { missing: Vec<Section> },
}

impl HeaderError {
    /// 1-based line the error is reported at.
    pub fn line(&self) -> usize {
        match self {
            HeaderError::MissingDescription { line } | HeaderError::OutOfOrder { line, .. } => {
                *line
            }
            HeaderError::MissingHeader | HeaderError::MissingSections { .. } => 1,
        }
    }
}

fn join_labels(sections: &[Section]) -> String {
    sections
        .iter()
        .map(|s| s.label())
        .collect::<Vec<_>>()
        .join(", ")
}

// -- Parser state -------------------------------------------------------------

#[derive(Default)]
struct ParserState {
    /// Number of markers accepted so far; indexes `Section::ORDER`.
    order_index: usize,
    current: Option<Section>,
    /// Content lines per section, in `Section::ORDER` order.
    content: [Vec<String>; 4],
    /// Marker line per section, in `Section::ORDER` order.
    marker_lines: [Option<usize>; 4],
}

enum Step {
    Continue,
    Stop,
}

// -- Public API ---------------------------------------------------------------

/// Parse the leading comment header of a `.tsc` file.
pub fn parse(input: &str) -> Result<ParsedHeader, HeaderError> {
    let mut state = ParserState::default();

    for (idx, line) in input.lines().enumerate() {
        match process_line(&mut state, line, idx + 1)? {
            Step::Continue => {}
            Step::Stop => break,
        }
    }

    finish(state)
}

// -- Line processing ----------------------------------------------------------

fn process_line(s: &mut ParserState, line: &str, line_no: usize) -> Result<Step, HeaderError> {
    if line.trim().is_empty() {
        // Leading blank lines are skipped; once a marker is seen a blank ends the header.
        return Ok(if s.order_index > 0 {
            Step::Stop
        } else {
            Step::Continue
        });
    }

    let Some(content) = strip_comment_prefix(line) else {
        if s.order_index == 0 {
            return Err(HeaderError::MissingHeader);
        }
        return Ok(Step::Stop);
    };

    if let Some(caps) = RE_MARKER.captures(content) {
        // RE_MARKER only matches the four names.
        let Some(section) = Section::from_marker(&caps[1]) else {
            return Ok(Step::Continue);
        };
        if Section::ORDER.get(s.order_index) != Some(&section) {
            return Err(HeaderError::OutOfOrder {
                line: line_no,
                section,
            });
        }
        s.marker_lines[s.order_index] = Some(line_no);
        s.current = Some(section);
        s.order_index += 1;
        return Ok(Step::Continue);
    }

    let Some(current) = s.current else {
        return Err(HeaderError::MissingDescription { line: line_no });
    };
    s.content[slot(current)].push(content.trim_end().to_string());
    Ok(Step::Continue)
}

/// Strip leading whitespace, `//`, and at most one following space.
/// Returns `None` for lines that are not comments.
fn strip_comment_prefix(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix("//")?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

fn slot(section: Section) -> usize {
    Section::ORDER
        .iter()
        .position(|s| *s == section)
        .unwrap_or_default()
}

fn finish(s: ParserState) -> Result<ParsedHeader, HeaderError> {
    let missing: Vec<Section> = Section::ORDER
        .iter()
        .zip(s.marker_lines.iter())
        .filter(|(_, line)| line.is_none())
        .map(|(section, _)| *section)
        .collect();
    if !missing.is_empty() {
        return Err(HeaderError::MissingSections { missing });
    }

    let kind = if s.content.iter().all(|lines| lines.is_empty()) {
        HeaderKind::PlaceholderAllEmpty
    } else {
        HeaderKind::Complete
    };

    let line_of = |section: Section| s.marker_lines[slot(section)].unwrap_or(1);
    let lines = SectionLines {
        description: line_of(Section::Description),
        input: line_of(Section::Input),
        output: line_of(Section::Output),
        requirements: line_of(Section::Requirements),
    };

    let text_of = |section: Section| s.content[slot(section)].join("\n").trim().to_string();

    Ok(ParsedHeader {
        description: text_of(Section::Description),
        input_text: text_of(Section::Input),
        output_text: text_of(Section::Output),
        requirement_tags: split_tags(&s.content[slot(Section::Requirements)]),
        kind,
        lines,
    })
}

/// Split requirement lines on commas and whitespace into a sorted set.
pub fn split_tags(lines: &[String]) -> BTreeSet<String> {
    lines
        .iter()
        .flat_map(|line| RE_TAG_SEPARATOR.split(line))
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
