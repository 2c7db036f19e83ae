//! Data model for parsed test headers and generated group pages.

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// One of the four header sections, in the order they must appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Description,
    Input,
    Output,
    Requirements,
}

impl Section {
    /// Required marker order.
    pub const ORDER: [Section; 4] = [
        Section::Description,
        Section::Input,
        Section::Output,
        Section::Requirements,
    ];

    /// Match a marker name case-insensitively.
    pub fn from_marker(name: &str) -> Option<Section> {
        match name.to_ascii_lowercase().as_str() {
            "description" => Some(Section::Description),
            "input" => Some(Section::Input),
            "output" => Some(Section::Output),
            "requirements" => Some(Section::Requirements),
            _ => None,
        }
    }

    /// Lowercase marker name as written in headers.
    pub fn marker(self) -> &'static str {
        match self {
            Section::Description => "description",
            Section::Input => "input",
            Section::Output => "output",
            Section::Requirements => "requirements",
        }
    }

    /// Capitalized field label used in generated documents.
    pub fn label(self) -> &'static str {
        match self {
            Section::Description => "Description",
            Section::Input => "Input",
            Section::Output => "Output",
            Section::Requirements => "Requirements",
        }
    }
}

/// Header-level content state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    /// All markers present; individual fields may still be empty.
    Complete,
    /// All markers present and not a single content line under any of them.
    PlaceholderAllEmpty,
}

/// 1-based line numbers of the section markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLines {
    pub description: usize,
    pub input: usize,
    pub output: usize,
    pub requirements: usize,
}

impl SectionLines {
    pub fn get(&self, section: Section) -> usize {
        match section {
            Section::Description => self.description,
            Section::Input => self.input,
            Section::Output => self.output,
            Section::Requirements => self.requirements,
        }
    }
}

/// Validated header of a single `.tsc` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHeader {
    pub description: String,
    pub input_text: String,
    pub output_text: String,
    /// Deduplicated, ascending.
    pub requirement_tags: BTreeSet<String>,
    pub kind: HeaderKind,
    pub lines: SectionLines,
}

impl ParsedHeader {
    pub fn is_placeholder(&self) -> bool {
        self.kind == HeaderKind::PlaceholderAllEmpty
    }

    /// Text of a free-text section. Requirements are exposed as tags instead.
    pub fn text(&self, section: Section) -> &str {
        match section {
            Section::Description => &self.description,
            Section::Input => &self.input_text,
            Section::Output => &self.output_text,
            Section::Requirements => "",
        }
    }

    pub fn presence(&self) -> FieldPresence {
        FieldPresence {
            description: !self.description.is_empty(),
            input: !self.input_text.is_empty(),
            output: !self.output_text.is_empty(),
            requirements: !self.requirement_tags.is_empty(),
        }
    }
}

/// Per-field content flags consulted by the writer's missing-content policy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FieldPresence {
    pub description: bool,
    pub input: bool,
    pub output: bool,
    pub requirements: bool,
}

impl FieldPresence {
    pub fn has(&self, section: Section) -> bool {
        match section {
            Section::Description => self.description,
            Section::Input => self.input,
            Section::Output => self.output,
            Section::Requirements => self.requirements,
        }
    }
}

/// A parsed input file.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    pub header: ParsedHeader,
}

impl FileRecord {
    /// Full file name, e.g. `Bogus_Validate_Config.tsc`.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// File stem, used as the anchor step name.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_name())
    }
}

// -- Field data handed to renderers ------------------------------------------

/// Everything a renderer needs to produce one group document.
#[derive(Debug, Clone, Serialize)]
pub struct GroupPage {
    pub title: String,
    pub underline: String,
    pub component: String,
    /// Group token as found in filenames, e.g. `Compile`.
    pub group: String,
    /// Display name after mapping, e.g. `Compiler`.
    pub display_name: String,
    /// Section name, also the document stem.
    pub section: String,
    pub short_description: String,
    /// Aggregated tag summary, already wrapped.
    pub tests_summary: String,
    pub steps: Vec<RecordStep>,
}

/// Anchor step for one input file plus its numeric sub-steps.
#[derive(Debug, Clone, Serialize)]
pub struct RecordStep {
    pub name: String,
    pub id: String,
    pub sub_steps: Vec<SubStep>,
}

/// One chunk of up to seven requirement tags.
#[derive(Debug, Clone, Serialize)]
pub struct SubStep {
    pub number: usize,
    pub id: String,
    pub tests_line: String,
    pub description_lines: Vec<String>,
    /// Empty for every sub-step but the first.
    pub input_lines: Vec<String>,
    /// Empty for every sub-step but the first.
    pub output_lines: Vec<String>,
}
