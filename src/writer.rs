//! Group document assembly: step IDs, TODO substitution and file output.

use crate::diagnostics::Diagnostics;
use crate::format::{chunk_tags, format_multiline_field, format_tag_list};
use crate::group::aggregate_tags;
use crate::model::*;
use crate::render::Renderer;
use crate::toc::generated_prefix;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Wrap width for `:tests:` values.
const TESTS_WIDTH: usize = 120;
/// Continuation indent of the group-level `:tests:` value (`   :tests: `).
const GROUP_TESTS_INDENT: usize = 11;
/// Continuation indent of a step's `:tests:` value (`      :tests: `).
const STEP_TESTS_INDENT: usize = 14;
/// Indent of Description/Input/Output lines inside a step.
const FIELD_INDENT: usize = 6;
/// Minimum title underline length.
const TITLE_RULE_WIDTH: usize = 120;

/// Section name of a group document, also its file stem.
pub fn section_name(component: &str, display_name: &str) -> String {
    format!("{}{}_Tests", generated_prefix(component), display_name)
}

/// Hands out sequential 4-digit step numbers within one group.
struct IdSequence<'a> {
    section: &'a str,
    next: usize,
}

impl<'a> IdSequence<'a> {
    fn new(section: &'a str) -> Self {
        Self { section, next: 1 }
    }

    fn next_id(&mut self) -> String {
        let id = format!("TSS_{}_{:04}", self.section, self.next);
        self.next += 1;
        id
    }
}

/// Build the field data for one group. Missing content is reported to `diags`.
pub fn build_page(
    component: &str,
    group: &str,
    display_name: &str,
    records: &[FileRecord],
    diags: &mut Diagnostics,
) -> GroupPage {
    let title = format!("{display_name} Test Specification");
    let section = section_name(component, display_name);

    let all_tags: Vec<String> = aggregate_tags(records).into_iter().collect();
    let tests_summary = format_tag_list(&all_tags, " ", TESTS_WIDTH, GROUP_TESTS_INDENT);

    let mut ids = IdSequence::new(&section);
    let steps = records
        .iter()
        .map(|record| build_step(record, &mut ids, &mut *diags))
        .collect();

    GroupPage {
        underline: "=".repeat(title.chars().count().max(TITLE_RULE_WIDTH)),
        title,
        component: component.to_string(),
        group: group.to_string(),
        display_name: display_name.to_string(),
        short_description: format!("Tests for successful {group} of {component}"),
        section,
        tests_summary,
        steps,
    }
}

fn build_step(record: &FileRecord, ids: &mut IdSequence<'_>, diags: &mut Diagnostics) -> RecordStep {
    let header = &record.header;
    let file_name = record.file_name();
    let id = ids.next_id();

    let presence = report_missing_content(record, diags);

    let field = |section: Section| -> Vec<String> {
        let text = if presence.has(section) {
            header.text(section).to_string()
        } else {
            todo_text(section, &file_name)
        };
        format_multiline_field(section.label(), &text, FIELD_INDENT)
    };
    let description_lines = field(Section::Description);
    let input_lines = field(Section::Input);
    let output_lines = field(Section::Output);

    let tags: Vec<String> = header.requirement_tags.iter().cloned().collect();
    let sub_steps = chunk_tags(&tags)
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| {
            let tests = if presence.requirements {
                format_tag_list(chunk, " ", TESTS_WIDTH, STEP_TESTS_INDENT)
            } else {
                todo_text(Section::Requirements, &file_name)
            };
            let first = i == 0;
            SubStep {
                number: i + 1,
                id: ids.next_id(),
                tests_line: format!("{}:tests: {}", " ".repeat(FIELD_INDENT), tests),
                description_lines: description_lines.clone(),
                input_lines: if first { input_lines.clone() } else { Vec::new() },
                output_lines: if first { output_lines.clone() } else { Vec::new() },
            }
        })
        .collect();

    RecordStep {
        name: record.stem(),
        id,
        sub_steps,
    }
}

/// Warn once per empty section, at that section's marker line.
///
/// Returns which fields have content; the rest are rendered as TODOs.
pub fn report_missing_content(record: &FileRecord, diags: &mut Diagnostics) -> FieldPresence {
    let header = &record.header;
    if header.is_placeholder() {
        debug!(path = %record.path.display(), "placeholder header");
    }
    let presence = header.presence();
    for section in Section::ORDER {
        if !presence.has(section) {
            diags.warning(
                &record.path,
                header.lines.get(section),
                format!(
                    "Missing {} content; emitting TODO in test specification rst file",
                    section.label()
                ),
            );
        }
    }
    presence
}

fn todo_text(section: Section, file_name: &str) -> String {
    format!(
        "TODO:Update the {} field in the header of {}",
        section.label(),
        file_name
    )
}

/// Render and write one group document into `dir`.
pub fn write_page(dir: &Path, page: &GroupPage, renderer: &dyn Renderer) -> Result<PathBuf> {
    let out_path = dir.join(format!("{}.{}", page.section, renderer.file_extension()));
    let content = renderer.render(page)?;
    fs::write(&out_path, content)
        .with_context(|| format!("failed to write group document: {}", out_path.display()))?;
    info!(path = %out_path.display(), "generated group document");
    Ok(out_path)
}
