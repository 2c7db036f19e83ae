//! reStructuredText renderer for `sw_test` / `sw_test_step` directives.

use crate::model::*;
use crate::render::Renderer;
use anyhow::Result;

pub struct RstRenderer;

impl Renderer for RstRenderer {
    fn render(&self, page: &GroupPage) -> Result<String> {
        let mut lines: Vec<String> = Vec::new();

        lines.push(page.title.clone());
        lines.push(page.underline.clone());
        lines.push(String::new());
        lines.push(page.section.clone());
        lines.push("-".repeat(page.section.chars().count()));
        lines.push(String::new());

        // Group-level test block
        lines.push(format!(".. sw_test:: {}", page.section));
        lines.push(format!("   :id: TS_{}", page.section));
        lines.push(format!("   :tst_shortdescription: {}", page.short_description));
        lines.push(format!("   :tests: {}", page.tests_summary).trim_end().to_string());

        for step in &page.steps {
            lines.extend(render_step(step));
        }

        let mut output = lines.join("\n");
        output.push('\n');
        Ok(output)
    }

    fn file_extension(&self) -> &str {
        "rst"
    }

    fn links_in_toc(&self) -> bool {
        true
    }
}

/// Render a file's anchor step followed by its numeric sub-steps.
fn render_step(step: &RecordStep) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!("   .. sw_test_step:: {}", step.name),
        format!("      :id: {}", step.id),
    ];

    for sub in &step.sub_steps {
        lines.push(String::new());
        lines.push(format!("   .. sw_test_step:: {}", sub.number));
        lines.push(format!("      :id: {}", sub.id));
        lines.push(sub.tests_line.clone());
        lines.push(String::new());
        lines.extend(sub.description_lines.iter().cloned());
        lines.extend(sub.input_lines.iter().cloned());
        lines.extend(sub.output_lines.iter().cloned());
    }

    lines
}
