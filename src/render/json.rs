//! JSON renderer — structured output for tooling integration.
//!
//! Serializes the group page field data directly, so custom rendering
//! pipelines can consume exactly what the reStructuredText renderer sees.

use crate::model::GroupPage;
use crate::render::Renderer;
use anyhow::{Context, Result};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, page: &GroupPage) -> Result<String> {
        let mut out = serde_json::to_string_pretty(page)
            .with_context(|| format!("failed to serialize group page: {}", page.section))?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }

    fn links_in_toc(&self) -> bool {
        false
    }
}
