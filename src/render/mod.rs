//! Renderer module — trait-based format dispatch.

pub mod json;
pub mod rst;

use crate::model::GroupPage;
use anyhow::{anyhow, Result};

/// Trait for rendering a group page into a specific output format.
pub trait Renderer {
    fn render(&self, page: &GroupPage) -> Result<String>;
    fn file_extension(&self) -> &str;
    /// Whether the component TOC links documents of this format.
    fn links_in_toc(&self) -> bool;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "rst" | "restructuredtext" => Ok(Box::new(rst::RstRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use rst or json", format)),
    }
}
