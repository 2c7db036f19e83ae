//! tscdoc — generate test specification documents from `.tsc` file headers.
//!
//! Every `{component}_{group}_{name}.tsc` file under the test path carries a
//! leading comment header (Description, Input, Output, Requirements). Files
//! are grouped by their `{group}` token, one reStructuredText document is
//! written per group next to the component TOC, and the TOC is updated to
//! link exactly the current set of group documents.
//!
//! ```text
//! tscdoc --config tscdoc.json
//! tscdoc --component Bogus --test-path tests --spec-path spec
//! tscdoc --check
//! ```

mod config;
mod diagnostics;
mod format;
mod group;
mod model;
mod parser;
mod render;
mod toc;
mod writer;

use anyhow::{bail, Context, Result};
use clap::Parser;
use config::{Config, Overrides};
use diagnostics::{Diagnostics, RunStatus};
use model::ParsedHeader;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tscdoc",
    about = "Generate test specification documents from .tsc file headers"
)]
struct Cli {
    /// Config file (JSON). Defaults to ./tscdoc.json when present.
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Component name; test files are named {component}_{group}_{name}.tsc
    #[arg(long)]
    component: Option<String>,

    /// Directory searched recursively for .tsc files
    #[arg(long)]
    test_path: Option<PathBuf>,

    /// Directory containing the component TOC ({component}_component_test.rst)
    #[arg(long)]
    spec_path: Option<PathBuf>,

    /// Output format: rst (default), json
    #[arg(short = 'f', long, default_value = "rst")]
    format: String,

    /// Validate headers only; do not touch the TOC or generated documents
    #[arg(long)]
    check: bool,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let status = match run(&cli) {
        Ok(status) => status,
        Err(err) => {
            error!(error = %err, "tscdoc failed");
            for cause in err.chain().skip(1) {
                error!(cause = %cause, "caused by");
            }
            RunStatus::Failure
        }
    };

    println!("{}", status.banner());
    std::process::exit(status.exit_code());
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// A group ready to be written: token, display name and its records.
struct PlannedGroup<'a> {
    group: &'a str,
    display_name: String,
    records: &'a [model::FileRecord],
}

fn run(cli: &Cli) -> Result<RunStatus> {
    let renderer = render::create_renderer(&cli.format)?;
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    let config = Config::load(
        Overrides {
            config: cli.config.clone(),
            component: cli.component.clone(),
            test_path: cli.test_path.clone(),
            spec_path: cli.spec_path.clone(),
        },
        &cwd,
    )?;
    info!(
        component = %config.component,
        test_path = %config.test_path.display(),
        spec_path = %config.spec_path.display(),
        "configuration loaded"
    );

    let test_files = discover_test_files(&config.component, &config.test_path)?;
    if test_files.is_empty() {
        warn!(component = %config.component, "no test files found");
        return Ok(RunStatus::Success);
    }

    // Every structural problem is collected before any document is touched.
    let mut diags = Diagnostics::echoing();
    let parsed = parse_all(&test_files, &mut diags)?;
    let grouping = group::group(&config.component, parsed);
    diags.extend(grouping.errors);

    let plan = plan_groups(&config, &grouping.buckets)?;
    if cli.check {
        for record in plan.iter().flat_map(|p| p.records) {
            writer::report_missing_content(record, &mut diags);
        }
        info!(groups = plan.len(), "check finished; no documents written");
        return Ok(diags.status());
    }

    let toc_path = toc::locate(&config.component, &config.spec_path)?;
    info!(path = %toc_path.display(), "table of contents");

    if renderer.links_in_toc() {
        toc::cleanup(&config.component, &toc_path)?;
        let entries: Vec<String> = plan
            .iter()
            .map(|p| {
                format!(
                    "{}.{}",
                    writer::section_name(&config.component, &p.display_name),
                    renderer.file_extension()
                )
            })
            .collect();
        toc::synchronize(&config.component, &entries, &toc_path)?;
    }

    let out_dir = toc_path.parent().unwrap_or_else(|| Path::new("."));
    for planned in &plan {
        let page = writer::build_page(
            &config.component,
            planned.group,
            &planned.display_name,
            planned.records,
            &mut diags,
        );
        writer::write_page(out_dir, &page, renderer.as_ref())?;
    }

    info!(
        documents = plan.len(),
        diagnostics = diags.entries().len(),
        warnings = diags.warnings().count(),
        "generation finished"
    );
    Ok(diags.status())
}

/// Find `{component}_*.tsc` files below `test_path`, sorted for deterministic output.
fn discover_test_files(component: &str, test_path: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/**/*.{}",
        glob::Pattern::escape(&test_path.to_string_lossy()),
        parser::TEST_FILE_EXTENSION
    );
    let prefix = format!("{component}_");
    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .with_context(|| format!("invalid glob pattern: {}", pattern))?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(&prefix))
        })
        .collect();
    files.sort();
    files.dedup();

    for file in &files {
        debug!(path = %file.display(), "test file found");
    }
    info!(count = files.len(), "test files discovered");
    Ok(files)
}

/// Read and parse every file; unreadable or malformed files become errors.
fn parse_all(files: &[PathBuf], diags: &mut Diagnostics) -> Result<Vec<(PathBuf, ParsedHeader)>> {
    let mut parsed = Vec::with_capacity(files.len());
    for path in files {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                diags.error(path, 1, format!("Failed to read .tsc file: {}", e));
                continue;
            }
        };
        match parser::parse_file(path, &content)? {
            Ok(header) => parsed.push((path.clone(), header)),
            Err(e) => diags.error(path, e.line(), e.to_string()),
        }
    }
    Ok(parsed)
}

/// Resolve display names and reject groups that would share a document.
fn plan_groups<'a>(
    config: &Config,
    buckets: &'a BTreeMap<String, Vec<model::FileRecord>>,
) -> Result<Vec<PlannedGroup<'a>>> {
    let mut seen: BTreeMap<String, &str> = BTreeMap::new();
    let mut plan = Vec::with_capacity(buckets.len());

    for (token, records) in buckets {
        let display_name = group::display_name(token, &config.group_name_mappings);
        if let Some(other) = seen.insert(display_name.clone(), token) {
            bail!(
                "groups '{}' and '{}' both resolve to document {}",
                other,
                token,
                writer::section_name(&config.component, &display_name)
            );
        }
        plan.push(PlannedGroup {
            group: token,
            display_name,
            records,
        });
    }
    Ok(plan)
}
