//! Table-of-contents synchronization.
//!
//! The component TOC (`{component}_component_test.rst`) is hand-written except
//! for one indented line per generated group document. Generated lines and
//! files are recognized solely by the `{component}_generated_` prefix, so a
//! run strips whatever a previous run left behind and appends the current
//! set. Every read or write failure here aborts the run.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Indentation of appended entries, matching a `toctree` body.
const ENTRY_INDENT: &str = "   ";

/// File name of the component's TOC document.
pub fn toc_file_name(component: &str) -> String {
    format!("{component}_component_test.rst")
}

/// Prefix shared by generated documents and their TOC lines.
pub fn generated_prefix(component: &str) -> String {
    format!("{component}_generated_")
}

/// Find the component TOC under `search_root`.
///
/// A direct child wins; otherwise the recursive candidates are ranked by
/// [`rank_candidates`].
pub fn locate(component: &str, search_root: &Path) -> Result<PathBuf> {
    let name = toc_file_name(component);
    let direct = search_root.join(&name);
    if direct.is_file() {
        return Ok(direct);
    }

    let pattern = format!(
        "{}/**/{}",
        glob::Pattern::escape(&search_root.to_string_lossy()),
        glob::Pattern::escape(&name)
    );
    let candidates: Vec<PathBuf> = glob::glob(&pattern)
        .with_context(|| format!("invalid glob pattern: {}", pattern))?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();
    debug!(count = candidates.len(), "toc candidates found");

    match rank_candidates(search_root, candidates) {
        Some(found) => Ok(found),
        None => bail!(
            "{} not found under {} (recursive search)",
            name,
            search_root.display()
        ),
    }
}

/// Pick the shallowest candidate relative to `root`, breaking ties by the
/// lexicographically smallest path.
pub fn rank_candidates(root: &Path, candidates: Vec<PathBuf>) -> Option<PathBuf> {
    candidates.into_iter().min_by(|a, b| {
        let depth = |p: &Path| {
            p.strip_prefix(root)
                .map(|rel| rel.components().count())
                .unwrap_or(usize::MAX)
        };
        depth(a)
            .cmp(&depth(b))
            .then_with(|| a.to_string_lossy().cmp(&b.to_string_lossy()))
    })
}

/// Delete generated documents next to the TOC. Returns the deleted paths.
pub fn cleanup(component: &str, toc_path: &Path) -> Result<Vec<PathBuf>> {
    let dir = toc_path.parent().unwrap_or_else(|| Path::new("."));
    let pattern = format!(
        "{}/{}*.rst",
        glob::Pattern::escape(&dir.to_string_lossy()),
        glob::Pattern::escape(&generated_prefix(component))
    );

    let mut stale: Vec<PathBuf> = glob::glob(&pattern)
        .with_context(|| format!("invalid glob pattern: {}", pattern))?
        .filter_map(|r| r.ok())
        .filter(|p| p != toc_path && p.is_file())
        .collect();
    stale.sort();

    remove_documents(&stale)?;
    Ok(stale)
}

fn remove_documents(paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        fs::remove_file(path)
            .with_context(|| format!("failed to delete file: {}", path.display()))?;
        info!(path = %path.display(), "deleted stale document");
    }
    Ok(())
}

/// Remove generated entries from the TOC file in place.
pub fn strip_generated_lines(component: &str, toc_path: &Path) -> Result<()> {
    let text = read_toc(toc_path)?;
    write_toc(toc_path, &strip_generated(&text, &generated_prefix(component)))
}

/// Append one entry line per group to the TOC file.
pub fn append_links(entries: &[String], toc_path: &Path) -> Result<()> {
    let text = read_toc(toc_path)?;
    write_toc(toc_path, &append_entries(&text, entries))
}

/// Strip stale entries, then append the current ones.
pub fn synchronize(component: &str, entries: &[String], toc_path: &Path) -> Result<()> {
    strip_generated_lines(component, toc_path)?;
    append_links(entries, toc_path)?;
    debug!(entries = entries.len(), "toc synchronized");
    Ok(())
}

/// Drop every line whose trimmed content starts with `prefix`.
pub fn strip_generated(text: &str, prefix: &str) -> String {
    let mut kept: String = text
        .lines()
        .filter(|line| !line.trim_start().starts_with(prefix))
        .collect::<Vec<_>>()
        .join("\n");
    kept.push('\n');
    kept
}

/// Append indented entries after the existing text.
pub fn append_entries(text: &str, entries: &[String]) -> String {
    let mut out = text.to_string();
    if entries.is_empty() {
        return out;
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    for entry in entries {
        out.push_str(ENTRY_INDENT);
        out.push_str(entry);
        out.push('\n');
    }
    out
}

fn read_toc(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read TOC file: {}", path.display()))
}

fn write_toc(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).with_context(|| format!("failed to write TOC file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TOC: &str = "\
Bogus component tests
=====================

.. toctree::
   :maxdepth: 1

   Bogus_manual_tests.rst
";

    fn entries(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn rank_prefers_shallow_then_lexicographic() {
        let root = Path::new("/spec");
        let picked = rank_candidates(
            root,
            vec![
                PathBuf::from("/spec/b/deep/X.rst"),
                PathBuf::from("/spec/b/X.rst"),
                PathBuf::from("/spec/a/X.rst"),
            ],
        );
        assert_eq!(picked, Some(PathBuf::from("/spec/a/X.rst")));
    }

    #[test]
    fn rank_empty_is_none() {
        assert_eq!(rank_candidates(Path::new("/spec"), Vec::new()), None);
    }

    #[test]
    fn strip_removes_only_generated_lines() {
        let text = format!("{TOC}   Bogus_generated_Old_Tests.rst\nBogus_generated_Other.rst\n   Other_generated_X.rst\n");
        let stripped = strip_generated(&text, "Bogus_generated_");
        assert_eq!(stripped, format!("{TOC}   Other_generated_X.rst\n"));
    }

    #[test]
    fn strip_then_append_is_idempotent() {
        let current = entries(&["Bogus_generated_Compiler_Tests.rst", "Bogus_generated_Validator_Tests.rst"]);
        let mut text = format!("{TOC}   Bogus_generated_Gone_Tests.rst\n   Bogus_generated_Gone2_Tests.rst\n   Bogus_generated_Gone3_Tests.rst\n");
        let mut runs = Vec::new();
        for _ in 0..3 {
            text = append_entries(&strip_generated(&text, "Bogus_generated_"), &current);
            runs.push(text.clone());
        }
        assert_eq!(runs[0], runs[1]);
        assert_eq!(runs[1], runs[2]);
        assert!(!text.contains("Gone"));
        assert_eq!(text.matches("Bogus_generated_Compiler_Tests.rst").count(), 1);
        assert!(text.ends_with("   Bogus_generated_Compiler_Tests.rst\n   Bogus_generated_Validator_Tests.rst\n"));
    }

    #[test]
    fn append_adds_missing_newline() {
        let out = append_entries("line", &entries(&["A.rst"]));
        assert_eq!(out, "line\n   A.rst\n");
    }

    #[test]
    fn append_nothing_leaves_text() {
        assert_eq!(append_entries(TOC, &[]), TOC);
    }

    #[test]
    fn locate_prefers_direct_child() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a/Bogus_component_test.rst"), TOC).unwrap();
        fs::write(dir.path().join("Bogus_component_test.rst"), TOC).unwrap();
        assert_eq!(
            locate("Bogus", dir.path()).unwrap(),
            dir.path().join("Bogus_component_test.rst")
        );
    }

    #[test]
    fn locate_searches_recursively() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("b/c")).unwrap();
        fs::create_dir_all(dir.path().join("z")).unwrap();
        fs::write(dir.path().join("b/c/Bogus_component_test.rst"), TOC).unwrap();
        fs::write(dir.path().join("z/Bogus_component_test.rst"), TOC).unwrap();
        assert_eq!(
            locate("Bogus", dir.path()).unwrap(),
            dir.path().join("z/Bogus_component_test.rst")
        );
    }

    #[test]
    fn locate_missing_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = locate("Bogus", dir.path()).unwrap_err();
        assert!(err.to_string().contains("Bogus_component_test.rst not found"));
    }

    #[test]
    fn cleanup_deletes_generated_siblings_only() {
        let dir = TempDir::new().unwrap();
        let toc = dir.path().join("Bogus_component_test.rst");
        fs::write(&toc, TOC).unwrap();
        fs::write(dir.path().join("Bogus_generated_Old_Tests.rst"), "x").unwrap();
        fs::write(dir.path().join("Bogus_manual_tests.rst"), "x").unwrap();
        fs::write(dir.path().join("Other_generated_X.rst"), "x").unwrap();

        let deleted = cleanup("Bogus", &toc).unwrap();
        assert_eq!(deleted, [dir.path().join("Bogus_generated_Old_Tests.rst")]);
        assert!(toc.exists());
        assert!(dir.path().join("Bogus_manual_tests.rst").exists());
        assert!(dir.path().join("Other_generated_X.rst").exists());
    }

    #[test]
    fn file_level_strip_and_append() {
        let dir = TempDir::new().unwrap();
        let toc = dir.path().join("Bogus_component_test.rst");
        fs::write(&toc, format!("{TOC}   Bogus_generated_Stale_Tests.rst\n")).unwrap();

        strip_generated_lines("Bogus", &toc).unwrap();
        assert_eq!(fs::read_to_string(&toc).unwrap(), TOC);

        append_links(&entries(&["Bogus_generated_Compiler_Tests.rst"]), &toc).unwrap();
        assert_eq!(
            fs::read_to_string(&toc).unwrap(),
            format!("{TOC}   Bogus_generated_Compiler_Tests.rst\n")
        );
    }

    #[test]
    fn synchronize_matches_separate_steps() {
        let dir = TempDir::new().unwrap();
        let toc = dir.path().join("Bogus_component_test.rst");
        fs::write(&toc, format!("{TOC}   Bogus_generated_Stale_Tests.rst\n")).unwrap();
        let current = entries(&["Bogus_generated_Compiler_Tests.rst"]);

        synchronize("Bogus", &current, &toc).unwrap();
        let once = fs::read_to_string(&toc).unwrap();
        synchronize("Bogus", &current, &toc).unwrap();
        assert_eq!(fs::read_to_string(&toc).unwrap(), once);
        assert_eq!(once, format!("{TOC}   Bogus_generated_Compiler_Tests.rst\n"));
    }

    #[test]
    fn unreadable_toc_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = synchronize("Bogus", &[], &dir.path().join("missing.rst")).unwrap_err();
        assert!(err.to_string().contains("failed to read TOC file"));
    }

    #[test]
    fn unwritable_toc_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = write_toc(&dir.path().join("missing/Bogus_component_test.rst"), TOC).unwrap_err();
        assert!(err.to_string().contains("failed to write TOC file"));
    }

    #[test]
    fn failed_delete_is_fatal() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("Bogus_generated_Gone_Tests.rst");
        let err = remove_documents(&[gone]).unwrap_err();
        assert!(err.to_string().contains("failed to delete file"));
    }

    #[test]
    fn delete_stops_at_first_failure() {
        let dir = TempDir::new().unwrap();
        let blocked = dir.path().join("Bogus_generated_Blocked_Tests.rst");
        fs::create_dir(&blocked).unwrap();
        let later = dir.path().join("Bogus_generated_Later_Tests.rst");
        fs::write(&later, "x").unwrap();

        assert!(remove_documents(&[blocked.clone(), later.clone()]).is_err());
        assert!(blocked.exists());
        assert!(later.exists());
    }
}
