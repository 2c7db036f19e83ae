//! Run-scoped diagnostics: file-level errors and missing-content warnings.
//!
//! Every diagnostic is printed as it is recorded, in the familiar
//! `path:line: (SEVERITY) message` shape, and the accumulator remembers
//! whether any warning or error was seen so the run can end with one of
//! three statuses.

use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("WARNING"),
            Severity::Error => f.write_str("ERROR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub path: PathBuf,
    /// 1-based.
    pub line: usize,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: ({}) {}",
            self.path.display(),
            self.line,
            self.severity,
            self.message
        )
    }
}

/// Final outcome of a run. Failure takes precedence over warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    SuccessWithWarnings,
    Failure,
}

impl RunStatus {
    pub fn message(self) -> &'static str {
        match self {
            RunStatus::Success => "TSCDOC WAS SUCCESSFUL",
            RunStatus::SuccessWithWarnings => "TSCDOC FINISHED WITH WARNINGS",
            RunStatus::Failure => "TSCDOC FAILED",
        }
    }

    /// Boxed status banner printed at the end of a run.
    pub fn banner(self) -> String {
        let message = self.message();
        let rule = "-".repeat(message.len() + 2);
        format!("/{rule}\\\n| {message} |\n\\{rule}/")
    }

    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Failure => 1,
            _ => 0,
        }
    }
}

/// Accumulator threaded through the pipeline.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    echo: bool,
}

impl Diagnostics {
    /// Accumulator that prints each diagnostic to stderr as it arrives.
    pub fn echoing() -> Self {
        Self {
            entries: Vec::new(),
            echo: true,
        }
    }

    pub fn error(&mut self, path: &Path, line: usize, message: impl Into<String>) {
        self.push(path, line, Severity::Error, message.into());
    }

    pub fn warning(&mut self, path: &Path, line: usize, message: impl Into<String>) {
        self.push(path, line, Severity::Warning, message.into());
    }

    /// Move diagnostics collected by an independent stage into this one.
    pub fn extend(&mut self, other: impl IntoIterator<Item = Diagnostic>) {
        for diag in other {
            if self.echo {
                eprintln!("{}", diag);
            }
            self.entries.push(diag);
        }
    }

    fn push(&mut self, path: &Path, line: usize, severity: Severity, message: String) {
        self.extend([Diagnostic {
            path: path.to_path_buf(),
            line,
            severity,
            message,
        }]);
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Warning)
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn status(&self) -> RunStatus {
        if self.has_errors() {
            RunStatus::Failure
        } else if self.has_warnings() {
            RunStatus::SuccessWithWarnings
        } else {
            RunStatus::Success
        }
    }
}
