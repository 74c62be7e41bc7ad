//! Shared test utilities for integration tests.
//!
//! Provides scripted converters and helpers for creating temporary
//! documentation trees used across multiple test files.

#![allow(dead_code)]

use anyhow::Result;
use mathdoc::{Converter, ConverterOutput};
use std::cell::Cell;
use std::io;
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;

/// blahtexml output for markup `X`.
pub const X_OUTPUT: &str = "<blahtex>\n<mathml>\n<markup>\nX\n</markup>\n</mathml>\n</blahtex>\n";

/// Fragment expected for [`X_OUTPUT`].
pub const X_FRAGMENT: &str = "<math xmlns=\"http://www.w3.org/1998/Math/MathML\">X\n</math>";

/// Behaviour of a [`ScriptedConverter`].
#[derive(Debug, Clone, Copy)]
pub enum Script {
    /// Exits successfully with given stdout.
    Output(&'static str),
    /// Wraps the LaTeX source in an `mi` element.
    Echo,
    /// Cannot be started.
    Missing,
    /// Exits with status 1.
    Fails,
}

/// Converter following a script and counting spawn attempts.
pub struct ScriptedConverter {
    script: Script,
    calls: Rc<Cell<usize>>,
}

impl ScriptedConverter {
    /// Creates converter and returns shared call counter.
    pub fn new(script: Script) -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let converter = Self {
            script,
            calls: Rc::clone(&calls),
        };
        (converter, calls)
    }
}

impl Converter for ScriptedConverter {
    fn convert(&self, latex: &str) -> io::Result<ConverterOutput> {
        self.calls.set(self.calls.get() + 1);

        let ok = |stdout: String| ConverterOutput {
            success: true,
            code: Some(0),
            stdout,
            stderr: String::new(),
        };

        match self.script {
            Script::Output(stdout) => Ok(ok(stdout.to_string())),
            Script::Echo => Ok(ok(format!(
                "<blahtex>\n<mathml>\n<markup>\n<mi>{}</mi>\n</markup>\n</mathml>\n</blahtex>\n",
                latex
            ))),
            Script::Missing => Err(io::Error::new(
                io::ErrorKind::NotFound,
                "No such file or directory",
            )),
            Script::Fails => Ok(ConverterOutput {
                success: false,
                code: Some(1),
                stdout: "<blahtex>\n</blahtex>\n".to_string(),
                stderr: "syntax error".to_string(),
            }),
        }
    }

    fn program(&self) -> &str {
        "scripted"
    }
}

/// Creates temporary documentation directory with given pages.
///
/// # Errors
///
/// Returns error if directory creation or file write fails
pub fn create_docs(pages: &[(&str, &str)]) -> Result<TempDir> {
    let dir = TempDir::new()?;
    for (path, content) in pages {
        write_file(dir.path(), path, content)?;
    }
    Ok(dir)
}

/// Writes file, creating parent directories as needed.
///
/// # Errors
///
/// Returns error if directory creation or file write fails
pub fn write_file(root: &Path, path: &str, content: &str) -> Result<()> {
    let file_path = root.join(path);
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}
