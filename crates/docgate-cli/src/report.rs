//! # Report Output
//!
//! One line per validated file on stdout:
//!
//! ```text
//! config/a.yaml: valid
//! config/b.yaml: invalid
//!   - /: "name" is a required property
//! ```

use std::io::{self, Write};
use std::path::Path;

use docgate_schema::Violation;

/// Writes per-file verdict lines to a sink.
#[derive(Debug)]
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn valid(&mut self, path: &Path) -> io::Result<()> {
        writeln!(self.out, "{}: valid", path.display())?;
        self.out.flush()
    }

    /// Report an invalid file followed by each violation on its own line.
    pub fn invalid(&mut self, path: &Path, violations: &[Violation]) -> io::Result<()> {
        writeln!(self.out, "{}: invalid", path.display())?;
        for violation in violations {
            writeln!(self.out, "  - {violation}")?;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
