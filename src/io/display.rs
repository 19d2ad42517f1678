//! Showing finished collages with an external viewer program

use std::path::Path;
use std::process::Command;

use crate::io::error::{CollageError, Result};

/// External program invoked with the collage path as its only argument
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Viewer {
    program: String,
}

impl Viewer {
    /// Use `program` to display collages
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Program name or path
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the viewer on `path` and wait for it to exit
    ///
    /// # Errors
    ///
    /// Returns `Display` if the program cannot be started or exits with a
    /// failure status.
    pub fn show(&self, path: &Path) -> Result<()> {
        let status = Command::new(&self.program)
            .arg(path)
            .status()
            .map_err(|e| CollageError::Display {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(CollageError::Display {
                program: self.program.clone(),
                reason: format!("exited with {status}"),
            })
        }
    }
}
