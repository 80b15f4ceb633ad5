use std::fs;
use std::path::{Path, PathBuf};

use ccx_model::MeshSummary;
use serde::Serialize;

use crate::error::Result;
use crate::translate::SkippedElement;

/// Outcome of one INP to UNV conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    /// Source deck, absent when converting an in-memory mesh
    pub input: Option<PathBuf>,
    pub output: PathBuf,
    /// `false` when the mesh was empty and no file was produced
    pub written: bool,
    pub mesh: MeshSummary,
    pub elements_written: usize,
    pub groups_written: usize,
    pub skipped: Vec<SkippedElement>,
}

impl ConversionReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
