//! Per-case result files: one JSON object per line.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::RunnerError;

/// Writes records to a JSONL file, creating its directory when missing.
/// An existing file is truncated. Each record is flushed as it is written
/// so a crash mid-run keeps every finished case.
pub struct ResultsWriter {
    path: PathBuf,
    out: BufWriter<File>,
    written: usize,
}

impl ResultsWriter {
    pub fn create(path: &Path) -> Result<Self, RunnerError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| RunnerError::io(dir, e))?;
        }
        let file = File::create(path).map_err(|e| RunnerError::io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<(), RunnerError> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out
            .write_all(b"\n")
            .and_then(|()| self.out.flush())
            .map_err(|e| RunnerError::io(&self.path, e))?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Read every non-blank line of a JSONL file as `T`.
pub fn read_results<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, RunnerError> {
    let file = File::open(path).map_err(|e| RunnerError::io(path, e))?;
    let mut records = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| RunnerError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| RunnerError::InvalidLine {
            path: path.to_path_buf(),
            line: i + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}
