//! Report output streams.
//!
//! Uses temp→rename so that no partial report is ever visible: both streams
//! go to temporary files next to their targets, and [`ReportWriter::finish`]
//! renames them into place. Dropping an unfinished writer deletes the
//! temporaries.

use crate::errors::{io_error, DiffError};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Body and TOC streams held open for the whole report
#[derive(Debug)]
pub struct ReportWriter {
    body: Option<BufWriter<File>>,
    toc: Option<BufWriter<File>>,
    body_path: PathBuf,
    toc_path: PathBuf,
    body_temp: PathBuf,
    toc_temp: PathBuf,
    committed: bool,
}

/// Final locations of a committed report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenReport {
    pub body_path: PathBuf,
    pub toc_path: PathBuf,
}

fn temp_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{}.tmp", name))
}

impl ReportWriter {
    /// Open both streams under `dir`, creating it if needed
    ///
    /// # Errors
    ///
    /// `Io` when the directory or a temporary file cannot be created.
    pub fn create(dir: &Path, body_file: &str, toc_file: &str) -> Result<Self, DiffError> {
        fs::create_dir_all(dir).map_err(|e| io_error("create_report_dir", e))?;

        let body_path = dir.join(body_file);
        let toc_path = dir.join(toc_file);
        let body_temp = temp_path(&body_path);
        let toc_temp = temp_path(&toc_path);

        let body = File::create(&body_temp).map_err(|e| io_error("create_body_temp", e))?;
        let toc = match File::create(&toc_temp) {
            Ok(file) => file,
            Err(e) => {
                let _ = fs::remove_file(&body_temp);
                return Err(io_error("create_toc_temp", e));
            }
        };

        tracing::debug!(
            body = %body_path.display(),
            toc = %toc_path.display(),
            "opened report streams"
        );
        Ok(Self {
            body: Some(BufWriter::new(body)),
            toc: Some(BufWriter::new(toc)),
            body_path,
            toc_path,
            body_temp,
            toc_temp,
            committed: false,
        })
    }

    pub fn body_path(&self) -> &Path {
        &self.body_path
    }

    pub fn toc_path(&self) -> &Path {
        &self.toc_path
    }

    /// # Errors
    ///
    /// `Io` on write failure.
    pub fn write_body(&mut self, text: &str) -> Result<(), DiffError> {
        write_stream(&mut self.body, text, "write_body")
    }

    /// # Errors
    ///
    /// `Io` on write failure.
    pub fn write_toc(&mut self, text: &str) -> Result<(), DiffError> {
        write_stream(&mut self.toc, text, "write_toc")
    }

    /// Flush both streams and rename them into place
    ///
    /// # Errors
    ///
    /// `Io` on flush or rename failure; temporaries are removed.
    pub fn finish(mut self) -> Result<WrittenReport, DiffError> {
        for (stream, op) in [(self.body.take(), "flush_body"), (self.toc.take(), "flush_toc")] {
            if let Some(stream) = stream {
                let file = stream
                    .into_inner()
                    .map_err(|e| io_error(op, e.into_error()))?;
                file.sync_all().map_err(|e| io_error(op, e))?;
            }
        }

        fs::rename(&self.body_temp, &self.body_path).map_err(|e| io_error("rename_body", e))?;
        if let Err(e) = fs::rename(&self.toc_temp, &self.toc_path) {
            let _ = fs::remove_file(&self.body_path);
            return Err(io_error("rename_toc", e));
        }
        self.committed = true;

        Ok(WrittenReport {
            body_path: self.body_path.clone(),
            toc_path: self.toc_path.clone(),
        })
    }
}

fn write_stream(
    stream: &mut Option<BufWriter<File>>,
    text: &str,
    op: &str,
) -> Result<(), DiffError> {
    let stream = stream.as_mut().ok_or_else(|| DiffError::Internal {
        message: format!("{} after the report was closed", op),
    })?;
    stream
        .write_all(text.as_bytes())
        .map_err(|e| io_error(op, e))
}

impl Drop for ReportWriter {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        self.body.take();
        self.toc.take();
        for path in [&self.body_temp, &self.toc_temp] {
            if path.exists() {
                if let Err(e) = fs::remove_file(path) {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to remove report temp file"
                    );
                }
            }
        }
        tracing::debug!("discarded unfinished report");
    }
}
