//! Log archive extraction

use serde::{Deserialize, Serialize};
use std::io::{Cursor, Read};
use thiserror::Error;
use zip::ZipArchive;

/// Errors that can occur while reading a log archive
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Failed to read ZIP archive: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Failed to read file from ZIP: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid UTF-8 in log file {name}")]
    Utf8Error {
        name: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// The raw log of one file in the archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobLog {
    /// Path of the file inside the archive (e.g. `build/3_Run tests.txt`)
    pub name: String,
    /// Full text of the log
    pub content: String,
}

/// Extract every log file from a run's log archive
///
/// Directories are skipped. Logs are returned grouped by job directory with
/// the numbered step files of each job in execution order.
pub fn read_log_archive(zip_data: &[u8]) -> Result<Vec<JobLog>, ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(zip_data))?;
    let mut logs = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }

        let name = file.name().to_string();
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        let content = String::from_utf8(bytes).map_err(|source| ArchiveError::Utf8Error {
            name: name.clone(),
            source,
        })?;

        log::debug!("Extracted {} ({} bytes)", name, content.len());
        logs.push(JobLog { name, content });
    }

    logs.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    Ok(logs)
}

impl JobLog {
    /// Whether this file is the log of a single step inside a job directory
    pub fn is_step_log(&self) -> bool {
        self.name.contains('/')
    }

    /// `(job directory, step number, name)`, `build/10_Test.txt` is step 10
    fn sort_key(&self) -> (&str, Option<u64>, &str) {
        let (dir, file) = self.name.rsplit_once('/').unwrap_or(("", self.name.as_str()));
        let step = file
            .split_once('_')
            .and_then(|(number, _)| number.parse().ok());
        (dir, step, self.name.as_str())
    }
}

/// Keep the per-step logs of an archive
///
/// The top-level file of each job repeats the content of its step files.
/// Archives without job directories are returned unchanged.
pub fn step_logs(logs: Vec<JobLog>) -> Vec<JobLog> {
    if logs.iter().any(JobLog::is_step_log) {
        logs.into_iter().filter(JobLog::is_step_log).collect()
    } else {
        logs
    }
}
