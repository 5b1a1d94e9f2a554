//! GitHub Actions run logs
//!
//! GitHub serves the logs of a workflow run as a ZIP archive with one text
//! file per job (and per step). This crate extracts those files and splits
//! their content into chunks that fit a character budget, cutting only at
//! line boundaries so every chunk stays readable on its own.
//!
//! # Example
//!
//! ```no_run
//! use gh_actions_logs::{read_log_archive, LogChunks};
//!
//! let zip_data: &[u8] = &[]; // ZIP file bytes from GitHub API
//! for job in read_log_archive(zip_data)? {
//!     println!("{}", job.name);
//!     for chunk in LogChunks::new(&job.content, 3000) {
//!         print!("{}", chunk);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod archive;
mod chunks;

pub use archive::{ArchiveError, JobLog, read_log_archive, step_logs};
pub use chunks::{DEFAULT_CHUNK_SIZE, LogChunks};
