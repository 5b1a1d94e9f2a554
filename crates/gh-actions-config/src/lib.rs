//! Configuration and file management for gh-actions-manager
//!
//! This crate provides:
//! - File path utilities for config and cache files
//! - Configuration file loading (TOML)
//! - Application configuration (AppConfig)

pub mod app_config;
pub mod config_file;
pub mod paths;

pub use app_config::AppConfig;
pub use config_file::load_config_file;
pub use paths::{cache_dir, config_dir};

/// Application name used for directories and file names
pub const APP_NAME: &str = "gh-actions-manager";
