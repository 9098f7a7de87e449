//! Storage module for configuration and the persisted FTP value.

pub mod config;
pub mod ftp_store;

pub use config::{AppConfig, ConfigError, DetectionSettings, ExportSettings, MetricSettings};
pub use ftp_store::{FtpStore, FtpStoreError};
