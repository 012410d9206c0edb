//! Data models for classification, configuration, and batch reporting.

pub mod config;
pub mod key;
pub mod report;
