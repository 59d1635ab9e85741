//! Data models for records and configuration.

pub mod config;
pub mod record;
