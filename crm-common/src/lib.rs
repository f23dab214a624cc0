//! # CRM Common Library
//!
//! Shared code for the CRM import and financial crates:
//! - Error type
//! - Configuration loading and database path resolution
//! - SQLite schema, row models and queries

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
