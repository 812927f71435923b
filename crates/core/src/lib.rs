//! Core types and shared functionality for lookout.
//!
//! This crate provides:
//! - Unified error types
//! - Configuration structures and resolution of "auto" settings

pub mod config;
pub mod error;

pub use config::{AppConfig, ConfigOverrides, ResolvedConfig, SafeSearch, SafeSearchSetting};
pub use error::Error;
