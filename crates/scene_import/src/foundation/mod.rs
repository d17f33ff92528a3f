//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the importer:
//! - Math types and small vector helpers
//! - Logging utilities

pub mod math;
pub mod logging;
