//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and operations
//! - Cooperative cancellation
//! - Logging utilities

pub mod math;
pub mod cancel;
pub mod logging;
