//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and rectangle geometry
//! - Handle types for arena-backed storage
//! - Logging utilities

pub mod collections;
pub mod logging;
pub mod math;
