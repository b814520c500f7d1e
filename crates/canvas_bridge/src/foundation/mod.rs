//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the bridge:
//! - Geometry types (sizes and points in CSS pixels)
//! - Handles and keys identifying windows, cursors, elements and listeners
//! - Logging utilities

pub mod geometry;
pub mod collections;
pub mod logging;
