//! Shared utilities and common types for the geofence analytics backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Lenient timestamp parsing and local calendar-day arithmetic
//! - Common validation logic

pub mod time;
pub mod validation;
