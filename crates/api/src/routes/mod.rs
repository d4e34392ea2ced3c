//! HTTP route handlers.

pub mod analytics;
pub mod health;
