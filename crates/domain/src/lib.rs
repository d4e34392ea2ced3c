//! Domain layer for the geofence analytics backend.
//!
//! This crate contains:
//! - Domain models (Location, Device, ProximityEvent) and analytics views
//! - The analytics aggregation services that derive those views

pub mod models;
pub mod services;
