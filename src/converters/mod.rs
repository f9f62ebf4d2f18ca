//! Format converters
//!
//! This module contains converters between annotation formats.

pub mod geojson_to_aperio;
