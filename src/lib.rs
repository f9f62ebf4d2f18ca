//! GeoJSON → Aperio annotation converter
//!
//! Turns the polygon annotations a QuPath project exports as GeoJSON into an
//! Aperio ImageScope annotation XML file.

pub mod config;
pub mod converters;

// Re-export commonly used types
pub use converters::geojson_to_aperio::{
    convert,
    convert_file,
    convert_str,
    ConversionError,
    ConversionOutput,
    ConversionReport,
    ConversionSettings,
    MalformedInputError,
};
