//! Settings and report types for GeoJSON → Aperio conversion

use serde::{Deserialize, Serialize};

/// Configuration options for conversion
///
/// Values are written verbatim into the output, so they are kept as strings.
/// The region metrics are placeholders: ImageScope recomputes them when the
/// annotation file is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSettings {
    /// `Annotations/@MicronsPerPixel`
    pub microns_per_pixel: String,

    /// `Region/@Zoom`
    pub zoom: String,

    /// `Region/@LengthMicrons`
    pub length_microns: String,

    /// `Region/@AreaMicrons`
    pub area_microns: String,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            microns_per_pixel: "0.503300".to_string(),
            zoom: "0.182937".to_string(),
            length_microns: "5015.4".to_string(),
            area_microns: "964349.7".to_string(),
        }
    }
}

/// Information about a feature that was not converted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFeature {
    /// Position of the feature in the input `features` array
    pub feature_index: usize,

    /// `geometry.type` as found in the input (None when absent)
    pub geometry_type: Option<String>,

    /// Human-readable explanation of why skipped
    pub reason: String,
}

/// Summary of one conversion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionReport {
    /// Number of Annotation records written
    pub annotations: usize,

    /// Total Vertex elements across all regions
    pub vertices: usize,

    /// Features left out of the output
    pub skipped: Vec<SkippedFeature>,

    /// Distinct class names that fell back to the default line color, in first-seen order
    pub unknown_classes: Vec<String>,
}

/// Serialized document plus its report
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    pub xml: String,
    pub report: ConversionReport,
}
