//! GeoJSON extraction layer
//!
//! Reads a QuPath `FeatureCollection` through `serde_json::Value` and pulls
//! out only what the Aperio document needs: the classification name and the
//! outer ring of each polygon-like feature. Everything else in the document
//! (ids, measurements, holes, extra properties) is ignored.

use serde_json::Value;

use super::errors::MalformedInputError;
use super::types::SkippedFeature;

/// Geometry types that become Aperio annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonKind {
    Polygon,
    MultiPolygon,
}

impl PolygonKind {
    fn from_type(geometry_type: &str) -> Option<Self> {
        match geometry_type {
            "Polygon" => Some(PolygonKind::Polygon),
            "MultiPolygon" => Some(PolygonKind::MultiPolygon),
            _ => None,
        }
    }
}

/// A feature accepted for conversion
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonFeature {
    /// Position in the input `features` array
    pub feature_index: usize,
    pub kind: PolygonKind,
    /// `properties.classification.name`
    pub name: String,
    /// Outer ring pixel positions as (x, y), truncated toward zero; any z ordinate is dropped
    pub outer_ring: Vec<(i64, i64)>,
}

/// Outcome of reading one entry of `features`
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedFeature {
    Polygon(PolygonFeature),
    Skipped(SkippedFeature),
}

/// Parse a GeoJSON document and classify every feature, preserving input order
pub fn parse_feature_collection(geojson: &str) -> Result<Vec<ParsedFeature>, MalformedInputError> {
    let root: Value = serde_json::from_str(geojson)
        .map_err(|e| MalformedInputError::InvalidJson(e.to_string()))?;

    let object = root.as_object().ok_or(MalformedInputError::NotAnObject)?;

    let features = object
        .get("features")
        .and_then(Value::as_array)
        .ok_or(MalformedInputError::MissingFeatures)?;

    features
        .iter()
        .enumerate()
        .map(|(index, feature)| parse_feature(index, feature))
        .collect()
}

fn parse_feature(feature_index: usize, feature: &Value) -> Result<ParsedFeature, MalformedInputError> {
    let geometry = feature.get("geometry").ok_or(MalformedInputError::MissingField {
        feature_index,
        field: "geometry",
    })?;

    // GeoJSON allows unlocated features
    if geometry.is_null() {
        return Ok(ParsedFeature::Skipped(SkippedFeature {
            feature_index,
            geometry_type: None,
            reason: "feature has no geometry".to_string(),
        }));
    }

    let geometry_type = geometry
        .get("type")
        .and_then(Value::as_str)
        .ok_or(MalformedInputError::MissingField {
            feature_index,
            field: "geometry.type",
        })?;

    let Some(kind) = PolygonKind::from_type(geometry_type) else {
        return Ok(ParsedFeature::Skipped(SkippedFeature {
            feature_index,
            geometry_type: Some(geometry_type.to_string()),
            reason: format!("unsupported geometry type {}", geometry_type),
        }));
    };

    let name = classification_name(feature).ok_or(MalformedInputError::MissingField {
        feature_index,
        field: "properties.classification.name",
    })?;

    let coordinates = geometry.get("coordinates").ok_or(MalformedInputError::MissingField {
        feature_index,
        field: "geometry.coordinates",
    })?;

    let outer_ring = extract_outer_ring(feature_index, kind, coordinates)?;

    Ok(ParsedFeature::Polygon(PolygonFeature {
        feature_index,
        kind,
        name: name.to_string(),
        outer_ring,
    }))
}

fn classification_name(feature: &Value) -> Option<&str> {
    feature
        .get("properties")?
        .get("classification")?
        .get("name")?
        .as_str()
}

/// Polygon: `coordinates[0]`; MultiPolygon: `coordinates[0][0]`
fn extract_outer_ring(
    feature_index: usize,
    kind: PolygonKind,
    coordinates: &Value,
) -> Result<Vec<(i64, i64)>, MalformedInputError> {
    let invalid = |reason: &str| MalformedInputError::InvalidCoordinates {
        feature_index,
        reason: reason.to_string(),
    };

    let first = coordinates
        .as_array()
        .ok_or_else(|| invalid("coordinates is not an array"))?
        .first()
        .ok_or_else(|| invalid("coordinates is empty"))?;

    let ring = match kind {
        PolygonKind::Polygon => first,
        PolygonKind::MultiPolygon => {
            let polygon = first
                .as_array()
                .ok_or_else(|| invalid("polygon is not an array"))?;
            if coordinates.as_array().map_or(0, Vec::len) > 1 {
                log::debug!(
                    "feature {}: MultiPolygon has several polygons, only the first is converted",
                    feature_index
                );
            }
            polygon.first().ok_or_else(|| invalid("polygon has no rings"))?
        }
    };

    ring.as_array()
        .ok_or_else(|| invalid("outer ring is not an array"))?
        .iter()
        .map(|position| parse_position(position).map_err(|reason| invalid(&reason)))
        .collect()
}

fn parse_position(position: &Value) -> Result<(i64, i64), String> {
    let not_a_pair = || "position is not a pair of numbers".to_string();

    let ordinates = position.as_array().ok_or_else(not_a_pair)?;
    let x = ordinates.first().ok_or_else(not_a_pair)?;
    let y = ordinates.get(1).ok_or_else(not_a_pair)?;
    Ok((truncate_ordinate(x)?, truncate_ordinate(y)?))
}

/// Integers are taken exactly; floats are truncated toward zero and must fit in i64
fn truncate_ordinate(ordinate: &Value) -> Result<i64, String> {
    if let Some(n) = ordinate.as_i64() {
        return Ok(n);
    }
    if ordinate.is_u64() {
        return Err(format!("ordinate {} is out of range", ordinate));
    }

    let value = ordinate
        .as_f64()
        .ok_or_else(|| "position is not a pair of numbers".to_string())?;
    let truncated = value.trunc();
    // i64::MAX as f64 rounds up to 2^63, which itself does not fit
    if !truncated.is_finite() || truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return Err(format!("ordinate {} is out of range", ordinate));
    }
    Ok(truncated as i64)
}
