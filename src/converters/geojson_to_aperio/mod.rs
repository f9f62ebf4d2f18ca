//! QuPath GeoJSON to Aperio ImageScope XML converter
//!
//! # Overview
//!
//! The converter follows a linear pipeline:
//! 1. **Parse**: read the `FeatureCollection` with serde_json and keep the
//!    polygon-like features (Polygon, MultiPolygon)
//! 2. **Build**: one `Annotation` per accepted feature, Ids assigned 1..N
//! 3. **Indent**: lay out whitespace the way ImageScope's writer does
//! 4. **Write**: serialize with quick-xml and atomically replace the output
//!
//! # Basic Usage
//!
//! ```ignore
//! use geojson_aperio::converters::geojson_to_aperio::{convert_str, ConversionSettings};
//!
//! let geojson = r#"{"type": "FeatureCollection", "features": [{
//!     "type": "Feature",
//!     "geometry": {"type": "Polygon", "coordinates": [[[10.7, 20.2], [30.9, 20.2], [30.9, 40.1]]]},
//!     "properties": {"classification": {"name": "Nec"}}
//! }]}"#;
//!
//! let output = convert_str(geojson, &ConversionSettings::default())?;
//! println!("{}", output.xml);
//! ```

pub mod builder;
pub mod colors;
pub mod errors;
pub mod parser;
pub mod types;
pub mod xml;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

pub use errors::{ConversionError, MalformedInputError, Result};
pub use types::{ConversionOutput, ConversionReport, ConversionSettings, SkippedFeature};

use builder::AperioDocumentBuilder;
use parser::{parse_feature_collection, ParsedFeature};

/// Convert a GeoJSON document to Aperio XML in memory.
///
/// # Returns
///
/// * `Ok(ConversionOutput)` - serialized XML plus a report of what was converted and skipped
/// * `Err(ConversionError::MalformedInput)` - the document cannot be read as a FeatureCollection
pub fn convert_str(geojson: &str, settings: &ConversionSettings) -> Result<ConversionOutput> {
    let features = parse_feature_collection(geojson)?;

    let mut builder = AperioDocumentBuilder::new(settings);
    let mut report = ConversionReport::default();

    for feature in features {
        match feature {
            ParsedFeature::Polygon(polygon) => {
                if colors::known_line_color(&polygon.name).is_none() {
                    log::info!(
                        "feature {}: unknown class '{}', using default line color",
                        polygon.feature_index,
                        polygon.name
                    );
                    if !report.unknown_classes.contains(&polygon.name) {
                        report.unknown_classes.push(polygon.name.clone());
                    }
                }
                if polygon.outer_ring.len() < 3 {
                    log::warn!(
                        "feature {}: outer ring has only {} vertices",
                        polygon.feature_index,
                        polygon.outer_ring.len()
                    );
                }
                builder.add_feature(&polygon);
            }
            ParsedFeature::Skipped(skipped) => {
                log::debug!("feature {} skipped: {}", skipped.feature_index, skipped.reason);
                report.skipped.push(skipped);
            }
        }
    }

    report.annotations = builder.annotation_count();
    report.vertices = builder.vertex_count();

    let mut root = builder.finish();
    xml::indent(&mut root);
    let xml = xml::write_document(&root)?;

    Ok(ConversionOutput { xml, report })
}

/// Convert `input` to `output` with the given settings.
///
/// The document is fully built before anything touches `output`, and is then
/// written through a temporary file in the same directory, so a failed run
/// never leaves a partial file behind and never clobbers an existing one.
pub fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    settings: &ConversionSettings,
) -> Result<ConversionReport> {
    let input = input.as_ref();
    let output = output.as_ref();

    let geojson = fs::read_to_string(input).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ConversionError::InputNotFound {
            path: input.to_path_buf(),
            source,
        },
        _ => ConversionError::InputUnreadable {
            path: input.to_path_buf(),
            source,
        },
    })?;

    // The rename below would replace the source with its own conversion
    if is_same_file(input, output) {
        return Err(ConversionError::OutputIsInput {
            path: output.to_path_buf(),
        });
    }

    let ConversionOutput { xml, report } = convert_str(&geojson, settings)?;

    write_atomically(output, xml.as_bytes()).map_err(|source| ConversionError::OutputUnwritable {
        path: output.to_path_buf(),
        source,
    })?;

    log::info!(
        "wrote {} annotations ({} vertices, {} features skipped) to {}",
        report.annotations,
        report.vertices,
        report.skipped.len(),
        output.display()
    );

    Ok(report)
}

/// Convert `input` to `output` with default settings
pub fn convert(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<ConversionReport> {
    convert_file(input, output, &ConversionSettings::default())
}

fn is_same_file(input: &Path, output: &Path) -> bool {
    match (fs::canonicalize(input), fs::canonicalize(output)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Replacing a file keeps its permissions; a new file gets the umask default
fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut file = temp_file_in(&dir)?;
    if let Ok(existing) = fs::metadata(path) {
        file.as_file().set_permissions(existing.permissions())?;
    }
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(unix)]
fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    // Mode goes through open(2), so the process umask applies as for fs::write
    tempfile::Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEC_SQUARE: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[10.7, 20.2], [30.9, 20.2], [30.9, 40.1], [10.7, 40.1], [10.7, 20.2]]]
            },
            "properties": {"objectType": "annotation", "classification": {"name": "Nec", "color": [255, 200, 0]}}
        }]
    }"#;

    #[test]
    fn test_convert_str_exact_layout() {
        let output = convert_str(NEC_SQUARE, &ConversionSettings::default()).unwrap();

        let expected = concat!(
            "<Annotations MicronsPerPixel=\"0.503300\">\n",
            "  <Annotation Id=\"1\" Name=\"Nec\" ReadOnly=\"0\" NameReadOnly=\"0\" LineColorReadOnly=\"0\" ",
            "Incremental=\"0\" Type=\"4\" LineColor=\"16776960\" Visible=\"1\" Selected=\"0\" ",
            "MarkupImagePath=\"\" MacroName=\"\">\n",
            "    <Attributes>\n",
            "      <Attribute Name=\"Description\" Id=\"0\" Value=\"\" />\n",
            "    </Attributes>\n",
            "    <Regions>\n",
            "      <Region Id=\"1\" Type=\"0\" Zoom=\"0.182937\" Selected=\"1\" ImageLocation=\"\" ",
            "ImageFocus=\"-1\" LengthMicrons=\"5015.4\" AreaMicrons=\"964349.7\" Text=\"\" ",
            "NegativeROA=\"0\" InputRegionId=\"0\" Analyze=\"1\" DisplayId=\"1\">\n",
            "        <Vertices>\n",
            "          <Vertex X=\"10\" Y=\"20\" Z=\"0\" />\n",
            "          <Vertex X=\"30\" Y=\"20\" Z=\"0\" />\n",
            "          <Vertex X=\"30\" Y=\"40\" Z=\"0\" />\n",
            "          <Vertex X=\"10\" Y=\"40\" Z=\"0\" />\n",
            "          <Vertex X=\"10\" Y=\"20\" Z=\"0\" />\n",
            "        </Vertices>\n",
            "      </Region>\n",
            "      <RegionAttributeHeaders>\n",
            "        <AttributeHeader Id=\"9999\" Name=\"Region\" ColumnWidth=\"-1\" />\n",
            "        <AttributeHeader Id=\"9997\" Name=\"Length\" ColumnWidth=\"-1\" />\n",
            "        <AttributeHeader Id=\"9996\" Name=\"Area\" ColumnWidth=\"-1\" />\n",
            "        <AttributeHeader Id=\"9998\" Name=\"Text\" ColumnWidth=\"-1\" />\n",
            "        <AttributeHeader Id=\"1\" Name=\"Description\" ColumnWidth=\"-1\" />\n",
            "      </RegionAttributeHeaders>\n",
            "    </Regions>\n",
            "    <Plots />\n",
            "  </Annotation>\n",
            "</Annotations>\n",
        );
        assert_eq!(output.xml, expected);
        assert_eq!(output.report.annotations, 1);
        assert_eq!(output.report.vertices, 5);
        assert!(output.report.skipped.is_empty());
        assert!(output.report.unknown_classes.is_empty());
    }

    #[test]
    fn test_empty_collection() {
        let output = convert_str(r#"{"type": "FeatureCollection", "features": []}"#, &ConversionSettings::default())
            .unwrap();
        assert_eq!(output.xml, "<Annotations MicronsPerPixel=\"0.503300\" />");
        assert_eq!(output.report, ConversionReport::default());
    }

    #[test]
    fn test_unknown_classes_reported_once() {
        let geojson = r#"{"features": [
            {"geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1]]]}, "properties": {"classification": {"name": "Xyz"}}},
            {"geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1]]]}, "properties": {"classification": {"name": "Xyz"}}},
            {"geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1]]]}, "properties": {"classification": {"name": "Vt"}}}
        ]}"#;

        let output = convert_str(geojson, &ConversionSettings::default()).unwrap();
        assert_eq!(output.report.annotations, 3);
        assert_eq!(output.report.unknown_classes, vec!["Xyz".to_string()]);
    }

    #[test]
    fn test_malformed_input_propagates() {
        let err = convert_str(r#"{"type": "FeatureCollection"}"#, &ConversionSettings::default()).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::MalformedInput(MalformedInputError::MissingFeatures)
        ));
    }
}
