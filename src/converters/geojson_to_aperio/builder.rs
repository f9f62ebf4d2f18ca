//! Aperio annotation document construction
//!
//! Every accepted feature becomes one `Annotation` holding a single `Region`.
//! Flags, region metrics and attribute headers are fixed values that
//! ImageScope expects to find; only Id, Name, LineColor and the vertices
//! depend on the input.

use super::colors;
use super::parser::PolygonFeature;
use super::types::ConversionSettings;
use super::xml::Element;

/// `RegionAttributeHeaders` entries as (Id, Name)
const ATTRIBUTE_HEADERS: [(&str, &str); 5] = [
    ("9999", "Region"),
    ("9997", "Length"),
    ("9996", "Area"),
    ("9998", "Text"),
    ("1", "Description"),
];

/// Accumulates Annotation records under the `Annotations` root
pub struct AperioDocumentBuilder<'s> {
    settings: &'s ConversionSettings,
    root: Element,
    next_id: u32,
    vertex_count: usize,
}

impl<'s> AperioDocumentBuilder<'s> {
    pub fn new(settings: &'s ConversionSettings) -> Self {
        Self {
            settings,
            root: Element::new("Annotations").attr("MicronsPerPixel", settings.microns_per_pixel.as_str()),
            next_id: 1,
            vertex_count: 0,
        }
    }

    /// Append one annotation and return the Id it was given
    pub fn add_feature(&mut self, feature: &PolygonFeature) -> u32 {
        let id = self.next_id;
        self.next_id += 1;

        let line_color = colors::line_color_for(&feature.name);
        let id_str = id.to_string();

        let attributes = Element::new("Attributes").child(
            Element::new("Attribute")
                .attr("Name", "Description")
                .attr("Id", "0")
                .attr("Value", ""),
        );

        let vertices = feature
            .outer_ring
            .iter()
            .fold(Element::new("Vertices"), |vertices, &(x, y)| vertices.child(vertex(x, y)));
        self.vertex_count += vertices.children.len();

        let region = self.region(&id_str).child(vertices);

        let headers = ATTRIBUTE_HEADERS.iter().fold(
            Element::new("RegionAttributeHeaders"),
            |headers, (header_id, name)| {
                headers.child(
                    Element::new("AttributeHeader")
                        .attr("Id", *header_id)
                        .attr("Name", *name)
                        .attr("ColumnWidth", "-1"),
                )
            },
        );

        let annotation = Element::new("Annotation")
            .attr("Id", id_str.as_str())
            .attr("Name", feature.name.as_str())
            .attr("ReadOnly", "0")
            .attr("NameReadOnly", "0")
            .attr("LineColorReadOnly", "0")
            .attr("Incremental", "0")
            .attr("Type", "4")
            .attr("LineColor", line_color.to_string())
            .attr("Visible", "1")
            .attr("Selected", "0")
            .attr("MarkupImagePath", "")
            .attr("MacroName", "")
            .child(attributes)
            .child(Element::new("Regions").child(region).child(headers))
            .child(Element::new("Plots"));

        self.root.push(annotation);
        id
    }

    fn region(&self, id: &str) -> Element {
        Element::new("Region")
            .attr("Id", id)
            .attr("Type", "0")
            .attr("Zoom", self.settings.zoom.as_str())
            .attr("Selected", "1")
            .attr("ImageLocation", "")
            .attr("ImageFocus", "-1")
            .attr("LengthMicrons", self.settings.length_microns.as_str())
            .attr("AreaMicrons", self.settings.area_microns.as_str())
            .attr("Text", "")
            .attr("NegativeROA", "0")
            .attr("InputRegionId", "0")
            .attr("Analyze", "1")
            .attr("DisplayId", "1")
    }

    pub fn annotation_count(&self) -> usize {
        self.root.children.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn finish(self) -> Element {
        self.root
    }
}

fn vertex(x: i64, y: i64) -> Element {
    Element::new("Vertex")
        .attr("X", x.to_string())
        .attr("Y", y.to_string())
        .attr("Z", "0")
}
