//! Imported page.

use image::GrayImage;
use ndarray::Array3;

use super::{Metadata, NodeId, Point, Region, XmlElement, XmlTree};
use crate::detect::PageFormat;
use crate::error::Result;
use crate::geometry;
use crate::render::mask;

/// A PAGE document loaded for further layout analysis.
///
/// Holds the parsed element tree together with the regions, page
/// dimensions and metadata derived from it at load time. Created by
/// [`PageParser`](crate::parser::PageParser) or the `import_*` functions.
#[derive(Debug, Clone)]
pub struct ImportedPage {
    source: String,
    format: PageFormat,
    tree: XmlTree,
    page_node: NodeId,
    width: u32,
    height: u32,
    regions: Vec<Region>,
    metadata: Metadata,
}

impl ImportedPage {
    pub(crate) fn new(
        source: String,
        format: PageFormat,
        tree: XmlTree,
        page_node: NodeId,
        (width, height): (u32, u32),
        regions: Vec<Region>,
        metadata: Metadata,
    ) -> Self {
        Self {
            source,
            format,
            tree,
            page_node,
            width,
            height,
            regions,
            metadata,
        }
    }

    /// Path of the imported document, or `<memory>`.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Detected PAGE schema.
    pub fn format(&self) -> &PageFormat {
        &self.format
    }

    /// Page width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Page height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Page dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Text regions in document order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Number of text regions.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// First region with the given id.
    pub fn region_by_id(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|region| region.id == id)
    }

    /// The metadata block.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Metadata comments, ending with the provenance note.
    pub fn metadata_comments(&self) -> &str {
        &self.metadata.comments
    }

    /// The underlying element tree.
    pub fn tree(&self) -> &XmlTree {
        &self.tree
    }

    /// Resolve a node reference held by a region or the metadata.
    pub fn node(&self, id: NodeId) -> Option<&XmlElement> {
        self.tree.get(id)
    }

    /// The `Page` element.
    pub fn page_node(&self) -> NodeId {
        self.page_node
    }

    /// Mask of all regions, shaped `(height, width, 3)` with values 0 or 1.
    ///
    /// Regions are drawn at the page's native size and then resampled to
    /// the requested size.
    pub fn all_regions_mask(&self, width: u32, height: u32) -> Array3<u8> {
        mask::regions_mask(&self.regions, self.width, self.height, width, height)
    }

    /// Same raster as [`all_regions_mask`](Self::all_regions_mask), as a
    /// single-channel image.
    pub fn all_regions_mask_image(&self, width: u32, height: u32) -> GrayImage {
        mask::regions_mask_image(&self.regions, self.width, self.height, width, height)
    }

    /// Find the first region covering more than 95% of the given polygon.
    ///
    /// `coords` uses PAGE `points` notation (`"x1,y1 x2,y2 ..."`) and needs
    /// at least three points. Returns `Ok(None)` when no region clears the
    /// threshold and [`Error::DegeneratePolygon`](crate::Error::DegeneratePolygon)
    /// when the polygon has no area.
    ///
    /// # Example
    ///
    /// ```no_run
    /// let page = pagexml::import_file("page.xml")?;
    /// if let Some(region) = page.find_matching_region("30,35 944,35 944,1575 30,1575")? {
    ///     println!("matched {}", region.id);
    /// }
    /// # Ok::<(), pagexml::Error>(())
    /// ```
    pub fn find_matching_region(&self, coords: &str) -> Result<Option<&Region>> {
        let query = geometry::parse_query(coords)?;
        self.find_matching_region_for_points(&query)
    }

    /// Like [`find_matching_region`](Self::find_matching_region) for parsed points.
    pub fn find_matching_region_for_points(&self, query: &[Point]) -> Result<Option<&Region>> {
        if query.len() < geometry::MIN_QUERY_POINTS {
            return Err(crate::Error::InvalidCoords(format!(
                "query polygon needs at least {} points, got {}",
                geometry::MIN_QUERY_POINTS,
                query.len()
            )));
        }

        if geometry::polygon_area(query) <= 0.0 {
            return Err(crate::Error::DegeneratePolygon);
        }

        for region in &self.regions {
            if geometry::is_match(query, &region.polygon)? {
                log::debug!("Query polygon matched region {}", region.id);
                return Ok(Some(region));
            }
        }

        Ok(None)
    }
}
