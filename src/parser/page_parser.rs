//! PAGE document parser.

use std::io::Read;
use std::path::Path;

use crate::detect::PageFormat;
use crate::error::{Error, Result};
use crate::geometry::parse_points;
use crate::model::{
    append_provenance, parse_page_date, ImportedPage, Metadata, NodeId, Point, Region,
    XmlElement, XmlTree,
};

use super::options::{ErrorMode, ImportOptions};
use super::xml_reader::read_tree;

/// Document label used for in-memory input.
pub const MEMORY_SOURCE: &str = "<memory>";

/// PAGE document parser.
///
/// Holds the element tree of one document until [`parse`](Self::parse)
/// derives the regions, page dimensions and metadata from it.
pub struct PageParser {
    tree: XmlTree,
    format: PageFormat,
    source: String,
    options: ImportOptions,
}

impl PageParser {
    /// Open a PAGE file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ImportOptions::default())
    }

    /// Open a PAGE file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ImportOptions) -> Result<Self> {
        let path = path.as_ref();
        let source = path.display().to_string();

        let data = std::fs::read(path).map_err(|e| Error::from(e).in_document(&source))?;
        Self::from_bytes_labeled(&data, source, options)
    }

    /// Parse a PAGE document from a string.
    pub fn from_xml(xml: &str) -> Result<Self> {
        Self::from_xml_with_options(xml, ImportOptions::default())
    }

    /// Parse a PAGE document from a string with custom options.
    pub fn from_xml_with_options(xml: &str, options: ImportOptions) -> Result<Self> {
        Self::from_xml_labeled(xml, MEMORY_SOURCE.to_string(), options)
    }

    /// Parse a PAGE document from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ImportOptions::default())
    }

    /// Parse a PAGE document from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ImportOptions) -> Result<Self> {
        Self::from_bytes_labeled(data, MEMORY_SOURCE.to_string(), options)
    }

    /// Parse a PAGE document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ImportOptions::default())
    }

    /// Parse a PAGE document from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ImportOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .map_err(|e| Error::from(e).in_document(MEMORY_SOURCE))?;
        Self::from_bytes_with_options(&data, options)
    }

    fn from_bytes_labeled(data: &[u8], source: String, options: ImportOptions) -> Result<Self> {
        let xml = match std::str::from_utf8(data) {
            Ok(xml) => xml,
            Err(e) => return Err(Error::Encoding(e.to_string()).in_document(source)),
        };
        Self::from_xml_labeled(xml, source, options)
    }

    fn from_xml_labeled(xml: &str, source: String, options: ImportOptions) -> Result<Self> {
        let loaded = read_tree(xml).and_then(|tree| {
            let root = tree.get(tree.root()).ok_or(Error::UnknownFormat)?;
            let format = PageFormat::from_root(&root.local_name, root.namespace.as_deref())?;
            Ok((tree, format))
        });

        match loaded {
            Ok((tree, format)) => {
                log::debug!("Loaded {} ({}, {} elements)", source, format, tree.len());
                Ok(Self {
                    tree,
                    format,
                    source,
                    options,
                })
            }
            Err(e) => Err(e.in_document(source)),
        }
    }

    /// Detected PAGE schema.
    pub fn format(&self) -> &PageFormat {
        &self.format
    }

    /// Derive regions, dimensions and metadata and return the imported page.
    ///
    /// The provenance note is appended to the metadata comments here, once
    /// per import.
    pub fn parse(self) -> Result<ImportedPage> {
        let source = self.source.clone();
        self.parse_inner().map_err(|e| e.in_document(source))
    }

    fn parse_inner(mut self) -> Result<ImportedPage> {
        let root = self.tree.root();
        let page = self.child(root, "Page")?;
        let dimensions = self.dimensions(page)?;
        let regions = self.regions(page)?;
        let metadata = self.metadata(root)?;

        log::debug!(
            "Imported {}: {}x{} px, {} regions",
            self.source,
            dimensions.0,
            dimensions.1,
            regions.len()
        );

        Ok(ImportedPage::new(
            self.source,
            self.format,
            self.tree,
            page,
            dimensions,
            regions,
            metadata,
        ))
    }

    fn ns(&self) -> &str {
        &self.format.namespace
    }

    fn element(&self, id: NodeId) -> Result<&XmlElement> {
        self.tree
            .get(id)
            .ok_or_else(|| Error::MissingElement(format!("node {}", id.index())))
    }

    fn child(&self, parent: NodeId, local_name: &str) -> Result<NodeId> {
        self.tree
            .find_child(parent, self.ns(), local_name)
            .ok_or_else(|| Error::MissingElement(local_name.to_string()))
    }

    fn required_attribute(&self, id: NodeId, name: &str) -> Result<&str> {
        let element = self.element(id)?;
        element
            .attribute(name)
            .ok_or_else(|| Error::MissingAttribute {
                element: element.local_name.clone(),
                attribute: name.to_string(),
            })
    }

    fn integer_attribute(&self, id: NodeId, name: &str) -> Result<i64> {
        let value = self.required_attribute(id, name)?;
        value.trim().parse::<i64>().map_err(|_| Error::InvalidAttribute {
            element: self.tree.get(id).map(|e| e.local_name.clone()).unwrap_or_default(),
            attribute: name.to_string(),
            value: value.to_string(),
        })
    }

    fn dimensions(&self, page: NodeId) -> Result<(u32, u32)> {
        let dimension = |name: &str| -> Result<u32> {
            let value = self.integer_attribute(page, name)?;
            u32::try_from(value).map_err(|_| Error::InvalidAttribute {
                element: "Page".to_string(),
                attribute: name.to_string(),
                value: value.to_string(),
            })
        };
        Ok((dimension("imageWidth")?, dimension("imageHeight")?))
    }

    fn regions(&self, page: NodeId) -> Result<Vec<Region>> {
        let nodes = self.tree.descendants(page, self.ns(), "TextRegion");
        let mut regions = Vec::with_capacity(nodes.len());

        for node in nodes {
            match self.region(node) {
                Ok(region) => regions.push(region),
                Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                    log::warn!("Skipping text region in {}: {}", self.source, e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(regions)
    }

    fn region(&self, node: NodeId) -> Result<Region> {
        let id = self.required_attribute(node, "id")?.to_string();

        let region_type = match self.required_attribute(node, "type") {
            Ok(value) => value.to_string(),
            Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                log::warn!("Region {} in {}: {}", id, self.source, e);
                String::new()
            }
            Err(e) => return Err(e),
        };

        let coords = self.child(node, "Coords")?;
        let polygon = self.polygon(coords)?;

        Ok(Region {
            id,
            polygon,
            region_type,
            text: self.text_equiv(node),
            node,
        })
    }

    /// Read a `Coords` element: the `points` attribute, or legacy `Point`
    /// children when the attribute is absent.
    fn polygon(&self, coords: NodeId) -> Result<Vec<Point>> {
        if let Some(points) = self.tree.attribute(coords, "points") {
            return parse_points(points);
        }

        let legacy = self.tree.find_children(coords, self.ns(), "Point");
        if legacy.is_empty() {
            return Err(Error::MissingAttribute {
                element: "Coords".to_string(),
                attribute: "points".to_string(),
            });
        }

        legacy
            .into_iter()
            .map(|point| {
                let x = self.integer_attribute(point, "x")?;
                let y = self.integer_attribute(point, "y")?;
                let to_i32 = |v: i64| {
                    i32::try_from(v)
                        .map_err(|_| Error::InvalidCoords(format!("{} is out of range", v)))
                };
                Ok(Point::new(to_i32(x)?, to_i32(y)?))
            })
            .collect()
    }

    fn text_equiv(&self, region: NodeId) -> Option<String> {
        let equiv = self.tree.find_child(region, self.ns(), "TextEquiv")?;
        let unicode = self.tree.find_child(equiv, self.ns(), "Unicode")?;
        Some(self.tree.text(unicode))
    }

    fn metadata(&mut self, root: NodeId) -> Result<Metadata> {
        let metadata = self.child(root, "Metadata")?;

        let comments = match self.child(metadata, "Comments") {
            Ok(id) => id,
            Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                log::warn!("{} in {}, creating it", e, self.source);
                let element = self.new_element("Comments");
                self.tree.append_element(metadata, element)
            }
            Err(e) => return Err(e),
        };

        let updated = append_provenance(&self.tree.text(comments), &self.options.provenance_note);
        self.tree.set_text(comments, updated.clone());

        let text_of = |name: &str| {
            self.tree
                .find_child(metadata, self.ns(), name)
                .map(|id| self.tree.text(id).trim().to_string())
        };

        Ok(Metadata {
            creator: text_of("Creator").filter(|s| !s.is_empty()),
            created: text_of("Created").and_then(|s| parse_page_date(&s)),
            last_change: text_of("LastChange").and_then(|s| parse_page_date(&s)),
            comments: updated,
            node: metadata,
        })
    }

    /// New element in the document's namespace, reusing the root's prefix.
    fn new_element(&self, local_name: &str) -> XmlElement {
        let prefix = self
            .tree
            .get(self.tree.root())
            .and_then(|root| root.name.split_once(':').map(|(prefix, _)| prefix.to_string()));
        let name = match prefix {
            Some(prefix) => format!("{}:{}", prefix, local_name),
            None => local_name.to_string(),
        };
        XmlElement::new(name, Some(self.format.namespace.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::PAGE_NAMESPACE_2013;
    use crate::model::PROVENANCE_NOTE;

    fn page_xml(metadata: &str, regions: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<PcGts xmlns="{ns}">
  <Metadata>{metadata}</Metadata>
  <Page imageFilename="scan.tif" imageWidth="200" imageHeight="100">{regions}</Page>
</PcGts>"#,
            ns = PAGE_NAMESPACE_2013,
            metadata = metadata,
            regions = regions
        )
    }

    const META: &str = "<Creator>scanner</Creator><Created>2016-09-20T11:09:27</Created><Comments>original</Comments>";

    fn region(id: &str, points: &str) -> String {
        format!(
            r#"<TextRegion id="{}" type="paragraph"><Coords points="{}"/><TextEquiv><Unicode>text {}</Unicode></TextEquiv></TextRegion>"#,
            id, points, id
        )
    }

    #[test]
    fn test_parse_basic() {
        let xml = page_xml(META, &region("r1", "0,0 10,0 10,10 0,10"));
        let page = PageParser::from_xml(&xml).unwrap().parse().unwrap();

        assert_eq!(page.dimensions(), (200, 100));
        assert_eq!(page.source(), MEMORY_SOURCE);
        assert_eq!(page.regions().len(), 1);

        let r = &page.regions()[0];
        assert_eq!(r.id, "r1");
        assert_eq!(r.region_type, "paragraph");
        assert_eq!(r.text.as_deref(), Some("text r1"));
        assert_eq!(r.polygon[2], Point::new(10, 10));
        assert_eq!(page.node(r.node).unwrap().local_name, "TextRegion");
    }

    #[test]
    fn test_parse_metadata() {
        let xml = page_xml(META, "");
        let page = PageParser::from_xml(&xml).unwrap().parse().unwrap();
        let meta = page.metadata();

        assert_eq!(meta.creator.as_deref(), Some("scanner"));
        assert!(meta.created.is_some());
        assert!(meta.last_change.is_none());
        assert!(meta.comments.starts_with("original\n\t\t\t"));
        assert!(page.metadata_comments().ends_with(PROVENANCE_NOTE));

        // The tree carries the updated comments too
        let comments = page
            .tree()
            .find_child(meta.node, &page.format().namespace, "Comments")
            .unwrap();
        assert_eq!(page.tree().text(comments), meta.comments);
    }

    #[test]
    fn test_custom_provenance_note() {
        let xml = page_xml(META, "");
        let options = ImportOptions::new().with_provenance_note("Checked by hand");
        let page = PageParser::from_xml_with_options(&xml, options)
            .unwrap()
            .parse()
            .unwrap();
        assert!(page.metadata_comments().ends_with("Checked by hand"));
    }

    #[test]
    fn test_nested_regions_in_document_order() {
        let inner = region("inner", "1,1 2,1 2,2");
        let outer = format!(
            r#"<TextRegion id="outer" type="paragraph"><Coords points="0,0 9,0 9,9"/>{}</TextRegion>"#,
            inner
        );
        let xml = page_xml(META, &format!("{}{}", outer, region("last", "5,5 6,5 6,6")));
        let page = PageParser::from_xml(&xml).unwrap().parse().unwrap();

        let ids: Vec<&str> = page.regions().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["outer", "inner", "last"]);
        assert_eq!(page.regions()[0].text, None);
    }

    #[test]
    fn test_legacy_point_children() {
        let legacy = r#"<TextRegion id="old" type="heading"><Coords><Point x="1" y="2"/><Point x="5" y="2"/><Point x="5" y="8"/></Coords></TextRegion>"#;
        let page = PageParser::from_xml(&page_xml(META, legacy))
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(
            page.regions()[0].polygon,
            vec![Point::new(1, 2), Point::new(5, 2), Point::new(5, 8)]
        );
    }

    #[test]
    fn test_missing_coords_strict_and_lenient() {
        let broken = r#"<TextRegion id="bad" type="paragraph"/>"#;
        let xml = page_xml(META, &format!("{}{}", broken, region("ok", "0,0 4,0 4,4")));

        let err = PageParser::from_xml(&xml).unwrap().parse().unwrap_err();
        assert!(err.to_string().starts_with(MEMORY_SOURCE));
        assert!(matches!(err.root(), Error::MissingElement(name) if name == "Coords"));

        let page = PageParser::from_xml_with_options(&xml, ImportOptions::new().lenient())
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(page.regions().len(), 1);
        assert_eq!(page.regions()[0].id, "ok");
    }

    #[test]
    fn test_missing_type_lenient() {
        let untyped = r#"<TextRegion id="u"><Coords points="0,0 4,0 4,4"/></TextRegion>"#;
        let xml = page_xml(META, untyped);

        let err = PageParser::from_xml(&xml).unwrap().parse().unwrap_err();
        assert!(matches!(err.root(), Error::MissingAttribute { attribute, .. } if attribute == "type"));

        let page = PageParser::from_xml_with_options(&xml, ImportOptions::new().lenient())
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(page.regions()[0].region_type, "");
    }

    #[test]
    fn test_missing_comments() {
        let xml = page_xml("<Creator>x</Creator>", "");
        let err = PageParser::from_xml(&xml).unwrap().parse().unwrap_err();
        assert!(matches!(err.root(), Error::MissingElement(name) if name == "Comments"));

        let page = PageParser::from_xml_with_options(&xml, ImportOptions::new().lenient())
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(
            page.metadata_comments(),
            format!("\n\t\t\t{}", PROVENANCE_NOTE)
        );
    }

    #[test]
    fn test_invalid_dimensions() {
        let xml = page_xml(META, "").replace(r#"imageWidth="200""#, r#"imageWidth="wide""#);
        let err = PageParser::from_xml(&xml).unwrap().parse().unwrap_err();
        assert!(matches!(err.root(), Error::InvalidAttribute { value, .. } if value == "wide"));

        let xml = page_xml(META, "").replace(r#" imageHeight="100""#, "");
        let err = PageParser::from_xml(&xml).unwrap().parse().unwrap_err();
        assert!(matches!(err.root(), Error::MissingAttribute { .. }));

        let xml = page_xml(META, "").replace(r#"imageHeight="100""#, r#"imageHeight="-1""#);
        assert!(PageParser::from_xml(&xml).unwrap().parse().is_err());
    }

    #[test]
    fn test_not_page_xml() {
        let err = PageParser::from_xml("<html/>").err().unwrap();
        assert!(matches!(err.root(), Error::UnknownFormat));

        let err = PageParser::from_xml("<PcGts").err().unwrap();
        assert!(matches!(err.root(), Error::Xml(_)));

        let err = PageParser::from_bytes(&[0xC3, 0x28]).err().unwrap();
        assert!(matches!(err.root(), Error::Encoding(_)));
    }

    #[test]
    fn test_prefixed_document() {
        let xml = format!(
            r#"<pc:PcGts xmlns:pc="{}"><pc:Metadata/><pc:Page imageWidth="5" imageHeight="5"/></pc:PcGts>"#,
            PAGE_NAMESPACE_2013
        );
        let page = PageParser::from_xml_with_options(&xml, ImportOptions::new().lenient())
            .unwrap()
            .parse()
            .unwrap();
        let comments = page
            .tree()
            .find_child(page.metadata().node, PAGE_NAMESPACE_2013, "Comments")
            .unwrap();
        assert_eq!(page.node(comments).unwrap().name, "pc:Comments");
    }
}
