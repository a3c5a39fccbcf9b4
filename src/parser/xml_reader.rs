//! Build an [`XmlTree`] from XML text with quick-xml.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use crate::error::{Error, Result};
use crate::model::{NodeId, XmlElement, XmlTree};

/// Parse a complete XML document into an element tree.
///
/// Comments, processing instructions and the declaration are dropped;
/// text (including whitespace) and CDATA are kept as text children.
pub fn read_tree(xml: &str) -> Result<XmlTree> {
    let mut reader = NsReader::from_str(xml);
    let mut tree: Option<XmlTree> = None;
    let mut stack: Vec<NodeId> = Vec::new();

    loop {
        match reader.read_resolved_event() {
            Ok((ns, Event::Start(e))) => {
                let element = to_element(&ns, &e)?;
                let id = open(&mut tree, &stack, element)?;
                stack.push(id);
            }
            Ok((ns, Event::Empty(e))) => {
                let element = to_element(&ns, &e)?;
                open(&mut tree, &stack, element)?;
            }
            Ok((_, Event::End(_))) => {
                stack.pop();
            }
            Ok((_, Event::Text(e))) => {
                if let (Some(tree), Some(&parent)) = (tree.as_mut(), stack.last()) {
                    let text = e.unescape()?;
                    tree.append_text(parent, text.into_owned());
                }
            }
            Ok((_, Event::CData(e))) => {
                if let (Some(tree), Some(&parent)) = (tree.as_mut(), stack.last()) {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    tree.append_text(parent, text);
                }
            }
            Ok((_, Event::Eof)) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(Error::Xml(format!(
                    "error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
    }

    if !stack.is_empty() {
        return Err(Error::Xml("unexpected end of document".to_string()));
    }
    tree.ok_or_else(|| Error::Xml("document has no root element".to_string()))
}

fn open(tree: &mut Option<XmlTree>, stack: &[NodeId], element: XmlElement) -> Result<NodeId> {
    match (tree.as_mut(), stack.last()) {
        (Some(tree), Some(&parent)) => Ok(tree.append_element(parent, element)),
        (Some(_), None) => Err(Error::Xml(format!(
            "unexpected second root element <{}>",
            element.name
        ))),
        (None, _) => {
            let new_tree = XmlTree::new(element);
            let root = new_tree.root();
            *tree = Some(new_tree);
            Ok(root)
        }
    }
}

fn to_element(ns: &ResolveResult, start: &BytesStart) -> Result<XmlElement> {
    let namespace = match ns {
        ResolveResult::Bound(Namespace(uri)) => Some(String::from_utf8_lossy(uri).into_owned()),
        _ => None,
    };
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = XmlElement::new(name, namespace);

    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_tree_namespaces() {
        let xml = r#"<?xml version="1.0"?>
<root xmlns="urn:a" xmlns:b="urn:b">
  <child id="1">text &amp; more</child>
  <b:other/>
</root>"#;
        let tree = read_tree(xml).unwrap();
        let root = tree.get(tree.root()).unwrap();
        assert_eq!(root.local_name, "root");
        assert_eq!(root.namespace.as_deref(), Some("urn:a"));

        let child = tree.find_child(tree.root(), "urn:a", "child").unwrap();
        assert_eq!(tree.attribute(child, "id"), Some("1"));
        assert_eq!(tree.text(child), "text & more");

        let other = tree.find_child(tree.root(), "urn:b", "other").unwrap();
        assert_eq!(tree.get(other).unwrap().name, "b:other");
    }

    #[test]
    fn test_read_tree_keeps_whitespace_and_cdata() {
        let tree = read_tree("<a> x <![CDATA[<y>]]></a>").unwrap();
        assert_eq!(tree.text(tree.root()), " x <y>");
    }

    #[test]
    fn test_read_tree_unescapes_attributes() {
        let tree = read_tree(r#"<a title="&lt;b&gt;"/>"#).unwrap();
        assert_eq!(tree.attribute(tree.root(), "title"), Some("<b>"));
    }

    #[test]
    fn test_read_tree_malformed() {
        assert!(matches!(read_tree("<a><b></a>"), Err(Error::Xml(_))));
        assert!(matches!(read_tree("<a>"), Err(Error::Xml(_))));
        assert!(matches!(read_tree(""), Err(Error::Xml(_))));
        assert!(matches!(read_tree("<a/><b/>"), Err(Error::Xml(_))));
    }
}
