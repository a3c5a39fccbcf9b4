//! XML output for imported pages.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{Error, Result};
use crate::model::{ImportedPage, NodeId, XmlNode, XmlTree};

/// Write the whole document, including the updated metadata comments.
pub fn to_xml(page: &ImportedPage) -> Result<String> {
    let tree = page.tree();
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(render_error)?;
    writer
        .write_event(Event::Text(BytesText::from_escaped("\n")))
        .map_err(render_error)?;
    write_element(&mut writer, tree, tree.root(), false)?;
    finish(writer)
}

/// Write one element subtree, e.g. the metadata block or a region.
///
/// The fragment root gets a namespace declaration when it is not the
/// document element, so the fragment stays self-describing.
pub fn node_to_xml(page: &ImportedPage, node: NodeId) -> Result<String> {
    let tree = page.tree();
    if tree.get(node).is_none() {
        return Err(Error::Render(format!("unknown node {}", node.index())));
    }
    let mut writer = Writer::new(Vec::new());
    write_element(&mut writer, tree, node, node != tree.root())?;
    finish(writer)
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    tree: &XmlTree,
    id: NodeId,
    declare_namespace: bool,
) -> Result<()> {
    let element = tree
        .get(id)
        .ok_or_else(|| Error::Render(format!("unknown node {}", id.index())))?;

    let mut start = BytesStart::new(element.name.as_str());
    if declare_namespace {
        if let Some(ns) = element.namespace.as_deref() {
            let key = match element.name.split_once(':') {
                Some((prefix, _)) => format!("xmlns:{}", prefix),
                None => "xmlns".to_string(),
            };
            if element.attribute(&key).is_none() {
                start.push_attribute((key.as_str(), ns));
            }
        }
    }
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(render_error);
    }

    writer.write_event(Event::Start(start)).map_err(render_error)?;
    for child in &element.children {
        match child {
            XmlNode::Element(child) => write_element(writer, tree, *child, false)?,
            XmlNode::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(render_error)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(render_error)
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String> {
    String::from_utf8(writer.into_inner()).map_err(|e| Error::Render(e.to_string()))
}

fn render_error(err: impl std::fmt::Display) -> Error {
    Error::Render(format!("XML write error: {}", err))
}
