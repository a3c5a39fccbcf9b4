//! Owned XML element tree.
//!
//! Elements live in an arena and are addressed by [`NodeId`]. Regions and
//! metadata keep `NodeId`s as non-owning references back into the tree they
//! were read from.

/// Index of an element inside an [`XmlTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the element in the arena (document order).
    pub fn index(self) -> usize {
        self.0
    }
}

/// Child of an element: another element or a run of character data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// Child element
    Element(NodeId),
    /// Unescaped text
    Text(String),
}

/// A single element.
#[derive(Debug, Clone)]
pub struct XmlElement {
    /// Qualified name as written in the source (`pc:Page`, `Page`)
    pub name: String,

    /// Local part of the name
    pub local_name: String,

    /// Resolved namespace URI, if bound
    pub namespace: Option<String>,

    /// Attributes in document order, keyed by their qualified name
    pub attributes: Vec<(String, String)>,

    /// Child nodes in document order
    pub children: Vec<XmlNode>,

    /// Parent element (`None` for the root)
    pub parent: Option<NodeId>,
}

impl XmlElement {
    /// Create an element with no attributes and no children.
    pub fn new(name: impl Into<String>, namespace: Option<String>) -> Self {
        let name = name.into();
        let local_name = match name.rsplit_once(':') {
            Some((_, local)) => local.to_string(),
            None => name.clone(),
        };
        Self {
            name,
            local_name,
            namespace,
            attributes: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    /// Look up an attribute value by qualified name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set or replace an attribute.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Check the element's namespace and local name.
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.local_name == local_name && self.namespace.as_deref() == Some(namespace)
    }

    /// Child element ids in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(id) => Some(*id),
            XmlNode::Text(_) => None,
        })
    }

    /// Concatenated direct text content.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                XmlNode::Text(text) => Some(text.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }
}

/// A parsed XML document.
#[derive(Debug, Clone)]
pub struct XmlTree {
    elements: Vec<XmlElement>,
    root: NodeId,
}

impl XmlTree {
    /// Create a tree holding only a root element.
    pub fn new(root: XmlElement) -> Self {
        Self {
            elements: vec![root],
            root: NodeId(0),
        }
    }

    /// The document element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of elements in the tree.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the root element has no children.
    pub fn is_empty(&self) -> bool {
        self.get(self.root)
            .map(|root| root.children.is_empty())
            .unwrap_or(true)
    }

    /// Get an element by id.
    pub fn get(&self, id: NodeId) -> Option<&XmlElement> {
        self.elements.get(id.0)
    }

    /// Get a mutable element by id.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut XmlElement> {
        self.elements.get_mut(id.0)
    }

    /// Attribute of an element, if both exist.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id).and_then(|element| element.attribute(name))
    }

    /// Direct text content of an element (empty if the id is unknown).
    pub fn text(&self, id: NodeId) -> String {
        self.get(id).map(XmlElement::text).unwrap_or_default()
    }

    /// Replace the direct text content of an element.
    ///
    /// Existing text runs are removed; the new text becomes the first child.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(element) = self.get_mut(id) {
            element
                .children
                .retain(|child| matches!(child, XmlNode::Element(_)));
            element.children.insert(0, XmlNode::Text(text.into()));
        }
    }

    /// Append a child element and return its id.
    pub fn append_element(&mut self, parent: NodeId, mut element: XmlElement) -> NodeId {
        let id = NodeId(self.elements.len());
        element.parent = Some(parent);
        self.elements.push(element);
        if let Some(parent) = self.elements.get_mut(parent.0) {
            parent.children.push(XmlNode::Element(id));
        }
        id
    }

    /// Append a text run to an element.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) {
        if let Some(parent) = self.get_mut(parent) {
            match parent.children.last_mut() {
                Some(XmlNode::Text(existing)) => existing.push_str(&text.into()),
                _ => parent.children.push(XmlNode::Text(text.into())),
            }
        }
    }

    /// First direct child with the given namespace and local name.
    pub fn find_child(&self, id: NodeId, namespace: &str, local_name: &str) -> Option<NodeId> {
        self.get(id)?
            .child_elements()
            .find(|child| self.is(*child, namespace, local_name))
    }

    /// All direct children with the given namespace and local name.
    pub fn find_children(&self, id: NodeId, namespace: &str, local_name: &str) -> Vec<NodeId> {
        match self.get(id) {
            Some(element) => element
                .child_elements()
                .filter(|child| self.is(*child, namespace, local_name))
                .collect(),
            None => Vec::new(),
        }
    }

    /// All descendants (excluding `id` itself) with the given name, in
    /// document order.
    pub fn descendants(&self, id: NodeId, namespace: &str, local_name: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = match self.get(id) {
            Some(element) => element.child_elements().collect(),
            None => return found,
        };
        stack.reverse();

        while let Some(current) = stack.pop() {
            if self.is(current, namespace, local_name) {
                found.push(current);
            }
            if let Some(element) = self.get(current) {
                let mut children: Vec<NodeId> = element.child_elements().collect();
                children.reverse();
                stack.extend(children);
            }
        }

        found
    }

    fn is(&self, id: NodeId, namespace: &str, local_name: &str) -> bool {
        self.get(id)
            .map(|element| element.is(namespace, local_name))
            .unwrap_or(false)
    }
}
