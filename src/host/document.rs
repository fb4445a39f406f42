//! In-memory SVG document
//!
//! A small retained element tree that implements [`SceneGraph`]. The demo
//! renders waves out of it every repaint, and snapshots of it can be
//! exported as standalone SVG files.
//!
//! Layout is deliberately minimal: a node's box is its own explicit size if
//! one was set, otherwise its parent's (every wave layer fills its container).
//!
//! Changing a size queues a notification for every registered resize
//! listener. The host drains them with [`SvgDocument::take_resized`] and
//! hands each id to the widgets, the same way frame handles are delivered.

use std::path::Path as FilePath;

use super::traits::{ListenerId, SceneGraph};
use crate::error::{SceneError, WaveError};
use crate::wave::{Size, WavePath};

/// Handle to a node of an [`SvgDocument`]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct Element {
    namespace: Option<String>,
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    size: Option<Size>,
    /// Geometry last written through `set_path`
    path: Option<WavePath>,
}

impl Element {
    fn new(namespace: Option<&str>, tag: &str) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            tag: tag.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
            parent: None,
            size: None,
            path: None,
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A retained document of elements
#[derive(Debug)]
pub struct SvgDocument {
    /// Node arena; destroyed nodes leave a hole so ids are never reused
    nodes: Vec<Option<Element>>,
    root: NodeId,
    listeners: Vec<ListenerId>,
    next_listener: u64,
    /// Listeners owed a resize notification
    resized: Vec<ListenerId>,
}

impl SvgDocument {
    /// Create a document whose root (`body`) has the given size
    pub fn new(size: Size) -> Self {
        let mut body = Element::new(None, "body");
        body.size = Some(size);
        Self {
            nodes: vec![Some(body)],
            root: NodeId(0),
            listeners: Vec::new(),
            next_listener: 0,
            resized: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Add a plain (non-SVG) element under `parent`, optionally with an id
    pub fn insert(&mut self, parent: NodeId, tag: &str, id: Option<&str>) -> Result<NodeId, SceneError> {
        self.element(parent)?;
        let node = self.alloc(Element::new(None, tag));
        if let Some(id) = id {
            self.set_attribute(node, "id", id)?;
        }
        self.append_child(parent, node)?;
        Ok(node)
    }

    /// Give `node` an explicit box and notify resize listeners if it changed
    pub fn set_size(&mut self, node: NodeId, size: Size) -> Result<(), SceneError> {
        let element = self.element_mut(node)?;
        if element.size == Some(size) {
            return Ok(());
        }
        element.size = Some(size);

        for id in &self.listeners {
            if !self.resized.contains(id) {
                self.resized.push(*id);
            }
        }
        Ok(())
    }

    /// Take every pending resize notification for delivery
    pub fn take_resized(&mut self) -> Vec<ListenerId> {
        std::mem::take(&mut self.resized)
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).ok()?.attribute(name)
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).ok().map(|e| e.tag.as_str())
    }

    /// Geometry of a path node
    pub fn path(&self, node: NodeId) -> Option<&WavePath> {
        self.element(node).ok()?.path.as_ref()
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.element(node).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.element(node).ok()?.parent
    }

    /// Whether `node` can be reached from the root
    pub fn is_connected(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.root {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Number of live nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn resize_listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Remove `node` and all of its descendants from the document for good
    pub fn destroy(&mut self, node: NodeId) {
        if node == self.root {
            return;
        }
        if let Some(parent) = self.parent(node) {
            if let Ok(element) = self.element_mut(parent) {
                element.children.retain(|c| *c != node);
            }
        }
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(element) = self.nodes.get_mut(id.0).and_then(Option::take) {
                stack.extend(element.children);
            }
        }
    }

    /// Serialize `node` and its subtree as XML
    pub fn to_markup(&self, node: NodeId) -> Result<String, SceneError> {
        let mut out = String::new();
        self.write_node(node, None, &[], &mut out)?;
        Ok(out)
    }

    /// Serialize an `<svg>` node as a standalone SVG document.
    ///
    /// Relative sizes are replaced by the measured box so the file renders
    /// the same outside of its container. The result is parsed back to make
    /// sure it is valid SVG.
    pub fn export_svg(&self, svg: NodeId) -> Result<String, WaveError> {
        let size = self.bounding_box(svg)?;
        let overrides = [
            ("width", size.width.to_string()),
            ("height", size.height.to_string()),
            ("viewBox", format!("0 0 {} {}", size.width, size.height)),
        ];

        let mut markup = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        self.write_node(svg, None, &overrides, &mut markup)?;

        usvg::Tree::from_str(&markup, &usvg::Options::default())
            .map_err(|e| WaveError::InvalidSvg(e.to_string()))?;

        Ok(markup)
    }

    /// Export `svg` and write it to `path`
    pub fn write_snapshot(&self, svg: NodeId, path: impl AsRef<FilePath>) -> Result<(), WaveError> {
        let markup = self.export_svg(svg)?;
        std::fs::write(path.as_ref(), markup)?;
        log::info!("Wrote snapshot to {}", path.as_ref().display());
        Ok(())
    }

    fn alloc(&mut self, element: Element) -> NodeId {
        self.nodes.push(Some(element));
        NodeId(self.nodes.len() - 1)
    }

    fn element(&self, node: NodeId) -> Result<&Element, SceneError> {
        self.nodes
            .get(node.0)
            .and_then(Option::as_ref)
            .ok_or(SceneError::UnknownNode(node.0))
    }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut Element, SceneError> {
        self.nodes
            .get_mut(node.0)
            .and_then(Option::as_mut)
            .ok_or(SceneError::UnknownNode(node.0))
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn write_node(
        &self,
        node: NodeId,
        parent_namespace: Option<&str>,
        overrides: &[(&str, String)],
        out: &mut String,
    ) -> Result<(), SceneError> {
        let element = self.element(node)?;

        out.push('<');
        out.push_str(&element.tag);

        let namespace = element.namespace.as_deref();
        if let Some(ns) = namespace {
            if parent_namespace != Some(ns) {
                push_attribute(out, "xmlns", ns);
            }
        }

        for (name, value) in &element.attributes {
            if overrides.iter().any(|(n, _)| *n == name.as_str()) {
                continue;
            }
            push_attribute(out, name, value);
        }
        for (name, value) in overrides {
            push_attribute(out, name, value);
        }

        if element.children.is_empty() {
            out.push_str("/>");
            return Ok(());
        }

        out.push('>');
        for child in &element.children {
            self.write_node(*child, namespace, &[], out)?;
        }
        out.push_str("</");
        out.push_str(&element.tag);
        out.push('>');
        Ok(())
    }
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
}

impl SceneGraph for SvgDocument {
    type Node = NodeId;

    /// Supports `#id` and bare tag names, matched in document order
    fn query(&self, selector: &str) -> Option<NodeId> {
        let selector = selector.trim();
        let matches = |element: &Element| match selector.strip_prefix('#') {
            Some(id) => element.attribute("id") == Some(id),
            None => element.tag == selector,
        };

        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let element = self.element(id).ok()?;
            if matches(element) {
                return Some(id);
            }
            stack.extend(element.children.iter().rev());
        }
        None
    }

    fn create_element(&mut self, namespace: &str, tag: &str) -> Result<NodeId, SceneError> {
        if !valid_attribute_name(tag) {
            return Err(SceneError::InvalidAttribute(tag.to_string()));
        }
        Ok(self.alloc(Element::new(Some(namespace), tag)))
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), SceneError> {
        if !valid_attribute_name(name) {
            return Err(SceneError::InvalidAttribute(name.to_string()));
        }
        let element = self.element_mut(node)?;
        match element.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => element.attributes.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.element(parent)?;
        self.element(child)?;
        if child == self.root || self.is_inclusive_ancestor(child, parent) {
            return Err(SceneError::HierarchyRequest {
                parent: parent.0,
                child: child.0,
            });
        }

        if let Some(old_parent) = self.parent(child) {
            self.element_mut(old_parent)?.children.retain(|c| *c != child);
        }
        self.element_mut(child)?.parent = Some(parent);
        self.element_mut(parent)?.children.push(child);
        Ok(())
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if self.parent(child) != Some(parent) {
            return Err(SceneError::NotAChild {
                parent: parent.0,
                child: child.0,
            });
        }
        self.element_mut(parent)?.children.retain(|c| *c != child);
        self.element_mut(child)?.parent = None;
        Ok(())
    }

    fn bounding_box(&self, node: NodeId) -> Result<Size, SceneError> {
        if !self.is_connected(node) {
            self.element(node)?;
            return Err(SceneError::Detached(node.0));
        }
        let mut current = Some(node);
        while let Some(id) = current {
            let element = self.element(id)?;
            if let Some(size) = element.size {
                return Ok(size);
            }
            current = element.parent;
        }
        Ok(Size::default())
    }

    fn set_path(&mut self, node: NodeId, path: &WavePath) -> Result<(), SceneError> {
        self.set_attribute(node, "d", &path.to_svg_data())?;
        self.element_mut(node)?.path = Some(path.clone());
        Ok(())
    }

    fn watch_resize(&mut self) -> Option<ListenerId> {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(id);
        Some(id)
    }

    fn unwatch_resize(&mut self, id: ListenerId) {
        self.listeners.retain(|l| *l != id);
        self.resized.retain(|l| *l != id);
    }

    /// Only detached nodes are destroyed
    fn discard(&mut self, node: NodeId) {
        if !self.is_connected(node) {
            self.destroy(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::traits::{create_node, SVG_NS};
    use crate::wave::{build_path, PathPoint, Position};

    fn document() -> (SvgDocument, NodeId) {
        let mut doc = SvgDocument::new(Size::new(1024.0, 768.0));
        let root = doc.root();
        let section = doc.insert(root, "section", Some("hero")).unwrap();
        doc.set_size(section, Size::new(800.0, 200.0)).unwrap();
        (doc, section)
    }

    #[test]
    fn test_query() {
        let (mut doc, section) = document();
        let inner = doc.insert(section, "div", Some("inner")).unwrap();

        assert_eq!(doc.query("#hero"), Some(section));
        assert_eq!(doc.query("#inner"), Some(inner));
        assert_eq!(doc.query("div"), Some(inner));
        assert_eq!(doc.query("#does-not-exist"), None);
    }

    #[test]
    fn test_bounding_box_inherits() {
        let (mut doc, section) = document();
        let svg = doc.create_element(SVG_NS, "svg").unwrap();
        assert_eq!(doc.bounding_box(svg), Err(SceneError::Detached(svg.index())));

        doc.append_child(section, svg).unwrap();
        assert_eq!(doc.bounding_box(svg), Ok(Size::new(800.0, 200.0)));
        assert_eq!(doc.bounding_box(doc.root()), Ok(Size::new(1024.0, 768.0)));
    }

    #[test]
    fn test_append_rejects_cycles() {
        let (mut doc, section) = document();
        let child = doc.insert(section, "div", None).unwrap();
        assert!(matches!(
            doc.append_child(child, section),
            Err(SceneError::HierarchyRequest { .. })
        ));
        assert!(doc.append_child(child, child).is_err());
    }

    #[test]
    fn test_remove_and_destroy() {
        let (mut doc, section) = document();
        let child = doc.insert(section, "div", None).unwrap();

        assert!(doc.remove_child(doc.root(), child).is_err());
        doc.remove_child(section, child).unwrap();
        assert!(!doc.is_connected(child));

        doc.append_child(section, child).unwrap();
        let before = doc.node_count();
        doc.destroy(section);
        assert_eq!(doc.node_count(), before - 2);
        assert_eq!(
            doc.set_attribute(child, "id", "gone"),
            Err(SceneError::UnknownNode(child.index()))
        );
        assert!(doc.children(doc.root()).is_empty());
    }

    #[test]
    fn test_invalid_attribute_name() {
        let (mut doc, section) = document();
        assert!(doc.set_attribute(section, "bad name", "x").is_err());
        assert!(doc.set_attribute(section, "", "x").is_err());
    }

    #[test]
    fn test_markup_escapes_and_namespaces() {
        let (mut doc, section) = document();
        let svg = create_node(&mut doc, "svg", &[("version", "1.1")]).unwrap();
        let path = create_node(&mut doc, "path", &[("fill", "a\"b&c"), ("fillRule", "evenodd")]).unwrap();
        doc.append_child(svg, path).unwrap();
        doc.append_child(section, svg).unwrap();

        let markup = doc.to_markup(svg).unwrap();
        assert_eq!(
            markup,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\">\
             <path fill=\"a&quot;b&amp;c\" fill-rule=\"evenodd\"/></svg>"
        );
    }

    #[test]
    fn test_export_is_valid_svg() {
        let (mut doc, section) = document();
        let svg = create_node(&mut doc, "svg", &[("width", "100%"), ("height", "100%"), ("fill", "none")]).unwrap();
        let path = create_node(&mut doc, "path", &[("fill", "#3366ff")]).unwrap();
        doc.append_child(svg, path).unwrap();
        doc.append_child(section, svg).unwrap();

        let size = Size::new(800.0, 200.0);
        let points = vec![
            PathPoint::new(0.0, 150.0),
            PathPoint::new(400.0, 120.0),
            PathPoint::new(800.0, 140.0),
        ];
        doc.set_path(path, &build_path(&points, Position::Bottom, size)).unwrap();
        assert!(doc.attribute(path, "d").unwrap().starts_with("M 0 150"));
        assert!(doc.path(path).is_some());

        let markup = doc.export_svg(svg).unwrap();
        assert!(markup.contains("width=\"800\""));
        assert!(markup.contains("viewBox=\"0 0 800 200\""));

        let tree = usvg::Tree::from_str(&markup, &usvg::Options::default()).unwrap();
        assert_eq!(tree.size().width(), 800.0);
        assert_eq!(tree.size().height(), 200.0);
        assert!(tree.root().has_children());
    }

    #[test]
    fn test_resize_listeners() {
        let (mut doc, _) = document();
        let a = doc.watch_resize().unwrap();
        let b = doc.watch_resize().unwrap();
        assert_ne!(a, b);
        assert_eq!(doc.resize_listener_count(), 2);
        doc.unwatch_resize(a);
        assert_eq!(doc.resize_listener_count(), 1);
    }

    #[test]
    fn test_set_size_notifies_listeners() {
        let (mut doc, section) = document();
        let a = doc.watch_resize().unwrap();
        let b = doc.watch_resize().unwrap();

        // Same size: nothing to report
        doc.set_size(section, Size::new(800.0, 200.0)).unwrap();
        assert!(doc.take_resized().is_empty());

        // Several changes before a drain are reported once
        doc.set_size(section, Size::new(640.0, 200.0)).unwrap();
        doc.set_size(section, Size::new(640.0, 240.0)).unwrap();
        assert_eq!(doc.take_resized(), vec![a, b]);
        assert!(doc.take_resized().is_empty());

        // Unregistering also drops a notification still in the queue
        doc.set_size(section, Size::new(320.0, 240.0)).unwrap();
        doc.unwatch_resize(a);
        assert_eq!(doc.take_resized(), vec![b]);
    }

    #[test]
    fn test_discard_only_detached() {
        let (mut doc, section) = document();
        let svg = create_node(&mut doc, "svg", &[]).unwrap();
        let path = create_node(&mut doc, "path", &[]).unwrap();
        doc.append_child(svg, path).unwrap();
        let before = doc.node_count();

        doc.discard(section);
        assert_eq!(doc.node_count(), before);

        doc.discard(svg);
        assert_eq!(doc.node_count(), before - 2);
        assert_eq!(doc.tag(path), None);
    }
}
