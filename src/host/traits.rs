//! Host collaborator traits
//!
//! The widget never talks to a windowing system directly. It needs a scene
//! graph to put its outline in and a frame clock to be called back from;
//! anything implementing these two traits can host it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::SceneError;
use crate::wave::{Size, WavePath};

/// SVG namespace used for every node the widget creates
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Identifies a resize listener registration
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ListenerId(pub u64);

/// Identifies a scheduled frame callback
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FrameHandle(pub u64);

/// A retained scene graph (typically a document)
pub trait SceneGraph {
    /// Handle to a node in the graph
    type Node: Copy + PartialEq + std::fmt::Debug;

    /// Find the first node matching `selector`
    fn query(&self, selector: &str) -> Option<Self::Node>;

    /// Create a detached element in `namespace`
    fn create_element(&mut self, namespace: &str, tag: &str) -> Result<Self::Node, SceneError>;

    /// Set an attribute. `name` is used verbatim; see [`attribute_name`].
    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str) -> Result<(), SceneError>;

    fn append_child(&mut self, parent: Self::Node, child: Self::Node) -> Result<(), SceneError>;

    fn remove_child(&mut self, parent: Self::Node, child: Self::Node) -> Result<(), SceneError>;

    /// Rendered size of `node`
    fn bounding_box(&self, node: Self::Node) -> Result<Size, SceneError>;

    /// Replace the geometry of a path node
    fn set_path(&mut self, node: Self::Node, path: &WavePath) -> Result<(), SceneError> {
        self.set_attribute(node, "d", &path.to_svg_data())
    }

    /// Ask to be told when the viewport or container resizes.
    ///
    /// Hosts without resize notifications can keep the default.
    fn watch_resize(&mut self) -> Option<ListenerId> {
        None
    }

    fn unwatch_resize(&mut self, _id: ListenerId) {}

    /// Throw away a detached node that will never be attached.
    ///
    /// Hosts that collect unreachable nodes on their own can keep the default.
    fn discard(&mut self, _node: Self::Node) {}
}

/// A per-frame callback scheduler
pub trait FrameScheduler {
    /// Schedule a callback before the next repaint
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a previously scheduled callback. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Shared documents: several widgets can live in one scene graph
impl<T: SceneGraph> SceneGraph for Rc<RefCell<T>> {
    type Node = T::Node;

    fn query(&self, selector: &str) -> Option<Self::Node> {
        self.borrow().query(selector)
    }

    fn create_element(&mut self, namespace: &str, tag: &str) -> Result<Self::Node, SceneError> {
        self.borrow_mut().create_element(namespace, tag)
    }

    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str) -> Result<(), SceneError> {
        self.borrow_mut().set_attribute(node, name, value)
    }

    fn append_child(&mut self, parent: Self::Node, child: Self::Node) -> Result<(), SceneError> {
        self.borrow_mut().append_child(parent, child)
    }

    fn remove_child(&mut self, parent: Self::Node, child: Self::Node) -> Result<(), SceneError> {
        self.borrow_mut().remove_child(parent, child)
    }

    fn bounding_box(&self, node: Self::Node) -> Result<Size, SceneError> {
        self.borrow().bounding_box(node)
    }

    fn set_path(&mut self, node: Self::Node, path: &WavePath) -> Result<(), SceneError> {
        self.borrow_mut().set_path(node, path)
    }

    fn watch_resize(&mut self) -> Option<ListenerId> {
        self.borrow_mut().watch_resize()
    }

    fn unwatch_resize(&mut self, id: ListenerId) {
        self.borrow_mut().unwatch_resize(id)
    }

    fn discard(&mut self, node: Self::Node) {
        self.borrow_mut().discard(node)
    }
}

/// Shared frame clocks
impl<T: FrameScheduler> FrameScheduler for Rc<RefCell<T>> {
    fn request_frame(&mut self) -> FrameHandle {
        self.borrow_mut().request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.borrow_mut().cancel_frame(handle)
    }
}

/// Convert a camelCase key to its hyphenated attribute name
///
/// `strokeWidth` becomes `stroke-width`; names without capitals pass through.
pub fn attribute_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            name.push('-');
            name.push(c.to_ascii_lowercase());
        } else {
            name.push(c);
        }
    }
    name
}

/// Create an element and set `attributes` on it, keys given in camelCase
///
/// On error the half-built node is discarded.
pub fn create_node<S: SceneGraph>(
    scene: &mut S,
    tag: &str,
    attributes: &[(&str, &str)],
) -> Result<S::Node, SceneError> {
    let node = scene.create_element(SVG_NS, tag)?;
    for (key, value) in attributes {
        if let Err(e) = scene.set_attribute(node, &attribute_name(key), value) {
            scene.discard(node);
            return Err(e);
        }
    }
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_name() {
        assert_eq!(attribute_name("fill"), "fill");
        assert_eq!(attribute_name("strokeWidth"), "stroke-width");
        assert_eq!(attribute_name("preserveAspectRatio"), "preserve-aspect-ratio");
    }
}
