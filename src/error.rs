//! Error types
//!
//! Construction can fail when the target cannot be found or the host scene
//! graph rejects an operation. Once a widget is running, failures are logged
//! and stop the frame loop instead of being returned.

use thiserror::Error;

/// Errors reported by a scene graph collaborator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("node {0} does not exist")]
    UnknownNode(usize),

    #[error("node {0} is not attached to the document")]
    Detached(usize),

    #[error("node {child} is not a child of node {parent}")]
    NotAChild { parent: usize, child: usize },

    #[error("node {child} cannot be inserted into node {parent}")]
    HierarchyRequest { parent: usize, child: usize },

    #[error("invalid attribute name: {0:?}")]
    InvalidAttribute(String),
}

/// Errors surfaced by the wave widget
#[derive(Error, Debug)]
pub enum WaveError {
    #[error("target {0:?} is not found")]
    TargetNotFound(String),

    #[error("scene graph error: {0}")]
    Scene(#[from] SceneError),

    #[error("failed to write snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot is not valid SVG: {0}")]
    InvalidSvg(String),
}
