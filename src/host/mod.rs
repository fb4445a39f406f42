//! Host module - what a widget needs from its environment
//!
//! This module provides:
//! - `SceneGraph` and `FrameScheduler`, the two collaborator traits
//! - `SvgDocument`, an in-memory scene graph with SVG export
//! - `FrameQueue`, a frame clock the host pumps once per repaint

mod traits;
mod document;
mod queue;

pub use traits::{
    attribute_name, create_node, FrameHandle, FrameScheduler, ListenerId, SceneGraph, SVG_NS,
};
pub use document::{NodeId, SvgDocument};
pub use queue::FrameQueue;
