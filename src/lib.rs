//! wavify - animated wave fills for the edge of a container
//!
//! A wave is a closed Bézier outline whose free edge bobs along a sine. It
//! is attached to a target element of a host scene graph and redrawn from
//! host frame callbacks until paused or disposed.
//!
//! ```no_run
//! use wavify::host::{FrameQueue, SvgDocument};
//! use wavify::wave::{Size, WaveOptionsPatch, WaveWidget};
//!
//! let mut doc = SvgDocument::new(Size::new(800.0, 600.0));
//! let root = doc.root();
//! let hero = doc.insert(root, "section", Some("hero")).unwrap();
//! doc.set_size(hero, Size::new(800.0, 200.0)).unwrap();
//!
//! let mut wave = WaveWidget::new(doc, FrameQueue::new(), "#hero", &WaveOptionsPatch::default()).unwrap();
//! for (i, handle) in wave.scheduler_mut().take_due().into_iter().enumerate() {
//!     wave.on_frame(handle, i as f64 * 16.0);
//! }
//! ```

pub mod error;
pub mod host;
pub mod wave;

pub use error::{SceneError, WaveError};
pub use wave::{wavify, Position, RedrawMode, WaveOptions, WaveOptionsPatch, WaveWidget};
