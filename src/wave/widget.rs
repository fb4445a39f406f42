//! The animated wave widget
//!
//! A `WaveWidget` owns one `<svg>` with a single filled `<path>` inside the
//! target element. While running it keeps exactly one frame callback
//! scheduled; every delivered frame advances the phase, resamples the wave
//! and rewrites the path.
//!
//! ## Frame delivery
//!
//! The host calls [`WaveWidget::on_frame`] with the handle it was given and a
//! millisecond timestamp. Only the handle the widget is currently waiting for
//! is honoured, so a callback that was already queued when [`pause`] ran, or
//! one meant for another widget on a shared clock, does nothing.
//!
//! Resize notifications work the same way: [`WaveWidget::handle_resize`]
//! only reacts to the listener id the widget registered.
//!
//! [`pause`]: WaveWidget::pause

use std::f64::consts::PI;

use super::options::{Position, RedrawMode, WaveOptions, WaveOptionsPatch};
use super::path::{build_path, WavePath};
use super::sampling::{sample_points, PathPoint, Size};
use super::tween::PathTween;
use crate::error::{SceneError, WaveError};
use crate::host::{create_node, FrameHandle, FrameScheduler, ListenerId, SceneGraph};

/// Element the wave attaches to
#[derive(Clone, Debug, PartialEq)]
pub enum Target<N> {
    /// An element the caller already holds
    Node(N),
    /// A selector resolved against the scene graph
    Selector(String),
}

impl<N> From<&str> for Target<N> {
    fn from(selector: &str) -> Self {
        Target::Selector(selector.to_string())
    }
}

impl<N> From<String> for Target<N> {
    fn from(selector: String) -> Self {
        Target::Selector(selector)
    }
}

/// Whether a frame callback is scheduled
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoopState {
    Stopped,
    Running,
}

pub struct WaveWidget<S: SceneGraph, F: FrameScheduler> {
    scene: S,
    scheduler: F,

    target: S::Node,
    svg: S::Node,
    path: S::Node,

    options: WaveOptions,
    /// Last measured size of the target
    size: Size,

    /// Per-instance offset so waves on one page don't move in lockstep
    phase_seed: f64,
    /// Seconds of animation accumulated while running
    elapsed: f64,
    last_frame: Option<f64>,

    frame: Option<FrameHandle>,
    state: LoopState,
    resize_listener: Option<ListenerId>,

    /// Points behind the path currently in the scene graph
    displayed: Vec<PathPoint>,
    /// Edge and box the current path was built for
    drawn_position: Position,
    drawn_size: Size,
    tween: Option<PathTween>,
    fill_dirty: bool,
    disposed: bool,
}

/// Create a wave on `target`; shorthand for [`WaveWidget::new`]
pub fn wavify<S: SceneGraph, F: FrameScheduler>(
    scene: S,
    scheduler: F,
    target: impl Into<Target<S::Node>>,
    options: &WaveOptionsPatch,
) -> Result<WaveWidget<S, F>, WaveError> {
    WaveWidget::new(scene, scheduler, target, options)
}

impl<S: SceneGraph, F: FrameScheduler> WaveWidget<S, F> {
    /// Attach a new wave to `target` with a random phase seed
    pub fn new(
        scene: S,
        scheduler: F,
        target: impl Into<Target<S::Node>>,
        options: &WaveOptionsPatch,
    ) -> Result<Self, WaveError> {
        let seed = f64::from(fastrand::u32(0..1000));
        Self::with_phase_seed(scene, scheduler, target, options, seed)
    }

    /// Attach a new wave to `target` with a fixed phase seed
    ///
    /// The target is resolved and measured before anything is created, and
    /// the `<svg>` subtree is built detached and appended last. If building
    /// it fails, the detached nodes are handed back to
    /// [`SceneGraph::discard`], so on hosts that implement it an error leaves
    /// the scene graph as it was.
    pub fn with_phase_seed(
        mut scene: S,
        scheduler: F,
        target: impl Into<Target<S::Node>>,
        options: &WaveOptionsPatch,
        phase_seed: f64,
    ) -> Result<Self, WaveError> {
        let target = match target.into() {
            Target::Node(node) => node,
            Target::Selector(selector) => match scene.query(&selector) {
                Some(node) => node,
                None => return Err(WaveError::TargetNotFound(selector)),
            },
        };

        let options = WaveOptions::from_patch(options);
        let size = scene.bounding_box(target)?;

        // Visible before the first frame
        let displayed = sample_points(phase_seed * PI, &options, size);
        let (svg, path) = attach_outline(&mut scene, target, &options, size, &displayed)?;
        let resize_listener = scene.watch_resize();

        log::info!(
            "Wave attached to {:?} ({}x{}, {} bones, {})",
            target,
            size.width,
            size.height,
            options.bones,
            options.position
        );

        let autostart = options.autostart;
        let drawn_position = options.position;
        let mut widget = Self {
            scene,
            scheduler,
            target,
            svg,
            path,
            options,
            size,
            phase_seed,
            elapsed: 0.0,
            last_frame: None,
            frame: None,
            state: LoopState::Stopped,
            resize_listener,
            drawn_position,
            drawn_size: size,
            displayed,
            tween: None,
            fill_dirty: false,
            disposed: false,
        };

        if autostart {
            widget.play();
        }
        Ok(widget)
    }

    /// Start the frame loop. Does nothing if it is already running.
    pub fn play(&mut self) {
        if self.disposed {
            log::warn!("play() called on a disposed wave");
            return;
        }
        if self.state == LoopState::Running {
            return;
        }
        self.frame = Some(self.scheduler.request_frame());
        self.state = LoopState::Running;
        log::debug!("Wave playing");
    }

    /// Stop the frame loop. Does nothing if it is already stopped.
    pub fn pause(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        if let Some(handle) = self.frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.state = LoopState::Stopped;
        // Resuming starts with a fresh timestamp instead of one huge step
        self.last_frame = None;
        log::debug!("Wave paused");
    }

    /// Merge `patch` into the current options.
    ///
    /// Nothing is redrawn here; the next frame picks the new options up.
    pub fn set_options(&mut self, patch: &WaveOptionsPatch) {
        self.options.apply(patch);
        if patch.color.is_some() {
            self.fill_dirty = true;
        }
        if patch.redraw.is_some() {
            self.tween = None;
        }
    }

    /// Host resize notification
    ///
    /// Only the listener this widget registered is honoured; anything else,
    /// including notifications arriving after [`dispose`](Self::dispose), is
    /// ignored.
    pub fn handle_resize(&mut self, listener: ListenerId) {
        if self.resize_listener != Some(listener) {
            log::trace!("Ignoring resize for {:?}", listener);
            return;
        }
        self.remeasure();
    }

    /// Re-measure the target. The new size is used from the next frame on.
    ///
    /// For hosts that have no resize notifications.
    pub fn remeasure(&mut self) {
        match self.scene.bounding_box(self.target) {
            Ok(size) => {
                log::debug!("Wave container resized to {}x{}", size.width, size.height);
                self.size = size;
            }
            Err(e) => log::warn!("Failed to measure wave container: {}", e),
        }
    }

    /// Host frame callback
    pub fn on_frame(&mut self, handle: FrameHandle, timestamp_ms: f64) {
        if self.state != LoopState::Running || self.frame != Some(handle) {
            log::trace!("Ignoring frame {:?}", handle);
            return;
        }
        self.frame = None;

        if let Some(last) = self.last_frame {
            self.elapsed += ((timestamp_ms - last) / 1000.0).max(0.0);
            if let Err(e) = self.redraw(timestamp_ms) {
                log::error!("Wave redraw failed, stopping animation: {}", e);
                self.state = LoopState::Stopped;
                self.last_frame = None;
                return;
            }
        }
        self.last_frame = Some(timestamp_ms);

        if self.state == LoopState::Running {
            self.frame = Some(self.scheduler.request_frame());
        }
    }

    /// Stop animating and take the wave out of the scene graph.
    ///
    /// Safe to call more than once; also runs on drop.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.pause();
        if let Some(id) = self.resize_listener.take() {
            self.scene.unwatch_resize(id);
        }
        if let Err(e) = self.scene.remove_child(self.target, self.svg) {
            log::debug!("Wave was already detached: {}", e);
        }
        self.disposed = true;
        log::info!("Wave disposed");
    }

    /// Sample the wave at `phase` with the current options and size
    pub fn sample_points(&self, phase: f64) -> Vec<PathPoint> {
        sample_points(phase, &self.options, self.size)
    }

    /// Outline through `points` for the current position and size
    pub fn build_path(&self, points: &[PathPoint]) -> WavePath {
        build_path(points, self.options.position, self.size)
    }

    /// Current phase in radians
    pub fn phase(&self) -> f64 {
        (self.phase_seed + self.elapsed) * PI
    }

    pub fn options(&self) -> &WaveOptions {
        &self.options
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Handle of the frame callback currently awaited
    pub fn frame_handle(&self) -> Option<FrameHandle> {
        self.frame
    }

    /// Points of the path currently in the scene graph
    pub fn displayed_points(&self) -> &[PathPoint] {
        &self.displayed
    }

    /// Edge the path currently in the scene graph is anchored to.
    ///
    /// Differs from `options().position` until the next frame after a change.
    pub fn drawn_position(&self) -> Position {
        self.drawn_position
    }

    /// Listener registered for resize notifications, if the host has them
    pub fn resize_listener(&self) -> Option<ListenerId> {
        self.resize_listener
    }

    pub fn target_node(&self) -> S::Node {
        self.target
    }

    pub fn svg_node(&self) -> S::Node {
        self.svg
    }

    pub fn path_node(&self) -> S::Node {
        self.path
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    fn redraw(&mut self, now_ms: f64) -> Result<(), SceneError> {
        if self.fill_dirty {
            self.scene.set_attribute(self.path, "fill", &self.options.color)?;
            self.fill_dirty = false;
        }

        let target = self.sample_points(self.phase());
        let reshaped = self.drawn_position != self.options.position || self.drawn_size != self.size;
        let points = match self.options.redraw {
            RedrawMode::Snap => {
                self.tween = None;
                target
            }
            // Points laid out for another edge or box can't be blended with these
            RedrawMode::Eased { .. } if reshaped => {
                self.tween = None;
                target
            }
            RedrawMode::Eased { duration_ms } => {
                let tween = match self.tween.take() {
                    Some(tween) if !tween.is_finished(now_ms) => tween,
                    Some(finished) => {
                        PathTween::new(finished.target().to_vec(), target, now_ms, duration_ms)
                    }
                    None => PathTween::new(self.displayed.clone(), target, now_ms, duration_ms),
                };
                let points = tween.sample(now_ms);
                self.tween = Some(tween);
                points
            }
        };

        let path = self.build_path(&points);
        self.scene.set_path(self.path, &path)?;
        self.displayed = points;
        self.drawn_position = self.options.position;
        self.drawn_size = self.size;
        Ok(())
    }
}

/// Build the `<svg><path/></svg>` outline detached, then append it to `target`
fn attach_outline<S: SceneGraph>(
    scene: &mut S,
    target: S::Node,
    options: &WaveOptions,
    size: Size,
    points: &[PathPoint],
) -> Result<(S::Node, S::Node), SceneError> {
    let svg = create_node(
        scene,
        "svg",
        &[("version", "1.1"), ("height", "100%"), ("width", "100%"), ("fill", "none")],
    )?;
    let path = match create_node(scene, "path", &[("fill", options.color.as_str())]) {
        Ok(path) => path,
        Err(e) => {
            scene.discard(svg);
            return Err(e);
        }
    };

    let attached = scene
        .append_child(svg, path)
        .and_then(|()| scene.set_path(path, &build_path(points, options.position, size)))
        .and_then(|()| scene.append_child(target, svg));
    if let Err(e) = attached {
        scene.discard(svg);
        scene.discard(path);
        return Err(e);
    }
    Ok((svg, path))
}

impl<S: SceneGraph, F: FrameScheduler> Drop for WaveWidget<S, F> {
    fn drop(&mut self) {
        self.dispose();
    }
}
