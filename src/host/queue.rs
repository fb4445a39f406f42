//! Manually pumped frame clock
//!
//! `FrameQueue` hands out handles and remembers which are still pending; the
//! host drains it once per repaint and delivers the drained handles to its
//! widgets. Callbacks requested during delivery land in the next batch.

use super::traits::{FrameHandle, FrameScheduler};

#[derive(Debug, Default)]
pub struct FrameQueue {
    next_handle: u64,
    pending: Vec<FrameHandle>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles waiting for the next repaint, oldest first
    pub fn pending(&self) -> &[FrameHandle] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every pending callback for delivery
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending)
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|h| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_and_cancel() {
        let mut queue = FrameQueue::new();
        let a = queue.request_frame();
        let b = queue.request_frame();
        assert_ne!(a, b);
        assert_eq!(queue.pending(), &[a, b]);

        queue.cancel_frame(a);
        assert_eq!(queue.pending(), &[b]);

        // Unknown handles are ignored
        queue.cancel_frame(FrameHandle(99));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_take_due_drains() {
        let mut queue = FrameQueue::new();
        let a = queue.request_frame();
        assert_eq!(queue.take_due(), vec![a]);
        assert!(queue.is_empty());

        let b = queue.request_frame();
        assert_ne!(a, b);
        assert_eq!(queue.take_due(), vec![b]);
    }
}
