//! Host boundary: frame scheduling and time.
//!
//! The driver never waits on frames itself. It asks a [`FrameScheduler`] for
//! one callback before the next repaint and the host calls
//! [`AnimationDriver::tick`](super::AnimationDriver::tick) when that frame
//! fires.

use web_time::Instant;

/// Requests and cancels a single callback before the next repaint.
pub trait FrameScheduler {
    /// Opaque handle identifying one outstanding request.
    type Handle;

    /// Request a frame callback.
    fn request_frame(&mut self) -> Self::Handle;

    /// Cancel a request that has not fired yet.
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Monotonic time source.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`web_time::Instant`] (`performance.now()` on WASM).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Identifier of a frame request made through [`FrameRequests`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(u64);

/// Frame request queue for hosts that pump their own event loop.
///
/// Requests are recorded and fired by the host, typically once per redraw:
///
/// ```
/// # use damped::animation::{AnimationDriver, FrameRequests, SystemClock};
/// # let mut driver = AnimationDriver::new(
/// #     2.0, 1.0, 0.0, 0.01, FrameRequests::new(), SystemClock, |_| {},
/// # ).unwrap();
/// driver.animate(10.0);
/// if driver.scheduler_mut().take_pending().is_some() {
///     let _ = driver.tick();
/// }
/// ```
#[derive(Debug, Default)]
pub struct FrameRequests {
    next_id: u64,
    outstanding: Vec<FrameId>,
    requested: usize,
}

impl FrameRequests {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any request is waiting to fire.
    pub fn pending(&self) -> bool {
        !self.outstanding.is_empty()
    }

    /// Number of requests waiting to fire.
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    /// Total requests made over the queue's lifetime.
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Fire the oldest outstanding request, removing it from the queue.
    pub fn take_pending(&mut self) -> Option<FrameId> {
        if self.outstanding.is_empty() {
            None
        } else {
            Some(self.outstanding.remove(0))
        }
    }
}

impl FrameScheduler for FrameRequests {
    type Handle = FrameId;

    fn request_frame(&mut self) -> FrameId {
        let id = FrameId(self.next_id);
        self.next_id += 1;
        self.requested += 1;
        self.outstanding.push(id);
        id
    }

    fn cancel_frame(&mut self, handle: FrameId) {
        self.outstanding.retain(|&id| id != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_fire_in_order() {
        let mut frames = FrameRequests::new();
        let first = frames.request_frame();
        let second = frames.request_frame();
        assert_ne!(first, second);
        assert_eq!(frames.outstanding(), 2);

        assert_eq!(frames.take_pending(), Some(first));
        assert_eq!(frames.take_pending(), Some(second));
        assert_eq!(frames.take_pending(), None);
        assert_eq!(frames.requested(), 2);
    }

    #[test]
    fn test_cancel_removes_only_that_request() {
        let mut frames = FrameRequests::new();
        let first = frames.request_frame();
        let second = frames.request_frame();

        frames.cancel_frame(first);
        assert_eq!(frames.outstanding(), 1);
        assert_eq!(frames.take_pending(), Some(second));

        // Cancelling an already fired request is harmless
        frames.cancel_frame(second);
        assert!(!frames.pending());
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
