//! Frame scheduling seam between the wheel and its host.
//!
//! The wheel never loops on its own. It asks the host for the next frame,
//! keeps the returned [`FrameHandle`], and the host calls
//! [`Wheel::on_frame`](crate::Wheel::on_frame) when that frame fires.
//! Keeping the handle lets teardown cancel the frame deterministically.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Identifier of a requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// Host-provided per-frame callback scheduling (e.g. `requestAnimationFrame`).
pub trait FrameScheduler {
    /// Monotonic timestamp used to drive animations.
    fn now(&self) -> Duration;

    /// Ask for one callback on the next frame.
    ///
    /// `None` if the host cannot schedule frames; a spin then finishes at
    /// once instead of animating.
    fn request_frame(&mut self) -> Option<FrameHandle>;

    /// Cancel a frame that has not fired yet. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    pending: Vec<FrameHandle>,
}

/// Scheduler driven by hand with a simulated clock.
///
/// Clones share the same clock and queue, so a host can hand one clone to
/// a wheel and keep another to advance time.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward and fire every pending frame.
    ///
    /// Returns the handles that fired, in request order. The caller delivers
    /// them to whatever requested them.
    pub fn advance(&self, delta: Duration) -> Vec<FrameHandle> {
        let mut state = self.state.borrow_mut();
        state.now += delta;
        std::mem::take(&mut state.pending)
    }

    /// Number of frames requested but not yet fired or cancelled.
    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Current simulated time.
    pub fn time(&self) -> Duration {
        self.state.borrow().now
    }
}

impl FrameScheduler for ManualScheduler {
    fn now(&self) -> Duration {
        self.time()
    }

    fn request_frame(&mut self) -> Option<FrameHandle> {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let handle = FrameHandle(state.next_id);
        state.pending.push(handle);
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.state.borrow_mut().pending.retain(|h| *h != handle);
    }
}
