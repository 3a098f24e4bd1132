//! Convergence-gated frame loop around a [`SecondOrderDynamics`] filter.

use web_time::Instant;

use super::dynamics::{SecondOrderDynamics, DEFAULT_RESPONSE};
use super::frame::{Clock, FrameScheduler, SystemClock};
use crate::error::{ensure, AnimationError};
use crate::options::AnimationOptions;

/// Whether a frame callback is outstanding.
enum LoopState<H> {
    Idle,
    Running {
        /// Handle of the outstanding frame request.
        frame: H,
        /// When the previous tick (or the loop start) happened.
        last_tick: Instant,
    },
}

/// Animates a scalar toward a target, one frame at a time.
///
/// The driver runs a frame loop only while the value is further than
/// `epsilon` from the target:
///
/// - [`animate`](Self::animate) records the target and starts the loop if it
///   is idle and not already converged.
/// - [`tick`](Self::tick), called by the host when the requested frame
///   fires, advances the filter, reports the value to `on_change` and either
///   requests the next frame or goes idle.
/// - [`destroy`](Self::destroy) (and dropping the driver) cancels any
///   outstanding request.
pub struct AnimationDriver<S: FrameScheduler, C: Clock = SystemClock> {
    dynamics: SecondOrderDynamics,
    value: f64,
    target: f64,
    epsilon: f64,
    state: LoopState<S::Handle>,
    scheduler: S,
    clock: C,
    on_change: Box<dyn FnMut(f64)>,
}

impl<S: FrameScheduler, C: Clock> AnimationDriver<S, C> {
    /// Driver at rest at `start_value` with the neutral response.
    pub fn new(
        frequency: f64,
        damping_ratio: f64,
        start_value: f64,
        epsilon: f64,
        scheduler: S,
        clock: C,
        on_change: impl FnMut(f64) + 'static,
    ) -> Result<Self, AnimationError> {
        let dynamics = SecondOrderDynamics::new(
            frequency,
            damping_ratio,
            DEFAULT_RESPONSE,
            start_value,
        )?;
        Self::from_dynamics(dynamics, epsilon, scheduler, clock, on_change)
    }

    /// Driver configured from `options`, at rest at `start_value`.
    pub fn from_options(
        options: &AnimationOptions,
        start_value: f64,
        scheduler: S,
        clock: C,
        on_change: impl FnMut(f64) + 'static,
    ) -> Result<Self, AnimationError> {
        let dynamics = SecondOrderDynamics::new(
            options.frequency,
            options.damping_ratio,
            options.response,
            start_value,
        )?;
        Self::from_dynamics(
            dynamics,
            options.epsilon,
            scheduler,
            clock,
            on_change,
        )
    }

    /// Driver around an existing filter, starting at its current position.
    pub fn from_dynamics(
        dynamics: SecondOrderDynamics,
        epsilon: f64,
        scheduler: S,
        clock: C,
        on_change: impl FnMut(f64) + 'static,
    ) -> Result<Self, AnimationError> {
        ensure("epsilon", epsilon, epsilon.is_finite() && epsilon > 0.0)?;
        let value = dynamics.position();
        Ok(Self {
            dynamics,
            value,
            target: value,
            epsilon,
            state: LoopState::Idle,
            scheduler,
            clock,
            on_change: Box::new(on_change),
        })
    }

    /// Move toward `target`.
    ///
    /// A running loop picks the new target up on its next tick. An idle
    /// driver already within `epsilon` of the target stays idle. Non-finite
    /// targets are ignored.
    pub fn animate(&mut self, target: f64) {
        if !target.is_finite() {
            log::warn!("ignoring non-finite animation target {target}");
            return;
        }
        self.target = target;
        if self.is_running() || (self.value - target).abs() <= self.epsilon {
            return;
        }

        let last_tick = self.clock.now();
        let frame = self.scheduler.request_frame();
        self.state = LoopState::Running { frame, last_tick };
        log::debug!("animation started: {} -> {target}", self.value);
    }

    /// Advance one frame. Call when the requested frame fires.
    ///
    /// Invokes `on_change` exactly once with the new value and returns
    /// whether another frame was requested. Calling it with no outstanding
    /// request is a contract violation: it asserts in debug builds and does
    /// nothing in release builds.
    pub fn tick(&mut self) -> bool {
        debug_assert!(
            self.is_running(),
            "tick without an outstanding frame request"
        );
        let LoopState::Running { last_tick, .. } = self.state else {
            log::warn!("tick without an outstanding frame request; ignored");
            return false;
        };

        let now = self.clock.now();
        let dt = now.saturating_duration_since(last_tick).as_secs_f64();
        self.value = self.dynamics.advance(dt, self.target);
        log::trace!(
            "tick dt={dt:.4}s value={} target={}",
            self.value,
            self.target
        );
        (self.on_change)(self.value);

        if (self.value - self.target).abs() > self.epsilon {
            let frame = self.scheduler.request_frame();
            self.state = LoopState::Running {
                frame,
                last_tick: now,
            };
            true
        } else {
            self.state = LoopState::Idle;
            log::debug!("animation converged at {}", self.value);
            false
        }
    }

    /// Cancel the outstanding frame request, if any. Safe to repeat.
    pub fn destroy(&mut self) {
        if let LoopState::Running { frame, .. } =
            std::mem::replace(&mut self.state, LoopState::Idle)
        {
            self.scheduler.cancel_frame(frame);
            log::debug!("animation cancelled at {}", self.value);
        }
    }

    /// Last value reported to `on_change` (or the start value).
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Most recent target.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Convergence tolerance.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Whether a frame request is outstanding.
    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running { .. })
    }

    /// The underlying filter.
    pub fn dynamics(&self) -> &SecondOrderDynamics {
        &self.dynamics
    }

    /// The frame scheduler.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// The frame scheduler, mutably (hosts firing frames themselves).
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// The time source.
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<S: FrameScheduler, C: Clock> Drop for AnimationDriver<S, C> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<S: FrameScheduler, C: Clock> std::fmt::Debug for AnimationDriver<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationDriver")
            .field("value", &self.value)
            .field("target", &self.target)
            .field("epsilon", &self.epsilon)
            .field("running", &self.is_running())
            .field("dynamics", &self.dynamics)
            .finish_non_exhaustive()
    }
}
