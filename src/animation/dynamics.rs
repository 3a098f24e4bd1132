//! Second-order dynamics filter.
//!
//! Tracks a moving scalar target with the response of a damped spring:
//! natural frequency `f` (Hz), damping ratio `z` and initial response `r`.
//!
//! The state is integrated with semi-implicit Euler. A single Euler step is
//! only stable while `w * dt` stays below a bound set by `z`, so long or
//! irregular frame gaps are split into equal substeps that each stay inside
//! that bound. Gaps that would need more than [`MAX_SUBSTEPS`] substeps
//! are solved in closed form instead.

use std::f64::consts::{PI, TAU};

use crate::error::{ensure, AnimationError};

/// Initial response used when the caller does not pick one.
///
/// Zero means the filter does not anticipate target motion, so a critically
/// damped filter approaches a step target without overshoot.
pub const DEFAULT_RESPONSE: f64 = 0.0;

/// Upper bound on integration substeps for a single [`advance`] call.
///
/// Longer gaps are advanced with the exact solution of the continuous
/// system for a constant target, which is stable for any `dt`.
///
/// [`advance`]: SecondOrderDynamics::advance
pub const MAX_SUBSTEPS: usize = 100_000;

/// Fraction of the integrator's stability limit a substep may use.
const STABILITY_MARGIN: f64 = 0.5;

/// Scalar second-order filter state with precomputed coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct SecondOrderDynamics {
    /// Filtered output.
    position: f64,
    /// Rate of change of the output, per second.
    velocity: f64,
    /// Target seen by the previous advance, for velocity estimation.
    previous_target: Option<f64>,
    /// Natural frequency in Hz.
    frequency: f64,
    damping_ratio: f64,
    k1: f64,
    k2: f64,
    k3: f64,
    /// Largest `f * dt` a single substep may cover.
    substep_threshold: f64,
}

impl SecondOrderDynamics {
    /// Filter resting at `initial_value`.
    ///
    /// Fails with [`AnimationError::InvalidParameter`] when `frequency` is
    /// not positive, `damping_ratio` is negative, or any input is not
    /// finite, and with [`AnimationError::DegenerateCoefficients`] when the
    /// frequency is so extreme that `k2` collapses to zero or infinity.
    pub fn new(
        frequency: f64,
        damping_ratio: f64,
        response: f64,
        initial_value: f64,
    ) -> Result<Self, AnimationError> {
        ensure(
            "frequency",
            frequency,
            frequency.is_finite() && frequency > 0.0,
        )?;
        ensure(
            "damping_ratio",
            damping_ratio,
            damping_ratio.is_finite() && damping_ratio >= 0.0,
        )?;
        ensure("response", response, response.is_finite())?;
        ensure("initial_value", initial_value, initial_value.is_finite())?;

        let w = TAU * frequency;
        let k1 = damping_ratio / (PI * frequency);
        let k2 = 1.0 / (w * w);
        let k3 = response * damping_ratio / w;
        if k2 == 0.0 || !k2.is_finite() || !k1.is_finite() || !k3.is_finite()
        {
            return Err(AnimationError::DegenerateCoefficients);
        }

        // Semi-implicit Euler on y'' = w^2 (x - y) - 2 z w y' is stable for
        // w * dt < 2 / (sqrt(z^2 + 1) + z).
        let stable_wdt = 2.0 / (damping_ratio.hypot(1.0) + damping_ratio);
        let substep_threshold = STABILITY_MARGIN * stable_wdt / TAU;

        Ok(Self {
            position: initial_value,
            velocity: 0.0,
            previous_target: None,
            frequency,
            damping_ratio,
            k1,
            k2,
            k3,
            substep_threshold,
        })
    }

    /// Current filtered value.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current rate of change, per second.
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Natural frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Damping ratio.
    pub fn damping_ratio(&self) -> f64 {
        self.damping_ratio
    }

    /// Integration coefficients `(k1, k2, k3)`.
    pub fn coefficients(&self) -> (f64, f64, f64) {
        (self.k1, self.k2, self.k3)
    }

    /// Largest `f * dt` covered by one integration substep.
    pub fn substep_threshold(&self) -> f64 {
        self.substep_threshold
    }

    /// Advance by `dt` seconds toward `target`, estimating the target's
    /// velocity from the previous call.
    pub fn advance(&mut self, dt: f64, target: f64) -> f64 {
        self.advance_with_velocity(dt, target, None)
    }

    /// Advance by `dt` seconds toward `target`.
    ///
    /// `target_velocity` feeds the response term; `None` estimates it by
    /// finite difference against the previous target (zero on the first
    /// call and for empty steps). A `dt` that is zero, negative or not
    /// finite leaves the state untouched.
    pub fn advance_with_velocity(
        &mut self,
        dt: f64,
        target: f64,
        target_velocity: Option<f64>,
    ) -> f64 {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        let target_velocity =
            target_velocity.unwrap_or_else(|| match self.previous_target {
                Some(previous) if dt > 0.0 => (target - previous) / dt,
                _ => 0.0,
            });
        self.previous_target = Some(target);

        if dt == 0.0 {
            return self.position;
        }

        if let Some((steps, step_dt)) = self.partition(dt) {
            for _ in 0..steps {
                self.step(step_dt, target, target_velocity);
            }
        } else {
            log::debug!(
                "frame gap of {dt:.3}s exceeds {MAX_SUBSTEPS} substeps; \
                 solving it in closed form"
            );
            self.solve(dt, target + self.k3 * target_velocity);
        }
        self.position
    }

    /// Split `dt` into the fewest equal substeps that stay stable, or `None`
    /// when that takes more than [`MAX_SUBSTEPS`].
    fn partition(&self, dt: f64) -> Option<(usize, f64)> {
        let needed = (self.frequency * dt / self.substep_threshold).ceil();
        if needed > MAX_SUBSTEPS as f64 {
            return None;
        }
        let steps = (needed as usize).max(1);
        Some((steps, dt / steps as f64))
    }

    /// Exact solution of `y'' = w^2 (u - y) - 2 z w y'` after `dt` for a
    /// constant input `u`.
    fn solve(&mut self, dt: f64, input: f64) {
        let w = TAU * self.frequency;
        let z = self.damping_ratio;
        let e0 = self.position - input;
        let v0 = self.velocity;

        let (e, v) = if z < 1.0 {
            let wd = w * (1.0 - z * z).sqrt();
            let decay = (-z * w * dt).exp();
            if decay == 0.0 {
                self.position = input;
                self.velocity = 0.0;
                return;
            }
            let (sin, cos) = (wd * dt).sin_cos();
            (
                decay * (e0 * cos + (v0 + z * w * e0) / wd * sin),
                decay * (v0 * cos - (z * w * v0 + w * w * e0) / wd * sin),
            )
        } else if z == 1.0 {
            let decay = (-w * dt).exp();
            let c = v0 + w * e0;
            // dt * decay first: dt may be large enough to overflow c * dt
            let dt_decay = dt * decay;
            (e0 * decay + c * dt_decay, v0 * decay - w * c * dt_decay)
        } else {
            let root = (z * z - 1.0).sqrt();
            // z - root cancels for large z; 1 / (z + root) is the same value
            let slow = -w / (z + root);
            let fast = -w * (z + root);
            let a = (v0 - fast * e0) / (slow - fast);
            let b = e0 - a;
            let (g_slow, g_fast) = ((slow * dt).exp(), (fast * dt).exp());
            (a * g_slow + b * g_fast, a * slow * g_slow + b * fast * g_fast)
        };

        self.position = input + e;
        self.velocity = v;
    }

    fn step(&mut self, dt: f64, target: f64, target_velocity: f64) {
        self.position += dt * self.velocity;
        self.velocity += dt
            * (target + self.k3 * target_velocity
                - self.position
                - self.k1 * self.velocity)
            / self.k2;
    }
}
