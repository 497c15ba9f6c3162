//! Second-order tracking filter.

use core::f32::consts::{PI, TAU};

use crate::error::{Error, Result};
use crate::vector::{MotionVector, Vec3};

/// Constants derived once from frequency, damping, and initial response.
#[derive(Debug, Clone, Copy)]
struct Dynamics {
    /// Angular frequency, `2π·f`.
    w: f32,
    /// Damping coefficient.
    z: f32,
    /// Damped (z < 1) or hyperbolic (z > 1) angular frequency magnitude.
    d: f32,
    k1: f32,
    k2: f32,
    k3: f32,
}

impl Dynamics {
    fn derive(frequency: f32, damping: f32, initial_response: f32) -> Result<Self> {
        if !frequency.is_finite() || frequency <= 0.0 {
            return Err(Error::InvalidFrequency(frequency));
        }

        let w = TAU * frequency;
        let z = damping;
        Ok(Self {
            w,
            z,
            d: w * (z * z - 1.0).abs().sqrt(),
            k1: z / (PI * frequency),
            k2: 1.0 / (w * w),
            k3: initial_response * z / w,
        })
    }

    /// Integration coefficient for this step, chosen for stability.
    ///
    /// Small steps take the clamped lower bound; in high-speed mode, steps
    /// that are large relative to the damping time constant (`w·dt ≥ z`)
    /// take the pole-matching form instead, which stays accurate where the
    /// clamp would lag visibly.
    #[inline]
    fn stable_k2(&self, dt: f32, high_speed: bool) -> f32 {
        if !high_speed || self.w * dt < self.z {
            self.clamped_k2(dt)
        } else {
            self.pole_matched_k2(dt)
        }
    }

    /// Clamp k2 so the semi-implicit Euler update below cannot go unstable
    /// or jitter at the given step size.
    #[inline]
    fn clamped_k2(&self, dt: f32) -> f32 {
        self.k2
            .max(dt * self.k1)
            .max(dt * dt / 2.0 + dt * self.k1 / 2.0)
    }

    /// Coefficient matching the discrete poles of the continuous system:
    /// oscillatory (`cos`) when z ≤ 1, hyperbolic (`cosh`) when z > 1.
    #[inline]
    fn pole_matched_k2(&self, dt: f32) -> f32 {
        let t1 = (-self.z * self.w * dt).exp();
        let alpha = if self.z <= 1.0 {
            2.0 * t1 * (dt * self.d).cos()
        } else {
            2.0 * t1 * (dt * self.d).cosh()
        };
        let beta = t1 * t1;
        let t2 = dt / (1.0 + beta - alpha);
        dt * t2
    }
}

/// Builder for [`SecondOrderFilter`].
///
/// Defaults: frequency 1.0, critical damping (1.0), no initial response,
/// high-speed mode off.
#[derive(Debug, Clone)]
pub struct FilterBuilder {
    frequency: f32,
    damping: f32,
    initial_response: f32,
    high_speed: bool,
}

impl Default for FilterBuilder {
    fn default() -> Self {
        Self {
            frequency: 1.0,
            damping: 1.0,
            initial_response: 0.0,
            high_speed: false,
        }
    }
}

impl FilterBuilder {
    /// Response speed, in response cycles per time unit. Must be finite and
    /// greater than zero.
    pub fn frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }

    /// How the system settles at the target: 1.0 is critical (no overshoot),
    /// below 1.0 oscillates, above 1.0 is sluggish.
    ///
    /// Negative damping is not rejected but diverges; passing it is a caller
    /// error.
    pub fn damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    /// How strongly the target's instantaneous rate of change kicks the
    /// output at motion onset. 0.0 is no kick, 2.0 is a typical snappy feel,
    /// negative values anticipate by moving away first.
    pub fn initial_response(mut self, initial_response: f32) -> Self {
        self.initial_response = initial_response;
        self
    }

    /// Enable the pole-matching coefficient path for steps that are large
    /// relative to the response frequency.
    pub fn high_speed(mut self, high_speed: bool) -> Self {
        self.high_speed = high_speed;
        self
    }

    /// Build the filter, with its output starting at `initial_position`.
    pub fn build<V: MotionVector>(self, initial_position: V) -> Result<SecondOrderFilter<V>> {
        let dynamics = Dynamics::derive(self.frequency, self.damping, self.initial_response)?;
        Ok(SecondOrderFilter {
            dynamics,
            high_speed: self.high_speed,
            position: initial_position,
            velocity: V::ZERO,
            previous_target: initial_position,
        })
    }
}

/// Second-order motion-smoothing filter.
///
/// Tracks a moving target like a mass on a damped spring: call
/// [`step`](Self::step) once per tick with the elapsed time and the new
/// target sample, and read back the smoothed position. One instance is owned
/// by one caller; independent instances share nothing.
#[derive(Debug, Clone)]
pub struct SecondOrderFilter<V: MotionVector = Vec3> {
    dynamics: Dynamics,
    high_speed: bool,

    position: V,
    velocity: V,
    /// Last target seen by a finite-difference step; explicit-velocity steps
    /// leave it untouched.
    previous_target: V,
}

impl SecondOrderFilter {
    /// Create a builder for configuring a filter.
    pub fn builder() -> FilterBuilder {
        FilterBuilder::default()
    }
}

impl<V: MotionVector> SecondOrderFilter<V> {
    /// Create a filter with high-speed mode off. Prefer
    /// [`SecondOrderFilter::builder()`] when not setting every parameter.
    pub fn new(
        frequency: f32,
        damping: f32,
        initial_response: f32,
        initial_position: V,
    ) -> Result<Self> {
        FilterBuilder::default()
            .frequency(frequency)
            .damping(damping)
            .initial_response(initial_response)
            .build(initial_position)
    }

    /// Advance the filter by one step toward `target` and return the new
    /// smoothed position.
    ///
    /// `delta_time` is the real elapsed time since the previous step and
    /// must be finite and greater than zero; violations are rejected before
    /// any state changes, so a failed call never corrupts the filter.
    ///
    /// When `velocity` is `None` the target's velocity is estimated by
    /// finite difference against the previous target sample. Passing
    /// `Some(v)` uses `v` directly and does not record `target` in the
    /// history, so interleaved explicit calls leave the finite-difference
    /// baseline spanning only the non-explicit calls.
    pub fn step(&mut self, delta_time: f32, target: V, velocity: Option<V>) -> Result<V> {
        if !delta_time.is_finite() || delta_time <= 0.0 {
            return Err(Error::InvalidDeltaTime(delta_time));
        }

        let target_velocity = match velocity {
            Some(v) => v,
            None => {
                let estimated = (target - self.previous_target) / delta_time;
                self.previous_target = target;
                estimated
            }
        };

        let k2_stable = self.dynamics.stable_k2(delta_time, self.high_speed);

        // Semi-implicit Euler: advance position with the old velocity, then
        // velocity with the already-advanced position.
        self.position = self.position + self.velocity * delta_time;
        let acceleration = (target + target_velocity * self.dynamics.k3
            - self.position
            - self.velocity * self.dynamics.k1)
            / k2_stable;
        self.velocity = self.velocity + acceleration * delta_time;

        Ok(self.position)
    }

    /// Current smoothed position.
    #[inline]
    pub fn position(&self) -> V {
        self.position
    }

    /// Current rate of change of the smoothed position. This is the filter's
    /// own velocity, not the target's.
    #[inline]
    pub fn velocity(&self) -> V {
        self.velocity
    }

    /// Whether the pole-matching path is enabled for large steps.
    #[inline]
    pub fn high_speed(&self) -> bool {
        self.high_speed
    }

    /// Re-initialize the motion state at `position`, zeroing velocity and
    /// the finite-difference history. Tuning is unchanged.
    pub fn reset(&mut self, position: V) {
        self.position = position;
        self.velocity = V::ZERO;
        self.previous_target = position;
    }

    /// Retune frequency, damping, and initial response while keeping the
    /// current motion state. Fails (leaving the filter untouched) on an
    /// invalid frequency.
    pub fn set_dynamics(
        &mut self,
        frequency: f32,
        damping: f32,
        initial_response: f32,
    ) -> Result<()> {
        self.dynamics = Dynamics::derive(frequency, damping, initial_response)?;
        Ok(())
    }
}
