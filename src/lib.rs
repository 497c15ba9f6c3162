//! Second-order motion smoothing: a mass–spring–damper-style tracking filter
//! for camera paths, UI motion, and any control signal that should catch up
//! to a moving target with tunable overshoot and settling.
//!
//! Feed [`SecondOrderFilter::step`] one `(delta_time, target)` pair per tick
//! and it returns the smoothed position. The integrator stays stable across
//! large or irregular time steps: small steps use a clamped coefficient,
//! and [`FilterBuilder::high_speed`] enables a pole-matching coefficient for
//! steps that are coarse relative to the response frequency.
//!
//! # Example
//!
//! ```
//! use sodyn::{SecondOrderFilter, Vec3};
//!
//! let mut camera = SecondOrderFilter::builder()
//!     .frequency(2.0)
//!     .damping(0.7)
//!     .initial_response(2.0)
//!     .build(Vec3::ZERO)?;
//!
//! // Once per frame:
//! let target = Vec3::new(1.0, 0.0, 3.0);
//! let smoothed = camera.step(1.0 / 60.0, target, None)?;
//! # let _ = smoothed;
//! # Ok::<(), sodyn::Error>(())
//! ```

mod error;
pub use error::{Error, Result};

mod vector;
pub use vector::{MotionVector, Vec3};

mod filter;
pub use filter::{FilterBuilder, SecondOrderFilter};
