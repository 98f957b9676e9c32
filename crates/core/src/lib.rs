//! Adaptive scale engine.
//!
//! [`ScaleEngine`] turns the host window's size and monitor DPI, under a
//! [`ScaleConfiguration`], into an effective UI scale, an eased font scale,
//! and a density tier, and tells observers which of those changed.

pub mod clock;
pub mod config;
pub mod engine;
pub mod host;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{ConfigError, parse_configuration};
pub use engine::derive::{ScaleBreakdown, derive_breakdown, derive_state};
pub use engine::observe::SubscriptionId;
pub use engine::{DEFAULT_DEBOUNCE, EngineBuilder, RecomputeOutcome, ScaleEngine};
pub use host::{HostSurface, SurfaceHandle, SurfaceSignal, global};
pub use mapscale_protocol::{
    Density, ScaleChange, ScaleConfiguration, ScaleField, ScaleMetrics, ScaleMode, ScaleState,
};
