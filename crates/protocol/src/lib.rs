pub mod config;
pub mod state;
pub mod types;

pub use config::{ResolvedConfiguration, ScaleConfiguration};
pub use state::{REFERENCE_DPI, ScaleChange, ScaleMetrics, ScaleState};
pub use types::{Density, ScaleField, ScaleMode};
