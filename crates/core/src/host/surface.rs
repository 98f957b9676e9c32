use std::cell::Cell;
use std::rc::Rc;

use mapscale_protocol::{REFERENCE_DPI, ScaleMetrics};

/// A visual surface the engine can read metrics from.
///
/// Implemented by whatever the host uses to represent its window. The
/// engine queries it on attach and whenever the host raises a
/// [`SurfaceSignal`].
///
/// The engine does not subscribe to the window itself. Implementers forward
/// their window's visibility, initialization, resize, and DPI events through
/// [`ScaleEngine::handle_signal`](crate::ScaleEngine::handle_signal); a
/// surface whose metrics change without a signal keeps the state computed
/// from its last read.
pub trait HostSurface {
    /// Current rendered width. Non-positive means not yet known.
    fn current_width(&self) -> f64;
    /// Current rendered height. Non-positive means not yet known.
    fn current_height(&self) -> f64;
    /// DPI of the monitor the surface is on.
    fn dpi(&self) -> f64;

    fn metrics(&self) -> ScaleMetrics {
        ScaleMetrics::new(self.current_width(), self.current_height(), self.dpi())
    }
}

/// Lifecycle events a host forwards to the engine for its attached surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceSignal {
    BecameVisible,
    Initialized,
    Resized,
    DpiChanged,
}

/// Shared, mutable metrics cell implementing [`HostSurface`].
///
/// The host keeps one clone and updates it from its window events; the
/// engine holds another as its attached surface.
#[derive(Debug, Clone)]
pub struct SurfaceHandle {
    metrics: Rc<Cell<ScaleMetrics>>,
}

impl SurfaceHandle {
    pub fn new(width: f64, height: f64, dpi: f64) -> Self {
        Self {
            metrics: Rc::new(Cell::new(ScaleMetrics::new(width, height, dpi))),
        }
    }

    pub fn set_size(&self, width: f64, height: f64) {
        let mut metrics = self.metrics.get();
        metrics.window_width = width;
        metrics.window_height = height;
        self.metrics.set(metrics);
    }

    pub fn set_dpi(&self, dpi: f64) {
        let mut metrics = self.metrics.get();
        metrics.monitor_dpi = dpi;
        self.metrics.set(metrics);
    }

    pub fn get(&self) -> ScaleMetrics {
        self.metrics.get()
    }
}

impl Default for SurfaceHandle {
    fn default() -> Self {
        Self::new(0.0, 0.0, REFERENCE_DPI)
    }
}

impl HostSurface for SurfaceHandle {
    fn current_width(&self) -> f64 {
        self.metrics.get().window_width
    }

    fn current_height(&self) -> f64 {
        self.metrics.get().window_height
    }

    fn dpi(&self) -> f64 {
        self.metrics.get().monitor_dpi
    }

    fn metrics(&self) -> ScaleMetrics {
        self.metrics.get()
    }
}
