pub mod derive;
pub mod observe;

use std::time::Duration;

use mapscale_protocol::{ScaleChange, ScaleConfiguration, ScaleField, ScaleMetrics, ScaleState};

use crate::clock::{Clock, MonotonicClock};
use crate::host::{HostSurface, SurfaceSignal};
use self::derive::derive_state;
use self::observe::{Observers, SubscriptionId};

/// Minimum time between two accepted debounced recomputes.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

/// Result of a recompute request.
#[derive(Debug, Clone, PartialEq)]
pub enum RecomputeOutcome {
    /// Dropped by the debounce window. Stored metrics may still have
    /// changed; the published state has not.
    Skipped,
    /// Applied. Holds the fields whose values changed (possibly none).
    Applied(Vec<ScaleChange>),
}

impl RecomputeOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn changes(&self) -> &[ScaleChange] {
        match self {
            Self::Skipped => &[],
            Self::Applied(changes) => changes,
        }
    }
}

/// Derives the effective UI scale, font scale, and density tier from the
/// attached surface's metrics and the host's configuration, and publishes
/// per-field changes to observers.
///
/// Single-threaded: it lives on the UI thread together with its surface and
/// observers, so nothing in here locks.
///
/// Debounce applies to metrics-driven recomputes only. A burst of reports
/// within the window applies the first and drops the rest; nothing is
/// re-queued. Hosts that need the final size of a resize storm must report
/// again once it settles. Configuration pushes and attaching a surface
/// always recompute immediately.
pub struct ScaleEngine {
    config: ScaleConfiguration,
    metrics: ScaleMetrics,
    state: ScaleState,
    clock: Box<dyn Clock>,
    debounce: Duration,
    last_recompute: Option<Duration>,
    surface: Option<Box<dyn HostSurface>>,
    observers: Observers,
}

impl ScaleEngine {
    pub fn new(config: ScaleConfiguration) -> Self {
        Self::builder().configuration(config).build()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn state(&self) -> ScaleState {
        self.state
    }

    pub fn effective_scale(&self) -> f64 {
        self.state.effective_scale
    }

    pub fn font_scale(&self) -> f64 {
        self.state.font_scale
    }

    pub fn metrics(&self) -> ScaleMetrics {
        self.metrics
    }

    pub fn configuration(&self) -> &ScaleConfiguration {
        &self.config
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// Bind to `surface`, replacing (and returning) any previous one.
    ///
    /// The new surface's metrics are read and applied immediately, even
    /// inside the debounce window.
    pub fn attach(&mut self, surface: Box<dyn HostSurface>) -> Option<Box<dyn HostSurface>> {
        let previous = self.detach();
        self.metrics = surface.metrics();
        self.surface = Some(surface);
        log::debug!("attached surface with metrics {:?}", self.metrics);
        self.force_recompute();
        previous
    }

    /// Unbind the current surface. Published state is left as is.
    pub fn detach(&mut self) -> Option<Box<dyn HostSurface>> {
        let previous = self.surface.take();
        if previous.is_some() {
            log::debug!("detached surface");
        }
        previous
    }

    /// Re-read the attached surface after a host lifecycle event.
    ///
    /// Does nothing when no surface is attached.
    pub fn handle_signal(&mut self, signal: SurfaceSignal) -> RecomputeOutcome {
        let Some(surface) = &self.surface else {
            log::trace!("{signal:?} ignored: no surface attached");
            return RecomputeOutcome::Skipped;
        };
        let metrics = surface.metrics();
        log::trace!("{signal:?}: {metrics:?}");
        self.store_and_recompute(metrics)
    }

    /// Store new metrics verbatim and run a debounced recompute.
    pub fn report_metrics(&mut self, width: f64, height: f64, dpi: f64) -> RecomputeOutcome {
        self.store_and_recompute(ScaleMetrics::new(width, height, dpi))
    }

    /// Replace the configuration and recompute immediately.
    pub fn set_configuration(&mut self, config: ScaleConfiguration) -> RecomputeOutcome {
        log::debug!("configuration pushed: {config:?}");
        self.config = config;
        self.force_recompute()
    }

    /// Edit the configuration in place, then recompute immediately.
    pub fn update_configuration(
        &mut self,
        edit: impl FnOnce(&mut ScaleConfiguration),
    ) -> RecomputeOutcome {
        let mut config = self.config.clone();
        edit(&mut config);
        self.set_configuration(config)
    }

    /// Recompute unless the previous accepted recompute was less than the
    /// debounce interval ago.
    pub fn recompute(&mut self) -> RecomputeOutcome {
        let now = self.clock.now();
        if let Some(last) = self.last_recompute
            && now.saturating_sub(last) < self.debounce
        {
            log::trace!(
                "recompute dropped: {:?} since last",
                now.saturating_sub(last)
            );
            return RecomputeOutcome::Skipped;
        }
        self.apply(now)
    }

    /// Recompute regardless of the debounce window.
    pub fn force_recompute(&mut self) -> RecomputeOutcome {
        let now = self.clock.now();
        self.apply(now)
    }

    /// Observe changes to one field.
    pub fn subscribe(
        &mut self,
        field: ScaleField,
        callback: impl FnMut(&ScaleChange, &ScaleState) + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(Some(field), Box::new(callback))
    }

    /// Observe changes to every field.
    pub fn subscribe_all(
        &mut self,
        callback: impl FnMut(&ScaleChange, &ScaleState) + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(None, Box::new(callback))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn store_and_recompute(&mut self, metrics: ScaleMetrics) -> RecomputeOutcome {
        self.metrics = metrics;
        self.recompute()
    }

    fn apply(&mut self, now: Duration) -> RecomputeOutcome {
        self.last_recompute = Some(now);
        let next = derive_state(&self.config, &self.metrics);
        let changes = self.state.changes_to(&next);
        // Publish all fields before notifying so no observer sees a mix.
        self.state = next;
        if !changes.is_empty() {
            log::debug!(
                "scale {:.3} font {:.3} density {} ({} changed)",
                next.effective_scale,
                next.font_scale,
                next.density,
                changes.len()
            );
            self.observers.notify(&changes, &self.state);
        }
        RecomputeOutcome::Applied(changes)
    }
}

impl Default for ScaleEngine {
    fn default() -> Self {
        Self::new(ScaleConfiguration::default())
    }
}

impl std::fmt::Debug for ScaleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScaleEngine")
            .field("config", &self.config)
            .field("metrics", &self.metrics)
            .field("state", &self.state)
            .field("debounce", &self.debounce)
            .field("last_recompute", &self.last_recompute)
            .field("has_surface", &self.surface.is_some())
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ScaleEngine`] with a non-default clock or debounce.
#[derive(Default)]
pub struct EngineBuilder {
    config: ScaleConfiguration,
    clock: Option<Box<dyn Clock>>,
    debounce: Option<Duration>,
}

impl EngineBuilder {
    pub fn configuration(mut self, config: ScaleConfiguration) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = Some(debounce);
        self
    }

    /// The engine starts from the neutral state; no recompute runs until
    /// metrics, a surface, or a configuration arrive.
    pub fn build(self) -> ScaleEngine {
        ScaleEngine {
            config: self.config,
            metrics: ScaleMetrics::default(),
            state: ScaleState::NEUTRAL,
            clock: self
                .clock
                .unwrap_or_else(|| Box::new(MonotonicClock::new())),
            debounce: self.debounce.unwrap_or(DEFAULT_DEBOUNCE),
            last_recompute: None,
            surface: None,
            observers: Observers::new(),
        }
    }
}
