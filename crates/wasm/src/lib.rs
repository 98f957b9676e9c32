use std::time::Duration;

use mapscale_core::{ManualClock, RecomputeOutcome, ScaleEngine, global, parse_configuration};
use mapscale_protocol::{ScaleChange, ScaleState};
use serde::Serialize;
use wasm_bindgen::prelude::*;

thread_local! {
    // `Instant` is unavailable in the browser; the page passes
    // `performance.now()` with every call instead.
    static CLOCK: ManualClock = ManualClock::new();
}

/// What a call did to the published state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Update {
    applied: bool,
    changes: Vec<ScaleChange>,
    state: ScaleState,
}

impl Update {
    fn new(outcome: RecomputeOutcome, state: ScaleState) -> Self {
        Self {
            applied: outcome.is_applied(),
            changes: outcome.changes().to_vec(),
            state,
        }
    }
}

/// Negative, non-finite, and out-of-range timestamps leave the clock as is.
fn set_time(now_ms: f64) {
    if let Ok(now) = Duration::try_from_secs_f64(now_ms / 1000.0) {
        CLOCK.with(|clock| clock.set(now));
    }
}

fn with_bridge_engine<R>(now_ms: f64, f: impl FnOnce(&mut ScaleEngine) -> R) -> R {
    set_time(now_ms);
    if !global::is_installed() {
        let clock = CLOCK.with(ManualClock::clone);
        global::install(ScaleEngine::builder().clock(clock).build());
    }
    global::with_engine(f)
}

fn report_metrics_json(width: f64, height: f64, dpi: f64, now_ms: f64) -> Result<String, String> {
    let update = with_bridge_engine(now_ms, |engine| {
        let outcome = engine.report_metrics(width, height, dpi);
        Update::new(outcome, engine.state())
    });
    serde_json::to_string(&update).map_err(|e| e.to_string())
}

fn configure_json(config: &str, now_ms: f64) -> Result<String, String> {
    let config = parse_configuration(config.as_bytes()).map_err(|e| e.to_string())?;
    let update = with_bridge_engine(now_ms, |engine| {
        let outcome = engine.set_configuration(config);
        Update::new(outcome, engine.state())
    });
    serde_json::to_string(&update).map_err(|e| e.to_string())
}

fn state_json(now_ms: f64) -> Result<String, String> {
    let state = with_bridge_engine(now_ms, |engine| engine.state());
    serde_json::to_string(&state).map_err(|e| e.to_string())
}

/// Report the canvas size (CSS px × devicePixelRatio) and DPI
/// (96 × devicePixelRatio). Returns the update as JSON.
#[wasm_bindgen]
pub fn report_metrics(width: f64, height: f64, dpi: f64, now_ms: f64) -> Result<String, JsError> {
    report_metrics_json(width, height, dpi, now_ms).map_err(|e| JsError::new(&e))
}

/// Push a JSON configuration; applied immediately. Returns the update as JSON.
#[wasm_bindgen]
pub fn configure(config: &str, now_ms: f64) -> Result<String, JsError> {
    configure_json(config, now_ms).map_err(|e| JsError::new(&e))
}

/// The current published state as JSON.
#[wasm_bindgen]
pub fn current_state(now_ms: f64) -> Result<String, JsError> {
    state_json(now_ms).map_err(|e| JsError::new(&e))
}

/// Drop the engine; the next call starts from the neutral state.
#[wasm_bindgen]
pub fn reset() {
    global::teardown();
}
