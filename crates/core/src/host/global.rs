//! The process-wide engine instance.
//!
//! Views across the application share one engine. It is stored per thread
//! because the engine, its surface, and its observers all live on the UI
//! thread; no other thread ever sees it.

use std::cell::RefCell;

use mapscale_protocol::ScaleState;

use crate::engine::ScaleEngine;

thread_local! {
    static ENGINE: RefCell<Option<ScaleEngine>> = const { RefCell::new(None) };
}

/// Install `engine` as the shared instance, returning the one it replaces.
///
/// Hosts that need a specific clock or configuration install before first
/// use; otherwise [`with_engine`] creates a default engine.
pub fn install(engine: ScaleEngine) -> Option<ScaleEngine> {
    ENGINE.with(|cell| cell.borrow_mut().replace(engine))
}

/// Run `f` against the shared engine, creating a default one on first use.
///
/// # Panics
///
/// Panics if called re-entrantly, e.g. from inside an observer callback.
/// Observers get the new state as an argument and have no need to reach
/// back into the engine.
pub fn with_engine<R>(f: impl FnOnce(&mut ScaleEngine) -> R) -> R {
    ENGINE.with(|cell| {
        let mut slot = cell.borrow_mut();
        let engine = slot.get_or_insert_with(ScaleEngine::default);
        f(engine)
    })
}

/// Like [`with_engine`], but returns `None` instead of panicking when the
/// engine is already borrowed further up the stack.
pub fn try_with_engine<R>(f: impl FnOnce(&mut ScaleEngine) -> R) -> Option<R> {
    ENGINE.with(|cell| {
        let mut slot = cell.try_borrow_mut().ok()?;
        let engine = slot.get_or_insert_with(ScaleEngine::default);
        Some(f(engine))
    })
}

/// Snapshot of the shared engine's published state.
pub fn state() -> ScaleState {
    with_engine(|engine| engine.state())
}

pub fn is_installed() -> bool {
    ENGINE.with(|cell| cell.borrow().is_some())
}

/// Drop the shared engine (and with it its surface and observers).
///
/// A later [`with_engine`] starts over from a fresh default engine.
pub fn teardown() -> Option<ScaleEngine> {
    ENGINE.with(|cell| cell.borrow_mut().take())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    // Each test runs on its own thread, so each sees its own instance.

    #[test]
    fn lazily_created_on_first_use() {
        assert!(!is_installed());
        assert_eq!(state(), ScaleState::NEUTRAL);
        assert!(is_installed());
        assert!(teardown().is_some());
        assert!(!is_installed());
    }

    #[test]
    fn install_replaces_instance() {
        let clock = ManualClock::new();
        assert!(install(ScaleEngine::builder().clock(clock.clone()).build()).is_none());
        with_engine(|engine| engine.report_metrics(2880.0, 1620.0, 96.0));
        assert!((state().effective_scale - 1.5).abs() < 1e-9);

        let previous = install(ScaleEngine::default());
        assert!(previous.is_some_and(|e| (e.effective_scale() - 1.5).abs() < 1e-9));
        assert_eq!(state(), ScaleState::NEUTRAL);
        teardown();
    }

    #[test]
    fn reentrant_access_is_refused() {
        install(ScaleEngine::builder().clock(ManualClock::new()).build());
        let nested = with_engine(|_| try_with_engine(|engine| engine.state()));
        assert!(nested.is_none());
        assert!(try_with_engine(|engine| engine.state()).is_some());
        teardown();
    }
}
