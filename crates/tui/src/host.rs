use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::stdout;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use mapscale_core::{
    ScaleChange, ScaleConfiguration, ScaleEngine, SurfaceHandle, SurfaceSignal,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::renderer;

/// Nominal pixel size of one terminal cell. Terminals don't report pixels,
/// so the window size is estimated from the cell grid.
pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;

const DPI_STEP: f64 = 24.0;
const FIXED_SCALE_STEP: f64 = 0.05;
const CHANGE_LOG_LEN: usize = 12;
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Interactive host: the terminal is the attached surface.
pub struct App {
    pub engine: ScaleEngine,
    surface: SurfaceHandle,
    /// Most recent published changes, newest first.
    pub changes: Rc<RefCell<VecDeque<ScaleChange>>>,
    /// A resize or DPI change was dropped by the debounce and must be
    /// re-reported once input goes quiet.
    pub settle_pending: bool,
}

impl App {
    pub fn new(config: ScaleConfiguration, cols: u16, rows: u16, dpi: f64) -> Self {
        let mut engine = ScaleEngine::new(config);
        let changes = Rc::new(RefCell::new(VecDeque::with_capacity(CHANGE_LOG_LEN)));
        let sink = Rc::clone(&changes);
        engine.subscribe_all(move |change, _| {
            let mut log = sink.borrow_mut();
            log.push_front(*change);
            log.truncate(CHANGE_LOG_LEN);
        });

        let (width, height) = cells_to_pixels(cols, rows);
        let surface = SurfaceHandle::new(width, height, dpi);
        engine.attach(Box::new(surface.clone()));

        Self {
            engine,
            surface,
            changes,
            settle_pending: false,
        }
    }

    pub fn terminal_cells(&self) -> (u16, u16) {
        let metrics = self.surface.get();
        (
            (metrics.window_width / CELL_WIDTH_PX) as u16,
            (metrics.window_height / CELL_HEIGHT_PX) as u16,
        )
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        let (width, height) = cells_to_pixels(cols, rows);
        self.surface.set_size(width, height);
        self.signal(SurfaceSignal::Resized);
    }

    pub fn adjust_dpi(&mut self, delta: f64) {
        let dpi = (self.surface.get().monitor_dpi + delta).max(DPI_STEP);
        self.surface.set_dpi(dpi);
        self.signal(SurfaceSignal::DpiChanged);
    }

    pub fn cycle_mode(&mut self) {
        self.engine.update_configuration(|c| c.mode = c.mode.next());
    }

    pub fn adjust_fixed_scale(&mut self, delta: f64) {
        self.engine.update_configuration(|c| {
            c.fixed_scale = (c.fixed_scale + delta).max(FIXED_SCALE_STEP);
        });
    }

    pub fn toggle_breakpoints(&mut self) {
        self.engine
            .update_configuration(|c| c.breakpoints_enabled = !c.breakpoints_enabled);
    }

    /// Called when no input arrived for a poll interval.
    pub fn idle(&mut self) {
        if self.settle_pending {
            self.signal(SurfaceSignal::Resized);
        }
    }

    fn signal(&mut self, signal: SurfaceSignal) {
        self.settle_pending = !self.engine.handle_signal(signal).is_applied();
        if self.settle_pending {
            log::trace!("{signal:?} debounced; will re-report when idle");
        }
    }

    /// Handle a key press. Returns `false` to quit.
    pub fn on_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char('m') => self.cycle_mode(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_dpi(DPI_STEP),
            KeyCode::Char('-') => self.adjust_dpi(-DPI_STEP),
            KeyCode::Char(']') => self.adjust_fixed_scale(FIXED_SCALE_STEP),
            KeyCode::Char('[') => self.adjust_fixed_scale(-FIXED_SCALE_STEP),
            KeyCode::Char('b') => self.toggle_breakpoints(),
            KeyCode::Char('r') => {
                self.engine.force_recompute();
            }
            _ => {}
        }
        true
    }
}

fn cells_to_pixels(cols: u16, rows: u16) -> (f64, f64) {
    (
        f64::from(cols) * CELL_WIDTH_PX,
        f64::from(rows) * CELL_HEIGHT_PX,
    )
}

pub fn run(config: ScaleConfiguration, dpi: f64) -> Result<()> {
    let (cols, rows) = crossterm::terminal::size()?;
    let mut app = App::new(config, cols, rows, dpi);

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    app.engine.handle_signal(SurfaceSignal::BecameVisible);
    loop {
        terminal.draw(|frame| renderer::draw(frame, app))?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if !app.on_key(key.code) {
                        return Ok(());
                    }
                }
                Event::Resize(cols, rows) => app.resize(cols, rows),
                _ => {}
            }
        } else {
            app.idle();
        }
    }
}
