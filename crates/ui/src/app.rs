use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use eframe::egui;
use mapscale_core::{
    global, ManualClock, ScaleChange, ScaleEngine, ScaleField, ScaleMetrics, ScaleMode,
    SurfaceHandle, SurfaceSignal, DEFAULT_DEBOUNCE,
};
use mapscale_protocol::REFERENCE_DPI;

use crate::theme;

const CHANGE_LOG_LEN: usize = 16;

/// Which signal a metrics difference corresponds to.
fn signal_for(previous: &ScaleMetrics, current: &ScaleMetrics) -> SurfaceSignal {
    if previous.monitor_dpi != current.monitor_dpi {
        SurfaceSignal::DpiChanged
    } else {
        SurfaceSignal::Resized
    }
}

/// egui's frame time as a clock reading; `None` when it cannot be one.
fn frame_time(seconds: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(seconds).ok()
}

/// Desktop/web host: the eframe window is the attached surface of the
/// process-wide engine.
pub struct ScaleApp {
    /// Fed from egui's frame time so the debounce works on the web too.
    clock: ManualClock,
    surface: SurfaceHandle,
    last_metrics: Option<ScaleMetrics>,
    /// A report was dropped by the debounce; re-report on a later frame.
    settle_pending: bool,
    /// Set by observers when typography must be re-derived.
    style_dirty: Rc<Cell<bool>>,
    change_log: Rc<RefCell<VecDeque<ScaleChange>>>,
    error: Option<String>,
}

impl ScaleApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        Self::install()
    }

    /// Install the shared engine and the observers this host relies on.
    fn install() -> Self {
        let clock = ManualClock::new();
        global::install(ScaleEngine::builder().clock(clock.clone()).build());

        let style_dirty = Rc::new(Cell::new(true));
        let change_log = Rc::new(RefCell::new(VecDeque::with_capacity(CHANGE_LOG_LEN)));
        global::with_engine(|engine| {
            for field in [ScaleField::EffectiveScale, ScaleField::FontScale, ScaleField::Density] {
                let dirty = Rc::clone(&style_dirty);
                engine.subscribe(field, move |_, _| dirty.set(true));
            }
            let log = Rc::clone(&change_log);
            engine.subscribe_all(move |change, _| {
                let mut log = log.borrow_mut();
                log.push_front(*change);
                log.truncate(CHANGE_LOG_LEN);
            });
        });

        Self {
            clock,
            surface: SurfaceHandle::default(),
            last_metrics: None,
            settle_pending: false,
            style_dirty,
            change_log,
            error: None,
        }
    }

    /// Report the window's physical size and DPI when they change.
    fn sync_metrics(&mut self, ctx: &egui::Context) {
        if let Some(now) = frame_time(ctx.input(|i| i.time)) {
            self.clock.set(now);
        }

        let rect = ctx.screen_rect();
        let ppp = f64::from(ctx.pixels_per_point());
        let current = ScaleMetrics::new(
            f64::from(rect.width()) * ppp,
            f64::from(rect.height()) * ppp,
            REFERENCE_DPI * ppp,
        );

        let previous = self.last_metrics;
        let signal = match previous {
            None => {
                self.surface.set_size(current.window_width, current.window_height);
                self.surface.set_dpi(current.monitor_dpi);
                global::with_engine(|engine| engine.attach(Box::new(self.surface.clone())));
                self.last_metrics = Some(current);
                return;
            }
            Some(previous) if previous != current => signal_for(&previous, &current),
            Some(_) if self.settle_pending => SurfaceSignal::Resized,
            Some(_) => return,
        };

        self.surface.set_size(current.window_width, current.window_height);
        self.surface.set_dpi(current.monitor_dpi);
        self.last_metrics = Some(current);

        let outcome = global::with_engine(|engine| engine.handle_signal(signal));
        self.settle_pending = !outcome.is_applied();
        if self.settle_pending {
            ctx.request_repaint_after(DEFAULT_DEBOUNCE);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_configuration(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Scale configuration", &["json"])
            .pick_file()
        else {
            return;
        };
        match read_configuration(&path) {
            Ok(config) => {
                global::with_engine(|engine| engine.set_configuration(config));
                self.error = None;
            }
            Err(e) => {
                log::warn!("{e:#}");
                self.error = Some(format!("{e:#}"));
            }
        }
    }

    fn settings_bar(&mut self, ui: &mut egui::Ui) {
        let config = global::with_engine(|engine| engine.configuration().clone());
        let mut mode = config.mode;
        let mut fixed_scale = config.fixed_scale;
        let mut breakpoints = config.breakpoints_enabled;
        let mut edited = false;

        ui.horizontal(|ui| {
            ui.heading("mapscale");
            ui.separator();

            egui::ComboBox::from_label("Mode")
                .selected_text(mode.name())
                .show_ui(ui, |ui| {
                    for option in ScaleMode::ALL {
                        edited |= ui
                            .selectable_value(&mut mode, option, option.name())
                            .changed();
                    }
                });

            // Loaded values outside the slider range stay as loaded.
            edited |= ui
                .add_enabled(
                    mode.uses_fixed_scale(),
                    egui::Slider::new(&mut fixed_scale, 0.5..=3.0)
                        .clamping(egui::SliderClamping::Never)
                        .text("Fixed scale"),
                )
                .changed();
            edited |= ui.checkbox(&mut breakpoints, "Breakpoints").changed();

            #[cfg(not(target_arch = "wasm32"))]
            if ui.button("Load configuration…").clicked() {
                self.load_configuration();
            }
        });

        if edited {
            global::with_engine(|engine| {
                engine.update_configuration(|c| {
                    c.mode = mode;
                    c.fixed_scale = fixed_scale;
                    c.breakpoints_enabled = breakpoints;
                })
            });
        }
    }

    fn state_panel(&self, ui: &mut egui::Ui) {
        let (state, metrics) = global::with_engine(|engine| (engine.state(), engine.metrics()));

        egui::Grid::new("scale_state")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                ui.label("Window");
                ui.label(format!(
                    "{:.0} × {:.0} px",
                    metrics.window_width, metrics.window_height
                ));
                ui.end_row();

                ui.label("DPI");
                ui.label(format!("{:.0}", metrics.monitor_dpi));
                ui.end_row();

                ui.label("Effective scale");
                ui.label(format!("{:.3}", state.effective_scale));
                ui.end_row();

                ui.label("Font scale");
                ui.label(format!("{:.3}", state.font_scale));
                ui.end_row();

                ui.label("Density");
                ui.colored_label(theme::density_color(state.density), state.density.to_string());
                ui.end_row();
            });

        if self.settle_pending {
            ui.weak("Waiting for the window to settle…");
        }

        ui.separator();
        ui.label("Recent changes");
        for change in self.change_log.borrow().iter() {
            ui.monospace(change.to_string());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn read_configuration(path: &std::path::Path) -> anyhow::Result<mapscale_core::ScaleConfiguration> {
    use anyhow::Context;

    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    mapscale_core::parse_configuration(&data)
        .with_context(|| format!("parsing {}", path.display()))
}

impl eframe::App for ScaleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync_metrics(ctx);

        if self.style_dirty.replace(false) {
            let state = global::with_engine(|engine| engine.state());
            theme::apply_scaled_style(ctx, &state);
        }

        egui::TopBottomPanel::top("settings").show(ctx, |ui| self.settings_bar(ui));

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            if let Some(err) = &self.error {
                ui.colored_label(egui::Color32::RED, err);
            } else {
                ui.label("Resize the window or move it to another monitor");
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| self.state_panel(ui));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dpi_difference_is_a_dpi_change() {
        let a = ScaleMetrics::new(1920.0, 1080.0, 96.0);
        let b = ScaleMetrics::new(1920.0, 1080.0, 144.0);
        assert_eq!(signal_for(&a, &b), SurfaceSignal::DpiChanged);
        let c = ScaleMetrics::new(1280.0, 1080.0, 96.0);
        assert_eq!(signal_for(&a, &c), SurfaceSignal::Resized);
    }

    #[test]
    fn drawing_settings_keeps_out_of_range_fixed_scale() {
        let mut app = ScaleApp::install();
        global::with_engine(|engine| {
            engine.set_configuration(
                mapscale_core::ScaleConfiguration::default()
                    .with_mode(ScaleMode::FixedCustom)
                    .with_fixed_scale(4.0)
                    .with_scale_bounds(0.75, 5.0),
            )
        });

        let ctx = egui::Context::default();
        for _ in 0..2 {
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| app.settings_bar(ui));
            });
        }

        let config = global::with_engine(|engine| engine.configuration().clone());
        assert_eq!(config.fixed_scale, 4.0);
        assert!((global::state().effective_scale - 4.0).abs() < 1e-9);
        global::teardown();
    }

    #[test]
    fn unusable_frame_times_are_skipped() {
        assert_eq!(frame_time(1.5), Some(Duration::from_millis(1500)));
        assert_eq!(frame_time(-1.0), None);
        assert_eq!(frame_time(f64::NAN), None);
        assert_eq!(frame_time(1e300), None);
    }
}
