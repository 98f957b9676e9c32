#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();
    mapscale_ui::run_native()
}

// The web build starts from `mapscale_ui::start` instead.
#[cfg(target_arch = "wasm32")]
fn main() {}
