mod args;
mod host;
mod renderer;

use std::io::Write;

use anyhow::Result;
use mapscale_core::{ScaleBreakdown, ScaleConfiguration, ScaleEngine, ScaleMetrics, derive_breakdown};
use serde::Serialize;

use args::{Args, Command};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    configuration: &'a ScaleConfiguration,
    metrics: ScaleMetrics,
    breakdown: ScaleBreakdown,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e:#}");
            std::process::exit(1);
        }
    };
    let config = args.load_configuration()?;

    match args.command {
        Command::Interactive { dpi } => host::run(config, dpi),
        Command::Report { width, height, dpi } => {
            let mut engine = ScaleEngine::new(config);
            engine.report_metrics(width, height, dpi);
            let report = Report {
                configuration: engine.configuration(),
                metrics: engine.metrics(),
                breakdown: derive_breakdown(engine.configuration(), &engine.metrics()),
            };
            let mut out = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
            Ok(())
        }
    }
}
