use mapscale_protocol::{
    Density, REFERENCE_DPI, ResolvedConfiguration, ScaleConfiguration, ScaleMetrics, ScaleMode,
    ScaleState,
};
use serde::Serialize;

/// Exponent applied to the effective scale to get the font scale.
///
/// Below 1, so text grows more slowly than chrome on large scales and
/// shrinks more slowly on small ones.
pub const FONT_EASING_EXPONENT: f64 = 0.95;

/// Effective scales strictly below this are [`Density::Compact`].
pub const COMPACT_BELOW: f64 = 0.85;
/// Effective scales strictly above this are [`Density::Spacious`].
pub const SPACIOUS_ABOVE: f64 = 1.15;

/// Every intermediate value of one derivation, for diagnostics and hosts
/// that want to show where a scale came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleBreakdown {
    pub width_factor: f64,
    pub height_factor: f64,
    /// Mean of the width and height fill ratios.
    pub physical_scale: f64,
    pub dpi_scale: f64,
    /// Mode-selected multiplier before clamping.
    pub candidate: f64,
    pub state: ScaleState,
}

/// Derive the published state from a configuration and the host metrics.
///
/// Pure and total: every input combination yields a state whose scales lie
/// within the resolved clamp bounds.
pub fn derive_state(config: &ScaleConfiguration, metrics: &ScaleMetrics) -> ScaleState {
    derive_breakdown(config, metrics).state
}

/// [`derive_state`] with the intermediate factors kept.
pub fn derive_breakdown(config: &ScaleConfiguration, metrics: &ScaleMetrics) -> ScaleBreakdown {
    let resolved = config.resolved();

    let width_factor = fill_ratio(metrics.window_width, resolved.design_width);
    let height_factor = fill_ratio(metrics.window_height, resolved.design_height);
    let physical_scale = (width_factor + height_factor) / 2.0;

    let dpi_scale = if metrics.monitor_dpi > 0.0 {
        metrics.monitor_dpi / REFERENCE_DPI
    } else {
        1.0
    };

    let candidate = match resolved.mode {
        ScaleMode::DpiOnly => dpi_scale,
        ScaleMode::FixedCustom | ScaleMode::LegacyPercent => resolved.fixed_scale,
        ScaleMode::Automatic => physical_scale * dpi_scale,
    };

    ScaleBreakdown {
        width_factor,
        height_factor,
        physical_scale,
        dpi_scale,
        candidate,
        state: finish(&resolved, candidate),
    }
}

fn fill_ratio(actual: f64, design: f64) -> f64 {
    if actual > 0.0 { actual / design } else { 1.0 }
}

fn finish(resolved: &ResolvedConfiguration, candidate: f64) -> ScaleState {
    // NaN only sneaks in through inf/inf style inputs; treat it as neutral.
    let candidate = if candidate.is_nan() { 1.0 } else { candidate };
    let effective_scale = candidate.clamp(resolved.min_scale, resolved.max_scale);

    let font_scale = effective_scale
        .powf(FONT_EASING_EXPONENT)
        .clamp(resolved.min_font_scale, resolved.max_font_scale);

    let density = if resolved.breakpoints_enabled {
        classify_density(effective_scale)
    } else {
        Density::Normal
    };

    ScaleState {
        effective_scale,
        font_scale,
        density,
    }
}

/// Map an effective scale onto its spacing tier.
pub fn classify_density(effective_scale: f64) -> Density {
    if effective_scale < COMPACT_BELOW {
        Density::Compact
    } else if effective_scale > SPACIOUS_ABOVE {
        Density::Spacious
    } else {
        Density::Normal
    }
}
