use serde::{Deserialize, Serialize};

use crate::types::ScaleMode;

pub const DEFAULT_DESIGN_WIDTH: f64 = 1920.0;
pub const DEFAULT_DESIGN_HEIGHT: f64 = 1080.0;
pub const DEFAULT_MIN_SCALE: f64 = 0.75;
pub const DEFAULT_MAX_SCALE: f64 = 2.0;
pub const DEFAULT_MIN_FONT_SCALE: f64 = 0.85;
pub const DEFAULT_MAX_FONT_SCALE: f64 = 1.8;

/// Floor applied to `maxScale` when it is configured below `minScale`.
pub const REPAIR_MAX_SCALE: f64 = 1.65;
/// Floor applied to `maxFontScale` when it is configured below `minFontScale`.
pub const REPAIR_MAX_FONT_SCALE: f64 = 1.2;

/// Host-owned scaling policy.
///
/// Values are stored exactly as the host supplied them. The engine only ever
/// reads them through [`ScaleConfiguration::resolved`], which substitutes
/// defaults for unusable values, so a bad payload degrades to a sane scale
/// instead of failing.
///
/// Missing fields in a serialized payload take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScaleConfiguration {
    pub mode: ScaleMode,
    /// Multiplier for [`ScaleMode::FixedCustom`] and [`ScaleMode::LegacyPercent`].
    pub fixed_scale: f64,
    /// Reference width the layout was authored for.
    pub design_width: f64,
    /// Reference height the layout was authored for.
    pub design_height: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub min_font_scale: f64,
    pub max_font_scale: f64,
    /// Whether [`Density`](crate::Density) is classified from the scale.
    pub breakpoints_enabled: bool,
}

impl Default for ScaleConfiguration {
    fn default() -> Self {
        Self {
            mode: ScaleMode::Automatic,
            fixed_scale: 1.0,
            design_width: DEFAULT_DESIGN_WIDTH,
            design_height: DEFAULT_DESIGN_HEIGHT,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            min_font_scale: DEFAULT_MIN_FONT_SCALE,
            max_font_scale: DEFAULT_MAX_FONT_SCALE,
            breakpoints_enabled: true,
        }
    }
}

impl ScaleConfiguration {
    /// A [`ScaleMode::LegacyPercent`] configuration for a percent setting
    /// such as `125` (→ 1.25×).
    pub fn legacy_percent(percent: f64) -> Self {
        Self {
            mode: ScaleMode::LegacyPercent,
            fixed_scale: percent / 100.0,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: ScaleMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_fixed_scale(mut self, fixed_scale: f64) -> Self {
        self.fixed_scale = fixed_scale;
        self
    }

    pub fn with_design_size(mut self, width: f64, height: f64) -> Self {
        self.design_width = width;
        self.design_height = height;
        self
    }

    pub fn with_scale_bounds(mut self, min: f64, max: f64) -> Self {
        self.min_scale = min;
        self.max_scale = max;
        self
    }

    pub fn with_font_bounds(mut self, min: f64, max: f64) -> Self {
        self.min_font_scale = min;
        self.max_font_scale = max;
        self
    }

    pub fn with_breakpoints(mut self, enabled: bool) -> Self {
        self.breakpoints_enabled = enabled;
        self
    }

    /// The configuration as the engine applies it.
    ///
    /// - If either design dimension is not a positive finite number, both
    ///   fall back to 1920×1080.
    /// - A minimum that is not a positive finite number, or a maximum that is
    ///   not finite, takes its default.
    /// - An inverted pair (including a maximum of zero or below) is repaired
    ///   by raising the maximum to `max(min, 1.65)` for the UI scale and
    ///   `max(min, 1.2)` for fonts.
    ///
    /// The result always satisfies `min <= max` for both pairs.
    pub fn resolved(&self) -> ResolvedConfiguration {
        let (design_width, design_height) =
            if is_positive(self.design_width) && is_positive(self.design_height) {
                (self.design_width, self.design_height)
            } else {
                (DEFAULT_DESIGN_WIDTH, DEFAULT_DESIGN_HEIGHT)
            };

        let (min_scale, max_scale) = repair_bounds(
            positive_or(self.min_scale, DEFAULT_MIN_SCALE),
            finite_or(self.max_scale, DEFAULT_MAX_SCALE),
            REPAIR_MAX_SCALE,
        );
        let (min_font_scale, max_font_scale) = repair_bounds(
            positive_or(self.min_font_scale, DEFAULT_MIN_FONT_SCALE),
            finite_or(self.max_font_scale, DEFAULT_MAX_FONT_SCALE),
            REPAIR_MAX_FONT_SCALE,
        );

        ResolvedConfiguration {
            mode: self.mode,
            fixed_scale: if self.fixed_scale > 0.0 {
                self.fixed_scale
            } else {
                1.0
            },
            design_width,
            design_height,
            min_scale,
            max_scale,
            min_font_scale,
            max_font_scale,
            breakpoints_enabled: self.breakpoints_enabled,
        }
    }
}

/// A [`ScaleConfiguration`] after default substitution and bound repair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedConfiguration {
    pub mode: ScaleMode,
    pub fixed_scale: f64,
    pub design_width: f64,
    pub design_height: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub min_font_scale: f64,
    pub max_font_scale: f64,
    pub breakpoints_enabled: bool,
}

fn is_positive(value: f64) -> bool {
    value > 0.0 && value.is_finite()
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if is_positive(value) { value } else { fallback }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

// `min` is always positive here, so a non-positive `max` counts as inverted.
fn repair_bounds(min: f64, max: f64, floor: f64) -> (f64, f64) {
    if max < min { (min, min.max(floor)) } else { (min, max) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_unchanged() {
        let resolved = ScaleConfiguration::default().resolved();
        assert_eq!(resolved.design_width, 1920.0);
        assert_eq!(resolved.design_height, 1080.0);
        assert_eq!(resolved.min_scale, 0.75);
        assert_eq!(resolved.max_scale, 2.0);
        assert_eq!(resolved.min_font_scale, 0.85);
        assert_eq!(resolved.max_font_scale, 1.8);
        assert!(resolved.breakpoints_enabled);
    }

    #[test]
    fn inverted_scale_bounds_are_repaired() {
        let resolved = ScaleConfiguration::default()
            .with_scale_bounds(1.0, 0.5)
            .resolved();
        assert_eq!(resolved.min_scale, 1.0);
        assert_eq!(resolved.max_scale, 1.65);

        // A minimum above the repair floor wins.
        let resolved = ScaleConfiguration::default()
            .with_scale_bounds(2.5, 1.0)
            .resolved();
        assert_eq!(resolved.max_scale, 2.5);
    }

    #[test]
    fn non_positive_max_is_repaired_like_an_inverted_pair() {
        let resolved = ScaleConfiguration::default()
            .with_scale_bounds(1.0, 0.0)
            .resolved();
        assert_eq!(resolved.min_scale, 1.0);
        assert_eq!(resolved.max_scale, 1.65);

        let resolved = ScaleConfiguration::default()
            .with_font_bounds(1.0, -1.0)
            .resolved();
        assert_eq!(resolved.min_font_scale, 1.0);
        assert_eq!(resolved.max_font_scale, 1.2);
    }

    #[test]
    fn inverted_font_bounds_are_repaired_independently() {
        let resolved = ScaleConfiguration::default()
            .with_font_bounds(1.0, 0.9)
            .resolved();
        assert_eq!(resolved.min_font_scale, 1.0);
        assert_eq!(resolved.max_font_scale, 1.2);
        assert_eq!(resolved.max_scale, DEFAULT_MAX_SCALE);
    }

    #[test]
    fn non_positive_design_size_falls_back_as_a_pair() {
        let resolved = ScaleConfiguration::default()
            .with_design_size(1280.0, 0.0)
            .resolved();
        assert_eq!(resolved.design_width, 1920.0);
        assert_eq!(resolved.design_height, 1080.0);

        let resolved = ScaleConfiguration::default()
            .with_design_size(f64::NAN, 720.0)
            .resolved();
        assert_eq!(resolved.design_width, 1920.0);
    }

    #[test]
    fn unusable_bounds_take_defaults() {
        let resolved = ScaleConfiguration::default()
            .with_scale_bounds(f64::NAN, f64::INFINITY)
            .resolved();
        assert_eq!(resolved.min_scale, DEFAULT_MIN_SCALE);
        assert_eq!(resolved.max_scale, DEFAULT_MAX_SCALE);

        // The minimum defaults first; the negative maximum is then inverted.
        let resolved = ScaleConfiguration::default()
            .with_scale_bounds(-2.0, -1.0)
            .resolved();
        assert_eq!(resolved.min_scale, DEFAULT_MIN_SCALE);
        assert_eq!(resolved.max_scale, REPAIR_MAX_SCALE);
    }

    #[test]
    fn non_positive_fixed_scale_is_neutral() {
        let resolved = ScaleConfiguration::default()
            .with_fixed_scale(0.0)
            .resolved();
        assert_eq!(resolved.fixed_scale, 1.0);
    }

    #[test]
    fn legacy_percent_converts_to_multiplier() {
        let config = ScaleConfiguration::legacy_percent(125.0);
        assert_eq!(config.mode, ScaleMode::LegacyPercent);
        assert!((config.fixed_scale - 1.25).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_payload_fills_defaults() {
        let config: ScaleConfiguration =
            serde_json::from_str(r#"{"mode":"dpi-only","maxScale":1.5}"#)
                .unwrap_or_default();
        assert_eq!(config.mode, ScaleMode::DpiOnly);
        assert_eq!(config.max_scale, 1.5);
        assert_eq!(config.min_scale, DEFAULT_MIN_SCALE);
        assert_eq!(config.design_width, DEFAULT_DESIGN_WIDTH);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_string(&ScaleConfiguration::default()).unwrap_or_default();
        assert!(json.contains("\"fixedScale\":1.0"));
        assert!(json.contains("\"breakpointsEnabled\":true"));
        assert!(json.contains("\"mode\":\"Automatic\""));
    }
}
