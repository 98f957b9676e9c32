use serde::{Deserialize, Serialize};

use crate::types::{Density, ScaleField};

/// The DPI that corresponds to a 1.0× DPI scale.
pub const REFERENCE_DPI: f64 = 96.0;

/// Size and DPI most recently reported by the host surface.
///
/// Stored verbatim. Non-positive dimensions mean "unknown" and a
/// non-positive DPI means [`REFERENCE_DPI`]; that substitution happens when
/// the state is derived, not here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleMetrics {
    pub window_width: f64,
    pub window_height: f64,
    pub monitor_dpi: f64,
}

impl ScaleMetrics {
    pub fn new(window_width: f64, window_height: f64, monitor_dpi: f64) -> Self {
        Self {
            window_width,
            window_height,
            monitor_dpi,
        }
    }
}

impl Default for ScaleMetrics {
    fn default() -> Self {
        Self::new(0.0, 0.0, REFERENCE_DPI)
    }
}

/// Derived scale values published to every scaled surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleState {
    /// General UI multiplier.
    pub effective_scale: f64,
    /// Multiplier for text sizes.
    pub font_scale: f64,
    pub density: Density,
}

impl ScaleState {
    pub const NEUTRAL: Self = Self {
        effective_scale: 1.0,
        font_scale: 1.0,
        density: Density::Normal,
    };

    /// Per-field changes from `self` to `next`, in field order.
    ///
    /// Fields are compared by value, so an unchanged field yields nothing.
    pub fn changes_to(&self, next: &Self) -> Vec<ScaleChange> {
        let mut changes = Vec::new();
        if self.effective_scale != next.effective_scale {
            changes.push(ScaleChange::EffectiveScale {
                old: self.effective_scale,
                new: next.effective_scale,
            });
        }
        if self.font_scale != next.font_scale {
            changes.push(ScaleChange::FontScale {
                old: self.font_scale,
                new: next.font_scale,
            });
        }
        if self.density != next.density {
            changes.push(ScaleChange::Density {
                old: self.density,
                new: next.density,
            });
        }
        changes
    }
}

impl Default for ScaleState {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// A single published field moving from one value to another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "camelCase")]
pub enum ScaleChange {
    EffectiveScale { old: f64, new: f64 },
    FontScale { old: f64, new: f64 },
    Density { old: Density, new: Density },
}

impl ScaleChange {
    pub fn field(&self) -> ScaleField {
        match self {
            Self::EffectiveScale { .. } => ScaleField::EffectiveScale,
            Self::FontScale { .. } => ScaleField::FontScale,
            Self::Density { .. } => ScaleField::Density,
        }
    }
}

impl std::fmt::Display for ScaleChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EffectiveScale { old, new } => write!(f, "effective {old:.3} → {new:.3}"),
            Self::FontScale { old, new } => write!(f, "font      {old:.3} → {new:.3}"),
            Self::Density { old, new } => write!(f, "density   {old} → {new}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_state() {
        let state = ScaleState::default();
        assert_eq!(state.effective_scale, 1.0);
        assert_eq!(state.font_scale, 1.0);
        assert_eq!(state.density, Density::Normal);
    }

    #[test]
    fn default_metrics_are_unknown_size_at_reference_dpi() {
        let metrics = ScaleMetrics::default();
        assert_eq!(metrics.window_width, 0.0);
        assert_eq!(metrics.window_height, 0.0);
        assert_eq!(metrics.monitor_dpi, REFERENCE_DPI);
    }

    #[test]
    fn identical_states_have_no_changes() {
        let state = ScaleState::NEUTRAL;
        assert!(state.changes_to(&state).is_empty());
    }

    #[test]
    fn only_changed_fields_are_reported() {
        let old = ScaleState::NEUTRAL;
        let new = ScaleState {
            font_scale: 1.1,
            ..old
        };
        let changes = old.changes_to(&new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field(), ScaleField::FontScale);
        assert_eq!(changes[0], ScaleChange::FontScale { old: 1.0, new: 1.1 });
    }

    #[test]
    fn changes_follow_field_order() {
        let old = ScaleState::NEUTRAL;
        let new = ScaleState {
            effective_scale: 2.0,
            font_scale: 1.8,
            density: Density::Spacious,
        };
        let fields: Vec<ScaleField> = old.changes_to(&new).iter().map(ScaleChange::field).collect();
        assert_eq!(
            fields,
            vec![
                ScaleField::EffectiveScale,
                ScaleField::FontScale,
                ScaleField::Density
            ]
        );
    }

    #[test]
    fn change_serializes_with_field_tag() {
        let change = ScaleChange::Density {
            old: Density::Normal,
            new: Density::Compact,
        };
        let json = serde_json::to_string(&change).unwrap_or_default();
        assert_eq!(json, r#"{"field":"density","old":"Normal","new":"Compact"}"#);
    }

    #[test]
    fn changes_display_as_aligned_log_lines() {
        let change = ScaleChange::Density {
            old: Density::Normal,
            new: Density::Compact,
        };
        assert_eq!(change.to_string(), "density   Normal → Compact");
        let change = ScaleChange::FontScale { old: 1.0, new: 1.8 };
        assert_eq!(change.to_string(), "font      1.000 → 1.800");
        let change = ScaleChange::EffectiveScale { old: 1.0, new: 2.0 };
        assert_eq!(change.to_string(), "effective 1.000 → 2.000");
    }
}
