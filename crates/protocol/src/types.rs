use serde::{Deserialize, Deserializer, Serialize};

/// Policy used to turn window and monitor metrics into a UI multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ScaleMode {
    /// Window fill ratio against the design canvas, multiplied by DPI scale.
    #[default]
    Automatic,
    /// Monitor DPI relative to 96 only; window size is ignored.
    DpiOnly,
    /// Explicit user multiplier (`fixedScale`).
    FixedCustom,
    /// Explicit multiplier carried over from percent-based settings.
    LegacyPercent,
}

impl ScaleMode {
    pub const ALL: [Self; 4] = [
        Self::Automatic,
        Self::DpiOnly,
        Self::FixedCustom,
        Self::LegacyPercent,
    ];

    /// Resolve a mode from a settings string.
    ///
    /// Matching ignores case and separators, so `"DpiOnly"`, `"dpi-only"` and
    /// `"DPI_ONLY"` are all the same mode. Anything unrecognized is
    /// [`ScaleMode::Automatic`].
    pub fn from_name(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "dpionly" | "dpi" => Self::DpiOnly,
            "fixedcustom" | "fixed" | "custom" => Self::FixedCustom,
            "legacypercent" | "legacy" | "percent" => Self::LegacyPercent,
            _ => Self::Automatic,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Automatic => "Automatic",
            Self::DpiOnly => "DpiOnly",
            Self::FixedCustom => "FixedCustom",
            Self::LegacyPercent => "LegacyPercent",
        }
    }

    /// Whether the mode takes its multiplier from `fixedScale`.
    pub fn uses_fixed_scale(self) -> bool {
        matches!(self, Self::FixedCustom | Self::LegacyPercent)
    }

    /// The following mode in [`ScaleMode::ALL`], wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for ScaleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// Unknown names fall back to Automatic instead of failing the whole payload.
impl<'de> Deserialize<'de> for ScaleMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

/// Coarse spacing tier derived from the effective scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Density {
    Compact,
    #[default]
    Normal,
    Spacious,
}

impl std::fmt::Display for Density {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compact => write!(f, "Compact"),
            Self::Normal => write!(f, "Normal"),
            Self::Spacious => write!(f, "Spacious"),
        }
    }
}

/// One published field of [`ScaleState`](crate::ScaleState).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScaleField {
    EffectiveScale,
    FontScale,
    Density,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_names_are_lenient() {
        assert_eq!(ScaleMode::from_name("DpiOnly"), ScaleMode::DpiOnly);
        assert_eq!(ScaleMode::from_name("dpi-only"), ScaleMode::DpiOnly);
        assert_eq!(ScaleMode::from_name("FIXED_CUSTOM"), ScaleMode::FixedCustom);
        assert_eq!(ScaleMode::from_name("legacy percent"), ScaleMode::LegacyPercent);
    }

    #[test]
    fn unknown_mode_is_automatic() {
        assert_eq!(ScaleMode::from_name("Stretch"), ScaleMode::Automatic);
        assert_eq!(ScaleMode::from_name(""), ScaleMode::Automatic);
        let mode: ScaleMode = serde_json::from_str("\"Zoomy\"").unwrap_or(ScaleMode::DpiOnly);
        assert_eq!(mode, ScaleMode::Automatic);
    }

    #[test]
    fn mode_serializes_as_name() {
        let json = serde_json::to_string(&ScaleMode::LegacyPercent).unwrap_or_default();
        assert_eq!(json, "\"LegacyPercent\"");
        assert_eq!(ScaleMode::LegacyPercent.to_string(), "LegacyPercent");
    }

    #[test]
    fn next_cycles_through_all_modes() {
        let mut mode = ScaleMode::Automatic;
        for expected in [
            ScaleMode::DpiOnly,
            ScaleMode::FixedCustom,
            ScaleMode::LegacyPercent,
            ScaleMode::Automatic,
        ] {
            mode = mode.next();
            assert_eq!(mode, expected);
        }
    }

    #[test]
    fn fixed_scale_modes() {
        assert!(ScaleMode::FixedCustom.uses_fixed_scale());
        assert!(ScaleMode::LegacyPercent.uses_fixed_scale());
        assert!(!ScaleMode::Automatic.uses_fixed_scale());
        assert!(!ScaleMode::DpiOnly.uses_fixed_scale());
    }
}
