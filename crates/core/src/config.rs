use mapscale_protocol::ScaleConfiguration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration payload is empty")]
    Empty,
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a JSON configuration payload pushed by a settings host.
///
/// Missing fields take their defaults and unknown mode names resolve to
/// `Automatic`; only malformed JSON or mistyped fields are errors. Range
/// problems (inverted bounds, non-positive sizes) are accepted here and
/// repaired when the engine applies the configuration.
pub fn parse_configuration(data: &[u8]) -> Result<ScaleConfiguration, ConfigError> {
    if data.iter().all(u8::is_ascii_whitespace) {
        return Err(ConfigError::Empty);
    }
    Ok(serde_json::from_slice(data)?)
}
