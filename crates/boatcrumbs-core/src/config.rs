use std::fmt;
use std::num::NonZeroUsize;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackError};

pub const DEFAULT_LOOK_BACK: usize = 2;
pub const DEFAULT_SEGMENT_MAX_GAP_SECS: f64 = 900.0;
pub const DEFAULT_SEGMENT_MAX_GAP_MILES: f64 = 1.0;
pub const DEFAULT_IDLE_MIN_SECS: f64 = 900.0;

const ENV_LOOK_BACK: &str = "BOATCRUMBS_LOOK_BACK";
const ENV_SEGMENT_MAX_GAP_SECS: &str = "BOATCRUMBS_SEGMENT_MAX_GAP_SECS";
const ENV_SEGMENT_MAX_GAP_MILES: &str = "BOATCRUMBS_SEGMENT_MAX_GAP_MILES";
const ENV_IDLE_MIN_SECS: &str = "BOATCRUMBS_IDLE_MIN_SECS";

/// Number of retained fixes behind the current one used as the speed
/// baseline. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct LookBack(NonZeroUsize);

impl LookBack {
    pub const PAIRWISE: LookBack = LookBack(NonZeroUsize::MIN);

    pub fn new(value: usize) -> Result<Self> {
        NonZeroUsize::new(value)
            .map(Self)
            .ok_or_else(|| TrackError::InvalidConfig("look_back must be at least 1".into()))
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }

    /// Index of the baseline fix for position `index`.
    pub fn reference_index(&self, index: usize) -> usize {
        index.saturating_sub(self.get())
    }
}

impl Default for LookBack {
    fn default() -> Self {
        Self(NonZeroUsize::new(DEFAULT_LOOK_BACK).unwrap_or(NonZeroUsize::MIN))
    }
}

impl TryFrom<usize> for LookBack {
    type Error = TrackError;

    fn try_from(value: usize) -> Result<Self> {
        LookBack::new(value)
    }
}

impl From<LookBack> for usize {
    fn from(value: LookBack) -> Self {
        value.get()
    }
}

impl fmt::Display for LookBack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub look_back: LookBack,
    pub segment_max_gap_secs: f64,
    pub segment_max_gap_miles: f64,
    pub idle_min_secs: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            look_back: LookBack::default(),
            segment_max_gap_secs: DEFAULT_SEGMENT_MAX_GAP_SECS,
            segment_max_gap_miles: DEFAULT_SEGMENT_MAX_GAP_MILES,
            idle_min_secs: DEFAULT_IDLE_MIN_SECS,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Applies `BOATCRUMBS_*` overrides read through `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_LOOK_BACK) {
            let value: usize = parse_override(ENV_LOOK_BACK, &raw)?;
            self.look_back = LookBack::new(value)?;
        }
        if let Some(raw) = lookup(ENV_SEGMENT_MAX_GAP_SECS) {
            self.segment_max_gap_secs = parse_override(ENV_SEGMENT_MAX_GAP_SECS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SEGMENT_MAX_GAP_MILES) {
            self.segment_max_gap_miles = parse_override(ENV_SEGMENT_MAX_GAP_MILES, &raw)?;
        }
        if let Some(raw) = lookup(ENV_IDLE_MIN_SECS) {
            self.idle_min_secs = parse_override(ENV_IDLE_MIN_SECS, &raw)?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("segment_max_gap_secs", self.segment_max_gap_secs),
            ("segment_max_gap_miles", self.segment_max_gap_miles),
            ("idle_min_secs", self.idle_min_secs),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TrackError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

fn parse_override<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
{
    raw.trim()
        .parse()
        .map_err(|_| TrackError::InvalidConfig(format!("{key} has invalid value '{raw}'")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.look_back.get(), 2);
        assert_eq!(config.segment_max_gap_secs, 900.0);
        assert_eq!(config.segment_max_gap_miles, 1.0);
        assert_eq!(config.idle_min_secs, 900.0);
    }

    #[test]
    fn look_back_rejects_zero() {
        assert!(matches!(LookBack::new(0), Err(TrackError::InvalidConfig(_))));
        assert_eq!(LookBack::new(3).unwrap().get(), 3);
    }

    #[test]
    fn reference_index_clamps_to_first_fix() {
        let look_back = LookBack::new(2).unwrap();
        assert_eq!(look_back.reference_index(0), 0);
        assert_eq!(look_back.reference_index(1), 0);
        assert_eq!(look_back.reference_index(2), 0);
        assert_eq!(look_back.reference_index(5), 3);
    }

    #[test]
    fn toml_overrides_only_named_fields() {
        let config = PipelineConfig::from_toml_str("look_back = 4\nidle_min_secs = 600.0\n").unwrap();
        assert_eq!(config.look_back.get(), 4);
        assert_eq!(config.idle_min_secs, 600.0);
        assert_eq!(config.segment_max_gap_secs, DEFAULT_SEGMENT_MAX_GAP_SECS);
    }

    #[test]
    fn toml_rejects_zero_look_back_and_unknown_keys() {
        assert!(PipelineConfig::from_toml_str("look_back = 0").is_err());
        assert!(PipelineConfig::from_toml_str("lookback = 3").is_err());
    }

    #[test]
    fn env_style_overrides_are_validated() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("BOATCRUMBS_LOOK_BACK", "3"),
            ("BOATCRUMBS_SEGMENT_MAX_GAP_MILES", "2.5"),
        ]);
        let config = PipelineConfig::default()
            .with_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.look_back.get(), 3);
        assert_eq!(config.segment_max_gap_miles, 2.5);

        let err = PipelineConfig::default()
            .with_overrides(|key| (key == "BOATCRUMBS_IDLE_MIN_SECS").then(|| "-1".to_string()))
            .unwrap_err();
        assert!(matches!(err, TrackError::InvalidConfig(_)));
    }
}
