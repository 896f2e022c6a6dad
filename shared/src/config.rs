use thiserror::Error;

/// Configuration errors raised while loading or validating settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be {requirement}")]
    Invalid {
        field: &'static str,
        requirement: &'static str,
    },
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("failed to read config file {path}: {reason}")]
    Read { path: String, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, requirement: &'static str) -> Self {
        Self::Invalid { field, requirement }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Split-screen camera tuning
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CameraConfig {
    /// Distance between two players at which the screen splits
    pub split_distance: f64,
    /// Half-width of the dead zone around `split_distance`
    pub split_hysteresis: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            split_distance: 25.0,
            split_hysteresis: 5.0,
        }
    }
}

impl CameraConfig {
    /// Distance below which split mode merges back into a single view.
    pub fn merge_below(&self) -> f64 {
        self.split_distance - self.split_hysteresis
    }

    /// Distance above which single view splits.
    pub fn split_above(&self) -> f64 {
        self.split_distance + self.split_hysteresis
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.split_distance.is_finite() || self.split_distance <= 0.0 {
            return Err(ConfigError::invalid("splitDistance", "finite and > 0"));
        }
        if !self.split_hysteresis.is_finite() || self.split_hysteresis < 0.0 {
            return Err(ConfigError::invalid("splitHysteresis", "finite and >= 0"));
        }
        if self.split_hysteresis >= self.split_distance {
            return Err(ConfigError::invalid(
                "splitHysteresis",
                "smaller than splitDistance",
            ));
        }
        Ok(())
    }
}

/// Match rules, fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchConfig {
    /// Round wins needed to take the game
    pub rounds_to_win: u32,
    /// Seconds the round banner is shown before control is handed over
    pub start_delay: f64,
    /// Seconds the end-of-round message is shown
    pub end_delay: f64,
    pub min_players: u32,
    /// Upper bound on player numbers. The quadrant layout supports at most 4.
    pub max_players: u32,
    pub camera: CameraConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            rounds_to_win: 5,
            start_delay: 3.0,
            end_delay: 3.0,
            min_players: 2,
            max_players: 4,
            camera: CameraConfig::default(),
        }
    }
}

impl MatchConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rounds_to_win == 0 {
            return Err(ConfigError::invalid("roundsToWin", ">= 1"));
        }
        if !self.start_delay.is_finite() || self.start_delay < 0.0 {
            return Err(ConfigError::invalid("startDelay", "finite and >= 0"));
        }
        if !self.end_delay.is_finite() || self.end_delay < 0.0 {
            return Err(ConfigError::invalid("endDelay", "finite and >= 0"));
        }
        if self.min_players == 0 {
            return Err(ConfigError::invalid("minPlayers", ">= 1"));
        }
        if self.max_players < self.min_players || self.max_players > 4 {
            return Err(ConfigError::invalid(
                "maxPlayers",
                ">= minPlayers and <= 4",
            ));
        }
        self.camera.validate()
    }
}
