use crate::bot::BotConfig;
use crate::error::ConfigError;
use arena_shared::MatchConfig;

/// Environment variable naming a JSON host config file
pub const CONFIG_ENV: &str = "ARENA_CONFIG";

/// Headless host configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostConfig {
    pub tick_rate_hz: u32,
    pub snapshot_rate_hz: u32,
    pub rng_seed: u64,
    /// Players built at session start, clamped to the match bounds
    pub base_players: u32,
    /// Start a fresh session when a game ends instead of stopping
    pub restart_after_game_over: bool,
    pub screen_width: f64,
    pub screen_height: f64,
    pub bots: BotConfig,
    #[serde(rename = "match")]
    pub match_config: MatchConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 50,
            snapshot_rate_hz: 5,
            rng_seed: 42,
            base_players: 4,
            restart_after_game_over: false,
            screen_width: 1600.0,
            screen_height: 900.0,
            bots: BotConfig::default(),
            match_config: MatchConfig::default(),
        }
    }
}

impl HostConfig {
    /// Validate configuration values. Returns an error describing the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::Invalid {
                field: "tickRateHz",
                requirement: "> 0",
            });
        }
        if self.snapshot_rate_hz == 0 || self.snapshot_rate_hz > self.tick_rate_hz {
            return Err(ConfigError::Invalid {
                field: "snapshotRateHz",
                requirement: "> 0 and <= tickRateHz",
            });
        }
        if !(self.screen_width.is_finite() && self.screen_width > 0.0)
            || !(self.screen_height.is_finite() && self.screen_height > 0.0)
        {
            return Err(ConfigError::Invalid {
                field: "screenWidth/screenHeight",
                requirement: "finite and > 0",
            });
        }
        self.bots.validate()?;
        self.match_config.validate()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the file named by `ARENA_CONFIG`, or defaults when unset.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::load_file(&path),
            Err(_) => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn load_file(path: &str) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    pub fn tick_dt(&self) -> f64 {
        1.0 / self.tick_rate_hz as f64
    }

    /// Ticks between two snapshots
    pub fn snapshot_every(&self) -> u64 {
        (self.tick_rate_hz / self.snapshot_rate_hz).max(1) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = HostConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.snapshot_every(), 10);
        assert_eq!(config.tick_dt(), 0.02);
    }

    #[test]
    fn snapshot_rate_above_tick_rate_invalid() {
        let config = HostConfig {
            tick_rate_hz: 10,
            snapshot_rate_hz: 20,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_tick_rate_invalid() {
        let config = HostConfig {
            tick_rate_hz: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "tickRateHz",
                requirement: "> 0",
            })
        );
    }

    #[test]
    fn nested_match_config_is_validated() {
        let err = HostConfig::from_json(r#"{"match": {"roundsToWin": 0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "roundsToWin", .. }));
    }

    #[test]
    fn json_overrides_defaults() {
        let config = HostConfig::from_json(
            r#"{"basePlayers": 2, "rngSeed": 7, "match": {"roundsToWin": 3}, "bots": {"speed": 4.0}}"#,
        )
        .unwrap();
        assert_eq!(config.base_players, 2);
        assert_eq!(config.rng_seed, 7);
        assert_eq!(config.match_config.rounds_to_win, 3);
        assert_eq!(config.bots.speed, 4.0);
        assert_eq!(config.tick_rate_hz, 50);
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = HostConfig::load_file("/nonexistent/arena.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
