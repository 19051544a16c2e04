//! Table settings.
//!
//! Every constant of a Seka table lives here with its house default. Settings
//! deserialize from JSON with missing fields falling back to the defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default ante collected from every dealt player.
pub const DEFAULT_ANTE: u64 = 10;
/// Default chip stack for a joining player.
pub const DEFAULT_STARTING_CHIPS: u64 = 1000;
pub const DEFAULT_MIN_PLAYERS: usize = 2;
pub const DEFAULT_MAX_PLAYERS: usize = 7;
pub const DEFAULT_MIN_BET: u64 = 10;
pub const DEFAULT_MIN_RAISE: u64 = 10;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("ante must be positive")]
    ZeroAnte,
    #[error("min players must be at least 2, got {0}")]
    MinPlayers(usize),
    #[error("max players must be between min players and 7, got {0}")]
    MaxPlayers(usize),
    #[error("vara buy-in ratio must have a non-zero denominator not below its numerator")]
    VaraRatio,
    #[error("turn timeout must be positive")]
    ZeroTurnTimeout,
    #[error("invalid settings json: {0}")]
    Json(String),
}

/// Seka table configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub ante: u64,
    pub starting_chips: u64,
    pub min_players: usize,
    pub max_players: usize,
    /// Smallest opening raise target when nothing has been bet.
    pub min_bet: u64,
    /// Smallest increment over the table bet for a re-raise.
    pub min_raise: u64,
    /// Vara buy-in as `pot * numerator / denominator`, floored.
    pub vara_buy_in_numerator: u64,
    pub vara_buy_in_denominator: u64,
    /// Each other player pays `ante * multiplier` to a pure Ace Seka winner.
    pub seka_aces_penalty_multiplier: u64,
    pub turn_timeout_ms: u64,
    pub fold_display_ms: u64,
    pub showdown_display_ms: u64,
    pub expose_display_ms: u64,
    pub vote_countdown_secs: u32,
    /// Fixed RNG seed for reproducible deals.
    pub seed: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            ante: DEFAULT_ANTE,
            starting_chips: DEFAULT_STARTING_CHIPS,
            min_players: DEFAULT_MIN_PLAYERS,
            max_players: DEFAULT_MAX_PLAYERS,
            min_bet: DEFAULT_MIN_BET,
            min_raise: DEFAULT_MIN_RAISE,
            vara_buy_in_numerator: 1,
            vara_buy_in_denominator: 2,
            seka_aces_penalty_multiplier: 2,
            turn_timeout_ms: 20_000,
            fold_display_ms: 2_000,
            showdown_display_ms: 4_000,
            expose_display_ms: 5_000,
            vote_countdown_secs: 10,
            seed: None,
        }
    }
}

impl GameSettings {
    /// Parse settings from JSON; absent fields keep their defaults.
    ///
    /// ```
    /// use seka_rs::config::GameSettings;
    ///
    /// let s = GameSettings::from_json(r#"{"ante": 20, "seed": 7}"#).unwrap();
    /// assert_eq!(s.ante, 20);
    /// assert_eq!(s.starting_chips, 1000);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ante == 0 {
            return Err(ConfigError::ZeroAnte);
        }
        if self.min_players < 2 {
            return Err(ConfigError::MinPlayers(self.min_players));
        }
        if self.max_players < self.min_players || self.max_players > DEFAULT_MAX_PLAYERS {
            return Err(ConfigError::MaxPlayers(self.max_players));
        }
        if self.vara_buy_in_denominator == 0
            || self.vara_buy_in_numerator > self.vara_buy_in_denominator
        {
            return Err(ConfigError::VaraRatio);
        }
        if self.turn_timeout_ms == 0 {
            return Err(ConfigError::ZeroTurnTimeout);
        }
        Ok(())
    }

    /// Fee charged for an expose; equal to the ante.
    pub fn expose_fee(&self) -> u64 {
        self.ante
    }

    pub fn seka_aces_penalty(&self) -> u64 {
        self.ante * self.seka_aces_penalty_multiplier
    }

    pub fn vara_buy_in(&self, vara_pot: u64) -> u64 {
        vara_pot * self.vara_buy_in_numerator / self.vara_buy_in_denominator
    }

    pub fn turn_timeout(&self) -> Duration {
        Duration::from_millis(self.turn_timeout_ms)
    }

    pub fn fold_display(&self) -> Duration {
        Duration::from_millis(self.fold_display_ms)
    }

    pub fn showdown_display(&self) -> Duration {
        Duration::from_millis(self.showdown_display_ms)
    }

    pub fn expose_display(&self) -> Duration {
        Duration::from_millis(self.expose_display_ms)
    }
}
