use crate::error::ConfigError;
use crate::event::OutcomeOdds;
use dotenvy::dotenv;
use log::debug;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::ops::Range;
use std::path::Path;
use std::str::FromStr;

/// Points for positions 1..=10, everyone behind scores nothing
pub const DEFAULT_POINTS: [u32; 10] = [25, 18, 15, 12, 10, 8, 6, 4, 2, 1];

/// Tunable constants of a race.
/// Passed into the engine at construction, two races in one process may use different settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceSettings {
    /// Minutes added to a driver serving a pit stop
    pub pitstop_time: f64,
    /// Minutes added to every driver when a yellow flag or safety car is out
    pub slowdown_time: f64,
    /// Points by finishing position
    pub points: Vec<u32>,
    pub breakdown_percent: u32,
    pub collision_percent: u32,
    pub lap_time_min: f64,
    pub lap_time_max: f64,
    pub max_laps: u32,
    pub max_teams: usize,
}

impl Default for RaceSettings {
    fn default() -> Self {
        Self {
            pitstop_time: 5.0,
            slowdown_time: 1.0,
            points: DEFAULT_POINTS.to_vec(),
            breakdown_percent: 5,
            collision_percent: 2,
            lap_time_min: 1.0,
            lap_time_max: 2.0,
            max_laps: 5,
            max_teams: 10,
        }
    }
}

impl RaceSettings {
    /// Defaults, then the optional JSON file, then environment overrides.
    /// The result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env()?;
        settings.validate()?;
        debug!("race settings: {:?}", settings);
        Ok(settings)
    }

    /// Reads settings from a JSON file, missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::SettingsRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Overrides fields from `GRANDPRIX_*` environment variables.
    /// A `.env` file in the working directory is loaded first.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        dotenv().ok();
        env_override("GRANDPRIX_PITSTOP_TIME", &mut self.pitstop_time)?;
        env_override("GRANDPRIX_SLOWDOWN_TIME", &mut self.slowdown_time)?;
        env_override("GRANDPRIX_BREAKDOWN_PERCENT", &mut self.breakdown_percent)?;
        env_override("GRANDPRIX_COLLISION_PERCENT", &mut self.collision_percent)?;
        env_override("GRANDPRIX_MAX_LAPS", &mut self.max_laps)?;
        env_override("GRANDPRIX_MAX_TEAMS", &mut self.max_teams)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let times = [
            ("pitstop_time", self.pitstop_time),
            ("slowdown_time", self.slowdown_time),
            ("lap_time_min", self.lap_time_min),
            ("lap_time_max", self.lap_time_max),
        ];
        if let Some((name, value)) = times.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(ConfigError::InvalidSettings(format!(
                "{} must be a non-negative number, got {}",
                name, value
            )));
        }
        if self.lap_time_min >= self.lap_time_max {
            return Err(ConfigError::InvalidSettings(format!(
                "lap time range {}..{} is empty",
                self.lap_time_min, self.lap_time_max
            )));
        }
        match self.breakdown_percent.checked_add(self.collision_percent) {
            Some(total) if total <= 100 => {}
            _ => {
                return Err(ConfigError::InvalidSettings(format!(
                    "breakdown ({}%) and collision ({}%) odds exceed 100%",
                    self.breakdown_percent, self.collision_percent
                )));
            }
        }
        if self.max_laps == 0 || self.max_teams == 0 {
            return Err(ConfigError::InvalidSettings(String::from(
                "max_laps and max_teams must be positive",
            )));
        }
        Ok(())
    }

    pub fn odds(&self) -> OutcomeOdds {
        OutcomeOdds::new(self.breakdown_percent, self.collision_percent)
    }

    pub fn lap_time_range(&self) -> Range<f64> {
        self.lap_time_min..self.lap_time_max
    }

    /// Points for a 0-based finishing position
    pub fn points_for(&self, position: usize) -> u32 {
        self.points.get(position).copied().unwrap_or(0)
    }
}

fn env_override<T: FromStr>(key: &str, target: &mut T) -> Result<(), ConfigError> {
    if let Ok(value) = env::var(key) {
        *target = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
            key: String::from(key),
            value,
        })?;
    }
    Ok(())
}
