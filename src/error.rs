use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Setup rejected before a race starts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("number of laps must be between 1 and {max}, got {laps}")]
    InvalidLapCount { laps: u32, max: u32 },

    #[error("a race needs at least one team")]
    NoTeams,

    #[error("at most {max} teams can enter, got {teams}")]
    TooManyTeams { teams: usize, max: usize },

    #[error("team {team} must have exactly two drivers and two cars, got {drivers} drivers and {cars} cars")]
    TeamComposition {
        team: String,
        drivers: usize,
        cars: usize,
    },

    #[error("driver {name} is entered more than once")]
    DuplicateDriver { name: String },

    #[error("car #{car} stores {capacity} lap times but the race has {laps} laps")]
    LapStorage { car: u32, capacity: usize, laps: u32 },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("cannot read settings file {path}")]
    SettingsRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed settings file")]
    SettingsParse(#[from] serde_json::Error),

    #[error("environment variable {key} has invalid value {value:?}")]
    InvalidEnv { key: String, value: String },
}

/// Misuse of the race lifecycle, or failure writing the race report
#[derive(Debug, Error)]
pub enum RaceError {
    #[error("the race has already been started")]
    AlreadyStarted,

    #[error("the race has not finished yet")]
    NotFinished,

    #[error("points for this race have already been awarded")]
    AlreadyClassified,

    #[error("failed to write race report")]
    Io(#[from] io::Error),
}
