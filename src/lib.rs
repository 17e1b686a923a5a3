pub mod car;
pub mod config;
pub mod driver;
pub mod error;
pub mod event;
pub mod helpers;
pub mod race;
pub mod random;
pub mod standings;
pub mod team;
pub mod utils;
