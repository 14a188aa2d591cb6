//! SQLite store for trades, reflections, profiles and settings.

pub mod connection;
pub mod migration_runner;
pub mod profiles;
pub mod reflections;
pub mod settings;
pub mod trades;

pub use connection::Database;
pub use migration_runner::{Migration, MigrationRunner};
pub use profiles::ProfileRepository;
