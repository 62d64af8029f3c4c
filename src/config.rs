// ⚙️ Settings - defaults, optional TOML file, BELEG_ environment variables
//
// Environment variables use a double underscore for nesting:
// BELEG_SERVER__BIND=0.0.0.0:8080, BELEG_REFERENCE_DATE=2026-02-28.

use chrono::NaiveDate;
use config::{Config as ConfigLoader, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::role::UserRole;

pub const ENV_PREFIX: &str = "BELEG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address the API server listens on
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `EnvFilter` directive, overridden by RUST_LOG
    pub filter: String,

    /// Log file of the terminal UI
    pub file: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "belegzuordnung=info".to_string(),
            file: PathBuf::from("belegzuordnung.log"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub log: LogSettings,

    /// "Today" for the inbox date ranges; the mock data is anchored at March 2026
    pub reference_date: NaiveDate,

    /// Persona active at startup
    pub role: UserRole,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            log: LogSettings::default(),
            reference_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap_or_default(),
            role: UserRole::TaxClerk,
        }
    }
}

impl Settings {
    /// Layer an optional file and the environment over the defaults
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigLoader::builder();

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        Ok(settings)
    }
}
