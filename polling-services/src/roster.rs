//! The fixed, ordered list of calendars aggregated on every run.

use serde::Deserialize;
use shared::CalendarSource;
use std::collections::HashSet;
use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Failed to read roster: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Roster entry {index} has an empty {field}")]
    EmptyField { index: usize, field: &'static str },

    #[error("Roster name '{0}' is used by more than one calendar")]
    DuplicateName(String),
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    calendars: Vec<CalendarSource>,
}

/// Immutable roster, cheap to clone and share between tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster(Arc<[CalendarSource]>);

impl Roster {
    pub fn new(sources: Vec<CalendarSource>) -> Result<Self, RosterError> {
        let mut seen = HashSet::new();
        for (index, source) in sources.iter().enumerate() {
            if source.name.trim().is_empty() {
                return Err(RosterError::EmptyField { index, field: "name" });
            }
            if source.id.trim().is_empty() {
                return Err(RosterError::EmptyField { index, field: "id" });
            }
            if !seen.insert(source.name.as_str()) {
                return Err(RosterError::DuplicateName(source.name.clone()));
            }
        }

        Ok(Self(sources.into()))
    }

    /// Load a roster file; the format follows the file extension
    pub fn load(path: &Path) -> Result<Self, RosterError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?;
        Self::from_settings(settings)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, RosterError> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Toml))
            .build()?;
        Self::from_settings(settings)
    }

    fn from_settings(settings: config::Config) -> Result<Self, RosterError> {
        let file: RosterFile = settings.try_deserialize()?;
        Self::new(file.calendars)
    }
}

impl Deref for Roster {
    type Target = [CalendarSource];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
