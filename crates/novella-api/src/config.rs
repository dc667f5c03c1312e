//! Environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use novella_content::source::DEFAULT_PATH_TEMPLATE;
use novella_core::ids::ChapterId;
use novella_narrative::application::player::EngineConfig;
use novella_narrative::application::typewriter::DEFAULT_CHAR_INTERVAL;

use crate::error::AppError;

/// Settings read from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding chapter documents.
    pub content_dir: PathBuf,
    /// File name pattern with an `{id}` placeholder.
    pub chapter_path_template: String,
    pub final_chapter: ChapterId,
    pub typewriter_interval: Duration,
    /// PostgreSQL URL for the progress store. In-memory when absent.
    pub database_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 3000,
            content_dir: PathBuf::from("content"),
            chapter_path_template: DEFAULT_PATH_TEMPLATE.to_owned(),
            final_chapter: ChapterId::FIRST,
            typewriter_interval: DEFAULT_CHAR_INTERVAL,
            database_url: None,
        }
    }
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, falling back to defaults for
    /// anything unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a value is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => defaults.port,
        };
        let final_chapter = match lookup("FINAL_CHAPTER") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .and_then(ChapterId::new)
                .ok_or_else(|| {
                    AppError::Config(format!("FINAL_CHAPTER must be a positive integer, got {raw:?}"))
                })?,
            None => defaults.final_chapter,
        };
        let typewriter_interval = match lookup("TYPEWRITER_INTERVAL_MS") {
            Some(raw) => raw.parse().map(Duration::from_millis).map_err(|e| {
                AppError::Config(format!("TYPEWRITER_INTERVAL_MS must be an integer: {e}"))
            })?,
            None => defaults.typewriter_interval,
        };
        let chapter_path_template = lookup("CHAPTER_PATH_TEMPLATE")
            .unwrap_or(defaults.chapter_path_template);
        if !chapter_path_template.contains("{id}") {
            return Err(AppError::Config(
                "CHAPTER_PATH_TEMPLATE must contain an {id} placeholder".to_owned(),
            ));
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            content_dir: lookup("CONTENT_DIR").map_or(defaults.content_dir, PathBuf::from),
            chapter_path_template,
            final_chapter,
            typewriter_interval,
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
        })
    }

    /// Engine tunables for new sessions.
    #[must_use]
    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            final_chapter: self.final_chapter,
            typewriter_interval: self.typewriter_interval,
        }
    }
}
