//! Server and plugin settings.
//!
//! Values are resolved with priority `amanote.toml` > environment (`AMANOTE_*`,
//! `.env` honoured) > defaults. The plugin section mirrors the admin settings
//! of the filter: auto-save period, save-in-provider flag and activation key.

use crate::error::{FilterError, Result};
use log::{info, warn};
use serde::Deserialize;
use std::path::Path;

/// Default config file, overridable with `AMANOTE_CONFIG`.
pub const CONFIG_FILE: &str = "amanote.toml";

/// Upper bound of the auto-save period, in minutes.
pub const MAX_AUTOSAVE_PERIOD: u32 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// SQLite database holding the host tables.
    pub database: String,
    pub plugin: PluginSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PluginSettings {
    pub version: String,
    /// Minutes between automatic saves, `0` disables auto-save.
    pub autosave_period: u32,
    pub save_in_provider: bool,
    /// Activation key. Unset disables the podcast creator.
    pub key: Option<String>,
    /// Logo location relative to the site root.
    pub logo_path: String,
    /// Delay before the client attaches its click listener.
    pub listener_delay_ms: u32,
    /// Budget of the HTTPS reachability check of the site.
    pub probe_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database: "moodle.sqlite".to_string(),
            plugin: PluginSettings::default(),
        }
    }
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            version: "2020101900".to_string(),
            autosave_period: 5,
            save_in_provider: true,
            key: None,
            logo_path: "/filter/amanote/pix/amanote-logo.png".to_string(),
            listener_delay_ms: common::model::params::DEFAULT_LISTENER_DELAY_MS,
            probe_timeout_ms: 3000,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    server: Option<ServerSection>,
    plugin: Option<PluginSection>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
    database: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PluginSection {
    version: Option<String>,
    autosave_period: Option<u32>,
    save_in_provider: Option<bool>,
    key: Option<String>,
    logo_path: Option<String>,
    listener_delay_ms: Option<u32>,
    probe_timeout_ms: Option<u64>,
}

impl Settings {
    /// Loads the settings for the running process.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let path = std::env::var("AMANOTE_CONFIG").unwrap_or_else(|_| CONFIG_FILE.to_string());
        let contents = read_optional(Path::new(&path))?;
        if contents.is_some() {
            info!("Using settings from {}", path);
        }

        Self::from_sources(contents.as_deref(), |name| std::env::var(name).ok())
    }

    /// Resolves settings from an optional TOML document and an environment lookup.
    pub fn from_sources<F>(toml_doc: Option<&str>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();
        settings.apply_env(&env)?;

        if let Some(doc) = toml_doc {
            let file: FileConfig = toml::from_str(doc).map_err(|e| FilterError::Config {
                reason: e.to_string(),
            })?;
            settings.apply_file(file);
        }

        settings.plugin.autosave_period = clamp_autosave(settings.plugin.autosave_period);
        if settings.plugin.key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            settings.plugin.key = None;
        }

        Ok(settings)
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }

    fn apply_env<F>(&mut self, env: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = env("AMANOTE_HOST") {
            self.host = host;
        }
        if let Some(port) = env("AMANOTE_PORT") {
            self.port = parse_env("AMANOTE_PORT", &port)?;
        }
        if let Some(database) = env("AMANOTE_DATABASE") {
            self.database = database;
        }
        if let Some(period) = env("AMANOTE_AUTOSAVE_PERIOD") {
            self.plugin.autosave_period = parse_env("AMANOTE_AUTOSAVE_PERIOD", &period)?;
        }
        if let Some(flag) = env("AMANOTE_SAVE_IN_PROVIDER") {
            self.plugin.save_in_provider = parse_flag(&flag);
        }
        if let Some(key) = env("AMANOTE_KEY") {
            self.plugin.key = Some(key);
        }
        if let Some(delay) = env("AMANOTE_LISTENER_DELAY_MS") {
            self.plugin.listener_delay_ms = parse_env("AMANOTE_LISTENER_DELAY_MS", &delay)?;
        }
        Ok(())
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(server) = file.server {
            if let Some(host) = server.host {
                self.host = host;
            }
            if let Some(port) = server.port {
                self.port = port;
            }
            if let Some(database) = server.database {
                self.database = database;
            }
        }

        if let Some(plugin) = file.plugin {
            let target = &mut self.plugin;
            if let Some(version) = plugin.version {
                target.version = version;
            }
            if let Some(period) = plugin.autosave_period {
                target.autosave_period = period;
            }
            if let Some(flag) = plugin.save_in_provider {
                target.save_in_provider = flag;
            }
            if plugin.key.is_some() {
                target.key = plugin.key;
            }
            if let Some(logo) = plugin.logo_path {
                target.logo_path = logo;
            }
            if let Some(delay) = plugin.listener_delay_ms {
                target.listener_delay_ms = delay;
            }
            if let Some(timeout) = plugin.probe_timeout_ms {
                target.probe_timeout_ms = timeout;
            }
        }
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(FilterError::Config {
            reason: format!("{}: {}", path.display(), e),
        }),
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| FilterError::Config {
        reason: format!("{} has an invalid value: {}", name, value),
    })
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn clamp_autosave(period: u32) -> u32 {
    if period > MAX_AUTOSAVE_PERIOD {
        warn!(
            "Auto-save period of {} minutes exceeds {}, clamping",
            period, MAX_AUTOSAVE_PERIOD
        );
        MAX_AUTOSAVE_PERIOD
    } else {
        period
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_without_sources() {
        let settings = Settings::from_sources(None, no_env).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.plugin.key, None);
    }

    #[test]
    fn file_wins_over_env() {
        let env: HashMap<&str, &str> = [
            ("AMANOTE_PORT", "9000"),
            ("AMANOTE_KEY", "from-env"),
            ("AMANOTE_SAVE_IN_PROVIDER", "0"),
        ]
        .into_iter()
        .collect();
        let doc = r#"
            [plugin]
            key = "from-file"
            autosave_period = 10
        "#;

        let settings =
            Settings::from_sources(Some(doc), |name| env.get(name).map(|v| v.to_string())).unwrap();

        assert_eq!(settings.port, 9000);
        assert_eq!(settings.plugin.key.as_deref(), Some("from-file"));
        assert_eq!(settings.plugin.autosave_period, 10);
        assert!(!settings.plugin.save_in_provider);
    }

    #[test]
    fn autosave_is_clamped_and_blank_key_dropped() {
        let doc = r#"
            [plugin]
            autosave_period = 90
            key = ""
        "#;
        let settings = Settings::from_sources(Some(doc), no_env).unwrap();

        assert_eq!(settings.plugin.autosave_period, MAX_AUTOSAVE_PERIOD);
        assert_eq!(settings.plugin.key, None);
    }

    #[test]
    fn invalid_sources_are_errors() {
        assert!(matches!(
            Settings::from_sources(Some("[plugin"), no_env),
            Err(FilterError::Config { .. })
        ));
        assert!(matches!(
            Settings::from_sources(None, |name| (name == "AMANOTE_PORT").then(|| "http".to_string())),
            Err(FilterError::Config { .. })
        ));
    }

    #[test]
    fn reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 8181\ndatabase = \"lms.sqlite\"").unwrap();

        let contents = read_optional(file.path()).unwrap();
        let settings = Settings::from_sources(contents.as_deref(), no_env).unwrap();

        assert_eq!(settings.port, 8181);
        assert_eq!(settings.database, "lms.sqlite");
        assert!(read_optional(Path::new("/nonexistent/amanote.toml")).unwrap().is_none());
    }
}
