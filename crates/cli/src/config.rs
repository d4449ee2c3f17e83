//! Runtime configuration and persisted session credentials.

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use taskdeck_api::User;

/// Default service location, matching the development server.
const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Client configuration resolved from flags and environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the taskdeck service.
    pub api_url: String,
    /// Directory holding credentials and the log file.
    pub state_dir: PathBuf,
}

impl Config {
    /// Resolve configuration. `api_url` comes from the `--api-url` flag or
    /// `TASKDECK_API_URL` (clap reads the environment for us).
    pub fn resolve(api_url: Option<String>) -> Result<Self> {
        Ok(Self {
            api_url: api_url
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            state_dir: state_dir()?,
        })
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.state_dir.join("credentials.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.state_dir.join("taskdeck.log")
    }
}

/// State directory: `$TASKDECK_CONFIG_DIR` when set, else `~/.config/taskdeck`.
fn state_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os("TASKDECK_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("taskdeck"))
}

/// Persisted session: the bearer token and the signed-in user.
///
/// This is the client storage every request's bearer token is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub token: String,
    pub user: User,
}

impl Credentials {
    /// Load the persisted session, if any. A missing or unreadable file is
    /// treated as signed out.
    pub fn load(config: &Config) -> Option<Self> {
        let data = fs::read_to_string(config.credentials_path()).ok()?;
        serde_json::from_str(&data).ok()
    }

    /// Persist the session, creating the state directory on demand.
    pub fn save(&self, config: &Config) -> Result<()> {
        fs::create_dir_all(&config.state_dir).with_context(|| {
            format!("Failed to create state directory {}", config.state_dir.display())
        })?;
        let data = serde_json::to_string_pretty(self)?;
        fs::write(config.credentials_path(), data).context("Failed to write credentials")
    }

    /// Forget the persisted session. Already signed out is not an error.
    pub fn clear(config: &Config) -> Result<()> {
        match fs::remove_file(config.credentials_path()) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).context("Failed to remove credentials"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn test_user() -> User {
        User {
            id: "u1".to_string(),
            email: "alice@example.com".to_string(),
            name: "Alice".to_string(),
        }
    }

    #[test]
    #[serial]
    fn test_state_dir_env_override() {
        let dir = tempfile::tempdir().unwrap();
        env::set_var("TASKDECK_CONFIG_DIR", dir.path());

        let config = Config::resolve(None).unwrap();
        assert_eq!(config.state_dir, dir.path());

        env::remove_var("TASKDECK_CONFIG_DIR");
    }

    #[test]
    #[serial]
    fn test_resolve_prefers_flag_over_default() {
        let dir = tempfile::tempdir().unwrap();
        env::set_var("TASKDECK_CONFIG_DIR", dir.path());

        let config = Config::resolve(Some("http://api.internal:9000".to_string())).unwrap();
        assert_eq!(config.api_url, "http://api.internal:9000");

        let config = Config::resolve(None).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);

        env::remove_var("TASKDECK_CONFIG_DIR");
    }

    #[test]
    #[serial]
    fn test_credentials_roundtrip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        env::set_var("TASKDECK_CONFIG_DIR", dir.path());
        let config = Config::resolve(None).unwrap();

        assert!(Credentials::load(&config).is_none());

        let credentials = Credentials {
            token: "t0k3n".to_string(),
            user: test_user(),
        };
        credentials.save(&config).unwrap();
        assert_eq!(Credentials::load(&config), Some(credentials));

        Credentials::clear(&config).unwrap();
        assert!(Credentials::load(&config).is_none());

        // Clearing twice is fine.
        Credentials::clear(&config).unwrap();

        env::remove_var("TASKDECK_CONFIG_DIR");
    }
}
