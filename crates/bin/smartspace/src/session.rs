//! File-backed connection session.
//!
//! The last saved [`ConnectionConfig`] is kept in a small TOML file so the
//! controller address survives between invocations.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use smartspace_app::ports::ConfigProvider;
use smartspace_domain::connection::ConnectionConfig;
use smartspace_domain::error::SmartSpaceError;

/// Session file errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to parse session file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to encode session")]
    Encode(#[from] toml::ser::Error),
    #[error("failed to access session file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<SessionError> for SmartSpaceError {
    fn from(err: SessionError) -> Self {
        SmartSpaceError::Storage(Box::new(err))
    }
}

/// [`ConfigProvider`] persisting every update to a TOML file.
#[derive(Debug)]
pub struct FileConfigProvider {
    path: PathBuf,
    config: RwLock<ConnectionConfig>,
}

impl FileConfigProvider {
    /// Open the session at `path`. A missing file is an empty session.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let config = match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|source| SessionError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => ConnectionConfig::default(),
            Err(source) => return Err(SessionError::Io { path, source }),
        };
        Ok(Self {
            path,
            config: RwLock::new(config),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Use `fallback` in memory when nothing has been saved yet.
    ///
    /// The fallback is not written to disk.
    #[must_use]
    pub fn with_fallback(self, fallback: ConnectionConfig) -> Self {
        {
            let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
            if !config.is_configured() && fallback.is_configured() {
                *config = fallback;
            }
        }
        self
    }

    fn write(&self, config: &ConnectionConfig) -> Result<(), SessionError> {
        let content = toml::to_string(config)?;
        std::fs::write(&self.path, content).map_err(|source| SessionError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl ConfigProvider for FileConfigProvider {
    fn snapshot(&self) -> ConnectionConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, config: ConnectionConfig) -> Result<(), SmartSpaceError> {
        self.write(&config)?;
        tracing::debug!(path = %self.path.display(), "session saved");
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartspace_domain::time::now;

    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "smartspace-session-{}-{name}.toml",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn should_start_empty_when_file_is_missing() {
        let provider = FileConfigProvider::open(temp_path("missing")).unwrap();
        assert_eq!(provider.snapshot(), ConnectionConfig::default());
    }

    #[test]
    fn should_persist_config_across_opens() {
        let path = temp_path("persist");
        let mut config = ConnectionConfig::new("http://10.0.0.7/", "80");
        config.mark_online(now());

        FileConfigProvider::open(&path)
            .unwrap()
            .set(config.clone())
            .unwrap();
        let reopened = FileConfigProvider::open(&path).unwrap();

        assert_eq!(reopened.snapshot(), config);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn should_persist_config_never_checked() {
        let path = temp_path("unchecked");
        let config = ConnectionConfig::new("esp.local", "8080");

        FileConfigProvider::open(&path)
            .unwrap()
            .set(config.clone())
            .unwrap();

        assert_eq!(FileConfigProvider::open(&path).unwrap().snapshot(), config);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn should_report_parse_error_for_invalid_file() {
        let path = temp_path("invalid");
        std::fs::write(&path, "ip = [").unwrap();

        let result = FileConfigProvider::open(&path);

        assert!(matches!(result, Err(SessionError::Parse { .. })));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn should_use_fallback_only_when_nothing_saved() {
        let path = temp_path("fallback");
        let fallback = ConnectionConfig::new("10.0.0.9", "81");

        let provider = FileConfigProvider::open(&path)
            .unwrap()
            .with_fallback(fallback.clone());
        assert_eq!(provider.snapshot(), fallback);
        assert!(!path.exists());

        provider
            .set(ConnectionConfig::new("10.0.0.1", "80"))
            .unwrap();
        let reopened = FileConfigProvider::open(&path)
            .unwrap()
            .with_fallback(fallback);
        assert_eq!(reopened.snapshot().ip, "10.0.0.1");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn should_map_write_failure_to_storage_error() {
        let path = std::env::temp_dir()
            .join("smartspace-missing-dir")
            .join("nested")
            .join("session.toml");
        let provider = FileConfigProvider::open(&path).unwrap();

        let result = provider.set(ConnectionConfig::new("10.0.0.1", "80"));

        assert!(matches!(result, Err(SmartSpaceError::Storage(_))));
        assert!(!provider.snapshot().is_configured());
        assert_eq!(provider.path(), path.as_path());
    }
}
