//! YAML config file holding the client settings and stored credentials.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::application::ports::CredentialStore;
use crate::domain::{Credentials, GondorConfig};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "GONDOR_CONFIG";

/// Config file backed by YAML on disk.
#[derive(Debug, Clone)]
pub struct YamlConfigStore {
    path: PathBuf,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `$GONDOR_CONFIG`, else `<config dir>/gondor/config.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if no config directory can be determined.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(val) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(val));
        }
        let dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("cannot determine config directory"))?;
        Ok(dir.join("gondor").join("config.yml"))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the config; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<GondorConfig> {
        if !self.path.exists() {
            return Ok(GondorConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(GondorConfig::default());
        }
        serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", self.path.display()))
    }

    /// Write the config, owner-readable only.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directory cannot be written.
    pub fn save(&self, config: &GondorConfig) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("cannot write {}", self.path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("cannot set permissions on {}", self.path.display()))?;
        }
        Ok(())
    }
}

impl CredentialStore for YamlConfigStore {
    fn persist(&self, creds: &Credentials) -> Result<()> {
        let mut config = self.load()?;
        config.set_credentials(creds);
        self.save(&config)?;
        tracing::debug!(path = %self.path.display(), "credentials persisted");
        Ok(())
    }
}
