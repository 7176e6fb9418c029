use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};

/// Helper trait for dispatching fs ops for different config files
pub trait ConfigManager: Sized {
    fn directory(&self) -> PathBuf;

    fn filename(&self) -> PathBuf;

    fn path(&self) -> PathBuf {
        self.directory().join(self.filename())
    }

    fn exists(&self) -> bool {
        self.path().exists()
    }

    fn create<C>(&self) -> Result<()>
    where
        C: Serialize + Default,
    {
        if self.exists() {
            return Ok(());
        }
        let config = C::default();
        self.save(&config)
    }

    fn open<C>(&self) -> Result<C>
    where
        C: for<'de> Deserialize<'de>,
    {
        let path = self.path();
        let config_string = File::open(&path)
            .and_then(|mut f| {
                let mut buf = String::new();
                f.read_to_string(&mut buf)?;
                Ok(buf)
            })
            .with_context(|| anyhow!("Unable to read configuration file: {}", path.display()))?;
        toml::from_str(config_string.as_str())
            .with_context(|| anyhow!("Invalid configuration file: {}", path.display()))
    }

    fn save<C>(&self, config: &C) -> Result<()>
    where
        C: Serialize,
    {
        let path = self.path();
        std::fs::create_dir_all(path.parent().unwrap())?;

        let mut config_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;

        let config_str = toml::to_string_pretty(config)?;
        config_file
            .write_all(config_str.as_bytes())
            .with_context(|| {
                anyhow!("Could not write the configuration file: {}", path.display())
            })?;
        Ok(())
    }
}

/// A [`ConfigManager`] rooted at an explicit directory. Used directly by tests,
/// and as the backing manager for the user-global config file.
pub struct LocalConfigManager {
    directory: PathBuf,
    file_name: String,
}

impl LocalConfigManager {
    pub fn new<P: AsRef<Path>>(directory: P, file_name: impl Into<String>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            file_name: file_name.into(),
        }
    }
}

impl ConfigManager for LocalConfigManager {
    fn directory(&self) -> PathBuf {
        self.directory.clone()
    }

    fn filename(&self) -> PathBuf {
        PathBuf::from(&self.file_name)
    }
}

/// Manager for the user-global config file under the OS config dir.
///
/// Construction fails when no config dir can be resolved for this platform,
/// which callers are expected to treat as "storage unavailable" rather than
/// a fatal error.
pub struct GlobalConfigManager {
    directory: PathBuf,
}

impl GlobalConfigManager {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            anyhow!("Could not find a configuration directory. Your operating system may not be supported.")
        })?;

        Ok(Self {
            directory: config_dir.join(CONFIG_DIR_NAME),
        })
    }
}

impl ConfigManager for GlobalConfigManager {
    fn directory(&self) -> PathBuf {
        self.directory.clone()
    }

    fn filename(&self) -> PathBuf {
        PathBuf::from(CONFIG_FILE_NAME)
    }
}

/// A handler for configuration files. The type parameter `M` is the [`ConfigManager`] which handles
/// indirection around file location and serde. The type parameter `C` is the configuration content.
pub struct Config<M, C> {
    pub manager: M,
    config: Option<C>,
}

impl<M, C> Config<M, C>
where
    M: ConfigManager,
    C: Serialize + for<'de> Deserialize<'de>,
{
    /// Creates a new [`Config`] instance, without opening the underlying file
    pub fn new(manager: M) -> Self {
        Self {
            manager,
            config: None,
        }
    }

    /// Opens the underlying config file, as handled by the [`ConfigManager`]
    pub fn open(&mut self) -> Result<()> {
        let config = self.manager.open()?;
        self.config = Some(config);
        Ok(())
    }

    /// Saves the current state of the config to the file managed by the [`ConfigManager`]
    pub fn save(&self) -> Result<()> {
        self.manager.save(self.config.as_ref().unwrap())
    }

    /// Check if the file managed by the [`ConfigManager`] exists
    pub fn exists(&self) -> bool {
        self.manager.exists()
    }

    /// Replace the current config state with a new value.
    ///
    /// Does not persist the change to disk. Use [`Config::save`] for that.
    pub fn replace(&mut self, config: C) -> Option<C> {
        self.config.replace(config)
    }

    /// Get a mut ref to the underlying config state. Returns `None` if the config has not been
    /// opened.
    pub fn as_mut(&mut self) -> Option<&mut C> {
        self.config.as_mut()
    }

    /// Get a ref to the underlying config state. Returns `None` if the config has not been
    /// opened.
    pub fn as_ref(&self) -> Option<&C> {
        self.config.as_ref()
    }

    /// Ask the [`ConfigManager`] to create a default config file at the location it manages.
    ///
    /// If the file already exists, is a no-op.
    pub fn create(&self) -> Result<()>
    where
        C: Default,
    {
        self.manager.create::<C>()
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::{Config, ConfigManager, LocalConfigManager};

    #[derive(Serialize, Deserialize, Default, PartialEq, Debug)]
    struct TestConfig {
        active_org_id: Option<String>,
    }

    #[test]
    fn open_returns_what_save_wrote() {
        let dir = tempfile::tempdir().unwrap();
        let manager = LocalConfigManager::new(dir.path(), "config.toml");

        manager
            .save(&TestConfig {
                active_org_id: Some("org_1".to_string()),
            })
            .unwrap();

        let loaded: TestConfig = manager.open().unwrap();
        assert_eq!(loaded.active_org_id.as_deref(), Some("org_1"));
    }

    #[test]
    fn create_is_a_noop_when_file_exists() {
        let dir = tempfile::tempdir().unwrap();
        let manager = LocalConfigManager::new(dir.path(), "config.toml");

        manager
            .save(&TestConfig {
                active_org_id: Some("org_1".to_string()),
            })
            .unwrap();
        manager.create::<TestConfig>().unwrap();

        let loaded: TestConfig = manager.open().unwrap();
        assert_eq!(loaded.active_org_id.as_deref(), Some("org_1"));
    }

    #[test]
    fn config_handler_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        let mut config = Config::new(LocalConfigManager::new(dir.path(), "config.toml"));
        config.replace(TestConfig {
            active_org_id: Some("org_2".to_string()),
        });
        config.save().unwrap();

        let mut reloaded: Config<LocalConfigManager, TestConfig> =
            Config::new(LocalConfigManager::new(dir.path(), "config.toml"));
        reloaded.open().unwrap();
        assert_eq!(
            reloaded.as_ref().unwrap().active_org_id.as_deref(),
            Some("org_2")
        );
    }
}
