use propdeck_common::config::{ConfigManager, GlobalConfigManager, LocalConfigManager};
use propdeck_common::constants::CONFIG_FILE_NAME;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// What gets persisted between runs: the last organization the user worked
/// in, by id, with the display name cached alongside so the prompt can show
/// it before the organization list has been fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    pub active_org_id: Option<String>,
    pub active_org_name: Option<String>,
}

/// The persisted organization selector.
///
/// Backed by the user-global config file when one can be resolved. When the
/// config dir is unavailable or unreadable the selector degrades to
/// session-only memory, and every operation still works.
pub struct Selector {
    manager: Option<LocalConfigManager>,
    state: SelectorConfig,
}

impl Selector {
    /// Load the selector from the user-global config file
    pub fn load() -> Self {
        let manager = match GlobalConfigManager::new() {
            Ok(global) => LocalConfigManager::new(global.directory(), CONFIG_FILE_NAME),
            Err(error) => {
                warn!(%error, "selection will not persist across runs");
                return Self {
                    manager: None,
                    state: SelectorConfig::default(),
                };
            }
        };
        Self::from_manager(manager)
    }

    /// Load the selector from a config file under an explicit directory
    pub fn at_dir(directory: impl AsRef<std::path::Path>) -> Self {
        Self::from_manager(LocalConfigManager::new(directory, CONFIG_FILE_NAME))
    }

    fn from_manager(manager: LocalConfigManager) -> Self {
        let state = if manager.exists() {
            match manager.open() {
                Ok(state) => state,
                Err(error) => {
                    // a corrupt file should not lock the user out
                    warn!(%error, "ignoring unreadable selection file");
                    SelectorConfig::default()
                }
            }
        } else {
            SelectorConfig::default()
        };

        Self {
            manager: Some(manager),
            state,
        }
    }

    /// A selector with no backing file, for environments without a config dir
    pub fn in_memory() -> Self {
        Self {
            manager: None,
            state: SelectorConfig::default(),
        }
    }

    pub fn active_org_id(&self) -> Option<&str> {
        self.state.active_org_id.as_deref()
    }

    pub fn active_org_name(&self) -> Option<&str> {
        self.state.active_org_name.as_deref()
    }

    pub fn set_active_org_id(&mut self, id: Option<String>) {
        self.state.active_org_id = id;
        self.persist();
    }

    pub fn set_active_org_name(&mut self, name: Option<String>) {
        self.state.active_org_name = name;
        self.persist();
    }

    pub fn remember(&mut self, id: String, name: String) {
        self.state.active_org_id = Some(id);
        self.state.active_org_name = Some(name);
        self.persist();
    }

    pub fn clear(&mut self) {
        self.state = SelectorConfig::default();
        self.persist();
    }

    /// Best effort. A failed write keeps the in-memory state authoritative
    /// for the rest of the session.
    fn persist(&self) {
        let Some(manager) = &self.manager else {
            return;
        };
        if let Err(error) = manager.save(&self.state) {
            warn!(%error, "could not persist organization selection");
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn remember_survives_reload() {
        let dir = tempfile::tempdir().unwrap();

        let mut selector = Selector::at_dir(dir.path());
        selector.remember("org_1".to_string(), "Acme Inc".to_string());

        let reloaded = Selector::at_dir(dir.path());
        assert_eq!(reloaded.active_org_id(), Some("org_1"));
        assert_eq!(reloaded.active_org_name(), Some("Acme Inc"));
    }

    #[test]
    fn clear_survives_reload() {
        let dir = tempfile::tempdir().unwrap();

        let mut selector = Selector::at_dir(dir.path());
        selector.remember("org_1".to_string(), "Acme Inc".to_string());
        selector.clear();

        let reloaded = Selector::at_dir(dir.path());
        assert_eq!(reloaded.active_org_id(), None);
        assert_eq!(reloaded.active_org_name(), None);
    }

    #[test]
    fn corrupt_file_degrades_to_empty_selection() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "not = [valid").unwrap();

        let selector = Selector::at_dir(dir.path());
        assert_eq!(selector.active_org_id(), None);
    }

    #[test]
    fn in_memory_selector_still_tracks_state() {
        let mut selector = Selector::in_memory();
        selector.remember("org_1".to_string(), "Acme Inc".to_string());
        assert_eq!(selector.active_org_id(), Some("org_1"));
    }
}
