//! Configuration properties consumed around release identity, and the narrow
//! query/store interface they are read through.

use crate::paths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Overrides the application name reported by the version provider.
pub const PNAME_APPLICATION_NAME: &str = "release-ident.application.name";
/// Overrides the version reported by the version provider.
pub const PNAME_APPLICATION_VERSION: &str = "release-ident.version";
/// `owner/name` of the GitHub repository releases are published to.
pub const PNAME_UPDATE_REPOSITORY: &str = "release-ident.updates.repository";
pub const PNAME_UPDATE_CHECK_ENABLED: &str = "release-ident.updates.enabled";

pub trait ConfigurationStore {
    fn get_property(&self, name: &str) -> Option<String>;

    fn set_property(&mut self, name: &str, value: &str);

    fn remove_property(&mut self, name: &str) -> Option<String>;

    /// All property names, sorted.
    fn property_names(&self) -> Vec<String>;

    fn property_names_by_prefix(&self, prefix: &str) -> Vec<String> {
        self.property_names()
            .into_iter()
            .filter(|name| name.starts_with(prefix))
            .collect()
    }

    fn get_string_or(&self, name: &str, default: &str) -> String {
        self.get_property(name).unwrap_or_else(|| default.to_string())
    }

    fn get_bool(&self, name: &str, default: bool) -> bool {
        match self.get_property(name) {
            Some(value) if value.eq_ignore_ascii_case("true") => true,
            Some(value) if value.eq_ignore_ascii_case("false") => false,
            _ => default,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MemoryConfigStore {
    #[serde(flatten)]
    properties: BTreeMap<String, serde_json::Value>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigurationStore for MemoryConfigStore {
    fn get_property(&self, name: &str) -> Option<String> {
        self.properties.get(name).map(value_to_string)
    }

    fn set_property(&mut self, name: &str, value: &str) {
        self.properties
            .insert(name.to_string(), serde_json::Value::String(value.to_string()));
    }

    fn remove_property(&mut self, name: &str) -> Option<String> {
        self.properties.remove(name).as_ref().map(value_to_string)
    }

    fn property_names(&self) -> Vec<String> {
        self.properties.keys().cloned().collect()
    }
}

// Hand-edited files may hold booleans or numbers instead of strings.
fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Properties persisted as a flat JSON object.
pub struct FileConfigStore {
    config_path: PathBuf,
    properties: MemoryConfigStore,
}

impl FileConfigStore {
    pub fn open() -> Result<Self> {
        Self::open_at(paths::config_path()?)
    }

    pub fn open_at(config_path: PathBuf) -> Result<Self> {
        let properties = load_properties(&config_path)?;
        Ok(Self {
            config_path,
            properties,
        })
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn reload(&mut self) -> Result<()> {
        self.properties = load_properties(&self.config_path)?;
        Ok(())
    }

    pub fn store(&self) -> Result<()> {
        ensure_parent_dir(&self.config_path)?;
        let content = serde_json::to_string_pretty(&self.properties)?;
        std::fs::write(&self.config_path, content)
            .with_context(|| format!("Could not write {}", self.config_path.display()))?;
        log::debug!("Stored configuration at {}", self.config_path.display());
        Ok(())
    }
}

impl ConfigurationStore for FileConfigStore {
    fn get_property(&self, name: &str) -> Option<String> {
        self.properties.get_property(name)
    }

    fn set_property(&mut self, name: &str, value: &str) {
        self.properties.set_property(name, value);
    }

    fn remove_property(&mut self, name: &str) -> Option<String> {
        self.properties.remove_property(name)
    }

    fn property_names(&self) -> Vec<String> {
        self.properties.property_names()
    }
}

fn load_properties(path: &Path) -> Result<MemoryConfigStore> {
    if !path.exists() {
        return Ok(MemoryConfigStore::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    let properties: MemoryConfigStore = serde_json::from_str(&content)
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;
    log::debug!("Loaded {} properties from {}", properties.properties.len(), path.display());
    Ok(properties)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn setup_test_env() -> (FileConfigStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileConfigStore::open_at(temp_dir.path().join("nested").join("config.json")).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn open_at_returns_empty_store_when_file_missing() {
        // Arrange & Act
        let (store, _temp_dir) = setup_test_env();

        // Assert
        assert!(store.property_names().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn open_at_reads_strings_and_other_json_values() {
        // Arrange
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        let content = json!({
            "release-ident.application.name": "Example",
            "release-ident.updates.enabled": false,
            "release-ident.retries": 3
        });
        fs::write(&path, content.to_string()).unwrap();

        // Act
        let store = FileConfigStore::open_at(path).unwrap();

        // Assert
        assert_eq!(store.get_property(PNAME_APPLICATION_NAME).as_deref(), Some("Example"));
        assert!(!store.get_bool(PNAME_UPDATE_CHECK_ENABLED, true));
        assert_eq!(store.get_property("release-ident.retries").as_deref(), Some("3"));
    }

    #[test]
    fn open_at_rejects_invalid_json() {
        // Arrange
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        // Act
        let result = FileConfigStore::open_at(path);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn store_creates_parent_directory_and_round_trips() {
        // Arrange
        let (mut store, _temp_dir) = setup_test_env();
        store.set_property(PNAME_APPLICATION_VERSION, "2.3-beta.42");

        // Act
        store.store().unwrap();
        let reopened = FileConfigStore::open_at(store.path().to_path_buf()).unwrap();

        // Assert
        assert!(store.path().exists());
        assert_eq!(reopened.get_property(PNAME_APPLICATION_VERSION).as_deref(), Some("2.3-beta.42"));
    }

    #[test]
    fn store_writes_pretty_json() {
        // Arrange
        let (mut store, _temp_dir) = setup_test_env();
        store.set_property(PNAME_UPDATE_REPOSITORY, "owner/name");

        // Act
        store.store().unwrap();

        // Assert
        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains('\n'));
        assert!(content.contains(PNAME_UPDATE_REPOSITORY));
        assert!(content.contains("owner/name"));
    }

    #[test]
    fn reload_discards_unstored_changes() {
        // Arrange
        let (mut store, _temp_dir) = setup_test_env();
        store.set_property("kept", "1");
        store.store().unwrap();
        store.set_property("dropped", "2");

        // Act
        store.reload().unwrap();

        // Assert
        assert_eq!(store.property_names(), ["kept"]);
    }

    #[test]
    fn remove_property_returns_previous_value() {
        // Arrange
        let mut store = MemoryConfigStore::new();
        store.set_property("a", "1");

        // Act
        let removed = store.remove_property("a");
        let missing = store.remove_property("a");

        // Assert
        assert_eq!(removed.as_deref(), Some("1"));
        assert_eq!(missing, None);
    }

    #[test]
    fn property_names_by_prefix_filters_sorted_names() {
        // Arrange
        let mut store = MemoryConfigStore::new();
        for name in [PNAME_UPDATE_REPOSITORY, PNAME_APPLICATION_NAME, PNAME_UPDATE_CHECK_ENABLED] {
            store.set_property(name, "x");
        }

        // Act
        let names = store.property_names_by_prefix("release-ident.updates.");

        // Assert
        assert_eq!(names, [PNAME_UPDATE_CHECK_ENABLED, PNAME_UPDATE_REPOSITORY]);
    }

    #[test]
    fn typed_getters_fall_back_to_defaults() {
        let mut store = MemoryConfigStore::new();
        store.set_property("yes", "TRUE");
        store.set_property("no", "False");
        store.set_property("junk", "maybe");

        let cases = [("yes", false, true), ("no", true, false), ("junk", true, true), ("missing", false, false)];
        for (name, default, expected) in cases {
            assert_eq!(store.get_bool(name, default), expected, "property: {}", name);
        }

        assert_eq!(store.get_string_or("missing", "fallback"), "fallback");
        assert_eq!(store.get_string_or("junk", "fallback"), "maybe");
    }
}
