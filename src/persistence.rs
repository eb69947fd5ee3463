use crate::constants::{
    MAX_ANIMATION_MS, MAX_PAGE_SIZE, MAX_SIDEBAR_WIDTH, MIN_PAGE_SIZE, MIN_SIDEBAR_WIDTH,
};
use crate::types::{Bookmark, Config, Todo};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub struct PersistenceManager {
    data_dir: PathBuf,
}

impl PersistenceManager {
    pub fn new() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("", "", "tagdan").context("Failed to determine data directory")?;
        Self::with_dir(project_dirs.data_dir())
    }

    /// Use an explicit data directory, creating it if needed
    pub fn with_dir(dir: &Path) -> Result<Self> {
        if !dir.exists() {
            fs::create_dir_all(dir).context("Failed to create data directory")?;
        }
        Ok(PersistenceManager {
            data_dir: dir.to_path_buf(),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    // Config methods
    pub fn load_config(&self) -> Result<Config> {
        let config_path = self.data_dir.join("config.json");

        if !config_path.exists() {
            let config = Config::default();
            self.save_config(&config)?;
            return Ok(config);
        }

        let mut config: Config = self.read_json("config.json")?;
        config.animation_ms = config.animation_ms.min(MAX_ANIMATION_MS);
        config.page_size = config.page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
        config.sidebar_width = config
            .sidebar_width
            .clamp(MIN_SIDEBAR_WIDTH, MAX_SIDEBAR_WIDTH);

        Ok(config)
    }

    pub fn save_config(&self, config: &Config) -> Result<()> {
        self.write_json("config.json", config)
    }

    // Bookmark methods
    pub fn load_bookmarks(&self) -> Result<Vec<Bookmark>> {
        self.read_json("bookmarks.json")
    }

    pub fn save_bookmarks(&self, bookmarks: &[Bookmark]) -> Result<()> {
        self.write_json("bookmarks.json", &bookmarks)
    }

    // Todo methods
    pub fn load_todos(&self) -> Result<Vec<Todo>> {
        self.read_json("todos.json")
    }

    pub fn save_todos(&self, todos: &[Todo]) -> Result<()> {
        self.write_json("todos.json", &todos)
    }

    /// Read a JSON file, falling back to the default value when it is
    /// missing or malformed
    fn read_json<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let path = self.data_dir.join(name);
        if !path.exists() {
            return Ok(T::default());
        }

        let content =
            fs::read_to_string(&path).with_context(|| format!("Failed to read {}", name))?;

        Ok(serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse {}: {}. Starting fresh.", name, e);
            T::default()
        }))
    }

    fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.data_dir.join(name);
        let content = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize {}", name))?;
        fs::write(&path, content).with_context(|| format!("Failed to write {}", name))?;
        Ok(())
    }
}

/// Opaque per-item key/value store, kept in `local_storage.json`
///
/// Every write goes straight to disk so a crash never loses an edit.
pub struct LocalStore {
    path: Option<PathBuf>,
    items: BTreeMap<String, String>,
}

impl LocalStore {
    pub fn open(dir: &Path) -> Self {
        let path = dir.join("local_storage.json");
        let items = fs::read_to_string(&path)
            .ok()
            .and_then(|content| match serde_json::from_str(&content) {
                Ok(items) => Some(items),
                Err(e) => {
                    tracing::warn!("Failed to parse local storage: {}. Starting fresh.", e);
                    None
                }
            })
            .unwrap_or_default();
        LocalStore {
            path: Some(path),
            items,
        }
    }

    /// Store that never touches the filesystem
    pub fn in_memory() -> Self {
        LocalStore {
            path: None,
            items: BTreeMap::new(),
        }
    }

    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn set_item(&mut self, key: &str, value: String) {
        self.items.insert(key.to_string(), value);
        self.flush();
    }

    pub fn remove_item(&mut self, key: &str) {
        if self.items.remove(key).is_some() {
            self.flush();
        }
    }

    fn flush(&self) {
        let Some(path) = &self.path else {
            return;
        };
        let result = serde_json::to_string_pretty(&self.items)
            .context("Failed to serialize local storage")
            .and_then(|content| fs::write(path, content).context("Failed to write local storage"));
        if let Err(e) = result {
            tracing::error!("{:#}", e);
        }
    }
}

/// Key under which a bookmark's URL list is kept in the local store
pub fn bookmark_urls_key(id: u64) -> String {
    format!("bookmark_urls_{}", id)
}

pub fn load_bookmark_urls(store: &LocalStore, id: u64) -> Vec<String> {
    store
        .get_item(&bookmark_urls_key(id))
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default()
}

pub fn save_bookmark_urls(store: &mut LocalStore, id: u64, urls: &[String]) {
    match serde_json::to_string(urls) {
        Ok(raw) => store.set_item(&bookmark_urls_key(id), raw),
        Err(e) => tracing::error!("Failed to serialize URLs for bookmark {}: {}", id, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bookmark_urls_in_memory() {
        let mut store = LocalStore::in_memory();
        assert!(load_bookmark_urls(&store, 4).is_empty());
        save_bookmark_urls(&mut store, 4, &["https://a.dev".to_string()]);
        assert_eq!(store.get_item("bookmark_urls_4"), Some("[\"https://a.dev\"]"));
        assert_eq!(load_bookmark_urls(&store, 4), vec!["https://a.dev".to_string()]);
        store.remove_item("bookmark_urls_4");
        assert!(store.get_item("bookmark_urls_4").is_none());
    }

    #[test]
    fn test_garbage_urls_value() {
        let mut store = LocalStore::in_memory();
        store.set_item("bookmark_urls_1", "not json".to_string());
        assert!(load_bookmark_urls(&store, 1).is_empty());
    }
}
