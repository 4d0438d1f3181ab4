use directories::ProjectDirs;
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

/// A durable key/value store for user preferences.
///
/// Reads never fail: anything that can't be read is simply absent.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PreferenceStoreError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("serializing preferences: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("preference store is not available")]
    Unavailable,
}

/// A store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: BTreeMap<String, String>,
    writes: usize,
}

impl MemoryPreferenceStore {
    /// The number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceStoreError> {
        self.values.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// A store that always fails, used when there's nowhere to persist preferences.
#[derive(Debug, Default)]
pub struct UnavailablePreferenceStore;

impl PreferenceStore for UnavailablePreferenceStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), PreferenceStoreError> {
        Err(PreferenceStoreError::Unavailable)
    }
}

/// A store backed by a JSON file.
///
/// The file is read once when opening and rewritten in full on every write.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferenceStore {
    /// Open the store at the given path.
    ///
    /// A missing or unreadable file results in an empty store.
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let values = match Self::read(&path) {
            Ok(values) => values,
            Err(e) => {
                tracing::debug!("ignoring preferences file {}: {e}", path.display());
                Default::default()
            }
        };
        Self { path, values }
    }

    /// The default location for the preferences file.
    pub fn default_path() -> Option<PathBuf> {
        let dirs = ProjectDirs::from("", "", "slidedeck")?;
        Some(dirs.data_dir().join("preferences.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> Result<BTreeMap<String, String>, PreferenceStoreError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Default::default()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&contents)?)
    }

    fn write(&self) -> Result<(), PreferenceStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceStoreError> {
        self.values.insert(key.to_string(), value.to_string());
        self.write()
    }
}
