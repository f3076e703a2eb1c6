use super::table::{ParamLoadError, ParameterTable};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Process-wide cache of parsed parameter files.
///
/// Tables are parsed at most once per file name and shared through [`Arc`].
/// Parsing happens outside the lock; when two requests race on the same
/// file, the first inserted table wins and the other parse is dropped.
#[derive(Debug)]
pub struct ParameterStore {
    data_dir: PathBuf,
    tables: Mutex<HashMap<String, Arc<ParameterTable>>>,
    parses: AtomicUsize,
}

impl ParameterStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            tables: Mutex::new(HashMap::new()),
            parses: AtomicUsize::new(0),
        }
    }

    /// Store reading the parameter files shipped with the crate.
    pub fn bundled() -> Self {
        Self::new(Self::bundled_data_dir())
    }

    pub fn bundled_data_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data")
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn load(&self, file: &str) -> Result<Arc<ParameterTable>, ParamLoadError> {
        if let Some(table) = self.cached(file) {
            return Ok(table);
        }

        let path = self.data_dir.join(file);
        debug!(file = %path.display(), "Parsing parameter file");
        let table = Arc::new(ParameterTable::load(&path)?);
        self.parses.fetch_add(1, Ordering::Relaxed);

        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(tables.entry(file.to_string()).or_insert(table)))
    }

    /// Registers an in-memory table under `file`, replacing any cached one.
    pub fn insert(&self, file: impl Into<String>, table: ParameterTable) {
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        tables.insert(file.into(), Arc::new(table));
    }

    /// Number of files parsed from disk so far.
    pub fn parse_count(&self) -> usize {
        self.parses.load(Ordering::Relaxed)
    }

    fn cached(&self, file: &str) -> Option<Arc<ParameterTable>> {
        let tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        tables.get(file).cloned()
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::bundled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::thermo::term::Thermodynamics;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_table(dir: &Path, name: &str) {
        let mut file = File::create(dir.join(name)).unwrap();
        writeln!(
            file,
            "[parameters]\n\"neighborAA/TT\" = {{ enthalpy = -7900.0, entropy = -22.2 }}"
        )
        .unwrap();
    }

    #[test]
    fn repeated_loads_parse_once_and_share_the_table() {
        let dir = tempdir().unwrap();
        write_table(dir.path(), "nn.toml");
        let store = ParameterStore::new(dir.path());

        let first = store.load("nn.toml").unwrap();
        let second = store.load("nn.toml").unwrap();
        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.parse_count(), 1);
    }

    #[test]
    fn inserted_tables_are_served_without_parsing() {
        let store = ParameterStore::new("unused");
        store.insert(
            "memory.toml",
            ParameterTable::from_entries([("symmetry", Thermodynamics::new(0.0, -1.4))]),
        );
        let table = store.load("memory.toml").unwrap();
        assert_eq!(table.get("symmetry"), Some(Thermodynamics::new(0.0, -1.4)));
        assert_eq!(store.parse_count(), 0);
    }

    #[test]
    fn missing_files_are_not_cached() {
        let dir = tempdir().unwrap();
        let store = ParameterStore::new(dir.path());
        assert!(store.load("absent.toml").is_err());
        write_table(dir.path(), "absent.toml");
        assert!(store.load("absent.toml").is_ok());
    }

    #[test]
    fn concurrent_first_use_yields_one_shared_table() {
        let dir = tempdir().unwrap();
        write_table(dir.path(), "nn.toml");
        let store = ParameterStore::new(dir.path());

        let tables: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| store.load("nn.toml").unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(tables.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn bundled_store_points_at_the_data_directory() {
        let store = ParameterStore::bundled();
        assert!(store.data_dir().ends_with("data"));
    }
}
