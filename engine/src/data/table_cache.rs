// Memoized CSV loading, keyed by file path or upload name
use shared::models::CsvTable;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::SystemTime;

use super::csv_parser::CsvTableReader;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    Path(PathBuf),
    Upload(String),
}

// Changes whenever the file is rewritten or the upload's bytes differ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fingerprint {
    File { modified: Option<SystemTime>, len: u64 },
    Content(u64),
}

struct CacheEntry {
    fingerprint: Fingerprint,
    table: Rc<CsvTable>,
}

pub struct TableCache {
    delimiter: u8,
    entries: HashMap<CacheKey, CacheEntry>,
}

impl TableCache {
    pub fn new(delimiter: u8) -> Self {
        TableCache {
            delimiter,
            entries: HashMap::new(),
        }
    }

    /// Returns the table for `path`, reading the file on first access and
    /// again whenever its modification time or length changes.
    pub fn get_or_load_path(&mut self, path: impl AsRef<Path>) -> Result<Rc<CsvTable>> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|source| EngineError::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let fingerprint = Fingerprint::File {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        };
        let key = path_key(path);

        if let Some(table) = self.lookup(&key, fingerprint) {
            tracing::debug!(path = %path.display(), "CSV cache hit");
            return Ok(table);
        }

        let table = Rc::new(CsvTableReader::read_path(path, self.delimiter)?);
        self.store(key, fingerprint, &table);
        Ok(table)
    }

    /// Returns the table for an uploaded buffer. Re-uploading the same bytes
    /// under a name is a hit; new bytes replace that name's entry.
    pub fn get_or_load_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<Rc<CsvTable>> {
        let fingerprint = Fingerprint::Content(content_digest(bytes));
        let key = CacheKey::Upload(name.to_string());

        if let Some(table) = self.lookup(&key, fingerprint) {
            tracing::debug!(upload = name, "CSV cache hit");
            return Ok(table);
        }

        let table = Rc::new(CsvTableReader::read_reader(bytes, self.delimiter)?);
        self.store(key, fingerprint, &table);
        Ok(table)
    }

    fn lookup(&self, key: &CacheKey, fingerprint: Fingerprint) -> Option<Rc<CsvTable>> {
        let entry = self.entries.get(key)?;
        if entry.fingerprint == fingerprint {
            Some(Rc::clone(&entry.table))
        } else {
            tracing::debug!(key = ?key, "CSV source changed, reloading");
            None
        }
    }

    // Overwrites any stale entry under the same key
    fn store(&mut self, key: CacheKey, fingerprint: Fingerprint, table: &Rc<CsvTable>) {
        self.entries.insert(
            key,
            CacheEntry {
                fingerprint,
                table: Rc::clone(table),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn path_key(path: &Path) -> CacheKey {
    CacheKey::Path(std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()))
}

fn content_digest(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}
