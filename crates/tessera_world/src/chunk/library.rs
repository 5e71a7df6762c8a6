//! # Chunk Library
//!
//! Keeps every template from a directory in memory, keyed by name. Files
//! that fail to load are logged and skipped; one bad prefab never takes the
//! rest of the library down.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::template::ChunkTemplate;
use crate::error::{WorldError, WorldResult};

/// Extension of template files.
pub const CHUNK_EXTENSION: &str = "chunk";

/// Templates loaded from one directory.
#[derive(Debug, Default)]
pub struct ChunkLibrary {
    dir: Option<PathBuf>,
    templates: BTreeMap<String, ChunkTemplate>,
}

impl ChunkLibrary {
    /// Creates an empty library with no backing directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `*.chunk` file under `dir` (not recursive).
    ///
    /// # Errors
    ///
    /// Fails only if the directory itself cannot be listed.
    pub fn load_dir(dir: &Path) -> WorldResult<Self> {
        let mut library = Self { dir: Some(dir.to_path_buf()), templates: BTreeMap::new() };
        library.reload()?;
        Ok(library)
    }

    /// Drops every template and reads the backing directory again.
    ///
    /// Returns the number of templates loaded. A library without a backing
    /// directory is left empty.
    ///
    /// # Errors
    ///
    /// Fails only if the directory cannot be listed.
    pub fn reload(&mut self) -> WorldResult<usize> {
        self.templates.clear();
        let Some(dir) = self.dir.clone() else {
            return Ok(0);
        };

        let entries = std::fs::read_dir(&dir).map_err(|source| WorldError::Read { path: dir.clone(), source })?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == CHUNK_EXTENSION))
            .collect();
        paths.sort();

        let mut failed = 0usize;
        for path in paths {
            match ChunkTemplate::load(&path) {
                Ok(template) => {
                    if let Some(previous) = self.insert(template) {
                        tracing::warn!("chunk {} redefined by {}", previous.name, path.display());
                    }
                }
                Err(err) => {
                    failed += 1;
                    tracing::warn!("skipping chunk {}: {}", path.display(), err);
                }
            }
        }

        tracing::info!(
            "loaded {} chunk templates from {} ({} failed)",
            self.templates.len(),
            dir.display(),
            failed
        );
        Ok(self.templates.len())
    }

    /// Adds or replaces a template, returning the one it replaced.
    pub fn insert(&mut self, template: ChunkTemplate) -> Option<ChunkTemplate> {
        self.templates.insert(template.name.clone(), template)
    }

    /// Template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ChunkTemplate> {
        self.templates.get(name)
    }

    /// Template names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// True when no templates are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Backing directory, if any.
    #[must_use]
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, file: &str, text: &str) {
        std::fs::write(dir.join(file), text).unwrap();
    }

    #[test]
    fn test_load_dir_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.chunk", "chunk alpha\nsize 2 2\nwall 0 0 0\n");
        write(dir.path(), "b.chunk", "size 3 3\n");
        write(dir.path(), "broken.chunk", "wall 0 0 0\n");
        write(dir.path(), "notes.txt", "size 2 2\n");

        let library = ChunkLibrary::load_dir(dir.path()).unwrap();

        assert_eq!(library.len(), 2);
        assert_eq!(library.names().collect::<Vec<_>>(), vec!["alpha", "b"]);
        assert_eq!(library.get("alpha").map(|t| t.walls.len()), Some(1));
        assert!(library.get("broken").is_none());
    }

    #[test]
    fn test_reload_picks_up_changes() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.chunk", "size 2 2\n");
        let mut library = ChunkLibrary::load_dir(dir.path()).unwrap();
        assert_eq!(library.len(), 1);

        write(dir.path(), "c.chunk", "size 4 4\n");
        std::fs::remove_file(dir.path().join("a.chunk")).unwrap();

        assert_eq!(library.reload().unwrap(), 1);
        assert!(library.get("a").is_none());
        assert_eq!(library.get("c").map(|t| t.width), Some(4));
    }

    #[test]
    fn test_missing_dir_fails() {
        let result = ChunkLibrary::load_dir(Path::new("/no/such/chunk/dir"));
        assert!(matches!(result, Err(WorldError::Read { .. })));
    }

    #[test]
    fn test_in_memory_library() {
        let mut library = ChunkLibrary::new();
        assert_eq!(library.reload().unwrap(), 0);
        assert!(library.insert(ChunkTemplate::new("x", 1, 1)).is_none());
        assert!(library.insert(ChunkTemplate::new("x", 2, 2)).is_some());
        assert_eq!(library.len(), 1);
        assert!(library.dir().is_none());
    }
}
