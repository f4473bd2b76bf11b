//! On-disk cover cache and the persisted identifier → image id index.
//!
//! Images are stored flat under `<data dir>/covers/`:
//!
//! - `<imageId>.jpg`: downloaded from the CDN
//! - `<identifier>.jpg` / `<identifier>.png`: user-supplied overrides, never
//!   removed by [`CoverCache::clear`]
//!
//! The index lives in the key-value store under `coverIndex` so a lookup
//! can be answered offline once a cover has been fetched.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};

use modninja_store::{KEY_COVER_INDEX, KeyValueStore, StoreError, StoreExt};
use serde_json::{Map, Value};

/// Sub-directory of the data dir holding cover images.
pub const COVERS_DIR: &str = "covers";

/// Suffix of in-flight image writes.
const PART_SUFFIX: &str = ".part";

/// Extensions checked for manual overrides, in order.
pub const OVERRIDE_EXTENSIONS: [&str; 2] = ["jpg", "png"];

/// Identifier → image id mapping.
pub type CoverIndex = BTreeMap<String, String>;

/// Handle on the cover image directory.
#[derive(Debug, Clone)]
pub struct CoverCache {
    dir: PathBuf,
}

impl CoverCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache rooted at `<data_dir>/covers`.
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(COVERS_DIR))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the cache directory if needed. Safe to call repeatedly.
    pub fn ensure_dir(&self) -> std::io::Result<&Path> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(&self.dir)
    }

    /// Returns a user-supplied override for `identifier`, if present.
    pub fn manual_override(&self, identifier: &str) -> Option<PathBuf> {
        if !is_safe_stem(identifier) {
            return None;
        }
        OVERRIDE_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{identifier}.{ext}")))
            .find(|p| p.is_file())
    }

    /// Path a downloaded image is stored at.
    pub fn image_path(&self, image_id: &str) -> PathBuf {
        self.dir.join(format!("{image_id}.jpg"))
    }

    /// Returns the cached image for `image_id` if the file exists.
    pub fn cached_image(&self, image_id: &str) -> Option<PathBuf> {
        if !is_safe_stem(image_id) {
            return None;
        }
        let path = self.image_path(image_id);
        path.is_file().then_some(path)
    }

    /// Writes image data for `image_id`, replacing any previous file.
    ///
    /// Each call writes its own temp file, so concurrent saves of the same
    /// image all succeed and the last rename wins.
    pub fn save_image(&self, image_id: &str, data: &[u8]) -> std::io::Result<PathBuf> {
        if !is_safe_stem(image_id) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("unsafe image id: {image_id:?}"),
            ));
        }
        self.ensure_dir()?;

        let path = self.image_path(image_id);
        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{image_id}."))
            .suffix(PART_SUFFIX)
            .tempfile_in(&self.dir)?;
        tmp.write_all(data)?;
        tmp.persist(&path)?;
        Ok(path)
    }

    /// Deletes the downloaded images in `image_ids` and leftover temp files.
    ///
    /// Manual overrides are kept. Returns how many files were removed. A
    /// missing directory is empty.
    pub fn clear<'a>(&self, image_ids: impl IntoIterator<Item = &'a str>) -> std::io::Result<usize> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let mut doomed: BTreeSet<PathBuf> = image_ids
            .into_iter()
            .filter(|id| is_safe_stem(id))
            .map(|id| self.image_path(id))
            .collect();
        doomed.extend(entries.flatten().map(|e| e.path()).filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.') && n.ends_with(PART_SUFFIX))
        }));

        let mut removed = 0;
        for path in doomed {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to remove cached cover"),
            }
        }
        Ok(removed)
    }

    /// Total size of cached files in bytes.
    pub fn size(&self) -> u64 {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return 0;
        };
        entries
            .flatten()
            .filter_map(|e| e.metadata().ok())
            .filter(|m| m.is_file())
            .map(|m| m.len())
            .sum()
    }
}

/// True when `stem` can be used as a file name inside the cache directory.
fn is_safe_stem(stem: &str) -> bool {
    !stem.is_empty()
        && stem != "."
        && stem != ".."
        && !stem.contains(['/', '\\', '\0'])
}

/// Reads the persisted index.
pub fn load_index(store: &dyn KeyValueStore) -> CoverIndex {
    store.get_or_default(KEY_COVER_INDEX)
}

/// Returns the recorded image id for `identifier`.
pub fn indexed_image_id(store: &dyn KeyValueStore, identifier: &str) -> Option<String> {
    load_index(store).remove(identifier)
}

/// Records `identifier → image_id`, merged into the latest persisted index.
pub fn record_index(
    store: &dyn KeyValueStore,
    identifier: &str,
    image_id: &str,
) -> Result<(), StoreError> {
    store.update(KEY_COVER_INDEX, &mut |prev| {
        let mut index = match prev {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        index.insert(identifier.to_string(), Value::String(image_id.to_string()));
        Value::Object(index)
    })
}

/// Forgets every recorded mapping.
pub fn clear_index(store: &dyn KeyValueStore) -> Result<(), StoreError> {
    store.remove(KEY_COVER_INDEX)
}
