/// Modification-time gate in front of the tool validator.
///
/// The cache maps a source path to the modification time seen at the last full
/// validation, plus that validation's verdict. A request whose file still has
/// the remembered mtime skips validation and reporting entirely. This only
/// suppresses repeated diagnostics: an `Unchanged` outcome says nothing new about
/// the content, so a file that failed once stays excluded, silently, until it is
/// touched again.
///
/// One process-wide instance is reachable through [`ValidationCache::global`]; it
/// survives any number of loader instantiations.
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::SystemTime;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::report::Reporter;
use crate::validate::{self, Taxonomies, ValidationResult};

/// Where modification times come from.
pub trait MtimeSource: Send + Sync {
    fn modified(&self, path: &Path) -> io::Result<SystemTime>;
}

/// Reads modification times from the filesystem.
#[derive(Debug, Default)]
pub struct FsMtime;

impl MtimeSource for FsMtime {
    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }
}

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    mtime: SystemTime,
    valid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedValidation {
    /// The validator ran and its findings were reported.
    Fresh(ValidationResult),
    /// The mtime matched; nothing was validated or reported.
    Unchanged { last_valid: bool },
}

impl CachedValidation {
    /// The result handed to callers: the real one, or a clean placeholder on a hit.
    pub fn result(&self) -> ValidationResult {
        match self {
            Self::Fresh(result) => result.clone(),
            Self::Unchanged { .. } => ValidationResult::clean(),
        }
    }

    /// Whether the document may be admitted, based on the last real verdict.
    pub fn admits(&self) -> bool {
        match self {
            Self::Fresh(result) => result.valid,
            Self::Unchanged { last_valid } => *last_valid,
        }
    }

    pub fn is_cache_hit(&self) -> bool {
        matches!(self, Self::Unchanged { .. })
    }
}

pub struct ValidationCache {
    entries: Mutex<HashMap<PathBuf, CacheEntry>>,
    mtime: Box<dyn MtimeSource>,
}

impl ValidationCache {
    pub fn new() -> Self {
        Self::with_mtime_source(Box::new(FsMtime))
    }

    pub fn with_mtime_source(mtime: Box<dyn MtimeSource>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            mtime,
        }
    }

    /// The process-wide cache.
    pub fn global() -> &'static ValidationCache {
        static GLOBAL: OnceLock<ValidationCache> = OnceLock::new();
        GLOBAL.get_or_init(ValidationCache::new)
    }

    /// Validate `meta` unless `path` still has the mtime recorded for it.
    ///
    /// `file_id` labels the diagnostics. Findings of a fresh validation go through
    /// `reporter` before the cache is updated, so a production abort leaves the
    /// entry untouched. When the mtime cannot be read the document is validated and
    /// nothing is cached.
    pub fn validate_tool(
        &self,
        meta: &Map<String, Value>,
        file_id: &str,
        path: &Path,
        taxonomies: Taxonomies<'_>,
        reporter: &Reporter,
    ) -> Result<CachedValidation, CatalogError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        let mtime = self
            .mtime
            .modified(path)
            .inspect_err(|e| warn!(file_id, error = %e, "cannot read modification time"))
            .ok();

        if let (Some(mtime), Some(entry)) = (mtime, entries.get(path)) {
            if entry.mtime == mtime {
                debug!(file_id, "unchanged since last validation");
                return Ok(CachedValidation::Unchanged {
                    last_valid: entry.valid,
                });
            }
        }

        let result = validate::validate_tool(meta, taxonomies);
        reporter.handle(file_id, &result)?;

        if let Some(mtime) = mtime {
            entries.insert(
                path.to_path_buf(),
                CacheEntry {
                    mtime,
                    valid: result.valid,
                },
            );
        }

        Ok(CachedValidation::Fresh(result))
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ValidationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ValidationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationCache")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::categories::{Category, CategoryRegistry};
    use crate::report::{MemorySink, Posture};
    use crate::standards::StandardRegistry;

    /// Mtimes set by hand, per path.
    #[derive(Default)]
    struct FakeMtime {
        times: Mutex<HashMap<String, SystemTime>>,
    }

    impl FakeMtime {
        fn touch(&self, path: &str, secs: u64) {
            self.times
                .lock()
                .unwrap()
                .insert(path.to_string(), SystemTime::UNIX_EPOCH + Duration::from_secs(secs));
        }
    }

    impl MtimeSource for Arc<FakeMtime> {
        fn modified(&self, path: &Path) -> io::Result<SystemTime> {
            self.times
                .lock()
                .unwrap()
                .get(path.to_string_lossy().as_ref())
                .copied()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }
    }

    fn registries() -> (CategoryRegistry, StandardRegistry) {
        let categories = CategoryRegistry::from_categories(vec![
            Category::new("validators", "Validators", "✓", "d"),
            Category::new("converters", "Converters", "⇄", "d"),
        ]);
        (categories, StandardRegistry::default())
    }

    fn invalid_tool() -> Map<String, Value> {
        json!({"title": "T", "description": "D", "categories": ["nope"], "status": "active"})
            .as_object()
            .cloned()
            .unwrap()
    }

    fn valid_tool() -> Map<String, Value> {
        json!({"title": "T", "description": "D", "categories": ["validators"], "status": "active"})
            .as_object()
            .cloned()
            .unwrap()
    }

    fn setup() -> (Arc<FakeMtime>, ValidationCache, Arc<MemorySink>, Reporter) {
        let clock = Arc::new(FakeMtime::default());
        let cache = ValidationCache::with_mtime_source(Box::new(clock.clone()));
        let sink = Arc::new(MemorySink::new());
        let reporter = Reporter::new(Posture::Development, sink.clone());
        (clock, cache, sink, reporter)
    }

    #[test]
    fn second_unchanged_call_is_clean_and_silent() {
        let (clock, cache, sink, reporter) = setup();
        let (c, s) = registries();
        let taxonomies = Taxonomies::new(&c, &s);
        clock.touch("tools/t.md", 10);

        let first = cache
            .validate_tool(&invalid_tool(), "t.md", Path::new("tools/t.md"), taxonomies, &reporter)
            .unwrap();
        assert!(!first.result().valid);
        assert_eq!(sink.reports().len(), 1);

        let second = cache
            .validate_tool(&invalid_tool(), "t.md", Path::new("tools/t.md"), taxonomies, &reporter)
            .unwrap();
        assert!(second.is_cache_hit());
        assert_eq!(second.result(), ValidationResult::clean());
        assert!(!second.admits());
        assert_eq!(sink.reports().len(), 1);
    }

    #[test]
    fn changed_mtime_revalidates() {
        let (clock, cache, sink, reporter) = setup();
        let (c, s) = registries();
        let taxonomies = Taxonomies::new(&c, &s);
        clock.touch("tools/t.md", 10);
        cache
            .validate_tool(&invalid_tool(), "t.md", Path::new("tools/t.md"), taxonomies, &reporter)
            .unwrap();

        clock.touch("tools/t.md", 20);
        let outcome = cache
            .validate_tool(&valid_tool(), "t.md", Path::new("tools/t.md"), taxonomies, &reporter)
            .unwrap();
        assert!(!outcome.is_cache_hit());
        assert!(outcome.admits());
        assert_eq!(sink.reports().len(), 1);
    }

    #[test]
    fn valid_unchanged_document_stays_admitted() {
        let (clock, cache, _sink, reporter) = setup();
        let (c, s) = registries();
        let taxonomies = Taxonomies::new(&c, &s);
        clock.touch("tools/t.md", 10);
        for _ in 0..3 {
            let outcome = cache
                .validate_tool(&valid_tool(), "t.md", Path::new("tools/t.md"), taxonomies, &reporter)
                .unwrap();
            assert!(outcome.admits());
        }
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn unreadable_mtime_is_never_cached() {
        let (_clock, cache, sink, reporter) = setup();
        let (c, s) = registries();
        let taxonomies = Taxonomies::new(&c, &s);
        for _ in 0..2 {
            let outcome = cache
                .validate_tool(&invalid_tool(), "t.md", Path::new("missing.md"), taxonomies, &reporter)
                .unwrap();
            assert!(!outcome.is_cache_hit());
        }
        assert!(cache.is_empty());
        assert_eq!(sink.reports().len(), 2);
    }

    #[test]
    fn production_abort_leaves_cache_untouched() {
        let (clock, cache, _sink, _) = setup();
        let reporter = Reporter::new(Posture::Production, Arc::new(MemorySink::new()));
        let (c, s) = registries();
        let taxonomies = Taxonomies::new(&c, &s);
        clock.touch("tools/t.md", 10);

        let err = cache
            .validate_tool(&invalid_tool(), "t.md", Path::new("tools/t.md"), taxonomies, &reporter)
            .unwrap_err();
        assert!(matches!(err, CatalogError::ValidationFailed { .. }));
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_forgets_entries() {
        let (clock, cache, sink, reporter) = setup();
        let (c, s) = registries();
        let taxonomies = Taxonomies::new(&c, &s);
        clock.touch("tools/t.md", 10);
        cache
            .validate_tool(&invalid_tool(), "t.md", Path::new("tools/t.md"), taxonomies, &reporter)
            .unwrap();
        cache.clear();
        cache
            .validate_tool(&invalid_tool(), "t.md", Path::new("tools/t.md"), taxonomies, &reporter)
            .unwrap();
        assert_eq!(sink.reports().len(), 2);
    }

    #[test]
    fn global_is_a_single_instance() {
        assert!(std::ptr::eq(ValidationCache::global(), ValidationCache::global()));
    }
}
