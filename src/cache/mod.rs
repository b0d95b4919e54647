pub mod freshness;

pub use freshness::{latest_modification, templates_modified_since};

use crate::templates::{load_templates, Template, TemplateStore};
use crate::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Source of "now" for reload timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug)]
struct CacheEntry {
    templates: Arc<Vec<Template>>,
    last_reload: DateTime<Utc>,
}

/// Read-through cache of the template catalog
///
/// The lock is held across a reload, so callers racing on an empty cache see
/// a single load.
pub struct TemplateCache {
    store: Box<dyn TemplateStore>,
    clock: Box<dyn Clock>,
    /// Directory watched for changes; `None` disables the freshness check
    watch_dir: Option<PathBuf>,
    entry: Mutex<Option<CacheEntry>>,
}

impl TemplateCache {
    pub fn new(store: impl TemplateStore + 'static) -> Self {
        Self::with_clock(store, SystemClock)
    }

    pub fn with_clock(store: impl TemplateStore + 'static, clock: impl Clock + 'static) -> Self {
        Self {
            store: Box::new(store),
            clock: Box::new(clock),
            watch_dir: None,
            entry: Mutex::new(None),
        }
    }

    /// Reload automatically when files under `dir` change
    ///
    /// File modification times are compared with stamps from the cache's
    /// `Clock`, so the clock must track filesystem time for this to be
    /// meaningful.
    pub fn with_freshness_check<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.watch_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Return the cached catalog, loading it when empty or forced
    pub fn get_cached_templates(&self, force_reload: bool) -> Result<Arc<Vec<Template>>> {
        let mut entry = self.lock();

        let reason = match entry.as_ref() {
            None => "empty cache",
            Some(_) if force_reload => "forced",
            Some(cached) => match &self.watch_dir {
                Some(dir) if templates_modified_since(dir, Some(cached.last_reload))? => {
                    "template files changed"
                }
                _ => {
                    debug!("Serving {} cached templates", cached.templates.len());
                    return Ok(Arc::clone(&cached.templates));
                }
            },
        };

        info!("Reloading templates ({})", reason);
        // Stamp before reading so edits made during the load stay newer.
        let loaded_at = self.clock.now();
        let templates = Arc::new(load_templates(self.store.as_ref())?);
        *entry = Some(CacheEntry {
            templates: Arc::clone(&templates),
            last_reload: loaded_at,
        });

        Ok(templates)
    }

    /// Whether the next access would reload from the store
    ///
    /// Without a watched directory only an empty cache needs a reload.
    pub fn should_reload(&self) -> Result<bool> {
        let last_reload = self.last_reload();
        match (&self.watch_dir, last_reload) {
            (_, None) => Ok(true),
            (Some(dir), last_reload) => templates_modified_since(dir, last_reload),
            (None, Some(_)) => Ok(false),
        }
    }

    /// Time of the last successful reload
    pub fn last_reload(&self) -> Option<DateTime<Utc>> {
        self.lock().as_ref().map(|cached| cached.last_reload)
    }

    pub fn is_loaded(&self) -> bool {
        self.lock().is_some()
    }

    /// Drop the cached catalog (forces reload on next access)
    pub fn clear(&self) {
        *self.lock() = None;
        debug!("Template cache cleared");
    }

    fn lock(&self) -> MutexGuard<'_, Option<CacheEntry>> {
        // The entry is only replaced after a successful load.
        self.entry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CatalogError;
    use chrono::{Duration, TimeZone};
    use std::fs;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[derive(Clone)]
    struct FakeStore {
        calls: Arc<AtomicUsize>,
        fail: Arc<AtomicBool>,
    }

    impl FakeStore {
        fn new() -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                fail: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    impl TemplateStore for FakeStore {
        fn list_templates(&self) -> Result<Vec<Template>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(CatalogError::Store("store unavailable".to_string()));
            }
            Ok(vec![Template::new("iw", "Insanity Wolf"), Template::new("fry", "Fry")])
        }
    }

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[test]
    fn test_loads_once() {
        let store = FakeStore::new();
        let cache = TemplateCache::new(store.clone());

        assert!(!cache.is_loaded());
        let first = cache.get_cached_templates(false).unwrap();
        let second = cache.get_cached_templates(false).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first[0].id, "fry");
    }

    #[test]
    fn test_force_reload() {
        let store = FakeStore::new();
        let cache = TemplateCache::new(store.clone());

        cache.get_cached_templates(false).unwrap();
        cache.get_cached_templates(true).unwrap();
        cache.get_cached_templates(true).unwrap();

        assert_eq!(store.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_store_failure_keeps_previous_entry() {
        let store = FakeStore::new();
        let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let cache = TemplateCache::with_clock(store.clone(), FixedClock(stamp));

        cache.get_cached_templates(false).unwrap();
        store.fail.store(true, Ordering::SeqCst);

        assert!(matches!(
            cache.get_cached_templates(true),
            Err(CatalogError::Store(_))
        ));
        assert_eq!(cache.last_reload(), Some(stamp));
        assert_eq!(cache.get_cached_templates(false).unwrap().len(), 2);
    }

    #[test]
    fn test_should_reload_without_watch_dir() {
        let cache = TemplateCache::new(FakeStore::new());
        assert!(cache.should_reload().unwrap());

        cache.get_cached_templates(false).unwrap();
        assert!(!cache.should_reload().unwrap());

        cache.clear();
        assert!(cache.should_reload().unwrap());
        assert_eq!(cache.last_reload(), None);
    }

    #[test]
    fn test_freshness_check_triggers_reload() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("config.yml"), "name: Fry\n").unwrap();

        let store = FakeStore::new();
        let long_ago = Utc::now() - Duration::days(365);
        let cache = TemplateCache::with_clock(store.clone(), FixedClock(long_ago))
            .with_freshness_check(temp_dir.path());

        cache.get_cached_templates(false).unwrap();
        assert!(cache.should_reload().unwrap());
        cache.get_cached_templates(false).unwrap();

        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_freshness_check_keeps_fresh_cache() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("config.yml"), "name: Fry\n").unwrap();

        let store = FakeStore::new();
        let future = Utc::now() + Duration::days(1);
        let cache = TemplateCache::with_clock(store.clone(), FixedClock(future))
            .with_freshness_check(temp_dir.path());

        cache.get_cached_templates(false).unwrap();
        cache.get_cached_templates(false).unwrap();

        assert!(!cache.should_reload().unwrap());
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    struct SharedClock(Arc<Mutex<DateTime<Utc>>>);

    impl Clock for SharedClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    /// Rewrites a watched file while loading, then lets time move on
    struct EditingStore {
        dir: PathBuf,
        now: Arc<Mutex<DateTime<Utc>>>,
        calls: Arc<AtomicUsize>,
    }

    impl TemplateStore for EditingStore {
        fn list_templates(&self) -> Result<Vec<Template>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let mut now = self.now.lock().unwrap();

            let path = self.dir.join("config.yml");
            fs::write(&path, format!("name: Fry v{}\n", call + 2))?;
            let edited_at = *now + Duration::seconds(5);
            fs::File::options()
                .write(true)
                .open(&path)?
                .set_modified(edited_at.into())?;

            *now += Duration::seconds(10);
            Ok(vec![Template::new("fry", &format!("Fry v{}", call + 1))])
        }
    }

    #[test]
    fn test_edit_during_load_is_not_lost() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("config.yml"), "name: Fry v1\n").unwrap();

        let now = Arc::new(Mutex::new(Utc::now()));
        let store = EditingStore {
            dir: temp_dir.path().to_path_buf(),
            now: Arc::clone(&now),
            calls: Arc::new(AtomicUsize::new(0)),
        };
        let calls = Arc::clone(&store.calls);
        let cache = TemplateCache::with_clock(store, SharedClock(now))
            .with_freshness_check(temp_dir.path());

        let first = cache.get_cached_templates(false).unwrap();
        assert_eq!(first[0].name, "Fry v1");
        assert!(cache.should_reload().unwrap());

        let second = cache.get_cached_templates(false).unwrap();
        assert_eq!(second[0].name, "Fry v2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
