//! Process-scoped memo for content root mappings.

use super::{ContentRootMapping, ManifestLocator, load_content_root_mappings};
use crate::core::Environment;
use std::sync::{Arc, OnceLock};

/// Shared, immutable list of mappings.
pub type Mappings = Arc<[ContentRootMapping]>;

/// Loads content root mappings at most once per process.
///
/// Owned by the server context and passed to namespace resolution
/// explicitly. Concurrent first callers block until the single load
/// finishes and all observe the same fully built list.
#[derive(Debug, Default)]
pub struct MappingCache {
    cell: OnceLock<Option<Mappings>>,
}

impl MappingCache {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Return the memoized mappings, running `load` on first use only.
    pub fn get_or_load<F>(&self, load: F) -> Option<Mappings>
    where
        F: FnOnce() -> Option<Vec<ContentRootMapping>>,
    {
        self.cell.get_or_init(|| load().map(Mappings::from)).clone()
    }

    /// Mappings in effect for `environment`.
    ///
    /// Only development reads the manifest; every other environment serves
    /// published assets from the web root.
    pub fn for_environment(
        &self,
        environment: Environment,
        locator: &ManifestLocator,
    ) -> Option<Mappings> {
        if !environment.is_development() {
            return None;
        }
        self.get_or_load(|| load_content_root_mappings(locator))
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn test_concurrent_first_access_parses_once() {
        const CALLERS: usize = 16;

        let cache = MappingCache::new();
        let parses = AtomicUsize::new(0);
        let barrier = Barrier::new(CALLERS);

        let results: Vec<_> = thread::scope(|s| {
            let handles: Vec<_> = (0..CALLERS)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        cache.get_or_load(|| {
                            parses.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(std::time::Duration::from_millis(20));
                            Some(vec![ContentRootMapping::new("spa1", "/srv/spa1")])
                        })
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(parses.load(Ordering::SeqCst), 1);
        let first = results[0].clone().unwrap();
        for result in &results {
            let mappings = result.as_ref().unwrap();
            assert!(Arc::ptr_eq(mappings, &first));
            assert_eq!(mappings.len(), 1);
        }
    }

    #[test]
    fn test_absent_result_is_memoized() {
        let cache = MappingCache::new();
        let parses = AtomicUsize::new(0);
        let load = || {
            parses.fetch_add(1, Ordering::SeqCst);
            None
        };

        assert!(cache.get_or_load(load).is_none());
        assert!(cache.get_or_load(load).is_none());
        assert!(cache.is_loaded());
        assert_eq!(parses.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_non_development_skips_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.xml");
        fs::write(
            &path,
            r#"<StaticWebAssets Version="1.0"><ContentRoot BasePath="a" Path="/a" /></StaticWebAssets>"#,
        )
        .unwrap();
        let locator = ManifestLocator {
            override_path: Some(path),
            ..Default::default()
        };

        let cache = MappingCache::new();
        assert!(cache.for_environment(Environment::Production, &locator).is_none());
        assert!(cache.for_environment(Environment::Staging, &locator).is_none());
        assert!(!cache.is_loaded());

        let mappings = cache.for_environment(Environment::Development, &locator).unwrap();
        assert_eq!(mappings[0], ContentRootMapping::new("a", "/a"));
    }
}
