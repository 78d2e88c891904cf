use super::loader::{LoadError, SummarySnapshot};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime};

/// Process-wide memoization of the summary load, keyed by source path and
/// file modification time with a staleness window. Injected explicitly so
/// tests can run with a fresh cache; never a hidden global.
#[derive(Debug)]
pub struct SnapshotCache {
    ttl: Duration,
    slot: Mutex<Option<CacheEntry>>,
}

#[derive(Debug)]
struct CacheEntry {
    path: PathBuf,
    modified: SystemTime,
    loaded_at: Instant,
    snapshot: Arc<SummarySnapshot>,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Returns the cached snapshot when the source is unchanged and the entry
    /// is still within the staleness window; otherwise re-reads the file.
    pub fn load(&self, path: &Path) -> Result<Arc<SummarySnapshot>, LoadError> {
        let modified = source_mtime(path)?;

        let mut slot = self.slot.lock().expect("snapshot cache mutex poisoned");
        if let Some(entry) = slot.as_ref() {
            if entry.path == path
                && entry.modified == modified
                && entry.loaded_at.elapsed() < self.ttl
            {
                return Ok(Arc::clone(&entry.snapshot));
            }
        }

        let snapshot = Arc::new(SummarySnapshot::from_path(path)?);
        *slot = Some(CacheEntry {
            path: path.to_path_buf(),
            modified,
            loaded_at: Instant::now(),
            snapshot: Arc::clone(&snapshot),
        });

        Ok(snapshot)
    }
}

fn source_mtime(path: &Path) -> Result<SystemTime, LoadError> {
    let metadata = std::fs::metadata(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io(err)
        }
    })?;
    Ok(metadata.modified()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{name}-{}.csv", std::process::id()));
        let mut file = std::fs::File::create(&path).expect("fixture file created");
        file.write_all(contents.as_bytes()).expect("fixture written");
        path
    }

    const SAMPLE: &str = "state,district,pincode,total_updates,is_anomaly\n\
                          Delhi,New Delhi,110001,500,-1\n";

    #[test]
    fn repeated_loads_within_ttl_share_the_snapshot() {
        let path = write_fixture("sentinel-cache-reuse", SAMPLE);
        let cache = SnapshotCache::new(Duration::from_secs(3600));

        let first = cache.load(&path).expect("first load");
        let second = cache.load(&path).expect("second load");
        assert!(Arc::ptr_eq(&first, &second));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn zero_ttl_always_rereads() {
        let path = write_fixture("sentinel-cache-expiry", SAMPLE);
        let cache = SnapshotCache::new(Duration::ZERO);

        let first = cache.load(&path).expect("first load");
        let second = cache.load(&path).expect("second load");
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.records(), second.records());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn a_different_path_invalidates_the_slot() {
        let left = write_fixture("sentinel-cache-left", SAMPLE);
        let right = write_fixture("sentinel-cache-right", SAMPLE);
        let cache = SnapshotCache::new(Duration::from_secs(3600));

        let first = cache.load(&left).expect("left load");
        let second = cache.load(&right).expect("right load");
        assert!(!Arc::ptr_eq(&first, &second));

        std::fs::remove_file(&left).ok();
        std::fs::remove_file(&right).ok();
    }

    #[test]
    fn missing_source_surfaces_not_found() {
        let cache = SnapshotCache::new(Duration::from_secs(3600));
        let error = cache
            .load(Path::new("./no-such-summary.csv"))
            .expect_err("missing file");
        assert!(matches!(error, LoadError::NotFound { .. }));
    }
}
