//! Cache of parsed files
//!
//! Entries are keyed by `(path, format name, options)` and remember when the
//! file was read. A cached dataset is reused while the file's modification
//! time is older than that read time; otherwise the file is parsed again.
//!
//! The cache is a plain owned value. It is not thread-safe; share it behind a
//! lock if several threads need it.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;

use crate::error::Result;
use crate::model::DataSet;
use crate::registry::Registry;

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    path: PathBuf,
    format_name: Option<String>,
    options: Vec<String>,
}

#[derive(Debug)]
struct CachedFile {
    key: CacheKey,
    read_time: SystemTime,
    dataset: Rc<DataSet>,
}

impl CachedFile {
    /// Still valid unless the file changed (or vanished) after it was read.
    ///
    /// An mtime equal to the read time counts as changed: both come from
    /// clocks with limited resolution.
    fn is_fresh(&self) -> bool {
        match modification_time(&self.key.path) {
            Some(mtime) => mtime > UNIX_EPOCH && mtime < self.read_time,
            None => false,
        }
    }
}

fn modification_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Bounded first-in first-out cache of loaded datasets.
#[derive(Debug)]
pub struct Cache {
    registry: Registry,
    capacity: usize,
    entries: VecDeque<CachedFile>,
}

impl Cache {
    /// Number of datasets kept by a new cache.
    pub const DEFAULT_CAPACITY: usize = 1;

    /// Cache over the built-in formats.
    pub fn new() -> Self {
        Self::with_registry(Registry::builtin())
    }

    /// Cache loading through `registry`.
    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            capacity: Self::DEFAULT_CAPACITY,
            entries: VecDeque::with_capacity(Self::DEFAULT_CAPACITY),
        }
    }

    /// Load `path` or return the dataset cached for the same arguments.
    ///
    /// Arguments are the same as for [`Registry::load_file`]. Parse errors
    /// are returned as-is and nothing is cached for them.
    pub fn get(
        &mut self,
        path: impl AsRef<Path>,
        format_name: Option<&str>,
        options: &[String],
    ) -> Result<Rc<DataSet>> {
        let path = path.as_ref();
        let key = CacheKey {
            path: path.to_path_buf(),
            format_name: format_name
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            options: options.to_vec(),
        };

        if let Some(pos) = self.entries.iter().position(|e| e.key == key) {
            if self.entries[pos].is_fresh() {
                debug!("cache hit: {}", path.display());
                return Ok(Rc::clone(&self.entries[pos].dataset));
            }
            debug!("cache entry for {} is stale", path.display());
            self.entries.remove(pos);
        } else {
            debug!("cache miss: {}", path.display());
        }

        let dataset = Rc::new(
            self.registry
                .load_file(path, key.format_name.as_deref(), options)?,
        );
        let read_time = SystemTime::now();

        if self.capacity > 0 {
            while self.entries.len() >= self.capacity {
                if let Some(evicted) = self.entries.pop_front() {
                    debug!("cache evicts {}", evicted.key.path.display());
                }
            }
            self.entries.push_back(CachedFile {
                key,
                read_time,
                dataset: Rc::clone(&dataset),
            });
        }
        Ok(dataset)
    }

    /// Maximum number of cached datasets.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the capacity, evicting the oldest entries that no longer fit.
    ///
    /// A capacity of 0 disables caching.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.entries.len() > capacity {
            self.entries.pop_front();
        }
    }

    /// Number of cached datasets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached dataset. Handles already returned stay valid.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}
