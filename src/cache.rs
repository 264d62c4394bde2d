use std::{num::NonZeroUsize, rc::Rc};

use log::debug;
use lru::LruCache;

use crate::{
    dataset::Table,
    error::LoadError,
    loader::{self, LoadOptions},
    source::{RawSource, SourceKind},
};

pub const DEFAULT_CACHE_CAPACITY: usize = 8;

/// Identity of one load: content digest plus every parameter that changes
/// the resulting table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    digest: [u8; 32],
    kind: SourceKind,
    sheet: Option<String>,
    header_row: Option<usize>,
    delimiter: u8,
    encoding: &'static str,
}

impl CacheKey {
    pub fn for_source(source: &RawSource, options: &LoadOptions) -> Self {
        let excel = source.kind() == SourceKind::Excel;
        Self {
            digest: source.digest(),
            kind: source.kind(),
            sheet: source.sheet().filter(|_| excel).map(str::to_string),
            header_row: excel.then(|| source.header_row()),
            delimiter: options.delimiter,
            encoding: options.encoding.name(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

/// Memoizes successful loads with least-recently-used eviction. Failed loads
/// are never stored, so a retry always re-reads the source.
#[derive(Debug)]
pub struct LoadCache {
    entries: LruCache<CacheKey, Rc<Table>>,
    stats: CacheStats,
}

impl Default for LoadCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl LoadCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            stats: CacheStats::default(),
        }
    }

    pub fn load(
        &mut self,
        source: &RawSource,
        options: &LoadOptions,
    ) -> Result<Rc<Table>, LoadError> {
        let key = CacheKey::for_source(source, options);
        if let Some(table) = self.entries.get(&key) {
            self.stats.hits += 1;
            debug!("Load cache hit for '{}'", source.name());
            return Ok(Rc::clone(table));
        }
        self.stats.misses += 1;
        debug!("Load cache miss for '{}'", source.name());
        let table = Rc::new(loader::load(source, options)?);
        if self.entries.push(key, Rc::clone(&table)).is_some() {
            debug!("Evicted least recently used table from load cache");
        }
        Ok(table)
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
