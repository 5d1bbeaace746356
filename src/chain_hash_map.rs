//! ChainHashMap: the engine tying the bucket table to the order list.
//!
//! Every live entry has exactly one table node and one order node, linked to
//! each other. `put` may double the bucket table first; the order list is
//! what drives the rehash, so entries keep their insertion position across
//! any number of resizes.

use crate::bucket_table::{BucketTable, TableKey, TablePut};
use crate::config::MapConfig;
use crate::error::MapError;
use crate::hash_strategy::{HashFn, HashStrategy, ScalarKey};
use crate::order_list::{self, OrderList};
use core::fmt;
use core::mem;
use log::{debug, trace, warn};

pub struct ChainHashMap<K, V> {
    config: MapConfig,
    table: BucketTable<K, V>,
    order: OrderList,
    num_entries: usize,
    hash: HashFn<K>,
}

impl<K, V> ChainHashMap<K, V>
where
    K: ScalarKey,
{
    /// Empty map with the default configuration (15 buckets, load factor 0.75).
    ///
    /// Aborts on allocation failure like `Vec::new`; use `try_new` to get an
    /// error instead.
    pub fn new() -> Self {
        let config = MapConfig::default();
        Self {
            table: BucketTable::with_buckets(config.initial_buckets, config.max_entries),
            order: OrderList::new(),
            num_entries: 0,
            hash: K::STRATEGY.bind::<K>(),
            config,
        }
    }

    /// Empty map with the default configuration, reporting a failed bucket
    /// array allocation as `MapError::BucketTable`.
    pub fn try_new() -> Result<Self, MapError> {
        Self::with_config(MapConfig::default())
    }

    pub fn with_config(config: MapConfig) -> Result<Self, MapError> {
        config.validate()?;
        let table = BucketTable::try_with_buckets(config.initial_buckets, 0, config.max_entries)
            .map_err(|e| {
                warn!("map init failed: {}", e);
                e
            })?;
        Ok(Self {
            table,
            order: OrderList::new(),
            num_entries: 0,
            hash: K::STRATEGY.bind::<K>(),
            config,
        })
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.num_entries
    }

    pub fn is_empty(&self) -> bool {
        self.num_entries == 0
    }

    /// Current bucket count. Only ever doubles.
    pub fn table_size(&self) -> usize {
        self.table.table_size()
    }

    pub fn load_factor(&self) -> f64 {
        self.num_entries as f64 / self.table.table_size() as f64
    }

    /// The bucket function bound for `K`.
    pub fn strategy(&self) -> HashStrategy {
        K::STRATEGY
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Insert `key -> value`, or overwrite the value if `key` is present.
    ///
    /// Returns the previous value on overwrite. An overwrite keeps the entry's
    /// original insertion position.
    ///
    /// When the load factor has reached the configured maximum the table is
    /// doubled first. If that fails nothing else happens and the map is left
    /// as it was. If creating the entry's nodes fails after a successful
    /// resize, the map stays resized but does not gain the entry.
    pub fn put(&mut self, key: K, value: V) -> Result<Option<V>, MapError> {
        if self.load_factor() >= self.config.max_load_factor {
            self.resize()?;
        }

        match self.table.put(self.hash, key, value) {
            Ok(TablePut::Updated(old)) => Ok(Some(old)),
            Ok(TablePut::Created(tk)) => match self.order.append(tk) {
                Ok(ok) => {
                    self.table.set_order(tk, ok);
                    self.num_entries += 1;
                    debug_assert_eq!(self.table.len(), self.order.len());
                    Ok(None)
                }
                Err(e) => {
                    // Keep table and order list in step.
                    self.table.unlink(self.hash, tk);
                    warn!("put failed: {}", e);
                    Err(e)
                }
            },
            Err(e) => {
                warn!("put failed: {}", e);
                Err(e)
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.table.get(self.hash, key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.table.get_mut(self.hash, key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Release every entry and return to the freshly initialised state.
    pub fn clear(&mut self) {
        self.release_all();
        self.table = BucketTable::with_buckets(self.config.initial_buckets, self.config.max_entries);
    }

    /// Release every entry, node and the bucket array.
    ///
    /// Dropping the map does the same; `free` exists for callers that want
    /// the release to happen at a specific point.
    pub fn free(mut self) {
        self.release_all();
    }

    fn release_all(&mut self) {
        let entries = self.num_entries;
        // Table nodes first, found through the order list rather than the chains.
        for (_, tk) in self.order.iter() {
            self.table.release(tk);
        }
        while let Some(head) = self.order.head() {
            self.order.remove(head);
        }
        self.table.release_buckets();
        self.num_entries = 0;
        trace!("released {} entries", entries);
    }

    /// Double the bucket table and move every entry over, in insertion order.
    ///
    /// The new table and its node arena are sized up front, so once the
    /// allocation succeeds the move cannot fail part way.
    fn resize(&mut self) -> Result<(), MapError> {
        let old_size = self.table.table_size();
        let new_size = match old_size.checked_mul(2) {
            Some(n) if n <= self.config.max_buckets => n,
            _ => {
                let e = MapError::BucketTable {
                    buckets: old_size.saturating_mul(2),
                };
                warn!("resize refused: {}", e);
                return Err(e);
            }
        };
        let fresh = BucketTable::try_with_buckets(new_size, self.num_entries, self.config.max_entries)
            .map_err(|e| {
                warn!("resize failed: {}", e);
                e
            })?;

        let mut stale = mem::replace(&mut self.table, fresh);
        self.rehash(&mut stale)?;
        stale.release_buckets();

        debug!(
            "resized bucket table {} -> {} buckets ({} entries)",
            old_size, new_size, self.num_entries
        );
        Ok(())
    }

    fn rehash(&mut self, stale: &mut BucketTable<K, V>) -> Result<(), MapError> {
        let mut cursor = self.order.head();
        while let Some(ok) = cursor {
            cursor = self.order.next(ok);
            let Some((key, value)) = self.order.entry(ok).and_then(|tk| stale.release(tk)) else {
                continue;
            };
            match self.table.put(self.hash, key, value)? {
                TablePut::Created(tk) => {
                    self.table.set_order(tk, ok);
                    self.order.relink(ok, tk);
                }
                TablePut::Updated(_) => debug_assert!(false, "duplicate key found during rehash"),
            }
        }
        Ok(())
    }

    /// Entries in insertion order.
    pub(crate) fn entries(&self) -> Entries<'_, K, V> {
        Entries {
            table: &self.table,
            order: self.order.iter(),
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        use std::collections::HashSet;

        assert_eq!(self.table.len(), self.num_entries, "table node count");
        assert_eq!(self.order.len(), self.num_entries, "order node count");
        assert!(self.table.table_size() >= self.config.initial_buckets);

        // table size = initial * 2^n
        let mut size = self.table.table_size();
        while size > self.config.initial_buckets {
            assert_eq!(size % 2, 0, "table size must come from doubling");
            size /= 2;
        }
        assert_eq!(size, self.config.initial_buckets);

        // Every chained node sits at its key's slot and links to an order node
        // that links back.
        let mut chained = 0;
        for bucket in 0..self.table.table_size() {
            for (tk, node) in self.table.chain(bucket) {
                chained += 1;
                assert_eq!((self.hash)(self.table.table_size(), &node.key), bucket);
                let ok = node.order.expect("table node without order node");
                assert_eq!(self.order.entry(ok), Some(tk), "cross-link mismatch");
            }
        }
        assert_eq!(chained, self.num_entries, "chained node count");

        // Order list: acyclic, prev/next agree, one node per table node.
        assert_eq!(self.order.head().is_none(), self.num_entries == 0);
        assert_eq!(self.order.tail().is_none(), self.num_entries == 0);
        if let Some(h) = self.order.head() {
            assert_eq!(self.order.prev(h), None);
        }
        if let Some(t) = self.order.tail() {
            assert_eq!(self.order.next(t), None);
        }
        let mut seen = HashSet::new();
        let mut prev = None;
        let mut cursor = self.order.head();
        while let Some(ok) = cursor {
            assert!(seen.insert(ok), "order list cycles");
            assert_eq!(self.order.prev(ok), prev);
            let tk = self.order.entry(ok).expect("dangling order node");
            let node = self.table.node(tk).expect("order node points at released table node");
            assert_eq!(node.order, Some(ok));
            prev = Some(ok);
            cursor = self.order.next(ok);
        }
        assert_eq!(prev, self.order.tail());
        assert_eq!(seen.len(), self.num_entries);
    }
}

impl<K, V> Default for ChainHashMap<K, V>
where
    K: ScalarKey,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for ChainHashMap<K, V>
where
    K: ScalarKey + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

/// Insertion-order walk over `(key, value)` pairs.
pub(crate) struct Entries<'a, K, V> {
    table: &'a BucketTable<K, V>,
    order: order_list::Iter<'a>,
}

impl<'a, K, V> Iterator for Entries<'a, K, V>
where
    K: PartialEq,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let table = self.table;
        self.order
            .find_map(|(_, tk): (_, TableKey)| table.node(tk).map(|n| (&n.key, &n.value)))
    }
}
