//! BucketTable: separately-chained slots over an arena of nodes.
//!
//! Chains are singly linked through `TableNode::next`; new nodes attach at the
//! end of their chain. Each node carries a back-link to its order-list node,
//! owned by the map engine.

use crate::error::MapError;
use crate::hash_strategy::HashFn;
use crate::order_list::OrderKey;
use core::mem;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle of a node in the table arena.
    pub(crate) struct TableKey;
}

#[derive(Debug)]
pub(crate) struct TableNode<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    next: Option<TableKey>,
    pub(crate) order: Option<OrderKey>,
}

/// Where a key lives, or where it would be attached.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Slot {
    Found(TableKey),
    Vacant {
        bucket: usize,
        tail: Option<TableKey>,
    },
}

/// Outcome of `BucketTable::put`.
#[derive(Debug, PartialEq)]
pub(crate) enum TablePut<V> {
    Created(TableKey),
    /// The key existed; carries the value it held before.
    Updated(V),
}

pub(crate) struct BucketTable<K, V> {
    heads: Vec<Option<TableKey>>,
    nodes: SlotMap<TableKey, TableNode<K, V>>,
    max_entries: usize,
}

impl<K, V> BucketTable<K, V>
where
    K: PartialEq,
{
    pub(crate) fn with_buckets(buckets: usize, max_entries: usize) -> Self {
        Self {
            heads: vec![None; buckets],
            nodes: SlotMap::with_key(),
            max_entries,
        }
    }

    /// Fallible constructor: reports `MapError::BucketTable` instead of
    /// aborting when the bucket array cannot be allocated. The node arena is
    /// pre-sized for `node_capacity` entries.
    pub(crate) fn try_with_buckets(
        buckets: usize,
        node_capacity: usize,
        max_entries: usize,
    ) -> Result<Self, MapError> {
        let mut heads = Vec::new();
        heads
            .try_reserve_exact(buckets)
            .map_err(|_| MapError::BucketTable { buckets })?;
        heads.resize(buckets, None);
        Ok(Self {
            heads,
            nodes: SlotMap::with_capacity_and_key(node_capacity),
            max_entries,
        })
    }

    pub(crate) fn table_size(&self) -> usize {
        self.heads.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn find(&self, hash: HashFn<K>, key: &K) -> Slot {
        let bucket = hash(self.heads.len(), key);
        let mut tail = None;
        let mut cursor = self.heads[bucket];
        while let Some(k) = cursor {
            let node = &self.nodes[k];
            if node.key == *key {
                return Slot::Found(k);
            }
            tail = Some(k);
            cursor = node.next;
        }
        Slot::Vacant { bucket, tail }
    }

    /// Overwrite the value of an existing key, or append a fresh node to the
    /// end of the key's chain. Nothing changes when the entry limit is hit.
    pub(crate) fn put(&mut self, hash: HashFn<K>, key: K, value: V) -> Result<TablePut<V>, MapError> {
        match self.find(hash, &key) {
            Slot::Found(k) => {
                let old = mem::replace(&mut self.nodes[k].value, value);
                Ok(TablePut::Updated(old))
            }
            Slot::Vacant { bucket, tail } => {
                if self.nodes.len() >= self.max_entries {
                    return Err(MapError::NodeLimit {
                        limit: self.max_entries,
                    });
                }
                let k = self.nodes.insert(TableNode {
                    key,
                    value,
                    next: None,
                    order: None,
                });
                match tail {
                    None => self.heads[bucket] = Some(k),
                    Some(t) => self.nodes[t].next = Some(k),
                }
                Ok(TablePut::Created(k))
            }
        }
    }

    pub(crate) fn get(&self, hash: HashFn<K>, key: &K) -> Option<&V> {
        match self.find(hash, key) {
            Slot::Found(k) => self.nodes.get(k).map(|n| &n.value),
            Slot::Vacant { .. } => None,
        }
    }

    pub(crate) fn get_mut(&mut self, hash: HashFn<K>, key: &K) -> Option<&mut V> {
        match self.find(hash, key) {
            Slot::Found(k) => self.nodes.get_mut(k).map(|n| &mut n.value),
            Slot::Vacant { .. } => None,
        }
    }

    pub(crate) fn node(&self, k: TableKey) -> Option<&TableNode<K, V>> {
        self.nodes.get(k)
    }

    pub(crate) fn set_order(&mut self, k: TableKey, order: OrderKey) {
        if let Some(n) = self.nodes.get_mut(k) {
            n.order = Some(order);
        }
    }

    /// Detach a node from its chain and release it.
    pub(crate) fn unlink(&mut self, hash: HashFn<K>, k: TableKey) -> Option<(K, V)> {
        let node = self.nodes.get(k)?;
        let bucket = hash(self.heads.len(), &node.key);
        let next = node.next;

        if self.heads[bucket] == Some(k) {
            self.heads[bucket] = next;
        } else {
            let mut cursor = self.heads[bucket];
            while let Some(c) = cursor {
                let n = &mut self.nodes[c];
                if n.next == Some(k) {
                    n.next = next;
                    break;
                }
                cursor = n.next;
            }
        }
        self.release(k)
    }

    /// Release a node without patching its chain. Only valid when the whole
    /// bucket array is about to be discarded.
    pub(crate) fn release(&mut self, k: TableKey) -> Option<(K, V)> {
        self.nodes.remove(k).map(|n| (n.key, n.value))
    }

    /// Drop the bucket array; every node must already be released.
    pub(crate) fn release_buckets(&mut self) {
        debug_assert!(self.nodes.is_empty());
        self.heads = Vec::new();
    }

    /// Walk one bucket's chain in attachment order.
    #[cfg(test)]
    pub(crate) fn chain(&self, bucket: usize) -> Chain<'_, K, V> {
        Chain {
            table: self,
            cursor: self.heads.get(bucket).copied().flatten(),
        }
    }
}

#[cfg(test)]
pub(crate) struct Chain<'a, K, V> {
    table: &'a BucketTable<K, V>,
    cursor: Option<TableKey>,
}

#[cfg(test)]
impl<'a, K, V> Iterator for Chain<'a, K, V> {
    type Item = (TableKey, &'a TableNode<K, V>);

    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cursor?;
        let node = self.table.nodes.get(k)?;
        self.cursor = node.next;
        Some((k, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_strategy::HashStrategy;

    fn modulo() -> HashFn<u32> {
        HashStrategy::Modulo.bind::<u32>()
    }

    fn chain_keys(t: &BucketTable<u32, &'static str>, bucket: usize) -> Vec<u32> {
        t.chain(bucket).map(|(_, n)| n.key).collect()
    }

    /// Colliding keys share a chain and are told apart by equality.
    #[test]
    fn colliding_keys_resolved_by_equality() {
        let mut t = BucketTable::with_buckets(15, usize::MAX);
        let h = modulo();
        assert!(matches!(t.put(h, 3, "a"), Ok(TablePut::Created(_))));
        assert!(matches!(t.put(h, 18, "b"), Ok(TablePut::Created(_))));
        assert_eq!(t.get(h, &3), Some(&"a"));
        assert_eq!(t.get(h, &18), Some(&"b"));
        assert_eq!(t.get(h, &33), None);
        assert_eq!(chain_keys(&t, 3), vec![3, 18]);
    }

    /// New nodes go to the end of their chain, not the front.
    #[test]
    fn chain_appends_at_tail() {
        let mut t = BucketTable::with_buckets(5, usize::MAX);
        let h = modulo();
        for k in [1, 6, 11, 16] {
            t.put(h, k, "x").unwrap();
        }
        assert_eq!(chain_keys(&t, 1), vec![1, 6, 11, 16]);
        match t.find(h, &21) {
            Slot::Vacant { bucket, tail } => {
                assert_eq!(bucket, 1);
                assert_eq!(tail.and_then(|k| t.node(k)).map(|n| n.key), Some(16));
            }
            other => panic!("unexpected slot: {:?}", other),
        }
    }

    #[test]
    fn update_overwrites_in_place() {
        let mut t = BucketTable::with_buckets(15, usize::MAX);
        let h = modulo();
        let k = match t.put(h, 7, "old").unwrap() {
            TablePut::Created(k) => k,
            other => panic!("unexpected put result: {:?}", other),
        };
        assert_eq!(t.put(h, 7, "new").unwrap(), TablePut::Updated("old"));
        assert_eq!(t.len(), 1);
        assert_eq!(t.find(h, &7), Slot::Found(k));
        assert_eq!(t.get(h, &7), Some(&"new"));
    }

    #[test]
    fn get_mut_edits_value() {
        let mut t = BucketTable::with_buckets(15, usize::MAX);
        let h = modulo();
        t.put(h, 4, "a").unwrap();
        *t.get_mut(h, &4).unwrap() = "b";
        assert_eq!(t.get(h, &4), Some(&"b"));
        assert!(t.get_mut(h, &5).is_none());
    }

    /// At the entry limit, new keys are refused and the table is unchanged;
    /// existing keys can still be updated.
    #[test]
    fn node_limit_leaves_table_untouched() {
        let mut t = BucketTable::with_buckets(15, 2);
        let h = modulo();
        t.put(h, 1, "a").unwrap();
        t.put(h, 16, "b").unwrap();
        assert_eq!(t.put(h, 31, "c"), Err(MapError::NodeLimit { limit: 2 }));
        assert_eq!(t.len(), 2);
        assert_eq!(chain_keys(&t, 1), vec![1, 16]);
        assert_eq!(t.put(h, 1, "z").unwrap(), TablePut::Updated("a"));
    }

    #[test]
    fn unlink_patches_head_middle_and_tail() {
        let mut t = BucketTable::with_buckets(5, usize::MAX);
        let h = modulo();
        let mut keys = Vec::new();
        for k in [2, 7, 12, 17] {
            match t.put(h, k, "v").unwrap() {
                TablePut::Created(tk) => keys.push(tk),
                other => panic!("unexpected put result: {:?}", other),
            }
        }
        assert_eq!(t.unlink(h, keys[1]), Some((7, "v")));
        assert_eq!(chain_keys(&t, 2), vec![2, 12, 17]);
        assert_eq!(t.unlink(h, keys[0]), Some((2, "v")));
        assert_eq!(chain_keys(&t, 2), vec![12, 17]);
        assert_eq!(t.unlink(h, keys[3]), Some((17, "v")));
        assert_eq!(chain_keys(&t, 2), vec![12]);
        assert_eq!(t.unlink(h, keys[3]), None);
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(h, &12), Some(&"v"));
    }

    #[test]
    fn try_with_buckets_reports_impossible_sizes() {
        let r = BucketTable::<u32, ()>::try_with_buckets(usize::MAX, 0, usize::MAX);
        assert!(matches!(r, Err(MapError::BucketTable { buckets }) if buckets == usize::MAX));
        let t = BucketTable::<u32, ()>::try_with_buckets(30, 8, usize::MAX).unwrap();
        assert_eq!(t.table_size(), 30);
        assert_eq!(t.len(), 0);
    }
}
