//! OrderList: doubly linked list of entries in first-insertion order.
//!
//! Nodes live in their own arena and point at the table node they stand for.
//! `head` is the oldest live entry, `tail` the newest. Only `push_tail` is
//! reached by normal inserts; the other linking primitives are what it is
//! built from.

use crate::bucket_table::TableKey;
use crate::config::DEFAULT_MAX_ENTRIES;
use crate::error::MapError;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle of a node in the order arena.
    pub(crate) struct OrderKey;
}

#[derive(Debug)]
pub(crate) struct OrderNode {
    entry: TableKey,
    prev: Option<OrderKey>,
    next: Option<OrderKey>,
}

#[derive(Debug, Default)]
pub(crate) struct OrderList {
    nodes: SlotMap<OrderKey, OrderNode>,
    head: Option<OrderKey>,
    tail: Option<OrderKey>,
}

impl OrderList {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn head(&self) -> Option<OrderKey> {
        self.head
    }

    #[cfg(test)]
    pub(crate) fn tail(&self) -> Option<OrderKey> {
        self.tail
    }

    pub(crate) fn entry(&self, k: OrderKey) -> Option<TableKey> {
        self.nodes.get(k).map(|n| n.entry)
    }

    pub(crate) fn next(&self, k: OrderKey) -> Option<OrderKey> {
        self.nodes.get(k).and_then(|n| n.next)
    }

    #[cfg(test)]
    pub(crate) fn prev(&self, k: OrderKey) -> Option<OrderKey> {
        self.nodes.get(k).and_then(|n| n.prev)
    }

    fn alloc(&mut self, entry: TableKey) -> Result<OrderKey, MapError> {
        if self.nodes.len() >= DEFAULT_MAX_ENTRIES {
            return Err(MapError::NodeLimit {
                limit: DEFAULT_MAX_ENTRIES,
            });
        }
        Ok(self.nodes.insert(OrderNode {
            entry,
            prev: None,
            next: None,
        }))
    }

    /// Insert a node for `entry` right after `at`, which must be live.
    pub(crate) fn insert_after(&mut self, at: OrderKey, entry: TableKey) -> Result<OrderKey, MapError> {
        let new = self.alloc(entry)?;
        let after = self.nodes[at].next;
        {
            let n = &mut self.nodes[new];
            n.prev = Some(at);
            n.next = after;
        }
        match after {
            None => self.tail = Some(new),
            Some(a) => self.nodes[a].prev = Some(new),
        }
        self.nodes[at].next = Some(new);
        Ok(new)
    }

    /// Insert a node for `entry` right before `at`, which must be live.
    pub(crate) fn insert_before(&mut self, at: OrderKey, entry: TableKey) -> Result<OrderKey, MapError> {
        let new = self.alloc(entry)?;
        let before = self.nodes[at].prev;
        {
            let n = &mut self.nodes[new];
            n.next = Some(at);
            n.prev = before;
        }
        match before {
            None => self.head = Some(new),
            Some(b) => self.nodes[b].next = Some(new),
        }
        self.nodes[at].prev = Some(new);
        Ok(new)
    }

    pub(crate) fn push_head(&mut self, entry: TableKey) -> Result<OrderKey, MapError> {
        match self.head {
            Some(h) => self.insert_before(h, entry),
            None => {
                let new = self.alloc(entry)?;
                self.head = Some(new);
                self.tail = Some(new);
                Ok(new)
            }
        }
    }

    pub(crate) fn push_tail(&mut self, entry: TableKey) -> Result<OrderKey, MapError> {
        match self.tail {
            Some(t) => self.insert_after(t, entry),
            None => self.push_head(entry),
        }
    }

    /// Record a newly created table node as the most recent entry.
    pub(crate) fn append(&mut self, entry: TableKey) -> Result<OrderKey, MapError> {
        self.push_tail(entry)
    }

    /// Point an order node at a replacement table node; position is kept.
    pub(crate) fn relink(&mut self, k: OrderKey, entry: TableKey) {
        if let Some(n) = self.nodes.get_mut(k) {
            n.entry = entry;
        }
    }

    /// Unlink and release a node, returning the table node it stood for.
    pub(crate) fn remove(&mut self, k: OrderKey) -> Option<TableKey> {
        let node = self.nodes.remove(k)?;
        match node.prev {
            None => self.head = node.next,
            Some(p) => self.nodes[p].next = node.next,
        }
        match node.next {
            None => self.tail = node.prev,
            Some(n) => self.nodes[n].prev = node.prev,
        }
        Some(node.entry)
    }

    /// Walk from head to tail.
    pub(crate) fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.nodes.len(),
        }
    }
}

pub(crate) struct Iter<'a> {
    list: &'a OrderList,
    cursor: Option<OrderKey>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (OrderKey, TableKey);

    fn next(&mut self) -> Option<Self::Item> {
        // `remaining` bounds the walk even if links were ever corrupted.
        if self.remaining == 0 {
            return None;
        }
        let k = self.cursor?;
        let node = self.list.nodes.get(k)?;
        self.cursor = node.next;
        self.remaining -= 1;
        Some((k, node.entry))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
