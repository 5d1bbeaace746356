//! chain-hashmap: a single-threaded, separately-chained hash map over scalar
//! keys that remembers the order in which keys were first inserted.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep two views of the same entries (bucket chains for lookup, a
//!   doubly linked list for insertion order) consistent through inserts,
//!   updates and resizes.
//! - Layers:
//!   - `hash_strategy`: picks one of three bucket functions from the key
//!     type (`ScalarKey::STRATEGY`); the map binds it once at construction.
//!   - `BucketTable<K, V>`: array of chain heads over an arena of table
//!     nodes. Find, create-or-update, read.
//!   - `OrderList`: doubly linked list over an arena of order nodes, oldest
//!     entry at the head.
//!   - `ChainHashMap<K, V>`: public engine. Owns both structures, the entry
//!     count and the bound hash function; drives resize and release.
//!
//! Constraints
//! - Single-threaded; no internal locking.
//! - Keys use built-in equality. Only scalar, enum-like or address-identity
//!   keys are supported; see `ScalarKey`.
//! - Table size starts at 15 buckets (configurable) and only doubles.
//! - No public removal or iteration; `Debug` shows entries in insertion
//!   order.
//!
//! Arenas instead of pointers
//! - Chain links, order links and the table/order cross-links are
//!   `slotmap` keys. Releasing a node is a `SlotMap::remove`; stale keys
//!   never resolve to a newer node.
//!
//! Resize
//! - Triggered inside `put` when `len / table_size >= max_load_factor`,
//!   before the new key is placed.
//! - A new bucket array of twice the size is allocated along with an arena
//!   sized for every live entry. The order list is then walked head to tail:
//!   each entry moves into the new table and its order node is relinked to
//!   the new table node. Walking the order list keeps chain order within
//!   each new bucket equal to insertion order.
//! - Allocation happens before anything moves, so a failed resize leaves
//!   the map exactly as it was.
//!
//! Release
//! - `free`/`clear` find every table node through the order list (not the
//!   chains), then release the order nodes, then the bucket array.
//!
//! Errors
//! - `MapError::BucketTable` and `MapError::NodeLimit` are the allocation
//!   failures; neither is retried. `get` on a missing key returns `None`,
//!   not an error.

mod bucket_table;
mod chain_hash_map;
mod chain_hash_map_proptest;
mod config;
mod error;
mod hash_strategy;
mod order_list;

// Public surface
pub use chain_hash_map::ChainHashMap;
pub use config::{MapConfig, DEFAULT_MAX_LOAD_FACTOR, DEFAULT_TABLE_SIZE};
pub use error::MapError;
pub use hash_strategy::{ByAddress, HashFn, HashStrategy, ScalarKey};
