//! Error type shared by every fallible map operation.

use thiserror::Error;

/// Failure reported by `ChainHashMap` construction or `put`.
///
/// `BucketTable` and `NodeLimit` are the allocation failures: the first when a
/// bucket array could not be obtained (initial allocation or a resize), the
/// second when the node arenas are full. `InvalidConfig` only comes out of
/// `ChainHashMap::with_config`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// A bucket array of the requested size could not be allocated.
    #[error("failed to allocate a bucket table of {buckets} buckets")]
    BucketTable {
        /// Number of buckets requested.
        buckets: usize,
    },

    /// No more entry nodes can be created.
    #[error("entry limit of {limit} reached")]
    NodeLimit {
        /// The limit that was hit.
        limit: usize,
    },

    /// A `MapConfig` field is out of range.
    #[error("invalid map configuration: {0}")]
    InvalidConfig(&'static str),
}

impl MapError {
    /// True for the two allocation-failure variants.
    pub fn is_alloc(&self) -> bool {
        matches!(self, MapError::BucketTable { .. } | MapError::NodeLimit { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::MapError;

    #[test]
    fn display_mentions_sizes() {
        let e = MapError::BucketTable { buckets: 30 };
        assert_eq!(e.to_string(), "failed to allocate a bucket table of 30 buckets");
        let e = MapError::NodeLimit { limit: 4 };
        assert_eq!(e.to_string(), "entry limit of 4 reached");
    }

    #[test]
    fn alloc_classification() {
        assert!(MapError::BucketTable { buckets: 1 }.is_alloc());
        assert!(MapError::NodeLimit { limit: 1 }.is_alloc());
        assert!(!MapError::InvalidConfig("x").is_alloc());
    }
}
