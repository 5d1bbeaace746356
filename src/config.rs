//! Construction-time tuning for `ChainHashMap`.

use crate::error::MapError;

/// Bucket count a default map starts with.
pub const DEFAULT_TABLE_SIZE: usize = 15;

/// Load factor at or above which `put` doubles the bucket table first.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;

/// Largest bucket count a map may grow to by default.
pub const DEFAULT_MAX_BUCKETS: usize = usize::MAX >> 1;

/// Slotmap indexes are 32-bit; one value is reserved.
pub const DEFAULT_MAX_ENTRIES: usize = (u32::MAX - 1) as usize;

/// Settings fixed for the lifetime of a map.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MapConfig {
    pub(crate) initial_buckets: usize,
    pub(crate) max_load_factor: f64,
    pub(crate) max_buckets: usize,
    pub(crate) max_entries: usize,
}

impl MapConfig {
    pub const fn new() -> Self {
        Self {
            initial_buckets: DEFAULT_TABLE_SIZE,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            max_buckets: DEFAULT_MAX_BUCKETS,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }

    /// Bucket count allocated by `init` and restored by `clear`.
    pub fn with_initial_buckets(mut self, buckets: usize) -> Self {
        self.initial_buckets = buckets;
        self
    }

    pub fn with_max_load_factor(mut self, factor: f64) -> Self {
        self.max_load_factor = factor;
        self
    }

    /// Resizes that would go past this many buckets fail with
    /// `MapError::BucketTable`.
    pub fn with_max_buckets(mut self, buckets: usize) -> Self {
        self.max_buckets = buckets;
        self
    }

    /// Inserting a new key once this many entries are live fails with
    /// `MapError::NodeLimit`. Capped at the arena index space.
    pub fn with_max_entries(mut self, entries: usize) -> Self {
        self.max_entries = entries.min(DEFAULT_MAX_ENTRIES);
        self
    }

    pub fn initial_buckets(&self) -> usize {
        self.initial_buckets
    }
    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }
    pub fn max_buckets(&self) -> usize {
        self.max_buckets
    }
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn validate(&self) -> Result<(), MapError> {
        if self.initial_buckets == 0 {
            return Err(MapError::InvalidConfig("initial_buckets must be at least 1"));
        }
        if !self.max_load_factor.is_finite() || self.max_load_factor <= 0.0 {
            return Err(MapError::InvalidConfig(
                "max_load_factor must be finite and positive",
            ));
        }
        if self.max_buckets < self.initial_buckets {
            return Err(MapError::InvalidConfig(
                "max_buckets must not be below initial_buckets",
            ));
        }
        if self.max_entries == 0 {
            return Err(MapError::InvalidConfig("max_entries must be at least 1"));
        }
        Ok(())
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let c = MapConfig::default();
        assert_eq!(c.initial_buckets(), 15);
        assert_eq!(c.max_load_factor(), 0.75);
        assert_eq!(c.max_buckets(), DEFAULT_MAX_BUCKETS);
        assert_eq!(c.max_entries(), DEFAULT_MAX_ENTRIES);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_fields() {
        let bad = [
            MapConfig::new().with_initial_buckets(0),
            MapConfig::new().with_max_load_factor(0.0),
            MapConfig::new().with_max_load_factor(f64::NAN),
            MapConfig::new().with_max_load_factor(-1.0),
            MapConfig::new().with_initial_buckets(8).with_max_buckets(4),
            MapConfig::new().with_max_entries(0),
        ];
        for c in bad {
            match c.validate() {
                Err(MapError::InvalidConfig(_)) => {}
                other => panic!("expected InvalidConfig for {:?}, got {:?}", c, other),
            }
        }
    }

    #[test]
    fn max_entries_is_capped_at_arena_space() {
        let c = MapConfig::new().with_max_entries(usize::MAX);
        assert_eq!(c.max_entries(), DEFAULT_MAX_ENTRIES);
    }
}
