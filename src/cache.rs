use std::collections::HashMap;

use crate::normalize::normalize;

/// Bounded memo for [`normalize`], keyed on the raw string.
///
/// Normalization is pure, so caching it is only an optimization; the cache is
/// owned explicitly by whoever constructs it rather than living as hidden
/// process-wide state, and it never grows past its capacity. Eviction is
/// least-recently-used, tracked with a monotonic access stamp.
pub struct NormalizeCache {
    capacity: usize,
    entries: HashMap<String, (String, u64)>,
    clock: u64,
}

impl NormalizeCache {
    /// A zero capacity yields a cache that computes every time.
    pub fn new(capacity: usize) -> Self {
        NormalizeCache {
            capacity,
            entries: HashMap::with_capacity(capacity.min(1024)),
            clock: 0,
        }
    }

    /// The canonical key for `raw`, computed at most once while resident.
    pub fn canonical(&mut self, raw: &str) -> String {
        if self.capacity == 0 {
            return normalize(raw);
        }

        self.clock += 1;
        if let Some((canonical, stamp)) = self.entries.get_mut(raw) {
            *stamp = self.clock;
            return canonical.clone();
        }

        let canonical = normalize(raw);
        if self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.entries
            .insert(raw.to_string(), (canonical.clone(), self.clock));
        canonical
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, (_, stamp))| *stamp)
            .map(|(raw, _)| raw.clone());
        if let Some(raw) = oldest {
            self.entries.remove(&raw);
        }
    }
}
