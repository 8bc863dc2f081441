use serde::Serialize;

/// Counters collected by the geocoder over one run
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct GeocodeStats {
    pub lookups: u64,
    pub cache_hits: u64,
    pub queries_issued: u64,
    pub transient_errors: u64,
    pub resolved: u64,
    pub unresolved: u64,
}

impl GeocodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookups that went to the network (and were therefore throttled).
    pub fn misses(&self) -> u64 {
        self.lookups - self.cache_hits
    }

    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.lookups as f64
        }
    }
}
