//! Address-to-coordinate resolution against the GSI address search API.
//!
//! [`Geocoder::resolve`] is the only entry point the pipeline uses. It
//!
//! 1. answers from the [`GeocodeCache`] when the `municipality|address` key is known,
//!    without touching the network or sleeping;
//! 2. otherwise tries the bare address, then the municipality-qualified address,
//!    stopping at the first [`LookupOutcome::Resolved`];
//! 3. caches the outcome, negative results included, and sleeps for the throttle
//!    interval once per uncached call.
//!
//! Transport, timeout, and response-shape problems surface as
//! [`LookupOutcome::TransientError`] and only ever advance the fallback loop.

use crate::config::{GEOCODE_THROTTLE_MS, GEOCODE_TIMEOUT_SECS};
use crate::models::Coordinates;
use crate::stats::GeocodeStats;
use anyhow::{Context, Result};
use reqwest::Client;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};

/// Result of a single query against the endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Resolved(Coordinates),
    NotFound,
    TransientError(String),
}

/// One HTTP round trip for one query string.
#[allow(async_fn_in_trait)]
pub trait AddressSearch {
    async fn search(&self, query: &str) -> LookupOutcome;
}

pub struct GsiAddressSearch {
    client: Client,
    endpoint: String,
}

impl GsiAddressSearch {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, Duration::from_secs(GEOCODE_TIMEOUT_SECS))
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ems-seed/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl AddressSearch for GsiAddressSearch {
    async fn search(&self, query: &str) -> LookupOutcome {
        let response = match self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(r) => r,
            Err(e) => return LookupOutcome::TransientError(e.to_string()),
        };

        match response.json::<Value>().await {
            Ok(body) => interpret_response(&body),
            Err(e) => LookupOutcome::TransientError(format!("invalid JSON: {e}")),
        }
    }
}

/// Reads `[lon, lat]` from `body[0].geometry.coordinates`.
pub fn interpret_response(body: &Value) -> LookupOutcome {
    let Some(features) = body.as_array() else {
        return LookupOutcome::TransientError("expected a JSON array".to_string());
    };
    let Some(first) = features.first() else {
        return LookupOutcome::NotFound;
    };

    let coordinates = first
        .pointer("/geometry/coordinates")
        .and_then(Value::as_array)
        .map(Vec::as_slice);

    match coordinates {
        Some([lon, lat]) => match (number(lon), number(lat)) {
            (Some(lon), Some(lat)) => LookupOutcome::Resolved(Coordinates::new(lat, lon)),
            _ => LookupOutcome::TransientError("non-numeric coordinates".to_string()),
        },
        _ => LookupOutcome::TransientError("missing geometry.coordinates pair".to_string()),
    }
}

/// Finite numbers only; `NaN` and `inf` would render as invalid SQL literals.
fn number(v: &Value) -> Option<f64> {
    v.as_f64()
        .or_else(|| v.as_str()?.trim().parse().ok())
        .filter(|f: &f64| f.is_finite())
}

/// Queries in the order they are attempted.
pub fn fallback_queries(address: &str, municipality: &str) -> [String; 2] {
    [address.to_string(), format!("{municipality}{address}")]
}

/// Process-scoped lookup cache, keyed by `municipality|address`.
///
/// `None` values are negative results: the address was tried and nothing resolved.
#[derive(Debug, Default)]
pub struct GeocodeCache {
    entries: FxHashMap<String, Option<Coordinates>>,
}

impl GeocodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(municipality: &str, address: &str) -> String {
        format!("{municipality}|{address}")
    }

    pub fn get(&self, municipality: &str, address: &str) -> Option<Option<Coordinates>> {
        self.entries.get(&Self::key(municipality, address)).copied()
    }

    pub fn insert(&mut self, municipality: &str, address: &str, value: Option<Coordinates>) {
        self.entries.insert(Self::key(municipality, address), value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct Geocoder<S> {
    search: S,
    cache: GeocodeCache,
    throttle: Duration,
    stats: GeocodeStats,
}

impl<S: AddressSearch> Geocoder<S> {
    pub fn new(search: S, cache: GeocodeCache) -> Self {
        Self {
            search,
            cache,
            throttle: Duration::from_millis(GEOCODE_THROTTLE_MS),
            stats: GeocodeStats::new(),
        }
    }

    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    pub async fn resolve(&mut self, address: &str, municipality: &str) -> Option<Coordinates> {
        self.stats.lookups += 1;

        if let Some(cached) = self.cache.get(municipality, address) {
            self.stats.cache_hits += 1;
            trace!(municipality, address, "Geocode cache hit");
            return cached;
        }

        let result = self.query_with_fallback(address, municipality).await;
        match result {
            Some(_) => self.stats.resolved += 1,
            None => {
                self.stats.unresolved += 1;
                debug!(municipality, address, "No geocoding result");
            }
        }

        self.cache.insert(municipality, address, result);
        if !self.throttle.is_zero() {
            tokio::time::sleep(self.throttle).await;
        }
        result
    }

    async fn query_with_fallback(&mut self, address: &str, municipality: &str) -> Option<Coordinates> {
        for query in fallback_queries(address, municipality) {
            self.stats.queries_issued += 1;
            match self.search.search(&query).await {
                LookupOutcome::Resolved(coordinates) => return Some(coordinates),
                LookupOutcome::NotFound => trace!(query = %query, "Query returned no features"),
                LookupOutcome::TransientError(error) => {
                    self.stats.transient_errors += 1;
                    debug!(query = %query, error = %error, "Geocoding query failed");
                }
            }
        }
        None
    }

    pub fn stats(&self) -> &GeocodeStats {
        &self.stats
    }

    pub fn cache(&self) -> &GeocodeCache {
        &self.cache
    }

    pub fn into_cache(self) -> GeocodeCache {
        self.cache
    }
}
