use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::GeocodingConfig;
use crate::models::Coordinates;

/// Forward geocoding: free-text address in, coordinates out.
///
/// Implementations never fail loudly. Any transport or parsing problem is
/// reported as "not found".
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    async fn geocode(&self, address: &str) -> Option<Coordinates>;
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

/// Nominatim `/search` client with a minimum spacing between requests.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    config: GeocodingConfig,
    last_request: tokio::sync::Mutex<Option<Instant>>,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocodingConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
            last_request: tokio::sync::Mutex::new(None),
        })
    }

    async fn throttle(&self) {
        let spacing = Duration::from_secs_f64(self.config.rate_limit_seconds.max(0.0));
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < spacing {
                tokio::time::sleep(spacing - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }
}

#[async_trait]
impl GeocodeProvider for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Option<Coordinates> {
        if !self.config.enabled || address.trim().is_empty() {
            return None;
        }

        self.throttle().await;

        let response = match self
            .client
            .get(&self.config.base_url)
            .query(&[("format", "json"), ("limit", "1"), ("q", address.trim())])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("Geocoding request failed for {:?}: {}", address, e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("Geocoding returned {} for {:?}", response.status(), address);
            return None;
        }

        let hits: Vec<SearchHit> = match response.json().await {
            Ok(h) => h,
            Err(e) => {
                warn!("Geocoding response unreadable for {:?}: {}", address, e);
                return None;
            }
        };

        let hit = hits.first()?;
        let lat = hit.lat.parse().ok()?;
        let lng = hit.lon.parse().ok()?;
        Coordinates::checked(lat, lng)
    }
}

/// Session-lifetime memo of geocoding answers, including misses.
///
/// Bounded by `capacity`: inserting into a full cache clears it first.
pub struct GeocodeCache {
    entries: Mutex<HashMap<String, Option<Coordinates>>>,
    capacity: usize,
}

impl GeocodeCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    fn key(address: &str) -> String {
        address
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// `Some(None)` is a cached miss; `None` means the address was never looked up.
    pub fn get(&self, address: &str) -> Option<Option<Coordinates>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(&Self::key(address)).copied()
    }

    pub fn insert(&self, address: &str, value: Option<Coordinates>) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let key = Self::key(address);

        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            debug!("Geocode cache full ({} entries), clearing", entries.len());
            entries.clear();
        }

        entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

pub struct CachedGeocoder<P> {
    provider: P,
    cache: GeocodeCache,
}

impl<P: GeocodeProvider> CachedGeocoder<P> {
    pub fn new(provider: P, capacity: usize) -> Self {
        Self {
            provider,
            cache: GeocodeCache::new(capacity),
        }
    }

    pub fn cache(&self) -> &GeocodeCache {
        &self.cache
    }
}

#[async_trait]
impl<P: GeocodeProvider> GeocodeProvider for CachedGeocoder<P> {
    async fn geocode(&self, address: &str) -> Option<Coordinates> {
        if address.trim().is_empty() {
            return None;
        }

        if let Some(cached) = self.cache.get(address) {
            return cached;
        }

        let result = self.provider.geocode(address).await;
        self.cache.insert(address, result);
        result
    }
}
