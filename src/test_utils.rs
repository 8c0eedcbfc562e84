#![cfg(test)]

use crate::app::create_app;
use crate::backend::BackendClient;
use crate::config::{BackendConfig, Config};
use crate::models::{Coordinates, Deal, Identifier};
use crate::utils::geocoding::GeocodeProvider;
use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue};
use axum::Router;
use axum_test::TestServer;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const TEST_TOKEN: &str = "test-token";

/// `Authorization: Bearer test-token`, for `TestRequest::add_header`
pub fn bearer_header() -> (HeaderName, HeaderValue) {
    let value = HeaderValue::from_str(&format!("Bearer {}", TEST_TOKEN))
        .expect("test token is a valid header value");
    (AUTHORIZATION, value)
}

/// Test fixture: a deal priced at 10.0 with no location and no engagement
pub fn deal(id: i64) -> Deal {
    Deal {
        id: Identifier::from(id),
        title: format!("Deal {}", id),
        description: String::new(),
        discounted_price: 10.0,
        original_price: None,
        address: String::new(),
        coordinates: None,
        categories: Vec::new(),
        tags: Vec::new(),
        upvotes: 0,
        downvotes: 0,
        comment_count: 0,
        created_by: None,
        created_at: None,
        updated_at: None,
    }
}

pub fn deal_at(id: i64, lat: f64, lng: f64) -> Deal {
    Deal {
        coordinates: Some(Coordinates::new(lat, lng)),
        ..deal(id)
    }
}

pub fn priced_deal(id: i64, price: f64) -> Deal {
    Deal {
        discounted_price: price,
        ..deal(id)
    }
}

/// Geocoder backed by a fixed address table. Counts lookups.
pub struct StaticGeocoder {
    entries: HashMap<String, Coordinates>,
    calls: AtomicUsize,
}

impl StaticGeocoder {
    pub fn new(entries: &[(&str, Coordinates)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(address, coordinates)| (lookup_key(address), *coordinates))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn lookup_key(address: &str) -> String {
    address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[async_trait]
impl GeocodeProvider for StaticGeocoder {
    async fn geocode(&self, address: &str) -> Option<Coordinates> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entries.get(&lookup_key(address)).copied()
    }
}

/// Create a test app whose backend is the given base URL
pub fn create_test_app(backend_url: &str, geocoder: Arc<dyn GeocodeProvider>) -> Router {
    let config = Config {
        backend: BackendConfig {
            base_url: backend_url.to_string(),
            ..BackendConfig::default()
        },
        ..Config::default()
    };
    let backend = BackendClient::new(&config.backend).expect("Failed to create backend client");
    create_app(Arc::new(config), Arc::new(backend), geocoder)
}

pub fn create_test_server(backend_url: &str, geocoder: Arc<dyn GeocodeProvider>) -> TestServer {
    TestServer::new(create_test_app(backend_url, geocoder)).expect("Failed to start test server")
}

/// Test server with a geocoder that knows no addresses
pub fn create_plain_test_server(backend_url: &str) -> TestServer {
    create_test_server(backend_url, Arc::new(StaticGeocoder::new(&[])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures() {
        assert_eq!(deal(1).discounted_price, 10.0);
        assert_eq!(deal_at(2, 1.0, 2.0).coordinates, Some(Coordinates::new(1.0, 2.0)));
        assert_eq!(priced_deal(3, 4.5).discounted_price, 4.5);
    }

    #[tokio::test]
    async fn test_static_geocoder_is_whitespace_and_case_tolerant() {
        let geocoder = StaticGeocoder::new(&[("1 Main St", Coordinates::new(1.0, 1.0))]);

        assert_eq!(geocoder.geocode(" 1  MAIN st").await, Some(Coordinates::new(1.0, 1.0)));
        assert_eq!(geocoder.geocode("2 Main St").await, None);
        assert_eq!(geocoder.calls(), 2);
    }

    #[test]
    fn test_create_test_app() {
        let _app = create_test_app("http://localhost:3001/api", Arc::new(StaticGeocoder::new(&[])));
    }
}
