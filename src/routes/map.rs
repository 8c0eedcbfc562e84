use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::debug;

use super::saved_ids;
use crate::auth::{AppState, BearerToken};
use crate::constants::SEARCH_RESULT_ZOOM;
use crate::error::{AppError, AppResult};
use crate::feed::{filter_deals, marker_groups, resolve_coordinates};
use crate::models::{
    Coordinates, DealListParams, FilterParams, GeocodeQuery, GeocodeResponse, MapMarkersResponse,
    MarkerGroupResponse,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/map/markers", get(get_markers))
        .route("/geocode", get(geocode))
}

async fn get_markers(
    State(state): State<AppState>,
    token: BearerToken,
    Query(filter_params): Query<FilterParams>,
) -> AppResult<Json<MapMarkersResponse>> {
    let criteria = filter_params.criteria();
    let user_location = filter_params.reference_location();

    let list_params = DealListParams::default();
    let (deals, saved) = futures::try_join!(
        state.backend.list_deals(&list_params, token.as_deref()),
        saved_ids(&state, &token, criteria.saved_only)
    )?;

    let resolved = resolve_coordinates(deals, state.geocoder.as_ref()).await;
    let filtered = filter_deals(&resolved.deals, user_location, &criteria, &saved);

    let groups: Vec<MarkerGroupResponse> = marker_groups(&filtered)
        .into_iter()
        .map(|group| MarkerGroupResponse {
            count: group.count(),
            lat: group.position.lat,
            lng: group.position.lng,
            key: group.key,
            deals: group.deals,
        })
        .collect();
    debug!(
        "Map: {} deals in {} markers, {} unresolved",
        filtered.len(),
        groups.len(),
        resolved.unresolved
    );

    let map = &state.config.map;
    let center = user_location.unwrap_or(Coordinates::new(map.default_lat, map.default_lng));

    Ok(Json(MapMarkersResponse {
        center,
        zoom: map.default_zoom,
        location_known: user_location.is_some(),
        groups,
        total_count: filtered.len(),
        unresolved_count: resolved.unresolved,
    }))
}

async fn geocode(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> AppResult<Json<GeocodeResponse>> {
    let address = query
        .address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| AppError::BadRequest("address is required".to_string()))?;

    let coordinates = state
        .geocoder
        .geocode(address)
        .await
        .ok_or_else(|| AppError::NotFound("Location not found".to_string()))?;

    Ok(Json(GeocodeResponse {
        lat: coordinates.lat,
        lng: coordinates.lng,
        zoom: SEARCH_RESULT_ZOOM,
    }))
}

#[cfg(test)]
mod tests {
    use crate::models::Coordinates;
    use crate::test_utils::{create_plain_test_server, create_test_server, StaticGeocoder};
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn backend_with_deals(deals: Value) -> MockServer {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/deals"))
            .respond_with(ResponseTemplate::new(200).set_body_json(deals))
            .mount(&backend)
            .await;
        backend
    }

    #[tokio::test]
    async fn test_markers_group_shared_locations() {
        let backend = backend_with_deals(json!([
            { "id": 1, "title": "a", "discounted_price": 1, "latitude": 29.6535, "longitude": -82.3388 },
            { "id": 2, "title": "b", "discounted_price": 2, "address": "1 Stadium Rd" },
            { "id": 3, "title": "c", "discounted_price": 3, "geom": { "lat": 29.65350001, "lng": -82.3388 } },
            { "id": 4, "title": "d", "discounted_price": 4, "address": "Nowhere" }
        ]))
        .await;
        let geocoder = Arc::new(StaticGeocoder::new(&[(
            "1 Stadium Rd",
            Coordinates::new(29.6499, -82.3486),
        )]));
        let server = create_test_server(&backend.uri(), geocoder);

        let response = server.get("/api/v1/map/markers").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["center"], json!({ "lat": 29.6535, "lng": -82.3388 }));
        assert_eq!(body["zoom"], 13);
        assert_eq!(body["locationKnown"], false);
        assert_eq!(body["totalCount"], 3);
        assert_eq!(body["unresolvedCount"], 1);

        let groups = body["groups"].as_array().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0]["key"], "29.653500,-82.338800");
        assert_eq!(groups[0]["count"], 2);
        assert_eq!(groups[0]["deals"][1]["id"], 3);
        assert_eq!(groups[1]["count"], 1);
        assert_eq!(groups[1]["deals"][0]["id"], 2);
    }

    #[tokio::test]
    async fn test_markers_center_on_user_and_filter_distance() {
        let backend = backend_with_deals(json!([
            { "id": 1, "title": "near", "discounted_price": 1, "latitude": 40.7589, "longitude": -73.9851 },
            { "id": 2, "title": "far", "discounted_price": 1, "latitude": 29.6535, "longitude": -82.3388 }
        ]))
        .await;
        let server = create_plain_test_server(&backend.uri());

        let response = server
            .get("/api/v1/map/markers")
            .add_query_param("lat", "40.7128")
            .add_query_param("lng", "-74.0060")
            .add_query_param("maxDistance", "10")
            .await;

        let body: Value = response.json();
        assert_eq!(body["center"], json!({ "lat": 40.7128, "lng": -74.0060 }));
        assert_eq!(body["locationKnown"], true);
        assert_eq!(body["totalCount"], 1);
        assert_eq!(body["groups"][0]["deals"][0]["id"], 1);
    }

    #[tokio::test]
    async fn test_geocode_found_and_missing() {
        let backend = MockServer::start().await;
        let geocoder = Arc::new(StaticGeocoder::new(&[(
            "Gainesville, FL",
            Coordinates::new(29.6516, -82.3248),
        )]));
        let server = create_test_server(&backend.uri(), geocoder);

        let found = server
            .get("/api/v1/geocode")
            .add_query_param("address", "gainesville, fl")
            .await;
        found.assert_status_ok();
        let body: Value = found.json();
        assert_eq!(body, json!({ "lat": 29.6516, "lng": -82.3248, "zoom": 14 }));

        let missing = server
            .get("/api/v1/geocode")
            .add_query_param("address", "Atlantis")
            .await;
        missing.assert_status(StatusCode::NOT_FOUND);
        let body: Value = missing.json();
        assert_eq!(body["detail"], "Location not found");

        let blank = server.get("/api/v1/geocode").await;
        blank.assert_status(StatusCode::BAD_REQUEST);
    }
}
