use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use tracing::{debug, info};
use validator::Validate;

use super::saved_ids;
use crate::auth::{AppState, BearerToken, CurrentUser};
use crate::constants::{DEAL_CATEGORIES, DEFAULT_HOT_LIMIT, MAX_HOT_LIMIT};
use crate::error::AppResult;
use crate::feed::{annotate_distances, filter_deals, rank_hot};
use crate::models::{
    parse_location, CreateDealRequest, Deal, DealFeedResponse, DealListParams, DealWithDistance,
    FilterParams, HotDealsQuery, LocationQuery, UpdateDealRequest,
};
use crate::utils::distance::distance_between;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/deals", get(list_deals).post(create_deal))
        .route("/deals/hot", get(hot_deals))
        .route(
            "/deals/:id",
            get(get_deal).put(update_deal).delete(delete_deal),
        )
        .route("/categories", get(list_categories))
}

async fn list_deals(
    State(state): State<AppState>,
    token: BearerToken,
    Query(list_params): Query<DealListParams>,
    Query(filter_params): Query<FilterParams>,
) -> AppResult<Json<DealFeedResponse>> {
    let criteria = filter_params.criteria();
    let user_location = filter_params.reference_location();

    let (deals, saved) = futures::try_join!(
        state.backend.list_deals(&list_params, token.as_deref()),
        saved_ids(&state, &token, criteria.saved_only)
    )?;

    let filtered = filter_deals(&deals, user_location, &criteria, &saved);
    debug!(
        "Feed: {} of {} deals match {:?}",
        filtered.len(),
        deals.len(),
        criteria
    );

    Ok(Json(DealFeedResponse {
        total: filtered.len(),
        deals: filtered,
        location_known: user_location.is_some(),
        distance_filter_active: criteria.max_distance.is_some() && user_location.is_some(),
    }))
}

async fn hot_deals(
    State(state): State<AppState>,
    token: BearerToken,
    Query(query): Query<HotDealsQuery>,
) -> AppResult<Json<Vec<DealWithDistance>>> {
    let limit = query.limit.unwrap_or(DEFAULT_HOT_LIMIT).min(MAX_HOT_LIMIT);
    let user_location = parse_location(query.lat.as_deref(), query.lng.as_deref());

    let deals = state
        .backend
        .list_deals(&DealListParams::default(), token.as_deref())
        .await?;
    let annotated = annotate_distances(&deals, user_location);

    Ok(Json(rank_hot(annotated, limit, Utc::now())))
}

async fn get_deal(
    State(state): State<AppState>,
    token: BearerToken,
    Path(id): Path<String>,
    Query(location): Query<LocationQuery>,
) -> AppResult<Json<DealWithDistance>> {
    let deal = state.backend.get_deal(&id, token.as_deref()).await?;
    let distance = match (location.location(), deal.coordinates) {
        (Some(origin), Some(target)) => distance_between(origin, target),
        _ => 0.0,
    };

    Ok(Json(DealWithDistance::new(deal, distance)))
}

async fn create_deal(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(mut req): Json<CreateDealRequest>,
) -> AppResult<(StatusCode, Json<Deal>)> {
    req.validate()?;
    req.normalize();

    if req.coordinates.is_none() && !req.address.is_empty() {
        req.coordinates = state.geocoder.geocode(&req.address).await;
        if req.coordinates.is_none() {
            debug!("No coordinates found for {:?}", req.address);
        }
    }

    let deal = state
        .backend
        .create_deal(&req, Some(&current_user.token))
        .await?;
    info!("Created deal {}", deal.id);

    Ok((StatusCode::CREATED, Json(deal)))
}

async fn update_deal(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(mut req): Json<UpdateDealRequest>,
) -> AppResult<Json<Deal>> {
    req.validate()?;
    req.normalize();

    if req.coordinates.is_none() {
        if let Some(address) = req.address.as_deref().filter(|a| !a.is_empty()) {
            req.coordinates = state.geocoder.geocode(address).await;
        }
    }

    let deal = state
        .backend
        .update_deal(&id, &req, Some(&current_user.token))
        .await?;

    Ok(Json(deal))
}

async fn delete_deal(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state
        .backend
        .delete_deal(&id, Some(&current_user.token))
        .await?;
    info!("Deleted deal {}", id);

    Ok(StatusCode::NO_CONTENT)
}

async fn list_categories() -> Json<Vec<&'static str>> {
    Json(DEAL_CATEGORIES.to_vec())
}

#[cfg(test)]
mod tests {
    use crate::models::Coordinates;
    use crate::test_utils::{bearer_header, create_plain_test_server, create_test_server, StaticGeocoder};
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use wiremock::matchers::{body_partial_json, header, method, path};
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

    fn sample_deals() -> Value {
        json!([
            { "id": 1, "title": "Wings", "discounted_price": 6, "original_price": 12,
              "latitude": 29.6535, "longitude": -82.3388, "categories": ["restaurant/bar"],
              "tags": ["Happy Hour"], "upvotes": 1 },
            { "id": 2, "title": "Shoes", "discounted_price": 40,
              "geom": { "lat": 40.7128, "lng": -74.0060 }, "categories": ["retail"], "upvotes": 5 },
            { "id": 3, "title": "Bread", "discounted_price": "3.50", "categories": ["Grocery"] }
        ])
    }

    #[tokio::test]
    async fn test_feed_without_filters_returns_everything() {
        let backend = backend_with_deals(sample_deals()).await;
        let server = create_plain_test_server(&backend.uri());

        let response = server.get("/api/v1/deals").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["total"], 3);
        assert_eq!(body["locationKnown"], false);
        assert_eq!(body["distanceFilterActive"], false);
        assert_eq!(body["deals"][0]["distance"], 0.0);
        assert_eq!(body["deals"][0]["savings_percent"], 50);
    }

    #[tokio::test]
    async fn test_feed_survives_unreadable_geometry_and_rows() {
        let backend = backend_with_deals(json!([
            { "id": 1, "title": "Wings", "discounted_price": 6, "geom": "0101000020E6100000" },
            { "id": 2, "title": "Shoes", "discounted_price": 40,
              "geom": { "lat": "40.7128", "lng": "-74.0060" } },
            { "id": 3, "title": "Bread", "discounted_price": "3.50" },
            { "id": 4, "title": "Broken" }
        ]))
        .await;
        let server = create_plain_test_server(&backend.uri());

        let response = server.get("/api/v1/deals").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["total"], 3);
        assert_eq!(body["deals"][0]["coordinates"], Value::Null);
        assert_eq!(body["deals"][1]["coordinates"]["lat"], 40.7128);
    }

    #[tokio::test]
    async fn test_feed_applies_filters_with_location() {
        let backend = backend_with_deals(sample_deals()).await;
        let server = create_plain_test_server(&backend.uri());

        let response = server
            .get("/api/v1/deals")
            .add_query_param("lat", "29.6535")
            .add_query_param("lng", "-82.3388")
            .add_query_param("maxDistance", "5")
            .add_query_param("tags", "happy hour")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["total"], 1);
        assert_eq!(body["deals"][0]["id"], 1);
        assert_eq!(body["locationKnown"], true);
        assert_eq!(body["distanceFilterActive"], true);
    }

    #[tokio::test]
    async fn test_feed_category_is_case_insensitive_and_bad_numbers_ignored() {
        let backend = backend_with_deals(sample_deals()).await;
        let server = create_plain_test_server(&backend.uri());

        let response = server
            .get("/api/v1/deals")
            .add_query_param("category", "grocery")
            .add_query_param("minPrice", "cheap")
            .await;

        let body: Value = response.json();
        assert_eq!(body["total"], 1);
        assert_eq!(body["deals"][0]["id"], 3);
    }

    #[tokio::test]
    async fn test_feed_saved_only_uses_saved_deals() {
        let backend = backend_with_deals(sample_deals()).await;
        Mock::given(method("GET"))
            .and(path("/saved-deals"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "id": "2", "title": "Shoes", "discounted_price": 40 }]
            })))
            .expect(1)
            .mount(&backend)
            .await;
        let server = create_plain_test_server(&backend.uri());
        let (name, value) = bearer_header();

        let response = server
            .get("/api/v1/deals")
            .add_query_param("savedOnly", "true")
            .add_header(name, value)
            .await;

        let body: Value = response.json();
        assert_eq!(body["total"], 1);
        assert_eq!(body["deals"][0]["id"], 2);
    }

    #[tokio::test]
    async fn test_feed_backend_failure_is_bad_gateway() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/deals"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
            .mount(&backend)
            .await;
        let server = create_plain_test_server(&backend.uri());

        let response = server.get("/api/v1/deals").await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        let body: Value = response.json();
        assert_eq!(body["detail"], "Backend request failed");
    }

    #[tokio::test]
    async fn test_hot_deals_ranked_and_limited() {
        let backend = backend_with_deals(sample_deals()).await;
        let server = create_plain_test_server(&backend.uri());

        let response = server
            .get("/api/v1/deals/hot")
            .add_query_param("limit", "2")
            .await;

        response.assert_status_ok();
        let body: Vec<Value> = response.json();
        let ids: Vec<i64> = body.iter().filter_map(|d| d["id"].as_i64()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_get_deal_with_distance() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/deals/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 2, "title": "Shoes", "discounted_price": 40, "latitude": 40.7589, "longitude": -73.9851
            })))
            .mount(&backend)
            .await;
        let server = create_plain_test_server(&backend.uri());

        let response = server
            .get("/api/v1/deals/2")
            .add_query_param("lat", "40.7128")
            .add_query_param("lng", "-74.0060")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        let distance = body["distance"].as_f64().unwrap();
        assert!((distance - 3.37).abs() <= 0.05, "got {}", distance);
    }

    #[tokio::test]
    async fn test_get_missing_deal_is_not_found() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/deals/404"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({ "statusCode": 404, "message": "Deal not found" })),
            )
            .mount(&backend)
            .await;
        let server = create_plain_test_server(&backend.uri());

        let response = server.get("/api/v1/deals/404").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["detail"], "Deal not found");
    }

    #[tokio::test]
    async fn test_create_deal_requires_token() {
        let backend = MockServer::start().await;
        let server = create_plain_test_server(&backend.uri());

        let response = server
            .post("/api/v1/deals")
            .json(&json!({ "title": "x", "discounted_price": 1 }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_deal_rejects_invalid_input() {
        let backend = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&backend)
            .await;
        let server = create_plain_test_server(&backend.uri());
        let (name, value) = bearer_header();

        let response = server
            .post("/api/v1/deals")
            .add_header(name, value)
            .json(&json!({ "title": "   ", "discounted_price": -2 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.contains("title") && detail.contains("discounted_price"), "{}", detail);
    }

    #[tokio::test]
    async fn test_create_deal_normalizes_and_geocodes() {
        let backend = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/deals"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_partial_json(json!({
                "title": "Tacos",
                "categories": ["restaurant/bar"],
                "tags": ["Taco Tuesday"],
                "geom": { "lat": 29.65, "lng": -82.35 }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 11, "title": "Tacos", "discounted_price": 2,
                "geom": { "lat": 29.65, "lng": -82.35 }
            })))
            .expect(1)
            .mount(&backend)
            .await;
        let geocoder = Arc::new(StaticGeocoder::new(&[(
            "1 Stadium Rd",
            Coordinates::new(29.65, -82.35),
        )]));
        let server = create_test_server(&backend.uri(), geocoder.clone());
        let (name, value) = bearer_header();

        let response = server
            .post("/api/v1/deals")
            .add_header(name, value)
            .json(&json!({
                "title": " Tacos ",
                "discounted_price": 2,
                "address": "1 Stadium Rd",
                "categories": ["Restaurant/Bar"],
                "tags": ["Taco Tuesday", "taco tuesday"]
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["id"], 11);
        assert_eq!(geocoder.calls(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_forward() {
        let backend = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/deals/5"))
            .and(body_partial_json(json!({ "discounted_price": 4.5, "categories": ["retail"] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 5, "title": "Socks", "discounted_price": 4.5, "categories": ["retail"]
            })))
            .expect(1)
            .mount(&backend)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/deals/5"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&backend)
            .await;
        let server = create_plain_test_server(&backend.uri());

        let (name, value) = bearer_header();
        let updated = server
            .put("/api/v1/deals/5")
            .add_header(name, value)
            .json(&json!({ "discounted_price": 4.5, "categories": ["RETAIL"] }))
            .await;
        updated.assert_status_ok();

        let (name, value) = bearer_header();
        let deleted = server.delete("/api/v1/deals/5").add_header(name, value).await;
        deleted.assert_status(StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_categories() {
        let backend = MockServer::start().await;
        let server = create_plain_test_server(&backend.uri());

        let body: Vec<String> = server.get("/api/v1/categories").await.json();

        assert_eq!(body, vec!["restaurant/bar", "retail", "grocery"]);
    }
}
