use serde::{Deserialize, Serialize};

use super::{Coordinates, DealWithDistance};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerGroupResponse {
    pub key: String,
    pub lat: f64,
    pub lng: f64,
    pub count: usize,
    pub deals: Vec<DealWithDistance>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarkersResponse {
    pub center: Coordinates,
    pub zoom: u8,
    pub location_known: bool,
    pub groups: Vec<MarkerGroupResponse>,
    pub total_count: usize,
    pub unresolved_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeResponse {
    pub lat: f64,
    pub lng: f64,
    pub zoom: u8,
}
