use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::hash::{Hash, Hasher};
use validator::{Validate, ValidationError};

use crate::feed::savings_percent;

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns `None` unless both values are finite and inside the valid lat/lng range.
    pub fn checked(lat: f64, lng: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);

        valid.then(|| Self::new(lat, lng))
    }

    pub fn is_valid(&self) -> bool {
        Self::checked(self.lat, self.lng).is_some()
    }
}

/// Deal and user identifiers arrive as integers or strings depending on the backend revision.
/// Two identifiers are equal when their textual forms match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Numeric(i64),
    Text(String),
}

impl Identifier {
    pub fn as_key(&self) -> String {
        match self {
            Identifier::Numeric(n) => n.to_string(),
            Identifier::Text(s) => s.trim().to_string(),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_key())
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.as_key() == other.as_key()
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_key().hash(state);
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Identifier::Numeric(value)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        match value.trim().parse::<i64>() {
            Ok(n) => Identifier::Numeric(n),
            Err(_) => Identifier::Text(value.to_string()),
        }
    }
}

/// Reads a JSON number or a numeric string.
fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// Postgres numeric columns are frequently serialized as strings.
fn de_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    number_from_value(&value).ok_or_else(|| serde::de::Error::custom("expected a numeric price"))
}

fn de_opt_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

fn de_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let count = number_from_value(&value).unwrap_or(0.0);
    Ok(count.max(0.0).min(u32::MAX as f64) as u32)
}

/// Location payload shapes produced by different backend revisions:
/// `{ lat, lng }` with numbers or numeric strings, or a GeoJSON point
/// `{ coordinates: [lng, lat] }`. Anything else (WKB hex strings included)
/// carries no usable location.
fn geometry_coordinates(value: &Value) -> Option<Coordinates> {
    if let (Some(lat), Some(lng)) = (value.get("lat"), value.get("lng")) {
        return Coordinates::checked(number_from_value(lat)?, number_from_value(lng)?);
    }

    match value.get("coordinates")?.as_array()?.as_slice() {
        [lng, lat] => Coordinates::checked(number_from_value(lat)?, number_from_value(lng)?),
        _ => None,
    }
}

/// Deal record exactly as the backend serves it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDeal {
    pub id: Identifier,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "de_price")]
    pub discounted_price: f64,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub coordinates: Option<Value>,
    #[serde(default)]
    pub geom: Option<Value>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "de_count")]
    pub upvotes: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub downvotes: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub comment_count: u32,
    #[serde(default)]
    pub created_by: Option<Identifier>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default, alias = "updatedAt")]
    pub updated_at: Option<String>,
}

/// Normalized deal. Coordinates are either resolved or absent, never partially present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deal {
    pub id: Identifier,
    pub title: String,
    pub description: String,
    pub discounted_price: f64,
    pub original_price: Option<f64>,
    pub address: String,
    pub coordinates: Option<Coordinates>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub upvotes: u32,
    pub downvotes: u32,
    pub comment_count: u32,
    pub created_by: Option<Identifier>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<RawDeal> for Deal {
    fn from(raw: RawDeal) -> Self {
        let explicit = match (raw.latitude, raw.longitude) {
            (Some(lat), Some(lng)) => Coordinates::checked(lat, lng),
            _ => None,
        };
        let coordinates = explicit
            .or_else(|| raw.coordinates.as_ref().and_then(geometry_coordinates))
            .or_else(|| raw.geom.as_ref().and_then(geometry_coordinates));

        let mut categories = raw.categories.unwrap_or_default();
        if let Some(single) = raw.category {
            if !single.trim().is_empty() && !categories.contains(&single) {
                categories.push(single);
            }
        }

        Deal {
            id: raw.id,
            title: raw.title,
            description: raw.description.unwrap_or_default(),
            discounted_price: raw.discounted_price,
            original_price: raw.original_price,
            address: raw.address.unwrap_or_default(),
            coordinates,
            categories,
            tags: raw.tags.unwrap_or_default(),
            upvotes: raw.upvotes,
            downvotes: raw.downvotes,
            comment_count: raw.comment_count,
            created_by: raw.created_by,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }
}

impl<'de> Deserialize<'de> for Deal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawDeal::deserialize(deserializer).map(Deal::from)
    }
}

impl AsRef<Deal> for Deal {
    fn as_ref(&self) -> &Deal {
        self
    }
}

/// A deal annotated with its distance (miles) from the reference location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DealWithDistance {
    #[serde(flatten)]
    pub deal: Deal,
    pub distance: f64,
    pub savings_percent: u32,
}

impl DealWithDistance {
    pub fn new(deal: Deal, distance: f64) -> Self {
        let savings_percent = savings_percent(deal.original_price, Some(deal.discounted_price));
        Self {
            deal,
            distance,
            savings_percent,
        }
    }
}

impl AsRef<Deal> for DealWithDistance {
    fn as_ref(&self) -> &Deal {
        &self.deal
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn validate_price(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::new("price_not_positive"));
    }
    Ok(())
}

/// Body for creating a deal. Also the payload forwarded to the backend.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDealRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = "validate_price"))]
    pub discounted_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_price"))]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Identifier>,
    #[serde(default, rename = "geom", alias = "coordinates")]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateDealRequest {
    pub fn normalize(&mut self) {
        self.title = self.title.trim().to_string();
        self.address = self.address.trim().to_string();
        self.categories = normalize_categories(std::mem::take(&mut self.categories));
        self.tags = normalize_tags(std::mem::take(&mut self.tags));
        self.coordinates = self.coordinates.filter(Coordinates::is_valid);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateDealRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_not_blank"))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_price"))]
    pub discounted_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_price"))]
    pub original_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(
        default,
        rename = "geom",
        alias = "coordinates",
        skip_serializing_if = "Option::is_none"
    )]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upvotes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downvotes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u32>,
}

impl UpdateDealRequest {
    pub fn normalize(&mut self) {
        if let Some(title) = self.title.as_mut() {
            *title = title.trim().to_string();
        }
        if let Some(address) = self.address.as_mut() {
            *address = address.trim().to_string();
        }
        self.categories = self.categories.take().map(normalize_categories);
        self.tags = self.tags.take().map(normalize_tags);
        self.coordinates = self.coordinates.filter(Coordinates::is_valid);
    }
}

/// Lowercases, trims and de-duplicates categories, dropping empty entries.
pub fn normalize_categories(categories: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(categories.len());
    for category in categories {
        let category = category.trim().to_lowercase();
        if !category.is_empty() && !normalized.contains(&category) {
            normalized.push(category);
        }
    }
    normalized
}

/// Trims tags and drops case-insensitive duplicates, keeping the first spelling.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        let lowered = tag.to_lowercase();
        if !normalized.iter().any(|t| t.to_lowercase() == lowered) {
            normalized.push(tag.to_string());
        }
    }
    normalized
}

/// Pagination and search forwarded to the backend's deal list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealListParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub search: Option<String>,
    pub created_by: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealFeedResponse {
    pub deals: Vec<DealWithDistance>,
    pub total: usize,
    pub location_known: bool,
    pub distance_filter_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct HotDealsQuery {
    pub limit: Option<usize>,
    pub lat: Option<String>,
    pub lng: Option<String>,
}
