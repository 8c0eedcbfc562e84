use serde::{Deserialize, Serialize};

use super::{Coordinates, Identifier};

/// Active predicates for a feed request. `None` / empty means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub max_distance: Option<f64>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub saved_only: bool,
    pub created_by: Option<Identifier>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Raw filter inputs exactly as typed into the filter panel.
///
/// Every value is kept as a string so that malformed input degrades to
/// "no constraint" instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub max_distance: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub saved_only: Option<String>,
    pub created_by: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
}

impl FilterParams {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            min_price: parse_constraint(self.min_price.as_deref()),
            max_price: parse_constraint(self.max_price.as_deref()),
            max_distance: parse_constraint(self.max_distance.as_deref()),
            category: non_blank(self.category.as_deref()),
            tags: parse_tags(self.tags.as_deref()),
            saved_only: parse_flag(self.saved_only.as_deref()),
            created_by: non_blank(self.created_by.as_deref()).map(|v| Identifier::from(v.as_str())),
        }
    }

    pub fn reference_location(&self) -> Option<Coordinates> {
        parse_location(self.lat.as_deref(), self.lng.as_deref())
    }
}

/// Optional reference location on endpoints that only annotate distance.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

impl LocationQuery {
    pub fn location(&self) -> Option<Coordinates> {
        parse_location(self.lat.as_deref(), self.lng.as_deref())
    }
}

/// Parses a numeric bound. Unparseable, non-finite and negative values yield `None`.
pub fn parse_constraint(raw: Option<&str>) -> Option<f64> {
    let value: f64 = raw?.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

pub fn parse_location(lat: Option<&str>, lng: Option<&str>) -> Option<Coordinates> {
    let lat: f64 = lat?.trim().parse().ok()?;
    let lng: f64 = lng?.trim().parse().ok()?;
    Coordinates::checked(lat, lng)
}

fn parse_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|tags| {
        tags.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "1" | "yes")
    )
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
