use once_cell::sync::Lazy;
use std::path::PathBuf;

pub static DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    std::env::var("DEALDIVE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./data"))
});

pub static CONFIG_PATH: Lazy<PathBuf> = Lazy::new(|| DATA_DIR.join("config.yaml"));

/// Mean Earth radius in miles used by the haversine distance.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Decimal places kept when building a coordinate key (~0.11 m at the equator).
pub const COORDINATE_KEY_PRECISION: usize = 6;

/// Map center used when the user's location is unknown (University of Florida).
pub const DEFAULT_MAP_CENTER: (f64, f64) = (29.6535, -82.3388);
pub const DEFAULT_MAP_ZOOM: u8 = 13;
pub const SEARCH_RESULT_ZOOM: u8 = 14;

/// Category vocabulary offered by the create/edit flow, stored lowercase.
pub const DEAL_CATEGORIES: [&str; 3] = ["restaurant/bar", "retail", "grocery"];

pub const DEFAULT_HOT_LIMIT: usize = 20;
pub const MAX_HOT_LIMIT: usize = 100;
/// Hours added to a deal's age before decay so brand new deals do not divide by ~0.
pub const HOT_AGE_OFFSET_HOURS: f64 = 2.0;
pub const HOT_GRAVITY: f64 = 1.5;
