pub mod datetime;
pub mod distance;
pub mod geocoding;
