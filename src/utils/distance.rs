use crate::constants::EARTH_RADIUS_MILES;
use crate::models::Coordinates;

/// Great-circle distance in miles between two points given in decimal degrees.
///
/// Inputs are not range checked. Identical points yield exactly `0.0`.
pub fn distance_miles(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

pub fn distance_between(from: Coordinates, to: Coordinates) -> f64 {
    distance_miles(from.lat, from.lng, to.lat, to.lng)
}
