pub mod app;
pub mod auth;
pub mod backend;
pub mod config;
pub mod constants;
pub mod error;
pub mod feed;
pub mod logging;
pub mod models;
pub mod routes;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub const VERSION: &str = "0.1.0";
