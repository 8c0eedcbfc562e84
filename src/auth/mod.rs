mod extractors;

pub use extractors::{AppState, BearerToken, CurrentUser};
