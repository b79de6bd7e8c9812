use std::time::Duration;

use tower_http::cors::{Any, CorsLayer};

/// The web client is served from another origin (and from preview deploys),
/// so every origin is accepted. Auth travels in the `Authorization` header,
/// never in cookies.
pub fn permissive_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any)
        .max_age(Duration::from_secs(3600))
}
