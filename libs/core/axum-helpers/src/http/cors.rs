use axum::http::{HeaderValue, Method, header};
use core_config::server::ServerConfig;
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
    Method::OPTIONS,
];

/// Creates the CORS layer for the configured origins.
///
/// A `*` entry allows any origin (credentials are then disabled, as browsers
/// require). Otherwise the listed origins are allowed with credentials.
///
/// # Errors
/// Returns `InvalidInput` if an origin is not a valid header value.
pub fn create_cors_layer(config: &ServerConfig) -> io::Result<CorsLayer> {
    let base = CorsLayer::new()
        .allow_methods(ALLOWED_METHODS)
        .max_age(Duration::from_secs(3600));

    if config.allows_any_origin() {
        info!("CORS configured to allow any origin");
        return Ok(base.allow_origin(Any).allow_headers(Any));
    }

    let origins = config
        .cors_allowed_origins
        .iter()
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    info!(origins = ?config.cors_allowed_origins, "CORS configured with allowed origins");

    Ok(base
        .allow_origin(AllowOrigin::list(origins))
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .allow_credentials(true))
}
