use axum::{
    handler::{Handler, HandlerWithoutStateExt},
    http::{header, HeaderValue, Method},
    routing::{get, MethodRouter},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;
pub mod state;

#[cfg(test)]
mod tests;

pub use error::{ApiError, JsonResponse};
pub use state::{AppState, DeploymentInfo, ServerConfig};

/// Paths served by the router, listed by `/api/test` and at startup.
pub const ENDPOINTS: [(&str, &str); 4] = [
    ("/health", "Health check"),
    ("/api", "Mock HR news (optional ?preset=<name>)"),
    ("/api/test", "Test endpoint"),
    ("/api/deployment-diagnostics", "Deployment diagnostics"),
];

/// GET-only route; other methods get a JSON 405. OPTIONS never reaches it,
/// the CORS layer answers preflights.
fn api_route<H, T>(handler: H) -> MethodRouter<Arc<AppState>>
where
    H: Handler<T, Arc<AppState>>,
    T: 'static,
{
    get(handler).fallback(handlers::method_not_allowed)
}

pub async fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let static_dir = state.config.static_dir.clone();

    let router = Router::new()
        .route("/health", api_route(handlers::health))
        .route("/api", api_route(handlers::get_news))
        .route("/api/test", api_route(handlers::api_test))
        .route(
            "/api/deployment-diagnostics",
            api_route(handlers::deployment_diagnostics),
        );

    let router = match static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).not_found_service(handlers::not_found.into_service()),
        ),
        None => router.fallback(handlers::not_found),
    };

    router
        .with_state(Arc::new(state))
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_TYPE,
            HeaderValue::from_static(error::JSON_UTF8),
        ))
        .layer(TraceLayer::new_for_http())
}
