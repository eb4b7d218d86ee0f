//! HTTP API for the Quartermaster ledger.

pub mod auth_routes;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod interceptor;
pub mod ledger_routes;
pub mod state;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::storage::LedgerStore;

pub use error::ApiError;
pub use interceptor::require_principal;
pub use state::AppState;

/// Assemble the full router: public routes, bearer-protected `/api` routes,
/// CORS for the given origins, and request tracing.
pub fn build_router<S: LedgerStore>(state: AppState<S>, cors_origins: &[String]) -> Router {
    let protected = Router::new()
        .route("/auth/register", post(auth_routes::register::<S>))
        .route("/auth/me", get(auth_routes::me))
        .route(
            "/assets",
            get(ledger_routes::list_assets::<S>).post(ledger_routes::create_asset::<S>),
        )
        .route(
            "/purchases",
            get(ledger_routes::list_purchases::<S>).post(ledger_routes::create_purchase::<S>),
        )
        .route(
            "/transfers",
            get(ledger_routes::list_transfers::<S>).post(ledger_routes::create_transfer::<S>),
        )
        .route(
            "/assignments",
            get(ledger_routes::list_assignments::<S>)
                .post(ledger_routes::create_assignment::<S>),
        )
        .route("/dashboard", get(dashboard::dashboard::<S>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_principal::<S>,
        ));

    let api = Router::new()
        .route("/auth/login", post(auth_routes::login::<S>))
        .merge(protected);

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);
    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(allowed)
}
