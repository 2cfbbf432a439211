//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store wiring and the validator entrypoint
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs that are not domain types
//! - `errors.rs`: error-to-response mapping

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use personnel_infra::StoreSettings;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(settings: &StoreSettings) -> anyhow::Result<Router> {
    let services = AppServices::open(settings).await?;
    Ok(router(Arc::new(services)))
}

/// Router over already-wired services (tests inject an in-memory store here).
pub fn router(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(services)),
        )
}
