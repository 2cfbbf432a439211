use axum::Router;

pub mod employees;
pub mod system;

/// Router for all API endpoints.
pub fn router() -> Router {
    Router::new().nest("/api/employees", employees::router())
}
