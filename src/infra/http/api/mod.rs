pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use state::ApiState;

use axum::{Router, routing::get};

pub fn build_api_router(state: ApiState) -> Router {
    Router::new()
        .route(
            "/api/v1/ad",
            get(handlers::list_advertisements).post(handlers::create_advertisement),
        )
        .with_state(state)
}
