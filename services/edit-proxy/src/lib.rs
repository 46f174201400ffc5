pub mod config;
pub mod error;
pub mod provider;
pub mod provider_xai;
pub mod routes_health;
pub mod routes_image;
pub mod routes_video;
pub mod state;
pub mod trace;
pub mod types;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use edit_protocol::{EDIT_IMAGE_PATH, EDIT_VIDEO_PATH, HEALTH_PATH};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};

pub use config::AppConfig;
pub use state::{AppState, SharedState};

pub fn app(state: SharedState) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(routes_health::health))
        .route(EDIT_IMAGE_PATH, post(routes_image::edit_image))
        .route(
            EDIT_VIDEO_PATH,
            post(routes_video::submit_video_edit).get(routes_video::video_status),
        )
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(middleware::from_fn(trace::request_trace))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
