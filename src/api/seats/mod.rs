//! Seat API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/seats", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/available", get(handler::available))
        .route("/assign", post(handler::assign))
        .route("/vacate", post(handler::vacate))
        .route("/sync", post(handler::sync))
        .route("/{seat_id}", get(handler::get_by_id))
}
