//! WhatsApp API 模块

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/whatsapp", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/send-reminder", post(handler::send_reminder))
}
