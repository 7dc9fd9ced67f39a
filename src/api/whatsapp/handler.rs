//! WhatsApp API Handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::services::WhatsAppService;
use crate::services::notification::ReminderReceipt;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReminderRequest {
    pub student_number: String,
    pub student_name: String,
}

#[derive(Debug, Serialize)]
pub struct SendReminderResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: ReminderReceipt,
}

/// POST /api/whatsapp/send-reminder - 发送催费提醒
pub async fn send_reminder(
    State(state): State<ServerState>,
    Json(payload): Json<SendReminderRequest>,
) -> AppResult<Json<SendReminderResponse>> {
    let service = WhatsAppService::new(state.config.whatsapp_sender.clone());
    let receipt = service
        .send_reminder(&payload.student_name, &payload.student_number)
        .await?;

    Ok(Json(SendReminderResponse {
        success: true,
        message: "WhatsApp reminder sent successfully",
        data: receipt,
    }))
}
