//! Health API 模块
//!
//! 基础检查开放给负载均衡探针，详细检查走全局认证中间件。

use std::sync::OnceLock;
use std::time::Instant;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

// 进程内首次构建路由的时刻，作为 uptime 起点
static STARTED: OnceLock<Instant> = OnceLock::new();

pub fn router() -> Router<ServerState> {
    STARTED.get_or_init(Instant::now);
    Router::new().nest("/api/health", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(health))
        .route("/detailed", get(detailed_health))
}

fn uptime_seconds() -> u64 {
    STARTED.get_or_init(Instant::now).elapsed().as_secs()
}

/// 基础健康检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    /// healthy | degraded
    status: &'static str,
    version: &'static str,
}

/// 详细健康检查响应，带各组件探测结果
#[derive(Serialize)]
pub struct DetailedHealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_seconds: u64,
    checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    database: CheckResult,
}

/// 单项组件探测结果
#[derive(Serialize)]
pub struct CheckResult {
    /// ok | error
    status: &'static str,
    latency_ms: Option<u64>,
    message: Option<String>,
}

/// 基础健康检查，不触碰任何依赖
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// 详细健康检查：探测数据库连通性并统计延迟
pub async fn detailed_health(State(state): State<ServerState>) -> Json<DetailedHealthResponse> {
    let probe = Instant::now();
    let database = match state.get_db().query("RETURN 1").await {
        Ok(_) => CheckResult {
            status: "ok",
            latency_ms: Some(probe.elapsed().as_millis() as u64),
            message: None,
        },
        Err(e) => CheckResult {
            status: "error",
            latency_ms: None,
            message: Some(format!("Database error: {}", e)),
        },
    };

    let healthy = database.status == "ok";
    Json(DetailedHealthResponse {
        status: if healthy { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: uptime_seconds(),
        checks: HealthChecks { database },
    })
}
