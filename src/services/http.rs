use crate::auth::require_auth;
use crate::core::{Config, ServerState};
use axum::{Router, middleware, routing::get};
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use tower::Service;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

pub type OneshotResult =
    Result<http::Response<axum::body::Body>, Box<dyn std::error::Error + Send + Sync>>;

/// HTTP 请求日志中间件
///
/// 按状态码分级：5xx 记 error，4xx 记 warn，其余记 info。
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let start = std::time::Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(target: "http_access", %request_id, latency_ms, "{} {} {}", method, uri, status);
    } else if status.is_client_error() {
        tracing::warn!(target: "http_access", %request_id, latency_ms, "{} {} {}", method, uri, status);
    } else {
        tracing::info!(target: "http_access", %request_id, latency_ms, "{} {} {}", method, uri, status);
    }

    response
}

/// 根路径探活 (兼容旧版前端的连通性检查)
async fn root() -> &'static str {
    "Library System Backend Running"
}

/// 组装全部业务路由 (未绑定状态)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .route("/", get(root))
        // 基础路由
        .merge(crate::api::admin::router())
        .merge(crate::api::health::router())
        // 业务路由
        .merge(crate::api::seats::router())
        .merge(crate::api::members::router())
        .merge(crate::api::payments::router())
        .merge(crate::api::whatsapp::router())
}

/// HTTP 服务
///
/// 路由在 ServerState 就绪后才构建，构建前的 oneshot 调用会报错。
#[derive(Clone, Debug)]
pub struct HttpService {
    config: Config,
    router: Arc<RwLock<Option<Router>>>,
}

impl HttpService {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            router: Arc::new(RwLock::new(None)),
        }
    }

    /// 用完整初始化的 ServerState 构建并缓存路由
    pub fn initialize(&self, state: ServerState) {
        let app = build_app()
            // 认证在 Router 层统一挂载，require_auth 自己放行公共路由
            .layer(middleware::from_fn_with_state(state.clone(), require_auth))
            .with_state(state)
            .layer(CorsLayer::permissive())
            .layer(CompressionLayer::new())
            // 请求 ID 由最外层 SetRequestIdLayer 生成，日志中间件读取
            .layer(middleware::from_fn(log_request))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

        *self.router.write().expect("Failed to lock router") = Some(app);
    }

    pub fn router(&self) -> Option<Router> {
        self.router.read().expect("Failed to lock router").clone()
    }

    /// 进程内直接调用路由，集成测试不用真的监听端口
    pub async fn oneshot(&self, request: http::Request<axum::body::Body>) -> OneshotResult {
        // 先把路由克隆出来，避免锁守卫跨越 await 点
        let mut service = self
            .router()
            .ok_or_else(|| crate::utils::AppError::internal("HttpService not initialized"))?;

        service
            .call(request)
            .await
            .map_err(|_| crate::utils::AppError::internal("Oneshot call failed").into())
    }

    /// 启动 HTTP 服务器，直到收到关停信号
    pub async fn start_server<F>(&self, shutdown_signal: F) -> Result<(), crate::utils::AppError>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let app = self.router().ok_or_else(|| {
            crate::utils::AppError::internal("HttpService not initialized with router")
        })?;

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("🚀 Starting HTTP server on {}", addr);

        let shutdown_timeout = std::time::Duration::from_millis(self.config.shutdown_timeout_ms);
        let handle = axum_server::Handle::new();

        // 信号到达后进入优雅关停，超时强杀
        let handle_clone = handle.clone();
        tokio::spawn(async move {
            shutdown_signal.await;
            handle_clone.graceful_shutdown(Some(shutdown_timeout));
        });

        axum_server::bind(addr)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .map_err(|e| crate::utils::AppError::internal(format!("Server error: {}", e)))?;

        Ok(())
    }
}
