use std::path::PathBuf;
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::models::{Admin, AdminRole};
use crate::db::repository::AdminRepository;
use crate::seating::SeatAllocator;
use crate::services::HttpService;
use crate::utils::{AppError, AppResult};

/// 服务器状态
///
/// 持有配置、数据库连接和各服务的共享引用，处处按值克隆传递。
/// 内部全是 Arc 或自带共享的句柄，克隆成本可以忽略。
///
/// handler 里通过 `State(state)` 提取，拿到后用 `state.get_db()` 等
/// 访问器取具体资源。
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 启动时定型的配置，之后只读
    pub config: Config,
    /// 嵌入式 SurrealDB 连接
    pub db: Surreal<Db>,
    /// HTTP 服务
    pub http: HttpService,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 手动构造，一般用 [`ServerState::initialize`]
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        http: HttpService,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            config,
            db,
            http,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 依次：建工作目录、开库 (work_dir/database/library.db)、
    /// 构建 HTTP/JWT 服务、引导初始数据 (90 个座位和种子管理员)，
    /// 最后把路由挂到 HTTP 服务上。
    ///
    /// # Panics
    ///
    /// 目录创建、数据库或初始数据引导失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        // 开库
        let db_path = config.database_dir().join("library.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        // 服务
        let http = HttpService::new(config.clone());
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let state = Self::new(config.clone(), db_service.db, http.clone(), jwt_service);

        // 初始数据
        state
            .bootstrap_data()
            .await
            .expect("Failed to bootstrap initial data");

        // 路由需要 state，放在最后挂载
        http.initialize(state.clone());

        state
    }

    /// 初始数据引导
    ///
    /// 空库时铺满 90 个座位并创建种子管理员。重复启动安全。
    async fn bootstrap_data(&self) -> AppResult<()> {
        let allocator = SeatAllocator::new(self.get_db());
        allocator.ensure_initialized().await?;

        self.seed_admin().await?;
        Ok(())
    }

    /// 创建种子管理员
    ///
    /// 只在 admin 表为空时执行，账号信息来自 ADMIN_* 环境变量。
    async fn seed_admin(&self) -> AppResult<()> {
        let repo = AdminRepository::new(self.get_db());
        if repo.count().await? > 0 {
            return Ok(());
        }

        if self.config.admin_password == crate::core::config::DEFAULT_ADMIN_PASSWORD {
            tracing::warn!(
                "⚠️  ADMIN_PASSWORD not set, seeding admin with the default password. \
                 Change it before going to production!"
            );
        }

        let password = Admin::hash_password(&self.config.admin_password)
            .map_err(|e| AppError::internal(format!("Failed to hash admin password: {}", e)))?;

        let admin = Admin {
            id: None,
            name: self.config.admin_name.clone(),
            email: self.config.admin_email.clone(),
            password,
            role: AdminRole::SuperAdmin,
            is_active: true,
        };
        repo.create(&admin).await?;

        tracing::info!(email = %self.config.admin_email, "Seed admin account created");
        Ok(())
    }

    /// 数据库连接 (克隆即可并发使用)
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 工作目录
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    /// JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
