//! Result 别名

use crate::AppError;

/// handler 和业务逻辑通用的 Result 别名
pub type AppResult<T> = Result<T, AppError>;
