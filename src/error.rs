//! 统一错误类型定义
//!
//! 使用 `thiserror` 定义档案管理的所有错误类型。二进制入口处
//! 通过 `anyhow` 聚合，库内部全部返回本模块的 [`Result`]。

use std::path::PathBuf;
use thiserror::Error;

/// 档案管理的统一错误类型
#[derive(Error, Debug)]
pub enum ProfileError {
    /// 档案根目录无法创建或读取（任何操作都无法继续）
    #[error("档案仓库不可用: {}: {source}", path.display())]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 档案名称与现有档案重复（大小写不敏感），可更换名称后重试
    #[error("档案名称已存在: {0}")]
    DuplicateName(String),

    /// 非法的档案名称（空白、路径分隔符等）
    #[error("非法的档案名称: {0:?}")]
    InvalidName(String),

    /// 指定的档案不存在
    #[error("档案不存在: {0}")]
    ProfileMissing(String),

    /// 未注册的状态类别（位置表配置错误，属于编程错误而非运行时状况）
    #[error("未注册的状态类别: {0}")]
    UnknownCategory(&'static str),

    /// 某一状态类别复制或清理失败；整个捕获/恢复操作立即中止，
    /// 已写入的部分不回滚
    #[error("状态复制失败 [{category}] {}: {source}", path.display())]
    CopyFailed {
        category: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 键值默认值存储读写失败
    #[error("键值存储操作失败: {0}")]
    Defaults(String),

    /// 普通文件 I/O 错误
    #[error("文件读写失败: {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON 序列化/反序列化错误
    #[error("JSON 序列化错误: {0}")]
    Json(#[from] serde_json::Error),

    /// Plist 读写错误
    #[error("Plist 读写错误: {0}")]
    Plist(#[from] plist::Error),
}

/// 便于与现有代码集成的类型别名
pub type Result<T> = std::result::Result<T, ProfileError>;

impl ProfileError {
    /// 从 `std::io::Error` 和路径创建 I/O 错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// 构造带类别上下文的复制失败错误
    pub fn copy_failed(
        category: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::CopyFailed {
            category,
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProfileError::ProfileMissing("work".to_string());
        assert_eq!(err.to_string(), "档案不存在: work");
    }

    #[test]
    fn test_copy_failed_contains_category_and_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ProfileError::copy_failed("cache", "/tmp/Caches/app", io_err);
        let text = err.to_string();
        assert!(text.contains("cache"));
        assert!(text.contains("/tmp/Caches/app"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid json").unwrap_err();
        let err: ProfileError = json_err.into();
        assert!(matches!(err, ProfileError::Json(_)));
    }

    #[test]
    fn test_anyhow_conversion() {
        let err = ProfileError::DuplicateName("Work".to_string());
        let anyhow_err: anyhow::Error = err.into();
        assert!(anyhow_err.to_string().contains("档案名称已存在"));
        assert!(anyhow_err.to_string().contains("Work"));
    }
}
