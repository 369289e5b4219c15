//! 档案数据类型
//!
//! 档案目录本身是自包含单元：目录名即显示名，稳定标识与创建时间
//! 持久化在目录内的 `profile.json` 中，与显示名解耦。

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 档案目录内的元数据文件名
pub const PROFILE_META_FILE: &str = "profile.json";

/// 一个已枚举的档案
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// 稳定唯一标识（uuid）；元数据缺失时退化为目录名
    pub id: String,
    /// 用户可见名称，创建时在现有档案间大小写不敏感地唯一
    pub display_name: String,
    /// 档案目录的绝对路径
    pub root_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// `profile.json` 的持久化形式
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileMeta {
    pub id: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}
