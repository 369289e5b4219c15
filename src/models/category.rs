//! 状态类别与位置注册表
//!
//! 清理与恢复共用同一张位置表：原始实现里两份近乎重复的路径清单
//! 曾各自漂移（清理的集合与恢复的集合悄悄不一致），这里用单一注册表
//! 从结构上消除这一缺陷类别。

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::app::AppSpec;
use crate::error::{ProfileError, Result};

/// 应用状态的逻辑类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StateCategory {
    Preferences,
    Cache,
    Cookies,
    WebStorage,
    WebKit,
    SavedState,
    KeyValueDefaults,
}

impl StateCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateCategory::Preferences => "preferences",
            StateCategory::Cache => "cache",
            StateCategory::Cookies => "cookies",
            StateCategory::WebStorage => "web-storage",
            StateCategory::WebKit => "webkit",
            StateCategory::SavedState => "saved-state",
            StateCategory::KeyValueDefaults => "key-value-defaults",
        }
    }
}

/// 单个状态类别的位置规格
///
/// `live_candidates` 按优先级排列（当前 identifier 在前）；
/// `archive_rel` 是该类别在档案目录内的相对路径。
/// 键值默认值类别没有文件型现场路径，`live_candidates` 为空，
/// 其现场读写经由键值存储接口完成。
#[derive(Debug, Clone)]
pub struct LocationSpec {
    pub category: StateCategory,
    pub live_candidates: Vec<PathBuf>,
    pub archive_rel: &'static str,
}

impl LocationSpec {
    /// 当前实际存在的现场路径（候选中优先级最高者）
    pub fn existing_live(&self) -> Option<&Path> {
        self.live_candidates
            .iter()
            .map(PathBuf::as_path)
            .find(|p| p.exists())
    }

    /// 恢复时写入的主现场路径（首个候选）
    pub fn primary_live(&self) -> Option<&Path> {
        self.live_candidates.first().map(PathBuf::as_path)
    }
}

/// 位置注册表：进程启动时构建，之后不可变
pub struct LocationRegistry {
    specs: Vec<LocationSpec>,
}

impl LocationRegistry {
    /// 从自定义规格表构建（配置表驱动的非内置应用）
    pub fn new(specs: Vec<LocationSpec>) -> Self {
        Self { specs }
    }

    /// 依据应用定义与用户主目录构建注册表
    pub fn for_app(app: &AppSpec, home: &Path) -> Self {
        let lib = home.join("Library");
        let ids = &app.bundle_ids;

        let per_id = |f: &dyn Fn(&str) -> PathBuf| -> Vec<PathBuf> {
            ids.iter().map(|id| f(id)).collect()
        };

        let specs = vec![
            LocationSpec {
                category: StateCategory::Preferences,
                live_candidates: per_id(&|id| {
                    lib.join("Preferences").join(format!("{id}.plist"))
                }),
                archive_rel: "preferences",
            },
            LocationSpec {
                category: StateCategory::Cache,
                live_candidates: per_id(&|id| lib.join("Caches").join(id)),
                archive_rel: "Cache",
            },
            LocationSpec {
                category: StateCategory::Cookies,
                live_candidates: per_id(&|id| {
                    lib.join("Cookies").join(format!("{id}.binarycookies"))
                }),
                archive_rel: "binarycookies",
            },
            LocationSpec {
                category: StateCategory::WebStorage,
                live_candidates: per_id(&|id| lib.join("HTTPStorages").join(id)),
                archive_rel: "HTTPStorage",
            },
            LocationSpec {
                category: StateCategory::WebKit,
                live_candidates: per_id(&|id| lib.join("WebKit").join(id)),
                archive_rel: "WebKit",
            },
            LocationSpec {
                category: StateCategory::SavedState,
                live_candidates: per_id(&|id| {
                    lib.join("Saved Application State")
                        .join(format!("{id}.savedState"))
                }),
                archive_rel: "SavedState",
            },
            LocationSpec {
                category: StateCategory::KeyValueDefaults,
                live_candidates: vec![],
                archive_rel: "defaults.json",
            },
        ];

        Self { specs }
    }

    /// 查找指定类别的规格；查不到说明注册表配置有误
    pub fn resolve(&self, category: StateCategory) -> Result<&LocationSpec> {
        self.specs
            .iter()
            .find(|s| s.category == category)
            .ok_or(ProfileError::UnknownCategory(category.as_str()))
    }

    /// 全部规格（注册顺序即清理/恢复顺序）
    pub fn specs(&self) -> &[LocationSpec] {
        &self.specs
    }

    /// 文件型类别（排除键值默认值）
    pub fn file_specs(&self) -> impl Iterator<Item = &LocationSpec> {
        self.specs.iter().filter(|s| !s.live_candidates.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_covers_all_bundle_ids() {
        let app = AppSpec::wechat();
        let registry = LocationRegistry::for_app(&app, Path::new("/Users/demo"));

        let prefs = registry.resolve(StateCategory::Preferences).unwrap();
        assert_eq!(prefs.live_candidates.len(), 2);
        assert!(prefs.live_candidates[0]
            .to_string_lossy()
            .contains("com.tencent.xinWeChat.plist"));
        assert!(prefs.live_candidates[1]
            .to_string_lossy()
            .contains("com.tencent.WeChat.plist"));
    }

    #[test]
    fn key_value_defaults_has_no_file_candidates() {
        let registry = LocationRegistry::for_app(&AppSpec::wechat(), Path::new("/Users/demo"));
        let kv = registry.resolve(StateCategory::KeyValueDefaults).unwrap();
        assert!(kv.live_candidates.is_empty());
        assert_eq!(kv.archive_rel, "defaults.json");

        // file_specs 不包含键值类别
        assert!(registry
            .file_specs()
            .all(|s| s.category != StateCategory::KeyValueDefaults));
    }

    #[test]
    fn resolve_missing_category_is_unknown() {
        let registry = LocationRegistry::new(vec![]);
        let err = registry.resolve(StateCategory::Cache).unwrap_err();
        assert!(matches!(err, ProfileError::UnknownCategory("cache")));
    }
}
