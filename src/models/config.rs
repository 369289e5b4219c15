//! 全局配置（~/.wxvault/config.json）
//!
//! 配置文件缺失或损坏时回落到默认值，不阻塞任何操作。

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::json;

/// 全局配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// 档案根目录覆盖（默认 ~/.wxvault/profiles）
    #[serde(default)]
    pub profiles_root: Option<PathBuf>,
    /// 等待目标进程退出的上限毫秒数
    #[serde(default = "default_exit_wait_ms")]
    pub exit_wait_ms: u64,
    /// 切换完成后是否重新启动目标应用
    #[serde(default = "default_relaunch")]
    pub relaunch_after_switch: bool,
}

fn default_exit_wait_ms() -> u64 {
    1500
}

fn default_relaunch() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profiles_root: None,
            exit_wait_ms: default_exit_wait_ms(),
            relaunch_after_switch: default_relaunch(),
        }
    }
}

impl Settings {
    /// 配置中心目录（~/.wxvault）
    pub fn config_dir(home: &Path) -> PathBuf {
        home.join(".wxvault")
    }

    /// 读取全局配置；文件不存在或解析失败时返回默认值
    pub fn load(home: &Path) -> Self {
        let path = Self::config_dir(home).join("config.json");
        if !path.exists() {
            return Self::default();
        }
        match json::read(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("全局配置解析失败，使用默认值: {e}");
                Self::default()
            }
        }
    }

    /// 生效的档案根目录
    pub fn effective_profiles_root(&self, home: &Path) -> PathBuf {
        self.profiles_root
            .clone()
            .unwrap_or_else(|| Self::config_dir(home).join("profiles"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let home = TempDir::new().unwrap();
        let settings = Settings::load(home.path());
        assert_eq!(settings.exit_wait_ms, 1500);
        assert!(settings.relaunch_after_switch);
        assert_eq!(
            settings.effective_profiles_root(home.path()),
            home.path().join(".wxvault").join("profiles")
        );
    }

    #[test]
    fn partial_config_fills_missing_fields() {
        let home = TempDir::new().unwrap();
        let dir = home.path().join(".wxvault");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.json"), r#"{"exit_wait_ms": 300}"#).unwrap();

        let settings = Settings::load(home.path());
        assert_eq!(settings.exit_wait_ms, 300);
        assert!(settings.relaunch_after_switch);
    }

    #[test]
    fn corrupt_config_falls_back_to_defaults() {
        let home = TempDir::new().unwrap();
        let dir = home.path().join(".wxvault");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.json"), "{not json").unwrap();

        let settings = Settings::load(home.path());
        assert_eq!(settings.exit_wait_ms, 1500);
    }
}
