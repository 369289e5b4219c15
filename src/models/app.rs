//! 目标应用定义（静态配置表）
//!
//! 位置注册表依据这里的 bundle identifier 推导各状态类别的现场路径。
//! 同一应用历史上可能使用过多个 identifier（新版与旧版并存），
//! 因此每个类别会产生多个候选路径。

use serde::{Deserialize, Serialize};

/// 被管理的目标应用
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSpec {
    pub id: String,
    pub name: String,
    /// 可能出现过的 bundle identifier，当前版本在前
    pub bundle_ids: Vec<String>,
    /// 进程名（用于结束与探测进程）
    pub process_name: String,
    /// 重新启动应用的命令
    pub launch_command: Vec<String>,
}

impl AppSpec {
    /// 获取所有内置应用
    pub fn all() -> Vec<AppSpec> {
        vec![AppSpec::wechat()]
    }

    /// 根据 ID 获取应用
    pub fn by_id(id: &str) -> Option<AppSpec> {
        Self::all().into_iter().find(|a| a.id == id)
    }

    /// 微信（macOS）定义
    pub fn wechat() -> AppSpec {
        AppSpec {
            id: "wechat".to_string(),
            name: "微信".to_string(),
            bundle_ids: vec![
                "com.tencent.xinWeChat".to_string(),
                "com.tencent.WeChat".to_string(),
            ],
            process_name: "WeChat".to_string(),
            launch_command: vec!["open".to_string(), "-a".to_string(), "WeChat".to_string()],
        }
    }

    /// 键值默认值使用的首选偏好域
    pub fn primary_domain(&self) -> &str {
        &self.bundle_ids[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_id_finds_builtin_app() {
        let app = AppSpec::by_id("wechat").unwrap();
        assert_eq!(app.process_name, "WeChat");
        assert_eq!(app.bundle_ids.len(), 2);
    }

    #[test]
    fn by_id_unknown_returns_none() {
        assert!(AppSpec::by_id("no-such-app").is_none());
    }
}
