//! 键值默认值存储
//!
//! 现场键值状态（目标应用的用户默认值域）的读写入口。快照引擎读取
//! 全量后转为 JSON 文档归档；恢复引擎按键合并写回，不在文档中的键
//! 保持原样。

use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use std::process::Command;

use plist::Dictionary;

use crate::data::plist as plist_io;
use crate::error::{ProfileError, Result};

/// 现场键值存储的统一接口
pub trait KeyValueStore {
    /// 读取整个域；域不存在时返回空字典
    fn read_all(&self) -> Result<Dictionary>;
    /// 整体写回
    fn write_all(&self, dict: &Dictionary) -> Result<()>;
}

/// 直接落盘的 plist 文件存储
///
/// 用于测试，以及不经 cfprefsd 直接操作偏好文件的部署方式。
pub struct PlistFileStore {
    path: PathBuf,
}

impl PlistFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl KeyValueStore for PlistFileStore {
    fn read_all(&self) -> Result<Dictionary> {
        plist_io::read_dictionary(&self.path)
    }

    fn write_all(&self, dict: &Dictionary) -> Result<()> {
        plist_io::write_dictionary(&self.path, dict)
    }
}

/// 经由 `defaults` 命令读写 cfprefsd 管理的偏好域（macOS）
///
/// 直接改写 ~/Library/Preferences 下的 plist 会被 cfprefsd 的缓存
/// 覆盖，必须走 `defaults export` / `defaults import`。
pub struct CfprefsStore {
    domain: String,
}

impl CfprefsStore {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }
}

impl KeyValueStore for CfprefsStore {
    fn read_all(&self) -> Result<Dictionary> {
        let output = Command::new("defaults")
            .args(["export", &self.domain, "-"])
            .output()
            .map_err(|e| ProfileError::Defaults(format!("执行 defaults export 失败: {e}")))?;

        if !output.status.success() {
            // 域不存在时视为空
            tracing::debug!("偏好域 {} 不存在或导出失败，按空处理", self.domain);
            return Ok(Dictionary::new());
        }

        let value = plist::Value::from_reader(Cursor::new(output.stdout))?;
        value.into_dictionary().ok_or_else(|| {
            ProfileError::Defaults(format!("偏好域 {} 的根节点不是字典", self.domain))
        })
    }

    fn write_all(&self, dict: &Dictionary) -> Result<()> {
        // 写入临时文件后 defaults import，确保经过 cfprefsd
        let tmp = std::env::temp_dir().join(format!(
            "wxvault-defaults-{}-{}.plist",
            std::process::id(),
            self.domain
        ));
        plist_io::write_dictionary(&tmp, dict)?;

        let status = Command::new("defaults")
            .args(["import", &self.domain])
            .arg(&tmp)
            .status()
            .map_err(|e| ProfileError::Defaults(format!("执行 defaults import 失败: {e}")));
        let _ = fs::remove_file(&tmp);

        let status = status?;
        if !status.success() {
            return Err(ProfileError::Defaults(format!(
                "defaults import 退出码异常: {status}"
            )));
        }
        tracing::debug!("已写回偏好域: {}", self.domain);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plist::Value;
    use tempfile::TempDir;

    #[test]
    fn plist_file_store_roundtrip() -> Result<()> {
        let tmp = TempDir::new().unwrap();
        let store = PlistFileStore::new(tmp.path().join("domain.plist"));

        // 尚无文件时读取为空
        assert!(store.read_all()?.is_empty());

        let mut dict = Dictionary::new();
        dict.insert("login".into(), Value::String("alice".into()));
        dict.insert("badge".into(), Value::Integer(7.into()));
        store.write_all(&dict)?;

        let loaded = store.read_all()?;
        assert_eq!(loaded, dict);
        Ok(())
    }
}
