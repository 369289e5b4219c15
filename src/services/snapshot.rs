//! 快照引擎：把现场状态完整复制进档案目录
//!
//! 成功后档案是可独立恢复的完整副本（无法序列化的二进制键值除外）。
//! 任一类别复制失败即返回首个错误，档案处于不完整状态——不回滚，
//! 调用方应将失败的捕获整体弃用或重试。

use crate::data::{json, plist as plist_io};
use crate::error::{ProfileError, Result};
use crate::models::category::{LocationRegistry, StateCategory};
use crate::models::profile::Profile;
use crate::services::defaults::KeyValueStore;
use crate::utils::fs as fsutil;

pub struct SnapshotEngine<'a> {
    registry: &'a LocationRegistry,
    kv: &'a dyn KeyValueStore,
}

impl<'a> SnapshotEngine<'a> {
    pub fn new(registry: &'a LocationRegistry, kv: &'a dyn KeyValueStore) -> Self {
        Self { registry, kv }
    }

    /// 捕获当前现场状态到档案目录
    pub fn capture(&self, profile: &Profile) -> Result<()> {
        for spec in self.registry.file_specs() {
            let category = spec.category.as_str();
            let target = profile.root_path.join(spec.archive_rel);

            match spec.existing_live() {
                Some(live) => {
                    tracing::debug!("捕获 [{}] {}", category, live.display());
                    fsutil::copy_path(live, &target)
                        .map_err(|e| ProfileError::copy_failed(category, live, e))?;
                }
                None => {
                    // 现场不存在：同时移除档案中的陈旧条目，保证档案始终是现场的镜像
                    fsutil::remove_path(&target)
                        .map_err(|e| ProfileError::copy_failed(category, &target, e))?;
                }
            }
        }

        self.capture_defaults(profile)?;
        tracing::info!("档案捕获完成: {}", profile.display_name);
        Ok(())
    }

    /// 读取现场键值默认值，过滤无法序列化的取值后写入 defaults.json
    fn capture_defaults(&self, profile: &Profile) -> Result<()> {
        let Ok(spec) = self.registry.resolve(StateCategory::KeyValueDefaults) else {
            tracing::debug!("注册表未包含键值默认值类别，跳过");
            return Ok(());
        };

        let live = self.kv.read_all()?;
        let mut doc = serde_json::Map::new();
        let mut dropped = 0usize;
        for (key, value) in live.iter() {
            match plist_io::plist_to_json(value) {
                Some(jv) => {
                    doc.insert(key.clone(), jv);
                }
                None => {
                    dropped += 1;
                    tracing::debug!("丢弃无法序列化的键值条目: {key}");
                }
            }
        }
        if dropped > 0 {
            // 有意的有损边界：二进制取值无法经 JSON 往返
            tracing::warn!("捕获键值默认值时丢弃 {dropped} 个二进制类型条目");
        }

        let path = profile.root_path.join(spec.archive_rel);
        json::write_pretty(&path, &serde_json::Value::Object(doc))
    }
}
