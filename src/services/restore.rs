//! 恢复引擎：清空现场并从档案重建
//!
//! 切换状态机：Idle → Terminating → Clearing → Populating → Done。
//! Terminating 尽力而为可跳过；Clearing/Populating 中途失败时操作
//! 整体终止并带出失败阶段，已完成的部分不回滚——清理阶段的删除
//! 不可逆，因此切换一旦开始就不支持取消。

use thiserror::Error;

use crate::data::{json, plist as plist_io};
use crate::error::{ProfileError, Result};
use crate::models::category::{LocationRegistry, StateCategory};
use crate::models::profile::Profile;
use crate::services::defaults::KeyValueStore;
use crate::services::process::ProcessControl;
use crate::utils::fs as fsutil;

/// 切换操作所处的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchPhase {
    Idle,
    Terminating,
    Clearing,
    Populating,
    Done,
}

/// 切换失败：携带失败时所处的阶段与根因
///
/// Clearing 之后的失败意味着现场处于部分写入状态，调用方不得假设
/// 之前的现场状态仍可恢复。
#[derive(Debug, Error)]
#[error("切换在 {phase:?} 阶段失败: {source}")]
pub struct SwitchError {
    pub phase: SwitchPhase,
    #[source]
    pub source: ProfileError,
}

pub struct RestoreEngine<'a> {
    registry: &'a LocationRegistry,
    kv: &'a dyn KeyValueStore,
}

impl<'a> RestoreEngine<'a> {
    pub fn new(registry: &'a LocationRegistry, kv: &'a dyn KeyValueStore) -> Self {
        Self { registry, kv }
    }

    /// 完整切换：结束目标进程（尽力而为）→ 恢复 → 重新启动
    pub fn switch(
        &self,
        profile: &Profile,
        process: &dyn ProcessControl,
        relaunch: bool,
    ) -> std::result::Result<(), SwitchError> {
        tracing::info!("开始切换档案: {}", profile.display_name);
        tracing::debug!("切换阶段: {:?}", SwitchPhase::Terminating);
        process.terminate_and_wait();
        self.restore(profile)?;
        if relaunch {
            process.launch();
        }
        tracing::debug!("切换阶段: {:?}", SwitchPhase::Done);
        Ok(())
    }

    /// 清空全部注册现场位置后，从档案目录重建现场状态
    ///
    /// 文件型类别是破坏性替换；键值默认值按键合并写入，不在文档中的
    /// 键保持原样——这一不对称是有意设计。
    pub fn restore(&self, profile: &Profile) -> std::result::Result<(), SwitchError> {
        if !profile.root_path.is_dir() {
            return Err(SwitchError {
                phase: SwitchPhase::Idle,
                source: ProfileError::ProfileMissing(profile.display_name.clone()),
            });
        }

        tracing::debug!("切换阶段: {:?}", SwitchPhase::Clearing);
        self.clear_live().map_err(|source| SwitchError {
            phase: SwitchPhase::Clearing,
            source,
        })?;
        tracing::debug!("切换阶段: {:?}", SwitchPhase::Populating);
        self.populate(profile).map_err(|source| SwitchError {
            phase: SwitchPhase::Populating,
            source,
        })?;
        self.apply_defaults(profile).map_err(|source| SwitchError {
            phase: SwitchPhase::Populating,
            source,
        })?;

        tracing::info!("档案恢复完成: {}", profile.display_name);
        Ok(())
    }

    /// 清理阶段：所有注册位置的所有候选路径一律移除（破坏性、无条件）
    fn clear_live(&self) -> Result<()> {
        for spec in self.registry.file_specs() {
            let category = spec.category.as_str();
            for live in &spec.live_candidates {
                if live.exists() {
                    tracing::debug!("清理 [{}] {}", category, live.display());
                    fsutil::remove_path(live)
                        .map_err(|e| ProfileError::copy_failed(category, live, e))?;
                }
            }
        }
        Ok(())
    }

    /// 填充阶段：档案中存在的类别复制回主现场路径
    fn populate(&self, profile: &Profile) -> Result<()> {
        for spec in self.registry.file_specs() {
            let source = profile.root_path.join(spec.archive_rel);
            if !source.exists() {
                // 档案无此类别：现场保持清空状态
                continue;
            }
            let Some(live) = spec.primary_live() else {
                continue;
            };
            let category = spec.category.as_str();
            tracing::debug!("恢复 [{}] {}", category, live.display());
            fsutil::copy_path(&source, live)
                .map_err(|e| ProfileError::copy_failed(category, live, e))?;
        }
        Ok(())
    }

    /// 键值默认值按键合并写回现场
    fn apply_defaults(&self, profile: &Profile) -> Result<()> {
        let Ok(spec) = self.registry.resolve(StateCategory::KeyValueDefaults) else {
            tracing::debug!("注册表未包含键值默认值类别，跳过");
            return Ok(());
        };
        let path = profile.root_path.join(spec.archive_rel);
        if !path.exists() {
            return Ok(());
        }

        let doc: serde_json::Value = json::read(&path)?;
        let Some(entries) = doc.as_object() else {
            return Err(ProfileError::Defaults(format!(
                "defaults 文档不是对象: {}",
                path.display()
            )));
        };

        let mut live = self.kv.read_all()?;
        for (key, value) in entries {
            if let Some(pv) = plist_io::json_to_plist(value) {
                live.insert(key.clone(), pv);
            }
        }
        self.kv.write_all(&live)
    }
}
