//! 档案目录管理：枚举、创建、删除
//!
//! 纯目录簿记，不理解状态类别语义。内容由快照引擎在创建后立即填充。
//! 不做跨进程的名称预留或加锁，唯一性只针对当前枚举到的档案检查，
//! 并发序列化由调用方（UI/CLI 层）负责。

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::data::json;
use crate::error::{ProfileError, Result};
use crate::models::profile::{Profile, ProfileMeta, PROFILE_META_FILE};

/// 校验档案名称：非空、不含路径分隔符、不以点开头
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name.starts_with('.')
        || name.contains('/')
        || name.contains('\\')
    {
        return Err(ProfileError::InvalidName(name.to_string()));
    }
    Ok(())
}

pub struct ProfileStore {
    root: PathBuf,
}

impl ProfileStore {
    /// 打开档案根目录，不存在时创建
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| ProfileError::StoreUnavailable {
            path: root.clone(),
            source: e,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 枚举全部档案，每个直接子目录对应一个档案
    ///
    /// 顺序即文件系统枚举顺序，不保证稳定；排序由 UI 层负责。
    pub fn list(&self) -> Result<Vec<Profile>> {
        let entries = fs::read_dir(&self.root).map_err(|e| ProfileError::StoreUnavailable {
            path: self.root.clone(),
            source: e,
        })?;

        let mut profiles = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ProfileError::StoreUnavailable {
                path: self.root.clone(),
                source: e,
            })?;
            let path = entry.path();
            if path.is_dir() {
                profiles.push(Self::load_profile(&path));
            }
        }
        Ok(profiles)
    }

    fn load_profile(dir: &Path) -> Profile {
        let dir_name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match json::read::<ProfileMeta>(&dir.join(PROFILE_META_FILE)) {
            Ok(meta) => Profile {
                id: meta.id,
                display_name: meta.display_name,
                root_path: dir.to_path_buf(),
                created_at: Some(meta.created_at),
            },
            // 元数据缺失或损坏时退化为目录名
            Err(_) => Profile {
                id: dir_name.clone(),
                display_name: dir_name,
                root_path: dir.to_path_buf(),
                created_at: None,
            },
        }
    }

    /// 创建空档案目录并写入元数据
    ///
    /// 名称与现有档案大小写不敏感地比较，重复即拒绝。
    /// 只负责目录与元数据，状态内容由快照引擎随后填充。
    pub fn create(&self, name: &str) -> Result<Profile> {
        let name = name.trim();
        validate_name(name)?;

        let lower = name.to_lowercase();
        if self
            .list()?
            .iter()
            .any(|p| p.display_name.to_lowercase() == lower)
        {
            return Err(ProfileError::DuplicateName(name.to_string()));
        }

        // 元数据的 display_name 与目录名可能被外部改写而漂移，名称检查
        // 会漏判；目录已存在时一律按重名拒绝，绝不复用旧档案目录
        let dir = self.root.join(name);
        if let Err(e) = fs::create_dir(&dir) {
            return Err(match e.kind() {
                std::io::ErrorKind::AlreadyExists => ProfileError::DuplicateName(name.to_string()),
                _ => ProfileError::io(&dir, e),
            });
        }

        let meta = ProfileMeta {
            id: Uuid::new_v4().to_string(),
            display_name: name.to_string(),
            created_at: Utc::now(),
        };
        json::write_pretty(&dir.join(PROFILE_META_FILE), &meta)?;

        tracing::info!("已创建档案: {} ({})", name, meta.id);
        Ok(Profile {
            id: meta.id,
            display_name: meta.display_name,
            root_path: dir,
            created_at: Some(meta.created_at),
        })
    }

    /// 递归删除档案目录
    ///
    /// 目录已被外部删除时按幂等成功处理，容忍并发的外部清理。
    pub fn delete(&self, profile: &Profile) -> Result<()> {
        if !profile.root_path.exists() {
            tracing::info!(
                "档案目录已不存在，视为删除成功: {}",
                profile.root_path.display()
            );
            return Ok(());
        }
        fs::remove_dir_all(&profile.root_path)
            .map_err(|e| ProfileError::io(&profile.root_path, e))?;
        tracing::info!("已删除档案: {}", profile.display_name);
        Ok(())
    }

    /// 依据 id 或名称（大小写不敏感）查找档案
    pub fn find(&self, selector: &str) -> Result<Profile> {
        let lower = selector.to_lowercase();
        self.list()?
            .into_iter()
            .find(|p| p.id == selector || p.display_name.to_lowercase() == lower)
            .ok_or_else(|| ProfileError::ProfileMissing(selector.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, ProfileStore) {
        let tmp = TempDir::new().unwrap();
        let store = ProfileStore::open(tmp.path().join("profiles")).unwrap();
        (tmp, store)
    }

    #[test]
    fn create_then_list_roundtrip() -> Result<()> {
        let (_tmp, store) = store();

        let created = store.create("Work")?;
        assert!(created.root_path.is_dir());
        assert!(created.root_path.join(PROFILE_META_FILE).exists());

        let listed = store.list()?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].display_name, "Work");
        assert_eq!(listed[0].id, created.id);
        Ok(())
    }

    #[test]
    fn duplicate_name_is_case_insensitive() -> Result<()> {
        let (_tmp, store) = store();
        store.create("X")?;

        let err = store.create("x").unwrap_err();
        assert!(matches!(err, ProfileError::DuplicateName(_)));
        Ok(())
    }

    #[test]
    fn invalid_names_are_rejected() {
        let (_tmp, store) = store();
        assert!(matches!(
            store.create(""),
            Err(ProfileError::InvalidName(_))
        ));
        assert!(matches!(
            store.create("a/b"),
            Err(ProfileError::InvalidName(_))
        ));
        assert!(matches!(
            store.create(".hidden"),
            Err(ProfileError::InvalidName(_))
        ));
    }

    #[test]
    fn create_never_reuses_existing_directory() -> Result<()> {
        let (_tmp, store) = store();
        let work = store.create("Work")?;
        std::fs::write(work.root_path.join("payload"), b"old").unwrap();

        // 外部改写元数据后，大小写不敏感的名称检查不再命中该目录
        let meta = ProfileMeta {
            id: work.id.clone(),
            display_name: "Renamed".to_string(),
            created_at: Utc::now(),
        };
        json::write_pretty(&work.root_path.join(PROFILE_META_FILE), &meta)?;

        let err = store.create("Work").unwrap_err();
        assert!(matches!(err, ProfileError::DuplicateName(_)));
        // 旧档案内容原封不动，没有被当作新档案复用
        assert_eq!(
            std::fs::read(work.root_path.join("payload")).unwrap(),
            b"old"
        );
        Ok(())
    }

    #[test]
    fn delete_is_idempotent() -> Result<()> {
        let (_tmp, store) = store();
        let profile = store.create("Temp")?;

        store.delete(&profile)?;
        assert!(store.list()?.is_empty());

        // 第二次删除同样成功
        store.delete(&profile)?;
        Ok(())
    }

    #[test]
    fn delete_does_not_touch_other_profiles() -> Result<()> {
        let (_tmp, store) = store();
        let a = store.create("A")?;
        let b = store.create("B")?;
        std::fs::write(b.root_path.join("payload"), b"keep").unwrap();

        store.delete(&a)?;

        let listed = store.list()?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].display_name, "B");
        assert_eq!(
            std::fs::read(b.root_path.join("payload")).unwrap(),
            b"keep"
        );
        Ok(())
    }

    #[test]
    fn find_matches_id_and_name() -> Result<()> {
        let (_tmp, store) = store();
        let created = store.create("Work")?;

        assert_eq!(store.find(&created.id)?.display_name, "Work");
        assert_eq!(store.find("work")?.id, created.id);
        assert!(matches!(
            store.find("absent"),
            Err(ProfileError::ProfileMissing(_))
        ));
        Ok(())
    }

    #[test]
    fn directory_without_metadata_still_listed() -> Result<()> {
        let (_tmp, store) = store();
        std::fs::create_dir_all(store.root().join("manual")).unwrap();

        let listed = store.list()?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].display_name, "manual");
        assert_eq!(listed[0].id, "manual");
        assert!(listed[0].created_at.is_none());
        Ok(())
    }
}
