//! JSON 文件读写
//!
//! 自动创建父目录，统一输出 pretty 格式，便于人工检查与 diff。

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ProfileError, Result};

/// 读取并反序列化整个 JSON 文件
pub fn read<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| ProfileError::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

/// 序列化并写入 JSON 文件（pretty 格式，必要时创建父目录）
pub fn write_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ProfileError::io(parent, e))?;
    }
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content).map_err(|e| ProfileError::io(path, e))?;
    Ok(())
}
