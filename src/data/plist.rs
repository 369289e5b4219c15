//! Plist 读写与 JSON 转换
//!
//! 目标应用的偏好与键值默认值使用 plist 格式，档案内则以 JSON 保存。
//! 二进制（Data）、日期等无法经 JSON 往返的取值在转换时被丢弃——
//! 这是有意设计的有损边界，调用方负责记录丢弃数量。

use std::fs;
use std::path::Path;

use plist::{Dictionary, Value};

use crate::error::{ProfileError, Result};

/// 读取 plist 文件的根字典；文件不存在时返回空字典
pub fn read_dictionary(path: &Path) -> Result<Dictionary> {
    if !path.exists() {
        return Ok(Dictionary::new());
    }
    let value = Value::from_file(path)?;
    value
        .into_dictionary()
        .ok_or_else(|| ProfileError::Defaults(format!("plist 根节点不是字典: {}", path.display())))
}

/// 将字典写为 XML 格式的 plist 文件（必要时创建父目录）
pub fn write_dictionary(path: &Path, dict: &Dictionary) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ProfileError::io(parent, e))?;
    }
    Value::Dictionary(dict.clone()).to_file_xml(path)?;
    Ok(())
}

/// plist 值转 JSON；无法表示的类型（Data/Date/Uid 等）返回 None
pub fn plist_to_json(value: &Value) -> Option<serde_json::Value> {
    match value {
        Value::String(s) => Some(serde_json::Value::String(s.clone())),
        Value::Boolean(b) => Some(serde_json::Value::Bool(*b)),
        Value::Integer(i) => i
            .as_signed()
            .map(serde_json::Value::from)
            .or_else(|| i.as_unsigned().map(serde_json::Value::from)),
        Value::Real(f) => serde_json::Number::from_f64(*f).map(serde_json::Value::Number),
        Value::Array(items) => Some(serde_json::Value::Array(
            items.iter().filter_map(plist_to_json).collect(),
        )),
        Value::Dictionary(dict) => {
            let mut map = serde_json::Map::new();
            for (key, item) in dict.iter() {
                if let Some(json) = plist_to_json(item) {
                    map.insert(key.clone(), json);
                }
            }
            Some(serde_json::Value::Object(map))
        }
        // Data、Date、Uid 无法经 JSON 往返
        _ => None,
    }
}

/// JSON 值转 plist；null 在 plist 中没有对应表示，返回 None
pub fn json_to_plist(value: &serde_json::Value) -> Option<Value> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::Bool(b) => Some(Value::Boolean(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Value::Integer(i.into()))
            } else if let Some(u) = n.as_u64() {
                Some(Value::Integer(u.into()))
            } else {
                n.as_f64().map(Value::Real)
            }
        }
        serde_json::Value::String(s) => Some(Value::String(s.clone())),
        serde_json::Value::Array(items) => Some(Value::Array(
            items.iter().filter_map(json_to_plist).collect(),
        )),
        serde_json::Value::Object(map) => {
            let mut dict = Dictionary::new();
            for (key, item) in map {
                if let Some(pv) = json_to_plist(item) {
                    dict.insert(key.clone(), pv);
                }
            }
            Some(Value::Dictionary(dict))
        }
    }
}
