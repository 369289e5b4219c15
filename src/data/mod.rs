//! 统一数据读写层
//!
//! 每种原生格式一个管理模块：JSON（档案文档、元数据）与
//! Plist（目标应用的偏好/键值默认值格式）。

pub mod json;
pub mod plist;
