// lib.rs - 暴露核心服务层给 CLI 使用

pub mod data;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{ProfileError, Result};
pub use models::app::AppSpec;
pub use models::category::{LocationRegistry, LocationSpec, StateCategory};
pub use models::config::Settings;
pub use models::profile::Profile;
pub use services::defaults::{CfprefsStore, KeyValueStore, PlistFileStore};
pub use services::process::{NoopProcessControl, ProcessControl, ShellProcessControl};
pub use services::profile_store::ProfileStore;
pub use services::restore::{RestoreEngine, SwitchError, SwitchPhase};
pub use services::snapshot::SnapshotEngine;
