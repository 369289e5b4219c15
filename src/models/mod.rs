pub mod app;
pub mod category;
pub mod config;
pub mod profile;

pub use app::AppSpec;
pub use category::{LocationRegistry, LocationSpec, StateCategory};
pub use config::Settings;
pub use profile::{Profile, ProfileMeta, PROFILE_META_FILE};
