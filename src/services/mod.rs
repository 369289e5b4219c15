pub mod defaults;
pub mod process;
pub mod profile_store;
pub mod restore;
pub mod snapshot;
