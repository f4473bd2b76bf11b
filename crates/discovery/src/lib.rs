//! Discovery of mod-manager installations.
//!
//! The supported mod manager keeps one folder per game under a per-user
//! application directory (`%APPDATA%\Vortex\<game>\mods`). Installs on other
//! drives keep the same relative shape, so discovery relocates the known
//! relative path onto every volume instead of asking the registry.
//!
//! # Flow
//!
//! 1. **Bases**: per-user config and cache dirs from the environment
//! 2. **Relocate**: strip each base's volume root, append the app name
//! 3. **Probe**: join every volume root with every relative path
//! 4. **Expand**: each `<root>/<game>/mods` with a sub-folder is an install
//! 5. **Custom**: append manually registered roots from the store

pub mod installations;
pub mod platform;
pub mod roots;
pub mod types;

pub use installations::{
    CUSTOM_SUFFIX, add_custom_root, custom_installations, discover_installations,
    installations_in_root,
};
pub use platform::{BaseDirs, volume_roots};
pub use roots::{discover_roots, relative_app_paths, relative_to_volume, scan_roots};
pub use types::{DEFAULT_APP_NAME, Installation, RootScan};

/// Errors for discovery operations.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("store error: {0}")]
    Store(#[from] modninja_store::StoreError),

    #[error("cannot derive an id for mods dir {0}")]
    InvalidModsDir(std::path::PathBuf),
}
