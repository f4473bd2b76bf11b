//! Mod list session: the narrow boundary a GUI shell calls into.
//!
//! This crate owns no selection or rendering state. It composes discovery,
//! directory aggregation and cover lookup behind one [`Session`] value and
//! adds the small list utilities the shell needs.
//!
//! # Operations
//!
//! - **Installations**: discover, register custom roots
//! - **Mods**: list, filter hidden, per-mod info, readme, screenshots, tree
//! - **Order**: load/save the `.modninja-order.json` sidecar and apply it
//! - **Export**: write the mod list as txt, json or csv
//! - **Covers**: resolve and clear cached cover art
//! - **Settings**: GUI-owned settings object

pub mod error;
pub mod export;
pub mod order;
pub mod session;
pub mod settings;

pub use error::SessionError;
pub use export::{ExportFormat, export_list, render_list};
pub use order::{ORDER_FILE, apply_order, load_order, save_order};
pub use session::Session;
pub use settings::{Settings, load_settings, save_settings, visible_mods};

/// Human-readable name for an installation id (`Fallout4` → `Fallout 4`).
pub fn format_display_name(id: &str) -> String {
    modninja_igdb::format_search_term(id)
}
