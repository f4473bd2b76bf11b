//! The session facade.
//!
//! Filesystem work runs on tokio's blocking pool so a GUI event loop can
//! await any operation without stalling. Results are plain values; a
//! caller that fires overlapping requests for the same target keeps only
//! the latest answer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use modninja_discovery::{BaseDirs, DEFAULT_APP_NAME, Installation};
use modninja_file_ops::{DirStats, FileTree, ModInfo, Readme};
use modninja_igdb::CoverFetcher;
use modninja_store::KeyValueStore;
use tracing::debug;

use crate::error::SessionError;
use crate::export::{ExportFormat, export_list};
use crate::order::{apply_order, load_order, save_order};
use crate::settings::{Settings, load_settings, save_settings, visible_mods};

/// Runs `f` on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T, SessionError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await?)
}

/// Everything the GUI shell needs, behind one handle.
pub struct Session {
    store: Arc<dyn KeyValueStore>,
    covers: CoverFetcher,
    bases: BaseDirs,
    app_name: String,
}

impl Session {
    /// Creates a session reading base directories from the environment.
    pub fn new(store: Arc<dyn KeyValueStore>, covers: CoverFetcher) -> Self {
        Self {
            store,
            covers,
            bases: BaseDirs::from_env(),
            app_name: DEFAULT_APP_NAME.to_string(),
        }
    }

    /// Overrides the base directories discovery relocates.
    pub fn with_bases(mut self, bases: BaseDirs) -> Self {
        self.bases = bases;
        self
    }

    /// Overrides the application folder name discovery looks for.
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    // -- installations --

    pub async fn discover_installations(&self) -> Result<Vec<Installation>, SessionError> {
        let bases = self.bases.clone();
        let app_name = self.app_name.clone();
        let store = Arc::clone(&self.store);

        let found = blocking(move || {
            modninja_discovery::discover_installations(&bases, &app_name, store.as_ref())
        })
        .await?;
        debug!(count = found.len(), "installations discovered");
        Ok(found)
    }

    pub fn add_custom_root(&self, mods_dir: &Path) -> Result<Installation, SessionError> {
        Ok(modninja_discovery::add_custom_root(
            self.store.as_ref(),
            mods_dir,
        )?)
    }

    // -- mods --

    /// All child directories of `dir`, sorted by name.
    pub async fn list_entries(&self, dir: &Path) -> Result<Vec<String>, SessionError> {
        let dir = dir.to_path_buf();
        Ok(blocking(move || modninja_file_ops::list_entries(&dir)).await??)
    }

    /// Mods to display: hidden ones filtered per settings, saved order applied.
    pub async fn mod_list(&self, mods_dir: &Path) -> Result<Vec<String>, SessionError> {
        let settings = self.load_settings();
        let mut mods = visible_mods(self.list_entries(mods_dir).await?, &settings);

        if let Some(order) = self.load_order(mods_dir).await? {
            apply_order(&mut mods, &order);
        }
        Ok(mods)
    }

    pub async fn aggregate_stats(&self, dir: &Path) -> Result<DirStats, SessionError> {
        let dir = dir.to_path_buf();
        blocking(move || modninja_file_ops::aggregate_stats(&dir)).await
    }

    pub async fn list_tree_paths(&self, dir: &Path) -> Result<Vec<String>, SessionError> {
        let dir = dir.to_path_buf();
        blocking(move || modninja_file_ops::list_tree_paths(&dir)).await
    }

    pub async fn file_tree(&self, dir: &Path) -> Result<FileTree, SessionError> {
        let dir = dir.to_path_buf();
        blocking(move || FileTree::from_dir(&dir)).await
    }

    pub async fn mod_info(&self, mods_dir: &Path, name: &str) -> Result<ModInfo, SessionError> {
        let (dir, name) = (mods_dir.to_path_buf(), name.to_string());
        Ok(blocking(move || modninja_file_ops::mod_info(&dir, &name)).await??)
    }

    pub async fn mod_readme(
        &self,
        mods_dir: &Path,
        name: &str,
    ) -> Result<Option<Readme>, SessionError> {
        let (dir, name) = (mods_dir.to_path_buf(), name.to_string());
        blocking(move || modninja_file_ops::mod_readme(&dir, &name)).await
    }

    pub async fn mod_screenshots(
        &self,
        mods_dir: &Path,
        name: &str,
    ) -> Result<Vec<PathBuf>, SessionError> {
        let (dir, name) = (mods_dir.to_path_buf(), name.to_string());
        blocking(move || modninja_file_ops::mod_screenshots(&dir, &name)).await
    }

    pub async fn delete_mods(&self, mods_dir: &Path) -> Result<(), SessionError> {
        let dir = mods_dir.to_path_buf();
        Ok(blocking(move || modninja_file_ops::delete_mods_dir(&dir)).await??)
    }

    // -- order & export --

    pub async fn load_order(&self, mods_dir: &Path) -> Result<Option<Vec<String>>, SessionError> {
        let dir = mods_dir.to_path_buf();
        blocking(move || load_order(&dir)).await
    }

    pub async fn save_order(&self, mods_dir: &Path, mods: &[String]) -> Result<(), SessionError> {
        let (dir, mods) = (mods_dir.to_path_buf(), mods.to_vec());
        blocking(move || save_order(&dir, &mods)).await?
    }

    pub fn export_list(
        &self,
        mods: &[String],
        format: ExportFormat,
        path: &Path,
    ) -> Result<String, SessionError> {
        export_list(mods, format, path)
    }

    // -- covers --

    pub async fn get_cover_image(&self, identifier: &str) -> Option<PathBuf> {
        self.covers.get_cover_image(identifier).await
    }

    pub fn clear_cover_cache(&self) -> Result<usize, SessionError> {
        Ok(self.covers.clear_cache()?)
    }

    // -- settings --

    pub fn load_settings(&self) -> Settings {
        load_settings(self.store.as_ref())
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), SessionError> {
        save_settings(self.store.as_ref(), settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modninja_igdb::{Client, CoverCache, IgdbConfig};
    use modninja_store::MemoryStore;

    struct Fixture {
        tmp: tempfile::TempDir,
        session: Session,
    }

    fn fixture() -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

        // Nothing listens on port 9; cover lookups past the local stages fail fast.
        let config = IgdbConfig::new("cid", "secret").with_base_url("http://127.0.0.1:9");
        let covers = CoverFetcher::new(
            Client::new(config).unwrap(),
            CoverCache::in_data_dir(&tmp.path().join("data")),
            Arc::clone(&store),
        );

        let session = Session::new(store, covers).with_bases(BaseDirs {
            config: Some(tmp.path().join("roaming")),
            local: None,
        });
        Fixture { tmp, session }
    }

    fn make_mods(dir: &Path, names: &[&str]) {
        for name in names {
            std::fs::create_dir_all(dir.join(name)).unwrap();
        }
    }

    #[tokio::test]
    async fn discovers_relocated_and_custom_installs() {
        let fx = fixture();
        let game = fx.tmp.path().join("roaming/Vortex/skyrimse/mods");
        make_mods(&game, &["SkyUI"]);

        let custom = fx.tmp.path().join("Other/mods");
        std::fs::create_dir_all(&custom).unwrap();
        fx.session.add_custom_root(&custom).unwrap();

        let found = fx.session.discover_installations().await.unwrap();
        let ids: Vec<&str> = found.iter().map(|i| i.id.as_str()).collect();
        assert!(ids.contains(&"skyrimse"));
        assert_eq!(ids.last(), Some(&"Other (custom)"));
    }

    #[tokio::test]
    async fn mod_list_filters_hidden_and_applies_order() {
        let fx = fixture();
        let mods_dir = fx.tmp.path().join("mods");
        make_mods(&mods_dir, &["a", "b", "c", ".hidden"]);

        assert_eq!(fx.session.mod_list(&mods_dir).await.unwrap(), ["a", "b", "c"]);

        fx.session
            .save_order(&mods_dir, &["c".into(), "a".into()])
            .await
            .unwrap();
        assert_eq!(fx.session.mod_list(&mods_dir).await.unwrap(), ["b", "c", "a"]);

        fx.session
            .save_settings(&Settings {
                show_hidden: true,
                ..Default::default()
            })
            .unwrap();
        let listed = fx.session.mod_list(&mods_dir).await.unwrap();
        assert_eq!(listed.len(), 4);
        assert!(listed.contains(&".hidden".to_string()));
    }

    #[tokio::test]
    async fn per_mod_details() {
        let fx = fixture();
        let mods_dir = fx.tmp.path().join("mods");
        make_mods(&mods_dir, &["SkyUI/interface", "SkyUI/screenshots"]);
        std::fs::write(mods_dir.join("SkyUI/README.md"), "# SkyUI").unwrap();
        std::fs::write(mods_dir.join("SkyUI/interface/skyui.swf"), [0u8; 10]).unwrap();
        std::fs::write(mods_dir.join("SkyUI/screenshots/one.PNG"), b"").unwrap();

        let stats = fx
            .session
            .aggregate_stats(&mods_dir.join("SkyUI"))
            .await
            .unwrap();
        assert_eq!(stats.folders, 2);
        assert_eq!(stats.files, 3);

        let info = fx.session.mod_info(&mods_dir, "SkyUI").await.unwrap();
        assert_eq!(info.stats, stats);

        let readme = fx.session.mod_readme(&mods_dir, "SkyUI").await.unwrap().unwrap();
        assert_eq!(readme.filename, "README.md");

        let shots = fx.session.mod_screenshots(&mods_dir, "SkyUI").await.unwrap();
        assert_eq!(shots.len(), 1);

        let tree = fx
            .session
            .list_tree_paths(&mods_dir.join("SkyUI"))
            .await
            .unwrap();
        assert!(tree.contains(&"interface/skyui.swf".to_string()));

        let rendered = fx
            .session
            .file_tree(&mods_dir.join("SkyUI"))
            .await
            .unwrap()
            .render_lines();
        assert_eq!(rendered[0], "interface/");
    }

    #[tokio::test]
    async fn missing_mod_is_an_error() {
        let fx = fixture();
        let err = fx
            .session
            .mod_info(fx.tmp.path(), "nope")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::FileOps(_)));
    }

    #[tokio::test]
    async fn delete_mods_removes_tree() {
        let fx = fixture();
        let mods_dir = fx.tmp.path().join("mods");
        make_mods(&mods_dir, &["a/b"]);

        fx.session.delete_mods(&mods_dir).await.unwrap();
        assert!(!mods_dir.exists());
        fx.session.delete_mods(&mods_dir).await.unwrap();
    }

    #[tokio::test]
    async fn cover_manual_override_and_clear() {
        let fx = fixture();
        let covers = fx.tmp.path().join("data/covers");
        std::fs::create_dir_all(&covers).unwrap();
        std::fs::write(covers.join("skyrimse.png"), b"png").unwrap();

        assert_eq!(
            fx.session.get_cover_image("skyrimse").await,
            Some(covers.join("skyrimse.png"))
        );
        assert!(fx.session.get_cover_image("unknown").await.is_none());

        assert_eq!(fx.session.clear_cover_cache().unwrap(), 0);
        assert_eq!(
            fx.session.get_cover_image("skyrimse").await,
            Some(covers.join("skyrimse.png"))
        );
    }

    #[tokio::test]
    async fn export_through_session() {
        let fx = fixture();
        let path = fx.tmp.path().join("out.txt");
        let name = fx
            .session
            .export_list(&["a".into(), "b".into()], ExportFormat::Txt, &path)
            .unwrap();
        assert_eq!(name, "out.txt");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "a\nb");
    }
}
