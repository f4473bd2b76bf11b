//! Relocation of the application directory onto every volume.

use std::path::{Component, Path, PathBuf};

use crate::platform::{BaseDirs, volume_roots};
use crate::types::RootScan;

/// Strips the volume prefix and root from `base`.
///
/// `C:\Users\X\AppData\Roaming` becomes `Users\X\AppData\Roaming`;
/// `/home/x/.config` becomes `home/x/.config`.
pub fn relative_to_volume(base: &Path) -> PathBuf {
    base.components()
        .filter(|c| !matches!(c, Component::Prefix(_) | Component::RootDir))
        .collect()
}

/// Builds the volume-relative application paths for each base.
pub fn relative_app_paths(bases: &[PathBuf], app_name: &str) -> Vec<PathBuf> {
    bases
        .iter()
        .map(|base| relative_to_volume(base).join(app_name))
        .collect()
}

/// Probes every `volume / relative` combination for an existing directory.
///
/// Unreadable candidates are silently treated as absent.
pub fn scan_roots(volumes: &[PathBuf], relative: &[PathBuf]) -> RootScan {
    let mut scan = RootScan::default();

    for volume in volumes {
        for rel in relative {
            scan.candidates_tested += 1;
            let full = volume.join(rel);
            let is_dir = std::fs::metadata(&full).is_ok_and(|m| m.is_dir());
            if is_dir && !scan.roots.contains(&full) {
                tracing::debug!(root = %full.display(), "found application root");
                scan.roots.push(full);
            }
        }
    }

    scan
}

/// Discovers application roots for the given bases on every volume.
///
/// No defined base means nothing to relocate and an empty result.
pub fn discover_roots(bases: &BaseDirs, app_name: &str) -> RootScan {
    let relative = relative_app_paths(&bases.defined(), app_name);
    if relative.is_empty() {
        tracing::debug!("no base directories defined, skipping root discovery");
        return RootScan::default();
    }

    let scan = scan_roots(&volume_roots(), &relative);
    tracing::info!(
        roots = scan.roots.len(),
        tested = scan.candidates_tested,
        "root discovery finished"
    );
    scan
}
