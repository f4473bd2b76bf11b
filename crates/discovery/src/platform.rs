//! Platform-specific base directories and volume enumeration.

use std::path::PathBuf;

/// Per-user base directories the app directory is expected under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseDirs {
    /// Roaming config dir (`%APPDATA%`, `$XDG_CONFIG_HOME`).
    pub config: Option<PathBuf>,
    /// Local cache dir (`%LOCALAPPDATA%`, `$XDG_CACHE_HOME`).
    pub local: Option<PathBuf>,
}

impl BaseDirs {
    /// Reads the base directories from the environment.
    ///
    /// Unset variables yield `None`; discovery then probes fewer paths.
    pub fn from_env() -> Self {
        from_env_inner()
    }

    /// Returns the defined bases, config first.
    pub fn defined(&self) -> Vec<PathBuf> {
        [self.config.clone(), self.local.clone()]
            .into_iter()
            .flatten()
            .collect()
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(target_os = "windows")]
fn from_env_inner() -> BaseDirs {
    BaseDirs {
        config: env_path("APPDATA"),
        local: env_path("LOCALAPPDATA"),
    }
}

#[cfg(not(target_os = "windows"))]
fn from_env_inner() -> BaseDirs {
    let home = env_path("HOME");
    BaseDirs {
        config: env_path("XDG_CONFIG_HOME").or_else(|| home.as_ref().map(|h| h.join(".config"))),
        local: env_path("XDG_CACHE_HOME").or_else(|| home.as_ref().map(|h| h.join(".cache"))),
    }
}

/// Lists every volume root a relocated path is probed against.
///
/// On Windows this is all 26 drive letters whether mounted or not, so the
/// probe count is constant. Elsewhere it is `/` plus the directories
/// directly under the usual mount points.
pub fn volume_roots() -> Vec<PathBuf> {
    volume_roots_inner()
}

#[cfg(target_os = "windows")]
fn volume_roots_inner() -> Vec<PathBuf> {
    (b'A'..=b'Z')
        .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
        .collect()
}

#[cfg(not(target_os = "windows"))]
fn volume_roots_inner() -> Vec<PathBuf> {
    let mut mount_points = vec![PathBuf::from("/mnt"), PathBuf::from("/media")];
    if let Some(user) = std::env::var_os("USER") {
        mount_points.push(PathBuf::from("/run/media").join(user));
    }

    let mut roots = vec![PathBuf::from("/")];
    for mount in mount_points {
        let Ok(entries) = std::fs::read_dir(&mount) else {
            continue;
        };
        let mut volumes: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_ok_and(|ft| ft.is_dir()))
            .map(|e| e.path())
            .collect();
        volumes.sort();
        roots.extend(volumes);
    }
    roots
}
