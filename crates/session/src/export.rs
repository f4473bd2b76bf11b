//! Mod list export.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::SessionError;

/// Output format for [`export_list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Txt,
    Json,
    Csv,
}

impl ExportFormat {
    /// File extension, also the default file stem suffix (`modlist.<ext>`).
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    /// Default file name offered to the user.
    pub fn default_file_name(self) -> String {
        format!("modlist.{}", self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "txt" => Ok(ExportFormat::Txt),
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(SessionError::UnknownFormat(other.to_string())),
        }
    }
}

/// Renders `mods` in `format`.
pub fn render_list(mods: &[String], format: ExportFormat) -> Result<String, SessionError> {
    Ok(match format {
        ExportFormat::Txt => mods.join("\n"),
        ExportFormat::Json => serde_json::to_string_pretty(mods)?,
        ExportFormat::Csv => mods
            .iter()
            .map(|m| format!("\"{m}\""))
            .collect::<Vec<_>>()
            .join(","),
    })
}

/// Writes `mods` to `path` and returns the written file's name.
pub fn export_list(
    mods: &[String],
    format: ExportFormat,
    path: &Path,
) -> Result<String, SessionError> {
    let data = render_list(mods, format)?;
    std::fs::write(path, data)?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    tracing::info!(path = %path.display(), %format, count = mods.len(), "mod list exported");
    Ok(name)
}
