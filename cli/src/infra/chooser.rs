//! File chooser implementations of the `FileChooser` port.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dialoguer::{FuzzySelect, Input};

use crate::application::ports::{FileChooser, FileFilter};
use crate::domain::bundle::is_archive_name;
use crate::domain::config::ChooserKind;

/// Desktop "open file" dialog.
#[cfg(feature = "native-dialog")]
pub struct NativeChooser;

#[cfg(feature = "native-dialog")]
impl FileChooser for NativeChooser {
    async fn choose_file(
        &self,
        initial_dir: &Path,
        filters: &[FileFilter],
    ) -> Result<Option<PathBuf>> {
        let mut dialog = rfd::AsyncFileDialog::new()
            .set_title("Select offline bundle")
            .set_directory(initial_dir);
        for filter in filters {
            dialog = dialog.add_filter(filter.name, filter.extensions);
        }
        Ok(dialog.pick_file().await.map(|h| h.path().to_path_buf()))
    }
}

/// Fuzzy picker over archives in the starting directory, with manual entry.
pub struct TerminalChooser;

const MANUAL_ENTRY: &str = "Enter a path…";

impl FileChooser for TerminalChooser {
    async fn choose_file(
        &self,
        initial_dir: &Path,
        _filters: &[FileFilter],
    ) -> Result<Option<PathBuf>> {
        let archives = list_archives(initial_dir);
        let mut items: Vec<String> = archives
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        items.push(MANUAL_ENTRY.to_string());

        let selection = FuzzySelect::new()
            .with_prompt(format!("Select bundle in {}", initial_dir.display()))
            .items(&items)
            .default(0)
            .interact_opt()
            .context("bundle selection prompt failed")?;

        match selection {
            None => Ok(None),
            Some(i) if i < archives.len() => Ok(Some(archives[i].clone())),
            Some(_) => {
                let entered: String = Input::new()
                    .with_prompt("Bundle path (empty to cancel)")
                    .allow_empty(true)
                    .interact_text()
                    .context("bundle path prompt failed")?;
                let entered = entered.trim();
                if entered.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(PathBuf::from(entered)))
                }
            }
        }
    }
}

/// Archives directly inside `dir`, sorted. Unreadable directories yield none.
#[must_use]
pub fn list_archives(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut archives: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .is_some_and(|n| is_archive_name(&n.to_string_lossy()))
        })
        .collect();
    archives.sort();
    archives
}

/// Chooser selected by the profile.
pub enum BundleChooser {
    #[cfg(feature = "native-dialog")]
    Native(NativeChooser),
    Terminal(TerminalChooser),
}

impl BundleChooser {
    #[must_use]
    pub fn from_kind(kind: ChooserKind) -> Self {
        match kind {
            #[cfg(feature = "native-dialog")]
            ChooserKind::Native => Self::Native(NativeChooser),
            #[cfg(not(feature = "native-dialog"))]
            ChooserKind::Native => {
                tracing::debug!("native dialog not compiled in, using terminal picker");
                Self::Terminal(TerminalChooser)
            }
            ChooserKind::Terminal => Self::Terminal(TerminalChooser),
        }
    }
}

impl FileChooser for BundleChooser {
    async fn choose_file(
        &self,
        initial_dir: &Path,
        filters: &[FileFilter],
    ) -> Result<Option<PathBuf>> {
        match self {
            #[cfg(feature = "native-dialog")]
            Self::Native(c) => c.choose_file(initial_dir, filters).await,
            Self::Terminal(c) => c.choose_file(initial_dir, filters).await,
        }
    }
}
