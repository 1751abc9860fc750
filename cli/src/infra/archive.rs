//! Archive extraction: implements the `ArchiveExtractor` port.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::read::GzDecoder;

use crate::application::ports::ArchiveExtractor;
use crate::domain::bundle::ArchiveKind;

/// Extracts zip, tar and tar.gz bundles on the blocking thread pool.
pub struct BundleArchive;

impl ArchiveExtractor for BundleArchive {
    async fn extract_all(&self, archive: &Path, dest: &Path) -> Result<()> {
        let archive = archive.to_path_buf();
        let dest = dest.to_path_buf();
        tokio::task::spawn_blocking(move || extract_sync(&archive, &dest))
            .await
            .context("spawn_blocking for extract_all")?
    }
}

/// Extract `archive` into `dest`, picking the decoder by file name.
///
/// # Errors
///
/// Returns an error if the archive cannot be opened or decoded, or an entry
/// cannot be written.
pub fn extract_sync(archive: &Path, dest: &Path) -> Result<()> {
    match ArchiveKind::from_path(archive) {
        ArchiveKind::Zip => extract_zip(archive, dest),
        ArchiveKind::TarGz => {
            let file = open(archive)?;
            tar::Archive::new(GzDecoder::new(file))
                .unpack(dest)
                .context("unpacking tar.gz archive")
        }
        ArchiveKind::Tar => tar::Archive::new(open(archive)?)
            .unpack(dest)
            .context("unpacking tar archive"),
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("opening {}", path.display()))
}

fn extract_zip(archive: &Path, dest: &Path) -> Result<()> {
    let mut zip = zip::ZipArchive::new(open(archive)?).context("reading zip archive")?;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).context("reading zip entry")?;
        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!(name = entry.name(), "skipping zip entry with unsafe path");
            continue;
        };
        let outpath: PathBuf = dest.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&outpath)
                .with_context(|| format!("creating {}", outpath.display()))?;
            continue;
        }
        if let Some(parent) = outpath.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut outfile =
            File::create(&outpath).with_context(|| format!("creating {}", outpath.display()))?;
        std::io::copy(&mut entry, &mut outfile)
            .with_context(|| format!("extracting {}", outpath.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let applied = entry.unix_mode().map(|mode| {
                std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))
            });
            if let Some(Err(e)) = applied {
                tracing::debug!(path = %outpath.display(), error = %e, "keeping default permissions");
            }
        }
    }
    Ok(())
}
