//! Package download and unpacking
//!
//! The archive serves each snapshot as a zip whose entries are named
//! `cache/<file>`. The body is spooled to an anonymous temporary file inside
//! the snapshot directory first, so an interrupted download leaves any
//! previous `cache/` untouched. Only then is the old `cache/` removed and the
//! container unpacked. A failure during unpacking can leave a partially
//! populated `cache/`; nothing is rolled back.

use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};

use futures::StreamExt;
use osrs_cache_protocol::PackageStream;
use tokio::io::AsyncWriteExt;
use zip::ZipArchive;

use crate::layout::{CACHE_DIR, CacheLayout};
use crate::{Result, StorageError};

/// Download `package` and unpack it into `<root>/cache`
///
/// Returns the number of files written.
pub async fn extract_package(mut package: PackageStream, layout: &CacheLayout) -> Result<usize> {
    tokio::fs::create_dir_all(layout.root()).await?;

    let spool = tempfile::tempfile_in(layout.root())?;
    let mut writer = tokio::fs::File::from_std(spool);
    let mut downloaded = 0u64;
    while let Some(chunk) = package.next().await {
        let chunk = chunk?;
        downloaded += chunk.len() as u64;
        writer.write_all(&chunk).await?;
    }
    writer.flush().await?;
    let spool = writer.into_std().await;
    tracing::debug!("downloaded package of {} bytes", downloaded);

    let cache_dir = layout.cache_dir();
    if tokio::fs::try_exists(&cache_dir).await? {
        tracing::debug!("removing existing {}", cache_dir.display());
        tokio::fs::remove_dir_all(&cache_dir).await?;
    }

    let target = cache_dir.clone();
    let extracted = tokio::task::spawn_blocking(move || unpack(spool, &target))
        .await
        .map_err(|e| StorageError::Task(e.to_string()))??;

    tracing::info!("extracted {} files into {}", extracted, cache_dir.display());
    Ok(extracted)
}

/// Unpack every file entry of a zip container into `cache_dir`
fn unpack(mut container: File, cache_dir: &Path) -> Result<usize> {
    container.seek(SeekFrom::Start(0))?;
    let mut archive = ZipArchive::new(container)?;
    let mut written = 0;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() {
            continue;
        }

        let Some(relative) = entry.enclosed_name().map(strip_cache_prefix) else {
            tracing::warn!("skipping package entry with unsafe path: {}", entry.name());
            continue;
        };
        if relative.as_os_str().is_empty() {
            continue;
        }

        let destination = cache_dir.join(&relative);
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut output = File::create(&destination)?;
        std::io::copy(&mut entry, &mut output)?;
        written += 1;
    }

    Ok(written)
}

fn strip_cache_prefix(name: &Path) -> PathBuf {
    name.strip_prefix(CACHE_DIR).unwrap_or(name).to_path_buf()
}
