//! xteas.json persistence

use std::io::ErrorKind;

use osrs_cache_formats::{XteaKey, XteaKeySet};

use crate::layout::CacheLayout;
use crate::{Result, StorageError};

/// Write `keys` as a pretty-printed document to `<root>/xteas.json`
///
/// Creates the snapshot directory if needed and truncates any existing file.
pub async fn persist_keys(layout: &CacheLayout, keys: &[XteaKey]) -> Result<()> {
    let document = serde_json::to_vec_pretty(keys)?;

    tokio::fs::create_dir_all(layout.root()).await?;
    tokio::fs::write(layout.keys_path(), document).await?;

    tracing::debug!("wrote {} keys to {}", keys.len(), layout.keys_path().display());
    Ok(())
}

/// Read `<root>/xteas.json`
///
/// Returns `Ok(None)` when the file does not exist. A file that exists but is
/// not a key document is an error.
pub fn load_keys(layout: &CacheLayout) -> Result<Option<XteaKeySet>> {
    let path = layout.keys_path();
    let data = match std::fs::read(&path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    XteaKeySet::from_json(&data)
        .map(Some)
        .map_err(|source| StorageError::InvalidKeys { path, source })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_keys() -> Vec<XteaKey> {
        serde_json::from_str(
            r#"[{"archive":5,"group":1,"name":"l40_55","mapsquare":10295,"key":[1,2,3,4]},
                {"archive":5,"group":2,"mapsquare":10296,"key":[5,6,7,8],"extra":"kept"}]"#,
        )
        .expect("keys")
    }

    #[tokio::test]
    async fn test_persist_and_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let layout = CacheLayout::new(dir.path().join("2024-06-01-rev220"));
        let keys = sample_keys();

        persist_keys(&layout, &keys).await.expect("persist");

        let text = std::fs::read_to_string(layout.keys_path()).expect("read");
        assert!(text.contains('\n'), "document should be pretty-printed");
        assert!(text.contains("\"extra\": \"kept\""));

        let loaded = load_keys(&layout).expect("load").expect("present");
        assert_eq!(loaded.keys(), keys.as_slice());
        assert_eq!(loaded.get_by_mapsquare(10296), Some([5, 6, 7, 8]));
    }

    #[tokio::test]
    async fn test_persist_overwrites() {
        let dir = tempfile::tempdir().expect("tempdir");
        let layout = CacheLayout::new(dir.path());
        std::fs::write(layout.keys_path(), "x".repeat(4096)).expect("write");

        persist_keys(&layout, &sample_keys()[..1]).await.expect("persist");

        assert_eq!(load_keys(&layout).expect("load").expect("present").len(), 1);
    }

    #[test]
    fn test_missing_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_keys(&CacheLayout::new(dir.path())).expect("load").is_none());
    }

    #[test]
    fn test_malformed_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let layout = CacheLayout::new(dir.path());
        std::fs::write(layout.keys_path(), "{not json").expect("write");

        let err = load_keys(&layout).unwrap_err();
        assert!(matches!(err, StorageError::InvalidKeys { .. }));
    }
}
