//! In-memory archive for unit tests

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use osrs_cache_formats::XteaKey;
use osrs_cache_protocol::{ArchiveApi, Build, CacheSnapshot, PackageStream, ProtocolError};

/// Catalog entry; `major == 0` means the entry lists no builds
pub fn snapshot(id: u32, game: &str, timestamp: Option<&str>, major: u32) -> CacheSnapshot {
    let builds = if major == 0 {
        Vec::new()
    } else {
        vec![Build { major, minor: None }]
    };
    serde_json::from_value(serde_json::json!({
        "id": id,
        "scope": "runescape",
        "game": game,
        "environment": "live",
        "language": "en",
        "builds": builds,
        "timestamp": timestamp,
    }))
    .expect("snapshot")
}

pub fn keys(count: u32) -> Vec<XteaKey> {
    (0..count)
        .map(|group| {
            serde_json::from_value(serde_json::json!({
                "archive": 5,
                "group": group,
                "mapsquare": 10000 + group,
                "key": [group, 1, 2, 3],
            }))
            .expect("key")
        })
        .collect()
}

/// Zip container with one `cache/<name>` entry per file
pub fn package(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in files {
        writer
            .start_file(format!("cache/{name}"), zip::write::FileOptions::default())
            .expect("start");
        writer.write_all(data).expect("write");
    }
    writer.finish().expect("finish").into_inner()
}

pub fn valid_package() -> Vec<u8> {
    package(&[
        ("main_file_cache.dat2", &b"dat2"[..]),
        ("main_file_cache.idx255", &b"idx255"[..]),
        ("main_file_cache.idx9", &b"idx9"[..]),
    ])
}

#[derive(Default)]
pub struct FakeArchive {
    catalog: Vec<CacheSnapshot>,
    keys: Mutex<HashMap<u32, Vec<XteaKey>>>,
    packages: Mutex<HashMap<u32, Vec<u8>>>,
    fail_catalog: AtomicBool,
    fail_keys: AtomicBool,
    catalog_calls: AtomicUsize,
    keys_calls: AtomicUsize,
    package_calls: AtomicUsize,
}

impl FakeArchive {
    pub fn new(catalog: Vec<CacheSnapshot>) -> Arc<Self> {
        Arc::new(Self {
            catalog,
            ..Self::default()
        })
    }

    pub fn set_keys(&self, id: u32, keys: Vec<XteaKey>) {
        self.keys.lock().unwrap().insert(id, keys);
    }

    pub fn set_package(&self, id: u32, data: Vec<u8>) {
        self.packages.lock().unwrap().insert(id, data);
    }

    pub fn fail_catalog(&self) {
        self.fail_catalog.store(true, Ordering::SeqCst);
    }

    pub fn fail_keys(&self) {
        self.fail_keys.store(true, Ordering::SeqCst);
    }

    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }

    pub fn keys_calls(&self) -> usize {
        self.keys_calls.load(Ordering::SeqCst)
    }

    pub fn package_calls(&self) -> usize {
        self.package_calls.load(Ordering::SeqCst)
    }

    pub fn network_calls(&self) -> usize {
        self.catalog_calls() + self.keys_calls() + self.package_calls()
    }

    fn status(path: String, status: u16) -> ProtocolError {
        ProtocolError::HttpStatus {
            method: "GET",
            url: format!("fake://archive/{path}"),
            status,
        }
    }
}

#[async_trait]
impl ArchiveApi for FakeArchive {
    async fn fetch_catalog(&self) -> osrs_cache_protocol::Result<Vec<CacheSnapshot>> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_catalog.load(Ordering::SeqCst) {
            return Err(Self::status("caches.json".to_string(), 500));
        }
        Ok(self.catalog.clone())
    }

    async fn fetch_keys(&self, scope: &str, id: u32) -> osrs_cache_protocol::Result<Vec<XteaKey>> {
        self.keys_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_keys.load(Ordering::SeqCst) {
            return Err(Self::status(format!("caches/{scope}/{id}/keys.json"), 500));
        }
        Ok(self.keys.lock().unwrap().get(&id).cloned().unwrap_or_default())
    }

    async fn fetch_package(
        &self,
        scope: &str,
        id: u32,
    ) -> osrs_cache_protocol::Result<PackageStream> {
        self.package_calls.fetch_add(1, Ordering::SeqCst);
        let Some(data) = self.packages.lock().unwrap().get(&id).cloned() else {
            return Err(Self::status(format!("caches/{scope}/{id}/disk.zip"), 404));
        };
        let chunks: Vec<osrs_cache_protocol::Result<Bytes>> = data
            .chunks(512)
            .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
            .collect();
        Ok(futures::stream::iter(chunks).boxed())
    }
}
