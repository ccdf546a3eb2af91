//! In-process delivery host
//!
//! Keeps downloads and embedded blobs in memory. Front ends that render
//! into their own viewer use it directly; tests use it to observe what a
//! view delivered and released.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::session::{DeliveryHost, ViewerHandle};

#[derive(Debug, Default)]
struct Registry {
    downloads: Vec<(String, Vec<u8>)>,
    blobs: BTreeMap<u64, Vec<u8>>,
    next_id: u64,
    released: usize,
}

/// Shared in-memory downloads and blob registry
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    registry: Arc<Mutex<Registry>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        lock(&self.registry)
    }

    /// Saved downloads as `(file name, bytes)`, oldest first
    pub fn downloads(&self) -> Vec<(String, Vec<u8>)> {
        self.lock().downloads.clone()
    }

    /// Number of blobs still exposed to a viewer
    pub fn live_blobs(&self) -> usize {
        self.lock().blobs.len()
    }

    /// Number of blob handles released so far
    pub fn released(&self) -> usize {
        self.lock().released
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

impl DeliveryHost for MemoryHost {
    type Handle = BlobHandle;
    type Error = Infallible;

    fn save_download(&self, file_name: &str, bytes: &[u8]) -> Result<String, Infallible> {
        self.lock()
            .downloads
            .push((file_name.to_string(), bytes.to_vec()));
        Ok(format!("memory:{file_name}"))
    }

    fn embed(&self, file_name: &str, bytes: Vec<u8>) -> Result<BlobHandle, Infallible> {
        let mut registry = self.lock();
        registry.next_id += 1;
        let id = registry.next_id;
        registry.blobs.insert(id, bytes);
        Ok(BlobHandle {
            id,
            file_name: file_name.to_string(),
            registry: Arc::clone(&self.registry),
        })
    }
}

/// A registered blob; dropping it unregisters the bytes
#[derive(Debug)]
pub struct BlobHandle {
    id: u64,
    file_name: String,
    registry: Arc<Mutex<Registry>>,
}

impl BlobHandle {
    /// Copy of the exposed bytes, while the handle is alive
    pub fn bytes(&self) -> Option<Vec<u8>> {
        lock(&self.registry).blobs.get(&self.id).cloned()
    }
}

impl ViewerHandle for BlobHandle {
    fn location(&self) -> String {
        format!("blob:medrasti/{}/{}", self.id, self.file_name)
    }
}

impl Drop for BlobHandle {
    fn drop(&mut self) {
        let mut registry = lock(&self.registry);
        if registry.blobs.remove(&self.id).is_some() {
            registry.released += 1;
        }
    }
}
