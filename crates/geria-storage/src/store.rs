//! The object store seam.
//!
//! Everything above this crate talks to an [`ObjectStore`]. Production uses
//! [`S3ObjectStore`]; tests and local runs use [`MemoryObjectStore`], which
//! honours the same ETag preconditions.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use aws_sdk_s3::Client;
use tokio::sync::Mutex;

use crate::error::StorageError;
use crate::objects::{self, GetObjectOutput};

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<GetObjectOutput, StorageError>;

    /// Unconditional write. Returns the new ETag.
    ///
    /// Used for seeding reference records (subjects, professionals, forms).
    /// Evaluation answers always go through the conditional writes.
    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String, StorageError>;

    /// Write only if the stored ETag equals `expected_etag`.
    async fn put_if_match(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
        expected_etag: &str,
    ) -> Result<String, StorageError>;

    /// Write only if nothing is stored under `key`.
    async fn put_if_absent(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String, StorageError>;

    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Keys under `prefix`, in lexicographic order.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}

/// An S3 bucket.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, key: &str) -> Result<GetObjectOutput, StorageError> {
        objects::get_object(&self.client, &self.bucket, key).await
    }

    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        objects::put_object(&self.client, &self.bucket, key, body, content_type).await
    }

    async fn put_if_match(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
        expected_etag: &str,
    ) -> Result<String, StorageError> {
        objects::put_object_if_match(
            &self.client,
            &self.bucket,
            key,
            body,
            content_type,
            expected_etag,
        )
        .await
    }

    async fn put_if_absent(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        objects::put_object_if_absent(&self.client, &self.bucket, key, body, content_type).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        objects::delete_object(&self.client, &self.bucket, key).await
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut keys = objects::list_objects(&self.client, &self.bucket, prefix).await?;
        keys.sort();
        Ok(keys)
    }
}

struct StoredObject {
    body: Vec<u8>,
    etag: String,
    content_type: Option<String>,
}

/// An in-process object store with S3's conditional-write semantics.
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<Mutex<BTreeMap<String, StoredObject>>>,
    version: Arc<AtomicU64>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_etag(&self) -> String {
        let version = self.version.fetch_add(1, Ordering::Relaxed) + 1;
        format!("\"{version}\"")
    }

    fn stored(&self, body: Vec<u8>, content_type: Option<&str>) -> StoredObject {
        StoredObject {
            body,
            etag: self.next_etag(),
            content_type: content_type.map(str::to_string),
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get(&self, key: &str) -> Result<GetObjectOutput, StorageError> {
        let objects = self.objects.lock().await;
        let object = objects.get(key).ok_or_else(|| StorageError::NotFound {
            key: key.to_string(),
        })?;
        Ok(GetObjectOutput {
            body: object.body.clone(),
            etag: Some(object.etag.clone()),
            content_type: object.content_type.clone(),
        })
    }

    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        let object = self.stored(body, content_type);
        let etag = object.etag.clone();
        self.objects.lock().await.insert(key.to_string(), object);
        Ok(etag)
    }

    async fn put_if_match(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
        expected_etag: &str,
    ) -> Result<String, StorageError> {
        let mut objects = self.objects.lock().await;
        match objects.get(key) {
            Some(existing) if existing.etag == expected_etag => {}
            Some(_) => {
                return Err(StorageError::PreconditionFailed {
                    key: key.to_string(),
                });
            }
            None => {
                return Err(StorageError::NotFound {
                    key: key.to_string(),
                });
            }
        }
        let object = self.stored(body, content_type);
        let etag = object.etag.clone();
        objects.insert(key.to_string(), object);
        Ok(etag)
    }

    async fn put_if_absent(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        let mut objects = self.objects.lock().await;
        if objects.contains_key(key) {
            return Err(StorageError::PreconditionFailed {
                key: key.to_string(),
            });
        }
        let object = self.stored(body, content_type);
        let etag = object.etag.clone();
        objects.insert(key.to_string(), object);
        Ok(etag)
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.objects.lock().await.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let objects = self.objects.lock().await;
        Ok(objects
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}
