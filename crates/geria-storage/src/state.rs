use serde::{Serialize, de::DeserializeOwned};

use crate::error::StorageError;
use crate::store::ObjectStore;

const JSON: &str = "application/json";

/// A JSON document as loaded, with the ETag it was read at.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub value: T,
    pub etag: String,
}

/// Load a JSON document. Returns the deserialized value and its ETag.
pub async fn load_state<T: DeserializeOwned>(
    store: &dyn ObjectStore,
    key: &str,
) -> Result<Versioned<T>, StorageError> {
    let output = store.get(key).await?;
    let value: T = serde_json::from_slice(&output.body)?;
    let etag = output.etag.unwrap_or_default();
    Ok(Versioned { value, etag })
}

/// Load a JSON document, mapping a missing key to `None`.
pub async fn load_state_opt<T: DeserializeOwned>(
    store: &dyn ObjectStore,
    key: &str,
) -> Result<Option<Versioned<T>>, StorageError> {
    match load_state(store, key).await {
        Ok(doc) => Ok(Some(doc)),
        Err(StorageError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Save a JSON document unconditionally. Returns the new ETag.
///
/// For seeding reference records; aggregates use [`save_state_if_match`]
/// or [`save_state_if_absent`].
pub async fn save_state<T: Serialize>(
    store: &dyn ObjectStore,
    key: &str,
    value: &T,
) -> Result<String, StorageError> {
    let body = serde_json::to_vec_pretty(value)?;
    store.put(key, body, Some(JSON)).await
}

/// Save a JSON document only if it is unchanged since `expected_etag` was read.
pub async fn save_state_if_match<T: Serialize>(
    store: &dyn ObjectStore,
    key: &str,
    value: &T,
    expected_etag: &str,
) -> Result<String, StorageError> {
    let body = serde_json::to_vec_pretty(value)?;
    store.put_if_match(key, body, Some(JSON), expected_etag).await
}

/// Save a JSON document only if the key is unused.
pub async fn save_state_if_absent<T: Serialize>(
    store: &dyn ObjectStore,
    key: &str,
    value: &T,
) -> Result<String, StorageError> {
    let body = serde_json::to_vec_pretty(value)?;
    store.put_if_absent(key, body, Some(JSON)).await
}

/// Load every JSON document under `prefix`, in key order.
///
/// A key that vanishes between the listing and the read is skipped.
pub async fn load_all<T: DeserializeOwned>(
    store: &dyn ObjectStore,
    prefix: &str,
) -> Result<Vec<T>, StorageError> {
    let keys = store.list(prefix).await?;
    let mut values = Vec::with_capacity(keys.len());
    for key in keys {
        if let Some(doc) = load_state_opt::<T>(store, &key).await? {
            values.push(doc.value);
        } else {
            tracing::debug!(%key, "object deleted during listing");
        }
    }
    Ok(values)
}
