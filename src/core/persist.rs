//! JSON read/write over a [`KeyValueStore`].
//!
//! Reads never fail: absent, unreadable, or malformed data yields the
//! type's default. [`read_list`] and [`read_map`] go one level deeper and
//! drop only the elements that do not parse. Writes replace the whole
//! document under the key.

use std::collections::BTreeMap;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::core::error::StorageError;
use crate::utils::KeyValueStore;

/// Deserialize the document under `key`, or `T::default()`.
pub fn read<T>(storage: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(err) => {
            tracing::warn!(key, error = %err, "storage read failed, using default");
            return T::default();
        }
    };

    // JSON `null` (what `undefined` round-trips to) counts as absent
    match serde_json::from_str::<Option<T>>(&raw) {
        Ok(value) => value.unwrap_or_default(),
        Err(err) => {
            tracing::warn!(key, error = %err, "malformed stored data, using default");
            T::default()
        }
    }
}

/// Read a JSON array, keeping the elements that parse as `T`.
pub fn read_list<T: DeserializeOwned>(storage: &dyn KeyValueStore, key: &str) -> Vec<T> {
    keep_valid(key, read::<Vec<Value>>(storage, key))
}

/// Read a JSON object, keeping the entries whose value parses as `T`.
pub fn read_map<T: DeserializeOwned>(
    storage: &dyn KeyValueStore,
    key: &str,
) -> BTreeMap<String, T> {
    read::<BTreeMap<String, Value>>(storage, key)
        .into_iter()
        .filter_map(|(entry, value)| parse_entry(key, &entry, value).map(|v| (entry, v)))
        .collect()
}

/// Parse each element of `values`, dropping (and logging) the ones that fail.
pub fn keep_valid<T: DeserializeOwned>(key: &str, values: Vec<Value>) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| parse_entry(key, &i.to_string(), value))
        .collect()
}

fn parse_entry<T: DeserializeOwned>(key: &str, entry: &str, value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            tracing::warn!(key, entry, error = %err, "dropping malformed stored entry");
            None
        }
    }
}

/// Serialize `value` and overwrite `key`.
pub fn write<T>(storage: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value).map_err(|e| StorageError::SerializationFailed {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    storage.set_item(key, &json)?;
    tracing::debug!(key, bytes = json.len(), "collection written");
    Ok(())
}
