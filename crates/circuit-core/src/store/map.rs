//! Typed, prefixed collections over a [`KvStore`].
//!
//! Keys are `prefix byte ++ encoded key`; values are JSON.

use super::KvStore;
use crate::error::StoreError;
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;

/// Encoding of a collection key into store bytes.
pub trait KeyCodec {
    type Key: ?Sized;
    type Owned;

    fn encode(key: &Self::Key) -> Vec<u8>;

    fn decode(bytes: &[u8]) -> Result<Self::Owned, StoreError>;
}

/// Raw byte keys (account addresses).
pub struct BytesKey;

impl KeyCodec for BytesKey {
    type Key = [u8];
    type Owned = Vec<u8>;

    fn encode(key: &[u8]) -> Vec<u8> {
        key.to_vec()
    }

    fn decode(bytes: &[u8]) -> Result<Vec<u8>, StoreError> {
        Ok(bytes.to_vec())
    }
}

/// UTF-8 string keys (message type URLs).
pub struct StringKey;

impl KeyCodec for StringKey {
    type Key = str;
    type Owned = String;

    fn encode(key: &str) -> Vec<u8> {
        key.as_bytes().to_vec()
    }

    fn decode(bytes: &[u8]) -> Result<String, StoreError> {
        String::from_utf8(bytes.to_vec()).map_err(|e| StoreError::Codec {
            key: hex::encode(bytes),
            message: e.to_string(),
        })
    }
}

/// A typed map living under one prefix byte of a store.
pub struct Map<K, V> {
    prefix: u8,
    name: &'static str,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> Clone for Map<K, V> {
    fn clone(&self) -> Self {
        Self {
            prefix: self.prefix,
            name: self.name,
            _marker: PhantomData,
        }
    }
}

impl<K, V> std::fmt::Debug for Map<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Map")
            .field("prefix", &self.prefix)
            .field("name", &self.name)
            .finish()
    }
}

impl<K, V> Map<K, V>
where
    K: KeyCodec,
    V: Serialize + DeserializeOwned,
{
    pub const fn new(prefix: u8, name: &'static str) -> Self {
        Self {
            prefix,
            name,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn codec_error(&self, storage_key: &[u8], e: serde_json::Error) -> StoreError {
        StoreError::Codec {
            key: format!("{}/{}", self.name, hex::encode(storage_key)),
            message: e.to_string(),
        }
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    fn storage_key(&self, key: &K::Key) -> Vec<u8> {
        let encoded = K::encode(key);
        let mut full = Vec::with_capacity(encoded.len() + 1);
        full.push(self.prefix);
        full.extend_from_slice(&encoded);
        full
    }

    fn decode_value(&self, storage_key: &[u8], bytes: &[u8]) -> Result<V, StoreError> {
        serde_json::from_slice(bytes).map_err(|e| self.codec_error(storage_key, e))
    }

    /// Fetch a value. `Ok(None)` means not found.
    pub fn get(&self, store: &dyn KvStore, key: &K::Key) -> Result<Option<V>, StoreError> {
        let storage_key = self.storage_key(key);
        match store.get(&storage_key)? {
            Some(bytes) => Ok(Some(self.decode_value(&storage_key, &bytes)?)),
            None => Ok(None),
        }
    }

    pub fn set(&self, store: &dyn KvStore, key: &K::Key, value: &V) -> Result<(), StoreError> {
        let storage_key = self.storage_key(key);
        let bytes = serde_json::to_vec(value).map_err(|e| self.codec_error(&storage_key, e))?;
        store.set(&storage_key, &bytes)
    }

    pub fn remove(&self, store: &dyn KvStore, key: &K::Key) -> Result<(), StoreError> {
        store.remove(&self.storage_key(key))
    }

    pub fn has(&self, store: &dyn KvStore, key: &K::Key) -> Result<bool, StoreError> {
        store.has(&self.storage_key(key))
    }

    /// Visit every entry in key order. The visitor returns `Ok(true)` to stop early.
    pub fn walk<E, F>(&self, store: &dyn KvStore, mut visitor: F) -> Result<(), E>
    where
        E: From<StoreError>,
        F: FnMut(K::Owned, V) -> Result<bool, E>,
    {
        for (storage_key, bytes) in store.iter_prefix(&[self.prefix])? {
            let key = K::decode(&storage_key[1..])?;
            let value = self.decode_value(&storage_key, &bytes)?;
            if visitor(key, value)? {
                break;
            }
        }
        Ok(())
    }
}
