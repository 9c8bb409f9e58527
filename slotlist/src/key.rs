use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::options::KeyExtractor;
use crate::ItemKey;

pub(crate) type KeyMap<V> = HashMap<ItemKey, V>;

/// Fallback key for lists without a key extractor.
pub(crate) fn index_key(index: usize) -> ItemKey {
    Arc::from(index.to_string())
}

/// Bidirectional index ⇄ key mapping for the current data array.
#[derive(Clone, Debug, Default)]
pub(crate) struct KeyIndex {
    ids: Vec<ItemKey>,
    index_by_key: KeyMap<usize>,
}

impl KeyIndex {
    /// Builds the identity cache for `data`.
    ///
    /// Nothing is returned on duplicate keys so the caller can keep its previous state.
    pub(crate) fn build<T>(data: &[T], extractor: Option<&KeyExtractor<T>>) -> Result<Self> {
        let mut ids = Vec::with_capacity(data.len());
        let mut index_by_key = KeyMap::with_capacity(data.len());
        for (index, item) in data.iter().enumerate() {
            let key = match extractor {
                Some(extract) => extract(item, index),
                None => index_key(index),
            };
            if let Some(&first) = index_by_key.get(&key) {
                return Err(Error::DuplicateKey {
                    key,
                    first,
                    second: index,
                });
            }
            index_by_key.insert(Arc::clone(&key), index);
            ids.push(key);
        }
        Ok(Self { ids, index_by_key })
    }

    pub(crate) fn key(&self, index: usize) -> Option<&ItemKey> {
        self.ids.get(index)
    }

    pub(crate) fn index_of(&self, key: &str) -> Option<usize> {
        self.index_by_key.get(key).copied()
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.index_by_key.contains_key(key)
    }

    pub(crate) fn keys(&self) -> &[ItemKey] {
        &self.ids
    }
}
