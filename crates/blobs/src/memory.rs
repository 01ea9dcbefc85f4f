// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{BlobFailure, BlobSource, BlobUnavailableError};
use async_trait::async_trait;
use electora_utils::TransactionRef;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Blob source backed by a map. Useful for local runs and tests.
#[derive(Clone, Default)]
pub struct InMemoryBlobStore {
    data: Arc<RwLock<HashMap<TransactionRef, Vec<u8>>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, tx: TransactionRef, ciphertext: Vec<u8>) {
        self.data.write().await.insert(tx, ciphertext);
    }
}

impl FromIterator<(TransactionRef, Vec<u8>)> for InMemoryBlobStore {
    fn from_iter<I: IntoIterator<Item = (TransactionRef, Vec<u8>)>>(items: I) -> Self {
        Self {
            data: Arc::new(RwLock::new(items.into_iter().collect())),
        }
    }
}

#[async_trait]
impl BlobSource for InMemoryBlobStore {
    async fn fetch(&self, tx: &TransactionRef) -> Result<Vec<u8>, BlobUnavailableError> {
        match self.data.read().await.get(tx) {
            Some(bytes) if bytes.is_empty() => {
                Err(BlobUnavailableError::new(tx, BlobFailure::Empty))
            }
            Some(bytes) => Ok(bytes.clone()),
            None => Err(BlobUnavailableError::new(tx, BlobFailure::NotFound)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_present_and_missing() {
        let store: InMemoryBlobStore = [(TransactionRef::new("a"), vec![1, 2, 3])]
            .into_iter()
            .collect();
        assert_eq!(store.fetch(&TransactionRef::new("a")).await.unwrap(), vec![1, 2, 3]);

        let err = store.fetch(&TransactionRef::new("b")).await.unwrap_err();
        assert!(matches!(err.cause, BlobFailure::NotFound));

        store.insert(TransactionRef::new("c"), vec![]).await;
        let err = store.fetch(&TransactionRef::new("c")).await.unwrap_err();
        assert!(matches!(err.cause, BlobFailure::Empty));
    }
}
