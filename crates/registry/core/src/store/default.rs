use std::{collections::BTreeMap, sync::Arc};

use displaydoc::Display;
use tokio::sync::RwLock;

use crate::{
    state::{Computation, ComputationId},
    store::Store,
};

/// An in-memory, thread-safe store.
#[derive(Clone, Debug, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<BTreeMap<ComputationId, Computation>>>,
}

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Display)]
pub enum StoreError {
    /// computation {0} already exists
    AlreadyExists(ComputationId),
}

#[async_trait::async_trait]
impl Store for SharedStore {
    type Error = StoreError;

    async fn create(&self, computation: Computation) -> Result<(), Self::Error> {
        let mut inner = self.inner.write().await;
        let id = computation.id();
        if inner.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        inner.insert(id, computation);
        Ok(())
    }

    async fn with_computation<F, T>(
        &self,
        id: ComputationId,
        f: F,
    ) -> Result<Option<T>, Self::Error>
    where
        F: FnOnce(&mut Computation) -> T + Send,
        T: Send,
    {
        let mut inner = self.inner.write().await;
        Ok(inner.get_mut(&id).map(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Role;

    async fn seeded_store() -> (SharedStore, ComputationId) {
        let id = ComputationId::generate();
        let computation = Computation::create(
            id,
            "race".to_string(),
            vec![0; 33],
            vec![Role::CodeProvider, Role::DataProvider, Role::ResultConsumer],
        )
        .unwrap();

        let store = SharedStore::new();
        store.create(computation).await.unwrap();
        (store, id)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_duplicate_registrations_have_one_winner() {
        let (store, id) = seeded_store().await;

        let mut handles = Vec::new();
        for tag in 1..=8u8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .with_computation(id, |c| c.register(Role::DataProvider, vec![tag; 33]))
                    .await
                    .unwrap()
                    .unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn unknown_id_yields_none() {
        let store = SharedStore::new();
        let result = store
            .with_computation(ComputationId::generate(), |c| c.phase())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn duplicate_create_is_rejected() {
        let (store, id) = seeded_store().await;
        let duplicate = Computation::create(
            id,
            "race".to_string(),
            vec![0; 33],
            vec![Role::CodeProvider, Role::DataProvider, Role::ResultConsumer],
        )
        .unwrap();
        assert!(store.create(duplicate).await.is_err());
    }
}
