#![allow(dead_code)]

use relationship_service::adapters::local_events::LocalPublisher;
use relationship_service::adapters::memory_store::MemoryStore;
use relationship_service::common::state::AppState;
use relationship_service::common::store::{DocumentPath, DocumentStore};
use relationship_service::models::counters::Counters;
use relationship_service::usecases::relationships;
use relationship_service::usecases::transactions::RetryPolicy;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

pub struct TestApp {
    pub state: AppState,
    pub store: MemoryStore,
    pub events: Arc<LocalPublisher>,
}

pub fn app_with_attempts(max_attempts: u32) -> TestApp {
    let store = MemoryStore::new();
    let events = Arc::new(LocalPublisher::new(64));
    let state = AppState {
        store: Arc::new(store.clone()),
        events: events.clone(),
        retry_policy: RetryPolicy {
            max_attempts,
            base_backoff: Duration::from_millis(1),
        },
    };
    TestApp {
        state,
        store,
        events,
    }
}

pub fn app() -> TestApp {
    app_with_attempts(5)
}

impl TestApp {
    pub async fn put<T: Serialize>(&self, collection: &'static str, id: &str, value: &T) {
        let mut tx = self.store.begin().await.unwrap();
        tx.set(DocumentPath::new(collection, id), value).unwrap();
        tx.commit().await.unwrap();
    }

    pub async fn get<T: DeserializeOwned>(&self, collection: &'static str, id: &str) -> Option<T> {
        let mut tx = self.store.begin().await.unwrap();
        tx.get_as(&DocumentPath::new(collection, id)).await.unwrap()
    }

    pub async fn exists(&self, collection: &'static str, id: &str) -> bool {
        let mut tx = self.store.begin().await.unwrap();
        tx.get(&DocumentPath::new(collection, id))
            .await
            .unwrap()
            .is_some()
    }

    pub async fn counters(&self, uid: &str) -> Counters {
        relationships::fetch_counters(&self.state, uid).await.unwrap()
    }
}

pub fn counters(outgoing_count: i64, incoming_count: i64, friends_count: i64) -> Counters {
    Counters {
        outgoing_count,
        incoming_count,
        friends_count,
    }
}
