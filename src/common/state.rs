use crate::common::context::Context;
use crate::common::events::EventPublisher;
use crate::common::store::DocumentStore;
use crate::usecases::transactions::RetryPolicy;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub events: Arc<dyn EventPublisher>,
    pub retry_policy: RetryPolicy,
}

impl Context for AppState {
    fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    fn events(&self) -> &dyn EventPublisher {
        self.events.as_ref()
    }

    fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }
}
