use crate::common::events::EventPublisher;
use crate::common::store::DocumentStore;
use crate::usecases::transactions::RetryPolicy;

pub trait Context: Sync + Send {
    fn store(&self) -> &dyn DocumentStore;
    fn events(&self) -> &dyn EventPublisher;
    fn retry_policy(&self) -> RetryPolicy;
}
