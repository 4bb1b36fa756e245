use std::{fmt, sync::Arc};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    event::{EventRecord, EventType},
    projection::HistoryQuery,
    result::NdsResult,
};

/// Callback for records delivered by an [`EventBus`].
///
/// Handlers see records by reference and cannot change them. A failing
/// handler is the handler's problem: it never fails the publish.
pub trait EventHandler: Send + Sync {
    fn handle(&self, record: &EventRecord);
}

impl<F> EventHandler for F
where
    F: Fn(&EventRecord) + Send + Sync,
{
    fn handle(&self, record: &EventRecord) {
        self(record)
    }
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe later.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(String);

impl SubscriptionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Write side of the economy.
///
/// A successful [`EventBus::publish`] means the record is persisted. It does
/// not mean subscribers have seen it yet.
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, record: EventRecord) -> NdsResult<()>;

    /// Only records of `event_type` reach the handler.
    fn subscribe(&self, event_type: EventType, handler: Arc<dyn EventHandler>) -> SubscriptionId;

    fn subscribe_all(&self, handler: Arc<dyn EventHandler>) -> SubscriptionId;

    /// Unknown ids are ignored.
    fn unsubscribe(&self, subscription_id: &SubscriptionId);

    async fn query_history(&self, query: &HistoryQuery) -> NdsResult<Vec<EventRecord>>;
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{event::Event, identity::Identity};

    #[test]
    fn closures_are_handlers() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let handler: Arc<dyn EventHandler> = Arc::new(move |record: &EventRecord| {
            sink.lock().unwrap().push(record.event().event_type());
        });

        let record: EventRecord = Event::builder()
            .actor(Identity::player("alice").unwrap())
            .event_type(EventType::AssetCreated)
            .build()
            .unwrap()
            .into();
        handler.handle(&record);
        assert_eq!(*seen.lock().unwrap(), [EventType::AssetCreated]);
    }

    #[test]
    fn subscription_ids_are_unique() {
        let id = SubscriptionId::generate();
        assert_ne!(id, SubscriptionId::generate());
        assert_eq!(id.to_string(), id.as_str());
    }
}
