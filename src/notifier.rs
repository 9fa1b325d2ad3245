//! In-process change notifications, keyed by collection.
//!
//! Services publish after a successful commit. Payloads only say *what*
//! changed, never the new state, so observers re-fetch through the services.
//! Delivery is best effort: slow subscribers may miss events.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Events,
    Participants,
    Draws,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Events,
        Collection::Participants,
        Collection::Draws,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::Events => "events",
            Collection::Participants => "participants",
            Collection::Draws => "draws",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub collection: Collection,
    pub kind: ChangeKind,
    /// Owning event, so observers can decide whether to re-fetch
    pub event_id: Uuid,
}

impl ChangeEvent {
    pub fn new(collection: Collection, kind: ChangeKind, event_id: Uuid) -> Self {
        Self {
            collection,
            kind,
            event_id,
        }
    }
}

/// Cloneable hub with one broadcast channel per collection.
#[derive(Clone)]
pub struct ChangeNotifier {
    channels: Arc<HashMap<Collection, broadcast::Sender<ChangeEvent>>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Collection::ALL
            .into_iter()
            .map(|c| (c, broadcast::channel(capacity).0))
            .collect();
        Self {
            channels: Arc::new(channels),
        }
    }

    /// Fire-and-forget. Returns how many subscribers saw the event.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        self.channels
            .get(&event.collection)
            .and_then(|tx| tx.send(event).ok())
            .unwrap_or(0)
    }

    pub fn subscribe(&self, collection: Collection) -> broadcast::Receiver<ChangeEvent> {
        // every collection gets a channel in with_capacity
        self.channels[&collection].subscribe()
    }

    /// Run `callback` for every change to `collection` until the returned
    /// handle is cancelled or dropped. Must be called inside a tokio runtime.
    pub fn on_change<F>(&self, collection: Collection, mut callback: F) -> Subscription
    where
        F: FnMut(ChangeEvent) + Send + 'static,
    {
        let mut rx = self.subscribe(collection);
        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => callback(event),
                    Err(RecvError::Lagged(n)) => {
                        log::warn!(
                            "Change observer for {} lagged, {n} event(s) skipped",
                            collection.table_name()
                        );
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        Subscription {
            handle: Some(handle),
        }
    }

    pub fn subscriber_count(&self, collection: Collection) -> usize {
        self.channels
            .get(&collection)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("channels", &self.channels.len())
            .finish()
    }
}

/// Cancellation handle returned by [`ChangeNotifier::on_change`].
#[derive(Debug)]
pub struct Subscription {
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn cancel(mut self) {
        self.abort();
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_publish_subscribe_roundtrip() {
        let notifier = ChangeNotifier::new();
        let mut rx = notifier.subscribe(Collection::Draws);
        let event = ChangeEvent::new(Collection::Draws, ChangeKind::Insert, Uuid::new_v4());

        assert_eq!(notifier.publish(event.clone()), 1);
        assert_eq!(rx.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_noop() {
        let notifier = ChangeNotifier::new();
        let sent = notifier.publish(ChangeEvent::new(
            Collection::Events,
            ChangeKind::Update,
            Uuid::new_v4(),
        ));
        assert_eq!(sent, 0);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let notifier = ChangeNotifier::new();
        let mut events_rx = notifier.subscribe(Collection::Events);
        notifier.publish(ChangeEvent::new(
            Collection::Participants,
            ChangeKind::Insert,
            Uuid::new_v4(),
        ));
        assert!(matches!(
            events_rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_on_change_until_cancelled() {
        let notifier = ChangeNotifier::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sub = notifier.on_change(Collection::Participants, move |e| {
            let _ = tx.send(e);
        });
        assert!(sub.is_active());
        assert_eq!(notifier.subscriber_count(Collection::Participants), 1);

        let event_id = Uuid::new_v4();
        notifier.publish(ChangeEvent::new(
            Collection::Participants,
            ChangeKind::Insert,
            event_id,
        ));
        let got = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got.event_id, event_id);

        sub.cancel();
        // the aborted task releases its receiver, which closes the callback's sender
        let closed = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert!(closed.is_none());
        assert_eq!(notifier.subscriber_count(Collection::Participants), 0);
    }
}
