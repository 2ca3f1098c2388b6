use crate::channel::{ConnectionStatus, Inbound, Outbound};
use crate::protocol::{ChannelEvent, DurableRecord};
use crate::transport::{DurableStore, Publisher};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Spawn a background task that forwards channel events to the session.
///
/// When the subscription stream ends the session is told the channel is
/// gone by a `Disconnected` status.
pub fn spawn_event_reader(
    mut events: BoxStream<'static, ChannelEvent>,
    inbound: mpsc::UnboundedSender<Inbound>,
    room: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.next().await {
            tracing::debug!("Room '{}' received {} event", room, event.name());
            if inbound.send(Inbound::Event(event)).is_err() {
                // Session went away
                return;
            }
        }

        tracing::info!("Room '{}' channel closed", room);
        let _ = inbound.send(Inbound::Status(ConnectionStatus::Disconnected));
    })
}

/// Spawn a background task draining the outbound queue.
///
/// Sends are fire-and-forget: failures are logged and dropped, never retried.
pub fn spawn_sender(
    publisher: Box<dyn Publisher>,
    store: Option<Arc<dyn DurableStore>>,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    room: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(Outbound { event, record }) = outbound.recv().await {
            if let Err(e) = publisher.publish(&event).await {
                tracing::warn!("Failed to send {} event to room '{}': {}", event.name(), room, e);
            }

            if let (Some(store), Some(record)) = (store.clone(), record) {
                tokio::spawn(persist(store, record));
            }
        }
    })
}

/// Best-effort durable upsert of a sent event
pub async fn persist(store: Arc<dyn DurableStore>, record: DurableRecord) {
    match store.upsert(&record).await {
        Ok(()) => tracing::debug!("Stored {} row", record.table()),
        Err(e) if e.is_missing_relation() => {
            tracing::debug!("Relation '{}' missing, skipping durable write", record.table());
        }
        Err(e) => tracing::warn!("Durable write to '{}' failed: {}", record.table(), e),
    }
}
