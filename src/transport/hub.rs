use super::{Publisher, Subscription, Transport};
use crate::error::TransportError;
use crate::protocol::ChannelEvent;
use crate::types::RoomId;
use async_trait::async_trait;
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// An event tagged with the member that sent it
#[derive(Debug, Clone)]
pub struct Envelope {
    pub origin: u64,
    pub event: ChannelEvent,
}

/// One membership in a room
pub struct RoomMember {
    pub origin: u64,
    pub sender: broadcast::Sender<Envelope>,
    pub receiver: broadcast::Receiver<Envelope>,
}

impl RoomMember {
    pub fn publish(&self, event: ChannelEvent) {
        // Ignore send errors (no other receivers is fine)
        let _ = self.sender.send(Envelope {
            origin: self.origin,
            event,
        });
    }
}

/// Per-room broadcast channels, shared by the relay server and
/// in-process clients
#[derive(Clone)]
pub struct RoomHub {
    rooms: Arc<RwLock<HashMap<RoomId, broadcast::Sender<Envelope>>>>,
    capacity: usize,
    next_origin: Arc<AtomicU64>,
}

impl RoomHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
            next_origin: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Join a room, creating its channel on first use
    pub async fn join(&self, room: &str) -> RoomMember {
        let mut rooms = self.rooms.write().await;
        let sender = rooms
            .entry(room.to_string())
            .or_insert_with(|| {
                tracing::debug!("Opening room channel '{}'", room);
                broadcast::channel(self.capacity).0
            })
            .clone();

        RoomMember {
            origin: self.next_origin.fetch_add(1, Ordering::Relaxed),
            receiver: sender.subscribe(),
            sender,
        }
    }

    /// Drop the room's channel once nobody listens anymore
    pub async fn prune(&self, room: &str) {
        let mut rooms = self.rooms.write().await;
        if rooms
            .get(room)
            .is_some_and(|sender| sender.receiver_count() == 0)
        {
            rooms.remove(room);
            tracing::debug!("Closed empty room channel '{}'", room);
        }
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    pub async fn member_count(&self, room: &str) -> usize {
        self.rooms
            .read()
            .await
            .get(room)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}

impl Default for RoomHub {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Transport over an in-process [`RoomHub`]
#[derive(Clone)]
pub struct HubTransport {
    hub: RoomHub,
}

impl HubTransport {
    pub fn new(hub: RoomHub) -> Self {
        Self { hub }
    }
}

struct HubPublisher {
    origin: u64,
    sender: broadcast::Sender<Envelope>,
}

#[async_trait]
impl Publisher for HubPublisher {
    async fn publish(&self, event: &ChannelEvent) -> Result<(), TransportError> {
        let _ = self.sender.send(Envelope {
            origin: self.origin,
            event: event.clone(),
        });
        Ok(())
    }
}

#[async_trait]
impl Transport for HubTransport {
    async fn subscribe(&self, room: &str) -> Result<Subscription, TransportError> {
        let member = self.hub.join(room).await;
        let origin = member.origin;
        let room = room.to_string();

        let events = futures::stream::unfold(member.receiver, move |mut rx| {
            let room = room.clone();
            async move {
                loop {
                    match rx.recv().await {
                        Ok(envelope) if envelope.origin == origin => continue,
                        Ok(envelope) => return Some((envelope.event, rx)),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!("Room '{}' lagged, {} events lost", room, skipped);
                        }
                        Err(broadcast::error::RecvError::Closed) => return None,
                    }
                }
            }
        })
        .boxed();

        Ok(Subscription {
            publisher: Box::new(HubPublisher {
                origin,
                sender: member.sender,
            }),
            events,
        })
    }
}
