//! Collaborators behind the channel adapter: a room-scoped pub/sub
//! transport and an optional durable record store.

mod hub;
mod rest;
mod ws;

pub use hub::{Envelope, HubTransport, RoomHub, RoomMember};
pub use rest::RestStore;
pub use ws::{channel_url, WsTransport};

use crate::error::{StoreError, TransportError};
use crate::protocol::{ChannelEvent, DurableRecord};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Room-scoped broadcast with no delivery or ordering guarantee
#[async_trait]
pub trait Transport: Send + Sync {
    /// Join the room channel. Resolves once the handshake succeeded.
    async fn subscribe(&self, room: &str) -> Result<Subscription, TransportError>;
}

/// Sending half of a subscription
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Broadcast to every other member of the room. Members never
    /// receive their own events.
    async fn publish(&self, event: &ChannelEvent) -> Result<(), TransportError>;
}

/// An established room subscription
pub struct Subscription {
    pub publisher: Box<dyn Publisher>,
    /// Events from other members; ends when the channel goes away
    pub events: BoxStream<'static, ChannelEvent>,
}

/// Best-effort durable copy of sent events
#[async_trait]
pub trait DurableStore: Send + Sync {
    async fn upsert(&self, record: &DurableRecord) -> Result<(), StoreError>;
}
