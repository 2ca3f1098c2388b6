//! Room channel adapter: owns the subscription for the current room,
//! tracks connectivity and turns sends into background work.

use crate::broadcast::{spawn_event_reader, spawn_sender};
use crate::config::SyncConfig;
use crate::protocol::{ChannelEvent, DurableRecord, PlacementEvent, ScoreEvent};
use crate::transport::{DurableStore, RestStore, Transport, WsTransport};
use crate::types::RoomId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Connectivity as shown by the status badge
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Disconnected,
    Connected,
    Error,
}

/// Message from the background reader to the session
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Event(ChannelEvent),
    Status(ConnectionStatus),
}

/// Queued send, with the durable row to upsert alongside it
#[derive(Debug, Clone)]
pub struct Outbound {
    pub event: ChannelEvent,
    pub record: Option<DurableRecord>,
}

pub struct ChannelAdapter {
    transport: Option<Arc<dyn Transport>>,
    store: Option<Arc<dyn DurableStore>>,
    status: ConnectionStatus,
    room: Option<RoomId>,
    outbound: Option<mpsc::UnboundedSender<Outbound>>,
    inbound_tx: mpsc::UnboundedSender<Inbound>,
    inbound_rx: mpsc::UnboundedReceiver<Inbound>,
    tasks: Vec<JoinHandle<()>>,
}

impl ChannelAdapter {
    pub fn new(transport: Option<Arc<dyn Transport>>, store: Option<Arc<dyn DurableStore>>) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        Self {
            transport,
            store,
            status: ConnectionStatus::Disconnected,
            room: None,
            outbound: None,
            inbound_tx,
            inbound_rx,
            tasks: Vec::new(),
        }
    }

    /// Adapter without a transport: every send is a no-op
    pub fn offline() -> Self {
        Self::new(None, None)
    }

    /// Build the adapter for the configured relay, or an offline one
    pub fn from_config(config: &SyncConfig) -> Self {
        match (&config.endpoint, &config.access_key) {
            (Some(endpoint), Some(key)) => {
                let transport: Arc<dyn Transport> =
                    Arc::new(WsTransport::new(endpoint.clone(), Some(key.clone())));
                let store = config.durable_writes.then(|| {
                    Arc::new(RestStore::new(endpoint.clone(), key.clone())) as Arc<dyn DurableStore>
                });
                Self::new(Some(transport), store)
            }
            _ => Self::offline(),
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_some()
    }

    /// Whether sends currently reach the room
    pub fn is_established(&self) -> bool {
        self.status == ConnectionStatus::Connected && self.outbound.is_some()
    }

    /// Subscribe to `room`, tearing down any previous subscription first.
    ///
    /// Failures only show up in the returned status.
    pub async fn connect(&mut self, room: &str) -> ConnectionStatus {
        self.teardown();
        self.room = Some(room.to_string());

        let Some(transport) = self.transport.clone() else {
            tracing::debug!("No transport configured, staying local");
            return self.status;
        };

        match transport.subscribe(room).await {
            Ok(subscription) => {
                let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
                self.tasks.push(spawn_event_reader(
                    subscription.events,
                    self.inbound_tx.clone(),
                    room.to_string(),
                ));
                self.tasks.push(spawn_sender(
                    subscription.publisher,
                    self.store.clone(),
                    outbound_rx,
                    room.to_string(),
                ));
                self.outbound = Some(outbound_tx);
                self.status = ConnectionStatus::Connected;
                tracing::info!("Connected to room '{}'", room);
            }
            Err(e) => {
                tracing::warn!("Failed to subscribe to room '{}': {}", room, e);
                self.status = ConnectionStatus::Error;
            }
        }
        self.status
    }

    /// Drop the current subscription. Events still queued from it are
    /// discarded.
    pub fn teardown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        self.outbound = None;
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        self.inbound_tx = inbound_tx;
        self.inbound_rx = inbound_rx;
        if let Some(room) = self.room.take() {
            tracing::debug!("Left room '{}'", room);
        }
        self.status = ConnectionStatus::Disconnected;
    }

    pub fn set_status(&mut self, status: ConnectionStatus) {
        if self.status != status {
            tracing::debug!("Channel status {:?} -> {:?}", self.status, status);
            self.status = status;
        }
        if status != ConnectionStatus::Connected {
            self.outbound = None;
        }
    }

    fn enqueue(&self, event: ChannelEvent, record: Option<DurableRecord>) {
        if !self.is_established() {
            return;
        }
        if let Some(outbound) = &self.outbound {
            tracing::debug!("Queueing {} event", event.name());
            let _ = outbound.send(Outbound { event, record });
        }
    }

    pub fn emit_placement(&self, event: PlacementEvent) {
        let record = match (&self.store, &self.room) {
            (Some(_), Some(room)) => Some(DurableRecord::for_placement(room, &event)),
            _ => None,
        };
        self.enqueue(ChannelEvent::Placement(event), record);
    }

    pub fn emit_score(&self, event: ScoreEvent) {
        let record = self
            .store
            .as_ref()
            .map(|_| DurableRecord::for_score(&event));
        self.enqueue(ChannelEvent::Score(event), record);
    }

    pub fn emit_reset(&self) {
        self.enqueue(ChannelEvent::reset(), None);
    }

    fn absorb(&mut self, inbound: Inbound) -> Option<ChannelEvent> {
        match inbound {
            Inbound::Event(event) => Some(event),
            Inbound::Status(status) => {
                self.set_status(status);
                None
            }
        }
    }

    /// Next queued room event without waiting. Status changes are applied
    /// on the way.
    pub fn try_recv(&mut self) -> Option<ChannelEvent> {
        while let Ok(inbound) = self.inbound_rx.try_recv() {
            if let Some(event) = self.absorb(inbound) {
                return Some(event);
            }
        }
        None
    }

    /// Wait for the next room event. Pends forever while nothing arrives.
    pub async fn recv(&mut self) -> Option<ChannelEvent> {
        loop {
            let inbound = self.inbound_rx.recv().await?;
            if let Some(event) = self.absorb(inbound) {
                return Some(event);
            }
        }
    }
}

impl Drop for ChannelAdapter {
    fn drop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}
