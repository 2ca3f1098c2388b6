use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast;

use crate::config::DEFAULT_ROOM;
use crate::protocol::ChannelEvent;
use crate::relay::RelayState;
use crate::transport::{Envelope, RoomMember};

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub room: Option<String>,
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsQuery>,
    State(state): State<RelayState>,
) -> impl IntoResponse {
    let room = params
        .room
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_ROOM)
        .to_string();

    tracing::info!("WebSocket connection request for room '{}'", room);

    ws.on_upgrade(move |socket| handle_socket(socket, room, state))
}

/// Relay frames between one socket and the rest of its room
async fn handle_socket(socket: WebSocket, room: String, state: RelayState) {
    let (mut sender, mut receiver) = socket.split();
    let RoomMember {
        origin,
        sender: room_tx,
        receiver: mut room_rx,
    } = state.hub.join(&room).await;

    tracing::info!("Member {} joined room '{}'", origin, room);

    loop {
        tokio::select! {
            // Events from other members of the room
            envelope = room_rx.recv() => {
                match envelope {
                    Ok(envelope) if envelope.origin == origin => {}
                    Ok(envelope) => {
                        if let Ok(json) = envelope.event.encode() {
                            if sender.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("Member {} in room '{}' lagged, {} events lost", origin, room, skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            // Frames from this socket
            ws_msg = receiver.next() => {
                match ws_msg {
                    Some(Ok(Message::Text(text))) => {
                        match ChannelEvent::decode(text.as_str()) {
                            Ok(event) => {
                                tracing::debug!("Room '{}' relaying {} event", room, event.name());
                                state.observe(&room, &event).await;
                                // Ignore send errors (nobody else in the room is fine)
                                let _ = room_tx.send(Envelope { origin, event });
                            }
                            Err(e) => {
                                tracing::debug!("Dropping unreadable frame in room '{}': {}", room, e);
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) => break,
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!("WebSocket error in room '{}': {}", room, e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    drop(room_rx);
    drop(room_tx);
    state.hub.prune(&room).await;
    tracing::info!("Member {} left room '{}'", origin, room);
}
