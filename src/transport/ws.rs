use super::{Publisher, Subscription, Transport};
use crate::error::TransportError;
use crate::protocol::ChannelEvent;
use async_trait::async_trait;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use reqwest::Url;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Websocket URL of a room channel on the relay at `base_url`.
///
/// `http(s)` base URLs are mapped to `ws(s)`; a path prefix is kept.
pub fn channel_url(base_url: &str, room: &str) -> Result<Url, TransportError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", base_url, e)))?;

    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(TransportError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                other
            )))
        }
    };
    url.set_scheme(scheme)
        .map_err(|_| TransportError::InvalidUrl(base_url.to_string()))?;

    url.path_segments_mut()
        .map_err(|_| TransportError::InvalidUrl(base_url.to_string()))?
        .pop_if_empty()
        .push("ws");
    url.query_pairs_mut().clear().append_pair("room", room);
    Ok(url)
}

/// Transport talking to the relay server over a websocket
#[derive(Debug, Clone)]
pub struct WsTransport {
    base_url: String,
    access_key: Option<String>,
}

impl WsTransport {
    pub fn new(base_url: String, access_key: Option<String>) -> Self {
        Self {
            base_url,
            access_key,
        }
    }
}

struct WsPublisher {
    sink: Mutex<WsSink>,
}

#[async_trait]
impl Publisher for WsPublisher {
    async fn publish(&self, event: &ChannelEvent) -> Result<(), TransportError> {
        let json = event.encode()?;
        self.sink
            .lock()
            .await
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn subscribe(&self, room: &str) -> Result<Subscription, TransportError> {
        let url = channel_url(&self.base_url, room)?;
        let mut request = url
            .as_str()
            .into_client_request()
            .map_err(|e| TransportError::InvalidUrl(e.to_string()))?;

        if let Some(key) = &self.access_key {
            let value = HeaderValue::from_str(key)
                .map_err(|e| TransportError::Connect(format!("invalid access key: {}", e)))?;
            request.headers_mut().insert("apikey", value);
        }

        let (stream, _response) = connect_async(request)
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        tracing::debug!("Websocket channel open: {}", url);

        let (sink, source) = stream.split();
        let events = futures::stream::unfold(source, |mut source| async move {
            loop {
                match source.next().await? {
                    Ok(Message::Text(text)) => match ChannelEvent::decode(text.as_str()) {
                        Ok(event) => return Some((event, source)),
                        Err(e) => tracing::debug!("Skipping unreadable channel frame: {}", e),
                    },
                    Ok(Message::Close(_)) => return None,
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!("Websocket channel error: {}", e);
                        return None;
                    }
                }
            }
        })
        .boxed();

        Ok(Subscription {
            publisher: Box::new(WsPublisher {
                sink: Mutex::new(sink),
            }),
            events,
        })
    }
}
