//! Push-channel transport.
//!
//! A [`PushSource`] opens one connection and yields raw text frames. It knows
//! nothing about message types or the view model; decoding and dispatch live
//! in the store crate.

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info};
use url::Url;

use crate::error::FetchError;

/// Default push-channel path.
pub const DEFAULT_PUSH_PATH: &str = "/ws";

/// Stream of inbound text frames.
///
/// A close frame from the peer surfaces as [`FetchError::ChannelClosed`].
pub type FrameStream = BoxStream<'static, Result<String, FetchError>>;

// ============================================================================
// Push Source Trait
// ============================================================================

/// Something that can open a push connection.
#[async_trait]
pub trait PushSource: Send + Sync {
    /// Opens the connection.
    async fn connect(&self) -> Result<FrameStream, FetchError>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

// ============================================================================
// WebSocket Source
// ============================================================================

/// [`PushSource`] over a WebSocket.
///
/// Only inbound frames are consumed; nothing is ever sent.
#[derive(Debug, Clone)]
pub struct WebSocketSource {
    url: Url,
}

impl WebSocketSource {
    /// Creates a source for `url` (`ws://` or `wss://`).
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    /// The connection URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl PushSource for WebSocketSource {
    async fn connect(&self) -> Result<FrameStream, FetchError> {
        let (socket, response) = tokio_tungstenite::connect_async(self.url.as_str()).await?;
        info!(url = %self.url, status = %response.status(), "Push channel connected");

        let frames = socket.filter_map(|message| async move { frame_text(message) });
        Ok(frames.boxed())
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// Maps a WebSocket message to a text frame, dropping ping and pong.
fn frame_text(
    message: Result<Message, tokio_tungstenite::tungstenite::Error>,
) -> Option<Result<String, FetchError>> {
    match message {
        Ok(Message::Text(text)) => Some(Ok(text)),
        Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
            Ok(text) => Some(Ok(text)),
            Err(_) => {
                debug!("Dropping non-UTF-8 binary frame");
                None
            }
        },
        Ok(Message::Close(frame)) => {
            debug!(frame = ?frame, "Push channel close frame");
            Some(Err(FetchError::ChannelClosed))
        }
        Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => None,
        Err(e) => Some(Err(e.into())),
    }
}

// ============================================================================
// Tests
// ============================================================================
