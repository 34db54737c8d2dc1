use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::Mutex;
use crate::error::TransportError;
use crate::rpc_stream::{Metadata, RpcStream};

pub const DEFAULT_BUFFER: usize = 16;

const TAG: &str = "MemoryStream";

/// What the peer end of a [`MemoryStream`] observes, in call order.
#[derive(Clone, Debug, PartialEq)]
pub enum PeerEvent<S> {
    Message(S),
    End,
    Cancel,
}

/// In-process [`RpcStream`] backed by tokio channels.
///
/// Outbound calls are delivered to the paired [`MemoryPeer`] as [`PeerEvent`]s.
/// Reads take from a bounded channel the peer fills; `recv` on it is cancel-safe, so
/// an abandoned read never swallows a message.
pub struct MemoryStream<S, R> {
    metadata: Metadata,
    outbound: mpsc::UnboundedSender<PeerEvent<S>>,
    inbound: Mutex<mpsc::Receiver<R>>,
}

pub struct MemoryPeer<S, R> {
    events: mpsc::UnboundedReceiver<PeerEvent<S>>,
    responses: Option<mpsc::Sender<R>>,
}

pub fn pair<S, R>(buffer: usize) -> (MemoryStream<S, R>, MemoryPeer<S, R>) {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (response_tx, response_rx) = mpsc::channel(buffer);

    let stream = MemoryStream {
        metadata: Metadata::new(),
        outbound: event_tx,
        inbound: Mutex::new(response_rx),
    };
    let peer = MemoryPeer {
        events: event_rx,
        responses: Some(response_tx),
    };
    (stream, peer)
}

impl<S, R> MemoryStream<S, R> {
    pub fn with_metadata(mut self, metadata: Metadata) -> MemoryStream<S, R> {
        self.metadata = metadata;
        self
    }

    fn deliver(&self, event: PeerEvent<S>) -> Result<(), TransportError> {
        self.outbound.send(event).map_err(|_| {
            tracing::trace!("[{}] Peer dropped, outbound call failed", TAG);
            TransportError::new("memory stream peer is gone")
        })
    }
}

#[async_trait]
impl<S, R> RpcStream for MemoryStream<S, R>
where
    S: Send + 'static,
    R: Send + 'static,
{
    type Outbound = S;
    type Inbound = R;

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    async fn recv_message(&self) -> Result<Option<R>, TransportError> {
        Ok(self.inbound.lock().await.recv().await)
    }

    async fn send_message(&self, message: S) -> Result<(), TransportError> {
        self.deliver(PeerEvent::Message(message))
    }

    async fn end(&self) -> Result<(), TransportError> {
        self.deliver(PeerEvent::End)
    }

    async fn cancel(&self) -> Result<(), TransportError> {
        self.deliver(PeerEvent::Cancel)
    }
}

impl<S, R> MemoryPeer<S, R> {
    /// Next call made on the stream side, or `None` once that side is dropped.
    pub async fn next_event(&mut self) -> Option<PeerEvent<S>> {
        self.events.recv().await
    }

    /// Non-blocking variant of [`MemoryPeer::next_event`].
    pub fn try_next_event(&mut self) -> Option<PeerEvent<S>> {
        self.events.try_recv().ok()
    }

    pub async fn respond(&self, message: R) -> Result<(), TransportError> {
        let Some(responses) = &self.responses else {
            return Err(TransportError::new("memory stream peer already closed"));
        };
        responses
            .send(message)
            .await
            .map_err(|_| TransportError::new("memory stream was dropped"))
    }

    /// Finish the inbound side; once buffered messages are read the stream reports end of stream.
    pub fn close(&mut self) {
        self.responses = None;
    }
}
