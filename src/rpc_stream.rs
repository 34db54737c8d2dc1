use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use crate::error::{Error, Result, TransportError};

pub type Metadata = HashMap<String, String>;

/// A bidirectional RPC message stream, as exposed by a transport.
///
/// Every operation takes `&self`: implementations serialize their own I/O, so a
/// reader and a forwarder can share one borrow of the stream. The protocol layer
/// never keeps more than one read and one write outstanding at a time.
#[async_trait]
pub trait RpcStream: Send + Sync {
    type Outbound: Send + 'static;
    type Inbound: Send + 'static;

    /// Populated by the transport before first use.
    fn metadata(&self) -> &Metadata;

    /// Receive one message, or `None` once the peer has finished.
    async fn recv_message(&self) -> std::result::Result<Option<Self::Inbound>, TransportError>;

    async fn send_message(
        &self,
        message: Self::Outbound,
    ) -> std::result::Result<(), TransportError>;

    /// Signal end of input to the peer.
    async fn end(&self) -> std::result::Result<(), TransportError>;

    /// Ask the peer to abort the call.
    async fn cancel(&self) -> std::result::Result<(), TransportError>;
}

macro_rules! forward_rpc_stream {
    ($($ty:ty),*) => {
        $(
            #[async_trait]
            impl<T> RpcStream for $ty
            where
                T: RpcStream + ?Sized,
            {
                type Outbound = T::Outbound;
                type Inbound = T::Inbound;

                fn metadata(&self) -> &Metadata {
                    (**self).metadata()
                }

                async fn recv_message(
                    &self,
                ) -> std::result::Result<Option<Self::Inbound>, TransportError> {
                    (**self).recv_message().await
                }

                async fn send_message(
                    &self,
                    message: Self::Outbound,
                ) -> std::result::Result<(), TransportError> {
                    (**self).send_message(message).await
                }

                async fn end(&self) -> std::result::Result<(), TransportError> {
                    (**self).end().await
                }

                async fn cancel(&self) -> std::result::Result<(), TransportError> {
                    (**self).cancel().await
                }
            }
        )*
    };
}

forward_rpc_stream!(Box<T>, Arc<T>);

/// Read `stream` until end-of-stream with no way to stop early.
///
/// A transport error is yielded once and ends the sequence.
pub fn messages<St>(
    stream: &St,
) -> impl Stream<Item = Result<St::Inbound>> + Send + '_
where
    St: RpcStream + ?Sized,
{
    stream::unfold(true, move |open| async move {
        if !open {
            return None;
        }
        match stream.recv_message().await {
            Ok(Some(message)) => Some((Ok(message), true)),
            Ok(None) => None,
            Err(e) => Some((Err(Error::from(e)), false)),
        }
    })
    .fuse()
}
