use futures::stream::{Stream, StreamExt};
use futures::pin_mut;
use crate::error::{Error, Result};
use crate::rpc_stream::RpcStream;

/// Push every message produced by `producer` into `stream`, signal end of input,
/// then wait for the single terminal response.
///
/// Sends happen in producer order, `end()` is issued exactly once after the
/// producer is exhausted, and only then is the response read. The first
/// transport failure aborts the drain; nothing further is issued on the stream.
pub async fn drain_to_stream<St, P>(stream: &St, producer: P) -> Result<St::Inbound>
where
    St: RpcStream + ?Sized,
    P: Stream<Item = St::Outbound>,
{
    pin_mut!(producer);

    let mut sent = 0usize;
    while let Some(message) = producer.next().await {
        stream.send_message(message).await?;
        sent += 1;
    }
    stream.end().await?;
    tracing::debug!("Streamed all {} messages to peer, waiting for completion", sent);

    match stream.recv_message().await? {
        Some(response) => {
            tracing::debug!("Peer completed");
            Ok(response)
        }
        None => Err(Error::ProtocolViolation("stream closed without a terminal response")),
    }
}
