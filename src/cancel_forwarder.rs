use futures::stream::{self, Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use crate::error::{Error, Result};
use crate::rpc_stream::RpcStream;
use crate::stop_reader::stop_reader;

enum ForwardState<R> {
    Reading(R),
    Done,
}

/// [`stop_reader`] that also tells the peer when we stopped listening.
///
/// Every message is re-yielded unchanged. Once the inner sequence ends, a set `stop`
/// means consumption was cut short, so exactly one `cancel()` is sent to the stream;
/// an unset `stop` means the peer finished on its own and nothing is sent. A transport
/// error ends the sequence without a cancel.
pub fn cancel_wrapper<St>(
    stream: &St,
    stop: CancellationToken,
) -> impl Stream<Item = Result<St::Inbound>> + Send + '_
where
    St: RpcStream + ?Sized,
{
    let reader = Box::pin(stop_reader(stream, stop.clone()));

    stream::unfold(ForwardState::Reading(reader), move |state| {
        let stop = stop.clone();
        async move {
            let ForwardState::Reading(mut reader) = state else {
                return None;
            };

            match reader.next().await {
                Some(Ok(message)) => Some((Ok(message), ForwardState::Reading(reader))),
                Some(Err(e)) => Some((Err(e), ForwardState::Done)),
                None => {
                    if !stop.is_cancelled() {
                        return None;
                    }
                    // Release the reader before talking to the peer again.
                    drop(reader);
                    tracing::debug!("Consumption stopped, forwarding cancellation to peer");
                    match stream.cancel().await {
                        Ok(()) => None,
                        Err(e) => Some((Err(Error::from(e)), ForwardState::Done)),
                    }
                }
            }
        }
    })
    .fuse()
}
