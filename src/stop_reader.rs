use futures::stream::{self, Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use crate::error::{Error, Result};
use crate::rpc_stream::RpcStream;

/// Read `stream` until it ends or until `stop` is cancelled, whichever comes first.
///
/// Every pull races one `recv_message()` against `stop.cancelled()`. When the stop
/// signal wins, the pending read future is dropped on the spot and its result is
/// never yielded; the sequence then ends without an error. When both are ready in the
/// same poll, stop wins. A transport error is yielded once and ends the sequence.
///
/// The returned stream is fused, and dropping it drops any read still in flight.
pub fn stop_reader<St>(
    stream: &St,
    stop: CancellationToken,
) -> impl Stream<Item = Result<St::Inbound>> + Send + '_
where
    St: RpcStream + ?Sized,
{
    stream::unfold(Some(stop), move |stop| async move {
        let Some(stop) = stop else {
            return None;
        };

        if stop.is_cancelled() {
            tracing::trace!("Stop signal already set, not issuing a read");
            return None;
        }

        let read = tokio::select! {
            biased;
            _ = stop.cancelled() => {
                tracing::trace!("Stop signal fired, abandoning pending read");
                return None;
            },
            read = stream.recv_message() => read,
        };

        match read {
            Ok(Some(message)) => Some((Ok(message), Some(stop))),
            Ok(None) => {
                tracing::trace!("Stream reached end of stream");
                None
            }
            Err(e) => Some((Err(Error::from(e)), None)),
        }
    })
    .fuse()
}
