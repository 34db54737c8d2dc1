//! Cancellable streaming helpers for RPC message streams.
//!
//! Three pieces sit on top of an [`RpcStream`]:
//!
//! * [`drain_to_stream`] pushes a request stream and returns the single terminal response.
//! * [`stop_reader`] reads a response stream until it ends or a [`CancellationToken`] fires,
//!   dropping the read that was in flight.
//! * [`cancel_wrapper`] does the same and sends `cancel()` to the peer when we were the ones
//!   who stopped.
//!
//! [`generate_bytes`] projects received messages onto their byte payloads.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

mod cancel_forwarder;
mod drain;
mod error;
mod payload;
mod rpc_stream;
mod stop_reader;

pub mod memory_stream;

pub use cancel_forwarder::cancel_wrapper;
pub use drain::drain_to_stream;
pub use error::{BoxError, Error, Result, TransportError};
pub use payload::{generate_bytes, Payload};
pub use rpc_stream::{messages, Metadata, RpcStream};
pub use stop_reader::stop_reader;
