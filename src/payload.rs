use bytes::Bytes;
use futures::stream::{Stream, TryStreamExt};
use crate::error::Result;

/// An inbound message that carries a raw byte payload.
pub trait Payload {
    fn into_payload(self) -> Bytes;
}

impl Payload for Bytes {
    fn into_payload(self) -> Bytes {
        self
    }
}

impl Payload for Vec<u8> {
    fn into_payload(self) -> Bytes {
        Bytes::from(self)
    }
}

/// Project each received message onto its payload, one-to-one and in order.
pub fn generate_bytes<S, M>(messages: S) -> impl Stream<Item = Result<Bytes>>
where
    S: Stream<Item = Result<M>>,
    M: Payload,
{
    messages.map_ok(Payload::into_payload)
}
