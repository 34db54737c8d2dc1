pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by a transport while reading, sending, ending or cancelling.
///
/// Carried through unmodified; this crate never retries.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct TransportError(BoxError);

impl TransportError {
    pub fn new<E>(error: E) -> TransportError
    where
        E: Into<BoxError>,
    {
        TransportError(error.into())
    }

    pub fn get_ref(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.0.as_ref()
    }

    pub fn into_inner(self) -> BoxError {
        self.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The peer broke the request/response contract, e.g. closed without a terminal response.
    #[error("protocol violation: {0}")]
    ProtocolViolation(&'static str),
}
