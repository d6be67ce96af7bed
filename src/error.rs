use std::error::Error as StdError;

pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Failures while establishing a session with the playback server.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("couldn't connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Greeting or password exchange failed.
    #[error("handshake with {addr} failed: {source}")]
    Handshake {
        addr: String,
        #[source]
        source: BoxError,
    },

    #[error("timed out connecting to {0}")]
    Timeout(String),
}

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("no status: {0}")]
    NoStatus(#[source] BoxError),

    #[error("no current song")]
    NoSong,

    #[error("protocol error: {0}")]
    Protocol(#[source] BoxError),

    #[error("query timed out")]
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("rendered text exceeds {capacity} bytes")]
    BufferOverflow { capacity: usize },
}

/// Anything that keeps a render cycle from reaching the healthy path.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Query(#[from] QueryError),
}
