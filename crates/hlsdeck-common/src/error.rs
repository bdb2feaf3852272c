//! Common error types used throughout hlsdeck.
//!
//! Each variant corresponds to a kind of failure shown to the user. None of
//! them is fatal: callers surface the message and carry on.

/// Common error type for hlsdeck.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input rejected locally before any network traffic (bad file type,
    /// malformed pasted response, nothing selected).
    #[error("{0}")]
    LocalValidation(String),

    /// An operation needing a signed-in identity was attempted without one.
    #[error("Please sign in to continue")]
    AuthRequired,

    /// The request reached the server, which reported failure. The message is
    /// the server's own, unmodified.
    #[error("{0}")]
    ServerRejected(String),

    /// The request did not complete.
    #[error("Network error: {0}")]
    Transport(String),

    /// A catalog entry has no URL that can be played.
    #[error("No playable stream found for {0}")]
    NotFoundInCatalog(String),

    /// The operation is already in flight.
    #[error("{0} is already in progress")]
    Busy(String),

    /// The player backend failed.
    #[error("Player error: {0}")]
    Player(String),

    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new LocalValidation error.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::LocalValidation(msg.into())
    }

    /// Create a new ServerRejected error.
    pub fn rejected<S: Into<String>>(msg: S) -> Self {
        Self::ServerRejected(msg.into())
    }

    /// Create a new Transport error.
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a new NotFoundInCatalog error for the given entry id.
    pub fn not_in_catalog<S: Into<String>>(entry_id: S) -> Self {
        Self::NotFoundInCatalog(entry_id.into())
    }

    /// Create a new Busy error naming the operation.
    pub fn busy<S: Into<String>>(what: S) -> Self {
        Self::Busy(what.into())
    }

    /// Create a new Player error.
    pub fn player<S: Into<String>>(msg: S) -> Self {
        Self::Player(msg.into())
    }

    /// Create a new Config error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the failure happened before anything reached the network.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::LocalValidation(_) | Self::AuthRequired | Self::Busy(_)
        )
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
