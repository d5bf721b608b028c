/// Error raised while establishing or probing a database connection.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[cfg(feature = "mongodb")]
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// The server was reachable at the driver level but refused to answer a ping
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
