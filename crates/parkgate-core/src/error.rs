use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Identifier errors
    #[error("Invalid card UID: {0}")]
    InvalidCardUid(String),

    // Controller errors
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Access denied: {reason}")]
    AccessDenied { reason: String },

    #[error("Parking full: {occupied}/{capacity} slots occupied")]
    ParkingFull { occupied: usize, capacity: usize },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
