use mongodb::error::ErrorKind;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    MissingParameters,
    StoreUnavailable(String),
    WriteFailed(String),
    Serialization(String),
    Configuration(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MissingParameters => write!(f, "Missing parameters"),
            AppError::StoreUnavailable(msg) => write!(f, "Store unavailable: {}", msg),
            AppError::WriteFailed(msg) => write!(f, "Write failed: {}", msg),
            AppError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            AppError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        let detail = err.to_string();
        match err.kind.as_ref() {
            ErrorKind::BsonSerialization(_) | ErrorKind::BsonDeserialization(_) => {
                AppError::Serialization(detail)
            }
            ErrorKind::Write(_) | ErrorKind::Command(_) => {
                AppError::WriteFailed(detail)
            }
            ErrorKind::InvalidArgument { .. } => AppError::Configuration(detail),
            // Server selection, DNS, I/O, pool and auth failures all mean the store is out of reach
            _ => AppError::StoreUnavailable(detail),
        }
    }
}

impl From<AppError> for std::io::Error {
    fn from(err: AppError) -> Self {
        std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
    }
}
