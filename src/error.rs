use thiserror::Error;

#[derive(Debug, Error)]
pub enum PokerNodeError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("missing message header: {0}")]
    MissingHeader(String),
    #[error("unknown message type: {0}")]
    UnknownMessageType(String),
    #[error("malformed message body: {0}")]
    MalformedBody(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("runtime error: {0}")]
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, PokerNodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_error_display() {
        let err = PokerNodeError::MissingHeader("MessageType".to_string());
        assert!(format!("{err}").contains("missing message header"));
        let err = PokerNodeError::UnknownMessageType("Bogus".to_string());
        assert!(format!("{err}").contains("Bogus"));
    }
}
