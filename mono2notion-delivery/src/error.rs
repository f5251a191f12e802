use thiserror::Error;

/// One failed delivery attempt.
///
/// Timeouts and undecodable responses are fatal for the record: the
/// request may already have been applied, so it is not repeated. Every
/// other failure is retryable.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("cannot decode response: {0}")]
    Decode(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),
}

impl DeliveryError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, DeliveryError::Timeout(_) | DeliveryError::Decode(_))
    }

    pub fn is_retryable(&self) -> bool {
        !self.is_fatal()
    }
}

impl From<reqwest::Error> for DeliveryError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            DeliveryError::Timeout(e.to_string())
        } else if e.is_decode() {
            DeliveryError::Decode(e.to_string())
        } else {
            DeliveryError::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(DeliveryError::Timeout("t".into()).is_fatal());
        assert!(DeliveryError::Decode("d".into()).is_fatal());
        assert!(
            DeliveryError::Status {
                status: 502,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(
            DeliveryError::Status {
                status: 400,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(DeliveryError::Transport("connection reset".into()).is_retryable());
    }
}
