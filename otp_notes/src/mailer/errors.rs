use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    Address(String),

    #[error("Message error: {0}")]
    Message(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<lettre::address::AddressError> for MailError {
    fn from(err: lettre::address::AddressError) -> Self {
        MailError::Address(err.to_string())
    }
}

impl From<lettre::error::Error> for MailError {
    fn from(err: lettre::error::Error) -> Self {
        MailError::Message(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for MailError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        MailError::Transport(err.to_string())
    }
}
