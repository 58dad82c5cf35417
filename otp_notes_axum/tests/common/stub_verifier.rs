use async_trait::async_trait;
use otp_notes::{ExternalIdentity, IdTokenVerifier, TokenVerificationError};

/// Accepts `valid:<subject>:<email>[:<name>]` and rejects anything else
pub struct StubIdTokenVerifier;

#[async_trait]
impl IdTokenVerifier for StubIdTokenVerifier {
    async fn verify(&self, id_token: &str) -> Result<ExternalIdentity, TokenVerificationError> {
        match id_token.split(':').collect::<Vec<_>>().as_slice() {
            ["valid", subject, email] => Ok(ExternalIdentity {
                subject: subject.to_string(),
                email: email.to_string(),
                name: None,
            }),
            ["valid", subject, email, name] => Ok(ExternalIdentity {
                subject: subject.to_string(),
                email: email.to_string(),
                name: Some(name.to_string()),
            }),
            _ => Err(TokenVerificationError::InvalidTokenSignature),
        }
    }
}
