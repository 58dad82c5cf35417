mod errors;
mod google;
mod idtoken;
mod jwks;

pub use errors::TokenVerificationError;
pub use google::{ExternalIdentity, GoogleIdTokenVerifier, IdTokenVerifier};
