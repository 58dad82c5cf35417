mod errors;
mod tokens;

pub use errors::SessionError;
pub use tokens::{SessionClaims, SessionTokens};
