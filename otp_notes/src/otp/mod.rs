mod errors;
mod purge;
mod storage;
mod types;

pub use errors::OtpError;
pub use purge::spawn_otp_purge;
pub use storage::OtpStore;
pub use types::OtpCode;
