mod errors;
mod memory;
mod smtp;
mod types;

pub use errors::MailError;
pub use memory::{MemoryMailer, SentMail};
pub use smtp::SmtpMailer;
pub use types::{Mailer, build_mailer};
