use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{MailSettings, MailTransportKind};

use super::errors::MailError;
use super::memory::MemoryMailer;
use super::smtp::SmtpMailer;

/// Outbound plain-text mail
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    async fn send_mail(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

/// Build the transport selected by `MAIL_TRANSPORT_TYPE`
pub fn build_mailer(settings: &MailSettings) -> Result<Arc<dyn Mailer>, MailError> {
    tracing::info!("Initializing mailer with transport: {:?}", settings.transport);
    let mailer: Arc<dyn Mailer> = match settings.transport {
        MailTransportKind::Smtp => Arc::new(SmtpMailer::new(settings)?),
        MailTransportKind::Memory => Arc::new(MemoryMailer::new()),
    };
    Ok(mailer)
}
