use async_trait::async_trait;
use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};

use crate::config::MailSettings;

use super::errors::MailError;
use super::types::Mailer;

const IMPLICIT_TLS_PORT: u16 = 465;
const SUBMISSION_PORT: u16 = 587;

/// SMTP delivery through lettre
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Configure the transport. No connection is made until the first send.
    pub fn new(settings: &MailSettings) -> Result<Self, MailError> {
        let builder = if settings.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host).tls(
                Tls::Opportunistic(TlsParameters::new(settings.host.clone())?),
            )
        };

        let port = settings.port.unwrap_or(if settings.secure {
            IMPLICIT_TLS_PORT
        } else {
            SUBMISSION_PORT
        });
        let builder = builder.port(port);

        let builder = match (&settings.user, &settings.password) {
            (Some(user), Some(password)) => {
                builder.credentials(Credentials::new(user.clone(), password.clone()))
            }
            _ => {
                tracing::warn!("EMAIL_USER or EMAIL_PASS is not set, sending without authentication");
                builder
            }
        };

        let address: Address = settings
            .user
            .as_deref()
            .unwrap_or("no-reply@localhost")
            .parse()?;

        Ok(Self {
            transport: builder.build(),
            from: Mailbox::new(Some(settings.from_name.clone()), address),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[tracing::instrument(skip(self, body))]
    async fn send_mail(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse::<Mailbox>()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        self.transport.send(message).await?;
        tracing::debug!("Mail handed to SMTP server");
        Ok(())
    }
}
