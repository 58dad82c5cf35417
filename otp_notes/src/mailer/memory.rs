use async_trait::async_trait;
use tokio::sync::Mutex;

use super::errors::MailError;
use super::types::Mailer;

#[derive(Debug, Clone, PartialEq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Records mail instead of delivering it
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<SentMail>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().await.clone()
    }

    /// Most recent mail addressed to `to`
    pub async fn last_to(&self, to: &str) -> Option<SentMail> {
        self.sent
            .lock()
            .await
            .iter()
            .rev()
            .find(|mail| mail.to == to)
            .cloned()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send_mail(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        tracing::info!(to = %to, subject = %subject, "Recording outbound mail");
        self.sent.lock().await.push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
