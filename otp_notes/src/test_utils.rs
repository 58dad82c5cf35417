//! Shared helpers for unit tests across the crate
//!
//! Every helper builds its own in-memory SQLite database, so tests never
//! share state and need no environment setup.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Settings;
use crate::coordination::{AuthService, NotesService, Services};
use crate::mailer::MemoryMailer;
use crate::oauth2::{ExternalIdentity, IdTokenVerifier, TokenVerificationError};
use crate::storage::{DataStore, connect_data_store};
use crate::userdb::UserStore;

/// A fresh private in-memory database
pub(crate) async fn memory_data_store() -> Arc<dyn DataStore> {
    connect_data_store(&Settings::in_memory().data_store)
        .await
        .expect("Failed to open in-memory database")
}

/// Accepts tokens of the form `valid:<subject>:<email>` and rejects anything else
pub(crate) struct StubIdTokenVerifier;

#[async_trait]
impl IdTokenVerifier for StubIdTokenVerifier {
    async fn verify(&self, id_token: &str) -> Result<ExternalIdentity, TokenVerificationError> {
        match id_token.split(':').collect::<Vec<_>>().as_slice() {
            ["valid", subject, email] => Ok(ExternalIdentity {
                subject: subject.to_string(),
                email: email.to_string(),
                name: None,
            }),
            _ => Err(TokenVerificationError::InvalidTokenSignature),
        }
    }
}

/// Services wired to an in-memory database, a recording mailer and the stub verifier
pub(crate) struct TestHarness {
    pub(crate) auth: AuthService,
    pub(crate) notes: NotesService,
    pub(crate) users: UserStore,
    pub(crate) mailer: Arc<MemoryMailer>,
}

impl TestHarness {
    pub(crate) async fn new() -> Self {
        let settings = Settings::in_memory();
        let data_store = memory_data_store().await;
        let mailer = Arc::new(MemoryMailer::new());

        let services = Services::from_parts(
            &settings,
            data_store.clone(),
            mailer.clone(),
            Arc::new(StubIdTokenVerifier),
        )
        .await
        .expect("Failed to build services");

        Self {
            auth: services.auth,
            notes: services.notes,
            users: UserStore::new(data_store, &settings.data_store.table_prefix),
            mailer,
        }
    }
}

/// The six digit code in the latest mail sent to `email`
pub(crate) async fn last_mailed_code(mailer: &MemoryMailer, email: &str) -> String {
    let mail = mailer.last_to(email).await.expect("No mail sent");
    mail.body
        .split(|c: char| !c.is_ascii_digit())
        .find(|part| part.len() == 6)
        .expect("No code in mail body")
        .to_string()
}
