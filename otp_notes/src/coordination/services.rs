use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::Settings;
use crate::mailer::{Mailer, build_mailer};
use crate::notes::NoteStore;
use crate::oauth2::{GoogleIdTokenVerifier, IdTokenVerifier};
use crate::otp::{OtpStore, spawn_otp_purge};
use crate::session::SessionTokens;
use crate::storage::{DataStore, connect_cache_store, connect_data_store};
use crate::userdb::UserStore;

use super::auth::AuthService;
use super::errors::CoordinationError;
use super::notes::NotesService;

/// Everything a request handler needs, built once at startup
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub notes: NotesService,
    otps: OtpStore,
    otp_purge_interval: std::time::Duration,
}

impl Services {
    /// Connect to the configured stores and create any missing tables
    pub async fn init(settings: &Settings) -> Result<Self, CoordinationError> {
        let data_store = connect_data_store(&settings.data_store).await?;
        let cache_store = connect_cache_store(&settings.cache_store).await?;
        let mailer = build_mailer(&settings.mail)?;
        let id_verifier: Arc<dyn IdTokenVerifier> =
            Arc::new(GoogleIdTokenVerifier::new(&settings.google, cache_store));

        Self::from_parts(settings, data_store, mailer, id_verifier).await
    }

    /// Assemble from already built collaborators
    pub async fn from_parts(
        settings: &Settings,
        data_store: Arc<dyn DataStore>,
        mailer: Arc<dyn Mailer>,
        id_verifier: Arc<dyn IdTokenVerifier>,
    ) -> Result<Self, CoordinationError> {
        let prefix = &settings.data_store.table_prefix;

        let users = UserStore::new(data_store.clone(), prefix);
        let otps = OtpStore::new(data_store.clone(), prefix);
        let notes = NoteStore::new(data_store, prefix);

        users.init().await?;
        otps.init().await?;
        notes.init().await?;
        tracing::info!("Database tables ready");

        Ok(Self {
            auth: AuthService::new(
                users,
                otps.clone(),
                SessionTokens::new(&settings.session),
                mailer,
                id_verifier,
                settings.otp.ttl(),
            ),
            notes: NotesService::new(notes),
            otps,
            otp_purge_interval: settings.otp.purge_interval,
        })
    }

    /// Start the background task that deletes expired codes
    pub fn spawn_otp_purge(&self) -> JoinHandle<()> {
        tracing::info!(
            interval_secs = self.otp_purge_interval.as_secs(),
            "Starting OTP purge task"
        );
        spawn_otp_purge(self.otps.clone(), self.otp_purge_interval)
    }
}
