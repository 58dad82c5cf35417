use std::sync::Arc;
use tokio::task::JoinHandle;

use otp_notes::{MemoryMailer, Services, Settings, connect_data_store};
use otp_notes_axum::notes_api_router;

use super::stub_verifier::StubIdTokenVerifier;

fn init_test_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Test server for integration testing
pub struct TestServer {
    /// Handle to the running server task
    server_handle: JoinHandle<()>,
    /// Base URL of the test server, without the route prefix
    pub base_url: String,
    /// Every OTP mail the server sent
    pub mailer: Arc<MemoryMailer>,
}

impl TestServer {
    /// Start a server with an empty route prefix
    pub async fn start() -> Result<Self, Box<dyn std::error::Error>> {
        Self::start_with(Settings::in_memory()).await
    }

    /// Start a server with the given settings, binding an ephemeral port
    pub async fn start_with(settings: Settings) -> Result<Self, Box<dyn std::error::Error>> {
        init_test_tracing();

        let data_store = connect_data_store(&settings.data_store).await?;
        let mailer = Arc::new(MemoryMailer::new());
        let services = Services::from_parts(
            &settings,
            data_store,
            mailer.clone(),
            Arc::new(StubIdTokenVerifier),
        )
        .await?;

        let app = notes_api_router(Arc::new(services), &settings.server);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let server_handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self {
            server_handle,
            base_url: format!("http://{addr}"),
            mailer,
        })
    }

    /// The six digit code in the latest mail sent to `email`
    pub async fn last_code_for(&self, email: &str) -> String {
        let mail = self.mailer.last_to(email).await.expect("No mail sent");
        mail.body
            .split(|c: char| !c.is_ascii_digit())
            .find(|part| part.len() == 6)
            .expect("No code in mail body")
            .to_string()
    }

    /// Shutdown the test server
    pub async fn shutdown(self) {
        self.server_handle.abort();
    }
}
