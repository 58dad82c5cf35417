use dotenvy::dotenv;
use std::sync::Arc;

use otp_notes::{Services, Settings};
use otp_notes_axum::notes_api_router;

mod server;
use server::{init_tracing, serve_http};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_tracing("notes_server");

    let settings =
        Settings::from_env().inspect_err(|e| tracing::error!("Bad configuration: {}", e))?;
    tracing::info!(
        port = settings.server.port,
        route_prefix = %settings.server.route_prefix,
        "Loaded settings"
    );

    let services = Services::init(&settings)
        .await
        .inspect_err(|e| tracing::error!("Startup failed: {}", e))?;

    let purge = services.spawn_otp_purge();

    let app = notes_api_router(Arc::new(services), &settings.server);
    let result = serve_http(settings.server.port, app).await;

    purge.abort();
    Ok(result?)
}
