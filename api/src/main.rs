use actix_web::HttpServer;
use anyhow::Context;
use std::time::Duration;
use tracing::info;

use otp_api::{create_app, telemetry, AppState};
use otp_core::spawn_reaper;
use otp_shared::{AppConfig, Environment};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Environment-specific file first, then the plain .env
    dotenvy::from_filename(Environment::from_env().env_file()).ok();
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    telemetry::init_tracing(&config.logging)?;

    info!(
        environment = %config.environment,
        "Starting OTP Gate API Server"
    );

    let state = AppState::from_config(&config);

    let reaper = config.otp.reaper_enabled().then(|| {
        spawn_reaper(
            state.store.clone(),
            Duration::from_secs(config.otp.reaper_interval_seconds),
        )
    });

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(state.clone()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    if let Some(handle) = reaper {
        handle.abort();
    }

    Ok(())
}
