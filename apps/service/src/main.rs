#![warn(clippy::all, clippy::pedantic)]

use std::net::SocketAddr;

use actix_web::{App, HttpServer, web};
use tokio::sync::watch;
use tracing::info;

mod config;
mod error;
mod monitoring;
mod routes;

use config::Settings;
use error::AppError;
use logger::init_tracing;
use monitoring::{HttpProber, TelegramNotifier, run_monitor_loop};

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let settings = Settings::from_env()?;
    info!("configuration loaded successfully");

    let addr: SocketAddr = format!("{}:{}", settings.bind, settings.port).parse()?;
    run(settings, addr).await
}

async fn run(settings: Settings, addr: SocketAddr) -> Result<(), AppError> {
    // One client for probes and alerts; the timeout bounds every exchange.
    let client = reqwest::Client::builder().timeout(settings.probe_timeout).build()?;

    let prober = HttpProber::new(client.clone(), &settings);
    let notifier = TelegramNotifier::new(client, &settings);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let monitor = tokio::spawn(run_monitor_loop(settings.clone(), prober, notifier, shutdown_rx));

    let data = web::Data::new(settings);
    HttpServer::new(move || App::new().app_data(data.clone()).configure(routes::routes))
        .bind(addr)?
        .run()
        .await?;

    // The server resolves once a shutdown signal arrived; stop the loop too.
    let _ = shutdown_tx.send(true);
    let _ = monitor.await;

    Ok(())
}
