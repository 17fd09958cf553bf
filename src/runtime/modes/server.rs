//! Server mode
//!
//! Configures and starts the HTTP server with the lookup and health routes.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::middleware::{ApiKeyAuth, RequestLogger};
use crate::api::services::{AppStartTime, health_routes, lookup_routes};
use crate::config::StaticConfig;
use crate::runtime::lifetime;

/// Run the HTTP server
///
/// 1. Records startup time
/// 2. Prepares shared state (database reader, lookup service, client IP policy)
/// 3. Configures and starts the HTTP server
/// 4. Listens for shutdown signals
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: StaticConfig) -> Result<()> {
    let app_start_time = AppStartTime::now();

    let startup = lifetime::startup::prepare_server_startup(&config).map_err(|e| {
        tracing::error!("Server startup failed: {:#}", e);
        e
    })?;

    let provider = startup.provider.clone();
    let lookup = startup.lookup.clone();
    let policy = startup.client_ip_policy.clone();
    let route = startup.route_config.clone();

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    info!("Using {} CPU cores for the server", cpu_count);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestLogger)
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Connection", "keep-alive"))
                    .add(("Keep-Alive", "timeout=30, max=1000"))
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .app_data(web::Data::from(lookup.clone()))
            .app_data(web::Data::new(policy.clone()))
            .app_data(web::Data::new(provider.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .service(web::scope(&route.health_prefix).service(health_routes()))
            .service(
                web::scope(&route.api_scope)
                    .wrap(ApiKeyAuth::new(lookup.clone()))
                    .service(lookup_routes()),
            )
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .disable_signals()
    .workers(cpu_count);

    // Bind to Unix socket or TCP address
    let server = {
        #[cfg(unix)]
        {
            if let Some(ref socket_path) = config.server.unix_socket {
                warn!("Starting server on Unix socket: {}", socket_path);
                if std::path::Path::new(socket_path).exists() {
                    std::fs::remove_file(socket_path).with_context(|| {
                        format!("Failed to remove stale socket {}", socket_path)
                    })?;
                }
                server
                    .bind_uds(socket_path)
                    .with_context(|| format!("Failed to bind Unix socket {}", socket_path))?
            } else {
                let bind_address = format!("{}:{}", config.server.host, config.server.port);
                warn!("Starting server at http://{}", bind_address);
                server
                    .bind(&bind_address)
                    .with_context(|| format!("Failed to bind {}", bind_address))?
            }
        }

        #[cfg(not(unix))]
        {
            let bind_address = format!("{}:{}", config.server.host, config.server.port);
            warn!("Starting server at http://{}", bind_address);
            server
                .bind(&bind_address)
                .with_context(|| format!("Failed to bind {}", bind_address))?
        }
    }
    .run();
    let handle = server.handle();

    tokio::select! {
        res = server => {
            res.context("HTTP server terminated with an error")?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            handle.stop(true).await;
            warn!("Graceful shutdown completed");
        }
    }

    Ok(())
}
