use authgate::config::database::DatabaseTrait;
use authgate::config::{database, logging, parameter};
use authgate::handler::health_handler;
use authgate::routes;
use authgate::service::rotation_service::{
    start_purge_task, RotationConfig, RotationService, RotationServiceTrait,
};
use authgate::service::token_service::{TokenConfig, TokenService, TokenServiceTrait};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    info!("Starting authentication core service...");

    parameter::init();
    logging::init();
    health_handler::init_start_time();

    let db_conn = match database::Database::init().await {
        Ok(conn) => {
            info!("Database ready");
            Arc::new(conn)
        }
        Err(e) => {
            error!("Database initialization failed: {}", e);
            return Err(Box::new(e) as Box<dyn std::error::Error>);
        }
    };

    // A weak signing secret is a startup error, not a runtime one.
    let token_service = match TokenService::new(TokenConfig::from_env()) {
        Ok(service) => service,
        Err(e) => {
            error!("Token service rejected its configuration: {}", e);
            return Err(Box::new(e) as Box<dyn std::error::Error>);
        }
    };

    let rotation_service =
        RotationService::new(&db_conn, token_service.clone(), RotationConfig::from_env());

    let purge_shutdown_token = tokio_util::sync::CancellationToken::new();
    let purge_interval_minutes = parameter::get_u64("REFRESH_PURGE_INTERVAL_MINUTES");
    let purge_task_handle = start_purge_task(
        rotation_service.clone(),
        purge_interval_minutes,
        purge_shutdown_token.clone(),
    );
    info!(
        "Expired session purge scheduled every {} minutes",
        purge_interval_minutes
    );

    let host = format!(
        "{}:{}",
        parameter::get("SERVER_ADDRESS"),
        parameter::get("SERVER_PORT")
    );
    let listener = match tokio::net::TcpListener::bind(&host).await {
        Ok(listener) => {
            info!("Listening on {}", host);
            listener
        }
        Err(e) => {
            error!("Could not bind {}: {}", host, e);
            return Err(Box::new(e) as Box<dyn std::error::Error>);
        }
    };

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                purge_shutdown_token.cancel();
                let _ = shutdown_tx.send(());
            }
            Err(err) => {
                error!("Unable to listen for shutdown signal: {}", err);
            }
        }
    });

    let app = routes::root::routes(db_conn, token_service, rotation_service);

    match axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_rx.await.ok();
            if let Err(e) = purge_task_handle.await {
                error!("Purge task did not stop cleanly: {}", e);
            }
        })
        .await
    {
        Ok(_) => {
            info!("Server stopped");
            Ok(())
        }
        Err(e) => {
            error!("Server error: {}", e);
            Err(Box::new(e) as Box<dyn std::error::Error>)
        }
    }
}
