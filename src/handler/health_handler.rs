use crate::config::database::DatabaseTrait;
use crate::config::logging::secure_log;
use crate::response::app_response::SuccessResponse;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub database: DatabaseHealth,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DatabaseHealth {
    pub status: String,
    pub response_time_ms: Option<u128>,
    pub error: Option<String>,
}

static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

pub fn init_start_time() {
    START_TIME.set(Instant::now()).ok();
}

pub fn get_uptime_seconds() -> u64 {
    START_TIME
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0)
}

pub async fn health_check(
    State(db): State<Arc<crate::config::database::Database>>,
) -> SuccessResponse<HealthStatus> {
    let start_time = Instant::now();
    let timestamp = chrono::Utc::now().to_rfc3339();

    let database_health = check_database_health(&db, start_time).await;

    let status = if database_health.status == "healthy" {
        "healthy"
    } else {
        "unhealthy"
    };

    SuccessResponse::send(HealthStatus {
        status: status.to_string(),
        timestamp,
        uptime_seconds: get_uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database_health,
    })
}

async fn check_database_health(
    db: &Arc<crate::config::database::Database>,
    start_time: Instant,
) -> DatabaseHealth {
    // Simple database connectivity check
    match db.get_pool().acquire().await {
        Ok(_) => {
            let response_time = start_time.elapsed().as_millis();
            info!("Database health check passed in {}ms", response_time);
            DatabaseHealth {
                status: "healthy".to_string(),
                response_time_ms: Some(response_time),
                error: None,
            }
        }
        Err(e) => {
            secure_log::secure_error!("Database health check failed", e);
            DatabaseHealth {
                status: "unhealthy".to_string(),
                response_time_ms: None,
                error: Some(e.to_string()),
            }
        }
    }
}
