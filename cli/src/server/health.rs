use std::time::{SystemTime, UNIX_EPOCH};

use rocket::{State, get, serde::json::Json};
use serde::Serialize;
use svara::inference::UpstreamHealth;

use crate::server::ServiceState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub vllm_status: UpstreamHealth,
    #[serde(rename = "snac_loaded")]
    pub codec_loaded: bool,
    pub timestamp: f64,
}

#[get("/health")]
pub async fn handle_health(state: &State<ServiceState>) -> Json<HealthResponse> {
    let vllm_status = state.generator.health().await;
    let codec_loaded = state.codec_loaded();
    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH).map(|elapsed| elapsed.as_secs_f64()).unwrap_or_default();

    Json(HealthResponse {
        status: if codec_loaded {
            "healthy"
        } else {
            "degraded"
        },
        vllm_status,
        codec_loaded,
        timestamp,
    })
}
