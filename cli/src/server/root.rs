use rocket::{get, serde::json::Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub health: &'static str,
    pub voices: &'static str,
    pub tts: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ServiceIndex {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub endpoints: Endpoints,
}

#[get("/")]
pub fn handle_root() -> Json<ServiceIndex> {
    Json(ServiceIndex {
        service: "Svara TTS API",
        version: svara::VERSION,
        status: "running",
        endpoints: Endpoints {
            health: "/health",
            voices: "/v1/voices",
            tts: "/v1/text-to-speech",
        },
    })
}
