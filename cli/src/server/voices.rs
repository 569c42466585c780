use rocket::{State, get, serde::json::Json};
use svara::voice::VoiceInfo;

use crate::server::ServiceState;

#[get("/v1/voices")]
pub fn handle_voices(state: &State<ServiceState>) -> Json<Vec<VoiceInfo>> {
    Json(state.voices.voices().to_vec())
}
