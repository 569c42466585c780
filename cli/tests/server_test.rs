mod common;

use std::sync::Arc;

use common::{FixedGenerator, IndexCodec, audio_tokens, client};
use rocket::{
    http::{ContentType, Header, Status},
    serde::json::Value,
};
use svara::inference::InferenceError;

const TTS_BODY: &str = r#"{"text":"Hello from the server","voice":"en-US-female","speed":1.0}"#;

#[rocket::async_test]
async fn synthesis_returns_pcm_with_format_headers() {
    let client = client(
        FixedGenerator::tokens(audio_tokens(2)),
        Some(Arc::new(IndexCodec {
            fail_index: None,
        })),
    )
    .await;

    let response = client.post("/v1/text-to-speech").header(ContentType::JSON).body(TTS_BODY).dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.content_type(), Some(ContentType::new("audio", "pcm")));
    assert_eq!(response.headers().get_one("X-Sample-Rate"), Some("24000"));
    assert_eq!(response.headers().get_one("X-Bit-Depth"), Some("16"));
    assert_eq!(response.headers().get_one("X-Channels"), Some("1"));
    assert_eq!(response.headers().get_one("X-Decoded-Frames"), Some("2"));
    assert_eq!(response.headers().get_one("X-Failed-Frames"), Some("0"));

    let first_head = (common::AUDIO_OFFSET & 0xff) as u8;
    let second_head = ((common::AUDIO_OFFSET + 7) & 0xff) as u8;
    assert_eq!(response.into_bytes().await, Some(vec![0, first_head, 1, second_head]));
}

#[rocket::async_test]
async fn failed_frame_still_returns_partial_audio() {
    let client = client(
        FixedGenerator::tokens(audio_tokens(2)),
        Some(Arc::new(IndexCodec {
            fail_index: Some(0),
        })),
    )
    .await;

    let response = client.post("/v1/text-to-speech").body(TTS_BODY).dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.headers().get_one("X-Failed-Frames"), Some("1"));
    let bytes = response.into_bytes().await.expect("body");
    assert_eq!(bytes.len(), 2);
    assert_eq!(bytes[0], 1);
}

#[rocket::async_test]
async fn partial_frame_returns_empty_pcm() {
    let tokens = vec![1, common::AUDIO_OFFSET, common::AUDIO_OFFSET + 1, 128_009];
    let client = client(
        FixedGenerator::tokens(tokens),
        Some(Arc::new(IndexCodec {
            fail_index: None,
        })),
    )
    .await;

    let response = client.post("/v1/text-to-speech").body(TTS_BODY).dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.headers().get_one("X-Decoded-Frames"), Some("0"));
    assert_eq!(response.into_bytes().await.unwrap_or_default(), Vec::<u8>::new());
}

#[rocket::async_test]
async fn missing_codec_is_service_unavailable() {
    let client = client(FixedGenerator::tokens(audio_tokens(1)), None).await;

    let response = client.post("/v1/text-to-speech").body(TTS_BODY).dispatch().await;
    assert_eq!(response.status(), Status::ServiceUnavailable);
    let body = response.into_json::<Value>().await.expect("json error body");
    assert_eq!(body["detail"], "audio codec not initialized");
}

#[rocket::async_test]
async fn text_only_output_is_a_server_error() {
    let client = client(
        FixedGenerator::tokens(vec![100, 200, 300]),
        Some(Arc::new(IndexCodec {
            fail_index: None,
        })),
    )
    .await;

    let response = client.post("/v1/text-to-speech").body(TTS_BODY).dispatch().await;
    assert_eq!(response.status(), Status::InternalServerError);
    let body = response.into_json::<Value>().await.expect("json error body");
    assert_eq!(body["detail"], "no audio content produced");
}

#[rocket::async_test]
async fn upstream_failure_is_bad_gateway() {
    let client = client(
        FixedGenerator::failing(InferenceError::Unreachable("connection refused".into())),
        Some(Arc::new(IndexCodec {
            fail_index: None,
        })),
    )
    .await;

    let response = client.post("/v1/text-to-speech").body(TTS_BODY).dispatch().await;
    assert_eq!(response.status(), Status::BadGateway);
    let body = response.into_json::<Value>().await.expect("json error body");
    assert!(body["detail"].as_str().expect("detail string").starts_with("upstream inference failure"));
}

#[rocket::async_test]
async fn upstream_error_status_is_bad_gateway() {
    let client = client(
        FixedGenerator::failing(InferenceError::Status {
            status: 503,
            body: "model is loading".into(),
        }),
        Some(Arc::new(IndexCodec {
            fail_index: None,
        })),
    )
    .await;

    let response = client.post("/v1/text-to-speech").body(TTS_BODY).dispatch().await;
    assert_eq!(response.status(), Status::BadGateway);
    let body = response.into_json::<Value>().await.expect("json error body");
    assert!(body["detail"].as_str().expect("detail string").contains("503"));
}

#[rocket::async_test]
async fn upstream_timeout_is_gateway_timeout() {
    let client = client(
        FixedGenerator::failing(InferenceError::Timeout {
            timeout_ms: 30_000,
        }),
        Some(Arc::new(IndexCodec {
            fail_index: None,
        })),
    )
    .await;

    let response = client.post("/v1/text-to-speech").body(TTS_BODY).dispatch().await;
    assert_eq!(response.status(), Status::GatewayTimeout);
    let body = response.into_json::<Value>().await.expect("json error body");
    assert_eq!(body["detail"], "upstream inference timed out after 30000ms");
}

#[rocket::async_test]
async fn unknown_voice_is_passed_through() {
    let client = client(
        FixedGenerator::tokens(audio_tokens(1)),
        Some(Arc::new(IndexCodec {
            fail_index: None,
        })),
    )
    .await;

    let response = client.post("/v1/text-to-speech").body(r#"{"text":"hello","voice":"hi-IN-female"}"#).dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.headers().get_one("X-Decoded-Frames"), Some("1"));
}

#[rocket::async_test]
async fn out_of_range_fields_are_unprocessable() {
    let client = client(
        FixedGenerator::tokens(audio_tokens(1)),
        Some(Arc::new(IndexCodec {
            fail_index: None,
        })),
    )
    .await;

    let too_fast = client.post("/v1/text-to-speech").body(r#"{"text":"hi","speed":4.0}"#).dispatch().await;
    assert_eq!(too_fast.status(), Status::UnprocessableEntity);

    let no_text = client.post("/v1/text-to-speech").body(r#"{"voice":"en-US-male"}"#).dispatch().await;
    assert_eq!(no_text.status(), Status::UnprocessableEntity);
    let body = no_text.into_json::<Value>().await.expect("json error body");
    assert!(body["detail"].is_string());
}

#[rocket::async_test]
async fn health_reports_degraded_without_codec() {
    let client = client(FixedGenerator::failing(InferenceError::MissingTokenIds), None).await;

    let body = client.get("/health").dispatch().await.into_json::<Value>().await.expect("json body");
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["vllm_status"], "unreachable");
    assert_eq!(body["snac_loaded"], false);
    assert!(body["timestamp"].as_f64().expect("timestamp") > 0.0);
}

#[rocket::async_test]
async fn health_reports_healthy_with_codec() {
    let client = client(
        FixedGenerator::tokens(vec![]),
        Some(Arc::new(IndexCodec {
            fail_index: None,
        })),
    )
    .await;

    let body = client.get("/health").dispatch().await.into_json::<Value>().await.expect("json body");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["vllm_status"], "healthy");
    assert_eq!(body["snac_loaded"], true);
    assert!(body.get("codec_loaded").is_none());
}

#[rocket::async_test]
async fn voices_and_index_are_listed() {
    let client = client(FixedGenerator::tokens(vec![]), None).await;

    let voices = client.get("/v1/voices").dispatch().await.into_json::<Value>().await.expect("json body");
    let ids: Vec<&str> = voices.as_array().expect("voice list").iter().filter_map(|voice| voice["id"].as_str()).collect();
    assert_eq!(ids, vec!["en-US-male", "en-US-female"]);

    let index = client.get("/").dispatch().await.into_json::<Value>().await.expect("json body");
    assert_eq!(index["service"], "Svara TTS API");
    assert_eq!(index["endpoints"]["tts"], "/v1/text-to-speech");
}

#[rocket::async_test]
async fn cors_headers_and_preflight() {
    let client = client(FixedGenerator::tokens(vec![]), None).await;

    let preflight = client
        .options("/v1/text-to-speech")
        .header(Header::new("Origin", "https://app.example"))
        .header(Header::new("Access-Control-Request-Method", "POST"))
        .dispatch()
        .await;
    assert_eq!(preflight.status(), Status::NoContent);
    assert_eq!(preflight.headers().get_one("Access-Control-Allow-Origin"), Some("*"));
    assert!(preflight.headers().get_one("Access-Control-Allow-Methods").expect("methods").contains("POST"));

    let voices = client.get("/v1/voices").header(Header::new("Origin", "https://app.example")).dispatch().await;
    assert!(voices.headers().get_one("Access-Control-Expose-Headers").expect("exposed").contains("X-Sample-Rate"));
}

#[rocket::async_test]
async fn unknown_route_is_json_not_found() {
    let client = client(FixedGenerator::tokens(vec![]), None).await;

    let response = client.get("/v2/nothing").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    let body = response.into_json::<Value>().await.expect("json error body");
    assert_eq!(body["detail"], "Not Found");
}
