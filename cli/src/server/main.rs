use std::{net::IpAddr, str::FromStr};

use anyhow::Context;
use rocket::{Build, Config, Rocket, catchers, config::LogLevel, routes};
use svara::{config::ServiceConfig, inference::UpstreamHealth};

use crate::server::{
    Cors, ServiceState, error::handle_default_catcher, handle_health, handle_preflight, handle_root,
    handle_text_to_speech, handle_voices,
};

pub fn rocket_config(config: &ServiceConfig) -> anyhow::Result<Config> {
    let address =
        IpAddr::from_str(&config.host).with_context(|| format!("invalid listen address {:?}", config.host))?;
    let log_level = LogLevel::from_str(&config.log_level)
        .map_err(|error| anyhow::anyhow!("invalid log level {:?}: {error}", config.log_level))?;

    Ok(Config {
        address,
        port: config.port,
        log_level,
        ..Config::default()
    })
}

pub fn build_rocket(
    state: ServiceState,
    config: Config,
) -> Rocket<Build> {
    let cors = Cors::new(state.config.cors_origins.clone());

    rocket::custom(config)
        .attach(cors)
        .manage(state)
        .mount("/", routes![handle_root, handle_health, handle_voices, handle_text_to_speech, handle_preflight])
        .register("/", catchers![handle_default_catcher])
}

pub async fn run_server(config: ServiceConfig) -> anyhow::Result<()> {
    let rocket_config = rocket_config(&config)?;

    println!("🚀 Starting Svara TTS API server...");
    println!("📍 Inference endpoint: {} ({})", config.vllm_url, config.vllm_model);
    println!("🌐 Server will be available at: http://{}:{}", config.host, config.port);
    println!(
        "📝 Endpoints:\n   GET  /health\n   GET  /v1/voices\n   POST /v1/text-to-speech - PCM16 audio\n"
    );

    let state = ServiceState::from_config(config)?;
    if !state.codec_loaded() {
        println!("⚠️ Codec unavailable, synthesis requests will be refused with 503");
    }

    match state.generator.health().await {
        UpstreamHealth::Healthy => println!("✅ Inference endpoint reachable"),
        status => println!("⚠️ Inference endpoint status: {:?}", status),
    }

    build_rocket(state, rocket_config)
        .launch()
        .await
        .map_err(|error| anyhow::anyhow!("server terminated with an error: {error}"))?;
    Ok(())
}
