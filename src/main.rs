use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voice_clone_server::controllers::generate::GenerateController;
use voice_clone_server::domain::voice_clone::VoiceCloneService;
use voice_clone_server::infrastructure::config::{Config, LogFormat};
use voice_clone_server::infrastructure::http::start_http_server;
use voice_clone_server::infrastructure::repositories::{CoquiTtsRepository, FfmpegConverter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Voice Clone Server on {}:{}",
        config.host,
        config.port
    );

    if config.is_development() {
        tracing::debug!(?config, "Configuration loaded");
    }

    std::fs::create_dir_all(&config.temp_dir)?;
    tracing::info!(temp_dir = %config.temp_dir.display(), "Temporary artifact directory ready");

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories (converter process, synthesis engine)
    tracing::info!(ffmpeg = %config.ffmpeg_path, "Instantiating audio converter...");
    let converter = Arc::new(FfmpegConverter::new(
        config.ffmpeg_path.clone(),
        config.conversion_timeout(),
    ));

    tracing::info!(
        binary = %config.tts_binary,
        model = %config.tts_model_name,
        max_concurrency = config.engine_max_concurrency,
        "Instantiating synthesis engine..."
    );
    let engine = Arc::new(CoquiTtsRepository::new(
        config.tts_binary.clone(),
        config.tts_model_name.clone(),
        config.synthesis_timeout(),
        config.engine_max_concurrency,
    ));

    // 2. Instantiate services
    let voice_clone_service = Arc::new(VoiceCloneService::new(converter, engine));

    // 3. Instantiate controllers
    let generate_controller = Arc::new(GenerateController::new(
        voice_clone_service,
        config.temp_dir.clone(),
    ));

    let config = Arc::new(config);

    start_http_server(config, generate_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "voice_clone_server=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
