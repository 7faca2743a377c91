use axum::Router;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;
use voice_clone_server::controllers::generate::GenerateController;
use voice_clone_server::domain::voice_clone::VoiceCloneService;
use voice_clone_server::infrastructure::config::{Config, Environment, LogFormat};
use voice_clone_server::infrastructure::http::build_router;

pub mod api_client;

use api_client::TestClient;
use fakes::{FakeConverter, FakeEngine};

/// A minimal but structurally valid WAV header followed by `tag`, so tests
/// can recognise which sample ended up as the voice reference
pub fn wav_sample(tag: &str) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"RIFF");
    data.extend_from_slice(&(36u32 + tag.len() as u32).to_le_bytes());
    data.extend_from_slice(b"WAVEfmt ");
    data.extend_from_slice(&16u32.to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes()); // PCM
    data.extend_from_slice(&1u16.to_le_bytes()); // mono
    data.extend_from_slice(&16_000u32.to_le_bytes());
    data.extend_from_slice(&32_000u32.to_le_bytes());
    data.extend_from_slice(&2u16.to_le_bytes());
    data.extend_from_slice(&16u16.to_le_bytes());
    data.extend_from_slice(b"data");
    data.extend_from_slice(&(tag.len() as u32).to_le_bytes());
    data.extend_from_slice(tag.as_bytes());
    data
}

pub fn artifact_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

/// Poll until the artifact directory is empty; cleanup of a delivered
/// response may land just after the client has read the last byte
pub async fn wait_for_no_artifacts(dir: &Path) -> bool {
    for _ in 0..100 {
        if artifact_count(dir) == 0 {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    artifact_count(dir) == 0
}

pub struct TestContext {
    pub client: TestClient,
    pub router: Router,
    #[allow(dead_code)]
    pub config: Config,
    pub temp_dir: TempDir,
}

impl TestContext {
    pub fn artifacts_dir(&self) -> &Path {
        self.temp_dir.path()
    }
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

            let config = Config {
                host: "127.0.0.1".to_string(),
                port: 0, // Will be assigned by the OS
                environment: Environment::Development,
                log_format: LogFormat::Pretty,
                temp_dir: temp_dir.path().to_path_buf(),
                ffmpeg_path: "ffmpeg".to_string(),
                conversion_timeout_secs: 5,
                tts_binary: "tts".to_string(),
                tts_model_name: "test-model".to_string(),
                synthesis_timeout_secs: None,
                engine_max_concurrency: 1,
                max_upload_bytes: 1024 * 1024,
            };

            let router = create_app_with_fakes(&config);

            let listener = TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind listener");
            let addr = listener.local_addr().expect("Failed to get local addr");
            let base_url = format!("http://{}", addr);

            let app = router.clone();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            Self {
                client: TestClient::new(&base_url),
                router,
                config,
                temp_dir,
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // TempDir removes itself on drop
        }
    }
}

fn create_app_with_fakes(config: &Config) -> Router {
    let voice_clone_service = Arc::new(VoiceCloneService::new(
        Arc::new(FakeConverter),
        Arc::new(FakeEngine),
    ));
    let generate_controller = Arc::new(GenerateController::new(
        voice_clone_service,
        config.temp_dir.clone(),
    ));

    build_router(config, generate_controller)
}
