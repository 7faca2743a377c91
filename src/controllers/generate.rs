use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Extension,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs::File;
use tracing::Instrument;

use crate::{
    domain::{
        resources::ResourceSet,
        voice_clone::{SynthesisRequest, VoiceCloneService, VoiceCloneServiceApi, VoiceSample},
    },
    error::{AppError, AppResult},
    infrastructure::{http::stream_artifact, middleware::RequestId},
};

pub const SAMPLE_FIELD_PREFIX: &str = "sample_";
pub const CONTENT_DISPOSITION_VALUE: &str = "attachment; filename=\"generated_speech.wav\"";
const DEFAULT_SPEED: f32 = 1.0;
const DEFAULT_PITCH: f32 = 1.0;

pub struct GenerateController {
    voice_clone_service: Arc<VoiceCloneService>,
    temp_dir: PathBuf,
}

impl GenerateController {
    pub fn new(voice_clone_service: Arc<VoiceCloneService>, temp_dir: PathBuf) -> Self {
        Self {
            voice_clone_service,
            temp_dir,
        }
    }

    /// POST /generate - Clone the voice of the uploaded samples and speak the text
    pub async fn generate(
        State(controller): State<Arc<GenerateController>>,
        Extension(request_id): Extension<RequestId>,
        multipart: Multipart,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let span = tracing::info_span!("generate", request_id = %request_id.0);
        controller.handle(multipart).instrument(span).await
    }

    async fn handle(&self, multipart: Multipart) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let request = parse_generate_form(multipart).await?;

        // Released by the response body once it is sent, or right here on error
        let mut resources = ResourceSet::new(&self.temp_dir);

        let result = match self.voice_clone_service.run(request, &mut resources).await {
            Ok(result) => result,
            Err(e) => {
                resources.release().await;
                return Err(e.into());
            }
        };

        let file = match File::open(&result.output_path).await {
            Ok(file) => file,
            Err(e) => {
                resources.release().await;
                return Err(AppError::Internal(format!(
                    "failed to open synthesized audio: {}",
                    e
                )));
            }
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(result.mime_type),
        );
        headers.insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_static(CONTENT_DISPOSITION_VALUE),
        );
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(result.size_bytes));

        let body = Body::from_stream(stream_artifact(file, resources));

        Ok((StatusCode::OK, headers, body))
    }
}

/// Read the multipart form into a [`SynthesisRequest`].
///
/// Only parts carrying a file name count as samples; their order in the
/// body is the sample order.
async fn parse_generate_form(mut multipart: Multipart) -> AppResult<SynthesisRequest> {
    let mut text = String::new();
    let mut speed = DEFAULT_SPEED;
    let mut pitch = DEFAULT_PITCH;
    let mut voice_samples = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Internal(format!("invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "text" => {
                text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Internal(format!("text read error: {}", e)))?;
            }
            "speed" | "pitch" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Internal(format!("{} read error: {}", name, e)))?;
                let parsed = parse_float_field(&name, &value)?;
                if name == "speed" {
                    speed = parsed;
                } else {
                    pitch = parsed;
                }
            }
            _ if name.starts_with(SAMPLE_FIELD_PREFIX) && field.file_name().is_some() => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Internal(format!("{} read error: {}", name, e)))?;
                voice_samples.push(VoiceSample {
                    data,
                    file_name,
                    content_type,
                });
            }
            _ => {}
        }
    }

    Ok(SynthesisRequest {
        text,
        speed,
        pitch,
        voice_samples,
    })
}

fn parse_float_field(name: &str, value: &str) -> AppResult<f32> {
    value
        .trim()
        .parse::<f32>()
        .map_err(|_| AppError::Internal(format!("could not convert {} to float: '{}'", name, value)))
}
