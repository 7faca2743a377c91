use super::dto::{SynthesisRequest, SynthesisResult, WAV_MIME_TYPE};
use super::error::VoiceCloneError;
use super::language::LanguageCode;
use super::normalizer::AudioNormalizer;
use crate::domain::resources::{ArtifactKind, ResourceSet};
use crate::infrastructure::repositories::{AudioConverter, VoiceCloneRepository};
use anyhow::Context;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

const FALLBACK_UPLOAD_EXTENSION: &str = "upload";
const MAX_EXTENSION_LEN: usize = 5;

pub struct VoiceCloneService {
    normalizer: AudioNormalizer,
    engine: Arc<dyn VoiceCloneRepository>,
    language: LanguageCode,
}

impl VoiceCloneService {
    pub fn new(converter: Arc<dyn AudioConverter>, engine: Arc<dyn VoiceCloneRepository>) -> Self {
        Self {
            normalizer: AudioNormalizer::new(converter),
            engine,
            language: LanguageCode::English,
        }
    }
}

#[async_trait]
pub trait VoiceCloneServiceApi: Send + Sync {
    /// Render the request text in the voice of its first sample
    ///
    /// This operation:
    /// - Persists and normalizes every sample, in upload order
    /// - Calls the engine with the first normalized sample as reference
    /// - Tracks every file it creates in `resources`, before creating it
    ///
    /// On error nothing is released here; the caller owns `resources` and
    /// sweeps it.
    async fn run(
        &self,
        request: SynthesisRequest,
        resources: &mut ResourceSet,
    ) -> Result<SynthesisResult, VoiceCloneError>;
}

#[async_trait]
impl VoiceCloneServiceApi for VoiceCloneService {
    async fn run(
        &self,
        request: SynthesisRequest,
        resources: &mut ResourceSet,
    ) -> Result<SynthesisResult, VoiceCloneError> {
        if request.voice_samples.is_empty() {
            return Err(VoiceCloneError::NoVoiceSamples);
        }

        tracing::info!(
            text_length = request.text.len(),
            sample_count = request.voice_samples.len(),
            "Voice clone request"
        );

        // The engine has no speed/pitch controls yet
        tracing::debug!(
            speed = request.speed,
            pitch = request.pitch,
            "Ignoring speed and pitch"
        );

        // 1. Persist and normalize each sample in upload order
        let normalized = self.normalize_samples(&request, resources).await?;

        // 2. First sample is the voice reference, the rest are unused
        let reference = normalized
            .first()
            .ok_or(VoiceCloneError::NoVoiceSamples)?;
        if normalized.len() > 1 {
            tracing::info!(
                unused_samples = normalized.len() - 1,
                "Using first voice sample as reference"
            );
        }

        // 3. Synthesize into a tracked output artifact
        let output_path = resources.allocate(ArtifactKind::SynthesisOutput, "wav");
        self.engine
            .synthesize(&request.text, reference, self.language, &output_path)
            .await
            .map_err(VoiceCloneError::SynthesisFailed)?;

        let metadata = tokio::fs::metadata(&output_path).await.map_err(|e| {
            VoiceCloneError::SynthesisFailed(format!("engine produced no output file: {}", e))
        })?;
        if metadata.len() == 0 {
            return Err(VoiceCloneError::SynthesisFailed(
                "engine produced an empty output file".to_string(),
            ));
        }

        tracing::info!(
            output = %output_path.display(),
            audio_size = metadata.len(),
            "Voice clone synthesis completed"
        );

        Ok(SynthesisResult {
            output_path,
            mime_type: WAV_MIME_TYPE,
            size_bytes: metadata.len(),
        })
    }
}

impl VoiceCloneService {
    async fn normalize_samples(
        &self,
        request: &SynthesisRequest,
        resources: &mut ResourceSet,
    ) -> Result<Vec<PathBuf>, VoiceCloneError> {
        let mut normalized = Vec::with_capacity(request.voice_samples.len());

        for (index, sample) in request.voice_samples.iter().enumerate() {
            let extension = upload_extension(sample.file_name.as_deref());
            let raw_path = resources.allocate(ArtifactKind::RawUpload, &extension);
            tokio::fs::write(&raw_path, &sample.data)
                .await
                .with_context(|| format!("failed to persist voice sample {}", index))?;

            tracing::debug!(
                sample_index = index,
                size = sample.data.len(),
                content_type = sample.content_type.as_deref().unwrap_or("unknown"),
                path = %raw_path.display(),
                "Voice sample persisted"
            );

            // Converter may leave a partial file behind on failure
            resources.track(
                AudioNormalizer::output_path_for(&raw_path),
                ArtifactKind::NormalizedSample,
            );
            let path = self.normalizer.normalize(&raw_path).await.map_err(|e| {
                tracing::warn!(sample_index = index, error = %e, "Voice sample rejected");
                e
            })?;
            normalized.push(path);
        }

        Ok(normalized)
    }
}

/// Extension for a raw upload, taken from the client file name when sane
fn upload_extension(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or_else(|| FALLBACK_UPLOAD_EXTENSION.to_string())
}
