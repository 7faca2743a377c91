use axum::body::Bytes;
use std::path::PathBuf;

pub const WAV_MIME_TYPE: &str = "audio/wav";

/// One uploaded voice sample, as received
#[derive(Debug, Clone)]
pub struct VoiceSample {
    pub data: Bytes,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

/// Input for POST /generate
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    /// Parsed and validated, not forwarded to the engine
    pub speed: f32,
    /// Parsed and validated, not forwarded to the engine
    pub pitch: f32,
    /// Upload order; the first one is the voice reference
    pub voice_samples: Vec<VoiceSample>,
}

/// Rendered speech, still sitting in its temporary artifact
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    pub output_path: PathBuf,
    pub mime_type: &'static str,
    pub size_bytes: u64,
}
