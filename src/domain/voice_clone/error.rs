use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum VoiceCloneError {
    #[error("Missing voice samples: upload at least one sample_<n> file")]
    NoVoiceSamples,
    #[error("Audio conversion failed: {0}")]
    ConversionFailed(String),
    #[error("Speech synthesis failed: {0}")]
    SynthesisFailed(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<VoiceCloneError> for AppError {
    fn from(err: VoiceCloneError) -> Self {
        match err {
            VoiceCloneError::NoVoiceSamples => AppError::BadRequest(err.to_string()),
            VoiceCloneError::ConversionFailed(msg) => AppError::ConversionFailed(msg),
            VoiceCloneError::SynthesisFailed(msg) => AppError::SynthesisFailed(msg),
            VoiceCloneError::Other(e) => AppError::Internal(format!("{:#}", e)),
        }
    }
}
