use super::error::VoiceCloneError;
use crate::infrastructure::repositories::AudioConverter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Channel count the engine expects for reference audio
pub const TARGET_CHANNELS: u16 = 1;
/// Sample rate the engine expects for reference audio
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Turns an uploaded clip into mono 16 kHz WAV
pub struct AudioNormalizer {
    converter: Arc<dyn AudioConverter>,
}

impl AudioNormalizer {
    pub fn new(converter: Arc<dyn AudioConverter>) -> Self {
        Self { converter }
    }

    /// Where the normalized copy of `input` will be written.
    ///
    /// Always differs from `input`, so the caller can track it before
    /// [`AudioNormalizer::normalize`] runs.
    pub fn output_path_for(input: &Path) -> PathBuf {
        input.with_extension("16k.wav")
    }

    /// Convert `input` and return the path of the normalized WAV.
    ///
    /// The output file may exist even when this fails.
    pub async fn normalize(&self, input: &Path) -> Result<PathBuf, VoiceCloneError> {
        let output = Self::output_path_for(input);

        self.converter
            .convert(input, &output, TARGET_CHANNELS, TARGET_SAMPLE_RATE)
            .await
            .map_err(VoiceCloneError::ConversionFailed)?;

        Ok(output)
    }
}
