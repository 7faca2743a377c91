use super::voice_clone_repository::VoiceCloneRepository;
use crate::domain::voice_clone::LanguageCode;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::Semaphore;

/// Coqui TTS implementation of the voice clone repository.
///
/// Drives the `tts` command line with a multi-speaker, multilingual model
/// (YourTTS by default) using the reference WAV as `--speaker_wav`.
pub struct CoquiTtsRepository {
    binary: String,
    model_name: String,
    timeout: Option<Duration>,
    permits: Arc<Semaphore>,
}

impl CoquiTtsRepository {
    pub fn new(
        binary: String,
        model_name: String,
        timeout: Option<Duration>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            binary,
            model_name,
            timeout,
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
        }
    }

    fn build_args(
        &self,
        text: &str,
        reference: &Path,
        language: LanguageCode,
        output: &Path,
    ) -> Vec<OsString> {
        // Attached form so text starting with '-' is not read as an option
        vec![
            format!("--text={}", text).into(),
            "--model_name".into(),
            self.model_name.as_str().into(),
            "--speaker_wav".into(),
            reference.as_os_str().to_owned(),
            "--language_idx".into(),
            language.as_str().into(),
            "--out_path".into(),
            output.as_os_str().to_owned(),
        ]
    }
}

#[async_trait]
impl VoiceCloneRepository for CoquiTtsRepository {
    async fn synthesize(
        &self,
        text: &str,
        reference: &Path,
        language: LanguageCode,
        output: &Path,
    ) -> Result<(), String> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| format!("synthesis engine unavailable: {}", e))?;

        let start_time = std::time::Instant::now();

        tracing::info!(
            model = %self.model_name,
            language = %language,
            text_length = text.len(),
            reference = %reference.display(),
            "Starting Coqui TTS synthesis"
        );

        let child = Command::new(&self.binary)
            .args(self.build_args(text, reference, language, output))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("failed to run {}: {}", self.binary, e))?;

        let output_result = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, child.wait_with_output())
                .await
                .map_err(|_| {
                    format!("synthesis timed out after {:.1}s", timeout.as_secs_f64())
                })?,
            None => child.wait_with_output().await,
        }
        .map_err(|e| format!("failed to wait for {}: {}", self.binary, e))?;

        if !output_result.status.success() {
            let stderr = String::from_utf8_lossy(&output_result.stderr);
            tracing::error!(
                exit_code = output_result.status.code().unwrap_or(-1),
                model = %self.model_name,
                stderr = %stderr.trim(),
                "Coqui TTS synthesis failed"
            );
            return Err(format!("tts failed: {}", stderr.trim()));
        }

        tracing::info!(
            provider = "coqui",
            model = %self.model_name,
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = text.len(),
            "TTS synthesis completed"
        );

        Ok(())
    }
}
