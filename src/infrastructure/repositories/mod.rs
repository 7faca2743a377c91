pub mod audio_converter;
pub mod coqui_tts_repository;
pub mod ffmpeg_converter;
pub mod voice_clone_repository;

pub use audio_converter::AudioConverter;
pub use coqui_tts_repository::CoquiTtsRepository;
pub use ffmpeg_converter::FfmpegConverter;
pub use voice_clone_repository::VoiceCloneRepository;
