pub mod dto;
pub mod error;
pub mod language;
pub mod normalizer;
pub mod service;

pub use dto::{SynthesisRequest, SynthesisResult, VoiceSample, WAV_MIME_TYPE};
pub use error::VoiceCloneError;
pub use language::LanguageCode;
pub use normalizer::AudioNormalizer;
pub use service::{VoiceCloneService, VoiceCloneServiceApi};
