use crate::config::PodcastConfig;
use crate::error::Result;
use async_trait::async_trait;

mod gemini;
pub use gemini::GeminiSpeech;

pub const SPEAKER_1: &str = "Speaker 1";
pub const SPEAKER_2: &str = "Speaker 2";

const READ_ALOUD_INSTRUCTION: &str =
    "Read aloud in a warm, conversational podcast tone with natural pauses.";
const TEMPERATURE: f32 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SpeakerVoice {
    pub speaker: String,
    pub voice: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub model: String,
    pub text: String,
    pub speakers: Vec<SpeakerVoice>,
    pub temperature: f32,
}

impl SpeechRequest {
    /// Request reading `script` with the two configured podcast voices.
    pub fn dialogue(config: &PodcastConfig, script: &str) -> Self {
        Self {
            model: config.model_tts.clone(),
            text: format!("{}\n\n{}", READ_ALOUD_INSTRUCTION, script),
            speakers: vec![
                SpeakerVoice {
                    speaker: SPEAKER_1.to_string(),
                    voice: config.voice_speaker_1.clone(),
                },
                SpeakerVoice {
                    speaker: SPEAKER_2.to_string(),
                    voice: config.voice_speaker_2.clone(),
                },
            ],
            temperature: TEMPERATURE,
        }
    }
}

/// Turns text into raw PCM samples.
#[async_trait]
pub trait SpeechSynthesisProvider {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>>;
}
