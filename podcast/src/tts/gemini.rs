use crate::error::{Error, Result};
use crate::tts::{SpeechRequest, SpeechSynthesisProvider};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Multi-speaker speech synthesis through the Gemini `generateContent` api.
pub struct GeminiSpeech {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiSpeech {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, GEMINI_API_BASE.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }

    fn url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Serialize, Deserialize)]
struct InlineData {
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_modalities: Vec<&'static str>,
    speech_config: SpeechConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    multi_speaker_voice_config: MultiSpeakerVoiceConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MultiSpeakerVoiceConfig {
    speaker_voice_configs: Vec<SpeakerVoiceConfig>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeakerVoiceConfig {
    speaker: String,
    voice_config: VoiceConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl From<&SpeechRequest> for GenerateContentRequest {
    fn from(request: &SpeechRequest) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(request.text.clone()),
                    inline_data: None,
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                response_modalities: vec!["AUDIO"],
                speech_config: SpeechConfig {
                    multi_speaker_voice_config: MultiSpeakerVoiceConfig {
                        speaker_voice_configs: request
                            .speakers
                            .iter()
                            .map(|s| SpeakerVoiceConfig {
                                speaker: s.speaker.clone(),
                                voice_config: VoiceConfig {
                                    prebuilt_voice_config: PrebuiltVoiceConfig {
                                        voice_name: s.voice.clone(),
                                    },
                                },
                            })
                            .collect(),
                    },
                },
            },
        }
    }
}

impl GenerateContentResponse {
    /// Decoded samples of the first inline audio part of the first candidate.
    fn into_audio(self) -> Result<Vec<u8>> {
        let data = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.inline_data))
            .ok_or(Error::Provider("response carried no audio".to_string()))?;

        Ok(STANDARD.decode(data.data)?)
    }
}

#[async_trait]
impl SpeechSynthesisProvider for GeminiSpeech {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>> {
        tracing::debug!(
            model = %request.model,
            chars = request.text.len(),
            "requesting speech synthesis"
        );

        let res = self
            .client
            .post(self.url(&request.model))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&GenerateContentRequest::from(request))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(Error::Provider(format!("{}: {}", status, body)));
        }

        let audio = res.json::<GenerateContentResponse>().await?.into_audio()?;
        tracing::debug!(bytes = audio.len(), "speech synthesis returned audio");

        Ok(audio)
    }
}
