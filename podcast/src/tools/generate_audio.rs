use crate::config::PodcastConfig;
use crate::error::Result;
use crate::run_dir::ensure_run;
use crate::tools::{GENERATE_AUDIO_TOOL, ScriptArgs, ToolOutcome, truncate};
use crate::tts::{SpeechRequest, SpeechSynthesisProvider};
use crate::wav;
use agent::State;
use agent::llm::Message;
use agent::tools::{FunctionalTool, ToolCall, ToolDefinition};
use async_trait::async_trait;
use std::path::absolute;
use std::sync::Arc;

const MIN_SCRIPT_CHARS: usize = 10;
const MAX_ERROR_CHARS: usize = 200;

/// Synthesizes the dialogue script and writes it to `{run_dir}/{run_id}.wav`.
pub struct GenerateAudio {
    provider: Arc<dyn SpeechSynthesisProvider + Send + Sync>,
    config: Arc<PodcastConfig>,
}

impl GenerateAudio {
    pub fn new(
        provider: Arc<dyn SpeechSynthesisProvider + Send + Sync>,
        config: Arc<PodcastConfig>,
    ) -> Box<Self> {
        Box::new(Self { provider, config })
    }

    pub async fn synthesize(&self, script_text: &str, state: &mut State, topic: &str) -> ToolOutcome {
        tracing::info!(chars = script_text.chars().count(), "starting TTS generation");

        if script_text.trim().chars().count() < MIN_SCRIPT_CHARS {
            return ToolOutcome::error("Script text is too short or empty.".to_string());
        }

        match self.render(script_text, state, topic).await {
            Ok(outcome) => outcome,
            Err(e) => ToolOutcome::error(format!(
                "TTS generation failed: {}",
                truncate(&e.to_string(), MAX_ERROR_CHARS)
            )),
        }
    }

    async fn render(&self, script_text: &str, state: &mut State, topic: &str) -> Result<ToolOutcome> {
        let run = ensure_run(state, topic, &self.config.output_dir)?;

        let request = SpeechRequest::dialogue(&self.config, script_text);
        let pcm = self.provider.synthesize(&request).await?;

        let path = run.artifact("wav");
        wav::write_pcm(&path, &pcm, self.config.audio_format())?;

        let path = absolute(&path)?;
        tracing::info!(path = %path.display(), bytes = pcm.len(), "audio saved");

        Ok(ToolOutcome::saved(
            format!("Audio saved to {}", path.display()),
            &path,
            &absolute(&run.dir)?,
        ))
    }
}

#[async_trait]
impl FunctionalTool for GenerateAudio {
    fn definition(&self) -> agent::Result<ToolDefinition> {
        ToolDefinition::new::<ScriptArgs>(
            GENERATE_AUDIO_TOOL,
            "convert the finished two-speaker podcast script into a WAV audio file in this production's run directory",
        )
    }

    async fn invoke_fn(&mut self, call: &ToolCall, state: &mut State) -> agent::Result<Message> {
        let args: ScriptArgs = call.args()?;
        let outcome = self.synthesize(&args.script_text, state, &args.topic).await;

        Ok(Message::Tool {
            id: call.id.clone(),
            name: GENERATE_AUDIO_TOOL.to_string(),
            result: serde_json::to_string(&outcome)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::GenerateAudio;
    use crate::config::PodcastConfig;
    use crate::error::{Error, Result};
    use crate::run_dir::{RUN_DIR_KEY, RUN_ID_KEY};
    use crate::tools::{SaveScript, ToolOutcome};
    use crate::tts::{SpeechRequest, SpeechSynthesisProvider};
    use agent::State;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    struct MockSpeech {
        pcm: Vec<u8>,
        requests: Mutex<Vec<SpeechRequest>>,
    }

    impl MockSpeech {
        fn new(pcm: Vec<u8>) -> Arc<Self> {
            Arc::new(Self {
                pcm,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SpeechSynthesisProvider for MockSpeech {
        async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(self.pcm.clone())
        }
    }

    struct FailingSpeech;

    #[async_trait]
    impl SpeechSynthesisProvider for FailingSpeech {
        async fn synthesize(&self, _: &SpeechRequest) -> Result<Vec<u8>> {
            Err(Error::Provider(format!("quota exceeded {}", "x".repeat(500))))
        }
    }

    fn config(output_dir: &Path) -> Arc<PodcastConfig> {
        Arc::new(PodcastConfig {
            output_dir: output_dir.to_path_buf(),
            ..PodcastConfig::default()
        })
    }

    #[tokio::test]
    async fn test_rejects_short_scripts() -> Result<()> {
        let out = tempfile::tempdir()?;
        let speech = MockSpeech::new(vec![0; 4]);
        let tool = GenerateAudio::new(speech.clone(), config(out.path()));

        for script in ["", "short", "   \n\t  ", "  123456789  "] {
            let mut state = State::new();
            let outcome = tool.synthesize(script, &mut state, "t").await;
            assert_eq!(
                outcome,
                ToolOutcome::Error {
                    message: "Script text is too short or empty.".to_string()
                }
            );
            assert!(state.is_empty());
        }

        assert_eq!(speech.calls(), 0);
        assert_eq!(std::fs::read_dir(out.path())?.count(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_ten_characters_pass_validation() -> Result<()> {
        let out = tempfile::tempdir()?;
        let speech = MockSpeech::new(vec![0; 4]);
        let tool = GenerateAudio::new(speech.clone(), config(out.path()));

        let outcome = tool.synthesize("exactly10!", &mut State::new(), "t").await;
        assert!(outcome.is_success(), "{:?}", outcome);
        assert_eq!(speech.calls(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_writes_wav_into_run() -> Result<()> {
        let out = tempfile::tempdir()?;
        let pcm: Vec<u8> = (0..480u32).map(|i| (i % 256) as u8).collect();
        let speech = MockSpeech::new(pcm.clone());
        let tool = GenerateAudio::new(speech.clone(), config(out.path()));
        let mut state = State::new();

        let outcome = tool
            .synthesize("Speaker 1: Hello there!\nSpeaker 2: Hi!", &mut state, "greetings")
            .await;
        let ToolOutcome::Success { file_path, message, .. } = outcome.clone() else {
            panic!("expected success, got {:?}", outcome);
        };

        let run_dir = state.get(RUN_DIR_KEY).expect("run_dir set");
        let run_id = state.get(RUN_ID_KEY).expect("run_id set");
        let expected = Path::new(run_dir).join(format!("{}.wav", run_id));
        assert_eq!(Path::new(&file_path), std::path::absolute(&expected)?);
        assert_eq!(message, format!("Audio saved to {}", file_path));

        let mut reader = hound::WavReader::open(&expected)?;
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.spec().sample_rate, 24000);
        assert_eq!(reader.spec().bits_per_sample, 16);
        let decoded = reader
            .samples::<i16>()
            .map(|s| s.map(i16::to_le_bytes))
            .collect::<std::result::Result<Vec<_>, _>>()?
            .concat();
        assert_eq!(decoded, pcm);

        let requests = speech.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].text.ends_with("\n\nSpeaker 1: Hello there!\nSpeaker 2: Hi!"));
        assert_eq!(requests[0].speakers[0].voice, "Zephyr");
        assert_eq!(requests[0].speakers[1].voice, "Puck");

        Ok(())
    }

    #[tokio::test]
    async fn test_shares_run_with_script() -> Result<()> {
        let out = tempfile::tempdir()?;
        let config = config(out.path());
        let save = SaveScript::new(config.output_dir.clone());
        let audio = GenerateAudio::new(MockSpeech::new(vec![0; 8]), config);
        let mut state = State::new();

        let script = save.save("Speaker 1: Welcome to the show.", &mut state, "first");
        let sound = audio
            .synthesize("Speaker 1: Welcome to the show.", &mut state, "second")
            .await;

        let (
            ToolOutcome::Success { run_directory: a, file_path: txt, .. },
            ToolOutcome::Success { run_directory: b, file_path: wav, .. },
        ) = (script, sound)
        else {
            panic!("expected both tools to succeed");
        };
        assert_eq!(a, b);
        assert_eq!(Path::new(&txt).with_extension("wav"), Path::new(&wav));
        assert!(state.get(RUN_ID_KEY).is_some_and(|id| id.ends_with("_first")));
        assert_eq!(std::fs::read_dir(out.path())?.count(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_provider_failure_is_truncated() -> Result<()> {
        let out = tempfile::tempdir()?;
        let tool = GenerateAudio::new(Arc::new(FailingSpeech), config(out.path()));

        let outcome = tool
            .synthesize("Speaker 1: long enough script", &mut State::new(), "t")
            .await;

        let ToolOutcome::Error { message } = outcome else {
            panic!("expected an error");
        };
        let detail = message
            .strip_prefix("TTS generation failed: ")
            .expect("error prefix");
        assert_eq!(detail.chars().count(), 200);
        assert!(detail.starts_with("Speech provider error: quota exceeded"));

        Ok(())
    }

    #[tokio::test]
    async fn test_partial_frame_audio_is_saved() -> Result<()> {
        let out = tempfile::tempdir()?;
        let tool = GenerateAudio::new(MockSpeech::new(vec![1, 2, 3]), config(out.path()));

        let outcome = tool
            .synthesize("Speaker 1: long enough script", &mut State::new(), "t")
            .await;
        let ToolOutcome::Success { file_path, .. } = outcome.clone() else {
            panic!("expected success, got {:?}", outcome);
        };

        let wav = std::fs::read(&file_path)?;
        assert_eq!(wav.len(), 47);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32::from_le_bytes(wav[40..44].try_into().unwrap()), 3);
        assert_eq!(&wav[44..], &[1, 2, 3]);

        Ok(())
    }
}
