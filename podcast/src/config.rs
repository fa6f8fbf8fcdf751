use crate::error::{Error, Result};
use crate::wav::PcmFormat;
use clap::{Args, Parser};
use std::path::PathBuf;

pub const GEMINI_OPENAI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

const DEFAULT_MODEL_RESEARCHER: &str = "gemini-2.5-flash";
const DEFAULT_MODEL_SCRIPTWRITER: &str = "gemini-2.5-pro";
const DEFAULT_MODEL_TTS: &str = "gemini-2.5-pro-preview-tts";
const DEFAULT_VOICE_SPEAKER_1: &str = "Zephyr";
const DEFAULT_VOICE_SPEAKER_2: &str = "Puck";
const DEFAULT_SAMPLE_RATE: u32 = 24000;
const DEFAULT_CHANNELS: u16 = 1;
const DEFAULT_SAMPLE_WIDTH: u16 = 2;
const DEFAULT_OUTPUT_DIR: &str = "output";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Parser, Debug)]
#[command(
    name = "podcast",
    about = "Research a topic and produce a two-speaker podcast episode"
)]
pub struct Cli {
    /// Topic of the episode
    pub topic: String,

    #[command(flatten)]
    pub config: PodcastConfig,
}

/// Settings shared by every stage of a production.
#[derive(Args, Debug, Clone)]
pub struct PodcastConfig {
    /// Model used for research and for coordinating the production
    #[arg(long, env = "PODCAST_MODEL_RESEARCHER", default_value = DEFAULT_MODEL_RESEARCHER)]
    pub model_researcher: String,

    /// Model used to write the dialogue script
    #[arg(long, env = "PODCAST_MODEL_SCRIPTWRITER", default_value = DEFAULT_MODEL_SCRIPTWRITER)]
    pub model_scriptwriter: String,

    /// Text-to-speech model
    #[arg(long, env = "PODCAST_MODEL_TTS", default_value = DEFAULT_MODEL_TTS)]
    pub model_tts: String,

    /// Voice for "Speaker 1"
    #[arg(long = "voice-speaker-1", env = "PODCAST_VOICE_SPEAKER_1", default_value = DEFAULT_VOICE_SPEAKER_1)]
    pub voice_speaker_1: String,

    /// Voice for "Speaker 2"
    #[arg(long = "voice-speaker-2", env = "PODCAST_VOICE_SPEAKER_2", default_value = DEFAULT_VOICE_SPEAKER_2)]
    pub voice_speaker_2: String,

    #[arg(long, env = "PODCAST_AUDIO_SAMPLE_RATE", default_value_t = DEFAULT_SAMPLE_RATE)]
    pub sample_rate: u32,

    #[arg(long, env = "PODCAST_AUDIO_CHANNELS", default_value_t = DEFAULT_CHANNELS)]
    pub channels: u16,

    /// Bytes per sample
    #[arg(long, env = "PODCAST_AUDIO_SAMPLE_WIDTH", default_value_t = DEFAULT_SAMPLE_WIDTH)]
    pub sample_width: u16,

    /// Directory holding one sub-directory per run
    #[arg(long, env = "PODCAST_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, env = "PODCAST_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// OpenAI-compatible endpoint for the text models
    #[arg(long, env = "PODCAST_API_BASE", default_value = GEMINI_OPENAI_API_BASE)]
    pub api_base: String,

    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: String,
}

impl Default for PodcastConfig {
    fn default() -> Self {
        Self {
            model_researcher: DEFAULT_MODEL_RESEARCHER.to_string(),
            model_scriptwriter: DEFAULT_MODEL_SCRIPTWRITER.to_string(),
            model_tts: DEFAULT_MODEL_TTS.to_string(),
            voice_speaker_1: DEFAULT_VOICE_SPEAKER_1.to_string(),
            voice_speaker_2: DEFAULT_VOICE_SPEAKER_2.to_string(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: DEFAULT_CHANNELS,
            sample_width: DEFAULT_SAMPLE_WIDTH,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            api_base: GEMINI_OPENAI_API_BASE.to_string(),
            api_key: String::new(),
        }
    }
}

impl PodcastConfig {
    pub fn validate(&self) -> Result<()> {
        if self.voice_speaker_1 == self.voice_speaker_2 {
            return Err(Error::InvalidConfig(format!(
                "both speakers use voice {}, the two voices must differ",
                self.voice_speaker_1
            )));
        }
        if self.channels == 0 {
            return Err(Error::InvalidConfig("channels must be at least 1".to_string()));
        }
        if !(1..=4).contains(&self.sample_width) {
            return Err(Error::InvalidConfig(format!(
                "sample width must be between 1 and 4 bytes, got {}",
                self.sample_width
            )));
        }
        if self.sample_rate == 0 {
            return Err(Error::InvalidConfig("sample rate must be positive".to_string()));
        }
        Ok(())
    }

    pub fn audio_format(&self) -> PcmFormat {
        PcmFormat {
            channels: self.channels,
            sample_rate: self.sample_rate,
            sample_width: self.sample_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, PodcastConfig};
    use crate::error::Error;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["podcast", "The history of AI", "--api-key", "key"])
            .expect("valid args");

        assert_eq!(cli.topic, "The history of AI");
        assert_eq!(cli.config.api_key, "key");
        assert_eq!(cli.config.sample_rate, 24000);
        assert_eq!(cli.config.channels, 1);
        assert_eq!(cli.config.sample_width, 2);
        assert_eq!(cli.config.output_dir, PathBuf::from("output"));
        assert_eq!(cli.config.voice_speaker_1, "Zephyr");
        assert_eq!(cli.config.voice_speaker_2, "Puck");
        assert!(cli.config.validate().is_ok());
    }

    #[test]
    fn test_default_matches_cli() {
        let cli = Cli::try_parse_from(["podcast", "topic", "--api-key", "key"]).expect("valid args");
        let defaults = PodcastConfig::default();

        assert_eq!(cli.config.model_researcher, defaults.model_researcher);
        assert_eq!(cli.config.model_scriptwriter, defaults.model_scriptwriter);
        assert_eq!(cli.config.model_tts, defaults.model_tts);
        assert_eq!(cli.config.voice_speaker_1, defaults.voice_speaker_1);
        assert_eq!(cli.config.voice_speaker_2, defaults.voice_speaker_2);
        assert_eq!(cli.config.audio_format(), defaults.audio_format());
        assert_eq!(cli.config.output_dir, defaults.output_dir);
        assert_eq!(cli.config.log_level, defaults.log_level);
        assert_eq!(cli.config.api_base, defaults.api_base);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "podcast",
            "rust",
            "--api-key",
            "key",
            "--output-dir",
            "/tmp/episodes",
            "--voice-speaker-1",
            "Kore",
            "--sample-rate",
            "16000",
        ])
        .expect("valid args");

        assert_eq!(cli.config.output_dir, PathBuf::from("/tmp/episodes"));
        assert_eq!(cli.config.voice_speaker_1, "Kore");
        assert_eq!(cli.config.audio_format().sample_rate, 16000);
    }

    #[test]
    fn test_validate() {
        assert!(PodcastConfig::default().validate().is_ok());

        let same_voice = PodcastConfig {
            voice_speaker_2: "Zephyr".to_string(),
            ..PodcastConfig::default()
        };
        assert!(matches!(same_voice.validate(), Err(Error::InvalidConfig(_))));

        let wide = PodcastConfig {
            sample_width: 5,
            ..PodcastConfig::default()
        };
        assert!(matches!(wide.validate(), Err(Error::InvalidConfig(_))));

        let silent = PodcastConfig {
            channels: 0,
            ..PodcastConfig::default()
        };
        assert!(matches!(silent.validate(), Err(Error::InvalidConfig(_))));
    }
}
