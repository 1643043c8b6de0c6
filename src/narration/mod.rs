//! Best-effort text-to-speech for card reveals.
//!
//! Every `speak` call runs on its own thread: synthesize, write a temporary
//! mp3, play it, delete it. Failures end up in the log and nowhere else.
use crate::config::NarrationConfig;
use crate::error::NarrationError;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::thread;

pub mod google;
pub mod player;

use google::GoogleTts;
use player::CommandPlayer;

/// Something that can read card text aloud without blocking the caller.
pub trait Narrate: Send + Sync {
    fn speak(&self, text: &str);
}

/// Used with `--no-narration` or when the narrator could not be built.
pub struct Silent;

impl Narrate for Silent {
    fn speak(&self, _text: &str) {}
}

pub trait SpeechSynthesizer: Send + Sync {
    /// mp3 bytes for `text` spoken in `language`
    fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, NarrationError>;
}

pub trait AudioPlayer: Send + Sync {
    /// blocks until playback of `path` has finished
    fn play(&self, path: &Path) -> Result<(), NarrationError>;
}

/// Fire-and-forget narration: overlapping reveals give overlapping audio.
#[derive(Clone)]
pub struct Narrator {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    player: Arc<dyn AudioPlayer>,
    language: String,
}

impl Narrator {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        player: Arc<dyn AudioPlayer>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            synthesizer,
            player,
            language: language.into(),
        }
    }

    pub fn from_config(config: &NarrationConfig) -> Result<Self, NarrationError> {
        let synthesizer = GoogleTts::new(&config.endpoint)?;
        let player = CommandPlayer::from_argv(&config.player)?;
        Ok(Self::new(
            Arc::new(synthesizer),
            Arc::new(player),
            config.language.clone(),
        ))
    }

    /// One narration on the calling thread. The temporary file is owned by
    /// this call and removed afterwards even if playback failed.
    pub fn narrate(&self, text: &str) -> Result<(), NarrationError> {
        if text.trim().is_empty() {
            return Err(NarrationError::EmptyText);
        }
        let audio = self.synthesizer.synthesize(text, &self.language)?;

        let mut file = tempfile::Builder::new()
            .prefix("flashcard-")
            .suffix(".mp3")
            .tempfile()?;
        file.write_all(&audio)?;
        file.flush()?;

        let played = self.player.play(file.path());
        if let Err(e) = file.close() {
            log::debug!("failed to remove temporary audio file: {e}");
        }
        played
    }
}

impl Narrate for Narrator {
    fn speak(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        let narrator = self.clone();
        let text = text.to_owned();
        let spawned = thread::Builder::new()
            .name("narration".into())
            .spawn(move || {
                if let Err(e) = narrator.narrate(&text) {
                    log::warn!("Text-to-speech error: {e}");
                }
            });
        if let Err(e) = spawned {
            log::warn!("failed to start narration thread: {e}");
        }
    }
}

/// The configured narrator, or [`Silent`] when narration is off or unusable.
pub fn from_config(config: &NarrationConfig) -> Arc<dyn Narrate> {
    if !config.enabled {
        return Arc::new(Silent);
    }
    match Narrator::from_config(config) {
        Ok(narrator) => Arc::new(narrator),
        Err(e) => {
            log::warn!("narration disabled: {e}");
            Arc::new(Silent)
        }
    }
}
