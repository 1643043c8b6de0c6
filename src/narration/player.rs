use super::AudioPlayer;
use crate::error::NarrationError;
use std::path::Path;
use std::process::{Command, Stdio};

/// Plays audio by running an external program with the file path appended,
/// e.g. `mpg123 -q <file>`.
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    pub fn from_argv(argv: &[String]) -> Result<Self, NarrationError> {
        let Some((program, args)) = argv.split_first() else {
            return Err(NarrationError::NoPlayer);
        };
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl AudioPlayer for CommandPlayer {
    fn play(&self, path: &Path) -> Result<(), NarrationError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        if !status.success() {
            return Err(NarrationError::Player {
                program: self.program.clone(),
                status,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_argv_has_no_player() {
        assert!(matches!(
            CommandPlayer::from_argv(&[]),
            Err(NarrationError::NoPlayer)
        ));
    }

    #[test]
    fn missing_program_is_io_error() {
        let player = CommandPlayer::from_argv(&argv(&["definitely-not-an-audio-player-xyz"]))
            .unwrap();
        assert!(matches!(
            player.play(Path::new("card.mp3")),
            Err(NarrationError::Io(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn exit_status_decides_success() {
        let ok = CommandPlayer::from_argv(&argv(&["true"])).unwrap();
        assert!(ok.play(Path::new("card.mp3")).is_ok());

        let failing = CommandPlayer::from_argv(&argv(&["false"])).unwrap();
        assert!(matches!(
            failing.play(Path::new("card.mp3")),
            Err(NarrationError::Player { .. })
        ));
    }
}
