use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("question must not be empty")]
    EmptyQuestion,

    #[error("answer must not be empty")]
    EmptyAnswer,

    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize cards: {0}")]
    Json(#[from] serde_json::Error),
}

/// Misuse of a practice session.
///
/// The desktop version made these unreachable by disabling buttons; here both
/// the terminal and the web surface can send any action, so they are reported.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("no flashcards yet, please add flashcards first")]
    EmptyDeck,

    #[error("show the answer before grading the card")]
    AnswerHidden,

    #[error("the answer is already shown")]
    AnswerAlreadyShown,
}

#[derive(Error, Debug)]
pub enum NarrationError {
    #[error("nothing to narrate")]
    EmptyText,

    #[error("speech request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid speech endpoint: {0}")]
    Url(#[from] url::ParseError),

    #[error("audio file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("audio player {program:?} exited with {status}")]
    Player {
        program: String,
        status: std::process::ExitStatus,
    },

    #[error("no audio player configured")]
    NoPlayer,
}
