//! Flat JSON file holding every card.
//!
//! The whole file is rewritten on each change; a missing or unreadable file
//! simply means "no cards yet".
use crate::card::Card;
use crate::error::StoreError;
use crate::utils::normalize_field;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_CARDS_FILE: &str = "flashcards.json";

#[derive(Debug, Clone)]
pub struct CardStore {
    path: PathBuf,
    cards: Vec<Card>,
}

impl CardStore {
    /// Never fails: a missing or malformed file yields an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cards = read_cards(&path);
        log::debug!("loaded {} cards from {:?}", cards.len(), path);
        Self { path, cards }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Append a card and rewrite the file.
    ///
    /// Both fields are trimmed first and must be non-empty. If the file cannot
    /// be written the card is dropped again, so memory never runs ahead of disk.
    pub fn add(&mut self, question: &str, answer: &str) -> Result<&Card, StoreError> {
        let question = normalize_field(question);
        let answer = normalize_field(answer);
        if question.is_empty() {
            return Err(StoreError::EmptyQuestion);
        }
        if answer.is_empty() {
            return Err(StoreError::EmptyAnswer);
        }

        self.cards.push(Card::new(question, answer));
        if let Err(e) = self.save() {
            self.cards.pop();
            return Err(e);
        }
        log::info!("added card #{} to {:?}", self.cards.len() - 1, self.path);
        Ok(&self.cards[self.cards.len() - 1])
    }

    /// Overwrite the file with the full in-memory sequence.
    pub fn save(&self) -> Result<(), StoreError> {
        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.cards.serialize(&mut ser)?;

        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&self.path, buf).map_err(io_err)
    }
}

fn read_cards(path: &Path) -> Vec<Card> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            log::warn!("failed to read {:?}, starting with no cards: {e}", path);
            return Vec::new();
        }
    };
    match serde_json::from_str(&contents) {
        Ok(cards) => cards,
        Err(e) => {
            log::warn!("{:?} is not a valid card file, starting with no cards: {e}", path);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> CardStore {
        CardStore::load(dir.path().join(DEFAULT_CARDS_FILE))
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn malformed_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CARDS_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert!(CardStore::load(&path).is_empty());

        fs::write(&path, r#"[{"question": "only a question"}]"#).unwrap();
        assert!(CardStore::load(&path).is_empty());
    }

    #[test]
    fn added_card_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add("2 + 2", "4").unwrap();
        store.add("  capital of France?\n", " Paris ").unwrap();

        let reloaded = store_in(&dir);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(
            reloaded.cards().last(),
            Some(&Card::new("capital of France?", "Paris"))
        );
        assert_eq!(reloaded.cards(), store.cards());
    }

    #[test]
    fn blank_fields_leave_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add("q", "a").unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        assert!(matches!(store.add("", "a"), Err(StoreError::EmptyQuestion)));
        assert!(matches!(store.add("q", " \n "), Err(StoreError::EmptyAnswer)));

        assert_eq!(store.len(), 1);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn file_uses_question_answer_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add("hello", "world").unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{ "question": "hello", "answer": "world" }])
        );
        assert!(raw.contains("\n        \"question\""));
    }

    #[test]
    fn failed_write_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the file should be makes the write fail
        let path = dir.path().join(DEFAULT_CARDS_FILE);
        fs::create_dir(&path).unwrap();
        let mut store = CardStore::load(&path);

        assert!(matches!(store.add("q", "a"), Err(StoreError::Io { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deck.json");
        let mut store = CardStore::load(&path);
        store.add("q", "a").unwrap();
        assert_eq!(CardStore::load(&path).len(), 1);
    }
}
