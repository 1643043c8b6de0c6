//! Interactive terminal: main menu, add-card form and practice view.
use crate::card::Card;
use crate::error::StoreError;
use crate::narration::Narrate;
use crate::review::{Phase, Review};
use crate::store::CardStore;
use anyhow::Result;
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

const END_OF_FIELD: &str = ".";

/// Line-oriented input and output, stdin/stdout in the binary.
pub struct Terminal<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> Terminal<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> O {
        self.output
    }

    fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// `None` once input is exhausted.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
    }

    /// Multi-line field, terminated by a line holding only [`END_OF_FIELD`].
    /// Blank lines are kept as part of the text.
    fn read_block(&mut self, label: &str) -> io::Result<Option<String>> {
        self.say(format!("{label} (finish with a line containing only '{END_OF_FIELD}'):"))?;
        let mut lines = Vec::new();
        loop {
            match self.read_line("")? {
                None if lines.is_empty() => return Ok(None),
                None => break,
                Some(line) if line.trim() == END_OF_FIELD => break,
                Some(line) => lines.push(line),
            }
        }
        Ok(Some(lines.join("\n")))
    }
}

pub struct MainMenu {
    store: CardStore,
    narrator: Arc<dyn Narrate>,
    seed: Option<u64>,
}

impl MainMenu {
    pub fn new(store: CardStore, narrator: Arc<dyn Narrate>, seed: Option<u64>) -> Self {
        Self {
            store,
            narrator,
            seed,
        }
    }

    pub fn run<I: BufRead, O: Write>(&mut self, term: &mut Terminal<I, O>) -> Result<()> {
        loop {
            term.say("\nFlashcard Program")?;
            term.say(format!("  [a] Add flashcards ({} stored)", self.store.len()))?;
            term.say("  [p] Practice")?;
            term.say("  [l] List")?;
            term.say("  [q] Quit")?;
            let Some(choice) = term.read_line("> ")? else {
                return Ok(());
            };
            match choice.trim().to_lowercase().as_str() {
                "a" | "add" => add_card(&mut self.store, term)?,
                "p" | "practice" => {
                    practice(self.store.cards(), self.seed, self.narrator.clone(), term)?
                }
                "l" | "list" => list_cards(&self.store, term)?,
                "q" | "quit" => return Ok(()),
                "" => {}
                other => term.say(format!("unknown choice {other:?}"))?,
            }
        }
    }
}

/// The add-card form. Blank fields get a warning and change nothing.
pub fn add_card<I: BufRead, O: Write>(
    store: &mut CardStore,
    term: &mut Terminal<I, O>,
) -> Result<()> {
    term.say("\nAdd Flashcard")?;
    let Some(question) = term.read_block("Question")? else {
        return Ok(());
    };
    let Some(answer) = term.read_block("Answer")? else {
        return Ok(());
    };
    match store.add(&question, &answer) {
        Ok(_) => term.say("Flashcard added!")?,
        Err(StoreError::EmptyQuestion | StoreError::EmptyAnswer) => {
            term.say("Error: Both fields are required!")?
        }
        Err(e) => term.say(format!("Error: {e}"))?,
    }
    Ok(())
}

pub fn list_cards<I: BufRead, O: Write>(
    store: &CardStore,
    term: &mut Terminal<I, O>,
) -> Result<()> {
    if store.is_empty() {
        term.say("no flashcards yet")?;
    }
    for (i, card) in store.cards().iter().enumerate() {
        term.say(format!("{i:>4}  {card}"))?;
    }
    Ok(())
}

/// The practice view. Loops until the user quits or input ends.
pub fn practice<I: BufRead, O: Write>(
    cards: &[Card],
    seed: Option<u64>,
    narrator: Arc<dyn Narrate>,
    term: &mut Terminal<I, O>,
) -> Result<()> {
    let mut review = match Review::seeded(cards.to_vec(), seed, narrator) {
        Ok(review) => review,
        Err(e) => {
            term.say(format!("No Cards: {e}"))?;
            return Ok(());
        }
    };

    loop {
        let view = review.view();
        let heading = match view.phase {
            Phase::QuestionShown => "Question",
            Phase::AnswerShown => "Answer",
        };
        term.say(format!("\n--- {heading} ---\n{}\n{}", view.text, view.progress_text))?;
        let prompt = if view.can_reveal {
            "[s] show answer  [q] quit > "
        } else {
            "[c] correct  [i] incorrect  [q] quit > "
        };

        let Some(choice) = term.read_line(prompt)? else {
            return Ok(());
        };
        let result = match choice.trim().to_lowercase().as_str() {
            "s" | "show" => review.reveal(),
            "c" | "correct" => review.grade(true),
            "i" | "incorrect" => review.grade(false),
            "q" | "quit" => return Ok(()),
            other => {
                term.say(format!("unknown choice {other:?}"))?;
                continue;
            }
        };
        if let Err(e) = result {
            term.say(format!("Error: {e}"))?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::tests::Spoken;
    use crate::store::DEFAULT_CARDS_FILE;
    use std::io::Cursor;

    fn terminal(input: &str) -> Terminal<Cursor<Vec<u8>>, Vec<u8>> {
        Terminal::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(term: Terminal<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(term.into_output()).unwrap()
    }

    #[test]
    fn add_from_menu_persists_multiline_card() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CARDS_FILE);
        let mut menu = MainMenu::new(CardStore::load(&path), Arc::new(Spoken::default()), None);
        let mut term = terminal("a\nfirst line\nsecond line\n.\nthe answer\n.\nq\n");

        menu.run(&mut term).unwrap();

        let reloaded = CardStore::load(&path);
        assert_eq!(
            reloaded.cards(),
            &[Card::new("first line\nsecond line", "the answer")]
        );
        assert!(output(term).contains("Flashcard added!"));
    }

    #[test]
    fn fields_keep_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CardStore::load(dir.path().join(DEFAULT_CARDS_FILE));
        let mut term = terminal("Name both:\n\n- first\n- second\n.\none\n\ntwo\n.\n");

        add_card(&mut store, &mut term).unwrap();

        assert_eq!(
            store.cards(),
            &[Card::new("Name both:\n\n- first\n- second", "one\n\ntwo")]
        );
    }

    #[test]
    fn blank_answer_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CardStore::load(dir.path().join(DEFAULT_CARDS_FILE));
        let mut term = terminal("question\n.\n\n.\n");

        add_card(&mut store, &mut term).unwrap();

        assert!(store.is_empty());
        assert!(!store.path().exists());
        assert!(output(term).contains("Both fields are required!"));
    }

    #[test]
    fn practice_needs_cards() {
        let spoken = Arc::new(Spoken::default());
        let mut term = terminal("s\n");
        practice(&[], Some(1), spoken.clone(), &mut term).unwrap();

        assert!(output(term).contains("please add flashcards first"));
        assert!(spoken.take().is_empty());
    }

    #[test]
    fn practice_walks_question_answer_question() {
        let cards = [Card::new("2 + 2?", "4")];
        let spoken = Arc::new(Spoken::default());
        let mut term = terminal("c\ns\nc\nq\n");

        practice(&cards, Some(1), spoken.clone(), &mut term).unwrap();

        let out = output(term);
        assert!(out.contains("show the answer before grading the card"));
        assert!(out.contains("--- Answer ---\n4\n"));
        assert!(out.contains("Progress: 1/1 | Remaining: 0"));
        assert_eq!(spoken.take(), vec!["2 + 2?", "4", "2 + 2?"]);
    }

    #[test]
    fn list_shows_positions() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CardStore::load(dir.path().join(DEFAULT_CARDS_FILE));
        store.add("q1", "a1").unwrap();
        store.add("q2", "a2").unwrap();
        let mut term = terminal("");

        list_cards(&store, &mut term).unwrap();

        let out = output(term);
        assert!(out.contains("   0  q1 => a1"));
        assert!(out.contains("   1  q2 => a2"));
    }

    #[test]
    fn menu_ends_at_end_of_input() {
        let dir = tempfile::tempdir().unwrap();
        let store = CardStore::load(dir.path().join(DEFAULT_CARDS_FILE));
        let mut menu = MainMenu::new(store, Arc::new(Spoken::default()), None);
        let mut term = terminal("x\n");
        menu.run(&mut term).unwrap();
        assert!(output(term).contains("unknown choice \"x\""));
    }
}
