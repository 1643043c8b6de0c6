//! View state of one practice window.
//!
//! `QuestionShown -> reveal -> AnswerShown -> grade -> QuestionShown` for the
//! next card, forever, until the surface drops the `Review`.
use crate::card::Card;
use crate::error::SessionError;
use crate::narration::Narrate;
use crate::practice::{PracticeSession, Progress};
use crate::spaced_repetition::SpacedRepetition;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    QuestionShown,
    AnswerShown,
}

/// Everything a surface needs to draw the practice view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewView {
    pub card: usize,
    pub text: String,
    pub phase: Phase,
    pub progress: Progress,
    pub progress_text: String,
    pub can_reveal: bool,
    pub can_grade: bool,
}

pub struct Review<R = ChaCha8Rng> {
    cards: Vec<Card>,
    session: PracticeSession<R>,
    card: usize,
    phase: Phase,
    narrator: Arc<dyn Narrate>,
}

impl Review<ChaCha8Rng> {
    /// Fails with `EmptyDeck` when there is nothing to practice.
    pub fn seeded(
        cards: Vec<Card>,
        seed: Option<u64>,
        narrator: Arc<dyn Narrate>,
    ) -> Result<Self, SessionError> {
        let session = PracticeSession::seeded(cards.len(), seed)?;
        Ok(Self::begin(cards, session, narrator))
    }
}

impl<R: Rng> Review<R> {
    /// Shows (and narrates) the first question.
    fn begin(
        cards: Vec<Card>,
        mut session: PracticeSession<R>,
        narrator: Arc<dyn Narrate>,
    ) -> Self {
        let card = session.next_card();
        let review = Self {
            cards,
            session,
            card,
            phase: Phase::QuestionShown,
            narrator,
        };
        review.narrator.speak(&review.card().question);
        review
    }

    pub fn card(&self) -> &Card {
        &self.cards[self.card]
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn progress(&self) -> Progress {
        self.session.progress()
    }

    #[cfg(test)]
    pub fn session(&self) -> &PracticeSession<R> {
        &self.session
    }

    /// The text currently on screen.
    pub fn text(&self) -> &str {
        match self.phase {
            Phase::QuestionShown => &self.card().question,
            Phase::AnswerShown => &self.card().answer,
        }
    }

    pub fn reveal(&mut self) -> Result<(), SessionError> {
        if self.phase == Phase::AnswerShown {
            return Err(SessionError::AnswerAlreadyShown);
        }
        self.phase = Phase::AnswerShown;
        self.narrator.speak(&self.card().answer);
        Ok(())
    }

    /// Grade the revealed card and move on to the next question.
    pub fn grade(&mut self, correct: bool) -> Result<(), SessionError> {
        if self.phase == Phase::QuestionShown {
            return Err(SessionError::AnswerHidden);
        }
        self.card = if correct {
            self.session.mark_correct()
        } else {
            self.session.mark_incorrect()
        };
        log::debug!(
            "graded {}, next card {} ({})",
            if correct { "correct" } else { "incorrect" },
            self.card,
            self.progress()
        );
        self.phase = Phase::QuestionShown;
        self.narrator.speak(&self.card().question);
        Ok(())
    }

    pub fn view(&self) -> ReviewView {
        let progress = self.progress();
        ReviewView {
            card: self.card,
            text: self.text().to_owned(),
            phase: self.phase,
            progress,
            progress_text: progress.to_string(),
            can_reveal: self.phase == Phase::QuestionShown,
            can_grade: self.phase == Phase::AnswerShown,
        }
    }
}
