//! Practice scheduling.
//!
//! Every card index lives in exactly one of two queues: `pending` (not shown
//! yet this cycle) or `completed` (shown this cycle). When `pending` runs dry
//! the completed cards are shuffled back in, so practice loops forever. A card
//! answered incorrectly goes back into the *current* cycle at a random spot.
use crate::error::SessionError;
use crate::spaced_repetition::SpacedRepetition;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

/// `done` is `total - remaining`, so it undercounts once a cycle has wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
    pub remaining: usize,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Progress: {}/{} | Remaining: {}",
            self.done, self.total, self.remaining
        )
    }
}

pub struct PracticeSession<R = ChaCha8Rng> {
    total: usize,
    pending: VecDeque<usize>,
    completed: Vec<usize>,
    current: Option<usize>,
    rng: R,
}

impl PracticeSession<ChaCha8Rng> {
    /// A fixed seed makes the whole session reproducible.
    pub fn seeded(total: usize, seed: Option<u64>) -> Result<Self, SessionError> {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::new(total, rng)
    }
}

impl<R: Rng> PracticeSession<R> {
    /// `pending` starts as a random permutation of `0..total`.
    pub fn new(total: usize, mut rng: R) -> Result<Self, SessionError> {
        if total == 0 {
            return Err(SessionError::EmptyDeck);
        }
        let mut pending: Vec<usize> = (0..total).collect();
        pending.shuffle(&mut rng);
        Ok(Self {
            total,
            pending: pending.into(),
            completed: Vec::with_capacity(total),
            current: None,
            rng,
        })
    }

    /// The card shown by the last `next_card`, `None` before the first one.
    #[cfg(test)]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    #[cfg(test)]
    pub fn total(&self) -> usize {
        self.total
    }

    #[cfg(test)]
    pub fn pending(&self) -> impl Iterator<Item = usize> + '_ {
        self.pending.iter().copied()
    }

    #[cfg(test)]
    pub fn completed(&self) -> &[usize] {
        &self.completed
    }

    /// Move the current card from `completed` back into `pending`.
    ///
    /// The slot is uniform over `0..=pending.len()`, so the card may come up
    /// next or only at the end of the cycle. Returns whether a card moved.
    pub fn requeue_current(&mut self) -> bool {
        let Some(card) = self.current else {
            log::warn!("no card shown yet, nothing to requeue");
            return false;
        };
        let Some(pos) = self.completed.iter().position(|&i| i == card) else {
            log::error!("card {card} is current but not in the completed queue");
            debug_assert!(false, "current card {card} missing from completed");
            return false;
        };
        self.completed.remove(pos);

        let slot = self.rng.gen_range(0..=self.pending.len());
        self.pending.insert(slot, card);
        log::debug!("requeued card {card} at {slot}/{}", self.pending.len());
        true
    }
}

impl<R: Rng> SpacedRepetition for PracticeSession<R> {
    fn next_card(&mut self) -> usize {
        if self.pending.is_empty() {
            let mut refill = std::mem::take(&mut self.completed);
            refill.shuffle(&mut self.rng);
            log::debug!("cycle finished, reshuffling {} cards", refill.len());
            self.pending = refill.into();
        }
        // pending ∪ completed always holds all `total >= 1` cards
        let card = self.pending.pop_front().unwrap_or_else(|| {
            log::error!("practice queues lost their cards, restarting the deck");
            self.completed.clear();
            self.pending = (1..self.total).collect();
            0
        });
        self.completed.push(card);
        self.current = Some(card);
        card
    }

    fn mark_correct(&mut self) -> usize {
        self.next_card()
    }

    fn mark_incorrect(&mut self) -> usize {
        self.requeue_current();
        self.next_card()
    }

    fn progress(&self) -> Progress {
        let remaining = self.pending.len();
        Progress {
            done: self.total - remaining,
            total: self.total,
            remaining,
        }
    }
}
