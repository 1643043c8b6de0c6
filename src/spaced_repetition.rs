use crate::practice::Progress;

/// Decides which card index is shown next.
pub trait SpacedRepetition {
    /// pick the next card and make it current
    fn next_card(&mut self) -> usize;

    /// grade the current card and advance
    fn mark_correct(&mut self) -> usize;

    fn mark_incorrect(&mut self) -> usize;

    fn progress(&self) -> Progress;
}
