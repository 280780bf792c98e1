//! Question drawing.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::level::NoteRange;
use crate::note::NoteIndex;

/// Source of uniformly distributed note indices.
pub trait NotePicker {
    /// Pick an index in `min..=max`. Callers guarantee `min <= max`.
    fn pick(&mut self, min: NoteIndex, max: NoteIndex) -> NoteIndex;
}

/// [`NotePicker`] backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomPicker<R = StdRng> {
    rng: R,
}

impl<R: Rng> RandomPicker<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomPicker<StdRng> {
    /// Reproducible picker for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    #[cfg(feature = "native")]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> NotePicker for RandomPicker<R> {
    fn pick(&mut self, min: NoteIndex, max: NoteIndex) -> NoteIndex {
        self.rng.random_range(min..=max)
    }
}

/// Draw the next question from `range`.
///
/// If the draw repeats `previous` and the range has room, the note is nudged
/// one step instead of re-rolling: down when it sits on `max`, up otherwise.
/// A single-note range always repeats.
pub fn draw_question<P: NotePicker + ?Sized>(
    picker: &mut P,
    range: NoteRange,
    previous: Option<NoteIndex>,
) -> NoteIndex {
    let drawn = picker.pick(range.min, range.max);
    match previous {
        Some(prev) if range.size() > 1 && drawn == prev => {
            if drawn == range.max {
                drawn - 1
            } else {
                drawn + 1
            }
        }
        _ => drawn,
    }
}
