use log::trace;

use crate::iter900::Iterator900;
use crate::tailoring::ContractionSet;
use crate::weights::{WeightTable, Weights};

/// Single-element weights for the ASCII range, where that is all the general path would do.
///
/// A byte is missing when its slot expands to more than one element, or when it starts a
/// contraction.
pub(crate) struct FastTable {
    ascii: [Option<Weights>; 128],
}

impl FastTable {
    pub(crate) fn new(weights: &WeightTable, contractions: &ContractionSet) -> Self {
        let mut ascii = [None; 128];

        for (cp, slot) in (0u32..).zip(ascii.iter_mut()) {
            if contractions.lookahead(cp) >= 2 {
                continue;
            }

            *slot = match weights.lookup(cp) {
                Some([]) => Some(Weights::default()),
                Some([single]) => Some(*single),
                _ => None,
            };
        }

        Self { ascii }
    }

    #[inline]
    pub(crate) fn get(&self, byte: u8) -> Option<Weights> {
        self.ascii.get(usize::from(byte)).copied().flatten()
    }

    /// Number of bytes the fast path covers.
    pub(crate) fn len(&self) -> usize {
        self.ascii.iter().filter(|slot| slot.is_some()).count()
    }
}

impl Iterator900<'_> {
    /// Writes as many big-endian weights of the current level into `chunk` as the fast path can
    /// produce, returning the number of bytes written.
    ///
    /// `0` means no progress: the iterator is exhausted, holds pending elements, or sits on a
    /// byte the fast path doesn't cover. `next` picks up from the same state either way.
    pub fn next_chunk(&mut self, chunk: &mut [u8]) -> usize {
        if self.done || self.has_pending_elements() {
            return 0;
        }

        let fast = &self.table.fast;
        let mut written = 0;

        while written + 2 <= chunk.len() {
            let byte = match self.input.get(self.cursor) {
                Some(&byte) => byte,
                None => break,
            };

            let weights = match fast.get(byte) {
                Some(weights) => weights,
                None => {
                    trace!("fast path stops at byte {byte:#04X}, offset {}", self.cursor);
                    break;
                }
            };

            self.cursor += 1;

            let w = weights.at_level(self.level);
            if w != 0 {
                chunk[written..written + 2].copy_from_slice(&w.to_be_bytes());
                written += 2;
            }
        }

        written
    }
}
