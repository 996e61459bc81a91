use std::iter::FusedIterator;

use crate::charset::Charset;
use crate::tailoring::swap_case_first;
use crate::uca900::Table900;
use crate::weights::{implicit_weights_900, Weights, LEVEL_SEPARATOR};

/// Elements of the code point (or contraction) an iterator is currently emitting.
#[derive(Clone, Copy)]
pub(crate) enum Elements<'a> {
    Table(&'a [Weights]),
    Computed([Weights; 2]),
}

impl Elements<'_> {
    pub(crate) const EMPTY: Elements<'static> = Elements::Table(&[]);

    #[inline]
    pub(crate) fn get(&self, i: usize) -> Option<Weights> {
        match self {
            Elements::Table(weights) => weights.get(i).copied(),
            Elements::Computed(weights) => weights.get(i).copied(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        match self {
            Elements::Table(weights) => weights.len(),
            Elements::Computed(weights) => weights.len(),
        }
    }
}

/// Walks one string under a UCA 900 collation, yielding the non-zero weights of level 0, a
/// separator, the non-zero weights of level 1, and so on up to the configured number of levels.
///
/// Each level is a fresh pass over the input, decoded lazily.
pub struct Iterator900<'a> {
    pub(crate) table: &'a Table900,
    pub(crate) charset: Charset,
    pub(crate) input: &'a [u8],
    pub(crate) levels: usize,
    pub(crate) level: usize,
    pub(crate) cursor: usize,
    pub(crate) elements: Elements<'a>,
    pub(crate) next_element: usize,
    pub(crate) done: bool,
}

impl<'a> Iterator900<'a> {
    pub(crate) fn new(table: &'a Table900, charset: Charset, input: &'a [u8], levels: usize) -> Self {
        Self {
            table,
            charset,
            input,
            levels,
            level: 0,
            cursor: 0,
            elements: Elements::EMPTY,
            next_element: 0,
            done: levels == 0,
        }
    }

    /// Level the next weight belongs to; equal to the level count once exhausted.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Drops whatever is left of the current level without emitting it (not even the separator)
    /// and returns the new level.
    pub fn skip_level(&mut self) -> usize {
        if !self.done {
            self.level += 1;
            self.rewind();
            self.done = self.level >= self.levels;
        }

        self.level
    }

    pub(crate) fn has_pending_elements(&self) -> bool {
        self.next_element < self.elements.len()
    }

    fn rewind(&mut self) {
        self.cursor = 0;
        self.elements = Elements::EMPTY;
        self.next_element = 0;
    }

    /// Decodes the next code point (or contraction) into `elements`. False at end of input.
    fn advance(&mut self) -> bool {
        let table = self.table;
        let rest = &self.input[self.cursor..];

        let (cp, width) = match self.charset.decode(rest) {
            Some(decoded) => decoded,
            None => return false,
        };

        self.next_element = 0;

        if let Some(m) = table.contractions.longest_match(self.charset, rest, cp, width) {
            self.cursor += m.bytes;
            self.elements = Elements::Table(m.weights);
            return true;
        }

        self.cursor += width;
        self.elements = match table.weights.lookup(cp) {
            Some(weights) => Elements::Table(weights),
            None => {
                let mut implicit = implicit_weights_900(cp);
                if table.upper_case_first {
                    implicit.iter_mut().for_each(swap_case_first);
                }
                Elements::Computed(implicit)
            }
        };

        true
    }
}

impl Iterator for Iterator900<'_> {
    type Item = u16;

    /// Next weight. A `LEVEL_SEPARATOR` marks the move to the next level; `None` means every
    /// level has been emitted.
    fn next(&mut self) -> Option<u16> {
        if self.done {
            return None;
        }

        loop {
            while let Some(weights) = self.elements.get(self.next_element) {
                self.next_element += 1;

                let w = weights.at_level(self.level);
                if w != 0 {
                    return Some(w);
                }
            }

            if !self.advance() {
                break;
            }
        }

        self.level += 1;
        self.rewind();

        if self.level >= self.levels {
            self.done = true;
            return None;
        }

        Some(LEVEL_SEPARATOR)
    }
}

impl FusedIterator for Iterator900<'_> {}

#[cfg(test)]
mod tests {
    use crate::options::{CollationOptions, Strength};
    use crate::tailoring::Tailoring;
    use crate::uca900::Uca900Collation;
    use crate::weights::DUCET_900;

    fn collation(strength: Strength) -> Uca900Collation {
        Uca900Collation::new(
            "test_0900",
            0,
            CollationOptions {
                strength,
                upper_case_first: false,
            },
            &DUCET_900,
            Tailoring::default(),
        )
    }

    fn drain(collation: &Uca900Collation, input: &str) -> Vec<(u16, usize)> {
        let mut it = collation.iterator(input.as_bytes());
        let mut out = Vec::new();
        while let Some(w) = it.next() {
            out.push((w, it.level()));
        }
        out
    }

    #[test]
    fn levels_are_separated() {
        let weights = drain(&collation(Strength::Tertiary), "aB");

        assert_eq!(
            weights,
            [
                (0x1C47, 0),
                (0x1C54, 0),
                (0x0000, 1),
                (0x0020, 1),
                (0x0020, 1),
                (0x0000, 2),
                (0x0002, 2),
                (0x0008, 2),
            ]
        );
    }

    #[test]
    fn levels_never_decrease() {
        let weights = drain(&collation(Strength::Tertiary), "Ünïcödé 漢字 ч");

        assert!(weights.windows(2).all(|pair| pair[0].1 <= pair[1].1));
        assert_eq!(weights.iter().filter(|(w, _)| *w == 0).count(), 2);
    }

    #[test]
    fn ignorables_and_expansions() {
        // U+0001 is fully ignorable; é expands to e + acute
        let weights = drain(&collation(Strength::Secondary), "\u{1}é");

        assert_eq!(weights, [(0x1C75, 0), (0x0000, 1), (0x0020, 1), (0x0024, 1)]);
    }

    #[test]
    fn implicit_and_contraction() {
        let weights = drain(&collation(Strength::Primary), "漢\u{438}\u{306}");

        assert_eq!(weights, [(0xFB40, 0), (0xEF22, 0), (0x1E62, 0)]);
    }

    #[test]
    fn skip_level_jumps_ahead() {
        let collation = collation(Strength::Tertiary);
        let mut it = collation.iterator(b"abc");

        assert_eq!(it.next(), Some(0x1C47));
        assert_eq!(it.skip_level(), 1);
        assert_eq!(it.next(), Some(0x0020));
        assert_eq!(it.skip_level(), 2);
        assert_eq!(it.skip_level(), 3);
        assert_eq!(it.next(), None);
        assert_eq!(it.skip_level(), 3);
    }

    #[test]
    fn malformed_input_ends_each_pass() {
        let mut bytes = b"ab".to_vec();
        bytes.push(0xFF);
        bytes.extend_from_slice(b"cd");

        let collation = collation(Strength::Secondary);
        let mut it = collation.iterator(&bytes);
        let mut out = Vec::new();
        while let Some(w) = it.next() {
            out.push(w);
        }

        assert_eq!(out, [0x1C47, 0x1C54, 0x0000, 0x0020, 0x0020]);
    }
}
