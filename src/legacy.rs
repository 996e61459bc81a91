use std::cmp::Ordering;
use std::sync::{Mutex, PoisonError};

use log::debug;
use once_cell::sync::{Lazy, OnceCell};

use crate::charset::Charset;
use crate::iter900::Elements;
use crate::options::WeightPadding;
use crate::tailoring::{fold, ContractionSet, Tailoring};
use crate::weights::{implicit_weights_legacy, BaseTable, WeightTable, Weights, REPLACEMENT_WEIGHT};

//
// Structs etc.
//

pub(crate) struct TableLegacy {
    weights: WeightTable,
    contractions: ContractionSet,
    /// Primary weight of U+0020, used for PAD SPACE
    space: u16,
}

/// A pre-9.0.0 collation (`utf8mb4_unicode_ci` and friends): primary weights only, PAD SPACE.
pub struct LegacyCollation {
    name: &'static str,
    id: u16,
    charset: Charset,
    base: &'static Lazy<BaseTable>,
    tailoring: Mutex<Option<Tailoring>>,
    max_codepoint: u32,
    table: OnceCell<TableLegacy>,
}

/// Yields the non-zero primary weights of one string.
pub struct IteratorLegacy<'a> {
    table: &'a TableLegacy,
    charset: Charset,
    input: &'a [u8],
    max_codepoint: u32,
    cursor: usize,
    elements: Elements<'a>,
    next_element: usize,
    codepoints: usize,
}

//
// Static/const
//

const DEFAULT_SPACE_WEIGHT: u16 = 0x0209;

//
// Functions, public
//

impl LegacyCollation {
    pub fn new(
        name: &'static str,
        id: u16,
        charset: Charset,
        base: &'static Lazy<BaseTable>,
        tailoring: Tailoring,
        max_codepoint: u32,
    ) -> Self {
        Self {
            name,
            id,
            charset,
            base,
            tailoring: Mutex::new(Some(tailoring)),
            max_codepoint,
            table: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn is_finalized(&self) -> bool {
        self.table.get().is_some()
    }

    pub fn weights(&self) -> &WeightTable {
        &self.table().weights
    }

    pub fn iterator<'a>(&'a self, input: &'a [u8]) -> IteratorLegacy<'a> {
        IteratorLegacy {
            table: self.table(),
            charset: self.charset,
            input,
            max_codepoint: self.max_codepoint,
            cursor: 0,
            elements: Elements::EMPTY,
            next_element: 0,
            codepoints: 0,
        }
    }

    /// Compares primary weights, treating the shorter side as padded with spaces.
    ///
    /// With `right_is_prefix`, `right` running out first means `Equal`.
    pub fn collate(&self, left: &[u8], right: &[u8], right_is_prefix: bool) -> Ordering {
        let space = self.table().space;
        let mut left_iter = self.iterator(left);
        let mut right_iter = self.iterator(right);

        loop {
            match (left_iter.next(), right_iter.next()) {
                (Some(l), Some(r)) => {
                    if l != r {
                        return l.cmp(&r);
                    }
                }
                (None, None) => return Ordering::Equal,
                (Some(_), None) if right_is_prefix => return Ordering::Equal,
                (Some(l), None) => return against_spaces(l, &mut left_iter, space),
                (None, Some(r)) => return against_spaces(r, &mut right_iter, space).reverse(),
            }
        }
    }

    /// Appends the big-endian primary weights of `src` to `dst`, then pads with the space weight.
    pub fn weight_string(&self, dst: &mut Vec<u8>, src: &[u8], padding: WeightPadding) {
        let space = self.table().space.to_be_bytes();
        let mut it = self.iterator(src);

        for w in it.by_ref() {
            dst.extend_from_slice(&w.to_be_bytes());
        }

        match padding {
            WeightPadding::None => {}
            WeightPadding::ToCapacity => {
                while dst.capacity() - dst.len() >= 2 {
                    dst.extend_from_slice(&space);
                }
                if dst.len() < dst.capacity() {
                    dst.push(space[0]);
                }
            }
            WeightPadding::Codepoints(n) => {
                for _ in it.length()..n {
                    dst.extend_from_slice(&space);
                }
            }
        }
    }

    /// A loose upper bound: eight weight bytes per input byte.
    pub fn weight_string_len(&self, num_bytes: usize) -> usize {
        num_bytes * 8
    }
}

impl IteratorLegacy<'_> {
    /// Code points decoded so far.
    pub fn length(&self) -> usize {
        self.codepoints
    }

    fn advance(&mut self) -> bool {
        let table = self.table;
        let rest = &self.input[self.cursor..];

        let (cp, width) = match self.charset.decode(rest) {
            Some(decoded) => decoded,
            None => return false,
        };

        self.next_element = 0;

        if cp > self.max_codepoint {
            self.cursor += width;
            self.codepoints += 1;
            self.elements = Elements::Computed([
                Weights::new(REPLACEMENT_WEIGHT, 0x0020, 0x0002),
                Weights::default(),
            ]);
            return true;
        }

        if let Some(m) = table.contractions.longest_match(self.charset, rest, cp, width) {
            self.cursor += m.bytes;
            self.codepoints += m.codepoints;
            self.elements = Elements::Table(m.weights);
            return true;
        }

        self.cursor += width;
        self.codepoints += 1;
        self.elements = match table.weights.lookup(cp) {
            Some(weights) => Elements::Table(weights),
            None => Elements::Computed(implicit_weights_legacy(cp)),
        };

        true
    }
}

impl Iterator for IteratorLegacy<'_> {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        loop {
            while let Some(weights) = self.elements.get(self.next_element) {
                self.next_element += 1;
                if weights.primary != 0 {
                    return Some(weights.primary);
                }
            }

            if !self.advance() {
                return None;
            }
        }
    }
}

//
// Functions, private
//

impl LegacyCollation {
    fn table(&self) -> &TableLegacy {
        self.table.get_or_init(|| self.finalize())
    }

    fn finalize(&self) -> TableLegacy {
        let mut raw = self
            .tailoring
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let empty = Tailoring::default();

        let folded = fold(self.base, raw.as_ref().unwrap_or(&empty), false)
            .unwrap_or_else(|err| panic!("{}: tailoring is corrupt: {err}", self.name));

        let space = folded
            .weights
            .lookup(0x20)
            .and_then(<[Weights]>::first)
            .map_or(DEFAULT_SPACE_WEIGHT, |w| w.primary);

        debug!(
            "{}: finalized {} code points, {} contractions, space weight {space:#06X}",
            self.name,
            folded.weights.len(),
            folded.contractions.len()
        );

        *raw = None;

        TableLegacy {
            weights: folded.weights,
            contractions: folded.contractions,
            space,
        }
    }
}

/// Orders what is left of the longer side against an endless run of spaces.
fn against_spaces(first: u16, rest: &mut IteratorLegacy<'_>, space: u16) -> Ordering {
    std::iter::once(first)
        .chain(rest)
        .map(|w| w.cmp(&space))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
