use std::cmp::Ordering;
use std::sync::{Mutex, PoisonError};

use log::{debug, warn};
use once_cell::sync::{Lazy, OnceCell};

use crate::charset::Charset;
use crate::fast::FastTable;
use crate::iter900::Iterator900;
use crate::options::{CollationOptions, WeightPadding};
use crate::tailoring::{fold, ContractionSet, Tailoring};
use crate::weights::{BaseTable, WeightTable, LEVEL_SEPARATOR, MAX_COLLATION_ELEMENTS_PER_CODEPOINT};

//
// Structs etc.
//

/// The effective table of a finalized collation.
pub(crate) struct Table900 {
    pub(crate) weights: WeightTable,
    pub(crate) contractions: ContractionSet,
    pub(crate) fast: FastTable,
    pub(crate) upper_case_first: bool,
}

/// A `*_0900_*` collation: UCA 9.0.0 with up to three levels.
///
/// Construction is cheap; the tailoring is folded into the base table on first use, after which
/// the raw tailoring is dropped.
pub struct Uca900Collation {
    name: &'static str,
    id: u16,
    charset: Charset,
    options: CollationOptions,
    base: &'static Lazy<BaseTable>,
    tailoring: Mutex<Option<Tailoring>>,
    table: OnceCell<Table900>,
}

//
// Functions, public
//

impl Uca900Collation {
    pub fn new(
        name: &'static str,
        id: u16,
        options: CollationOptions,
        base: &'static Lazy<BaseTable>,
        tailoring: Tailoring,
    ) -> Self {
        Self {
            name,
            id,
            charset: Charset::Utf8mb4,
            options,
            base,
            tailoring: Mutex::new(Some(tailoring)),
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

    /// Whether the effective table has been built.
    pub fn is_finalized(&self) -> bool {
        self.table.get().is_some()
    }

    /// The effective weight table, tailoring included.
    pub fn weights(&self) -> &WeightTable {
        &self.table().weights
    }

    pub fn iterator<'a>(&'a self, input: &'a [u8]) -> Iterator900<'a> {
        Iterator900::new(
            self.table(),
            self.charset,
            input,
            self.options.strength.levels(),
        )
    }

    /// Compares `left` and `right` level by level.
    ///
    /// With `right_is_prefix`, `right` running out while `left` still has weights at the same
    /// level is not a difference: the rest of that level is skipped on the left and comparison
    /// moves on, so a right side that is a prefix of the left compares `Equal`.
    pub fn collate(&self, left: &[u8], right: &[u8], right_is_prefix: bool) -> Ordering {
        let levels = self.options.strength.levels();
        let mut left_iter = self.iterator(left);
        let mut right_iter = self.iterator(right);
        let mut level = 0;

        loop {
            let l = left_iter.next().filter(|&w| w != LEVEL_SEPARATOR);
            let r = right_iter.next().filter(|&w| w != LEVEL_SEPARATOR);

            match (l, r) {
                (Some(l), Some(r)) => {
                    if l != r {
                        return l.cmp(&r);
                    }
                }
                (None, None) => {
                    level += 1;
                    if level >= levels {
                        return Ordering::Equal;
                    }
                }
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) if right_is_prefix => {
                    level = left_iter.skip_level();
                    if level >= levels {
                        return Ordering::Equal;
                    }
                }
                (Some(_), None) => return Ordering::Greater,
            }
        }
    }

    /// Appends the weight string of `src` to `dst`: the weights of each level, big-endian, with
    /// a zero weight between levels.
    pub fn weight_string(&self, dst: &mut Vec<u8>, src: &[u8], padding: WeightPadding) {
        let mut it = self.iterator(src);
        let mut chunk = [0u8; 64];

        loop {
            let n = it.next_chunk(&mut chunk);
            if n > 0 {
                dst.extend_from_slice(&chunk[..n]);
                continue;
            }

            match it.next() {
                Some(w) => dst.extend_from_slice(&w.to_be_bytes()),
                None => break,
            }
        }

        match padding {
            WeightPadding::None => {}
            WeightPadding::ToCapacity => {
                let capacity = dst.capacity();
                dst.resize(capacity, 0);
            }
            WeightPadding::Codepoints(n) => {
                warn!("{}: padding to {n} code points is not supported, ignoring", self.name);
            }
        }
    }

    /// Upper bound on the weight string of a `num_bytes`-byte input, counted as four bytes per
    /// character.
    ///
    /// # Panics
    ///
    /// If `num_bytes` is not a multiple of 4.
    pub fn weight_string_len(&self, num_bytes: usize) -> usize {
        assert!(
            num_bytes % 4 == 0,
            "{}: weight string length needs a multiple of 4 bytes, got {num_bytes}",
            self.name
        );

        let levels = self.options.strength.levels();
        let weights = (num_bytes / 4) * MAX_COLLATION_ELEMENTS_PER_CODEPOINT * levels;

        (weights + levels - 1) * 2
    }
}

//
// Functions, private
//

impl Uca900Collation {
    pub(crate) fn table(&self) -> &Table900 {
        self.table.get_or_init(|| self.finalize())
    }

    fn finalize(&self) -> Table900 {
        let mut raw = self
            .tailoring
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let empty = Tailoring::default();

        let folded = fold(
            self.base,
            raw.as_ref().unwrap_or(&empty),
            self.options.upper_case_first,
        )
        .unwrap_or_else(|err| panic!("{}: tailoring is corrupt: {err}", self.name));

        let fast = FastTable::new(&folded.weights, &folded.contractions);

        debug!(
            "{}: finalized {} code points, {} contractions, {} fast bytes",
            self.name,
            folded.weights.len(),
            folded.contractions.len(),
            fast.len()
        );

        *raw = None;

        Table900 {
            weights: folded.weights,
            contractions: folded.contractions,
            fast,
            upper_case_first: self.options.upper_case_first,
        }
    }

    #[cfg(test)]
    pub(crate) fn has_raw_tailoring(&self) -> bool {
        self.tailoring
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
