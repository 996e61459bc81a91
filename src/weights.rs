use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::tailoring::Contraction;

//
// Structs etc.
//

/// One collation element: a weight per level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Weights {
    pub primary: u16,
    pub secondary: u16,
    pub tertiary: u16,
}

impl Weights {
    pub const fn new(primary: u16, secondary: u16, tertiary: u16) -> Self {
        Self {
            primary,
            secondary,
            tertiary,
        }
    }

    /// Weight at `level` (0 = primary). Levels past tertiary have no data.
    #[inline]
    pub fn at_level(&self, level: usize) -> u16 {
        match level {
            0 => self.primary,
            1 => self.secondary,
            2 => self.tertiary,
            _ => 0,
        }
    }

    pub fn is_ignorable(&self) -> bool {
        self.primary == 0 && self.secondary == 0 && self.tertiary == 0
    }
}

/// Code point to collation elements, stored in pages of 256 slots so that unpopulated ranges of
/// the code space cost one `None` each.
///
/// A slot that was never filled is *undefined* and callers fall back to implicit weights. A slot
/// filled with all-zero elements is *ignorable*.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct WeightTable {
    pages: Vec<Option<Vec<Option<Vec<Weights>>>>>,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            pages: vec![None; PAGE_COUNT],
        }
    }
}

/// Rows of an allkeys-format file, in file order.
#[derive(Debug, Default)]
pub struct ParsedKeys {
    pub singles: Vec<(u32, Vec<Weights>)>,
    pub multis: Vec<(Vec<u32>, Vec<Weights>)>,
}

/// An untailored table as shipped with a UCA version.
#[derive(Debug, Deserialize, Serialize)]
pub struct BaseTable {
    pub weights: WeightTable,
    pub contractions: Vec<Contraction>,
}

//
// Static/const
//

pub const MAX_CODEPOINT: u32 = 0x10_FFFF;

/// Upper bound on the elements one code point (or one contraction) expands to.
pub const MAX_COLLATION_ELEMENTS_PER_CODEPOINT: usize = 8;

/// Emitted between levels of a multi-level weight string.
pub const LEVEL_SEPARATOR: u16 = 0x0000;

/// Legacy weight for code points past a collation's `max_codepoint`.
pub const REPLACEMENT_WEIGHT: u16 = 0xFFFD;

const PAGE_BITS: u32 = 8;
const PAGE_SIZE: usize = 1 << PAGE_BITS;
const PAGE_COUNT: usize = (MAX_CODEPOINT as usize >> PAGE_BITS) + 1;

// Baked from data/allkeys-*.txt with `colldump --bake`
static BAKED_900: &[u8; 822_096] = include_bytes!("../data/ducet-900.bin");
static BAKED_400: &[u8; 577_574] = include_bytes!("../data/ducet-400.bin");

/// UCA 9.0.0, the base of every `*_0900_*` collation.
pub static DUCET_900: Lazy<BaseTable> = Lazy::new(|| {
    BaseTable::from_bincode(BAKED_900)
        .unwrap_or_else(|err| panic!("embedded UCA 9.0.0 table is corrupt: {err}"))
});

/// UCA 4.0.0, the base of the `*_unicode_ci` family.
pub static DUCET_400: Lazy<BaseTable> = Lazy::new(|| {
    BaseTable::from_bincode(BAKED_400)
        .unwrap_or_else(|err| panic!("embedded UCA 4.0.0 table is corrupt: {err}"))
});

//
// Macros
//

macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: OnceCell<Regex> = OnceCell::new();
        RE.get_or_init(|| Regex::new($re).unwrap())
    }};
}

//
// Functions, public
//

impl WeightTable {
    /// Elements for `cp`, or `None` when the table doesn't define it.
    #[inline]
    pub fn lookup(&self, cp: u32) -> Option<&[Weights]> {
        let page = self.pages.get((cp >> PAGE_BITS) as usize)?.as_ref()?;
        page[cp as usize & (PAGE_SIZE - 1)].as_deref()
    }

    pub(crate) fn insert(&mut self, cp: u32, weights: Vec<Weights>) -> Result<(), TableError> {
        if cp > MAX_CODEPOINT {
            return Err(TableError::CodepointOutOfRange(cp));
        }

        let page = self.pages[(cp >> PAGE_BITS) as usize].get_or_insert_with(|| vec![None; PAGE_SIZE]);
        page[cp as usize & (PAGE_SIZE - 1)] = Some(weights);

        Ok(())
    }

    /// Visits every element of every defined slot.
    pub(crate) fn for_each_weights_mut(&mut self, mut f: impl FnMut(&mut Weights)) {
        self.pages
            .iter_mut()
            .flatten()
            .flat_map(|page| page.iter_mut().flatten())
            .flat_map(|slot| slot.iter_mut())
            .for_each(|weights| f(weights));
    }

    /// Number of defined code points.
    pub fn len(&self) -> usize {
        self.pages
            .iter()
            .flatten()
            .map(|page| page.iter().filter(|slot| slot.is_some()).count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks the page layout `lookup` and `insert` index into.
    fn check_shape(&self) -> Result<(), TableError> {
        if self.pages.len() != PAGE_COUNT {
            return Err(TableError::PageCount {
                found: self.pages.len(),
                expected: PAGE_COUNT,
            });
        }

        for (page, slots) in self.pages.iter().enumerate() {
            if let Some(slots) = slots {
                if slots.len() != PAGE_SIZE {
                    return Err(TableError::PageSize {
                        page,
                        found: slots.len(),
                        expected: PAGE_SIZE,
                    });
                }
            }
        }

        Ok(())
    }
}

impl BaseTable {
    pub fn from_allkeys(text: &str) -> Result<Self, TableError> {
        let parsed = parse_allkeys(text)?;
        let mut weights = WeightTable::default();

        for (cp, row) in parsed.singles {
            weights.insert(cp, row)?;
        }

        let contractions = parsed
            .multis
            .into_iter()
            .map(|(path, weights)| Contraction { path, weights })
            .collect();

        Ok(Self {
            weights,
            contractions,
        })
    }

    pub fn to_bincode(&self) -> Result<Vec<u8>, TableError> {
        Ok(bincode::serialize(self)?)
    }

    /// Loads a table written by `to_bincode`, rejecting page layouts the lookups can't index.
    pub fn from_bincode(bytes: &[u8]) -> Result<Self, TableError> {
        let table: Self = bincode::deserialize(bytes)?;
        table.weights.check_shape()?;

        Ok(table)
    }
}

/// Parses `allkeys.txt`-style rows: `0063 0068 ; [.1C7B.0020.0002] # comment`.
///
/// Blank lines and lines starting with `#` or `@` are skipped.
pub fn parse_allkeys(text: &str) -> Result<ParsedKeys, TableError> {
    let re_key = regex!(r"[\dA-F]{4,6}");
    let re_weights = regex!(r"[*.\dA-F]{15}");
    let re_value = regex!(r"[\dA-F]{4}");

    let mut parsed = ParsedKeys::default();

    for (i, line) in text.lines().enumerate() {
        let line_number = i + 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with('@') || line.starts_with('#') {
            continue;
        }

        let (left_of_semicolon, right_of_semicolon) = line
            .split_once(';')
            .ok_or(TableError::MissingSeparator { line: line_number })?;
        let left_of_hash = right_of_semicolon.split('#').next().unwrap_or_default();

        let mut k: Vec<u32> = Vec::new();
        for cap in re_key.find_iter(left_of_semicolon) {
            // The regex only admits hex digits
            k.push(u32::from_str_radix(cap.as_str(), 16).unwrap_or_default());
        }

        if k.is_empty() {
            return Err(TableError::NoCodepoints { line: line_number });
        }

        let mut v: Vec<Weights> = Vec::new();
        for cap in re_weights.find_iter(left_of_hash) {
            let mut vals = re_value
                .find_iter(cap.as_str())
                .map(|m| u16::from_str_radix(m.as_str(), 16).unwrap_or_default());

            v.push(Weights {
                primary: vals.next().unwrap_or_default(),
                secondary: vals.next().unwrap_or_default(),
                tertiary: vals.next().unwrap_or_default(),
            });
        }

        if v.is_empty() {
            return Err(TableError::NoWeights { line: line_number });
        }

        if v.len() > MAX_COLLATION_ELEMENTS_PER_CODEPOINT * k.len() {
            return Err(TableError::TooManyElements {
                line: line_number,
                count: v.len(),
                max: MAX_COLLATION_ELEMENTS_PER_CODEPOINT * k.len(),
            });
        }

        if k.len() == 1 {
            parsed.singles.push((k[0], v));
        } else {
            parsed.multis.push((k, v));
        }
    }

    Ok(parsed)
}

/// Implicit weights for a code point the UCA 9.0.0 table doesn't list.
#[allow(clippy::cast_possible_truncation)]
pub fn implicit_weights_900(cp: u32) -> [Weights; 2] {
    let (aaaa, bbbb) = match cp {
        0x1_7000..=0x1_8AFF => (0xFB00, cp - 0x1_7000), //                 Tangut
        x if is_han_core_900(x) => (0xFB40 + (cp >> 15), cp & 0x7FFF), //  CJK1
        x if is_han_other_900(x) => (0xFB80 + (cp >> 15), cp & 0x7FFF), // CJK2
        _ => (0xFBC0 + (cp >> 15), cp & 0x7FFF), //                        unass.
    };

    [
        Weights::new(aaaa as u16, 0x0020, 0x0002),
        Weights::new((bbbb | 0x8000) as u16, 0, 0),
    ]
}

/// Implicit weights for a code point the UCA 4.0.0 table doesn't list.
#[allow(clippy::cast_possible_truncation)]
pub fn implicit_weights_legacy(cp: u32) -> [Weights; 2] {
    let base = match cp {
        0x4E00..=0x9FA5 | 0xF900..=0xFAFF => 0xFB40, //          CJK1
        0x3400..=0x4DB5 | 0x2_0000..=0x2_A6D6 => 0xFB80, //      CJK2
        _ => 0xFBC0, //                                          unass.
    };

    [
        Weights::new((base + (cp >> 15)) as u16, 0x0020, 0x0002),
        Weights::new(((cp & 0x7FFF) | 0x8000) as u16, 0, 0),
    ]
}

//
// Functions, private
//

fn is_han_core_900(cp: u32) -> bool {
    matches!(
        cp,
        0x4E00..=0x9FD5
            | 0xFA0E
            | 0xFA0F
            | 0xFA11
            | 0xFA13
            | 0xFA14
            | 0xFA1F
            | 0xFA21
            | 0xFA23
            | 0xFA24
            | 0xFA27
            | 0xFA28
            | 0xFA29
    )
}

fn is_han_other_900(cp: u32) -> bool {
    matches!(
        cp,
        0x3400..=0x4DB5
            | 0x2_0000..=0x2_A6D6
            | 0x2_A700..=0x2_B734
            | 0x2_B740..=0x2_B81D
            | 0x2_B820..=0x2_CEA1
    )
}
